use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::document::{DocumentContent, TabId};
use crate::error::{AppError, Result};
use crate::tabs::TabList;

pub const STATE_FILE_NAME: &str = "state.bin";

/// Container magic. The format is versioned but deliberately has no
/// compatibility machinery: only `STATE_VERSION` is read or written.
const STATE_MAGIC: &[u8; 4] = b"lgL1";
const TAB_MAGIC: &[u8; 4] = b"tabd";
const STATE_VERSION: i32 = 0;

/// State file path inside the data directory.
pub fn state_path(dir: &Path) -> PathBuf {
    dir.join(STATE_FILE_NAME)
}

/// Write every open tab, in display order, into the state container.
///
/// Layout: magic, version as little-endian int32, then one record per
/// tab: the `tabd` tag, a one-byte active flag, and the document's own
/// self-delimiting payload.
pub fn save_state(tabs: &TabList, out: &mut dyn Write) -> Result<()> {
    out.write_all(STATE_MAGIC)?;
    out.write_all(&STATE_VERSION.to_le_bytes())?;
    for tab in tabs.iter() {
        out.write_all(TAB_MAGIC)?;
        let active = tabs.active_id() == Some(tab.id);
        out.write_all(&[active as u8])?;
        tab.content.serialize_state(out)?;
    }
    Ok(())
}

/// Save to `<dir>/state.bin`, creating the directory if needed.
pub fn save_state_file(dir: &Path, tabs: &TabList) -> Result<()> {
    fs::create_dir_all(dir)?;
    let mut file = fs::File::create(state_path(dir))?;
    save_state(tabs, &mut file)
}

/// Rebuild tabs from a state container.
///
/// The currently active tab, when one exists, is reused for the first
/// record instead of opening a new one; on startup that folds the
/// restored session into the blank initial tab. Further records come
/// from `new_content`.
///
/// Failure is partial: tabs fully reconstructed before a format error
/// stay in the list, and the error is returned. Returns the tab that
/// carried the active flag; when several did, the last one wins, and
/// when none did there is nothing to activate.
pub fn load_state(
    tabs: &mut TabList,
    new_content: &mut dyn FnMut() -> Box<dyn DocumentContent>,
    src: &mut dyn Read,
) -> Result<Option<TabId>> {
    match read_tag(src)? {
        Some(magic) if &magic == STATE_MAGIC => {}
        _ => return Err(AppError::UnrecognizedFormat),
    }
    let mut version = [0u8; 4];
    src.read_exact(&mut version)?;
    let version = i32::from_le_bytes(version);
    if version != STATE_VERSION {
        return Err(AppError::UnsupportedVersion(version));
    }

    let mut reuse = tabs.active_id();
    let mut current = None;
    while let Some(tag) = read_tag(src)? {
        if &tag != TAB_MAGIC {
            return Err(AppError::UnrecognizedData);
        }
        let mut flag = [0u8; 1];
        src.read_exact(&mut flag)?;
        let id = match reuse.take() {
            Some(id) => id,
            None => tabs.add(new_content()),
        };
        if flag[0] != 0 {
            current = Some(id);
        }
        if let Some(tab) = tabs.get_mut(id) {
            tab.content.deserialize_state(src)?;
        }
    }
    Ok(current)
}

/// Read a 4-byte tag; `Ok(None)` on a clean end of stream.
fn read_tag(src: &mut dyn Read) -> Result<Option<[u8; 4]>> {
    let mut tag = [0u8; 4];
    let mut filled = 0;
    while filled < tag.len() {
        let n = src.read(&mut tag[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            // Stream ends in the middle of a tag.
            return Err(AppError::UnrecognizedData);
        }
        filled += n;
    }
    Ok(Some(tag))
}
