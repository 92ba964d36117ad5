use std::fmt;
use std::io::{Read, Write};

use crate::error::Result;

/// Stable in-process handle for an open tab.
///
/// Handles come from a monotonic counter and are never reused, so a
/// handle kept across a close simply stops resolving instead of
/// pointing at someone else's tab. Handles are not persisted; a fresh
/// session re-numbers from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TabId(pub u64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The content side of a tab: navigation, history and persistence
/// callbacks owned by the document collaborator. Networking, layout and
/// rendering all live behind this seam.
pub trait DocumentContent {
    /// Current location of the document.
    fn url(&self) -> &str;

    /// Human-readable title, for bookmarks and the tab strip.
    fn title(&self) -> String;

    /// Start fetching and presenting `url`. `from_history` marks a
    /// history replay, which may be served from cache.
    fn begin_load(&mut self, url: &str, from_history: bool);

    /// Scroll offset to restore once the document is presented.
    fn set_initial_scroll(&mut self, offset: f32);

    /// Append `url` to the navigation history.
    fn history_add(&mut self, url: &str);

    /// Replace the current history tip with `url` (server redirects).
    fn history_replace(&mut self, url: &str);

    /// Write this tab's payload into the session container. The layout
    /// is owned by the document and must be self-delimiting, so that
    /// `deserialize_state` can read it back from the middle of a
    /// longer stream.
    fn serialize_state(&self, out: &mut dyn Write) -> Result<()>;

    /// Read back exactly the bytes written by `serialize_state`.
    fn deserialize_state(&mut self, src: &mut dyn Read) -> Result<()>;

    /// Fresh content presenting the same document, for tab duplication.
    fn duplicate(&self) -> Box<dyn DocumentContent>;
}

/// One open tab: the handle plus its collaborator-owned content.
pub struct Tab {
    pub id: TabId,
    pub content: Box<dyn DocumentContent>,
}
