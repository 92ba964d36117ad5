use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::bus::CommandBus;
use crate::command::Command;
use crate::error::Result;
use crate::platform::{Rect, WindowSnapshot};

pub const PREFS_FILE_NAME: &str = "prefs.cfg";

pub const MIN_ZOOM_PERCENT: i32 = 50;
pub const MAX_ZOOM_PERCENT: i32 = 200;

/// Color palettes understood by the renderer. The numeric ids are the
/// wire values of `theme.set arg:` and of the preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTheme {
    Black,
    Dark,
    Light,
    White,
}

impl ColorTheme {
    pub const ALL: [ColorTheme; 4] = [
        ColorTheme::Black,
        ColorTheme::Dark,
        ColorTheme::Light,
        ColorTheme::White,
    ];

    pub fn to_id(self) -> i32 {
        match self {
            ColorTheme::Black => 0,
            ColorTheme::Dark => 1,
            ColorTheme::Light => 2,
            ColorTheme::White => 3,
        }
    }

    pub fn from_id(id: i32) -> Option<ColorTheme> {
        match id {
            0 => Some(ColorTheme::Black),
            1 => Some(ColorTheme::Dark),
            2 => Some(ColorTheme::Light),
            3 => Some(ColorTheme::White),
            _ => None,
        }
    }
}

/// Cross-session preferences. Most fields mirror one line of the
/// preferences file; `command_echo` is runtime-only and never written.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub command_echo: bool,
    pub retain_window_size: bool,
    pub initial_window_rect: Rect,
    pub ui_scale: f32,
    pub zoom_percent: i32,
    pub theme: ColorTheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            command_echo: false,
            retain_window_size: true,
            initial_window_rect: Rect::new(-1, -1, 800, 500),
            ui_scale: 1.0,
            zoom_percent: 100,
            theme: ColorTheme::Dark,
        }
    }
}

/// Preferences file path inside the data directory.
pub fn prefs_path(dir: &Path) -> PathBuf {
    dir.join(PREFS_FILE_NAME)
}

/// Per-user data directory when none is configured.
pub fn default_data_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("portolan");
    path
}

/// Render the preferences as newline-separated command tokens, in the
/// order they have to replay. Window geometry and sidebar width are
/// written only while size retention is on.
pub fn serialize_prefs(settings: &Settings, window: &WindowSnapshot) -> String {
    let mut out = String::new();
    if settings.retain_window_size {
        let rect = window.rect;
        let _ = writeln!(
            out,
            "window.setrect width:{} height:{} coord:{} {}",
            rect.w, rect.h, rect.x, rect.y
        );
        let _ = writeln!(out, "sidebar.width arg:{}", window.sidebar.width);
    }
    let _ = writeln!(out, "retainwindow arg:{}", settings.retain_window_size as i32);
    if window.sidebar.visible {
        out.push_str("sidebar.toggle\n");
    }
    let _ = writeln!(out, "sidebar.mode arg:{}", window.sidebar.mode);
    let _ = writeln!(out, "uiscale arg:{}", window.ui_scale);
    let _ = writeln!(out, "zoom.set arg:{}", settings.zoom_percent);
    let _ = writeln!(out, "theme.set arg:{}", settings.theme.to_id());
    out
}

/// Write the preferences file, creating the data directory if needed.
pub fn save_prefs(dir: &Path, settings: &Settings, window: &WindowSnapshot) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(prefs_path(dir), serialize_prefs(settings, window))?;
    Ok(())
}

/// Load the preferences file by replaying its lines. A missing file is
/// not an error; every default stands.
///
/// Two commands must take effect before the window exists and are
/// applied to `settings` directly instead of being posted: `uiscale`
/// and `window.setrect`. Everything else goes through the bus and runs
/// once the loop drains it.
pub fn load_prefs(dir: &Path, settings: &mut Settings, bus: &CommandBus) {
    let Ok(text) = fs::read_to_string(prefs_path(dir)) else {
        return;
    };
    for line in text.lines() {
        if line.is_empty() {
            continue;
        }
        apply_pref_line(line, settings, bus);
    }
}

fn apply_pref_line(line: &str, settings: &mut Settings, bus: &CommandBus) {
    let cmd = Command::new(line);
    if cmd.is("uiscale") {
        settings.ui_scale = cmd.argf();
    } else if cmd.is("window.setrect") {
        let Some((x, y)) = cmd.coord() else {
            warn!("ignoring window.setrect without coordinates: {line}");
            return;
        };
        settings.initial_window_rect =
            Rect::new(x, y, cmd.int_arg("width"), cmd.int_arg("height"));
    } else {
        bus.post(cmd);
    }
}
