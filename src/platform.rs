use crate::command::Command;
use crate::document::DocumentContent;
use crate::error::Result;
use crate::settings::{ColorTheme, Settings};

/// Window geometry in pixels. Negative coordinates mean "let the
/// window system pick a position".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Sidebar widget state captured for the preferences file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarState {
    pub width: i32,
    pub visible: bool,
    pub mode: i32,
}

/// Live window state sampled when preferences are written out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSnapshot {
    pub rect: Rect,
    pub ui_scale: f32,
    pub sidebar: SidebarState,
}

/// One event delivered by the windowing subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformEvent<I> {
    /// The window was closed or the platform asked the process to exit.
    Quit,
    /// A file was dragged onto the window.
    DropFile(String),
    /// Anything else: raw input routed to the widget tree.
    Input(I),
}

/// The windowing and rendering boundary.
///
/// The application loop owns exactly one platform and calls it from a
/// single thread. Everything the loop needs from the outside world
/// (events, drawing, widget dispatch, fresh document content) crosses
/// here, which is also what makes the loop testable against a scripted
/// stand-in.
pub trait Platform {
    /// Raw input event payload routed to the widget tree.
    type Input;

    /// Create the application window before any state is restored.
    fn create_window(&mut self, rect: Rect, ui_scale: f32);

    /// Sample live window state for the preferences file.
    fn snapshot(&self) -> WindowSnapshot;

    /// Cooperative redraw suppression around multi-step changes. The
    /// matching release arrives later as a `window.unfreeze` command.
    fn set_freeze_draw(&mut self, freeze: bool);

    /// Paint one frame.
    fn draw(&mut self);

    /// Switch the color palette.
    fn apply_theme(&mut self, theme: ColorTheme);

    /// Re-run widget layout after a metrics change.
    fn rearrange(&mut self);

    /// Next already-queued event, without blocking.
    fn poll_event(&mut self) -> Option<PlatformEvent<Self::Input>>;

    /// Block until an event arrives. `None` means the event source is
    /// gone and the loop should stop.
    fn wait_event(&mut self) -> Option<PlatformEvent<Self::Input>>;

    /// Platform-specific command interception, consulted before every
    /// other handler. Return true to consume the command.
    fn intercept_command(&mut self, _cmd: &Command) -> bool {
        false
    }

    /// Offer a command to the widget tree. UI-local commands are
    /// consumed here and never reach the global handlers.
    fn ui_dispatch(&mut self, cmd: &Command) -> bool;

    /// Route a raw input event through the widget tree.
    fn dispatch_input(&mut self, input: Self::Input) -> bool;

    /// Fresh content for a new tab.
    fn new_document(&mut self) -> Box<dyn DocumentContent>;

    /// Show the preferences dialog.
    fn open_preferences(&mut self, settings: &Settings);

    /// Hand a URL over to an external application.
    fn launch_external(&mut self, url: &str) -> Result<()> {
        open_in_default_browser(url)
    }
}

/// Open `url` with the operating system's default web browser.
pub fn open_in_default_browser(url: &str) -> Result<()> {
    open::that(url)?;
    Ok(())
}
