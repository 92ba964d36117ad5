use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::bus::{CommandBus, Posted};
use crate::command::Command;
use crate::document::{Tab, TabId};
use crate::error::Result;
use crate::platform::{Platform, PlatformEvent};
use crate::postf;
use crate::session;
use crate::settings::{self, ColorTheme, Settings, MAX_ZOOM_PERCENT, MIN_ZOOM_PERCENT};
use crate::stores::{BookmarkStore, VisitedStore};
use crate::tabs::TabList;
use crate::ticker::Tickers;

/// How far `process_events` goes looking for events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMode {
    /// Block for new platform events once nothing else is pending.
    Wait,
    /// Drain posted commands and already-queued events; never block.
    PostedOnly,
}

/// Construction-time knobs that would come from the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Echo every posted command to stderr.
    pub command_echo: bool,
    /// Override the data directory; defaults to the per-user one.
    pub data_dir: Option<PathBuf>,
}

/// Global command names, one variant per handler. Keeping the table an
/// enum means a test can walk every entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    RetainWindow,
    Open,
    RequestCancelled,
    TabsNew,
    TabsClose,
    Quit,
    Preferences,
    NavigateHome,
    ZoomSet,
    ZoomDelta,
    BookmarkAdd,
    ThemeSet,
}

impl AppCommand {
    pub const ALL: [AppCommand; 12] = [
        AppCommand::RetainWindow,
        AppCommand::Open,
        AppCommand::RequestCancelled,
        AppCommand::TabsNew,
        AppCommand::TabsClose,
        AppCommand::Quit,
        AppCommand::Preferences,
        AppCommand::NavigateHome,
        AppCommand::ZoomSet,
        AppCommand::ZoomDelta,
        AppCommand::BookmarkAdd,
        AppCommand::ThemeSet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AppCommand::RetainWindow => "retainwindow",
            AppCommand::Open => "open",
            AppCommand::RequestCancelled => "document.request.cancelled",
            AppCommand::TabsNew => "tabs.new",
            AppCommand::TabsClose => "tabs.close",
            AppCommand::Quit => "quit",
            AppCommand::Preferences => "preferences",
            AppCommand::NavigateHome => "navigate.home",
            AppCommand::ZoomSet => "zoom.set",
            AppCommand::ZoomDelta => "zoom.delta",
            AppCommand::BookmarkAdd => "bookmark.add",
            AppCommand::ThemeSet => "theme.set",
        }
    }

    pub fn from_name(name: &str) -> Option<AppCommand> {
        AppCommand::ALL.iter().copied().find(|cmd| cmd.name() == name)
    }
}

/// The application context: tabs, settings, stores, the bus and the
/// platform, owned in one place and reached through `&mut self`
/// instead of an ambient global.
pub struct App<P: Platform> {
    platform: P,
    bus: CommandBus,
    tickers: Tickers,
    tabs: TabList,
    settings: Settings,
    visited: Box<dyn VisitedStore>,
    bookmarks: Box<dyn BookmarkStore>,
    data_dir: PathBuf,
    running: bool,
}

impl<P: Platform> App<P> {
    pub fn new(
        platform: P,
        visited: Box<dyn VisitedStore>,
        bookmarks: Box<dyn BookmarkStore>,
        options: AppOptions,
    ) -> Self {
        let bus = CommandBus::new();
        bus.set_echo(options.command_echo);
        let tickers = Tickers::new(bus.clone());
        Self {
            platform,
            bus,
            tickers,
            tabs: TabList::new(),
            settings: Settings {
                command_echo: options.command_echo,
                ..Settings::default()
            },
            visited,
            bookmarks,
            data_dir: options.data_dir.unwrap_or_else(settings::default_data_dir),
            running: false,
        }
    }

    /// Posting handle; clone it into collaborators freely.
    pub fn bus(&self) -> &CommandBus {
        &self.bus
    }

    /// Ticker scheduling handle.
    pub fn tickers(&self) -> &Tickers {
        &self.tickers
    }

    pub fn tabs(&self) -> &TabList {
        &self.tabs
    }

    /// Resolve a tab handle; stale handles return `None`.
    pub fn find_tab(&self, id: TabId) -> Option<&Tab> {
        self.tabs.get(id)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn visited(&self) -> &dyn VisitedStore {
        self.visited.as_ref()
    }

    pub fn bookmarks(&self) -> &dyn BookmarkStore {
        self.bookmarks.as_ref()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Drive the whole lifecycle: initialize, loop until the quit
    /// signal, then persist everything and tear down.
    pub fn run(&mut self) -> Result<()> {
        self.running = true;
        self.init()?;
        while self.running {
            self.tickers.run_due();
            self.process_events(EventMode::Wait);
            self.refresh();
            self.tabs.reclaim();
        }
        self.shutdown()
    }

    fn init(&mut self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        settings::load_prefs(&self.data_dir, &mut self.settings, &self.bus);
        self.visited.load(&self.data_dir);
        self.bookmarks.load(&self.data_dir);
        self.platform
            .create_window(self.settings.initial_window_rect, self.settings.ui_scale);
        if self.tabs.is_empty() {
            self.new_tab(false);
        }
        // Replay preference commands before touching saved state.
        self.process_events(EventMode::PostedOnly);
        if !self.load_saved_state() {
            self.bus.post_str("navigate.home");
        }
        self.bus.post_str("window.unfreeze");
        Ok(())
    }

    /// Restore tabs from the state file. Returns false when there was
    /// nothing usable, in which case the caller falls back to the home
    /// document; tabs restored before a mid-file error are kept.
    fn load_saved_state(&mut self) -> bool {
        let path = session::state_path(&self.data_dir);
        let Ok(mut file) = fs::File::open(&path) else {
            return false;
        };
        let platform = &mut self.platform;
        let mut make = || platform.new_document();
        match session::load_state(&mut self.tabs, &mut make, &mut file) {
            Ok(Some(active)) => {
                debug!("restored {} tabs", self.tabs.len());
                self.tabs.set_active(active);
                postf!(self.bus, "tabs.switch page:{active}");
                true
            }
            Ok(None) => true,
            Err(err) => {
                warn!("{}: {err}", path.display());
                false
            }
        }
    }

    fn shutdown(&mut self) -> Result<()> {
        session::save_state_file(&self.data_dir, &self.tabs)?;
        settings::save_prefs(&self.data_dir, &self.settings, &self.platform.snapshot())?;
        self.bookmarks.save(&self.data_dir);
        self.visited.save(&self.data_dir);
        Ok(())
    }

    /// Drain posted commands and platform events until both are empty.
    ///
    /// Posted commands always go first; each dispatch may post more,
    /// and those run within the same drain, in posting order. In `Wait`
    /// mode the call then blocks for a platform event, but only while
    /// no redraw is pending and no ticker is scheduled; either one
    /// demands a frame, so the platform is merely polled.
    pub fn process_events(&mut self, mode: EventMode) {
        loop {
            if let Some(item) = self.bus.take() {
                match item {
                    Posted::Quit => {
                        self.running = false;
                        break;
                    }
                    Posted::Command(cmd) => {
                        self.dispatch(&cmd);
                    }
                }
                continue;
            }
            let block = mode == EventMode::Wait
                && !self.bus.refresh_pending()
                && self.tickers.is_empty();
            let event = if block {
                self.platform.wait_event()
            } else {
                self.platform.poll_event()
            };
            let Some(event) = event else {
                if block {
                    // The event source is gone; nothing left to wait for.
                    self.running = false;
                }
                break;
            };
            match event {
                PlatformEvent::Quit => {
                    self.running = false;
                    break;
                }
                PlatformEvent::DropFile(path) => {
                    postf!(self.bus, "open url:file://{path}");
                }
                PlatformEvent::Input(input) => {
                    self.platform.dispatch_input(input);
                }
            }
        }
    }

    fn refresh(&mut self) {
        self.platform.draw();
        self.bus.take_refresh();
    }

    /// Route one command through the handler chain: the platform hook
    /// first, then the widget tree, then the global table. Returns
    /// whether any stage consumed the command.
    pub fn dispatch(&mut self, cmd: &Command) -> bool {
        if self.platform.intercept_command(cmd) {
            return true;
        }
        let ui_handled = self.platform.ui_dispatch(cmd);
        // Metrics affect every widget; re-layout no matter who handled.
        if cmd.is("metrics.changed") {
            self.platform.rearrange();
        }
        if ui_handled {
            return true;
        }
        self.handle_command(cmd)
    }

    fn handle_command(&mut self, cmd: &Command) -> bool {
        let Some(op) = AppCommand::from_name(cmd.name()) else {
            debug!("unhandled command: {cmd}");
            return false;
        };
        match op {
            AppCommand::RetainWindow => {
                self.settings.retain_window_size = cmd.arg() != 0;
                true
            }
            AppCommand::Open => self.handle_open(cmd),
            AppCommand::RequestCancelled => {
                // Reported for diagnostics; deliberately left unhandled.
                debug!("request cancelled: {cmd}");
                false
            }
            AppCommand::TabsNew => {
                let duplicate = cmd.int_arg("duplicate") != 0;
                self.new_tab(duplicate);
                if !duplicate {
                    self.bus.post_str("navigate.home");
                }
                true
            }
            AppCommand::TabsClose => self.handle_tabs_close(cmd),
            AppCommand::Quit => {
                self.bus.post_quit();
                true
            }
            AppCommand::Preferences => {
                self.platform.open_preferences(&self.settings);
                true
            }
            AppCommand::NavigateHome => {
                self.bus.post_str("open url:about:home");
                true
            }
            AppCommand::ZoomSet => {
                self.apply_zoom(cmd.arg());
                true
            }
            AppCommand::ZoomDelta => {
                let mut delta = cmd.arg();
                // Zoomed out, steps are finer; the same applies when
                // stepping down from exactly 100%.
                if self.settings.zoom_percent < 100
                    || (delta < 0 && self.settings.zoom_percent == 100)
                {
                    delta /= 2;
                }
                self.apply_zoom(self.settings.zoom_percent + delta);
                true
            }
            AppCommand::BookmarkAdd => {
                if let Some(tab) = self.tabs.active_tab() {
                    self.bookmarks.add(tab.content.url(), &tab.content.title());
                    self.bus.post_str("bookmarks.changed");
                }
                true
            }
            AppCommand::ThemeSet => {
                if let Some(theme) = ColorTheme::from_id(cmd.arg()) {
                    self.settings.theme = theme;
                    self.platform.apply_theme(theme);
                    self.bus.post_str("theme.changed");
                }
                true
            }
        }
    }

    /// Which tab an `open` targets: explicit `doc:` handle, then the
    /// implicit source handle, then the active tab. Stale handles fall
    /// through to the next rule.
    fn resolve_target(&self, cmd: &Command) -> Option<TabId> {
        cmd.tab_arg("doc")
            .filter(|&id| self.tabs.get(id).is_some())
            .or_else(|| cmd.source().filter(|&id| self.tabs.get(id).is_some()))
            .or_else(|| self.tabs.active_id())
    }

    fn handle_open(&mut self, cmd: &Command) -> bool {
        let Some(url) = cmd.suffix_arg("url") else {
            return true;
        };
        if let Some(scheme) = url.split(':').next() {
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") {
                // Not ours; hand over and stop.
                if let Err(err) = self.platform.launch_external(url) {
                    warn!("failed to open {url} externally: {err}");
                }
                return true;
            }
        }
        let target = if cmd.int_arg("newtab") != 0 {
            self.new_tab(false)
        } else {
            match self.resolve_target(cmd) {
                Some(id) => id,
                None => self.new_tab(false),
            }
        };
        let from_history = cmd.int_arg("history") != 0;
        let redirect = cmd.int_arg("redirect") != 0;
        if !from_history {
            if let Some(tab) = self.tabs.get_mut(target) {
                if redirect {
                    tab.content.history_replace(url);
                } else {
                    tab.content.history_add(url);
                }
            }
        }
        self.visited.visit(url);
        if let Some(tab) = self.tabs.get_mut(target) {
            tab.content.set_initial_scroll(cmd.float_arg("scroll"));
            tab.content.begin_load(url, from_history);
        }
        true
    }

    fn handle_tabs_close(&mut self, cmd: &Command) -> bool {
        let Some(active) = self.tabs.active_id() else {
            return true;
        };
        let mut closed_many = false;
        if cmd.int_arg("toright") != 0 {
            self.tabs.close_right_of(active);
            closed_many = true;
        }
        if cmd.int_arg("toleft") != 0 {
            self.tabs.close_left_of(active);
            postf!(self.bus, "tabs.switch page:{active}");
            closed_many = true;
        }
        if closed_many {
            return true;
        }
        if self.tabs.len() > 1 {
            self.tabs.remove(active);
            if let Some(next) = self.tabs.active_id() {
                postf!(self.bus, "tabs.switch page:{next}");
            }
        } else {
            // Closing the last tab closes the application.
            self.bus.post_str("quit");
        }
        true
    }

    /// Open a tab, activate it and notify the UI. `duplicate` clones
    /// the active tab's content instead of starting blank.
    fn new_tab(&mut self, duplicate: bool) -> TabId {
        let content = match self.tabs.active_tab() {
            Some(tab) if duplicate => tab.content.duplicate(),
            _ => self.platform.new_document(),
        };
        let id = self.tabs.add(content);
        postf!(self.bus, "tabs.switch page:{id}");
        id
    }

    /// Clamp and apply a zoom level, with redraws suppressed until the
    /// UI acknowledges the font change.
    fn apply_zoom(&mut self, percent: i32) {
        self.platform.set_freeze_draw(true);
        self.settings.zoom_percent = percent.clamp(MIN_ZOOM_PERCENT, MAX_ZOOM_PERCENT);
        self.bus.post_str("font.changed");
        self.bus.post_str("window.unfreeze");
    }
}
