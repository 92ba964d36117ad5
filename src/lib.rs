//! Application core of a tabbed document browser: the command bus, the
//! event loop, session persistence and preferences.
//!
//! Everything user-facing happens as a [`Command`]: a text token such
//! as `open newtab:1 url:about:home`, posted to the [`CommandBus`] and
//! dispatched by the [`App`] loop on a later turn. The windowing and
//! rendering side lives behind the [`Platform`] trait; document
//! content, visited history and bookmarks behind their own traits. The
//! whole core is single-threaded.
//!
//! # Structure
//!
//! - `command` / `bus` - Command tokens, the posted queue, echo
//! - `ticker` - One-shot per-frame callbacks
//! - `document` / `tabs` - Tab handles, content seam, deferred close
//! - `session` - The versioned binary state container
//! - `settings` - Preferences and their command-token file
//! - `platform` / `stores` - Collaborator boundaries
//! - `app` - The handler table and the application loop

pub mod app;
pub mod bus;
pub mod command;
pub mod document;
pub mod error;
pub mod platform;
pub mod session;
pub mod settings;
pub mod stores;
pub mod tabs;
pub mod ticker;

// Re-exports for convenient external access
pub use app::{App, AppCommand, AppOptions, EventMode};
pub use bus::{CommandBus, Posted};
pub use command::Command;
pub use document::{DocumentContent, Tab, TabId};
pub use error::{AppError, Result};
pub use platform::{Platform, PlatformEvent, Rect, SidebarState, WindowSnapshot};
pub use session::{load_state, save_state, save_state_file, state_path};
pub use settings::{ColorTheme, Settings};
pub use stores::{BookmarkStore, MemoryBookmarks, MemoryVisited, VisitedStore};
pub use tabs::TabList;
pub use ticker::{TickerKey, Tickers};
