use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use crate::command::Command;

/// One queued item waiting for the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Posted {
    Command(Command),
    /// The quit signal. Not a command: it cannot be intercepted and
    /// always stops the loop.
    Quit,
}

/// Cloneable posting handle shared by every collaborator.
///
/// Posting never blocks and never runs the handler in place; the token
/// goes to the back of the queue and the loop dispatches it on a later
/// turn. That makes `post` safe to call from inside a handler. All
/// clones see the same queue; the whole bus is single-threaded.
#[derive(Clone, Default)]
pub struct CommandBus {
    queue: Rc<RefCell<VecDeque<Posted>>>,
    pending_refresh: Rc<Cell<bool>>,
    echo: Rc<Cell<bool>>,
}

impl CommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command for dispatch on a later loop turn.
    pub fn post(&self, cmd: Command) {
        if self.echo.get() {
            eprintln!("[command] {cmd}");
        }
        self.queue.borrow_mut().push_back(Posted::Command(cmd));
    }

    /// Parse-and-post convenience for literal tokens.
    pub fn post_str(&self, text: &str) {
        self.post(Command::new(text));
    }

    /// Queue the quit signal. The loop finishes the current iteration's
    /// redraw and cleanup before exiting.
    pub fn post_quit(&self) {
        self.queue.borrow_mut().push_back(Posted::Quit);
    }

    /// Pop the next queued item. Only the application loop drains.
    pub fn take(&self) -> Option<Posted> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Request a redraw at the end of the current loop iteration.
    /// Requests collapse into a flag, not a queue entry.
    pub fn post_refresh(&self) {
        self.pending_refresh.set(true);
    }

    pub fn refresh_pending(&self) -> bool {
        self.pending_refresh.get()
    }

    /// Clear the redraw flag, returning whether it was set.
    pub fn take_refresh(&self) -> bool {
        self.pending_refresh.replace(false)
    }

    /// Echo every posted token to stderr. Diagnostic toggle.
    pub fn set_echo(&self, on: bool) {
        self.echo.set(on);
    }

    pub fn echo(&self) -> bool {
        self.echo.get()
    }
}

/// Format a token and post it in one step.
///
/// ```
/// # use portolan::bus::CommandBus;
/// # use portolan::postf;
/// let bus = CommandBus::new();
/// postf!(bus, "tabs.switch page:{}", 3);
/// ```
#[macro_export]
macro_rules! postf {
    ($bus:expr, $($arg:tt)*) => {
        $bus.post($crate::command::Command::new(format!($($arg)*)))
    };
}
