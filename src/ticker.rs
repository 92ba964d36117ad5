use std::cell::RefCell;
use std::collections::BTreeMap;
use std::mem;
use std::rc::Rc;

use crate::bus::CommandBus;
use crate::document::TabId;

/// Identity of the context a ticker runs for. Scheduling is deduplicated
/// per key, so a widget animating every frame holds one slot no matter
/// how often it re-schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickerKey(pub u64);

impl From<TabId> for TickerKey {
    fn from(id: TabId) -> Self {
        TickerKey(id.0)
    }
}

type TickerFn = Box<dyn FnMut()>;

/// One-shot per-frame callbacks, ordered by context identity.
///
/// `run_due` takes the whole pending set before running it, so a
/// callback re-scheduling itself lands in the next frame's batch
/// instead of spinning the current one.
#[derive(Clone)]
pub struct Tickers {
    pending: Rc<RefCell<BTreeMap<TickerKey, TickerFn>>>,
    bus: CommandBus,
}

impl Tickers {
    pub fn new(bus: CommandBus) -> Self {
        Self {
            pending: Rc::new(RefCell::new(BTreeMap::new())),
            bus,
        }
    }

    /// Schedule `callback` to run once on the next frame. Re-scheduling
    /// the same key before the batch fires replaces the callback.
    pub fn schedule(&self, key: TickerKey, callback: impl FnMut() + 'static) {
        self.pending.borrow_mut().insert(key, Box::new(callback));
    }

    /// Drop a pending callback.
    pub fn cancel(&self, key: TickerKey) {
        self.pending.borrow_mut().remove(&key);
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Run every pending callback in key order and request a redraw if
    /// there were any.
    pub fn run_due(&self) {
        let due = mem::take(&mut *self.pending.borrow_mut());
        if due.is_empty() {
            return;
        }
        self.bus.post_refresh();
        for (_, mut callback) in due {
            callback();
        }
    }
}
