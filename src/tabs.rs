use crate::document::{DocumentContent, Tab, TabId};

/// The open tabs, in display order, plus the graveyard of tabs closed
/// during the current loop iteration.
///
/// Closing only moves a tab into the graveyard; the memory is released
/// by `reclaim` at the loop-iteration boundary, after every handler
/// queued for the iteration has run. A handler holding a handle to a
/// just-closed tab therefore fails lookup instead of touching freed
/// content.
pub struct TabList {
    tabs: Vec<Tab>,
    active: Option<TabId>,
    next_id: u64,
    graveyard: Vec<Tab>,
}

impl TabList {
    pub fn new() -> Self {
        Self {
            tabs: Vec::new(),
            active: None,
            next_id: 1,
            graveyard: Vec::new(),
        }
    }

    /// Append a tab and make it active. Returns the new handle.
    pub fn add(&mut self, content: Box<dyn DocumentContent>) -> TabId {
        let id = TabId(self.next_id);
        self.next_id += 1;
        self.tabs.push(Tab { id, content });
        self.active = Some(id);
        id
    }

    pub fn active_id(&self) -> Option<TabId> {
        self.active
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_tab_mut(&mut self) -> Option<&mut Tab> {
        let id = self.active?;
        self.get_mut(id)
    }

    /// Make `id` active if it is still open; stale handles are ignored.
    pub fn set_active(&mut self, id: TabId) {
        if self.position(id).is_some() {
            self.active = Some(id);
        }
    }

    pub fn get(&self, id: TabId) -> Option<&Tab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab> {
        self.tabs.iter_mut().find(|tab| tab.id == id)
    }

    /// Display position of `id`, if open.
    pub fn position(&self, id: TabId) -> Option<usize> {
        self.tabs.iter().position(|tab| tab.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab> {
        self.tabs.iter()
    }

    /// Close `id`. When the active tab closes, activation moves to the
    /// tab that took its display position, clamped to the new last tab.
    pub fn remove(&mut self, id: TabId) {
        let Some(index) = self.position(id) else {
            return;
        };
        let tab = self.tabs.remove(index);
        self.graveyard.push(tab);
        if self.active == Some(id) {
            self.active = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[index.min(self.tabs.len() - 1)].id)
            };
        }
    }

    /// Close every tab to the right of `id`. Returns how many closed.
    pub fn close_right_of(&mut self, id: TabId) -> usize {
        let Some(index) = self.position(id) else {
            return 0;
        };
        let before = self.graveyard.len();
        self.graveyard.extend(self.tabs.drain(index + 1..));
        self.reactivate_if_closed(id);
        self.graveyard.len() - before
    }

    /// Close every tab to the left of `id`. Returns how many closed.
    pub fn close_left_of(&mut self, id: TabId) -> usize {
        let Some(index) = self.position(id) else {
            return 0;
        };
        let before = self.graveyard.len();
        self.graveyard.extend(self.tabs.drain(..index));
        self.reactivate_if_closed(id);
        self.graveyard.len() - before
    }

    fn reactivate_if_closed(&mut self, fallback: TabId) {
        match self.active {
            Some(active) if self.position(active).is_some() => {}
            _ => self.active = Some(fallback),
        }
    }

    /// Number of closed tabs waiting for the next `reclaim`.
    pub fn pending_reclaim(&self) -> usize {
        self.graveyard.len()
    }

    /// Release everything closed since the last call. Runs once per
    /// loop iteration, after handlers and the redraw.
    pub fn reclaim(&mut self) -> usize {
        let count = self.graveyard.len();
        self.graveyard.clear();
        count
    }
}

impl Default for TabList {
    fn default() -> Self {
        Self::new()
    }
}
