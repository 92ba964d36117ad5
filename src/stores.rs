use std::collections::HashSet;
use std::path::Path;

/// Record of every URL the user has navigated to. The core only needs
/// membership and the visit hook; ranking and expiry are the store's
/// own business.
pub trait VisitedStore {
    /// Record a visit to `url`.
    fn visit(&mut self, url: &str);

    /// Whether `url` has been visited before.
    fn contains(&self, url: &str) -> bool;

    /// Load persisted entries from the data directory.
    fn load(&mut self, _dir: &Path) {}

    /// Persist entries into the data directory.
    fn save(&self, _dir: &Path) {}
}

/// User bookmarks keyed by URL.
pub trait BookmarkStore {
    fn add(&mut self, url: &str, title: &str);

    fn contains(&self, url: &str) -> bool;

    fn load(&mut self, _dir: &Path) {}

    fn save(&self, _dir: &Path) {}
}

/// In-memory visited set with no persistence.
#[derive(Default)]
pub struct MemoryVisited {
    urls: HashSet<String>,
}

impl MemoryVisited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl VisitedStore for MemoryVisited {
    fn visit(&mut self, url: &str) {
        self.urls.insert(url.to_string());
    }

    fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }
}

/// In-memory bookmark list with no persistence.
#[derive(Default)]
pub struct MemoryBookmarks {
    entries: Vec<(String, String)>,
}

impl MemoryBookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(url, title)` pairs in insertion order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BookmarkStore for MemoryBookmarks {
    fn add(&mut self, url: &str, title: &str) {
        self.entries.push((url.to_string(), title.to_string()));
    }

    fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|(entry, _)| entry == url)
    }
}
