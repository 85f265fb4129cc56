// ── Stream directory ──
//
// Immutable directory snapshots behind an atomically swapped pointer.

mod directory;
mod refresh;

use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use tokio::sync::watch;

pub use directory::{Directory, PlatformChoice};
pub use refresh::RebuildReport;

/// Holder of the current [`Directory`].
///
/// Readers take a cheap `Arc` snapshot and keep working on it even if a
/// poll swaps in a new directory meanwhile; there is exactly one writer
/// (the poll step), which always replaces the whole directory at once.
pub struct DirectoryStore {
    current: ArcSwap<Directory>,
    last_refresh: watch::Sender<Option<DateTime<Utc>>>,
}

impl DirectoryStore {
    pub fn new() -> Self {
        let (last_refresh, _) = watch::channel(None);
        Self {
            current: ArcSwap::from_pointee(Directory::default()),
            last_refresh,
        }
    }

    /// Current directory snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Directory> {
        self.current.load_full()
    }

    /// Swap in a freshly built directory and stamp the refresh time.
    pub(crate) fn replace(&self, directory: Directory) {
        self.current.store(Arc::new(directory));
        self.last_refresh.send_replace(Some(Utc::now()));
    }

    /// Drop every record (used on shutdown).
    pub(crate) fn clear(&self) {
        self.current.store(Arc::new(Directory::default()));
    }

    /// Time of the last successful rebuild.
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        *self.last_refresh.borrow()
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::new()
    }
}
