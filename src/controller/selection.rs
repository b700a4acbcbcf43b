//! Multi-select state for batch actions.
//!
//! A selection only ever refers to records in the last-fetched result set;
//! the controller calls [`SelectionManager::prune`] whenever it replaces
//! the record list so stale ids cannot linger into a batch operation.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// The set of record ids marked for batch action.
///
/// Clones share the same underlying set. All operations are synchronous,
/// pure state transitions with no I/O; none of them can fail.
#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&self, id: &str) {
        let mut ids = self.inner.lock();
        if !ids.remove(id) {
            ids.insert(id.to_string());
        }
    }

    /// Remove a single id, if present.
    pub fn remove(&self, id: &str) {
        self.inner.lock().remove(id);
    }

    /// Select every id in `current_ids`, unless they are already all
    /// selected, in which case clear. Acts as a toggle so a repeated
    /// "select all" gesture deselects.
    pub fn select_all(&self, current_ids: &[String]) {
        let mut ids = self.inner.lock();
        let all_selected =
            ids.len() == current_ids.len() && current_ids.iter().all(|id| ids.contains(id));
        if all_selected {
            ids.clear();
        } else {
            *ids = current_ids.iter().cloned().collect();
        }
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    pub fn is_all_selected(&self, current_ids: &[String]) -> bool {
        let ids = self.inner.lock();
        ids.len() == current_ids.len() && current_ids.iter().all(|id| ids.contains(id))
    }

    /// Drop ids that are not in `current_ids`. Called after every
    /// successful fetch so the selection stays a subset of the loaded
    /// record list.
    pub fn prune(&self, current_ids: &HashSet<String>) {
        self.inner.lock().retain(|id| current_ids.contains(id));
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Snapshot of the selected ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.inner.lock().iter().cloned().collect();
        ids.sort();
        ids
    }
}
