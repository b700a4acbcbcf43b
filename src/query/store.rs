//! Single source of truth for the active query.
//!
//! Async operations that depend on "current" filter state must read it
//! through [`QueryStore::current`] at the moment they execute, never from a
//! value captured when they were scheduled. `merge` and `reset` update the
//! canonical value before returning, so a caller that immediately re-reads
//! observes the just-applied change.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{HistoryQuery, QueryPatch};

/// Shared, synchronous cell holding the canonical [`HistoryQuery`].
///
/// Clones share the same underlying cell. No operation here performs I/O.
#[derive(Debug, Clone, Default)]
pub struct QueryStore {
    inner: Arc<Mutex<HistoryQuery>>,
}

impl QueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The canonical query as of this call.
    pub fn current(&self) -> HistoryQuery {
        self.inner.lock().clone()
    }

    /// Shallow-merge `patch` into the canonical query and return the new
    /// full value.
    pub fn merge(&self, patch: QueryPatch) -> HistoryQuery {
        let mut query = self.inner.lock();
        query.apply(patch);
        query.clone()
    }

    /// Restore the default query and return it.
    pub fn reset(&self) -> HistoryQuery {
        let mut query = self.inner.lock();
        *query = HistoryQuery::default();
        query.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{DateRange, SortField, SortOrder};

    #[test]
    fn test_merge_is_visible_to_immediate_reread() {
        let store = QueryStore::new();
        let merged = store.merge(QueryPatch::defect_type("spur"));
        assert_eq!(merged.defect_type, "spur");
        assert_eq!(store.current(), merged);
    }

    #[test]
    fn test_clones_share_the_canonical_value() {
        let store = QueryStore::new();
        let handle = store.clone();
        store.merge(QueryPatch::search("B-204"));
        assert_eq!(handle.current().search, "B-204");
    }

    #[test]
    fn test_sequential_merges_all_land() {
        let store = QueryStore::new();
        store.merge(QueryPatch::search("x"));
        store.merge(QueryPatch {
            date_range: Some(DateRange::Week),
            ..Default::default()
        });
        store.merge(QueryPatch::sort(SortField::DefectCount, SortOrder::Asc));

        let q = store.current();
        assert_eq!(q.search, "x");
        assert_eq!(q.date_range, DateRange::Week);
        assert_eq!(q.sort_by, SortField::DefectCount);
        assert_eq!(q.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_reset_restores_defaults() {
        let store = QueryStore::new();
        store.merge(QueryPatch::defect_type("short"));
        let after = store.reset();
        assert_eq!(after, HistoryQuery::default());
        assert_eq!(store.current(), HistoryQuery::default());
    }
}
