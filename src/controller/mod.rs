//! Query state controller.
//!
//! [`HistoryController`] keeps the remote, paginated detection-history
//! collection synchronized with local state: the canonical query, the
//! loaded record window, the multi-select set, and the load/error phase.
//!
//! The central correctness requirement is the latest-query invariant: a
//! fetch dispatched without an explicit query reads the canonical
//! [`QueryStore`] at call time, never a value captured when the fetch was
//! scheduled. Overlapping fetches are additionally fenced with a request
//! generation, so a slow stale response can never overwrite the result of
//! a newer one.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{HistoryError, Result};
use crate::gateway::DetectionGateway;
use crate::query::{HistoryQuery, QueryPatch, QueryStore, SortField, SortOrder};
use crate::types::{AggregateStats, DefectTypeOption, DetectionRecord, PageInfo};

pub mod selection;

pub use selection::SelectionManager;

/// Shown in filter dropdowns when the server cannot enumerate the
/// defect types present in the collection.
static DEFAULT_DEFECT_TYPES: Lazy<Vec<DefectTypeOption>> = Lazy::new(|| {
    vec![
        DefectTypeOption::new("missing_hole", "Missing hole"),
        DefectTypeOption::new("mouse_bite", "Mouse bite"),
        DefectTypeOption::new("open_circuit", "Open circuit"),
        DefectTypeOption::new("short", "Short"),
        DefectTypeOption::new("spur", "Spur"),
        DefectTypeOption::new("spurious_copper", "Spurious copper"),
    ]
});

/// Fetch lifecycle: `Idle → Loading → (Success | Error)`. Any fetch call
/// from `Error` transitions back to `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// State owned exclusively by the controller.
#[derive(Debug)]
struct ControllerState {
    records: Vec<DetectionRecord>,
    page: PageInfo,
    phase: LoadPhase,
    error: Option<String>,
    defect_types: Vec<DefectTypeOption>,
    stats: Option<AggregateStats>,
}

/// Plain read model exposed upward to the presentation layer.
#[derive(Debug, Clone)]
pub struct HistoryView {
    pub records: Vec<DetectionRecord>,
    pub page: PageInfo,
    pub query: HistoryQuery,
    pub phase: LoadPhase,
    pub error: Option<String>,
    pub selected_ids: Vec<String>,
    pub all_selected: bool,
    pub is_loading: bool,
}

/// Orchestrates fetching against the remote collection gateway.
pub struct HistoryController {
    gateway: Arc<dyn DetectionGateway>,
    store: QueryStore,
    selection: SelectionManager,
    state: Mutex<ControllerState>,
    /// Generation of the most recently dispatched fetch
    issued: AtomicU64,
    page_size: u32,
    timeout: Duration,
}

impl HistoryController {
    pub fn new(gateway: Arc<dyn DetectionGateway>, page_size: u32, timeout: Duration) -> Self {
        Self {
            gateway,
            store: QueryStore::new(),
            selection: SelectionManager::new(),
            state: Mutex::new(ControllerState {
                records: Vec::new(),
                page: PageInfo::empty(page_size),
                phase: LoadPhase::Idle,
                error: None,
                defect_types: Vec::new(),
                stats: None,
            }),
            issued: AtomicU64::new(0),
            page_size,
            timeout,
        }
    }

    pub fn store(&self) -> &QueryStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Fetch `page` of the collection. When `query` is omitted the
    /// canonical store is read at call time.
    ///
    /// On success the held record list and page metadata are replaced and
    /// the selection is pruned to the new ids. On failure the previously
    /// loaded records are left untouched and the error is retained so the
    /// caller can show both. A response that has been superseded by a
    /// newer dispatch is discarded without touching anything.
    pub async fn fetch(&self, page: u32, query: Option<HistoryQuery>) -> Result<()> {
        if page == 0 {
            return Err(HistoryError::InvalidPage(page));
        }
        let query = query.unwrap_or_else(|| self.store.current());

        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().phase = LoadPhase::Loading;

        let outcome = self
            .with_timeout(self.gateway.list_records(&query, page, self.page_size))
            .await;

        let mut state = self.state.lock();
        if generation != self.issued.load(Ordering::SeqCst) {
            debug!(generation, "discarding superseded fetch response");
            return Ok(());
        }

        match outcome {
            Ok(record_page) => {
                let info = record_page.page_info(self.page_size);
                state.records = record_page.records;
                state.page = info;
                state.phase = LoadPhase::Success;
                state.error = None;

                let current_ids: HashSet<String> =
                    state.records.iter().map(|r| r.id.clone()).collect();
                drop(state);
                self.selection.prune(&current_ids);
                Ok(())
            }
            Err(e) => {
                state.phase = LoadPhase::Error;
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Merge `patch` into the canonical query and fetch page 1 of the
    /// merged result. Changing any filter always resets to page 1.
    pub async fn set_filter(&self, patch: QueryPatch) -> Result<()> {
        let merged = self.store.merge(patch);
        self.fetch(1, Some(merged)).await
    }

    /// Change the sort specification; resets to page 1 like any filter
    /// change.
    pub async fn set_sort(&self, sort_by: SortField, sort_order: SortOrder) -> Result<()> {
        let merged = self.store.merge(QueryPatch::sort(sort_by, sort_order));
        self.fetch(1, Some(merged)).await
    }

    /// Navigate to page `n` with the current query unchanged. A no-op when
    /// `n` is the current page or outside the last-known page range.
    pub async fn go_to_page(&self, n: u32) -> Result<()> {
        {
            let state = self.state.lock();
            if n == state.page.page || !state.page.contains(n) {
                return Ok(());
            }
        }
        self.fetch(n, None).await
    }

    /// Restore the default query and fetch page 1.
    pub async fn clear_filters(&self) -> Result<()> {
        let default = self.store.reset();
        self.fetch(1, Some(default)).await
    }

    /// Re-fetch the current page with the current query. Used after
    /// mutations change the underlying total.
    pub async fn refresh(&self) -> Result<()> {
        let page = self.state.lock().page.page;
        self.fetch(page, None).await
    }

    /// Defect-type filter options. Falls back to the last good answer, or
    /// to a static default list, so a lookup failure never blocks the
    /// filter UI.
    pub async fn available_defect_types(&self) -> Vec<DefectTypeOption> {
        match self
            .with_timeout(self.gateway.get_available_defect_types())
            .await
        {
            Ok(types) => {
                self.state.lock().defect_types = types.clone();
                types
            }
            Err(e) => {
                warn!(error = %e, "defect-type lookup failed, using fallback options");
                let cached = self.state.lock().defect_types.clone();
                if cached.is_empty() {
                    DEFAULT_DEFECT_TYPES.clone()
                } else {
                    cached
                }
            }
        }
    }

    /// Re-fetch aggregate stats. A failure retains the previous value.
    pub async fn refresh_stats(&self) -> Result<AggregateStats> {
        let stats = self
            .with_timeout(self.gateway.get_aggregate_stats())
            .await?;
        self.state.lock().stats = Some(stats);
        Ok(stats)
    }

    pub fn stats(&self) -> Option<AggregateStats> {
        self.state.lock().stats
    }

    pub fn records(&self) -> Vec<DetectionRecord> {
        self.state.lock().records.clone()
    }

    pub fn record_ids(&self) -> Vec<String> {
        self.state.lock().records.iter().map(|r| r.id.clone()).collect()
    }

    pub fn page_info(&self) -> PageInfo {
        self.state.lock().page
    }

    pub fn phase(&self) -> LoadPhase {
        self.state.lock().phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase() == LoadPhase::Loading
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Compute the full read model for rendering.
    pub fn view(&self) -> HistoryView {
        let state = self.state.lock();
        let current_ids: Vec<String> = state.records.iter().map(|r| r.id.clone()).collect();
        HistoryView {
            records: state.records.clone(),
            page: state.page,
            query: self.store.current(),
            phase: state.phase,
            error: state.error.clone(),
            selected_ids: self.selection.ids(),
            all_selected: !current_ids.is_empty() && self.selection.is_all_selected(&current_ids),
            is_loading: state.phase == LoadPhase::Loading,
        }
    }

    async fn with_timeout<T>(
        &self,
        operation: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.timeout, operation).await {
            Ok(result) => result,
            Err(_) => Err(HistoryError::Timeout(self.timeout.as_secs())),
        }
    }
}
