//! Batch delete/export coordination.
//!
//! [`BatchCoordinator`] executes delete/export across the current
//! selection, reports progress text, tolerates partial failure, and runs
//! the fixed post-mutation sequence: mutate remotely, clear the local
//! selection, refresh the record list, refresh aggregate stats. Nothing
//! here reorders that sequence; displaying a stale selection after a
//! delete is a correctness bug.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::controller::HistoryController;
use crate::error::{HistoryError, Result};
use crate::gateway::{BatchDeleteOutcome, DetectionGateway, ExportArchive};

/// How long a finished operation's progress text stays visible.
pub const DISPLAY_WINDOW: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Delete,
    Export,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchStatus {
    #[default]
    Idle,
    Running,
    Succeeded,
    /// Completed with some per-item failures; a qualified success, not an
    /// error.
    PartiallyFailed,
    Failed,
}

impl BatchStatus {
    /// True once the operation reached the server and came back, in any
    /// final state.
    pub fn is_completed(&self) -> bool {
        matches!(
            self,
            BatchStatus::Succeeded | BatchStatus::PartiallyFailed | BatchStatus::Failed
        )
    }
}

/// Transient state for an in-flight or recently finished batch operation.
#[derive(Debug, Clone, Default)]
pub struct BatchOperation {
    pub kind: Option<BatchKind>,
    pub target_ids: Vec<String>,
    pub status: BatchStatus,
    pub progress_text: String,
    pub success_count: u32,
    pub fail_count: u32,
}

/// Executes batch operations against the gateway on behalf of the
/// controller's selection.
pub struct BatchCoordinator {
    controller: Arc<HistoryController>,
    gateway: Arc<dyn DetectionGateway>,
    operation: Arc<Mutex<BatchOperation>>,
    /// Bumped at every operation start so a display-window timer from an
    /// older operation never clears a newer one's text
    epoch: Arc<AtomicU64>,
    timeout: Duration,
    display_window: Duration,
}

impl BatchCoordinator {
    pub fn new(
        controller: Arc<HistoryController>,
        gateway: Arc<dyn DetectionGateway>,
        timeout: Duration,
    ) -> Self {
        Self {
            controller,
            gateway,
            operation: Arc::new(Mutex::new(BatchOperation::default())),
            epoch: Arc::new(AtomicU64::new(0)),
            timeout,
            display_window: DISPLAY_WINDOW,
        }
    }

    /// Override the progress display window; test hook.
    pub fn with_display_window(mut self, window: Duration) -> Self {
        self.display_window = window;
        self
    }

    /// Snapshot of the current batch operation state.
    pub fn operation(&self) -> BatchOperation {
        self.operation.lock().clone()
    }

    /// Export the given records as an archive.
    ///
    /// Receiving the archive bytes is the explicit completion signal;
    /// writing them somewhere is the caller's concern and outside this
    /// state machine.
    pub async fn export_selected(&self, ids: &[String]) -> Result<ExportArchive> {
        if ids.is_empty() {
            return Err(HistoryError::NothingSelected);
        }

        self.begin(BatchKind::Export, ids, format!("Exporting {} records…", ids.len()));

        match self.with_timeout(self.gateway.batch_export(ids)).await {
            Ok(archive) => {
                self.finish(
                    BatchStatus::Succeeded,
                    ids.len() as u32,
                    0,
                    format!("Exported {} records to {}", ids.len(), archive.filename),
                );
                Ok(archive)
            }
            Err(e) => {
                self.finish(BatchStatus::Failed, 0, 0, format!("Export failed: {e}"));
                Err(e)
            }
        }
    }

    /// Delete the given records. Per-item failures are a qualified
    /// success: the outcome reports both counts, and the post-mutation
    /// sequence still runs.
    pub async fn delete_selected(&self, ids: &[String]) -> Result<BatchDeleteOutcome> {
        if ids.is_empty() {
            return Err(HistoryError::NothingSelected);
        }

        self.begin(BatchKind::Delete, ids, format!("Deleting {} records…", ids.len()));

        let outcome = match self.with_timeout(self.gateway.batch_delete(ids)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.finish(BatchStatus::Failed, 0, 0, format!("Delete failed: {e}"));
                return Err(e);
            }
        };

        let (status, text) = if outcome.fail_count == 0 {
            (
                BatchStatus::Succeeded,
                format!("Deleted {} records", outcome.success_count),
            )
        } else {
            (
                BatchStatus::PartiallyFailed,
                format!(
                    "Deleted {} records, {} failed",
                    outcome.success_count, outcome.fail_count
                ),
            )
        };
        self.finish(status, outcome.success_count, outcome.fail_count, text);

        self.after_mutation().await;
        Ok(outcome)
    }

    /// Delete one record; removes it from the selection if present, then
    /// runs the same post-mutation sequence as a batch delete.
    pub async fn delete_single(&self, id: &str) -> Result<BatchDeleteOutcome> {
        if id.is_empty() {
            return Err(HistoryError::NothingSelected);
        }

        let ids = [id.to_string()];
        self.begin(BatchKind::Delete, &ids, format!("Deleting record {id}…"));

        let outcome = match self.with_timeout(self.gateway.delete_one(id)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.finish(BatchStatus::Failed, 0, 0, format!("Delete failed: {e}"));
                return Err(e);
            }
        };

        if !outcome.success {
            let message = if outcome.message.is_empty() {
                "record was not deleted".to_string()
            } else {
                outcome.message.clone()
            };
            self.finish(BatchStatus::Failed, 0, 1, format!("Delete failed: {message}"));
            return Err(HistoryError::Server(message));
        }

        self.finish(
            BatchStatus::Succeeded,
            1,
            0,
            format!("Deleted record {id}"),
        );

        self.controller.selection().remove(id);
        self.refresh_after_delete().await;
        Ok(BatchDeleteOutcome {
            success_count: 1,
            fail_count: 0,
        })
    }

    /// Post-mutation sequence for multi-record deletes: clear selection,
    /// refresh the list, refresh stats. Order is fixed.
    async fn after_mutation(&self) {
        self.controller.selection().clear();
        self.refresh_after_delete().await;
    }

    async fn refresh_after_delete(&self) {
        if let Err(e) = self.controller.refresh().await {
            warn!(error = %e, "post-delete list refresh failed");
        }
        if let Err(e) = self.controller.refresh_stats().await {
            warn!(error = %e, "post-delete stats refresh failed");
        }
    }

    fn begin(&self, kind: BatchKind, ids: &[String], text: String) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        let mut op = self.operation.lock();
        *op = BatchOperation {
            kind: Some(kind),
            target_ids: ids.to_vec(),
            status: BatchStatus::Running,
            progress_text: text,
            success_count: 0,
            fail_count: 0,
        };
    }

    fn finish(&self, status: BatchStatus, success_count: u32, fail_count: u32, text: String) {
        {
            let mut op = self.operation.lock();
            op.status = status;
            op.success_count = success_count;
            op.fail_count = fail_count;
            op.progress_text = text;
        }
        self.schedule_clear();
    }

    /// Reset the operation to idle after the display window, unless a
    /// newer operation has started in the meantime.
    fn schedule_clear(&self) {
        let epoch_at_finish = self.epoch.load(Ordering::SeqCst);
        let epoch = Arc::clone(&self.epoch);
        let operation = Arc::clone(&self.operation);
        let window = self.display_window;

        tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if epoch.load(Ordering::SeqCst) != epoch_at_finish {
                debug!("skipping progress clear, a newer batch operation started");
                return;
            }
            let mut op = operation.lock();
            op.progress_text.clear();
            op.status = BatchStatus::Idle;
            op.kind = None;
            op.target_ids.clear();
        });
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
