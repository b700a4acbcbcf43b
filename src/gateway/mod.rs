//! Remote collection gateway.
//!
//! The detection-history server exposes list/search, suggestion lookup,
//! single and batch delete, batch export, and aggregate-stats operations.
//! This module defines the client-side boundary: a [`DetectionGateway`]
//! trait the controller and batch coordinator consume, plus the normalized
//! response payloads. Field defaulting happens here, once, so the rest of
//! the crate never deals with missing values.

pub mod error;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::query::HistoryQuery;
use crate::types::{AggregateStats, DefectTypeOption, DetectionRecord, PageInfo, Suggestion};

pub use http::HttpGateway;

/// One page of detection records plus pagination metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPage {
    #[serde(default)]
    pub records: Vec<DetectionRecord>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub pages: u32,
}

impl RecordPage {
    /// Pagination metadata with derived fields filled in.
    pub fn page_info(&self, limit: u32) -> PageInfo {
        PageInfo::new(self.page, limit, self.total, self.pages)
    }
}

/// Per-item accounting for a batch delete. Some ids may be deleted while
/// others fail; this is not an all-or-nothing result.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteOutcome {
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub fail_count: u32,
}

/// Result of deleting a single record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteOutcome {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

/// Exported archive bytes plus the server-provided filename.
///
/// Receiving this value is the explicit completion acknowledgment for an
/// export; writing it to disk is the caller's concern.
#[derive(Debug, Clone)]
pub struct ExportArchive {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Common interface to the detection-history server.
///
/// All calls are async boundaries; the server enforces authorization and
/// returns structured success/failure payloads.
#[async_trait]
pub trait DetectionGateway: Send + Sync {
    /// List records matching `query` at the given page.
    async fn list_records(&self, query: &HistoryQuery, page: u32, limit: u32)
    -> Result<RecordPage>;

    /// Look up search autocompletion suggestions for `text`.
    async fn get_suggestions(&self, text: &str) -> Result<Vec<Suggestion>>;

    /// Defect-type filter options currently present in the collection.
    async fn get_available_defect_types(&self) -> Result<Vec<DefectTypeOption>>;

    /// Delete several records; per-item failures are reported in the
    /// outcome, not as an error.
    async fn batch_delete(&self, ids: &[String]) -> Result<BatchDeleteOutcome>;

    /// Delete one record.
    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome>;

    /// Export several records as an archive.
    async fn batch_export(&self, ids: &[String]) -> Result<ExportArchive>;

    /// Aggregate detection counters.
    async fn get_aggregate_stats(&self) -> Result<AggregateStats>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_page_defaults_from_sparse_payload() {
        let page: RecordPage = serde_json::from_str(r#"{"total": 7}"#).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total, 7);
        // Missing page count is derived at the boundary
        assert_eq!(page.page_info(20).page_count, 1);
    }

    #[test]
    fn test_batch_delete_outcome_defaults() {
        let outcome: BatchDeleteOutcome = serde_json::from_str(r#"{"successCount": 3}"#).unwrap();
        assert_eq!(outcome.success_count, 3);
        assert_eq!(outcome.fail_count, 0);
    }
}
