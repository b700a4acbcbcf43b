//! Read models for the detection-history collection.
//!
//! Everything here is a plain data type exposed upward to the presentation
//! layer. Optional or missing server fields are defaulted once, at the
//! gateway boundary, so consumers never see partially-populated values.

use serde::{Deserialize, Serialize};

/// One detection-history entry returned by the remote collection.
///
/// Records are immutable from the client's perspective except through
/// explicit delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    /// Unique, stable record ID
    pub id: String,
    /// Detection timestamp (ISO 8601)
    #[serde(default)]
    pub created_at: String,
    /// Number of defects found in the board image
    #[serde(default)]
    pub defect_count: u32,
    /// Mean model confidence across detected defects (0..1)
    #[serde(default)]
    pub average_confidence: f64,
    /// Inference wall time in milliseconds
    #[serde(default)]
    pub detection_time: u64,
    /// Defect category labels present in this record
    #[serde(default)]
    pub defect_types: Vec<String>,
    /// URL of the annotated result image, if the server published one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Pagination cursor state for the currently fetched result window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Current page, 1-based
    pub page: u32,
    /// Records per page, fixed per session
    pub limit: u32,
    /// Total records matching the query
    pub total: u64,
    /// Total pages (`ceil(total / limit)`)
    pub page_count: u32,
}

impl PageInfo {
    pub fn new(page: u32, limit: u32, total: u64, page_count: u32) -> Self {
        let page_count = if page_count == 0 && total > 0 {
            total.div_ceil(limit.max(1) as u64) as u32
        } else {
            page_count
        };
        Self {
            page: page.max(1),
            limit,
            total,
            page_count,
        }
    }

    pub fn empty(limit: u32) -> Self {
        Self {
            page: 1,
            limit,
            total: 0,
            page_count: 0,
        }
    }

    /// Whether `page` is addressable given the last-known totals.
    pub fn contains(&self, page: u32) -> bool {
        page >= 1 && page <= self.page_count.max(1)
    }
}

/// Search autocompletion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// What the suggestion refers to
    #[serde(default)]
    pub kind: SuggestionKind,
    /// Display label
    pub label: String,
    /// Value to place into the search box when accepted
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Id,
    Date,
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionKind::Id => write!(f, "id"),
            SuggestionKind::Date => write!(f, "date"),
            SuggestionKind::Other => write!(f, "other"),
        }
    }
}

/// A selectable defect-type filter option (value/label/count tuple).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectTypeOption {
    pub value: String,
    pub label: String,
    #[serde(default)]
    pub count: u64,
}

impl DefectTypeOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            count: 0,
        }
    }
}

/// Aggregate detection counters consumed by dashboard surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    #[serde(default)]
    pub total_detections: u64,
    #[serde(default)]
    pub monthly_detections: u64,
    #[serde(default)]
    pub total_defects: u64,
    #[serde(default)]
    pub monthly_defects: u64,
    #[serde(default)]
    pub average_confidence: f64,
    /// Share of boards with zero defects (0..1)
    #[serde(default)]
    pub quality_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_info_derives_page_count_when_missing() {
        let info = PageInfo::new(1, 20, 45, 0);
        assert_eq!(info.page_count, 3);
    }

    #[test]
    fn test_page_info_trusts_server_page_count() {
        let info = PageInfo::new(2, 20, 45, 5);
        assert_eq!(info.page_count, 5);
    }

    #[test]
    fn test_page_info_contains() {
        let info = PageInfo::new(1, 20, 45, 3);
        assert!(info.contains(1));
        assert!(info.contains(3));
        assert!(!info.contains(0));
        assert!(!info.contains(4));

        // An empty result set still addresses page 1
        let empty = PageInfo::empty(20);
        assert!(empty.contains(1));
        assert!(!empty.contains(2));
    }

    #[test]
    fn test_record_defaults_missing_fields() {
        let record: DetectionRecord = serde_json::from_str(r#"{"id": "det-1"}"#).unwrap();
        assert_eq!(record.id, "det-1");
        assert_eq!(record.defect_count, 0);
        assert!(record.defect_types.is_empty());
        assert!(record.image_url.is_none());
    }

    #[test]
    fn test_suggestion_kind_tolerates_unknown_values() {
        let s: Suggestion =
            serde_json::from_str(r#"{"kind": "board", "label": "B-12", "value": "B-12"}"#).unwrap();
        assert_eq!(s.kind, SuggestionKind::Other);
    }
}
