//! The canonical filter/search/sort specification driving list fetches.
//!
//! Exactly one `HistoryQuery` is active at any time; it lives in a
//! [`store::QueryStore`] and every fetch is tagged with the query that
//! produced it. Partial updates go through [`QueryPatch`] so unrelated
//! fields survive a merge untouched.

use std::fmt;
use std::str::FromStr;

use jiff::{ToSpan, Zoned};
use serde::{Deserialize, Serialize};

use crate::error::HistoryError;

pub mod store;

pub use store::QueryStore;

/// Sortable record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    #[default]
    CreatedAt,
    DefectCount,
    AverageConfidence,
    DetectionTime,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::DefectCount => "defectCount",
            SortField::AverageConfidence => "averageConfidence",
            SortField::DetectionTime => "detectionTime",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortField {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" | "created-at" | "created" | "date" => Ok(SortField::CreatedAt),
            "defectCount" | "defect-count" | "defects" => Ok(SortField::DefectCount),
            "averageConfidence" | "confidence" => Ok(SortField::AverageConfidence),
            "detectionTime" | "detection-time" | "time" => Ok(SortField::DetectionTime),
            _ => Err(HistoryError::InvalidFilter(
                s.to_string(),
                "expected one of: created-at, defect-count, confidence, detection-time".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" | "ascending" => Ok(SortOrder::Asc),
            "desc" | "descending" => Ok(SortOrder::Desc),
            _ => Err(HistoryError::InvalidFilter(
                s.to_string(),
                "expected 'asc' or 'desc'".to_string(),
            )),
        }
    }
}

/// Relative date window for the `created_at` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    Any,
    Today,
    Week,
    Month,
    Quarter,
    Year,
}

impl DateRange {
    /// Lower bound of the window, or `None` when no date filter applies.
    pub fn since(&self, now: &Zoned) -> Option<Zoned> {
        let start = match self {
            DateRange::Any => return None,
            DateRange::Today => return now.start_of_day().ok(),
            DateRange::Week => now.checked_sub(1.week()),
            DateRange::Month => now.checked_sub(1.month()),
            DateRange::Quarter => now.checked_sub(3.months()),
            DateRange::Year => now.checked_sub(1.year()),
        };
        start.ok()
    }
}

impl FromStr for DateRange {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" | "all" => Ok(DateRange::Any),
            "today" => Ok(DateRange::Today),
            "week" => Ok(DateRange::Week),
            "month" => Ok(DateRange::Month),
            "quarter" => Ok(DateRange::Quarter),
            "year" => Ok(DateRange::Year),
            _ => Err(HistoryError::InvalidFilter(
                s.to_string(),
                "expected one of: today, week, month, quarter, year".to_string(),
            )),
        }
    }
}

/// Whether to restrict results to boards with or without defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefectPresence {
    #[default]
    Any,
    Defective,
    Clean,
}

impl DefectPresence {
    /// Wire value, matching the server's boolean-ish parameter.
    pub fn as_param(&self) -> Option<&'static str> {
        match self {
            DefectPresence::Any => None,
            DefectPresence::Defective => Some("true"),
            DefectPresence::Clean => Some("false"),
        }
    }
}

impl FromStr for DefectPresence {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "any" => Ok(DefectPresence::Any),
            "true" | "defective" | "with" => Ok(DefectPresence::Defective),
            "false" | "clean" | "without" => Ok(DefectPresence::Clean),
            _ => Err(HistoryError::InvalidFilter(
                s.to_string(),
                "expected one of: any, defective, clean".to_string(),
            )),
        }
    }
}

/// The full filter/search/sort specification for a list fetch.
///
/// An empty `search` or `defect_type` means "no constraint on this field".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub defect_type: String,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub has_defects: DefectPresence,
    #[serde(default)]
    pub sort_by: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl HistoryQuery {
    pub fn has_active_filters(&self) -> bool {
        !self.search.is_empty()
            || !self.defect_type.is_empty()
            || self.date_range != DateRange::Any
            || self.has_defects != DefectPresence::Any
    }

    /// Shallow-merge `patch` into this query, field by field.
    pub fn apply(&mut self, patch: QueryPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(defect_type) = patch.defect_type {
            self.defect_type = defect_type;
        }
        if let Some(date_range) = patch.date_range {
            self.date_range = date_range;
        }
        if let Some(has_defects) = patch.has_defects {
            self.has_defects = has_defects;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
    }
}

/// A partial query update; `None` fields are left untouched by a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPatch {
    pub search: Option<String>,
    pub defect_type: Option<String>,
    pub date_range: Option<DateRange>,
    pub has_defects: Option<DefectPresence>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl QueryPatch {
    pub fn search(search: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            ..Default::default()
        }
    }

    pub fn defect_type(defect_type: impl Into<String>) -> Self {
        Self {
            defect_type: Some(defect_type.into()),
            ..Default::default()
        }
    }

    pub fn sort(sort_by: SortField, sort_order: SortOrder) -> Self {
        Self {
            sort_by: Some(sort_by),
            sort_order: Some(sort_order),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.defect_type.is_none()
            && self.date_range.is_none()
            && self.has_defects.is_none()
            && self.sort_by.is_none()
            && self.sort_order.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_query() {
        let q = HistoryQuery::default();
        assert_eq!(q.search, "");
        assert_eq!(q.defect_type, "");
        assert_eq!(q.date_range, DateRange::Any);
        assert_eq!(q.has_defects, DefectPresence::Any);
        assert_eq!(q.sort_by, SortField::CreatedAt);
        assert_eq!(q.sort_order, SortOrder::Desc);
        assert!(!q.has_active_filters());
    }

    #[test]
    fn test_apply_merges_only_provided_fields() {
        let mut q = HistoryQuery {
            search: "A-17".to_string(),
            ..Default::default()
        };
        q.apply(QueryPatch::defect_type("short"));
        assert_eq!(q.search, "A-17", "untouched field survives merge");
        assert_eq!(q.defect_type, "short");
    }

    #[test]
    fn test_apply_empty_string_clears_filter() {
        let mut q = HistoryQuery::default();
        q.apply(QueryPatch::defect_type("short"));
        assert!(q.has_active_filters());
        q.apply(QueryPatch::defect_type(""));
        assert!(!q.has_active_filters());
    }

    #[test]
    fn test_sort_field_round_trip() {
        for field in [
            SortField::CreatedAt,
            SortField::DefectCount,
            SortField::AverageConfidence,
            SortField::DetectionTime,
        ] {
            assert_eq!(field.as_str().parse::<SortField>().unwrap(), field);
        }
        assert!("bogus".parse::<SortField>().is_err());
    }

    #[test]
    fn test_date_range_since() {
        let now: Zoned = "2026-08-06T10:30:00[UTC]".parse().unwrap();
        assert!(DateRange::Any.since(&now).is_none());

        let today = DateRange::Today.since(&now).unwrap();
        assert_eq!(today.hour(), 0);
        assert_eq!(today.day(), 6);

        let week = DateRange::Week.since(&now).unwrap();
        assert_eq!(week.day(), 30);
        assert_eq!(week.month(), 7);

        let quarter = DateRange::Quarter.since(&now).unwrap();
        assert_eq!(quarter.month(), 5);
    }

    #[test]
    fn test_defect_presence_params() {
        assert_eq!(DefectPresence::Any.as_param(), None);
        assert_eq!(DefectPresence::Defective.as_param(), Some("true"));
        assert_eq!(DefectPresence::Clean.as_param(), Some("false"));
    }
}
