//! Terminal formatting for records, stats, and batch outcomes.

use owo_colors::OwoColorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::gateway::BatchDeleteOutcome;
use crate::types::{AggregateStats, DetectionRecord, PageInfo};

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Detected")]
    created_at: String,
    #[tabled(rename = "Defects")]
    defects: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Time")]
    detection_time: String,
    #[tabled(rename = "Types")]
    defect_types: String,
}

impl From<&DetectionRecord> for RecordRow {
    fn from(record: &DetectionRecord) -> Self {
        let defects = if record.defect_count == 0 {
            record.defect_count.green().to_string()
        } else {
            record.defect_count.red().to_string()
        };
        Self {
            id: record.id.clone(),
            created_at: record.created_at.clone(),
            defects,
            confidence: format!("{:.1}%", record.average_confidence * 100.0),
            detection_time: format!("{}ms", record.detection_time),
            defect_types: record.defect_types.join(", "),
        }
    }
}

/// Render a page of records as a table.
pub fn record_table(records: &[DetectionRecord]) -> String {
    let rows: Vec<RecordRow> = records.iter().map(RecordRow::from).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

/// One-line pagination footer.
pub fn page_footer(page: &PageInfo) -> String {
    format!(
        "Page {} of {} ({} records)",
        page.page,
        page.page_count.max(1),
        page.total
    )
}

/// Multi-line aggregate stats block.
pub fn format_stats(stats: &AggregateStats) -> String {
    format!(
        "Detections:  {} total, {} this month\n\
         Defects:     {} total, {} this month\n\
         Confidence:  {:.1}% average\n\
         Quality:     {:.1}% defect-free",
        stats.total_detections,
        stats.monthly_detections,
        stats.total_defects,
        stats.monthly_defects,
        stats.average_confidence * 100.0,
        stats.quality_rate * 100.0,
    )
}

/// Human summary of a batch delete, colored by outcome.
pub fn format_delete_outcome(outcome: &BatchDeleteOutcome) -> String {
    if outcome.fail_count == 0 {
        format!("Deleted {} record(s)", outcome.success_count)
            .green()
            .to_string()
    } else {
        format!(
            "Deleted {} record(s), {} failed",
            outcome.success_count, outcome.fail_count
        )
        .yellow()
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_footer() {
        let page = PageInfo::new(2, 20, 45, 3);
        assert_eq!(page_footer(&page), "Page 2 of 3 (45 records)");

        let empty = PageInfo::empty(20);
        assert_eq!(page_footer(&empty), "Page 1 of 1 (0 records)");
    }

    #[test]
    fn test_record_table_contains_fields() {
        let record = DetectionRecord {
            id: "det-9".to_string(),
            created_at: "2026-08-01T12:00:00Z".to_string(),
            defect_count: 3,
            average_confidence: 0.875,
            detection_time: 140,
            defect_types: vec!["short".to_string(), "spur".to_string()],
            image_url: None,
        };
        let table = record_table(std::slice::from_ref(&record));
        assert!(table.contains("det-9"));
        assert!(table.contains("87.5%"));
        assert!(table.contains("140ms"));
        assert!(table.contains("short, spur"));
    }
}
