use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::query::{DateRange, DefectPresence, SortField, SortOrder};

#[derive(Parser)]
#[command(name = "boardlens")]
#[command(about = "Detection-history browsing for PCB defect inspection")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List detection records
    #[command(visible_alias = "list")]
    Ls {
        /// Free-text search (board ID or date fragment)
        #[arg(short, long)]
        search: Option<String>,

        /// Filter by defect type (e.g. short, spur, missing_hole)
        #[arg(short = 't', long = "type")]
        defect_type: Option<String>,

        /// Restrict to a date window: today, week, month, quarter, year
        #[arg(long, value_parser = parse_date_range)]
        since: Option<DateRange>,

        /// Restrict by defect presence: any, defective, clean
        #[arg(long, value_parser = parse_presence)]
        defects: Option<DefectPresence>,

        /// Sort field: created-at, defect-count, confidence, detection-time
        #[arg(long, default_value = "created-at", value_parser = parse_sort_field)]
        sort_by: SortField,

        /// Sort direction: asc, desc
        #[arg(long, default_value = "desc", value_parser = parse_sort_order)]
        sort_order: SortOrder,

        /// Page to display (1-based)
        #[arg(short, long, default_value = "1")]
        page: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up search suggestions for a text fragment
    Suggest {
        /// Partial search input (at least 2 characters)
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show aggregate detection statistics
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show available defect-type filter options
    DefectTypes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete detection records by ID
    #[command(visible_alias = "rm")]
    Delete {
        /// Record IDs to delete
        #[arg(required = true)]
        ids: Vec<String>,

        /// Skip the confirmation guard
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Export detection records as an archive
    Export {
        /// Record IDs to export
        #[arg(required = true)]
        ids: Vec<String>,

        /// Output file (default: server-provided filename)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show or modify configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,
    /// Set a config value (server.url, auth.token, page_size, remote_timeout)
    Set { key: String, value: String },
}

fn parse_sort_field(s: &str) -> Result<SortField, String> {
    s.parse().map_err(|e: crate::error::HistoryError| e.to_string())
}

fn parse_sort_order(s: &str) -> Result<SortOrder, String> {
    s.parse().map_err(|e: crate::error::HistoryError| e.to_string())
}

fn parse_date_range(s: &str) -> Result<DateRange, String> {
    s.parse().map_err(|e: crate::error::HistoryError| e.to_string())
}

fn parse_presence(s: &str) -> Result<DefectPresence, String> {
    s.parse().map_err(|e: crate::error::HistoryError| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ls_defaults() {
        let cli = Cli::try_parse_from(["boardlens", "ls"]).unwrap();
        match cli.command {
            Commands::Ls {
                page,
                sort_by,
                sort_order,
                json,
                ..
            } => {
                assert_eq!(page, 1);
                assert_eq!(sort_by, SortField::CreatedAt);
                assert_eq!(sort_order, SortOrder::Desc);
                assert!(!json);
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_ls_parses_filters() {
        let cli = Cli::try_parse_from([
            "boardlens", "ls", "-t", "short", "--since", "week", "--defects", "defective",
            "--sort-by", "confidence", "--sort-order", "asc", "-p", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Ls {
                defect_type,
                since,
                defects,
                sort_by,
                sort_order,
                page,
                ..
            } => {
                assert_eq!(defect_type.as_deref(), Some("short"));
                assert_eq!(since, Some(DateRange::Week));
                assert_eq!(defects, Some(DefectPresence::Defective));
                assert_eq!(sort_by, SortField::AverageConfidence);
                assert_eq!(sort_order, SortOrder::Asc);
                assert_eq!(page, 3);
            }
            _ => panic!("expected ls"),
        }
    }

    #[test]
    fn test_delete_requires_ids() {
        assert!(Cli::try_parse_from(["boardlens", "delete"]).is_err());
        assert!(Cli::try_parse_from(["boardlens", "rm", "det-1", "-y"]).is_ok());
    }

    #[test]
    fn test_bad_sort_field_is_rejected() {
        assert!(Cli::try_parse_from(["boardlens", "ls", "--sort-by", "bogus"]).is_err());
    }
}
