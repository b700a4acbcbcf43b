pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod gateway;
pub mod query;
pub mod suggest;
pub mod types;

pub use batch::{BatchCoordinator, BatchKind, BatchOperation, BatchStatus};
pub use config::Config;
pub use controller::{HistoryController, HistoryView, LoadPhase, SelectionManager};
pub use error::{HistoryError, Result};
pub use gateway::{
    BatchDeleteOutcome, DeleteOutcome, DetectionGateway, ExportArchive, HttpGateway, RecordPage,
};
pub use query::{
    DateRange, DefectPresence, HistoryQuery, QueryPatch, QueryStore, SortField, SortOrder,
};
pub use suggest::SuggestionDebouncer;
pub use types::{
    AggregateStats, DefectTypeOption, DetectionRecord, PageInfo, Suggestion, SuggestionKind,
};
