use thiserror::Error;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("invalid page number {0}: pages start at 1")]
    InvalidPage(u32),

    #[error("nothing selected")]
    NothingSelected,

    #[error("invalid filter value '{0}': {1}")]
    InvalidFilter(String, String),

    #[error("authentication error: {0}")]
    Unauthorized(String),

    #[error("rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("server error: {0}")]
    Server(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("remote operation timed out after {0} seconds")]
    Timeout(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl HistoryError {
    /// True for errors detected before any request was dispatched.
    pub fn is_input_rejected(&self) -> bool {
        matches!(
            self,
            HistoryError::InvalidPage(_)
                | HistoryError::NothingSelected
                | HistoryError::InvalidFilter(_, _)
        )
    }
}

pub type Result<T> = std::result::Result<T, HistoryError>;
