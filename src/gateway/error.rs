//! HTTP error classification for the detection-history API.
//!
//! Non-success responses are folded into a single [`ApiError`] that keeps
//! the HTTP status around long enough to pick the right [`HistoryError`]
//! variant, then discards it.

use std::fmt;

use reqwest::StatusCode;

use crate::error::HistoryError;

/// A failed API call with enough context to classify it.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code, if the request got far enough to have one
    pub status: Option<StatusCode>,
    /// Retry-After header value in seconds, if present
    pub retry_after: Option<u64>,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn with_status(message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            status: Some(status),
            retry_after: None,
            message: message.into(),
        }
    }

    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status.map(|s| s.as_u16() == 429).unwrap_or(false)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status,
            Some(StatusCode::UNAUTHORIZED) | Some(StatusCode::FORBIDDEN)
        )
    }

    /// Classify into the crate error taxonomy.
    pub fn to_history_error(&self) -> HistoryError {
        if self.is_rate_limited() {
            return HistoryError::RateLimited(self.retry_after.unwrap_or(60));
        }
        if self.is_unauthorized() {
            return HistoryError::Unauthorized(self.message.clone());
        }
        if let Some(status) = self.status
            && status.is_server_error()
        {
            return HistoryError::Server(format!("{} ({})", self.message, status.as_u16()));
        }
        HistoryError::Api(self.message.clone())
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for HistoryError {
    fn from(error: ApiError) -> Self {
        error.to_history_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_classification() {
        let err = ApiError::with_status("token rejected", StatusCode::UNAUTHORIZED);
        assert!(matches!(
            err.to_history_error(),
            HistoryError::Unauthorized(_)
        ));

        let err = ApiError::with_status("no access", StatusCode::FORBIDDEN);
        assert!(matches!(
            err.to_history_error(),
            HistoryError::Unauthorized(_)
        ));
    }

    #[test]
    fn test_rate_limit_classification() {
        let err = ApiError::with_status("slow down", StatusCode::TOO_MANY_REQUESTS)
            .with_retry_after(120);
        assert!(matches!(
            err.to_history_error(),
            HistoryError::RateLimited(120)
        ));
    }

    #[test]
    fn test_rate_limit_defaults_to_60s() {
        let err = ApiError::with_status("slow down", StatusCode::TOO_MANY_REQUESTS);
        assert!(matches!(
            err.to_history_error(),
            HistoryError::RateLimited(60)
        ));
    }

    #[test]
    fn test_server_error_classification() {
        let err = ApiError::with_status("boom", StatusCode::INTERNAL_SERVER_ERROR);
        assert!(matches!(err.to_history_error(), HistoryError::Server(_)));
    }

    #[test]
    fn test_plain_api_error() {
        let err = ApiError::with_status("bad request", StatusCode::BAD_REQUEST);
        assert!(matches!(err.to_history_error(), HistoryError::Api(_)));

        let err = ApiError::new("connection reset");
        assert!(matches!(err.to_history_error(), HistoryError::Api(_)));
    }
}
