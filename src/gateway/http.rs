//! HTTP implementation of the detection-history gateway.
//!
//! Talks plain REST + JSON to the inspection server. The auth token is held
//! in a [`SecretString`] and only exposed at the moment the Authorization
//! header is built, so accidental `Debug` output never leaks it.

use jiff::Zoned;
use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::error::{HistoryError, Result};
use crate::query::HistoryQuery;
use crate::types::{AggregateStats, DefectTypeOption, Suggestion};

use super::error::ApiError;
use super::{BatchDeleteOutcome, DeleteOutcome, DetectionGateway, ExportArchive, RecordPage};

/// REST gateway to the detection-history server.
pub struct HttpGateway {
    client: Client,
    base: Url,
    token: Option<SecretString>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefectTypesResponse {
    #[serde(default)]
    defect_types: Vec<DefectTypeOption>,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    #[serde(default)]
    message: String,
}

impl HttpGateway {
    pub fn from_config(config: &Config) -> Result<Self> {
        let base = Url::parse(config.server_url()).map_err(|e| {
            HistoryError::Config(format!("invalid server URL '{}': {e}", config.server_url()))
        })?;

        let client = Client::builder()
            .build()
            .map_err(|e| HistoryError::Api(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            token: config.token(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| HistoryError::Config(format!("invalid endpoint '{path}': {e}")))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", token.expose_secret()),
            ),
            None => request,
        }
    }

    /// Fold a non-success response into an [`ApiError`], reading the server's
    /// message body when it has one.
    async fn classify_failure(response: Response) -> ApiError {
        let status = response.status();
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let message = match response.json::<ServerErrorBody>().await {
            Ok(body) if !body.message.is_empty() => body.message,
            _ => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        let mut error = ApiError::with_status(message, status);
        if let Some(seconds) = retry_after {
            error = error.with_retry_after(seconds);
        }
        error
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self
            .authorize(self.client.get(url).query(params))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response).await.into());
        }
        Ok(response.json::<T>().await?)
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let response = self.authorize(self.client.post(url).json(body)).send().await?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response).await.into());
        }
        Ok(response.json::<T>().await?)
    }
}

/// Flatten a query into wire parameters. Empty filters are omitted; the
/// relative date range is resolved to a concrete lower bound here, at
/// dispatch time.
fn query_params(query: &HistoryQuery, page: u32, limit: u32, now: &Zoned) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("page", page.to_string()),
        ("limit", limit.to_string()),
        ("sortBy", query.sort_by.as_str().to_string()),
        ("sortOrder", query.sort_order.as_str().to_string()),
    ];
    if !query.search.is_empty() {
        params.push(("search", query.search.clone()));
    }
    if !query.defect_type.is_empty() {
        params.push(("defectType", query.defect_type.clone()));
    }
    if let Some(has_defects) = query.has_defects.as_param() {
        params.push(("hasDefects", has_defects.to_string()));
    }
    if let Some(since) = query.date_range.since(now) {
        params.push(("startDate", since.timestamp().to_string()));
    }
    params
}

/// Pull the filename out of a Content-Disposition header value.
fn filename_from_disposition(value: &str) -> Option<String> {
    let (_, rest) = value.split_once("filename=")?;
    let name = rest.split(';').next().unwrap_or(rest).trim();
    let name = name.trim_matches('"');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[async_trait::async_trait]
impl DetectionGateway for HttpGateway {
    async fn list_records(
        &self,
        query: &HistoryQuery,
        page: u32,
        limit: u32,
    ) -> Result<RecordPage> {
        let params = query_params(query, page, limit, &Zoned::now());
        debug!(page, limit, search = %query.search, "listing detection records");
        self.get_json("api/history", &params).await
    }

    async fn get_suggestions(&self, text: &str) -> Result<Vec<Suggestion>> {
        let response: SuggestionsResponse = self
            .get_json("api/history/suggestions", &[("q", text.to_string())])
            .await?;
        Ok(response.suggestions)
    }

    async fn get_available_defect_types(&self) -> Result<Vec<DefectTypeOption>> {
        let response: DefectTypesResponse =
            self.get_json("api/history/defect-types", &[]).await?;
        Ok(response.defect_types)
    }

    async fn batch_delete(&self, ids: &[String]) -> Result<BatchDeleteOutcome> {
        debug!(count = ids.len(), "dispatching batch delete");
        self.post_json("api/history/batch-delete", &serde_json::json!({ "ids": ids }))
            .await
    }

    async fn delete_one(&self, id: &str) -> Result<DeleteOutcome> {
        let url = self.endpoint(&format!("api/history/{id}"))?;
        let response = self.authorize(self.client.delete(url)).send().await?;

        if !response.status().is_success() {
            return Err(Self::classify_failure(response).await.into());
        }
        Ok(response.json::<DeleteOutcome>().await?)
    }

    async fn batch_export(&self, ids: &[String]) -> Result<ExportArchive> {
        let url = self.endpoint("api/history/export")?;
        let response = self
            .authorize(self.client.post(url).json(&serde_json::json!({ "ids": ids })))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_failure(response).await.into());
        }
        if status == StatusCode::NO_CONTENT {
            return Err(HistoryError::Api("export produced no archive".to_string()));
        }

        let filename = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| "detection-export.zip".to_string());

        let bytes = response.bytes().await?.to_vec();
        debug!(filename = %filename, size = bytes.len(), "received export archive");
        Ok(ExportArchive { filename, bytes })
    }

    async fn get_aggregate_stats(&self) -> Result<AggregateStats> {
        self.get_json("api/history/stats", &[]).await
    }
}
