//! Batch delivery to the ingestion sink.
//!
//! The sink contract is one operation: send a newline-joined payload of
//! record lines, get back an error string plus counts of accepted
//! points/objects. [`HttpUploader`] implements it over HTTP;
//! [`LogUploader`] implements it as a dry run that only logs. Delivery
//! failures are never retried here; they propagate to the caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::logs::{log_debug, log_info};
use crate::error::{UploadError, UploadResult};

/// The sink's response envelope.
///
/// An empty `error` means the payload was accepted; `points` and `objects`
/// report how much of it the sink counted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SinkResponse {
    #[serde(default)]
    pub error: String,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub objects: u64,
}

/// The uploader capability consumed by the batcher.
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Deliver one payload; either it is fully accepted or the call fails.
    async fn send(&self, payload: &str) -> UploadResult<SinkResponse>;
}

// =============================================================================
// HTTP uploader
// =============================================================================

/// Delivers payloads with a `POST` per batch.
#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Build from the `SHEETLOAD_ENDPOINT` environment variable.
    pub fn from_env() -> Option<Self> {
        std::env::var("SHEETLOAD_ENDPOINT").ok().map(Self::new)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn send(&self, payload: &str) -> UploadResult<SinkResponse> {
        let request_id = Uuid::new_v4().to_string();
        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Request-Id", &request_id)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(payload.to_owned())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                error,
            });
        }

        let body: SinkResponse = response.json().await?;
        if !body.error.is_empty() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                error: body.error,
            });
        }

        log_debug(format!(
            "request {} accepted ({} objects)",
            request_id, body.objects
        ));
        Ok(body)
    }
}

// =============================================================================
// Dry-run uploader
// =============================================================================

/// Logs each payload instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct LogUploader;

impl LogUploader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Uploader for LogUploader {
    async fn send(&self, payload: &str) -> UploadResult<SinkResponse> {
        let objects = payload.lines().filter(|l| !l.trim().is_empty()).count() as u64;
        log_info(format!("[dry-run] would upload {objects} records:"));
        for line in payload.lines() {
            log_info(format!("[dry-run]   {line}"));
        }
        Ok(SinkResponse {
            error: String::new(),
            points: 0,
            objects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sink_response_defaults() {
        let response: SinkResponse = serde_json::from_str("{}").unwrap();
        assert!(response.error.is_empty());
        assert_eq!(response.points, 0);
        assert_eq!(response.objects, 0);
    }

    #[test]
    fn test_sink_response_parses_counts() {
        let response: SinkResponse =
            serde_json::from_str(r#"{"error": "", "points": 0, "objects": 10}"#).unwrap();
        assert_eq!(response.objects, 10);
    }

    #[tokio::test]
    async fn test_log_uploader_counts_records() {
        let uploader = LogUploader::new();
        let response = uploader.send("a\nb\nc").await.unwrap();
        assert_eq!(response.objects, 3);
        assert!(response.error.is_empty());
    }

    #[tokio::test]
    async fn test_log_uploader_ignores_blank_lines() {
        let uploader = LogUploader::new();
        let response = uploader.send("a\n\nb").await.unwrap();
        assert_eq!(response.objects, 2);
    }
}
