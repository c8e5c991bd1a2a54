//! Price source trait and structured fetch errors.
//!
//! `PriceSource` abstracts over where the split table comes from so the
//! updater can be driven by the HTTP API in production and by fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use super::table::TabularResponse;

/// Errors raised while fetching a price table.
///
/// The `Display` text is what ends up in the user-visible error notice.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Non-2xx response. `message` is the body's `detail` when present.
    #[error("{message}")]
    Request { status: u16, message: String },

    #[error("network unreachable: {0}")]
    Network(String),

    #[error("request timed out after {:?}", .0)]
    Timeout(Duration),

    #[error("response format changed: {0}")]
    Decode(String),

    #[error("http client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Build a `Request` error from a failed response body.
    ///
    /// Uses the JSON `detail` field when the body carries one, else falls back
    /// to a message naming the status code.
    pub fn from_error_body(status: u16, body: &str) -> Self {
        let message = error_detail(body)
            .unwrap_or_else(|| format!("Error fetching chart data: {status}"));
        FetchError::Request { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract a non-empty `detail` from an error body.
///
/// String details are used as-is; structured ones (e.g. validation error
/// lists) are rendered as compact JSON.
pub fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.is_empty() => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Body of the API health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }
}

/// A source of split-orientation price tables.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the table for `symbol` over `period` (e.g. `"1y"`).
    async fn fetch_table(&self, symbol: &str, period: &str)
        -> Result<TabularResponse, FetchError>;
}
