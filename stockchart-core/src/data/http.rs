//! HTTP price source backed by the stock API.
//!
//! One GET per call, no retries. Error bodies are mined for a `detail`
//! message so the user sees the server's explanation rather than a bare code.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::provider::{FetchError, HealthStatus, PriceSource};
use super::table::TabularResponse;
use crate::config::ChartConfig;

/// Build the chart data URL for a symbol and period.
///
/// The base may end with one `/`. Symbol and period are interpolated as-is.
pub fn endpoint_url(base: &str, symbol: &str, period: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}/stocks/stock/{symbol}/data?period={period}")
}

/// Build the health probe URL.
pub fn health_url(base: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    format!("{base}/health")
}

/// Price source that talks to the stock API over HTTP.
pub struct HttpPriceSource {
    client: Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpPriceSource {
    pub fn new(config: &ChartConfig) -> Result<Self, FetchError> {
        let mut builder =
            Client::builder().user_agent(concat!("stockchart/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            timeout: config.request_timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.timeout.unwrap_or_default())
        } else {
            FetchError::Network(e.to_string())
        }
    }

    /// GET `url` and return the status and body text.
    async fn get_text(&self, url: &str) -> Result<(reqwest::StatusCode, String), FetchError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.map_send_error(e))?;
        Ok((status, body))
    }

    /// Probe `{base}/health`.
    pub async fn health(&self) -> Result<HealthStatus, FetchError> {
        let url = health_url(&self.base_url);
        debug!(%url, "probing API health");
        let (status, body) = self.get_text(&url).await?;
        if !status.is_success() {
            return Err(FetchError::from_error_body(status.as_u16(), &body));
        }
        serde_json::from_str(&body)
            .map_err(|e| FetchError::Decode(format!("health response: {e}")))
    }
}

#[async_trait]
impl PriceSource for HttpPriceSource {
    fn name(&self) -> &str {
        "stock_api"
    }

    async fn fetch_table(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<TabularResponse, FetchError> {
        let url = endpoint_url(&self.base_url, symbol, period);
        info!(%url, "fetching chart data");

        let (status, body) = self.get_text(&url).await?;
        if !status.is_success() {
            return Err(FetchError::from_error_body(status.as_u16(), &body));
        }

        // A `null` body means the API found nothing for the period.
        let table: Option<TabularResponse> =
            serde_json::from_str(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(table.unwrap_or_default())
    }
}
