//! Chart updater: one linear fetch → validate → build → plot attempt.
//!
//! Every outcome is rendered into the page's chart container. Failures are
//! logged and shown in place, never returned as `Err`; the `RenderOutcome`
//! only summarizes what the container ended up showing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::chart::build_figure;
use crate::config::ChartConfig;
use crate::data::{FetchError, OhlcColumns, PriceSource, ShapeError};
use crate::render::{ChartContainer, ChartPort, Notice, Page, PlotError};

/// What a single update left on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The page has no chart container; nothing was touched.
    NoContainer,
    /// A figure with `traces` series was plotted.
    Rendered { traces: usize },
    /// The response had no rows.
    NoData,
    /// Mandatory OHLC columns were absent.
    MissingColumns(Vec<&'static str>),
    /// An error notice was rendered with this message.
    Failed(String),
    /// The run was cancelled before it could render a result.
    Cancelled,
}

impl RenderOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, RenderOutcome::Failed(_))
    }
}

/// Everything that can go wrong after the loading notice is shown.
#[derive(Debug, Error)]
enum UpdateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Plot(#[from] PlotError),

    #[error("cancelled")]
    Cancelled,
}

/// Fetches a price table and draws it into the page's chart container.
pub struct ChartUpdater {
    source: Arc<dyn PriceSource>,
    port: Arc<dyn ChartPort>,
    page: Arc<dyn Page>,
    container_id: String,
    period_select_id: String,
    default_period: String,
    timeout: Option<Duration>,
    /// Held across the cancel check and the container write it guards.
    write_gate: Mutex<()>,
}

impl ChartUpdater {
    pub fn new(
        config: &ChartConfig,
        source: Arc<dyn PriceSource>,
        port: Arc<dyn ChartPort>,
        page: Arc<dyn Page>,
    ) -> Self {
        Self {
            source,
            port,
            page,
            container_id: config.container_id.clone(),
            period_select_id: config.period_select_id.clone(),
            default_period: config.default_period.clone(),
            timeout: config.request_timeout(),
            write_gate: Mutex::new(()),
        }
    }

    /// Period currently selected on the page, or the configured default.
    pub fn current_period(&self) -> String {
        self.page
            .period(&self.period_select_id)
            .unwrap_or_else(|| self.default_period.clone())
    }

    /// Update the chart for `symbol`. Never fails; see `RenderOutcome`.
    pub async fn update_chart(&self, symbol: &str) -> RenderOutcome {
        self.update_chart_with_cancel(symbol, &CancellationToken::new())
            .await
    }

    /// Like `update_chart`, but abandons the run when `cancel` fires.
    ///
    /// A cancelled run leaves the container as it was; whoever cancelled it
    /// owns the container from then on. Runs sharing one updater write under a
    /// common gate, so once `cancel` fires before the next run starts, no write
    /// from this run lands after that run's first one.
    pub async fn update_chart_with_cancel(
        &self,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> RenderOutcome {
        let Some(container) = self.page.container(&self.container_id) else {
            warn!(
                container = %self.container_id,
                "chart container not found; chart will not be rendered"
            );
            return RenderOutcome::NoContainer;
        };

        let period = self.current_period();
        let loading = self.write(cancel, || {
            container.show_notice(Notice::Loading {
                symbol: symbol.to_string(),
                period: period.clone(),
            })
        });
        let result = match loading {
            Ok(()) => self.render(symbol, &period, container.as_ref(), cancel).await,
            Err(e) => Err(e),
        };

        let shown = match result {
            Ok(outcome) => return outcome,
            Err(UpdateError::Cancelled) => Err(UpdateError::Cancelled),
            Err(e) => {
                let message = e.to_string();
                self.write(cancel, || {
                    container.show_notice(Notice::Failed {
                        symbol: symbol.to_string(),
                        message: message.clone(),
                    })
                })
                .map(|()| message)
            }
        };
        match shown {
            Ok(message) => {
                error!(symbol, period = %period, error = %message, "error rendering chart");
                RenderOutcome::Failed(message)
            }
            Err(_) => {
                info!(symbol, period = %period, "chart update cancelled");
                RenderOutcome::Cancelled
            }
        }
    }

    /// Run one container write unless `cancel` has fired.
    fn write<T>(
        &self,
        cancel: &CancellationToken,
        write: impl FnOnce() -> T,
    ) -> Result<T, UpdateError> {
        let _gate = self.write_gate.lock().unwrap_or_else(|p| p.into_inner());
        if cancel.is_cancelled() {
            return Err(UpdateError::Cancelled);
        }
        Ok(write())
    }

    async fn render(
        &self,
        symbol: &str,
        period: &str,
        container: &dyn ChartContainer,
        cancel: &CancellationToken,
    ) -> Result<RenderOutcome, UpdateError> {
        let fetch = self.source.fetch_table(symbol, period);
        let fetch = async {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, fetch)
                    .await
                    .unwrap_or(Err(FetchError::Timeout(limit))),
                None => fetch.await,
            }
        };

        let table = tokio::select! {
            _ = cancel.cancelled() => return Err(UpdateError::Cancelled),
            res = fetch => res?,
        };

        if table.is_empty() {
            self.write(cancel, || {
                container.show_notice(Notice::NoData {
                    symbol: symbol.to_string(),
                })
            })?;
            info!(symbol, period, "no chart data for selected period");
            return Ok(RenderOutcome::NoData);
        }

        let columns = match OhlcColumns::resolve(&table.columns) {
            Ok(columns) => columns,
            Err(missing) => {
                error!(
                    symbol,
                    columns = ?table.columns,
                    "{missing}"
                );
                self.write(cancel, || {
                    container.show_notice(Notice::MissingColumns {
                        missing: missing.missing.clone(),
                    })
                })?;
                return Ok(RenderOutcome::MissingColumns(missing.missing));
            }
        };

        table.validate_shape()?;

        let figure = build_figure(symbol, period, &table, &columns);
        self.write(cancel, || self.port.plot(container, &figure))??;

        info!(
            symbol,
            period,
            rows = table.row_count(),
            volume = columns.volume.is_some(),
            "chart rendered"
        );
        Ok(RenderOutcome::Rendered {
            traces: figure.data.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::TabularResponse;
    use crate::render::{ContainerContent, HtmlPage, PlotlyPort};
    use async_trait::async_trait;

    struct StaticSource(TabularResponse);

    #[async_trait]
    impl PriceSource for StaticSource {
        fn name(&self) -> &str {
            "static"
        }

        async fn fetch_table(&self, _: &str, _: &str) -> Result<TabularResponse, FetchError> {
            Ok(self.0.clone())
        }
    }

    fn updater(page: Arc<HtmlPage>, table: TabularResponse) -> ChartUpdater {
        ChartUpdater::new(
            &ChartConfig::default(),
            Arc::new(StaticSource(table)),
            Arc::new(PlotlyPort),
            page,
        )
    }

    #[test]
    fn current_period_falls_back_to_default() {
        let page = Arc::new(HtmlPage::new());
        let u = updater(page.clone(), TabularResponse::default());
        assert_eq!(u.current_period(), "1y");
        page.set_period("periodSelect", "max");
        assert_eq!(u.current_period(), "max");
    }

    #[tokio::test]
    async fn empty_index_shows_no_data() {
        let page = Arc::new(HtmlPage::new().with_container("stockChartContainer"));
        let outcome = updater(page.clone(), TabularResponse::default())
            .update_chart("AAPL")
            .await;
        assert_eq!(outcome, RenderOutcome::NoData);
        let content = page.html_container("stockChartContainer").unwrap().content();
        assert_eq!(
            content,
            ContainerContent::Notice(Notice::NoData {
                symbol: "AAPL".into()
            })
        );
    }

    #[tokio::test]
    async fn missing_container_is_a_no_op() {
        let page = Arc::new(HtmlPage::new());
        let outcome = updater(page, TabularResponse::default())
            .update_chart("AAPL")
            .await;
        assert_eq!(outcome, RenderOutcome::NoContainer);
    }

    #[test]
    fn failure_predicate() {
        assert!(RenderOutcome::Failed("x".into()).is_failure());
        assert!(!RenderOutcome::NoData.is_failure());
    }
}
