//! Application state - single-owner, main-thread only.
//!
//! Loads run as tokio tasks on the runtime handle; the chart container they
//! write into is shared with the draw loop, and their outcomes come back over
//! a channel drained once per frame.

use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use stockchart_core::data::PriceSource;
use stockchart_core::render::FigurePort;
use stockchart_core::{ChartConfig, ChartUpdater, RenderOutcome};

use crate::surface::TerminalSurface;
use crate::theme::Theme;

/// Periods offered by the selector, in cycling order.
pub const PERIODS: [&str; 5] = ["1mo", "3mo", "1y", "5y", "max"];

/// Longest symbol the input accepts.
pub const MAX_SYMBOL_LEN: usize = 12;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Outcome of one load task.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub seq: u64,
    pub symbol: String,
    pub period: String,
    pub outcome: RenderOutcome,
}

pub struct AppState {
    pub running: bool,
    pub symbol_input: String,
    /// Symbol of the most recent load request.
    pub loaded_symbol: Option<String>,
    pub period_idx: usize,
    pub surface: Arc<TerminalSurface>,
    pub status_message: Option<(String, StatusLevel)>,
    pub theme: Theme,

    updater: Arc<ChartUpdater>,
    runtime: Handle,
    inflight: Option<CancellationToken>,
    seq: u64,
    loading: bool,
    result_tx: UnboundedSender<LoadResult>,
    result_rx: UnboundedReceiver<LoadResult>,
}

impl AppState {
    pub fn new(config: &ChartConfig, source: Arc<dyn PriceSource>, runtime: Handle) -> Self {
        let period_idx = PERIODS
            .iter()
            .position(|p| *p == config.default_period)
            .unwrap_or(2);
        let surface = Arc::new(TerminalSurface::new(
            &config.container_id,
            &config.period_select_id,
            PERIODS[period_idx],
        ));
        let updater = Arc::new(ChartUpdater::new(
            config,
            source,
            Arc::new(FigurePort),
            surface.clone(),
        ));
        let (result_tx, result_rx) = unbounded_channel();

        Self {
            running: true,
            symbol_input: String::new(),
            loaded_symbol: None,
            period_idx,
            surface,
            status_message: None,
            theme: Theme::default(),
            updater,
            runtime,
            inflight: None,
            seq: 0,
            loading: false,
            result_tx,
            result_rx,
        }
    }

    pub fn period(&self) -> &'static str {
        PERIODS[self.period_idx]
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Step the period selector and reload the current symbol, if any.
    pub fn cycle_period(&mut self, forward: bool) {
        self.period_idx = if forward {
            (self.period_idx + 1) % PERIODS.len()
        } else {
            (self.period_idx + PERIODS.len() - 1) % PERIODS.len()
        };
        self.surface.set_period(self.period());
        debug!(period = self.period(), "period changed");

        if let Some(symbol) = self.loaded_symbol.clone() {
            self.load(symbol);
        }
    }

    /// Load the symbol typed into the input.
    pub fn submit(&mut self) {
        let symbol = self.symbol_input.trim().to_uppercase();
        if symbol.is_empty() {
            self.set_warning("Type a symbol first");
            return;
        }
        self.load(symbol);
    }

    /// Start a load, cancelling whichever one is still running.
    pub fn load(&mut self, symbol: String) {
        if let Some(previous) = self.inflight.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.inflight = Some(token.clone());
        self.seq += 1;
        self.loading = true;
        self.loaded_symbol = Some(symbol.clone());

        let seq = self.seq;
        let period = self.period().to_string();
        let updater = self.updater.clone();
        let tx = self.result_tx.clone();
        info!(seq, symbol = %symbol, period = %period, "starting chart load");
        self.set_status(format!("Loading {symbol} ({period})..."));

        self.runtime.spawn(async move {
            let outcome = updater.update_chart_with_cancel(&symbol, &token).await;
            let _ = tx.send(LoadResult {
                seq,
                symbol,
                period,
                outcome,
            });
        });
    }

    /// Apply finished loads (non-blocking). Returns how many were applied.
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(result) = self.result_rx.try_recv() {
            if result.seq != self.seq {
                debug!(seq = result.seq, "dropping stale load result");
                continue;
            }
            self.loading = false;
            self.inflight = None;
            self.apply(result);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, result: LoadResult) {
        let LoadResult {
            symbol, period, outcome, ..
        } = result;
        match outcome {
            RenderOutcome::Rendered { traces } => {
                let what = if traces > 1 { "candles + volume" } else { "candles" };
                self.set_status(format!("{symbol} ({period}): {what}"));
            }
            RenderOutcome::NoData => {
                self.set_warning(format!("No data for {symbol} ({period})"));
            }
            RenderOutcome::MissingColumns(missing) => {
                self.set_warning(format!("{symbol}: missing {}", missing.join(", ")));
            }
            RenderOutcome::Failed(message) => self.set_error(message),
            RenderOutcome::NoContainer => self.set_error("chart container not found"),
            RenderOutcome::Cancelled => {}
        }
    }

    /// Cancel any in-flight load.
    pub fn shutdown(&mut self) {
        if let Some(token) = self.inflight.take() {
            token.cancel();
        }
        self.running = false;
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockchart_core::data::{FetchError, TabularResponse};

    struct NeverCalled;

    #[async_trait::async_trait]
    impl PriceSource for NeverCalled {
        fn name(&self) -> &str {
            "never"
        }

        async fn fetch_table(&self, _: &str, _: &str) -> Result<TabularResponse, FetchError> {
            Err(FetchError::Network("unexpected fetch".into()))
        }
    }

    fn app(runtime: &tokio::runtime::Runtime, config: &ChartConfig) -> AppState {
        AppState::new(config, Arc::new(NeverCalled), runtime.handle().clone())
    }

    #[test]
    fn period_cycle() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt, &ChartConfig::default());
        assert_eq!(app.period(), "1y");

        app.cycle_period(true);
        assert_eq!(app.period(), "5y");
        app.cycle_period(true);
        assert_eq!(app.period(), "max");
        app.cycle_period(true);
        assert_eq!(app.period(), "1mo");
        app.cycle_period(false);
        assert_eq!(app.period(), "max");

        use stockchart_core::render::Page;
        assert_eq!(app.surface.period("periodSelect").as_deref(), Some("max"));
    }

    #[test]
    fn cycling_without_symbol_does_not_load() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt, &ChartConfig::default());
        app.cycle_period(true);
        assert!(!app.is_loading());
        assert!(app.loaded_symbol.is_none());
    }

    #[test]
    fn default_period_from_config() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let config = ChartConfig {
            default_period: "3mo".into(),
            ..ChartConfig::default()
        };
        assert_eq!(app(&rt, &config).period(), "3mo");

        let config = ChartConfig {
            default_period: "10y".into(),
            ..ChartConfig::default()
        };
        assert_eq!(app(&rt, &config).period(), "1y");
    }

    #[test]
    fn empty_submit_warns() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt, &ChartConfig::default());
        app.symbol_input = "   ".into();
        app.submit();
        assert!(!app.is_loading());
        assert_eq!(
            app.status_message.as_ref().map(|(_, l)| *l),
            Some(StatusLevel::Warning)
        );
    }

    #[test]
    fn stale_results_are_dropped() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut app = app(&rt, &ChartConfig::default());
        app.seq = 2;
        app.loading = true;
        app.result_tx
            .send(LoadResult {
                seq: 1,
                symbol: "OLD".into(),
                period: "1y".into(),
                outcome: RenderOutcome::Failed("stale".into()),
            })
            .unwrap();
        assert_eq!(app.drain_results(), 0);
        assert!(app.is_loading());
    }
}
