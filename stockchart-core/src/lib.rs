//! Stockchart Core - fetch OHLC price tables and render them as candlestick charts.
//!
//! - `data`: the split-orientation wire table, case-insensitive OHLC column
//!   resolution, and the `PriceSource` seam with its HTTP implementation
//! - `chart`: Plotly-compatible figure model and the figure builder
//! - `render`: page / container / charting-port traits, HTML + Plotly host
//! - `updater`: `ChartUpdater`, the fetch → validate → build → plot flow
//! - `config`, `logging`: TOML configuration and tracing setup

pub mod chart;
pub mod config;
pub mod data;
pub mod logging;
pub mod render;
pub mod updater;

pub use config::ChartConfig;
pub use updater::{ChartUpdater, RenderOutcome};
