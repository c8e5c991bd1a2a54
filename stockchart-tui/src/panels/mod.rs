//! Drawable panels.

pub mod candle_chart;

pub use candle_chart::{bars_from_figure, CandleChartPanel, OhlcBar};
