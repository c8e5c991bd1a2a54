//! Chart figure model and construction

pub mod build;
pub mod figure;

pub use build::{build_figure, chart_title};
pub use figure::{BarTrace, CandlestickTrace, Figure, Layout, PlotConfig, Trace};
