//! Stockchart TUI - terminal candlestick chart for the stock API
//!
//! - Symbol input: type a ticker, Enter loads it
//! - Period selector: Tab / ← / → cycle 1mo, 3mo, 1y, 5y, max and reload
//! - Chart container: candles in the top 75%, volume in the bottom 20%
//!
//! The chart container is a `Page` for `ChartUpdater`; a new load cancels the
//! one still in flight.

pub mod app;
pub mod input;
pub mod panels;
pub mod surface;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
pub use theme::Theme;
