//! Color tokens for the terminal chart.
//!
//! Candle colors come from the figure builder's palette so the terminal view
//! matches the browser chart:
//! - **Positive**: teal `#26a69a` (close ≥ open)
//! - **Negative**: red `#ef5350` (close < open)
//! - **Volume**: dim gray bars under the candles

use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};
use stockchart_core::chart::build::{DECREASING_COLOR, INCREASING_COLOR};
use stockchart_core::render::Notice;

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Deep charcoal background
    pub background: Color,
    /// Focus, highlights, selected period
    pub accent: Color,
    /// Rising candles
    pub positive: Color,
    /// Falling candles, errors
    pub negative: Color,
    pub warning: Color,
    /// Volume bars
    pub volume: Color,
    /// Axis labels, hints
    pub muted: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

fn hex(s: &str, fallback: Color) -> Color {
    Color::from_str(s).unwrap_or(fallback)
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: Color::Rgb(0, 255, 255),
            positive: hex(INCREASING_COLOR, Color::Green),
            negative: hex(DECREASING_COLOR, Color::Red),
            warning: Color::Rgb(255, 140, 0),
            volume: Color::Rgb(100, 100, 100),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),
        }
    }

    /// Candle color: positive when the bar closed at or above its open.
    pub fn candle_color(&self, open: f64, close: f64) -> Color {
        if close >= open {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn notice_color(&self, notice: &Notice) -> Color {
        match notice {
            Notice::Failed { .. } => self.negative,
            Notice::MissingColumns { .. } => self.warning,
            Notice::Loading { .. } => self.accent,
            Notice::NoData { .. } => self.text_secondary,
        }
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn panel_border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }
}
