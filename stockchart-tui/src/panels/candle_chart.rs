//! Candle chart panel - OHLC candles with a volume strip
//!
//! Renders a `Figure` using direct buffer writes:
//! - Each candle = 1 terminal column, most recent bars kept when narrow
//! - Body: block char, positive color if close ≥ open, negative otherwise
//! - Wicks: vertical line chars to high/low
//! - Volume: bars in the bottom 20% of the plot, candles in the top 75%

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Widget},
};
use stockchart_core::chart::Figure;

use crate::theme::Theme;

/// One drawable candle. Rows with a gap in any OHLC value are skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcBar {
    pub label: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Flatten the figure's candlestick (and volume) series into bars.
pub fn bars_from_figure(figure: &Figure) -> Vec<OhlcBar> {
    let Some(candles) = figure.candlestick() else {
        return Vec::new();
    };
    let volume = figure.volume();

    candles
        .x
        .iter()
        .enumerate()
        .filter_map(|(i, label)| {
            let open = candles.open.get(i).copied().flatten()?;
            let high = candles.high.get(i).copied().flatten()?;
            let low = candles.low.get(i).copied().flatten()?;
            let close = candles.close.get(i).copied().flatten()?;
            let volume = volume.and_then(|v| v.y.get(i).copied().flatten());
            Some(OhlcBar {
                label: label.clone(),
                open,
                high,
                low,
                close,
                volume,
            })
        })
        .collect()
}

/// Short `YYYY-MM-DD` form of an index label; unknown formats pass through.
pub fn format_date_label(label: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(label) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_str(label, "%Y-%m-%d %H:%M:%S%:z") {
        return dt.format("%Y-%m-%d").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(label, fmt) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(label, "%Y-%m-%d") {
        return d.format("%Y-%m-%d").to_string();
    }
    label.to_string()
}

/// Compact volume label: 950, 1.5K, 2.3M, 4.1B.
pub fn format_volume(v: f64) -> String {
    let a = v.abs();
    if a >= 1e9 {
        format!("{:.1}B", v / 1e9)
    } else if a >= 1e6 {
        format!("{:.1}M", v / 1e6)
    } else if a >= 1e3 {
        format!("{:.1}K", v / 1e3)
    } else {
        format!("{v:.0}")
    }
}

/// Candle chart panel widget
pub struct CandleChartPanel<'a> {
    figure: &'a Figure,
    theme: &'a Theme,
}

impl<'a> CandleChartPanel<'a> {
    pub fn new(figure: &'a Figure, theme: &'a Theme) -> Self {
        Self { figure, theme }
    }

    /// Map a value to a row offset inside a region of `height` rows (0 = top).
    fn value_to_y(value: f64, lower: f64, upper: f64, height: u16) -> u16 {
        if (upper - lower).abs() < 1e-9 || height == 0 {
            return 0;
        }
        let frac = (value - lower) / (upper - lower);
        let y = height.saturating_sub(1) as f64 * (1.0 - frac);
        y.round().max(0.0).min(height.saturating_sub(1) as f64) as u16
    }
}

impl<'a> Widget for CandleChartPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bars = bars_from_figure(self.figure);
        let title_text = &self.figure.layout.title;

        if bars.is_empty() {
            Block::default()
                .title(format!(" {title_text} [No Data] "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.muted))
                .style(Style::default().bg(self.theme.background))
                .render(area, buf);
            return;
        }

        let up_count = bars.iter().filter(|b| b.close >= b.open).count();
        let down_count = bars.len() - up_count;

        let block = Block::default()
            .title(format!(
                " {title_text} | {} bars | {up_count} up {down_count} down ",
                bars.len()
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.accent))
            .style(Style::default().bg(self.theme.background));
        let inner = block.inner(area);
        block.render(area, buf);

        // Left margin for y labels, bottom row for dates.
        let label_width: u16 = 9;
        let plot_left = inner.x + label_width;
        let plot_top = inner.y;
        let plot_width = inner.width.saturating_sub(label_width);
        let plot_height = inner.height.saturating_sub(1);

        if plot_width == 0 || plot_height == 0 {
            return;
        }

        let visible = bars.len().min(plot_width as usize);
        let bars = &bars[bars.len() - visible..];

        let has_volume = self.figure.volume().is_some() && bars.iter().any(|b| b.volume.is_some());
        let (candle_height, volume_height) = if has_volume && plot_height >= 5 {
            (
                (plot_height as u32 * 75 / 100) as u16,
                ((plot_height as u32 * 20 / 100) as u16).max(1),
            )
        } else {
            (plot_height, 0)
        };
        let volume_top = plot_top + plot_height - volume_height;

        // Price bounds
        let y_min = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let y_max = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let range = y_max - y_min;
        let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
        let y_lower = y_min - pad;
        let y_upper = y_max + pad;

        let label_style = self.theme.muted();
        let y_labels = [y_upper, (y_upper + y_lower) / 2.0, y_lower];
        let y_positions = [0u16, candle_height / 2, candle_height.saturating_sub(1)];
        for (value, y_pos) in y_labels.iter().zip(y_positions.iter()) {
            buf.set_string(inner.x, plot_top + y_pos, format!("{value:>8.2}"), label_style);
        }

        for (i, bar) in bars.iter().enumerate() {
            let x = plot_left + i as u16;
            if x >= inner.right() {
                break;
            }
            let style = Style::default().fg(self.theme.candle_color(bar.open, bar.close));

            let high_y = Self::value_to_y(bar.high, y_lower, y_upper, candle_height);
            let low_y = Self::value_to_y(bar.low, y_lower, y_upper, candle_height);
            let body_top_y =
                Self::value_to_y(bar.open.max(bar.close), y_lower, y_upper, candle_height);
            let body_bot_y =
                Self::value_to_y(bar.open.min(bar.close), y_lower, y_upper, candle_height);

            for y in high_y..body_top_y {
                buf.set_string(x, plot_top + y, "│", style);
            }
            let body = if bar.close >= bar.open { "█" } else { "▓" };
            for y in body_top_y..=body_bot_y {
                buf.set_string(x, plot_top + y, body, style);
            }
            for y in (body_bot_y + 1)..=low_y {
                buf.set_string(x, plot_top + y, "│", style);
            }
        }

        if volume_height > 0 {
            let max_volume = bars
                .iter()
                .filter_map(|b| b.volume)
                .fold(0.0_f64, f64::max);
            buf.set_string(
                inner.x,
                volume_top,
                format!("{:>8}", format_volume(max_volume)),
                label_style,
            );

            let style = Style::default().fg(self.theme.volume);
            for (i, bar) in bars.iter().enumerate() {
                let x = plot_left + i as u16;
                if x >= inner.right() {
                    break;
                }
                let Some(v) = bar.volume.filter(|v| *v > 0.0 && max_volume > 0.0) else {
                    continue;
                };
                let rows = ((v / max_volume) * volume_height as f64).round().max(1.0) as u16;
                let rows = rows.min(volume_height);
                for r in 0..rows {
                    buf.set_string(x, volume_top + volume_height - 1 - r, "█", style);
                }
            }
        }

        // Date axis: first and last visible labels.
        let axis_y = plot_top + plot_height;
        if let (Some(first), Some(last)) = (bars.first(), bars.last()) {
            let first = format_date_label(&first.label);
            let last = format_date_label(&last.label);
            buf.set_stringn(plot_left, axis_y, &first, plot_width as usize, label_style);
            let last_x = (plot_left + plot_width).saturating_sub(last.chars().count() as u16);
            if bars.len() > 1 && last_x > plot_left + first.chars().count() as u16 {
                buf.set_string(last_x, axis_y, &last, label_style);
            }
        }
    }
}
