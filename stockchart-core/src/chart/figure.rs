//! Plotly-compatible figure model.
//!
//! Field names follow Plotly's JSON schema so a serialized `Figure` can be fed
//! straight to `Plotly.newPlot(el, data, layout, config)`.

use serde::{Deserialize, Serialize};

/// A complete chart: traces, layout and plot options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
    pub config: PlotConfig,
}

impl Figure {
    pub fn candlestick(&self) -> Option<&CandlestickTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Candlestick(c) => Some(c),
            _ => None,
        })
    }

    pub fn volume(&self) -> Option<&BarTrace> {
        self.data.iter().find_map(|t| match t {
            Trace::Bar(b) => Some(b),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Candlestick(CandlestickTrace),
    Bar(BarTrace),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandlestickTrace {
    pub x: Vec<String>,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub name: String,
    pub increasing: DirectionStyle,
    pub decreasing: DirectionStyle,
}

impl CandlestickTrace {
    /// True when every OHLC array is as long as `x`.
    pub fn is_aligned(&self) -> bool {
        let n = self.x.len();
        self.open.len() == n && self.high.len() == n && self.low.len() == n && self.close.len() == n
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionStyle {
    pub line: LineStyle,
    pub fillcolor: String,
}

impl DirectionStyle {
    pub fn solid(color: &str) -> Self {
        Self {
            line: LineStyle {
                color: color.to_string(),
            },
            fillcolor: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub x: Vec<String>,
    pub y: Vec<Option<f64>>,
    pub name: String,
    /// Axis reference, e.g. `"y2"`.
    pub yaxis: String,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub yaxis2: Option<SecondaryYAxis>,
    pub margin: Margin,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxis {
    pub title: String,
    #[serde(rename = "type")]
    pub axis_type: String,
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    pub title: String,
    pub autorange: bool,
    /// Vertical fraction `[from, to]` of the plot area.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub domain: Option<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryYAxis {
    pub title: String,
    pub overlaying: String,
    pub side: String,
    pub showgrid: bool,
    pub autorange: bool,
    pub domain: [f64; 2],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub t: u32,
    pub b: u32,
    pub l: u32,
    pub r: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotConfig {
    pub responsive: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self { responsive: true }
    }
}
