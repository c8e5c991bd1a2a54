//! Rendering seams: the page, its chart container, and the charting port.
//!
//! A host (HTML document, terminal UI, test double) implements `Page` and
//! `ChartContainer`; a charting backend implements `ChartPort`. The updater
//! only talks to these traits.

pub mod html;
pub mod notice;

use std::sync::Arc;
use thiserror::Error;

use crate::chart::Figure;

pub use html::{HtmlContainer, HtmlPage, PlotlyPort};
pub use notice::{escape_html, Notice};

/// What a chart container currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ContainerContent {
    Empty,
    Notice(Notice),
    /// Host markup produced by a port (e.g. a Plotly mount script).
    Markup(String),
    /// A figure handed to a host that draws natively.
    Figure(Box<Figure>),
}

/// An addressable region the chart is drawn into.
///
/// Every write replaces the previous content.
pub trait ChartContainer: Send + Sync {
    fn id(&self) -> &str;

    fn replace(&self, content: ContainerContent);

    fn show_notice(&self, notice: Notice) {
        self.replace(ContainerContent::Notice(notice));
    }
}

/// The surface a chart lives on: element lookup by id.
pub trait Page: Send + Sync {
    fn container(&self, id: &str) -> Option<Arc<dyn ChartContainer>>;

    /// Current value of the period control with `id`, if the page has one.
    fn period(&self, id: &str) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("figure has no traces")]
    EmptyFigure,

    #[error("candlestick series are not aligned with the x axis")]
    Misaligned,

    #[error("failed to serialize figure: {0}")]
    Serialize(String),

    #[error("plot backend error: {0}")]
    Backend(String),
}

/// A charting backend able to draw a `Figure` into a container.
pub trait ChartPort: Send + Sync {
    fn plot(&self, container: &dyn ChartContainer, figure: &Figure) -> Result<(), PlotError>;
}

/// Port for hosts that draw natively: mounts the figure itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct FigurePort;

impl ChartPort for FigurePort {
    fn plot(&self, container: &dyn ChartContainer, figure: &Figure) -> Result<(), PlotError> {
        check_figure(figure)?;
        container.replace(ContainerContent::Figure(Box::new(figure.clone())));
        Ok(())
    }
}

/// Checks shared by every port before drawing.
pub fn check_figure(figure: &Figure) -> Result<(), PlotError> {
    if figure.data.is_empty() {
        return Err(PlotError::EmptyFigure);
    }
    if let Some(c) = figure.candlestick() {
        if !c.is_aligned() {
            return Err(PlotError::Misaligned);
        }
    }
    Ok(())
}
