//! HTML page host and the Plotly.js charting port.
//!
//! `HtmlPage` is an in-memory stand-in for a browser document: named
//! containers plus period controls. `PlotlyPort` mounts a figure as a
//! `Plotly.newPlot` call, and the page serializes to a standalone document
//! that loads Plotly.js from its CDN.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::notice::escape_html;
use super::{check_figure, ChartContainer, ChartPort, ContainerContent, Page, PlotError};
use crate::chart::Figure;

pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A `<div>` on an `HtmlPage`.
#[derive(Debug)]
pub struct HtmlContainer {
    id: String,
    content: Mutex<ContainerContent>,
}

impl HtmlContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Mutex::new(ContainerContent::Empty),
        }
    }

    pub fn content(&self) -> ContainerContent {
        lock(&self.content).clone()
    }

    /// Current inner HTML of the container.
    pub fn inner_html(&self) -> String {
        match &*lock(&self.content) {
            ContainerContent::Empty => String::new(),
            ContainerContent::Notice(n) => n.to_html(),
            ContainerContent::Markup(m) => m.clone(),
            ContainerContent::Figure(f) => match serde_json::to_string(f) {
                Ok(json) => format!(
                    "<script type=\"application/json\">{}</script>",
                    escape_script(&json)
                ),
                Err(e) => format!("<p class=\"error-message\">{}</p>", escape_html(&e.to_string())),
            },
        }
    }
}

impl ChartContainer for HtmlContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn replace(&self, content: ContainerContent) {
        *lock(&self.content) = content;
    }
}

/// In-memory document with chart containers and period controls.
#[derive(Debug, Default)]
pub struct HtmlPage {
    containers: Mutex<BTreeMap<String, Arc<HtmlContainer>>>,
    periods: Mutex<BTreeMap<String, String>>,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(self, id: &str) -> Self {
        lock(&self.containers).insert(id.to_string(), Arc::new(HtmlContainer::new(id)));
        self
    }

    pub fn with_period(self, id: &str, value: &str) -> Self {
        self.set_period(id, value);
        self
    }

    pub fn set_period(&self, id: &str, value: &str) {
        lock(&self.periods).insert(id.to_string(), value.to_string());
    }

    pub fn html_container(&self, id: &str) -> Option<Arc<HtmlContainer>> {
        lock(&self.containers).get(id).cloned()
    }

    /// Serialize the page as a standalone HTML document.
    pub fn render_document(&self, title: &str) -> String {
        let mut body = String::new();
        for (id, value) in lock(&self.periods).iter() {
            body.push_str(&format!(
                "<input type=\"hidden\" id=\"{}\" value=\"{}\">\n",
                escape_html(id),
                escape_html(value)
            ));
        }
        for (id, container) in lock(&self.containers).iter() {
            body.push_str(&format!(
                "<div id=\"{}\" style=\"width:100%;height:600px;\">{}</div>\n",
                escape_html(id),
                container.inner_html()
            ));
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<script src=\"{PLOTLY_CDN}\"></script>\n</head>\n<body>\n{body}</body>\n</html>\n",
            escape_html(title)
        )
    }
}

impl Page for HtmlPage {
    fn container(&self, id: &str) -> Option<Arc<dyn ChartContainer>> {
        self.html_container(id)
            .map(|c| c as Arc<dyn ChartContainer>)
    }

    fn period(&self, id: &str) -> Option<String> {
        lock(&self.periods).get(id).cloned()
    }
}

/// Keep `</script>` sequences in JSON from closing the surrounding tag.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Charting port that emits Plotly.js mount markup.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlotlyPort;

impl PlotlyPort {
    /// `Plotly.newPlot(...)` script for `figure` targeting element `id`.
    pub fn mount_script(id: &str, figure: &Figure) -> Result<String, PlotError> {
        let target = to_json(id)?;
        let data = to_json(&figure.data)?;
        let layout = to_json(&figure.layout)?;
        let config = to_json(&figure.config)?;
        Ok(format!(
            "<script>Plotly.newPlot(document.getElementById({}), {}, {}, {});</script>",
            escape_script(&target),
            escape_script(&data),
            escape_script(&layout),
            escape_script(&config),
        ))
    }
}

impl ChartPort for PlotlyPort {
    fn plot(&self, container: &dyn ChartContainer, figure: &Figure) -> Result<(), PlotError> {
        check_figure(figure)?;
        let markup = Self::mount_script(container.id(), figure)?;
        container.replace(ContainerContent::Markup(markup));
        Ok(())
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, PlotError> {
    serde_json::to_string(value).map_err(|e| PlotError::Serialize(e.to_string()))
}
