//! Terminal page: one chart container plus the period control.
//!
//! The updater writes into these from a tokio task while the draw loop reads
//! them on the main thread, so all state sits behind mutexes.

use std::sync::{Arc, Mutex, MutexGuard};

use stockchart_core::render::{ChartContainer, ContainerContent, Page};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Chart area of the terminal UI.
#[derive(Debug)]
pub struct TerminalContainer {
    id: String,
    content: Mutex<ContainerContent>,
}

impl TerminalContainer {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Mutex::new(ContainerContent::Empty),
        }
    }

    pub fn content(&self) -> ContainerContent {
        lock(&self.content).clone()
    }
}

impl ChartContainer for TerminalContainer {
    fn id(&self) -> &str {
        &self.id
    }

    fn replace(&self, content: ContainerContent) {
        *lock(&self.content) = content;
    }
}

#[derive(Debug)]
pub struct TerminalSurface {
    container: Arc<TerminalContainer>,
    period_select_id: String,
    period: Mutex<String>,
}

impl TerminalSurface {
    pub fn new(container_id: &str, period_select_id: &str, period: &str) -> Self {
        Self {
            container: Arc::new(TerminalContainer::new(container_id)),
            period_select_id: period_select_id.to_string(),
            period: Mutex::new(period.to_string()),
        }
    }

    pub fn chart(&self) -> &TerminalContainer {
        &self.container
    }

    pub fn set_period(&self, period: &str) {
        *lock(&self.period) = period.to_string();
    }

    pub fn selected_period(&self) -> String {
        lock(&self.period).clone()
    }
}

impl Page for TerminalSurface {
    fn container(&self, id: &str) -> Option<Arc<dyn ChartContainer>> {
        (id == self.container.id).then(|| self.container.clone() as Arc<dyn ChartContainer>)
    }

    fn period(&self, id: &str) -> Option<String> {
        (id == self.period_select_id).then(|| self.selected_period())
    }
}
