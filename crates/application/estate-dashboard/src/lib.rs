//! # Estate Dashboard
//!
//! The portfolio overview: eight metric cards, six charts and the
//! per-type distribution lines, all derived from one [`Dataset`].
//!
//! ```text
//!   Dataset ──► compose() ──► DashboardModel { cards, charts, distribution }
//!                                                  │
//!                              ChartRegistry ◄─────┘  (one handle per chart,
//!                                    │                 destroy before redraw)
//!                              ChartBackend
//! ```

pub mod cards;
pub mod charts;
pub mod registry;

pub use cards::{distribution_lines, metric_cards, DistributionLine, MetricCard};
pub use charts::{chart_dataset, chart_datasets, ChartData, ChartId, ChartKind, ValueUnit};
pub use registry::{ChartBackend, ChartRegistry};

use estate_core::Dataset;
use serde::Serialize;

/// Result type for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Chart backend error: {0}")]
    Backend(String),

    #[error("Dashboard has not been rendered")]
    NotRendered,
}

/// Everything the overview displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardModel {
    pub cards: Vec<MetricCard>,
    pub charts: Vec<ChartData>,
    pub distribution: Vec<DistributionLine>,
}

impl DashboardModel {
    pub fn chart(&self, id: ChartId) -> Option<&ChartData> {
        self.charts.iter().find(|c| c.id == id)
    }
}

pub fn compose(dataset: &Dataset) -> DashboardModel {
    DashboardModel {
        cards: metric_cards(dataset),
        charts: chart_datasets(dataset),
        distribution: distribution_lines(dataset),
    }
}

/// A composed overview with its drawn charts
pub struct Dashboard<B: ChartBackend> {
    backend: B,
    registry: ChartRegistry<B::Handle>,
    model: Option<DashboardModel>,
    renders: u64,
}

impl<B: ChartBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            registry: ChartRegistry::new(),
            model: None,
            renders: 0,
        }
    }

    /// Compose the model and (re)draw every chart.
    pub fn render(&mut self, dataset: &Dataset) -> Result<&DashboardModel> {
        let model = compose(dataset);
        for chart in &model.charts {
            self.registry.redraw(&mut self.backend, chart)?;
        }
        self.renders += 1;
        tracing::info!(
            properties = dataset.len(),
            charts = model.charts.len(),
            render = self.renders,
            "dashboard rendered"
        );
        Ok(self.model.insert(model))
    }

    pub fn model(&self) -> Result<&DashboardModel> {
        self.model.as_ref().ok_or(DashboardError::NotRendered)
    }

    pub fn handle(&self, id: ChartId) -> Option<&B::Handle> {
        self.registry.get(id)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn renders(&self) -> u64 {
        self.renders
    }
}

impl<B: ChartBackend> Drop for Dashboard<B> {
    fn drop(&mut self) {
        self.registry.clear(&mut self.backend);
    }
}
