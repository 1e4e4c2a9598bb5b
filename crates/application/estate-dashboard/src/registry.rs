//! Chart handle registry
//!
//! At most one live handle per chart. Redrawing a chart destroys its old
//! handle through the backend before the new one is created.

use crate::{ChartData, ChartId, Result};
use std::collections::HashMap;

/// Something that can draw a chart and later tear it down
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, chart: &ChartData) -> Result<Self::Handle>;

    fn destroy(&mut self, handle: Self::Handle);
}

/// Live chart handles keyed by chart id
#[derive(Debug)]
pub struct ChartRegistry<H> {
    handles: HashMap<ChartId, H>,
}

impl<H> Default for ChartRegistry<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> ChartRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the chart's handle with a freshly drawn one.
    pub fn redraw<B>(&mut self, backend: &mut B, chart: &ChartData) -> Result<&H>
    where
        B: ChartBackend<Handle = H>,
    {
        if let Some(old) = self.handles.remove(&chart.id) {
            tracing::debug!(chart = %chart.id, "destroying chart");
            backend.destroy(old);
        }

        let handle = backend.create(chart)?;
        tracing::debug!(chart = %chart.id, points = chart.len(), "chart drawn");
        Ok(self.handles.entry(chart.id).or_insert(handle))
    }

    pub fn get(&self, id: ChartId) -> Option<&H> {
        self.handles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Destroy every handle
    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: ChartBackend<Handle = H>,
    {
        for (_, handle) in self.handles.drain() {
            backend.destroy(handle);
        }
    }
}
