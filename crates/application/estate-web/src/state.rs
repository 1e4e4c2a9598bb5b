//! Application state for the web dashboard

use crate::charts::{SvgBackend, SvgChart};
use estate_config::EstateConfig;
use estate_core::Dataset;
use estate_dashboard::{ChartId, Dashboard, DashboardModel};
use estate_listview::{SortKey, TypeFilter};
use estate_session::Session;
use estate_source::{DatasetSource, SourceStats};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

/// One successful load: the session plus the overview drawn from it.
///
/// Swapped as a unit, so a page never pairs a session with a model
/// rendered from another load.
#[derive(Debug)]
pub struct Snapshot {
    pub session: Arc<Session>,
    pub model: DashboardModel,
    pub charts: Vec<SvgChart>,
}

impl Snapshot {
    pub fn chart_markup(&self, id: ChartId) -> Option<&str> {
        self.charts
            .iter()
            .find(|chart| chart.id == id)
            .map(|chart| chart.markup.as_str())
    }
}

/// Outcome of the latest load
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Nothing loaded yet
    Pending,
    Ready(Arc<Snapshot>),
    /// The load failed; the message is shown with a retry action
    Failed(String),
}

/// Shared application state
pub struct AppState {
    pub config: EstateConfig,
    source: DatasetSource,
    load: RwLock<LoadState>,
    dashboard: Mutex<Dashboard<SvgBackend>>,
    started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(source: DatasetSource, config: EstateConfig) -> Self {
        Self {
            config,
            source,
            load: RwLock::new(LoadState::Pending),
            dashboard: Mutex::new(Dashboard::new(SvgBackend::new())),
            started_at: chrono::Utc::now(),
        }
    }

    /// Fetch the document again and swap in a fresh snapshot.
    ///
    /// On failure the previous session is dropped: the page shows the error
    /// view until the next successful reload.
    pub async fn reload(&self) -> LoadState {
        let mut slot = self.load.write().await;
        self.load_into(&mut slot).await
    }

    /// Current load state; the first caller loads, concurrent callers wait
    /// for that load instead of starting their own.
    pub async fn current(&self) -> LoadState {
        {
            let state = self.load.read().await;
            if !matches!(*state, LoadState::Pending) {
                return state.clone();
            }
        }

        let mut slot = self.load.write().await;
        if matches!(*slot, LoadState::Pending) {
            return self.load_into(&mut slot).await;
        }
        slot.clone()
    }

    /// Load while the caller holds the write lock on `slot`.
    async fn load_into(&self, slot: &mut LoadState) -> LoadState {
        let next = match self.source.load().await {
            Ok(dataset) => match self.snapshot(dataset).await {
                Ok(snapshot) => LoadState::Ready(Arc::new(snapshot)),
                Err(e) => LoadState::Failed(e.to_string()),
            },
            Err(e) => LoadState::Failed(e.to_string()),
        };

        *slot = next.clone();
        next
    }

    async fn snapshot(&self, dataset: Dataset) -> estate_dashboard::Result<Snapshot> {
        let session = Arc::new(Session::new(dataset));
        let mut dashboard = self.dashboard.lock().await;
        let model = dashboard.render(session.dataset())?.clone();
        let charts = model
            .charts
            .iter()
            .filter_map(|chart| dashboard.handle(chart.id).cloned())
            .collect();

        Ok(Snapshot {
            session,
            model,
            charts,
        })
    }

    pub fn origin(&self) -> String {
        self.source.describe()
    }

    pub async fn source_stats(&self) -> SourceStats {
        self.source.stats().await
    }

    /// Configured default filter, `all` when the configured value is unusable
    pub fn default_filter(&self) -> TypeFilter {
        self.config.view.default_filter.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %self.config.view.default_filter, "invalid default filter");
            TypeFilter::All
        })
    }

    /// Configured default sort, `value-desc` when the configured value is unusable
    pub fn default_sort(&self) -> SortKey {
        self.config.view.default_sort.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %self.config.view.default_sort, "invalid default sort");
            SortKey::default()
        })
    }

    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}
