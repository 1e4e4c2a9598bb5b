//! # Estate Source
//!
//! The one asynchronous step of the application: fetch the portfolio
//! document and turn it into a [`Dataset`].
//!
//! ```text
//!   location ──► Transport (http / file) ──► bytes ──► parse_document ──► Dataset
//!                      │                                    │
//!                      └──────────── LoadError ◄────────────┘
//! ```
//!
//! Failures are reported once and never retried here; retrying is a user
//! action owned by the caller.

pub mod document;
pub mod transport;

pub use document::{parse_document, METRICS_MEMBER, PROPERTIES_MEMBER};
pub use transport::{FileTransport, HttpTransport, Transport};

use chrono::{DateTime, Utc};
use estate_core::Dataset;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::RwLock;

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, LoadError>;

/// Everything that can make a load fail
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch data: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required member `{0}`")]
    MissingMember(&'static str),

    #[error("Fetched data is not in the expected format: {0}")]
    Malformed(String),

    #[error(transparent)]
    Dataset(#[from] estate_core::Error),

    #[error("Invalid source location: {0}")]
    InvalidLocation(String),
}

/// Load counters
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourceStats {
    pub successful_loads: u64,
    pub failed_loads: u64,
    pub last_loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// A configured document source
pub struct DatasetSource {
    transport: Box<dyn Transport>,
    stats: RwLock<SourceStats>,
}

impl DatasetSource {
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
            stats: RwLock::new(SourceStats::default()),
        }
    }

    /// Pick a transport from a location string.
    ///
    /// `http://` and `https://` go over the network, `file://` URLs and
    /// anything else are read from disk.
    pub fn from_location(location: &str, timeout: Option<Duration>) -> Result<Self> {
        let location = location.trim();
        if location.is_empty() {
            return Err(LoadError::InvalidLocation("empty location".into()));
        }

        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = url::Url::parse(location)
                .map_err(|e| LoadError::InvalidLocation(format!("{location}: {e}")))?;
            return Ok(Self::new(HttpTransport::new(url, timeout)?));
        }

        if lower.starts_with("file://") {
            let path = url::Url::parse(location)
                .ok()
                .and_then(|url| url.to_file_path().ok())
                .ok_or_else(|| LoadError::InvalidLocation(location.to_string()))?;
            return Ok(Self::new(FileTransport::new(path)));
        }

        Ok(Self::new(FileTransport::new(location)))
    }

    /// Human-readable origin, for logs and error views
    pub fn describe(&self) -> String {
        self.transport.describe()
    }

    /// Fetch and parse the document.
    pub async fn load(&self) -> Result<Dataset> {
        let origin = self.transport.describe();
        tracing::info!(%origin, "loading portfolio document");

        let result = match self.transport.fetch().await {
            Ok(bytes) => parse_document(&bytes),
            Err(e) => Err(e),
        };

        let mut stats = self.stats.write().await;
        match &result {
            Ok(dataset) => {
                stats.successful_loads += 1;
                stats.last_loaded_at = Some(Utc::now());
                stats.last_error = None;
                tracing::info!(%origin, properties = dataset.len(), "portfolio loaded");
            }
            Err(e) => {
                stats.failed_loads += 1;
                stats.last_error = Some(e.to_string());
                tracing::error!(%origin, error = %e, "failed to load portfolio");
            }
        }

        result
    }

    pub async fn stats(&self) -> SourceStats {
        self.stats.read().await.clone()
    }
}
