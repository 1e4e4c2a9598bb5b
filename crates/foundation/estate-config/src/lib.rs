//! # Estate Config
//!
//! Configuration is resolved in layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. YAML file (explicit path, else `~/.config/estate/config.yaml` if present)
//! 3. environment (`ESTATE_SOURCE`, `ESTATE_TIMEOUT_SECS`, `ESTATE_HOST`, `ESTATE_PORT`)
//! 4. command-line flags, applied by the caller
//!
//! ```yaml
//! source:
//!   location: https://example.org/data/propertiesData.json
//!   timeout_secs: 15
//! server:
//!   host: 0.0.0.0
//!   port: 8080
//! view:
//!   default_filter: all
//!   default_sort: value-desc
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while resolving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstateConfig {
    pub source: SourceConfig,
    pub server: ServerConfig,
    pub view: ViewConfig,
}

/// Where the portfolio document comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// `http(s)://` URL, `file://` URL or plain filesystem path
    pub location: String,
    /// Request timeout; no timeout when unset
    pub timeout_secs: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: "data/propertiesData.json".into(),
            timeout_secs: None,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// HTTP listener for the web dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 3000,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Initial property-list parameters, in their wire form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    pub default_filter: String,
    pub default_sort: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_filter: "all".into(),
            default_sort: "value-desc".into(),
        }
    }
}

impl EstateConfig {
    /// Default config file location (~/.config/estate/config.yaml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("estate").join("config.yaml"))
    }

    /// Resolve file and environment layers.
    ///
    /// An explicit `path` must exist; the default location is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse YAML text; an empty document yields defaults
    pub fn from_yaml(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Apply environment overrides through a lookup function.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(location) = lookup("ESTATE_SOURCE").filter(|v| !v.trim().is_empty()) {
            self.source.location = location;
        }
        if let Some(value) = lookup("ESTATE_TIMEOUT_SECS") {
            let secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "ESTATE_TIMEOUT_SECS",
                value: value.clone(),
            })?;
            self.source.timeout_secs = Some(secs);
        }
        if let Some(host) = lookup("ESTATE_HOST").filter(|v| !v.trim().is_empty()) {
            self.server.host = host;
        }
        if let Some(value) = lookup("ESTATE_PORT") {
            self.server.port = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: "ESTATE_PORT",
                value: value.clone(),
            })?;
        }
        Ok(())
    }
}
