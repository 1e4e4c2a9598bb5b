//! Document transports

use crate::{LoadError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Something that can produce the raw document bytes
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self) -> Result<Vec<u8>>;

    fn describe(&self) -> String;
}

/// HTTP(S) GET; any non-success status is a load failure
pub struct HttpTransport {
    url: Url,
    client: reqwest::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new(url: Url, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LoadError::Request(e.to_string()))?;

        Ok(Self {
            url,
            client,
            timeout,
        })
    }

    fn map_error(&self, error: reqwest::Error) -> LoadError {
        match self.timeout {
            Some(timeout) if error.is_timeout() => LoadError::Timeout(timeout),
            _ => LoadError::Request(error.to_string()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.map_error(e))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

/// Local file read
pub struct FileTransport {
    path: PathBuf,
}

impl FileTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Transport for FileTransport {
    async fn fetch(&self) -> Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|source| LoadError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
