//! Content sources for transformed companion files
//!
//! The resolver asks a [`ContentSource`] for one candidate path at a time.
//! Sources report a missing path as [`FetchError::NotFound`]; every other
//! failure is still just "this candidate did not work" to the resolver.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use steward_common::config::{ContentConfig, ContentMode};
use steward_common::{Error, Result};
use thiserror::Error;
use tokio::sync::Mutex;

const USER_AGENT: &str = concat!("steward-review/", env!("CARGO_PKG_VERSION"));

/// Single-candidate fetch errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Nothing at this path
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server answered with a non-success status
    #[error("HTTP {status} for {path}")]
    Status { status: u16, path: String },

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Local filesystem error other than not-found
    #[error("IO error: {0}")]
    Io(String),
}

/// Backing store for transformed content, addressed by public path
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Fetch the raw body stored at `path` (e.g. `/transformed/A%20B.json`)
    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError>;
}

/// Build the content source described by configuration
pub fn from_config(config: &ContentConfig) -> Result<Arc<dyn ContentSource>> {
    match config.mode {
        ContentMode::Http => {
            let base_url = config
                .base_url
                .as_deref()
                .ok_or_else(|| Error::Config("content.base_url is required".to_string()))?;
            let source =
                HttpContentSource::new(base_url, config.timeout_secs.map(Duration::from_secs))?;
            Ok(Arc::new(source))
        }
        ContentMode::Directory => {
            let directory = config
                .directory
                .clone()
                .ok_or_else(|| Error::Config("content.directory is required".to_string()))?;
            Ok(Arc::new(DirectoryContentSource::new(directory)))
        }
        ContentMode::Offline => Ok(Arc::new(MemoryContentSource::new())),
    }
}

/// Fetches candidates over HTTP relative to a base URL
pub struct HttpContentSource {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpContentSource {
    /// Create new HTTP source; `None` keeps reqwest's default timeout
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| Error::Config(format!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ContentSource for HttpContentSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, "Fetching transformed content");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(path.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

/// Reads candidates from a local directory mirroring the public layout
pub struct DirectoryContentSource {
    root: PathBuf,
}

impl DirectoryContentSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a public path onto the root, refusing anything that escapes it
    fn local_path(&self, path: &str) -> Option<PathBuf> {
        let decoded = urlencoding::decode(path)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| path.to_string());
        let relative = Path::new(decoded.trim_start_matches('/'));

        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        Some(self.root.join(relative))
    }
}

#[async_trait]
impl ContentSource for DirectoryContentSource {
    fn name(&self) -> &'static str {
        "directory"
    }

    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        let local = self
            .local_path(path)
            .ok_or_else(|| FetchError::NotFound(path.to_string()))?;

        match tokio::fs::read_to_string(&local).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(path.to_string()))
            }
            Err(e) => Err(FetchError::Io(format!("{}: {}", local.display(), e))),
        }
    }
}

/// In-memory source keyed by exact path
///
/// Empty by default, which is the offline mode: every lookup misses and
/// records fall back to synthetic content. Keeps a log of requested paths.
#[derive(Default)]
pub struct MemoryContentSource {
    entries: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryContentSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.entries.insert(path.into(), body.into());
        self
    }

    /// Paths requested so far, in order
    pub async fn requested(&self) -> Vec<String> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl ContentSource for MemoryContentSource {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn fetch(&self, path: &str) -> std::result::Result<String, FetchError> {
        self.requests.lock().await.push(path.to_string());
        self.entries
            .get(path)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(path.to_string()))
    }
}
