//! Retrieval of the raw exports.
//!
//! A source is either a local file or an http(s) URL. URL sources can get a
//! cache-busting `v=<millis>` query parameter so that intermediate caches
//! never serve a stale sheet export.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

/// Errors that can occur during fetching.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Content too large: {size} bytes (max {max_size})")]
    ContentTooLarge { size: usize, max_size: usize },
}

/// Where a raw export lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Source {
    Path(PathBuf),
    Url(Url),
}

impl Source {
    /// Interpret `s` as a URL when it has an http(s) scheme, otherwise as a path.
    pub fn parse(s: &str) -> Result<Self, FetchError> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            Url::parse(s)
                .map(Source::Url)
                .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", s, e)))
        } else {
            Ok(Source::Path(PathBuf::from(s)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(p) => write!(f, "{}", p.display()),
            Source::Url(u) => write!(f, "{}", u),
        }
    }
}

impl TryFrom<String> for Source {
    type Error = FetchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Source::parse(&s)
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        source.to_string()
    }
}

/// Configuration for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout
    pub timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Maximum content size to fetch (default 20MB)
    pub max_content_size: usize,

    /// Append `v=<unix millis>` to URL sources
    pub cache_bust: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: concat!("ladder-stats/", env!("CARGO_PKG_VERSION")).to_string(),
            max_content_size: 20 * 1024 * 1024,
            cache_bust: true,
        }
    }
}

/// Reads raw exports from files or over HTTP.
pub struct Fetcher {
    client: Client,
    config: FetcherConfig,
}

impl Fetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static("ladder-stats")),
        );

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Create a fetcher with default configuration.
    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetcherConfig::default())
    }

    /// Read the full text of `source`.
    pub async fn fetch_text(&self, source: &Source) -> Result<String, FetchError> {
        match source {
            Source::Path(path) => {
                debug!("Reading {}", path.display());
                let content = fs::read(path).await.map_err(|e| FetchError::Io {
                    path: path.clone(),
                    source: e,
                })?;
                self.decode(&content)
            }
            Source::Url(url) => self.fetch_url(url).await,
        }
    }

    async fn fetch_url(&self, url: &Url) -> Result<String, FetchError> {
        let url = if self.config.cache_bust {
            Self::cache_busted(url, Utc::now().timestamp_millis())
        } else {
            url.clone()
        };
        info!("Fetching {}", url);

        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let content = response.bytes().await?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        self.decode(&content)
    }

    /// Size-check raw bytes and decode them; invalid UTF-8 becomes U+FFFD
    /// so one bad byte never fails a whole export.
    fn decode(&self, content: &[u8]) -> Result<String, FetchError> {
        if content.len() > self.config.max_content_size {
            return Err(FetchError::ContentTooLarge {
                size: content.len(),
                max_size: self.config.max_content_size,
            });
        }
        Ok(String::from_utf8_lossy(content).into_owned())
    }

    /// Copy of `url` with a `v` query parameter set to `stamp`.
    fn cache_busted(url: &Url, stamp: i64) -> Url {
        let mut busted = url.clone();
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != "v")
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        {
            let mut pairs = busted.query_pairs_mut();
            pairs.clear();
            for (k, v) in &kept {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("v", &stamp.to_string());
        }
        busted
    }
}
