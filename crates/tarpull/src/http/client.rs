//! HTTP client used by the fetcher.
//!
//! A thin wrapper around `reqwest` with:
//! - Custom User-Agent and timeout configuration
//! - Per-scheme proxy support fed from the registry configuration
//! - Streaming downloads with progress tracking
//!
//! Every request is a single best-effort attempt. Retrying is a caller
//! decision, not something this client does behind the caller's back.
//!
//! # Examples
//!
//! ```no_run
//! use tarpull::http::{HttpClient, HttpClientConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = HttpClientConfig::new()
//!     .with_timeout(Duration::from_secs(60))
//!     .with_proxy("http://proxy.example.com:8080".to_string());
//! let client = HttpClient::with_config(config)?;
//!
//! client.download(
//!     "http://registry.example.org/bower/-/bower-1.7.7.tgz",
//!     "/tmp/bower-1.7.7.tgz".as_ref(),
//!     None::<fn(u64, u64)>,
//! ).await?;
//! # Ok(())
//! # }
//! ```

use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::registry::ProxyConfig;

const DEFAULT_USER_AGENT: &str = "tarpull/0.1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status}: {url}")]
    HttpStatus { status: u16, url: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_config(HttpClientConfig::default())
    }

    pub fn with_config(config: HttpClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .user_agent(&config.user_agent);

        // Plain and TLS traffic may go through different proxies
        if let Some(proxy_url) = &config.proxy {
            builder = builder.proxy(reqwest::Proxy::http(proxy_url)?);
        }
        if let Some(proxy_url) = &config.https_proxy {
            builder = builder.proxy(reqwest::Proxy::https(proxy_url)?);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            user_agent: config.user_agent,
        })
    }

    /// Perform a GET request, treating any non-success status as an error
    pub async fn get(&self, url: &str) -> Result<Response, HttpError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    /// Download file with progress callback
    pub async fn download<F>(
        &self,
        url: &str,
        dest: &Path,
        progress: Option<F>,
    ) -> Result<(), HttpError>
    where
        F: Fn(u64, u64),
    {
        let response = self.get(url).await?;

        // Total size from Content-Length, 0 when the server omits it
        let total_size = response.content_length().unwrap_or(0);

        let mut file = File::create(dest).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();

        use futures_util::StreamExt;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref callback) = progress {
                callback(downloaded, total_size);
            }
        }

        file.flush().await?;

        Ok(())
    }

    /// Get the configured user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub proxy: Option<String>,
    pub https_proxy: Option<String>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            proxy: None,
            https_proxy: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl HttpClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    pub fn with_https_proxy(mut self, https_proxy: String) -> Self {
        self.https_proxy = Some(https_proxy);
        self
    }

    /// Take both proxy settings from a loaded registry configuration
    pub fn with_proxies(mut self, proxies: &ProxyConfig) -> Self {
        self.proxy = proxies.proxy.clone();
        self.https_proxy = proxies.https_proxy.clone();
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}
