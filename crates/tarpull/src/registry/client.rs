use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Proxy settings read from the registry configuration.
///
/// Either field may be unset when the registry client is not configured to
/// go through a proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub proxy: Option<String>,
    #[serde(rename = "https-proxy")]
    pub https_proxy: Option<String>,
}

/// Configuration loaded from the registry client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the registry the client talks to
    pub registry: Option<String>,
    pub proxy: Option<String>,
    #[serde(rename = "https-proxy")]
    pub https_proxy: Option<String>,
}

impl RegistryConfig {
    /// The proxy subset of this configuration
    pub fn proxies(&self) -> ProxyConfig {
        ProxyConfig {
            proxy: self.proxy.clone(),
            https_proxy: self.https_proxy.clone(),
        }
    }
}

/// Command-style interface to a package registry.
///
/// Implementations own authentication, transport retries, and whatever else
/// the wire protocol needs. Callers only see loaded configuration and parsed
/// JSON replies.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Load the client's configuration
    async fn load(&self) -> Result<RegistryConfig>;

    /// Look up `field` for `target` (a package name or `name@version`)
    async fn view(&self, target: &str, field: &str, silent: bool) -> Result<Value>;
}
