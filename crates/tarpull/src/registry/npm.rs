//! Registry client backed by the `npm` command line tool.

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;

use crate::error::{Result, TarpullError};

use super::client::{RegistryClient, RegistryConfig};

/// Talks to the registry by invoking `npm` as a subprocess.
///
/// Each call spawns a fresh process, so there is no shared state between
/// calls beyond the npm configuration on disk.
pub struct NpmClient {
    program: String,
}

impl NpmClient {
    pub fn new() -> Self {
        Self::with_program("npm")
    }

    /// Use an alternative npm binary (tests, vendored installs)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for NpmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryClient for NpmClient {
    async fn load(&self) -> Result<RegistryConfig> {
        log::debug!("Loading npm configuration");

        let output = Command::new(&self.program)
            .args(["config", "list", "--json"])
            .output()
            .await
            .map_err(|e| TarpullError::ConfigLoad {
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TarpullError::ConfigLoad {
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let settings: Value =
            serde_json::from_slice(&output.stdout).map_err(|e| TarpullError::ConfigLoad {
                reason: e.to_string(),
            })?;

        Ok(RegistryConfig {
            registry: string_setting(&settings, "registry"),
            proxy: string_setting(&settings, "proxy"),
            https_proxy: string_setting(&settings, "https-proxy"),
        })
    }

    async fn view(&self, target: &str, field: &str, silent: bool) -> Result<Value> {
        log::debug!("npm view {} {}", target, field);

        let mut args = vec!["view", target, field, "--json"];
        if silent {
            args.push("--silent");
        }

        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|e| TarpullError::Query {
                target: target.to_string(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(TarpullError::Query {
                target: target.to_string(),
                reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let reply = stdout.trim();
        if reply.is_empty() {
            return Err(TarpullError::MalformedReply {
                target: target.to_string(),
            });
        }

        serde_json::from_str(reply).map_err(|_| TarpullError::MalformedReply {
            target: target.to_string(),
        })
    }
}

// npm prints `null` for unset keys; serde maps that to None via as_str
fn string_setting(settings: &Value, key: &str) -> Option<String> {
    settings.get(key).and_then(Value::as_str).map(str::to_string)
}
