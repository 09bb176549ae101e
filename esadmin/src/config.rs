//! Administrative client configuration
//!
//! The configuration is an immutable value: the caller builds it once
//! (programmatically or from a TOML file) and every operation reads it.

use crate::error::{AdminError, Result};
use crate::paths::validate_index_name;
use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Cluster endpoints, target index, credentials and timeouts
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Base URLs of the cluster nodes, addressed by position
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Index the operations act on
    pub index: String,

    /// Basic auth user, only sent together with a password
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Log a status line for operations that otherwise stay quiet
    #[serde(default)]
    pub verbose: bool,

    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_ms: u64,

    /// Timeout for a single request attempt in milliseconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Deadline for a whole shard listing call in milliseconds
    #[serde(default = "default_shard_timeout")]
    pub shard_timeout_ms: u64,

    #[serde(default)]
    pub retry: RetryConfig,
}

/// Node used when no server is configured
pub const DEFAULT_SERVER: &str = "http://localhost:9200";

fn default_servers() -> Vec<String> {
    vec![DEFAULT_SERVER.to_string()]
}

fn default_connect_timeout() -> u64 {
    5000
}

fn default_request_timeout() -> u64 {
    30000
}

fn default_shard_timeout() -> u64 {
    10000
}

impl AdminConfig {
    pub fn new(servers: Vec<String>, index: impl Into<String>) -> Self {
        Self {
            servers,
            index: index.into(),
            username: None,
            password: None,
            verbose: false,
            connect_timeout_ms: default_connect_timeout(),
            request_timeout_ms: default_request_timeout(),
            shard_timeout_ms: default_shard_timeout(),
            retry: RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_shard_timeout(mut self, timeout: Duration) -> Self {
        self.shard_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AdminError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AdminError::Config(e.to_string()))
    }

    /// Check the invariants every operation relies on
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(AdminError::Config("at least one server is required".into()));
        }
        for server in &self.servers {
            let parsed = url::Url::parse(server)?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(AdminError::Config(format!(
                    "server must use http:// or https://, got: {}",
                    server
                )));
            }
        }
        validate_index_name(&self.index)?;
        for (name, value) in [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("request_timeout_ms", self.request_timeout_ms),
            ("shard_timeout_ms", self.shard_timeout_ms),
        ] {
            if value == 0 {
                return Err(AdminError::Config(format!("{} must be greater than 0", name)));
            }
        }
        if self.retry.multiplier < 1.0 {
            return Err(AdminError::Config(format!(
                "retry multiplier must be >= 1.0, got {}",
                self.retry.multiplier
            )));
        }
        Ok(())
    }

    /// Basic auth pair, present only when both parts are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    /// Endpoint of the node at position `idx`
    pub fn endpoint(&self, idx: usize) -> Result<&str> {
        self.servers
            .get(idx)
            .map(String::as_str)
            .ok_or(AdminError::NodeOutOfRange {
                idx,
                len: self.servers.len(),
            })
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn shard_timeout(&self) -> Duration {
        Duration::from_millis(self.shard_timeout_ms)
    }
}
