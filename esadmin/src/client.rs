//! Administrative client
//!
//! Every operation takes the position of the target node in
//! [`AdminConfig::servers`] and talks to that node only. The client holds no
//! mutable state, so clones can be used concurrently against different nodes.

use crate::config::AdminConfig;
use crate::error::Result;
use crate::request::RequestIssuer;
use std::sync::Arc;

/// Entry point for flush, settings and shard placement calls
///
/// # Example
///
/// ```no_run
/// use esadmin::{AdminClient, AdminConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AdminConfig::new(vec!["http://localhost:9200".into()], "ai")
///     .with_credentials("elastic", "changeme");
/// let client = AdminClient::new(config)?;
///
/// client.flush(0).await?;
/// let settings = client.settings(0).await?;
/// let shards = client.shard_info(0).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AdminClient {
    pub(crate) config: Arc<AdminConfig>,
    pub(crate) issuer: RequestIssuer,
}

impl AdminClient {
    /// Validate `config` and build the underlying HTTP client
    pub fn new(config: AdminConfig) -> Result<Self> {
        config.validate()?;
        let issuer = RequestIssuer::new(&config)?;
        Ok(Self {
            config: Arc::new(config),
            issuer,
        })
    }

    pub fn config(&self) -> &AdminConfig {
        &self.config
    }

    pub fn issuer(&self) -> &RequestIssuer {
        &self.issuer
    }

    /// Number of addressable nodes
    pub fn node_count(&self) -> usize {
        self.config.servers.len()
    }
}
