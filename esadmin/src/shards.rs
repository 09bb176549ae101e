//! Shard placement via the shard catalog (`_cat/shards`)

use crate::client::AdminClient;
use crate::error::{AdminError, Result};
use crate::paths::cat_shards_url;
use crate::request::decode_json;
use reqwest::Method;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;
use url::Url;

/// One shard copy as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardRow {
    /// Shard ordinal, string-encoded by the cluster
    pub shard: String,
    /// `p` for a primary, `r` for a replica
    pub prirep: String,
    // Unassigned copies report null for the node columns.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ip: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub node: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardRole {
    Primary,
    Replica,
    Unknown,
}

impl ShardRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardRole::Primary => "primary",
            ShardRole::Replica => "replica",
            ShardRole::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ShardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl ShardRow {
    pub fn role(&self) -> ShardRole {
        match self.prirep.as_str() {
            "p" | "primary" => ShardRole::Primary,
            "r" | "replica" => ShardRole::Replica,
            _ => ShardRole::Unknown,
        }
    }

    pub fn ordinal(&self) -> Option<u32> {
        self.shard.parse().ok()
    }

    /// A copy without a node is unassigned
    pub fn is_assigned(&self) -> bool {
        !self.node.is_empty()
    }
}

/// Primary and replica copies hosted by one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeShardCount {
    pub primaries: usize,
    pub replicas: usize,
}

/// Copies per node, keyed by node name; unassigned copies are left out
pub fn shards_per_node(rows: &[ShardRow]) -> BTreeMap<String, NodeShardCount> {
    let mut counts: BTreeMap<String, NodeShardCount> = BTreeMap::new();
    for row in rows.iter().filter(|r| r.is_assigned()) {
        let entry = counts.entry(row.node.clone()).or_default();
        match row.role() {
            ShardRole::Primary => entry.primaries += 1,
            ShardRole::Replica => entry.replicas += 1,
            ShardRole::Unknown => {}
        }
    }
    counts
}

impl AdminClient {
    /// List shard copies of the configured index, asking node `idx`
    pub async fn shard_info(&self, idx: usize) -> Result<Vec<ShardRow>> {
        self.shard_info_for(idx, &self.config.index).await
    }

    /// List shard copies of `index`, asking node `idx`
    ///
    /// The whole call, retries included, is bounded by the configured shard
    /// timeout. On expiry the in-flight request is dropped, which closes its
    /// connection.
    pub async fn shard_info_for(&self, idx: usize, index: &str) -> Result<Vec<ShardRow>> {
        let endpoint = self.config.endpoint(idx)?;
        let url = cat_shards_url(endpoint, index)?;
        let timeout = self.config.shard_timeout();

        match tokio::time::timeout(timeout, self.fetch_shards(&url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(node = idx, url = %url, timeout_ms = timeout.as_millis() as u64, "Shard listing timed out");
                Err(AdminError::Timeout {
                    url: url.to_string(),
                    timeout,
                })
            }
        }
    }

    async fn fetch_shards(&self, url: &Url) -> Result<Vec<ShardRow>> {
        let response = self.issuer.issue(Method::GET, url, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Status {
                operation: "list shards",
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        decode_json(url, response).await
    }
}
