//! esadmin: out-of-band administration of Elasticsearch-compatible clusters
//!
//! Operations, each against one node picked by position in the configured
//! server list:
//! - `POST /{index}/_flush` - force a segment flush
//! - `GET /{index}/_settings` - read index settings as an opaque document
//! - `GET /_cat/shards/{index}` - list shard copies and their nodes
//!
//! Transport failures are retried with capped exponential backoff; HTTP
//! error statuses are reported, never retried.

pub mod client;
pub mod config;
pub mod error;
mod flush;
pub mod paths;
pub mod request;
pub mod retry;
pub mod settings;
pub mod shards;

pub use client::AdminClient;
pub use config::AdminConfig;
pub use error::{AdminError, Result};
pub use request::RequestIssuer;
pub use retry::RetryConfig;
pub use settings::SettingsDocument;
pub use shards::{shards_per_node, NodeShardCount, ShardRole, ShardRow};
