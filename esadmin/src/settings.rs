//! Index settings
//!
//! The cluster answers `GET /{index}/_settings` with a document whose shape
//! depends on its version and on whether flat settings were requested:
//!
//! ```text
//! {"ai": {"settings": {"index": {"number_of_shards": "5", "version": {"created": "6020399"}}}}}
//! {"ai": {"settings": {"index.number_of_shards": "5", "index.version.created": "6020399"}}}
//! ```
//!
//! [`AdminClient::settings`] returns the document untouched. The free
//! functions below read individual values out of either shape.

use crate::client::AdminClient;
use crate::error::{AdminError, Result};
use crate::paths::index_action_url;
use crate::request::decode_json;
use reqwest::Method;
use serde_json::{Map, Value};

/// Settings response keyed by index name
pub type SettingsDocument = Map<String, Value>;

impl AdminClient {
    /// Fetch the settings of the configured index from node `idx`
    pub async fn settings(&self, idx: usize) -> Result<SettingsDocument> {
        let endpoint = self.config.endpoint(idx)?;
        let url = index_action_url(endpoint, &self.config.index, "_settings")?;

        let response = self.issuer.issue(Method::GET, &url, None).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AdminError::Status {
                operation: "fetch settings",
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        decode_json(&url, response).await
    }
}

/// The `settings` object of `index`
pub fn index_settings<'a>(doc: &'a SettingsDocument, index: &str) -> Option<&'a Map<String, Value>> {
    doc.get(index)?.get("settings")?.as_object()
}

/// Look up a dotted key such as `index.refresh_interval`
pub fn setting<'a>(doc: &'a SettingsDocument, index: &str, key: &str) -> Option<&'a Value> {
    lookup(index_settings(doc, index)?, key)
}

// Tries the whole key first, then every split point, so flat, nested and
// mixed documents all resolve.
fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }
    key.match_indices('.').find_map(|(pos, _)| {
        let inner = map.get(&key[..pos])?.as_object()?;
        lookup(inner, &key[pos + 1..])
    })
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        _ => None,
    }
}

pub fn number_of_shards(doc: &SettingsDocument, index: &str) -> Option<u32> {
    setting(doc, index, "index.number_of_shards").and_then(as_u32)
}

pub fn number_of_replicas(doc: &SettingsDocument, index: &str) -> Option<u32> {
    setting(doc, index, "index.number_of_replicas").and_then(as_u32)
}

pub fn refresh_interval<'a>(doc: &'a SettingsDocument, index: &str) -> Option<&'a str> {
    setting(doc, index, "index.refresh_interval").and_then(Value::as_str)
}
