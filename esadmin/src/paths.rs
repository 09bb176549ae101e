//! Endpoint URL construction for administrative calls

use crate::error::{AdminError, Result};
use url::Url;

const MAX_INDEX_NAME_BYTES: usize = 255;
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ',', '#', ' ', ':'];

/// Columns requested from the shard catalog, in display order
pub const SHARD_COLUMNS: &str = "shard,prirep,ip,id,node";

/// Check an index name against the cluster's naming rules
pub fn validate_index_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| AdminError::InvalidIndexName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("must not be '.' or '..'"));
    }
    if name.len() > MAX_INDEX_NAME_BYTES {
        return Err(invalid("must not be longer than 255 bytes"));
    }
    if name.starts_with(['-', '_', '+']) {
        return Err(invalid("must not start with '-', '_' or '+'"));
    }
    if name.chars().any(|c| c.is_uppercase()) {
        return Err(invalid("must be lowercase"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return Err(invalid(&format!("must not contain '{}'", c)));
    }
    Ok(())
}

/// Endpoint with `segments` appended to its path
///
/// Each segment is percent-encoded on its own, so `%`, `/` and dots inside a
/// name can never turn into extra or dropped path segments.
fn endpoint_with_segments(endpoint: &str, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(endpoint.trim_end_matches('/'))?;
    url.path_segments_mut()
        .map_err(|_| AdminError::Config(format!("endpoint cannot carry a path: {}", endpoint)))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// `{endpoint}/{index}/{action}`, e.g. `http://es:9200/ai/_flush`
pub fn index_action_url(endpoint: &str, index: &str, action: &str) -> Result<Url> {
    validate_index_name(index)?;
    endpoint_with_segments(endpoint, &[index, action])
}

/// Shard catalog URL restricted to the columns `ShardRow` decodes
pub fn cat_shards_url(endpoint: &str, index: &str) -> Result<Url> {
    validate_index_name(index)?;
    let mut url = endpoint_with_segments(endpoint, &["_cat", "shards", index])?;
    url.query_pairs_mut()
        .append_pair("format", "json")
        .append_pair("h", SHARD_COLUMNS);
    Ok(url)
}
