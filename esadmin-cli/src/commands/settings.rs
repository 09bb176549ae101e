use anyhow::Result;
use esadmin::settings::{number_of_replicas, number_of_shards, refresh_interval};
use esadmin::AdminClient;
use serde_json::Value;

/// Print the settings document of the configured index
pub async fn run_settings(client: &AdminClient, node: usize, compact: bool) -> Result<()> {
    let doc = client.settings(node).await?;
    let index = &client.config().index;

    tracing::debug!(
        index = %index,
        shards = ?number_of_shards(&doc, index),
        replicas = ?number_of_replicas(&doc, index),
        refresh_interval = ?refresh_interval(&doc, index),
        "Fetched settings"
    );

    let doc = Value::Object(doc);
    let rendered = if compact {
        serde_json::to_string(&doc)?
    } else {
        serde_json::to_string_pretty(&doc)?
    };
    println!("{}", rendered);

    Ok(())
}
