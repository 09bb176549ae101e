use anyhow::Result;
use esadmin::AdminClient;

/// Flush the configured index on one node
pub async fn run_flush(client: &AdminClient, node: usize) -> Result<()> {
    let status = client.flush(node).await?;
    let index = &client.config().index;

    if status.is_success() {
        println!("Index {} flushed on node {} ({})", index, node, status);
    } else {
        anyhow::bail!("Flush of {} on node {} was rejected ({})", index, node, status);
    }

    Ok(())
}
