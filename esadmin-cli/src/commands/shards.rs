use anyhow::Result;
use esadmin::{shards_per_node, AdminClient, ShardRow};

/// List shard copies of an index as reported by one node
pub async fn run_shards(
    client: &AdminClient,
    node: usize,
    index: Option<&str>,
    json: bool,
) -> Result<()> {
    let index = index.unwrap_or(&client.config().index);
    let rows = client.shard_info_for(node, index).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Shards of {}", index);
    println!("{}", "=".repeat(10 + index.len()));
    for line in shard_table(&rows) {
        println!("{}", line);
    }
    println!();

    let per_node = shards_per_node(&rows);
    let unassigned = rows.iter().filter(|r| !r.is_assigned()).count();
    println!("{:<24} {:<10} {:<10}", "NODE", "PRIMARIES", "REPLICAS");
    println!("{}", "-".repeat(44));
    for (name, count) in &per_node {
        println!("{:<24} {:<10} {:<10}", name, count.primaries, count.replicas);
    }
    if unassigned > 0 {
        println!();
        println!("Unassigned copies: {}", unassigned);
    }

    Ok(())
}

fn shard_table(rows: &[ShardRow]) -> Vec<String> {
    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!(
        "{:<6} {:<8} {:<16} {:<24} {:<24}",
        "SHARD", "ROLE", "IP", "ID", "NODE"
    ));
    lines.push("-".repeat(82));
    for row in rows {
        lines.push(format!(
            "{:<6} {:<8} {:<16} {:<24} {:<24}",
            row.shard,
            row.role(),
            or_dash(&row.ip),
            or_dash(&row.id),
            or_dash(&row.node),
        ));
    }
    lines
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
