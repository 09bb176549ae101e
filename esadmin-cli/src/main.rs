use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esadmin::config::DEFAULT_SERVER;
use esadmin::{AdminClient, AdminConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "esadmin")]
#[command(about = "Flush indexes and inspect settings and shard placement on a cluster")]
#[command(version)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Cluster node URL (repeat or comma-separate for several nodes)
    #[arg(
        short,
        long = "server",
        env = "ESADMIN_SERVERS",
        value_delimiter = ',',
        global = true
    )]
    servers: Vec<String>,

    /// Target index
    #[arg(short, long, env = "ESADMIN_INDEX", global = true)]
    index: Option<String>,

    /// Basic auth user
    #[arg(short, long, env = "ESADMIN_USERNAME", global = true)]
    username: Option<String>,

    /// Basic auth password
    #[arg(short, long, env = "ESADMIN_PASSWORD", hide_env_values = true, global = true)]
    password: Option<String>,

    /// Position of the node to talk to in the server list
    #[arg(short, long, default_value = "0", global = true)]
    node: usize,

    /// Retries on transport failure
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Log status lines and request details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Force a flush of the index
    Flush,

    /// Print the index settings document
    Settings {
        /// Print on a single line
        #[arg(long)]
        compact: bool,
    },

    /// List shard copies and the nodes hosting them
    Shards {
        /// Index to inspect instead of the configured one
        #[arg(long = "of")]
        of_index: Option<String>,

        /// Print raw rows as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Merge the optional config file with the command line
    fn admin_config(&self) -> Result<AdminConfig> {
        let mut config = match &self.config {
            Some(path) => AdminConfig::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => {
                let index = self
                    .index
                    .clone()
                    .context("No index given: use --index, ESADMIN_INDEX or a config file")?;
                AdminConfig::new(vec![DEFAULT_SERVER.to_string()], index)
            }
        };

        if !self.servers.is_empty() {
            config.servers = self.servers.clone();
        }
        if let Some(index) = &self.index {
            config.index = index.clone();
        }
        if self.username.is_some() {
            config.username = self.username.clone();
        }
        if self.password.is_some() {
            config.password = self.password.clone();
        }
        if let Some(retries) = self.retries {
            config.retry.max_retries = retries;
        }
        config.verbose |= self.verbose;

        Ok(config)
    }
}

/// Log filter used when `RUST_LOG` is unset
fn log_filter(verbose: bool) -> &'static str {
    if verbose {
        "esadmin=debug,info"
    } else {
        "info"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.admin_config()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_filter(config.verbose).into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = AdminClient::new(config).context("Invalid configuration")?;
    tracing::debug!(
        node = cli.node,
        nodes = client.node_count(),
        index = %client.config().index,
        "Client ready"
    );

    match cli.command {
        Commands::Flush => commands::run_flush(&client, cli.node).await?,
        Commands::Settings { compact } => commands::run_settings(&client, cli.node, compact).await?,
        Commands::Shards { of_index, json } => {
            commands::run_shards(&client, cli.node, of_index.as_deref(), json).await?
        }
    }

    Ok(())
}
