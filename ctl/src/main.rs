use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentinel_client::ClientConfig;
use tracing_subscriber::EnvFilter;

use crate::commands::{ExportParams, ListParams};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "sentinelctl")]
pub struct Args {
    #[clap(subcommand)]
    command: Command,

    /// TOML file with client settings. `SENTINEL_*` environment variables
    /// override it.
    #[clap(long, short, global = true, env = "SENTINEL_CONFIG_PATH")]
    config_path: Option<PathBuf>,

    /// Dashboard backend to talk to, overriding the configured one.
    #[clap(long, global = true)]
    api_url: Option<String>,
}

#[derive(Clone, Subcommand)]
pub enum Command {
    /// Print a list page by page, as the dashboard's "load more" does
    #[command(name = "list")]
    List(ListParams),

    /// Print a whole list fetched in a single request
    #[command(name = "export")]
    Export(ExportParams),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or("sentinel_client=info,sentinelctl=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::load(args.config_path.as_deref())?;
    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }

    match args.command {
        Command::List(params) => commands::list(&config, params).await,
        Command::Export(params) => commands::export(&config, params).await,
    }
}
