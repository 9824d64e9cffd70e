//! CLI entry point for the followgraph operator shell.
//!
//! Writes JSON results to stdout and logs to stderr.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use followgraph_store::FollowStore;

use followgraph_cli::commands::{execute, Command};
use followgraph_cli::settings::load_store_config;

#[derive(Parser)]
#[command(name = "followgraph")]
#[command(about = "Record and query who follows whom")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: followgraph).
    #[arg(short, long, default_value = "followgraph", global = true)]
    config: String,

    /// Override the database path from config.
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt().with_env_filter(filter).with_writer(std::io::stderr);
    if cli.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    let store_config = load_store_config(&cli.config, cli.database)?;

    let store = FollowStore::open(&store_config)?;
    let output = execute(&store, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
