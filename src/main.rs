use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use memory_lane::{cli, config, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memory-lane", version, about = "Family memory keeper: albums, timeline, stories, and music")]
struct Cli {
    /// Config file (defaults to ~/.memory-lane/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve {
        /// Override the bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Show record counts and storage usage
    Stats,
    /// Export all records as JSON to stdout
    Export,
    /// Import records from an export file
    Import {
        /// Path to a JSON file produced by `export`
        file: PathBuf,
    },
    /// Import the flat JSON files written by older Memory Lane versions
    ImportLegacy {
        /// Directory containing albums.json, timeline.json, stories.json, ...
        dir: PathBuf,
    },
    /// Check database integrity and media files
    Doctor,
    /// Delete all records and uploaded files
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => config::LaneConfig::load_from(path)?,
        None => config::LaneConfig::load()?,
    };

    // stdout is reserved for command output such as `export`
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            server::serve(config).await?;
        }
        Command::Stats => cli::stats::stats(&config)?,
        Command::Export => cli::export::export(&config)?,
        Command::Import { file } => cli::import::import(&config, &file)?,
        Command::ImportLegacy { dir } => cli::legacy::import_legacy(&config, &dir)?,
        Command::Doctor => cli::doctor::doctor(&config)?,
        Command::Reset => cli::reset::reset(&config)?,
    }

    Ok(())
}
