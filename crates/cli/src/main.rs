//! Server Sentinel CLI
//!
//! A command-line tool for inspecting the sentinel daemon's derived
//! dashboard state: overall status, per-metric parameters, the
//! composite stress index, and daemon health.

mod client;
mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{health, parameters, status, stress};

/// Server Sentinel CLI
#[derive(Parser)]
#[command(name = "sentinelctl")]
#[command(author, version, about = "CLI for the Server Sentinel monitoring daemon", long_about = None)]
pub struct Cli {
    /// Daemon API URL (can also be set via SENTINEL_API_URL env var)
    #[arg(long, global = true, env = "SENTINEL_API_URL", default_value = "http://localhost:8080")]
    pub api_url: String,

    /// Output format
    #[arg(long, short, global = true, default_value = "table")]
    pub format: output::OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the reconciled crash-prediction status
    Status,

    /// Show per-metric parameters, alerts, and the performance score
    Parameters,

    /// Show the composite stress series
    Stress,

    /// Show daemon component health
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize client
    let client = client::ApiClient::new(&cli.api_url)?;

    // Execute command
    match cli.command {
        Commands::Status => status::show_status(&client, cli.format).await?,
        Commands::Parameters => parameters::show_parameters(&client, cli.format).await?,
        Commands::Stress => stress::show_stress(&client, cli.format).await?,
        Commands::Health => health::show_health(&client, cli.format).await?,
    }

    Ok(())
}
