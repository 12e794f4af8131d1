// crates/trench-server/src/main.rs
// Trench - MCP tool server for a satellite ground-station simulator

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use trench::config::EnvConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env files (global first, then project - project overrides)
    let _ = dotenvy::from_path(trench::config::file::config_dir().join(".env"));
    let _ = dotenvy::dotenv(); // Load .env from current directory

    let cli = Cli::parse();

    // Set up logging based on command
    let default_level = match &cli.command {
        None | Some(Commands::Serve { http: false, .. }) => Level::WARN, // Quiet for MCP stdio
        Some(Commands::Serve { http: true, .. }) => Level::INFO,
        Some(Commands::Tool { .. }) | Some(Commands::Config) => Level::INFO,
    };
    let log_level = EnvConfig::log_level_from_env().unwrap_or(default_level);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => cli::run_mcp_server().await?,
        Some(Commands::Serve { http, port, host }) => {
            if http {
                cli::run_http_server(&host, port).await?;
            } else {
                cli::run_mcp_server().await?;
            }
        }
        Some(Commands::Tool { name, args }) => cli::run_tool(name, args).await?,
        Some(Commands::Config) => cli::run_config_check()?,
    }

    Ok(())
}
