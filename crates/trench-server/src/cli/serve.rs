// crates/trench-server/src/cli/serve.rs
// MCP server initialization and main loop

use anyhow::{Result, bail};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use trench::config::EnvConfig;
use trench::http::create_shared_client;
use trench::mcp::TrenchServer;
use trench::sim::SimulatorClient;

/// Build the server from configuration: validate, then wire the shared
/// HTTP client into the simulator client.
pub fn setup_server_context() -> Result<TrenchServer> {
    // Load configuration once (single source of truth)
    let env_config = EnvConfig::load();

    // Validate and log warnings
    let validation = env_config.validate();
    for warning in &validation.warnings {
        warn!("{}", warning);
    }
    if !validation.is_valid() {
        for err in &validation.errors {
            error!("{}", err);
        }
        bail!("invalid configuration:\n{}", validation.report());
    }

    // Create shared HTTP client for all network operations
    let http_client = create_shared_client();
    let simulator = SimulatorClient::new(http_client, &env_config.api)?;
    info!(base_url = %simulator.base_url(), "Simulator API configured");

    Ok(TrenchServer::new(
        Arc::new(simulator),
        env_config.defaults.clone(),
        &env_config.wait,
    ))
}

/// Token cancelled on the first Ctrl-C
pub fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted, shutting down");
                trigger.cancel();
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
    token
}

/// Run the MCP server with stdio transport
pub async fn run_mcp_server() -> Result<()> {
    let server = setup_server_context()?;

    // Run with stdio transport
    let transport = rmcp::transport::io::stdio();
    let service = rmcp::serve_server(server, transport).await?;
    service.waiting().await?;

    Ok(())
}

/// Run the MCP server with streamable HTTP transport until Ctrl-C
pub async fn run_http_server(host: &str, port: u16) -> Result<()> {
    let server = setup_server_context()?;

    let ip: IpAddr = host
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid --host '{}': {}", host, e))?;
    let addr = SocketAddr::new(ip, port);

    trench::mcp::http::serve_http(server, addr, ctrl_c_token()).await
}
