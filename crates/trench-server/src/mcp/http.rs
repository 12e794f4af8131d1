// crates/trench-server/src/mcp/http.rs
// Streamable HTTP transport: serves the MCP endpoint at /mcp

use super::TrenchServer;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Path the MCP service is mounted under
pub const MCP_PATH: &str = "/mcp";

/// SSE keep-alive interval for idle streams (long waits hold streams open)
pub const SSE_KEEP_ALIVE: Duration = Duration::from_secs(15);

/// Build the axum router exposing `server` over streamable HTTP.
///
/// Every session gets its own clone of the server; clones share the
/// simulator client. Cancelling `shutdown` closes open sessions.
pub fn mcp_router(server: TrenchServer, shutdown: CancellationToken) -> axum::Router {
    let service = StreamableHttpService::new(
        move || Ok(server.clone()),
        Arc::new(LocalSessionManager::default()),
        StreamableHttpServerConfig {
            sse_keep_alive: Some(SSE_KEEP_ALIVE),
            cancellation_token: shutdown,
            ..Default::default()
        },
    );
    axum::Router::new().nest_service(MCP_PATH, service)
}

/// Serve until `shutdown` is cancelled.
pub async fn serve_http(
    server: TrenchServer,
    addr: SocketAddr,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, path = MCP_PATH, "MCP streamable HTTP server listening");

    let router = mcp_router(server, shutdown.clone());
    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.cancelled_owned().await })
        .await?;

    info!("MCP HTTP server stopped");
    Ok(())
}
