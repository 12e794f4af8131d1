// crates/trench-server/src/mcp/handler.rs
// MCP ServerHandler implementation: protocol lifecycle methods

use super::TrenchServer;

use rmcp::{
    ErrorData, ServerHandler,
    handler::server::tool::ToolCallContext,
    model::{
        CallToolRequestParams, CallToolResult, Implementation, ListToolsResult,
        PaginatedRequestParams, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
};
use tracing::{debug, info, warn};

impl ServerHandler for TrenchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "trench".into(),
                title: Some("Trench - ground-station simulator tools".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Trench drives a satellite ground-station simulator. Use wait_until_time or \
                 wait_for_next_pass to block until simulated time reaches a point of interest \
                 instead of polling get_simulation_state yourself."
                    .into(),
            ),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        }))
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let tool_name = request.name.to_string();
            let start = std::time::Instant::now();
            debug!(tool = %tool_name, "Tool call started");

            let ctx = ToolCallContext::new(self, request, context);
            let result = self.tool_router.call(ctx).await;

            let duration_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(r) if r.is_error == Some(true) => {
                    warn!(tool = %tool_name, duration_ms, "Tool returned an error")
                }
                Ok(_) => info!(tool = %tool_name, duration_ms, "Tool call finished"),
                Err(e) => warn!(tool = %tool_name, duration_ms, error = %e.message, "Tool call rejected"),
            }

            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DefaultTargets, WaitSettings};
    use crate::sim::fake::FakeSimulator;
    use std::sync::Arc;

    #[test]
    fn test_get_info_advertises_tools() {
        let server = TrenchServer::new(
            Arc::new(FakeSimulator::frozen(0.0)),
            DefaultTargets::default(),
            &WaitSettings::default(),
        );
        let info = server.get_info();
        assert_eq!(info.server_info.name, "trench");
        assert!(info.capabilities.tools.is_some());
        assert!(info.instructions.unwrap().contains("wait_until_time"));
    }
}
