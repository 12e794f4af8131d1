// crates/trench-server/src/cli/tool.rs
// Direct tool execution from CLI

use super::serve::{ctrl_c_token, setup_server_context};
use anyhow::{Result, bail};
use trench::mcp::requests::{
    DownlinkStatusRequest, HealthRequest, ListPassesRequest, NextPassRequest, PointAntennaRequest,
    StartDownlinkRequest, StartTrackingRequest, StopDownlinkRequest, StopTrackingRequest,
    WaitForNextPassRequest, WaitUntilTimeRequest,
};

/// Execute a tool directly from the command line.
///
/// Ctrl-C cancels a running wait; the cancelled report is still printed.
pub async fn run_tool(name: String, args: String) -> Result<()> {
    let server = setup_server_context()?;
    let cancel = ctrl_c_token();

    // Execute tool
    let res = match name.as_str() {
        "get_simulation_state" => trench::tools::get_simulation_state(&server).await,
        "list_passes" => {
            let req: ListPassesRequest = serde_json::from_str(&args)?;
            trench::tools::list_passes(&server, req.satellite_id, req.ground_station_id, req.hours).await
        }
        "get_next_pass" => {
            let req: NextPassRequest = serde_json::from_str(&args)?;
            trench::tools::get_next_pass(&server, req.satellite_id, req.ground_station_id).await
        }
        "start_downlink" => {
            let req: StartDownlinkRequest = serde_json::from_str(&args)?;
            trench::tools::start_downlink(&server, req.satellite_id, req.ground_station_id, req.pass_id).await
        }
        "stop_downlink" => {
            let req: StopDownlinkRequest = serde_json::from_str(&args)?;
            trench::tools::stop_downlink(&server, req.session_id).await
        }
        "get_downlink_status" => {
            let req: DownlinkStatusRequest = serde_json::from_str(&args)?;
            trench::tools::get_downlink_status(&server, req.session_id).await
        }
        "point_antenna" => {
            let req: PointAntennaRequest = serde_json::from_str(&args)?;
            trench::tools::point_antenna(&server, req.ground_station_id, req.azimuth, req.elevation).await
        }
        "start_tracking" => {
            let req: StartTrackingRequest = serde_json::from_str(&args)?;
            trench::tools::start_tracking(&server, req.ground_station_id, req.satellite_id).await
        }
        "stop_tracking" => {
            let req: StopTrackingRequest = serde_json::from_str(&args)?;
            trench::tools::stop_tracking(&server, req.ground_station_id).await
        }
        "get_health" => {
            let req: HealthRequest = serde_json::from_str(&args)?;
            trench::tools::get_health(&server, req.component).await
        }
        "wait_until_time" => {
            let req: WaitUntilTimeRequest = serde_json::from_str(&args)?;
            trench::tools::wait_until_time(&server, req.target_sim_time, &cancel).await
        }
        "wait_for_next_pass" => {
            let req: WaitForNextPassRequest = serde_json::from_str(&args)?;
            trench::tools::wait_for_next_pass(&server, req.satellite_id, req.ground_station_id, &cancel).await
        }
        _ => Err(format!("Unknown tool: {}", name)),
    };

    match res {
        Ok(output) => println!("{}", output),
        Err(e) => bail!("{}", e),
    }
    Ok(())
}

/// Returns the list of tool names supported by the CLI dispatcher.
/// Used for verification against MCP router.
#[cfg(test)]
fn list_cli_tool_names() -> Vec<&'static str> {
    vec![
        "get_simulation_state",
        "list_passes",
        "get_next_pass",
        "start_downlink",
        "stop_downlink",
        "get_downlink_status",
        "point_antenna",
        "start_tracking",
        "stop_tracking",
        "get_health",
        "wait_until_time",
        "wait_for_next_pass",
    ]
}
