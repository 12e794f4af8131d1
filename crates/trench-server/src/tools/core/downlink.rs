// crates/trench-server/src/tools/core/downlink.rs
// Downlink session tools

use super::{ToolContext, path_segment, to_pretty_json};
use crate::sim::endpoints;
use serde_json::json;

/// Open a downlink session, optionally bound to a specific pass.
pub async fn start_downlink<C: ToolContext + ?Sized>(
    ctx: &C,
    satellite_id: Option<String>,
    ground_station_id: Option<String>,
    pass_id: Option<String>,
) -> Result<String, String> {
    let target = ctx
        .defaults()
        .contact_target(satellite_id, ground_station_id)?;

    let mut body = json!({
        "satellite_id": target.satellite_id,
        "ground_station_id": target.ground_station_id,
    });
    if let Some(pass_id) = pass_id.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
        body["pass_id"] = json!(pass_id);
    }

    let session = ctx
        .simulator()
        .post_json(endpoints::DOWNLINK_SESSIONS, body)
        .await?;
    to_pretty_json(&session)
}

pub async fn stop_downlink<C: ToolContext + ?Sized>(
    ctx: &C,
    session_id: String,
) -> Result<String, String> {
    let path = format!(
        "{}/{}/stop",
        endpoints::DOWNLINK_SESSIONS,
        path_segment("session_id", &session_id)?
    );
    let result = ctx.simulator().post_json(&path, json!({})).await?;
    to_pretty_json(&result)
}

/// One session's status, or every session when no id is given.
pub async fn get_downlink_status<C: ToolContext + ?Sized>(
    ctx: &C,
    session_id: Option<String>,
) -> Result<String, String> {
    let path = match session_id {
        Some(id) => format!(
            "{}/{}",
            endpoints::DOWNLINK_SESSIONS,
            path_segment("session_id", &id)?
        ),
        None => endpoints::DOWNLINK_SESSIONS.to_string(),
    };
    let status = ctx.simulator().get_json(&path, &[]).await?;
    to_pretty_json(&status)
}
