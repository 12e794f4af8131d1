// crates/trench-server/src/tools/core/antenna.rs
// Ground station antenna control tools

use super::{ToolContext, path_segment, to_pretty_json};
use crate::error::TrenchError;
use crate::sim::endpoints;
use serde_json::{Value, json};

fn antenna_path<C: ToolContext + ?Sized>(
    ctx: &C,
    ground_station_id: Option<String>,
    action: &str,
) -> Result<String, String> {
    let station = ctx.defaults().ground_station(ground_station_id)?;
    Ok(format!(
        "{}/{}/antenna/{}",
        endpoints::GROUND_STATIONS,
        path_segment("ground_station_id", &station)?,
        action
    ))
}

async fn command<C: ToolContext + ?Sized>(ctx: &C, path: String, body: Value) -> Result<String, String> {
    let result = ctx.simulator().post_json(&path, body).await?;
    to_pretty_json(&result)
}

/// Slew to a fixed azimuth / elevation (degrees).
pub async fn point_antenna<C: ToolContext + ?Sized>(
    ctx: &C,
    ground_station_id: Option<String>,
    azimuth: f64,
    elevation: f64,
) -> Result<String, String> {
    if !(0.0..360.0).contains(&azimuth) {
        return Err(
            TrenchError::InvalidInput(format!("azimuth must be in [0, 360), got {}", azimuth)).into(),
        );
    }
    if !(0.0..=90.0).contains(&elevation) {
        return Err(
            TrenchError::InvalidInput(format!("elevation must be in [0, 90], got {}", elevation))
                .into(),
        );
    }

    let path = antenna_path(ctx, ground_station_id, "point")?;
    command(ctx, path, json!({ "azimuth": azimuth, "elevation": elevation })).await
}

/// Follow a satellite with the station's antenna.
pub async fn start_tracking<C: ToolContext + ?Sized>(
    ctx: &C,
    ground_station_id: Option<String>,
    satellite_id: Option<String>,
) -> Result<String, String> {
    let satellite_id = ctx.defaults().satellite(satellite_id)?;
    let path = antenna_path(ctx, ground_station_id, "track")?;
    command(ctx, path, json!({ "satellite_id": satellite_id })).await
}

pub async fn stop_tracking<C: ToolContext + ?Sized>(
    ctx: &C,
    ground_station_id: Option<String>,
) -> Result<String, String> {
    let path = antenna_path(ctx, ground_station_id, "stop")?;
    command(ctx, path, json!({})).await
}
