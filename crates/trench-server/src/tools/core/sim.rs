// crates/trench-server/src/tools/core/sim.rs
// Simulation state, pass schedule and health tools

use super::{ToolContext, path_segment, to_pretty_json};
use crate::error::TrenchError;
use crate::sim::endpoints;
use serde_json::json;

/// Longest look-ahead accepted by `list_passes` (one week)
pub const MAX_PASS_HOURS: f64 = 168.0;

/// Raw simulation state as reported upstream.
pub async fn get_simulation_state<C: ToolContext + ?Sized>(ctx: &C) -> Result<String, String> {
    let state = ctx
        .simulator()
        .get_json(endpoints::SIMULATION_STATE, &[])
        .await?;
    to_pretty_json(&state)
}

/// Upcoming passes, optionally filtered by satellite / station.
pub async fn list_passes<C: ToolContext + ?Sized>(
    ctx: &C,
    satellite_id: Option<String>,
    ground_station_id: Option<String>,
    hours: Option<f64>,
) -> Result<String, String> {
    let mut query = Vec::new();
    if let Ok(sat) = ctx.defaults().satellite(satellite_id) {
        query.push(("satellite_id", sat));
    }
    if let Ok(gs) = ctx.defaults().ground_station(ground_station_id) {
        query.push(("ground_station_id", gs));
    }
    if let Some(hours) = hours {
        if !(hours > 0.0 && hours <= MAX_PASS_HOURS) {
            return Err(TrenchError::InvalidInput(format!(
                "hours must be in (0, {}], got {}",
                MAX_PASS_HOURS, hours
            ))
            .into());
        }
        query.push(("hours", hours.to_string()));
    }

    let passes = ctx.simulator().get_json(endpoints::PASSES, &query).await?;
    to_pretty_json(&passes)
}

/// The next scheduled pass for a satellite / station pair.
pub async fn get_next_pass<C: ToolContext + ?Sized>(
    ctx: &C,
    satellite_id: Option<String>,
    ground_station_id: Option<String>,
) -> Result<String, String> {
    let target = ctx
        .defaults()
        .contact_target(satellite_id, ground_station_id)?;

    match ctx.simulator().next_pass(&target).await? {
        Some(pass) => to_pretty_json(&json!({ "pass": pass })),
        None => to_pretty_json(&json!({
            "pass": null,
            "message": format!(
                "No pass scheduled for {} over {}",
                target.satellite_id, target.ground_station_id
            ),
        })),
    }
}

/// Simulator health, overall or for one component.
pub async fn get_health<C: ToolContext + ?Sized>(
    ctx: &C,
    component: Option<String>,
) -> Result<String, String> {
    let path = match component {
        Some(component) => format!(
            "{}/{}",
            endpoints::HEALTH,
            path_segment("component", &component)?
        ),
        None => endpoints::HEALTH.to_string(),
    };
    let health = ctx.simulator().get_json(&path, &[]).await?;
    to_pretty_json(&health)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fake::{FakeSimulator, pass};
    use crate::tools::core::test_utils::MockToolContext;

    #[tokio::test]
    async fn test_get_simulation_state_forwards() {
        let ctx = MockToolContext::new(FakeSimulator::frozen(0.0));
        let out = get_simulation_state(&ctx).await.unwrap();
        assert!(out.contains(endpoints::SIMULATION_STATE));

        let requests = ctx.fake.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].0, "GET");
    }

    #[tokio::test]
    async fn test_list_passes_uses_defaults_and_hours() {
        let ctx = MockToolContext::new(FakeSimulator::frozen(0.0));
        list_passes(&ctx, None, Some("GS-9".into()), Some(12.0))
            .await
            .unwrap();

        let requests = ctx.fake.requests();
        let (_, path, query) = &requests[0];
        assert_eq!(path, endpoints::PASSES);
        assert_eq!(query["satellite_id"], "SAT-1");
        assert_eq!(query["ground_station_id"], "GS-9");
        assert_eq!(query["hours"], "12");
    }

    #[tokio::test]
    async fn test_list_passes_without_defaults_sends_no_filters() {
        let ctx = MockToolContext::without_defaults(FakeSimulator::frozen(0.0));
        list_passes(&ctx, None, None, None).await.unwrap();
        let requests = ctx.fake.requests();
        let (_, _, query) = &requests[0];
        assert_eq!(query.as_object().map(|q| q.len()), Some(0));
    }

    #[tokio::test]
    async fn test_list_passes_rejects_bad_hours() {
        let ctx = MockToolContext::new(FakeSimulator::frozen(0.0));
        for hours in [0.0, -3.0, 200.0, f64::NAN] {
            let err = list_passes(&ctx, None, None, Some(hours)).await.unwrap_err();
            assert!(err.contains("hours"), "{}", err);
        }
        assert!(ctx.fake.requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_next_pass() {
        let ctx = MockToolContext::new(
            FakeSimulator::frozen(0.0).with_next_passes(vec![Some(pass("p-7", 10.0, 20.0)), None]),
        );
        let out = get_next_pass(&ctx, None, None).await.unwrap();
        assert!(out.contains("p-7"));

        let out = get_next_pass(&ctx, None, None).await.unwrap();
        assert!(out.contains("No pass scheduled for SAT-1 over GS-1"));
    }

    #[tokio::test]
    async fn test_get_next_pass_requires_ids() {
        let ctx = MockToolContext::without_defaults(FakeSimulator::frozen(0.0));
        let err = get_next_pass(&ctx, Some("SAT-1".into()), None)
            .await
            .unwrap_err();
        assert!(err.contains("ground_station_id is required"));
        assert!(err.contains("TRENCH_DEFAULT_GROUND_STATION"));
    }

    #[tokio::test]
    async fn test_get_health_component_path() {
        let ctx = MockToolContext::new(FakeSimulator::frozen(0.0));
        get_health(&ctx, None).await.unwrap();
        get_health(&ctx, Some("rf chain".into())).await.unwrap();

        let requests = ctx.fake.requests();
        assert_eq!(requests[0].1, endpoints::HEALTH);
        assert_eq!(requests[1].1, "/api/v1/health/rf%20chain");
    }
}
