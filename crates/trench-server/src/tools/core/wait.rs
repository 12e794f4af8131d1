// crates/trench-server/src/tools/core/wait.rs
// Wait tools: hold the call until simulated time satisfies a condition

use super::{ToolContext, to_pretty_json};
use crate::wait::WaitRequest;
use tokio_util::sync::CancellationToken;
use tracing::info;
use trench_types::WaitReport;

/// Block until simulated time reaches `target_sim_time`.
pub async fn wait_until_time<C: ToolContext + ?Sized>(
    ctx: &C,
    target_sim_time: f64,
    cancel: &CancellationToken,
) -> Result<String, String> {
    let request = WaitRequest::until_time(target_sim_time)?;
    run_wait(ctx, request, cancel).await
}

/// Block until the next pass for the satellite / station pair begins.
pub async fn wait_for_next_pass<C: ToolContext + ?Sized>(
    ctx: &C,
    satellite_id: Option<String>,
    ground_station_id: Option<String>,
    cancel: &CancellationToken,
) -> Result<String, String> {
    let target = ctx
        .defaults()
        .contact_target(satellite_id, ground_station_id)?;
    run_wait(ctx, WaitRequest::NextPass(target), cancel).await
}

/// Run one wait under the caller's token plus the configured ceiling.
///
/// Satisfied and cancelled waits are tool results; failed waits are tool
/// errors carrying the same JSON report.
async fn run_wait<C: ToolContext + ?Sized>(
    ctx: &C,
    request: WaitRequest,
    cancel: &CancellationToken,
) -> Result<String, String> {
    let controller = ctx.wait_controller();
    let token = cancel.child_token();

    let wait = controller.run(request, &token);
    tokio::pin!(wait);

    let mut ceiling_hit = false;
    let result = match ctx.wait_ceiling() {
        Some(ceiling) => {
            let deadline = tokio::time::sleep(ceiling);
            tokio::pin!(deadline);
            loop {
                tokio::select! {
                    result = &mut wait => break result,
                    _ = &mut deadline, if !ceiling_hit => {
                        info!(ceiling_secs = ceiling.as_secs(), "Wait ceiling reached, cancelling");
                        ceiling_hit = true;
                        token.cancel();
                    }
                }
            }
        }
        None => wait.await,
    };

    let mut report = result.into_report();
    if let WaitReport::Cancelled { ceiling_reached, .. } = &mut report {
        *ceiling_reached = ceiling_hit && !cancel.is_cancelled();
    }

    let json = to_pretty_json(&report)?;
    if report.is_failed() { Err(json) } else { Ok(json) }
}
