//! Go-home transition handler

use super::HandlerContext;
use tracing::debug;

/// Handle a go-home gesture
///
/// Always ends on the home screen, dismissing the overview if it was open.
pub async fn handle_home(ctx: &HandlerContext) -> bool {
    if ctx.overview_visible {
        debug!("  [HOME] Dismissing overview on display {}", ctx.display_id);
    }

    tokio::time::sleep(ctx.timings.home).await;

    false
}
