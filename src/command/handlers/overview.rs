//! Overview transition handlers

use super::HandlerContext;
use tracing::debug;

/// Show the overview, a no-op if it is already visible
pub async fn handle_show_overview(ctx: &HandlerContext) -> bool {
    if ctx.overview_visible {
        debug!("  [OVERVIEW] Already visible on display {}", ctx.display_id);
        return true;
    }

    tokio::time::sleep(ctx.timings.overview).await;
    true
}

/// Hide the overview, a no-op if it is already hidden
pub async fn handle_hide_overview(ctx: &HandlerContext) -> bool {
    if !ctx.overview_visible {
        debug!("  [OVERVIEW] Already hidden on display {}", ctx.display_id);
        return false;
    }

    tokio::time::sleep(ctx.timings.overview).await;
    false
}

/// Flip overview visibility
pub async fn handle_toggle_overview(ctx: &HandlerContext) -> bool {
    if ctx.overview_visible {
        handle_hide_overview(ctx).await
    } else {
        handle_show_overview(ctx).await
    }
}
