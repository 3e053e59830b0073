//! Quick-switch transition handler

use super::HandlerContext;

/// Switch to the previous task, leaving the overview closed
pub async fn handle_quick_switch(ctx: &HandlerContext) -> bool {
    // TODO: track the task stack per display so repeated switches alternate
    tokio::time::sleep(ctx.timings.quick_switch).await;
    false
}
