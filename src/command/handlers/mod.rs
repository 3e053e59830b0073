//! Transition handlers for the simulated executor

mod home;
mod overview;
mod quick_switch;

pub use home::handle_home;
pub use overview::{handle_hide_overview, handle_show_overview, handle_toggle_overview};
pub use quick_switch::handle_quick_switch;

use super::TransitionTimings;
use navqueue_shared::DisplayId;

/// Context passed to transition handlers
///
/// Handlers return whether the overview is visible once they finish.
#[derive(Debug, Clone)]
pub struct HandlerContext {
    pub display_id: DisplayId,
    pub overview_visible: bool,
    pub timings: TransitionTimings,
}
