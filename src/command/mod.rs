//! Commands and their execution
//!
//! This module handles:
//! - The [`Command`] handle returned to callers for status observation
//! - The [`CommandExecutor`] seam the queue invokes for each command
//! - A simulated executor dispatching to per-type transition handlers

mod executor;
mod handle;
pub mod handlers;

pub use executor::{CommandExecutor, SimulatedExecutor, TransitionTimings};
pub use handle::Command;

pub(crate) use handle::StatusCell;
