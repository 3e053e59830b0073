//! navqueue - serialized dispatcher for navigation gestures
//!
//! Gestures such as "go home" or "show overview" arrive from several input
//! sources and may target several displays. They are turned into [`Command`]s
//! and executed one at a time, in submission order, with every execution
//! bounded by a timeout so a hung executor can never stall the queue.
//!
//! The main entry points are:
//! - [`CommandQueue`]: the single-flight processing loop
//! - [`Dispatcher`]: builds commands from caller intent and fans them out
//!   across displays
//! - [`CommandExecutor`] and [`DisplayEnumerator`]: the collaborators the
//!   application plugs in

pub mod command;
pub mod config;
pub mod dispatch;
pub mod display;
pub mod queue;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Command, CommandExecutor, SimulatedExecutor};
pub use config::QueueConfig;
pub use dispatch::Dispatcher;
pub use display::{DisplayEnumerator, StaticDisplays};
pub use navqueue_shared::{
    CancelReason, CommandStatus, CommandType, DisplayId, DEFAULT_DISPLAY,
};
pub use queue::{CommandQueue, QueueSnapshot};
