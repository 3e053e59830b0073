//! navqueue Shared Command Model
//!
//! This crate provides the command types and lifecycle state machine shared
//! between gesture input sources, the command queue and display executors.

pub mod state_machine;

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

pub use state_machine::{LifecycleEvent, TransitionError};

/// Identifier of a physical or virtual display
pub type DisplayId = i32;

/// The display commands target when the caller does not name one
pub const DEFAULT_DISPLAY: DisplayId = 0;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Timing parameters for the command queue
pub mod timing {
    /// Maximum time a command may stay in processing before it is canceled
    pub const COMMAND_TIMEOUT_MS: u64 = 5000;

    /// Commands admitted but not yet finished before new requests are refused
    pub const MAX_PENDING_COMMANDS: usize = 3;
}

/// Kinds of navigation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    /// Go to the home screen
    Home,
    /// Show the recents overview
    ShowOverview,
    /// Hide the recents overview
    HideOverview,
    /// Show the overview if hidden, hide it otherwise
    ToggleOverview,
    /// Switch to the previously used task
    QuickSwitch,
    /// Overview opened from a keyboard shortcut
    KeyboardInput,
}

impl CommandType {
    /// Stable name used in logs and diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Home => "home",
            CommandType::ShowOverview => "show_overview",
            CommandType::HideOverview => "hide_overview",
            CommandType::ToggleOverview => "toggle_overview",
            CommandType::QuickSwitch => "quick_switch",
            CommandType::KeyboardInput => "keyboard_input",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a command ended without success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CancelReason {
    /// The executor did not report back within the command timeout
    Timeout,
    /// The executor reported failure or panicked
    ExecutorFailed,
    /// The queue shut down before the command finished
    Shutdown,
}

impl fmt::Display for CancelReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelReason::Timeout => write!(f, "timeout"),
            CancelReason::ExecutorFailed => write!(f, "executor failed"),
            CancelReason::Shutdown => write!(f, "shutdown"),
        }
    }
}

/// Lifecycle status of a queued command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CommandStatus {
    /// Waiting in the queue
    #[default]
    Idle,
    /// The executor is running it
    Processing,
    /// The executor reported success before the timeout
    Completed,
    /// Ended without success
    Canceled(CancelReason),
}

impl CommandStatus {
    /// Terminal statuses never transition further
    pub fn is_terminal(&self) -> bool {
        matches!(self, CommandStatus::Completed | CommandStatus::Canceled(_))
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandStatus::Idle => write!(f, "IDLE"),
            CommandStatus::Processing => write!(f, "PROCESSING"),
            CommandStatus::Completed => write!(f, "COMPLETED"),
            CommandStatus::Canceled(reason) => write!(f, "CANCELED ({})", reason),
        }
    }
}
