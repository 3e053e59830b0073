//! Command Lifecycle State Machine
//!
//! Defines the valid status transitions of a queued command. The command
//! queue is the only caller; every status change goes through [`CommandStatus::apply`].

use crate::{CancelReason, CommandStatus};
use thiserror::Error;

/// Events that can trigger status transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Command reached the head of the queue and its executor was invoked
    Started,
    /// Executor reported success
    Succeeded,
    /// Executor reported failure or panicked
    Failed,
    /// Processing deadline elapsed
    TimedOut,
    /// Queue is shutting down
    Shutdown,
}

/// Rejected status transitions
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Command already finished as {status}, ignoring {event:?}")]
    Terminal {
        status: CommandStatus,
        event: LifecycleEvent,
    },

    #[error("Invalid transition from {status} on {event:?}")]
    Invalid {
        status: CommandStatus,
        event: LifecycleEvent,
    },
}

impl CommandStatus {
    /// Process an event and return the next status, if the transition is valid
    pub fn apply(self, event: LifecycleEvent) -> Result<CommandStatus, TransitionError> {
        use CommandStatus::*;
        use LifecycleEvent::*;

        if self.is_terminal() {
            return Err(TransitionError::Terminal {
                status: self,
                event,
            });
        }

        match (self, event) {
            // From Idle
            (Idle, Started) => Ok(Processing),
            (Idle, Shutdown) => Ok(Canceled(CancelReason::Shutdown)),

            // From Processing
            (Processing, Succeeded) => Ok(Completed),
            (Processing, Failed) => Ok(Canceled(CancelReason::ExecutorFailed)),
            (Processing, TimedOut) => Ok(Canceled(CancelReason::Timeout)),
            (Processing, Shutdown) => Ok(Canceled(CancelReason::Shutdown)),

            // Invalid transition
            _ => Err(TransitionError::Invalid {
                status: self,
                event,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_lifecycle() {
        let status = CommandStatus::Idle;

        let status = status.apply(LifecycleEvent::Started).unwrap();
        assert_eq!(status, CommandStatus::Processing);

        let status = status.apply(LifecycleEvent::Succeeded).unwrap();
        assert_eq!(status, CommandStatus::Completed);
    }

    #[test]
    fn test_timeout_cancels() {
        let status = CommandStatus::Processing.apply(LifecycleEvent::TimedOut);
        assert_eq!(status, Ok(CommandStatus::Canceled(CancelReason::Timeout)));
    }

    #[test]
    fn test_failure_is_not_completion() {
        let status = CommandStatus::Processing.apply(LifecycleEvent::Failed);
        assert_eq!(
            status,
            Ok(CommandStatus::Canceled(CancelReason::ExecutorFailed))
        );
    }

    #[test]
    fn test_shutdown_from_any_live_state() {
        assert_eq!(
            CommandStatus::Idle.apply(LifecycleEvent::Shutdown),
            Ok(CommandStatus::Canceled(CancelReason::Shutdown))
        );
        assert_eq!(
            CommandStatus::Processing.apply(LifecycleEvent::Shutdown),
            Ok(CommandStatus::Canceled(CancelReason::Shutdown))
        );
    }

    #[test]
    fn test_terminal_states_are_final() {
        let canceled = CommandStatus::Canceled(CancelReason::Timeout);

        // A late success must not resurrect a canceled command
        let result = canceled.apply(LifecycleEvent::Succeeded);
        assert!(matches!(result, Err(TransitionError::Terminal { .. })));

        let result = CommandStatus::Completed.apply(LifecycleEvent::TimedOut);
        assert!(matches!(result, Err(TransitionError::Terminal { .. })));
    }

    #[test]
    fn test_invalid_transition() {
        // Can't complete a command that never started
        let result = CommandStatus::Idle.apply(LifecycleEvent::Succeeded);
        assert!(matches!(result, Err(TransitionError::Invalid { .. })));

        // Can't start twice
        let result = CommandStatus::Processing.apply(LifecycleEvent::Started);
        assert!(matches!(result, Err(TransitionError::Invalid { .. })));
    }
}
