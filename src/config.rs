//! Queue and dispatcher configuration

use navqueue_shared::{timing, DisplayId, DEFAULT_DISPLAY};
use std::time::Duration;

/// Configuration for the command queue and dispatcher
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// How long a command may stay in processing before it is canceled
    pub command_timeout: Duration,
    /// Requests are refused while this many commands are still unfinished
    pub max_pending: usize,
    /// Display targeted when the caller does not name one
    pub default_display: DisplayId,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            command_timeout: Duration::from_millis(timing::COMMAND_TIMEOUT_MS),
            max_pending: timing::MAX_PENDING_COMMANDS,
            default_display: DEFAULT_DISPLAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.command_timeout, Duration::from_secs(5));
        assert_eq!(config.max_pending, 3);
        assert_eq!(config.default_display, 0);
    }

    #[test]
    fn test_override_with_struct_update() {
        let config = QueueConfig {
            command_timeout: Duration::from_millis(250),
            ..Default::default()
        };
        assert_eq!(config.command_timeout, Duration::from_millis(250));
        assert_eq!(config.max_pending, timing::MAX_PENDING_COMMANDS);
    }
}
