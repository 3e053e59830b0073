//! Dispatcher for submitting navigation commands

use crate::command::Command;
use crate::config::QueueConfig;
use crate::display::DisplayEnumerator;
use crate::queue::CommandQueue;
use navqueue_shared::{CommandType, DisplayId};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info};

/// Turns caller intent into queued commands
///
/// Every `add_*` method returns `None` when the request is refused: too many
/// commands are still unfinished (see [`QueueConfig::max_pending`]), there is
/// no display to target, or the queue has stopped. A request is admitted or
/// refused as a whole, so a fan-out never ends up partially queued by policy.
///
/// For fan-out requests the returned handle is the first per-display command.
/// The others run independently and are not observable through it.
///
/// Submission never waits for the queue: returned commands start out `Idle`,
/// even when the queue is empty, and turn `Processing` once the queue's task
/// picks them up. Use [`Command::subscribe`] or [`Command::wait_until`] to
/// observe the start.
pub struct Dispatcher {
    queue: CommandQueue,
    displays: Arc<dyn DisplayEnumerator>,
    config: QueueConfig,
    /// Serializes the admission check with the enqueues it admits
    admission: Mutex<()>,
}

impl Dispatcher {
    /// Create a new dispatcher
    pub fn new(
        queue: CommandQueue,
        displays: Arc<dyn DisplayEnumerator>,
        config: QueueConfig,
    ) -> Self {
        Self {
            queue,
            displays,
            config,
            admission: Mutex::new(()),
        }
    }

    /// The queue commands are submitted to
    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    /// Queue a command for one display
    ///
    /// The returned command is `Idle`; processing starts asynchronously.
    pub fn add_command(&self, command_type: CommandType, display_id: DisplayId) -> Option<Command> {
        self.submit(command_type, &[display_id])
    }

    /// Queue a command for the configured default display
    pub fn add_command_default(&self, command_type: CommandType) -> Option<Command> {
        self.add_command(command_type, self.config.default_display)
    }

    /// Queue one command per active display
    pub fn add_commands_for_all_displays(&self, command_type: CommandType) -> Option<Command> {
        let displays = self.displays.active_display_ids();
        self.submit(command_type, &displays)
    }

    /// Queue one command per active display, skipping `excluded_display_id`
    pub fn add_commands_for_displays_except(
        &self,
        command_type: CommandType,
        excluded_display_id: DisplayId,
    ) -> Option<Command> {
        let displays: Vec<DisplayId> = self
            .displays
            .active_display_ids()
            .into_iter()
            .filter(|id| *id != excluded_display_id)
            .collect();
        self.submit(command_type, &displays)
    }

    fn submit(&self, command_type: CommandType, displays: &[DisplayId]) -> Option<Command> {
        if displays.is_empty() {
            debug!("[DISPATCH] No display to run {} on", command_type);
            return None;
        }

        let _admission = self
            .admission
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let outstanding = self.queue.outstanding();
        if outstanding >= self.config.max_pending {
            info!(
                "[DISPATCH] Ignoring {}: {} commands already pending",
                command_type, outstanding
            );
            return None;
        }

        let mut first = None;
        for &display_id in displays {
            // Only fails once the queue has stopped, so later displays would fail too
            let command = self.queue.enqueue(command_type, display_id)?;
            first.get_or_insert(command);
        }

        if displays.len() > 1 {
            debug!(
                "[DISPATCH] {} fanned out to displays {:?}",
                command_type, displays
            );
        }

        first
    }
}
