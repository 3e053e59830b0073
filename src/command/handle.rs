//! Command handle with a read-only status observable

use navqueue_shared::{
    now_ms, CommandStatus, CommandType, DisplayId, LifecycleEvent, TransitionError,
};
use std::fmt;
use std::hash::{Hash, Hasher};
use tokio::sync::watch;

/// One queued unit of navigation work targeting one display
///
/// Clones share the same status. Equality and hashing use the command id only.
#[derive(Clone)]
pub struct Command {
    id: u64,
    command_type: CommandType,
    display_id: DisplayId,
    created_at_ms: u64,
    status: watch::Receiver<CommandStatus>,
}

/// Write side of a command's status, owned by the queue
pub(crate) struct StatusCell {
    tx: watch::Sender<CommandStatus>,
}

impl Command {
    /// Create a new idle command and the cell that drives its status
    pub(crate) fn new(
        id: u64,
        command_type: CommandType,
        display_id: DisplayId,
    ) -> (Self, StatusCell) {
        let (tx, rx) = watch::channel(CommandStatus::Idle);
        let command = Self {
            id,
            command_type,
            display_id,
            created_at_ms: now_ms(),
            status: rx,
        };
        (command, StatusCell { tx })
    }

    /// Monotonic sequence number, also the submission order
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn command_type(&self) -> CommandType {
        self.command_type
    }

    pub fn display_id(&self) -> DisplayId {
        self.display_id
    }

    /// Wall-clock creation time in milliseconds since Unix epoch
    pub fn created_at_ms(&self) -> u64 {
        self.created_at_ms
    }

    /// Current status
    pub fn status(&self) -> CommandStatus {
        *self.status.borrow()
    }

    /// Receiver notified on every status change
    pub fn subscribe(&self) -> watch::Receiver<CommandStatus> {
        self.status.clone()
    }

    /// Wait until the command reaches a terminal status
    ///
    /// If the queue is gone before that, returns the last status it published.
    pub async fn wait_for_terminal(&self) -> CommandStatus {
        self.wait_until(CommandStatus::is_terminal).await
    }

    /// Wait until the status satisfies `predicate`
    pub async fn wait_until(&self, predicate: impl FnMut(&CommandStatus) -> bool) -> CommandStatus {
        let mut rx = self.status.clone();
        let result = rx.wait_for(predicate).await.map(|status| *status);
        result.unwrap_or_else(|_| *rx.borrow())
    }
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Command {}

impl Hash for Command {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("id", &self.id)
            .field("command_type", &self.command_type)
            .field("display_id", &self.display_id)
            .field("status", &self.status())
            .finish()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} on display {} [{}]",
            self.id,
            self.command_type,
            self.display_id,
            self.status()
        )
    }
}

impl StatusCell {
    pub(crate) fn current(&self) -> CommandStatus {
        *self.tx.borrow()
    }

    /// Apply a lifecycle event, publishing the new status on success
    pub(crate) fn apply(&self, event: LifecycleEvent) -> Result<CommandStatus, TransitionError> {
        let next = self.current().apply(event)?;
        self.tx.send_replace(next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navqueue_shared::CancelReason;

    #[test]
    fn test_new_command_is_idle() {
        let (command, cell) = Command::new(7, CommandType::Home, 5);
        assert_eq!(command.id(), 7);
        assert_eq!(command.display_id(), 5);
        assert_eq!(command.status(), CommandStatus::Idle);
        assert_eq!(cell.current(), CommandStatus::Idle);
        assert!(command.created_at_ms() > 0);
    }

    #[test]
    fn test_clones_share_status() {
        let (command, cell) = Command::new(1, CommandType::ShowOverview, 0);
        let observer = command.clone();

        cell.apply(LifecycleEvent::Started).unwrap();
        assert_eq!(observer.status(), CommandStatus::Processing);
        assert_eq!(observer, command);
    }

    #[test]
    fn test_rejected_event_leaves_status_unchanged() {
        let (command, cell) = Command::new(1, CommandType::Home, 0);
        cell.apply(LifecycleEvent::Started).unwrap();
        cell.apply(LifecycleEvent::TimedOut).unwrap();

        assert!(cell.apply(LifecycleEvent::Succeeded).is_err());
        assert_eq!(
            command.status(),
            CommandStatus::Canceled(CancelReason::Timeout)
        );
    }

    #[tokio::test]
    async fn test_wait_for_terminal() {
        let (command, cell) = Command::new(3, CommandType::Home, 0);
        let waiter = tokio::spawn({
            let command = command.clone();
            async move { command.wait_for_terminal().await }
        });

        cell.apply(LifecycleEvent::Started).unwrap();
        cell.apply(LifecycleEvent::Succeeded).unwrap();

        assert_eq!(waiter.await.unwrap(), CommandStatus::Completed);
    }

    #[tokio::test]
    async fn test_wait_returns_last_status_when_queue_is_gone() {
        let (command, cell) = Command::new(4, CommandType::Home, 0);
        cell.apply(LifecycleEvent::Started).unwrap();
        drop(cell);

        assert_eq!(command.wait_for_terminal().await, CommandStatus::Processing);
    }

    #[test]
    fn test_display_format() {
        let (command, _cell) = Command::new(12, CommandType::QuickSwitch, 1);
        assert_eq!(command.to_string(), "#12 quick_switch on display 1 [IDLE]");
    }
}
