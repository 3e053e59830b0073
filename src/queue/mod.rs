//! Single-flight command queue
//!
//! This module handles:
//! - Appending commands in submission order
//! - Running at most one command at a time, system-wide
//! - Canceling a command whose executor does not finish within the timeout
//! - Advancing to the next command on completion, failure or timeout

mod actor;
mod timeout;

use crate::command::{Command, CommandExecutor};
use crate::config::QueueConfig;
use actor::{QueueActor, QueueMessage, QueuedCommand};
use navqueue_shared::{CommandType, DisplayId};
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

/// Handle to a command queue
///
/// Clones share the same queue. The processing loop stops once every handle
/// is dropped, canceling whatever is still queued.
#[derive(Clone)]
pub struct CommandQueue {
    tx: mpsc::UnboundedSender<QueueMessage>,
    command_id: Arc<AtomicU64>,
    /// Commands enqueued and not yet terminal
    outstanding: Arc<AtomicUsize>,
}

impl CommandQueue {
    /// Create a new command queue and start its processing loop
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(executor: Arc<dyn CommandExecutor>, config: &QueueConfig) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let outstanding = Arc::new(AtomicUsize::new(0));

        let actor = QueueActor::new(
            executor,
            config.command_timeout,
            outstanding.clone(),
            tx.downgrade(),
        );
        tokio::spawn(actor.run(rx));

        Self {
            tx,
            command_id: Arc::new(AtomicU64::new(0)),
            outstanding,
        }
    }

    /// Get the next command ID
    fn next_command_id(&self) -> u64 {
        self.command_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Append a command to the tail of the queue
    ///
    /// Returns immediately with the command in `Idle`; it starts processing
    /// once every earlier command has finished. Returns `None` if the
    /// processing loop is gone.
    pub fn enqueue(&self, command_type: CommandType, display_id: DisplayId) -> Option<Command> {
        let (command, status) = Command::new(self.next_command_id(), command_type, display_id);

        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let entry = QueuedCommand {
            command: command.clone(),
            status,
        };

        if self.tx.send(QueueMessage::Enqueue(entry)).is_err() {
            self.outstanding.fetch_sub(1, Ordering::SeqCst);
            warn!("[QUEUE] Processing loop stopped, dropping {}", command);
            return None;
        }

        debug!("[QUEUE] Submitted {}", command);
        Some(command)
    }

    /// Number of commands enqueued and not yet finished, including the one in flight
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Current contents of the queue, or `None` if the processing loop is gone
    pub async fn snapshot(&self) -> Option<QueueSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx.send(QueueMessage::Snapshot(reply_tx)).ok()?;
        reply_rx.await.ok()
    }
}

/// Point-in-time view of the queue for diagnostics
#[derive(Debug, Clone)]
pub struct QueueSnapshot {
    /// The command currently processing
    pub in_flight: Option<Command>,
    /// Commands waiting behind it, oldest first
    pub pending: Vec<Command>,
}

impl QueueSnapshot {
    pub fn is_empty(&self) -> bool {
        self.in_flight.is_none() && self.pending.is_empty()
    }
}

impl fmt::Display for QueueSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Command queue:")?;
        match &self.in_flight {
            Some(command) => writeln!(f, "  in flight: {}", command)?,
            None => writeln!(f, "  in flight: none")?,
        }
        writeln!(f, "  pending: {}", self.pending.len())?;
        for command in &self.pending {
            writeln!(f, "    {}", command)?;
        }
        Ok(())
    }
}
