//! The queue's processing loop
//!
//! A single task owns the pending list and the in-flight slot. Every status
//! change happens here, so two heads can never be processed concurrently.

use super::timeout::{self, Attempt};
use super::QueueSnapshot;
use crate::command::{Command, CommandExecutor, StatusCell};
use futures::FutureExt;
use navqueue_shared::LifecycleEvent;
use std::collections::VecDeque;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A command together with the write side of its status
pub(crate) struct QueuedCommand {
    pub command: Command,
    pub status: StatusCell,
}

/// Result reported by an executor task
#[derive(Debug)]
pub(crate) enum ExecutionOutcome {
    Succeeded,
    Failed(String),
}

/// Messages handled by the processing loop
pub(crate) enum QueueMessage {
    /// Append a command to the tail
    Enqueue(QueuedCommand),
    /// An executor finished the attempt identified by `token`
    Finished {
        token: u64,
        command_id: u64,
        outcome: ExecutionOutcome,
    },
    /// Report the current contents of the queue
    Snapshot(oneshot::Sender<QueueSnapshot>),
}

struct InFlight {
    entry: QueuedCommand,
    attempt: Attempt,
}

pub(crate) struct QueueActor {
    executor: Arc<dyn CommandExecutor>,
    command_timeout: Duration,
    pending: VecDeque<QueuedCommand>,
    in_flight: Option<InFlight>,
    next_token: u64,
    outstanding: Arc<AtomicUsize>,
    /// Weak so abandoned executor tasks never keep the loop alive
    tx: mpsc::WeakUnboundedSender<QueueMessage>,
}

impl QueueActor {
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        command_timeout: Duration,
        outstanding: Arc<AtomicUsize>,
        tx: mpsc::WeakUnboundedSender<QueueMessage>,
    ) -> Self {
        Self {
            executor,
            command_timeout,
            pending: VecDeque::new(),
            in_flight: None,
            next_token: 0,
            outstanding,
            tx,
        }
    }

    /// Process messages and deadlines until every queue handle is dropped
    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<QueueMessage>) {
        loop {
            let deadline = self.in_flight.as_ref().map(|f| f.attempt.deadline);

            // A busy channel must not postpone an expired deadline
            if timeout::has_passed(deadline) {
                self.on_deadline();
                continue;
            }

            tokio::select! {
                // A result arriving together with the deadline still counts
                biased;

                message = rx.recv() => match message {
                    Some(message) => self.handle_message(message),
                    None => break,
                },

                _ = timeout::expired(deadline) => self.on_deadline(),
            }
        }

        self.shutdown();
    }

    fn handle_message(&mut self, message: QueueMessage) {
        match message {
            QueueMessage::Enqueue(entry) => {
                debug!(
                    "[QUEUE] Enqueued {} ({} waiting)",
                    entry.command,
                    self.pending.len()
                );
                self.pending.push_back(entry);
                self.process_head();
            }
            QueueMessage::Finished {
                token,
                command_id,
                outcome,
            } => self.on_finished(token, command_id, outcome),
            QueueMessage::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Start the next pending command if nothing is in flight
    fn process_head(&mut self) {
        if self.in_flight.is_some() {
            return;
        }

        while let Some(entry) = self.pending.pop_front() {
            if let Err(e) = entry.status.apply(LifecycleEvent::Started) {
                warn!("[QUEUE] Skipping command {}: {}", entry.command.id(), e);
                self.outstanding.fetch_sub(1, Ordering::SeqCst);
                continue;
            }

            self.start(entry);
            return;
        }
    }

    fn start(&mut self, entry: QueuedCommand) {
        let token = self.next_token;
        self.next_token += 1;

        let command = &entry.command;
        let command_id = command.id();
        let command_type = command.command_type();
        let display_id = command.display_id();
        info!(
            "[QUEUE] Processing command {} ({} on display {})",
            command_id, command_type, display_id
        );

        let executor = self.executor.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = AssertUnwindSafe(executor.execute(command_type, display_id))
                .catch_unwind()
                .await;

            let outcome = match result {
                Ok(Ok(())) => ExecutionOutcome::Succeeded,
                Ok(Err(e)) => ExecutionOutcome::Failed(e.to_string()),
                Err(_) => ExecutionOutcome::Failed("executor panicked".into()),
            };

            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(QueueMessage::Finished {
                    token,
                    command_id,
                    outcome,
                });
            }
        });

        self.in_flight = Some(InFlight {
            entry,
            attempt: Attempt::start(token, self.command_timeout),
        });
    }

    fn on_finished(&mut self, token: u64, command_id: u64, outcome: ExecutionOutcome) {
        let in_flight = match self.in_flight.take() {
            Some(f) if f.attempt.is_current(token) => f,
            other => {
                self.in_flight = other;
                debug!(
                    "[QUEUE] Ignoring late result for command {}: {:?}",
                    command_id, outcome
                );
                return;
            }
        };

        let elapsed = in_flight.attempt.elapsed();
        let event = match &outcome {
            ExecutionOutcome::Succeeded => {
                info!(
                    "[QUEUE] Command {} completed in {}ms",
                    command_id,
                    elapsed.as_millis()
                );
                LifecycleEvent::Succeeded
            }
            ExecutionOutcome::Failed(message) => {
                warn!(
                    "[QUEUE] Command {} failed after {}ms: {}",
                    command_id,
                    elapsed.as_millis(),
                    message
                );
                LifecycleEvent::Failed
            }
        };

        self.finish(in_flight.entry, event);
        self.process_head();
    }

    fn on_deadline(&mut self) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };

        warn!(
            "[QUEUE] Command {} timed out after {}ms, canceling",
            in_flight.entry.command.id(),
            self.command_timeout.as_millis()
        );

        self.finish(in_flight.entry, LifecycleEvent::TimedOut);
        self.process_head();
    }

    /// Release a command's slot and move it to its terminal status
    ///
    /// The slot is released first: an observer woken by the terminal status
    /// must already see it gone when it submits the next request.
    fn finish(&mut self, entry: QueuedCommand, event: LifecycleEvent) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
        if let Err(e) = entry.status.apply(event) {
            warn!("[QUEUE] Command {}: {}", entry.command.id(), e);
        }
    }

    /// Cancel everything still queued
    fn shutdown(&mut self) {
        let in_flight = self.in_flight.take().map(|f| f.entry);
        let remaining: Vec<QueuedCommand> = in_flight
            .into_iter()
            .chain(self.pending.drain(..))
            .collect();

        if !remaining.is_empty() {
            info!(
                "[QUEUE] Shutting down, canceling {} unfinished commands",
                remaining.len()
            );
        }

        for entry in remaining {
            self.finish(entry, LifecycleEvent::Shutdown);
        }

        info!("[QUEUE] Processing loop stopped");
    }

    fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            in_flight: self.in_flight.as_ref().map(|f| f.entry.command.clone()),
            pending: self.pending.iter().map(|e| e.command.clone()).collect(),
        }
    }
}
