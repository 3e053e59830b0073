//! Test executors shared by the queue and dispatcher tests

use crate::command::CommandExecutor;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use navqueue_shared::{CommandType, DisplayId};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Executor whose invocations finish only when the test says so
///
/// An invocation whose reply is dropped without an answer hangs forever.
#[derive(Default)]
pub(crate) struct ManualExecutor {
    calls: Mutex<Vec<Invocation>>,
}

struct Invocation {
    command_type: CommandType,
    display_id: DisplayId,
    reply: Option<oneshot::Sender<bool>>,
}

impl ManualExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Finish the `index`-th invocation; later calls for the same index do nothing
    pub fn complete(&self, index: usize, success: bool) {
        let reply = self
            .calls
            .lock()
            .unwrap()
            .get_mut(index)
            .and_then(|call| call.reply.take());

        if let Some(reply) = reply {
            let _ = reply.send(success);
        }
    }

    /// Every invocation so far, in call order
    pub fn calls(&self) -> Vec<(CommandType, DisplayId)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|call| (call.command_type, call.display_id))
            .collect()
    }
}

#[async_trait]
impl CommandExecutor for ManualExecutor {
    async fn execute(&self, command_type: CommandType, display_id: DisplayId) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push(Invocation {
            command_type,
            display_id,
            reply: Some(tx),
        });

        match rx.await {
            Ok(true) => Ok(()),
            Ok(false) => Err(anyhow!("transition failed on display {}", display_id)),
            Err(_) => std::future::pending().await,
        }
    }
}

/// Executor that finishes every invocation without suspending
pub(crate) struct ImmediateExecutor {
    pub success: bool,
}

#[async_trait]
impl CommandExecutor for ImmediateExecutor {
    async fn execute(&self, _command_type: CommandType, display_id: DisplayId) -> Result<()> {
        if self.success {
            Ok(())
        } else {
            Err(anyhow!("display {} rejected the transition", display_id))
        }
    }
}

/// Executor that panics on every invocation
pub(crate) struct PanickingExecutor;

#[async_trait]
impl CommandExecutor for PanickingExecutor {
    async fn execute(&self, command_type: CommandType, _display_id: DisplayId) -> Result<()> {
        panic!("executor blew up on {}", command_type);
    }
}

/// Let spawned tasks run without advancing virtual time
pub(crate) async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
