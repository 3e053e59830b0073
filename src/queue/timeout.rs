//! Processing attempts and their deadlines

use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// One processing attempt of the command at the head of the queue
///
/// Executor results carry the attempt token and are only honored while it
/// matches the attempt still in flight.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attempt {
    pub token: u64,
    pub started_at: Instant,
    pub deadline: Instant,
}

impl Attempt {
    /// Start an attempt that expires `timeout` from now
    pub fn start(token: u64, timeout: Duration) -> Self {
        let started_at = Instant::now();
        Self {
            token,
            started_at,
            deadline: started_at + timeout,
        }
    }

    /// Check whether a result with this token belongs to the attempt
    pub fn is_current(&self, token: u64) -> bool {
        self.token == token
    }

    /// Time spent processing so far
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// Resolve when the deadline passes, or never if nothing is in flight
pub(crate) async fn expired(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Check whether the deadline has already passed
pub(crate) fn has_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|deadline| Instant::now() >= deadline)
}
