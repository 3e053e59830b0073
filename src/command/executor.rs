//! Command executor - performs the navigation side effect for one display

use super::handlers::{self, HandlerContext};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use navqueue_shared::{CommandType, DisplayId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Performs the work for one command on one display
///
/// `Ok(())` reports success and `Err` reports failure. An executor may also
/// never finish; the queue's timeout covers that. Implementations must
/// tolerate being called for a display that has since been removed.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, command_type: CommandType, display_id: DisplayId) -> Result<()>;
}

/// How long each simulated transition takes
#[derive(Debug, Clone)]
pub struct TransitionTimings {
    pub home: Duration,
    pub overview: Duration,
    pub quick_switch: Duration,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            home: Duration::from_millis(300),
            overview: Duration::from_millis(250),
            quick_switch: Duration::from_millis(150),
        }
    }
}

/// Executor that animates nothing, tracking overview visibility per display
pub struct SimulatedExecutor {
    timings: TransitionTimings,
    overview_visible: Arc<RwLock<HashMap<DisplayId, bool>>>,
    unavailable: Arc<RwLock<HashSet<DisplayId>>>,
    stalled: Arc<RwLock<HashSet<DisplayId>>>,
}

impl SimulatedExecutor {
    /// Create a new simulated executor
    pub fn new(timings: TransitionTimings) -> Self {
        Self {
            timings,
            overview_visible: Arc::new(RwLock::new(HashMap::new())),
            unavailable: Arc::new(RwLock::new(HashSet::new())),
            stalled: Arc::new(RwLock::new(HashSet::new())),
        }
    }

    /// Whether the overview is currently shown on a display
    pub async fn is_overview_visible(&self, display_id: DisplayId) -> bool {
        self.overview_visible
            .read()
            .await
            .get(&display_id)
            .copied()
            .unwrap_or(false)
    }

    /// Make transitions on a display fail, as if it had been removed
    pub async fn mark_unavailable(&self, display_id: DisplayId) {
        self.unavailable.write().await.insert(display_id);
    }

    /// Make transitions on a display hang forever
    pub async fn stall(&self, display_id: DisplayId) {
        self.stalled.write().await.insert(display_id);
    }
}

impl Default for SimulatedExecutor {
    fn default() -> Self {
        Self::new(TransitionTimings::default())
    }
}

#[async_trait]
impl CommandExecutor for SimulatedExecutor {
    async fn execute(&self, command_type: CommandType, display_id: DisplayId) -> Result<()> {
        debug!("[EXEC] {} on display {}", command_type, display_id);

        if self.unavailable.read().await.contains(&display_id) {
            warn!("[EXEC] Display {} is not available", display_id);
            return Err(anyhow!("Display {} is not available", display_id));
        }

        if self.stalled.read().await.contains(&display_id) {
            warn!("[EXEC] Display {} is stalled, transition will never finish", display_id);
            std::future::pending::<()>().await;
        }

        let was_visible = self.is_overview_visible(display_id).await;
        let ctx = HandlerContext {
            display_id,
            overview_visible: was_visible,
            timings: self.timings.clone(),
        };

        // Dispatch to appropriate handler
        let visible = match command_type {
            CommandType::Home => handlers::handle_home(&ctx).await,
            CommandType::ShowOverview | CommandType::KeyboardInput => {
                handlers::handle_show_overview(&ctx).await
            }
            CommandType::HideOverview => handlers::handle_hide_overview(&ctx).await,
            CommandType::ToggleOverview => handlers::handle_toggle_overview(&ctx).await,
            CommandType::QuickSwitch => handlers::handle_quick_switch(&ctx).await,
        };

        self.overview_visible
            .write()
            .await
            .insert(display_id, visible);

        if visible != was_visible {
            info!(
                "[EXEC] Display {} overview {}",
                display_id,
                if visible { "shown" } else { "hidden" }
            );
        }

        Ok(())
    }
}
