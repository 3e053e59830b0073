//! Display enumerator seam and an in-memory implementation

use navqueue_shared::{DisplayId, DEFAULT_DISPLAY};
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// Reports the currently active displays
pub trait DisplayEnumerator: Send + Sync {
    /// Synchronous snapshot of the active display ids
    fn active_display_ids(&self) -> Vec<DisplayId>;
}

/// Display set maintained by the embedding application
///
/// Ids are reported in connection order.
#[derive(Debug)]
pub struct StaticDisplays {
    displays: RwLock<Vec<DisplayId>>,
}

impl StaticDisplays {
    /// Create a display set with the given ids, dropping duplicates
    pub fn new(display_ids: impl IntoIterator<Item = DisplayId>) -> Self {
        let displays = Self {
            displays: RwLock::new(Vec::new()),
        };
        displays.set(display_ids);
        displays
    }

    /// Register a display, a no-op if it is already active
    pub fn connect(&self, display_id: DisplayId) {
        let mut displays = self.displays.write().unwrap_or_else(PoisonError::into_inner);
        if !displays.contains(&display_id) {
            displays.push(display_id);
            debug!("[DISPLAY] Display {} connected", display_id);
        }
    }

    /// Remove a display, a no-op if it is not active
    pub fn disconnect(&self, display_id: DisplayId) {
        let mut displays = self.displays.write().unwrap_or_else(PoisonError::into_inner);
        displays.retain(|id| *id != display_id);
        debug!("[DISPLAY] Display {} disconnected", display_id);
    }

    /// Replace the whole active set
    pub fn set(&self, display_ids: impl IntoIterator<Item = DisplayId>) {
        let mut displays = self.displays.write().unwrap_or_else(PoisonError::into_inner);
        displays.clear();
        for id in display_ids {
            if !displays.contains(&id) {
                displays.push(id);
            }
        }
    }

    /// Get the number of active displays
    pub fn count(&self) -> usize {
        self.displays.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Default for StaticDisplays {
    /// Only the default display
    fn default() -> Self {
        Self::new([DEFAULT_DISPLAY])
    }
}

impl DisplayEnumerator for StaticDisplays {
    fn active_display_ids(&self) -> Vec<DisplayId> {
        self.displays
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
