//! In-process per-competition serialization.
//!
//! Only guards callers inside this process. Two service instances sharing a
//! database can still interleave writes on the same competition, and the
//! store's last write wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::foundation::CompetitionId;

/// Keyed async mutex, one slot per competition id.
#[derive(Debug, Clone, Default)]
pub struct CompetitionLocks {
    slots: Arc<Mutex<HashMap<CompetitionId, Arc<AsyncMutex<()>>>>>,
}

impl CompetitionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn acquire(&self, id: CompetitionId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            // Drop slots nobody holds or waits on.
            slots.retain(|key, slot| *key == id || Arc::strong_count(slot) > 1);
            slots.entry(id).or_default().clone()
        };
        slot.lock_owned().await
    }

    /// Number of tracked ids.
    #[cfg(test)]
    pub fn tracked(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
