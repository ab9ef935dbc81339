// LatencyManager: cached latency snapshot plus manual offset persistence
//
// Single Responsibility: the two cached floats and the settings keys behind them

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::error::{log_backend_error, BackendError};
use crate::settings::{manual_latency_key, SettingsStore};

/// Hardware and manual latency as of the last refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatencySnapshot {
    pub hardware: f32,
    pub manual: f32,
}

impl LatencySnapshot {
    /// Latency callers should compensate for.
    pub fn total(&self) -> f32 {
        self.hardware + self.manual
    }
}

/// Manages the cached latency snapshot and the per-route manual offsets
///
/// The snapshot is only replaced as a whole (`replace`) or has its manual part
/// updated (`set_manual`); readers always see a consistent pair.
pub struct LatencyManager {
    snapshot: RwLock<LatencySnapshot>,
    store: Arc<dyn SettingsStore>,
}

impl LatencyManager {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            snapshot: RwLock::new(LatencySnapshot::default()),
            store,
        }
    }

    fn read_snapshot(&self) -> RwLockReadGuard<'_, LatencySnapshot> {
        self.snapshot.read().unwrap_or_else(|poisoned| {
            log_backend_error(
                &BackendError::LockPoisoned {
                    component: "latency_snapshot".to_string(),
                },
                "read_snapshot",
            );
            poisoned.into_inner()
        })
    }

    fn write_snapshot(&self) -> RwLockWriteGuard<'_, LatencySnapshot> {
        self.snapshot.write().unwrap_or_else(|poisoned| {
            log_backend_error(
                &BackendError::LockPoisoned {
                    component: "latency_snapshot".to_string(),
                },
                "write_snapshot",
            );
            poisoned.into_inner()
        })
    }

    pub fn snapshot(&self) -> LatencySnapshot {
        *self.read_snapshot()
    }

    pub fn replace(&self, snapshot: LatencySnapshot) {
        *self.write_snapshot() = snapshot;
    }

    pub fn set_manual(&self, manual: f32) {
        self.write_snapshot().manual = manual;
    }

    /// Persisted manual offset of route `uid`, `0.0` when never set.
    pub fn load_manual(&self, uid: &str) -> f32 {
        self.store.get_float(&manual_latency_key(uid), 0.0)
    }

    pub fn persist_manual(&self, uid: &str, manual: f32) {
        self.store.set_float(&manual_latency_key(uid), manual);
    }
}
