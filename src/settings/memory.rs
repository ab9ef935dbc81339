use std::collections::HashMap;
use std::sync::RwLock;

use super::SettingsStore;

/// Process-local store used when no settings file is configured, and by tests.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<String, f32>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw lookup without a default, for inspecting what was persisted.
    pub fn get(&self, key: &str) -> Option<f32> {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .copied()
    }

    pub fn len(&self) -> usize {
        self.values
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key).unwrap_or(default)
    }

    fn set_float(&self, key: &str, value: f32) {
        self.values
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value);
    }
}
