//! Key-value settings persistence.
//!
//! The facade only ever touches keys under [`MANUAL_LATENCY_KEY`]; other
//! components sharing a store must pick their own prefixes.

use std::sync::Arc;

use crate::config::SettingsConfig;

mod json_file;
mod memory;

pub use json_file::JsonSettingsStore;
pub use memory::MemorySettingsStore;

/// Prefix for per-route manual latency entries.
pub const MANUAL_LATENCY_KEY: &str = "MANUAL_LATENCY";

/// Build the settings key holding the manual latency of route `uid`.
pub fn manual_latency_key(uid: &str) -> String {
    format!("{}{}", MANUAL_LATENCY_KEY, uid)
}

/// Float-valued key-value store shared across the process.
///
/// Implementations are infallible from the caller's point of view: failures
/// are logged and reads fall back to `default`.
pub trait SettingsStore: Send + Sync {
    fn get_float(&self, key: &str, default: f32) -> f32;
    fn set_float(&self, key: &str, value: f32);
}

/// Open the store described by `config`.
pub fn open_store(config: &SettingsConfig) -> Arc<dyn SettingsStore> {
    match &config.path {
        Some(path) => Arc::new(JsonSettingsStore::open(path)),
        None => Arc::new(MemorySettingsStore::new()),
    }
}
