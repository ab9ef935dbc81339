use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{log_backend_error, BackendError};

use super::SettingsStore;

/// Settings persisted as a flat JSON object of `key -> float`.
///
/// The whole file is rewritten synchronously on every `set_float`. A write
/// failure keeps the in-memory value so reads stay consistent for the
/// lifetime of the process.
pub struct JsonSettingsStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, f32>>,
}

impl JsonSettingsStore {
    /// Open the store at `path`, starting empty if the file is missing or corrupt.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match Self::read_file(&path) {
            Ok(values) => {
                log::info!(
                    "[Settings] Loaded {} entries from {:?}",
                    values.len(),
                    path
                );
                values
            }
            Err(err) => {
                log::warn!(
                    "[Settings] Starting with empty settings at {:?}: {}",
                    path,
                    err
                );
                BTreeMap::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<BTreeMap<String, f32>, BackendError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_file(&self, values: &BTreeMap<String, f32>) -> Result<(), BackendError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for JsonSettingsStore {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .copied()
            .unwrap_or(default)
    }

    fn set_float(&self, key: &str, value: f32) {
        let mut values = self
            .values
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        values.insert(key.to_string(), value);

        if let Err(err) = self.write_file(&values) {
            log_backend_error(&err, "settings_set_float");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "audiobox_settings_{}_{}.json",
            name,
            std::process::id()
        ))
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_settings_path("reopen");
        let _ = fs::remove_file(&path);

        {
            let store = JsonSettingsStore::open(&path);
            store.set_float("MANUAL_LATENCYdev1", 12.5);
        }

        let reopened = JsonSettingsStore::open(&path);
        assert_eq!(reopened.get_float("MANUAL_LATENCYdev1", 0.0), 12.5);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let path = temp_settings_path("corrupt");
        fs::write(&path, "[1, 2").unwrap();

        let store = JsonSettingsStore::open(&path);
        assert_eq!(store.get_float("MANUAL_LATENCY", -1.0), -1.0);

        store.set_float("MANUAL_LATENCY", 4.0);
        let reopened = JsonSettingsStore::open(&path);
        assert_eq!(reopened.get_float("MANUAL_LATENCY", 0.0), 4.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_unwritable_path_keeps_value_in_memory() {
        let dir = temp_settings_path("as_dir");
        let _ = fs::remove_file(&dir);
        fs::create_dir_all(&dir).unwrap();

        // The target is a directory, so every write fails.
        let store = JsonSettingsStore::open(&dir);
        store.set_float("MANUAL_LATENCYdev1", 3.0);
        assert_eq!(store.get_float("MANUAL_LATENCYdev1", 0.0), 3.0);

        let _ = fs::remove_dir_all(&dir);
    }
}
