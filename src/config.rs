//! Configuration management for the audio facade
//!
//! This module provides runtime configuration loading from JSON files.
//! Host engine buffer parameters, the settings file location and channel
//! sizes can be adjusted without recompiling.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Host engine DSP buffer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Frames per DSP buffer
    pub dsp_buffer_length: u32,
    /// Number of DSP buffers queued for output
    pub dsp_buffer_count: u32,
    /// Output sample rate in Hz
    pub sample_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dsp_buffer_length: 1024,
            dsp_buffer_count: 4,
            sample_rate: 48_000,
        }
    }
}

/// Persisted settings location
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsConfig {
    /// JSON file backing the settings store; `None` keeps settings in memory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Broadcast channel capacities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub command_buffer: usize,
    pub event_buffer: usize,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            command_buffer: 32,
            event_buffer: 64,
        }
    }
}

impl AppConfig {
    /// Load configuration from JSON file
    ///
    /// Missing files and invalid JSON fall back to the default configuration
    /// with a warning.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration on mobile targets
    ///
    /// App bundles carry no config file next to the binary, so mobile
    /// targets always run on defaults.
    #[cfg(any(target_os = "ios", target_os = "android"))]
    pub fn load() -> Self {
        log::info!("[Config] Using default configuration on mobile target");
        Self::default()
    }

    /// Load configuration for desktop platforms
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    pub fn load() -> Self {
        Self::load_from_file("assets/audio_config.json")
    }
}
