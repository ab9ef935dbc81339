//! cpal-backed host engine for desktop platforms (Linux, macOS, Windows)
//!
//! The configured DSP layout is kept, but the sample rate comes from the
//! default output device and the buffer length is clamped to what the device
//! supports. The device is probed on every query so a changed default output
//! is picked up on the next route refresh.

use std::sync::atomic::{AtomicBool, Ordering};

use cpal::traits::{DeviceTrait, HostTrait};
use cpal::SupportedBufferSize;

use crate::config::EngineConfig;
use crate::error::BackendError;

use super::HostAudioEngine;

/// Host engine probing the default cpal output device.
pub struct CpalHostEngine {
    config: EngineConfig,
    paused: AtomicBool,
}

impl CpalHostEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            paused: AtomicBool::new(false),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn default_output_config(&self) -> Result<cpal::SupportedStreamConfig, BackendError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| BackendError::DeviceQuery {
                details: "No output device available".to_string(),
            })?;

        device
            .default_output_config()
            .map_err(|err| BackendError::DeviceQuery {
                details: format!("Failed to get default output config: {}", err),
            })
    }
}

/// Clamp the configured buffer length into the device's supported range.
fn clamp_buffer_length(configured: u32, supported: &SupportedBufferSize) -> u32 {
    match supported {
        SupportedBufferSize::Range { min, max } if min <= max => configured.clamp(*min, *max),
        _ => configured,
    }
}

impl HostAudioEngine for CpalHostEngine {
    fn dsp_buffer_size(&self) -> Result<(u32, u32), BackendError> {
        let length = match self.default_output_config() {
            Ok(device_config) => {
                clamp_buffer_length(self.config.dsp_buffer_length, device_config.buffer_size())
            }
            Err(err) => {
                log::debug!("[CpalHostEngine] Using configured buffer length: {}", err);
                self.config.dsp_buffer_length
            }
        };
        Ok((length, self.config.dsp_buffer_count))
    }

    fn sample_rate(&self) -> Result<u32, BackendError> {
        match self.default_output_config() {
            Ok(device_config) => Ok(device_config.sample_rate().0),
            Err(err) => {
                log::debug!("[CpalHostEngine] Using configured sample rate: {}", err);
                Ok(self.config.sample_rate)
            }
        }
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
}
