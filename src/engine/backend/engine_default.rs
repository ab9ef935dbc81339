use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::BackendError;
use crate::route::RouteCategory;

use super::{AudioBackend, RemoteCommandSink};

/// Route name reported when the host engine exposes no device enumeration.
pub const DEFAULT_OUTPUT_NAME: &str = "Default speakers";

/// Host engine audio configuration queried by [`EngineDefaultBackend`].
pub trait HostAudioEngine: Send + Sync {
    /// Frames per DSP buffer and number of buffers queued for output.
    fn dsp_buffer_size(&self) -> Result<(u32, u32), BackendError>;
    fn sample_rate(&self) -> Result<u32, BackendError>;
    /// Pause or resume the global listener.
    fn set_paused(&self, paused: bool);
}

/// Host engine whose buffer layout is fixed by configuration.
pub struct StaticHostEngine {
    config: EngineConfig,
    paused: AtomicBool,
}

impl StaticHostEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            paused: AtomicBool::new(false),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl HostAudioEngine for StaticHostEngine {
    fn dsp_buffer_size(&self) -> Result<(u32, u32), BackendError> {
        Ok((self.config.dsp_buffer_length, self.config.dsp_buffer_count))
    }

    fn sample_rate(&self) -> Result<u32, BackendError> {
        Ok(self.config.sample_rate)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::SeqCst);
    }
}

/// Backend satisfied entirely by the host engine.
///
/// Always reports the built-in speakers; there is no remote-command source,
/// so hosts forward commands through `AudioManager::handle_remote_command`.
pub struct EngineDefaultBackend<E: HostAudioEngine> {
    engine: E,
}

impl<E: HostAudioEngine> EngineDefaultBackend<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

impl<E: HostAudioEngine> AudioBackend for EngineDefaultBackend<E> {
    fn set_active(&self, active: bool) -> Result<(), BackendError> {
        self.engine.set_paused(!active);
        Ok(())
    }

    fn output_name(&self) -> Result<String, BackendError> {
        Ok(DEFAULT_OUTPUT_NAME.to_string())
    }

    fn output_uid(&self) -> Result<String, BackendError> {
        Ok(String::new())
    }

    fn output_type(&self) -> Result<RouteCategory, BackendError> {
        Ok(RouteCategory::BuiltIn)
    }

    /// Total output buffering delay in seconds.
    fn output_latency(&self) -> Result<f32, BackendError> {
        let (length, count) = self.engine.dsp_buffer_size()?;
        let sample_rate = self.engine.sample_rate()?;
        if sample_rate == 0 {
            return Err(BackendError::DegenerateValue {
                what: "sample rate".to_string(),
                value: 0.0,
            });
        }
        Ok((length as u64 * count as u64) as f32 / sample_rate as f32)
    }

    fn input_latency(&self) -> Result<f32, BackendError> {
        Ok(0.0)
    }

    fn register_remote_commands(
        &self,
        _sink: Arc<dyn RemoteCommandSink>,
    ) -> Result<(), BackendError> {
        log::debug!("[EngineDefaultBackend] No remote command source on this host");
        Ok(())
    }

    fn unregister_remote_commands(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
