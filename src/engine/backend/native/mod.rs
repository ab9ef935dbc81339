//! Backend delegating to the platform's native audio module.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::BackendError;
use crate::route::RouteCategory;

use super::{AudioBackend, RemoteCommandSink};

mod ffi;
mod trampoline;

pub use ffi::{
    IntFn, LatencyFn, NativeAudioApi, RegisterRemoteCommandsFn, ReleaseStringFn,
    RemoteCommandCallback, StringFn, VoidFn,
};
pub use trampoline::is_installed as remote_commands_installed;

fn unavailable(binding: &str) -> BackendError {
    BackendError::Unavailable {
        binding: binding.to_string(),
    }
}

/// Backend that forwards every query to a [`NativeAudioApi`] table.
///
/// Remote commands go through process-wide trampolines, so only one native
/// backend can have commands registered at a time; the most recent
/// registration wins.
pub struct NativeBackend {
    api: NativeAudioApi,
    detected_latency_bits: AtomicU32,
    detections: AtomicU64,
    sink: Mutex<Option<Arc<dyn RemoteCommandSink>>>,
}

impl NativeBackend {
    pub fn new(api: NativeAudioApi) -> Self {
        Self {
            api,
            detected_latency_bits: AtomicU32::new(0),
            detections: AtomicU64::new(0),
            sink: Mutex::new(None),
        }
    }

    /// Most recent positive output latency reported by the module.
    pub fn detected_latency(&self) -> Option<f32> {
        if self.detections.load(Ordering::SeqCst) == 0 {
            return None;
        }
        Some(f32::from_bits(self.detected_latency_bits.load(Ordering::SeqCst)))
    }

    /// Number of positive output latency reports seen so far.
    pub fn detection_count(&self) -> u64 {
        self.detections.load(Ordering::SeqCst)
    }

    fn read_string(
        &self,
        entry: Option<ffi::StringFn>,
        binding: &str,
    ) -> Result<String, BackendError> {
        let get = entry.ok_or_else(|| unavailable(binding))?;
        // SAFETY: the module returns null or a NUL-terminated string that it
        // expects the caller to release with `release_string`.
        Ok(unsafe { ffi::take_native_string(get(), self.api.release_string) })
    }
}

impl AudioBackend for NativeBackend {
    fn set_active(&self, active: bool) -> Result<(), BackendError> {
        let (entry, binding) = if active {
            (self.api.enable_audio, "AudioManager_EnableAudio")
        } else {
            (self.api.disable_audio, "AudioManager_DisableAudio")
        };
        let call = entry.ok_or_else(|| unavailable(binding))?;
        unsafe { call() };
        Ok(())
    }

    fn output_name(&self) -> Result<String, BackendError> {
        self.read_string(self.api.get_output_name, "AudioManager_GetOutputName")
    }

    fn output_uid(&self) -> Result<String, BackendError> {
        self.read_string(self.api.get_output_uid, "AudioManager_GetOutputUID")
    }

    fn output_type(&self) -> Result<RouteCategory, BackendError> {
        let get = self
            .api
            .get_output_type
            .ok_or_else(|| unavailable("AudioManager_GetOutputType"))?;
        Ok(RouteCategory::from(unsafe { get() }))
    }

    fn output_latency(&self) -> Result<f32, BackendError> {
        let get = self
            .api
            .get_output_latency
            .ok_or_else(|| unavailable("AudioManager_GetOutputLatency"))?;
        let latency = unsafe { get() };

        if latency > 0.0 {
            log::info!("[AudioManager] Detected {}ms latency.", latency);
            self.detected_latency_bits
                .store(latency.to_bits(), Ordering::SeqCst);
            self.detections.fetch_add(1, Ordering::SeqCst);
        }

        Ok(latency)
    }

    fn input_latency(&self) -> Result<f32, BackendError> {
        let get = self
            .api
            .get_input_latency
            .ok_or_else(|| unavailable("AudioManager_GetInputLatency"))?;
        Ok(unsafe { get() })
    }

    fn register_remote_commands(
        &self,
        sink: Arc<dyn RemoteCommandSink>,
    ) -> Result<(), BackendError> {
        let register = self
            .api
            .register_remote_commands
            .ok_or_else(|| unavailable("AudioManager_RegisterRemoteCommands"))?;

        *self
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(sink.clone());
        if trampoline::install(sink) {
            log::warn!("[NativeBackend] Remote commands registered again; previous sink replaced");
        }

        let [play, pause, next_track, previous_track, source_changed] = trampoline::callbacks();
        unsafe { register(play, pause, next_track, previous_track, source_changed) };
        log::debug!("[NativeBackend] Remote commands registered");
        Ok(())
    }

    fn unregister_remote_commands(&self) -> Result<(), BackendError> {
        let sink = self
            .sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let Some(sink) = sink else {
            return Ok(());
        };

        // The module holds a single callback set; leave it alone when a later
        // registration owns the trampolines.
        if !trampoline::release(&sink) {
            log::debug!(
                "[NativeBackend] Remote commands owned by a newer registration; skipping unregister"
            );
            return Ok(());
        }

        let unregister = self
            .api
            .unregister_remote_commands
            .ok_or_else(|| unavailable("AudioManager_UnregisterRemoteCommands"))?;
        unsafe { unregister() };
        log::debug!("[NativeBackend] Remote commands unregistered");
        Ok(())
    }
}
