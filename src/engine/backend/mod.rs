//! Backend abstractions for the audio facade.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::BackendError;
use crate::route::RouteCategory;

/// Decoded remote-control intent or route notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteCommand {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
    SourceChanged,
}

impl RemoteCommand {
    pub const ALL: [RemoteCommand; 5] = [
        RemoteCommand::Play,
        RemoteCommand::Pause,
        RemoteCommand::NextTrack,
        RemoteCommand::PreviousTrack,
        RemoteCommand::SourceChanged,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            RemoteCommand::Play => 0,
            RemoteCommand::Pause => 1,
            RemoteCommand::NextTrack => 2,
            RemoteCommand::PreviousTrack => 3,
            RemoteCommand::SourceChanged => 4,
        }
    }
}

/// Receiver of remote commands raised by a backend.
///
/// Backends may call this from any thread.
pub trait RemoteCommandSink: Send + Sync {
    fn handle_remote_command(&self, command: RemoteCommand);
}

/// Trait implemented by platform-specific audio backends.
///
/// Every query may fail; the facade logs the error and substitutes a safe
/// default, so implementations never need to invent fallback values.
pub trait AudioBackend: Send + Sync {
    fn set_active(&self, active: bool) -> Result<(), BackendError>;
    fn output_name(&self) -> Result<String, BackendError>;
    fn output_uid(&self) -> Result<String, BackendError>;
    fn output_type(&self) -> Result<RouteCategory, BackendError>;
    fn output_latency(&self) -> Result<f32, BackendError>;
    fn input_latency(&self) -> Result<f32, BackendError>;
    fn register_remote_commands(
        &self,
        sink: Arc<dyn RemoteCommandSink>,
    ) -> Result<(), BackendError>;
    fn unregister_remote_commands(&self) -> Result<(), BackendError>;
}

mod engine_default;
pub use engine_default::{
    EngineDefaultBackend, HostAudioEngine, StaticHostEngine, DEFAULT_OUTPUT_NAME,
};

pub mod native;
pub use native::{NativeAudioApi, NativeBackend, RemoteCommandCallback};

cfg_if::cfg_if! {
    if #[cfg(not(any(target_os = "android", target_os = "ios")))] {
        mod cpal;
        pub use self::cpal::CpalHostEngine;
    }
}

/// Create the backend this build targets.
///
/// iOS talks to the statically linked native module; desktop hosts probe the
/// default output device through cpal; Android runs on the configured
/// engine values.
#[cfg(target_os = "ios")]
pub fn platform_backend(_config: &AppConfig) -> Arc<dyn AudioBackend> {
    Arc::new(NativeBackend::new(NativeAudioApi::linked()))
}

#[cfg(target_os = "android")]
pub fn platform_backend(config: &AppConfig) -> Arc<dyn AudioBackend> {
    Arc::new(EngineDefaultBackend::new(StaticHostEngine::new(
        config.engine.clone(),
    )))
}

#[cfg(not(any(target_os = "android", target_os = "ios")))]
pub fn platform_backend(config: &AppConfig) -> Arc<dyn AudioBackend> {
    Arc::new(EngineDefaultBackend::new(CpalHostEngine::new(
        config.engine.clone(),
    )))
}
