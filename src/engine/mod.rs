//! Engine module housing the audio facade.
//!
//! `backend` holds the pluggable strategies (engine-default, native) and
//! `core` the `AudioManager` facade built on top of them.

pub mod backend;
pub mod clock;
pub mod core;

pub use backend::{
    AudioBackend, EngineDefaultBackend, HostAudioEngine, NativeAudioApi, NativeBackend,
    RemoteCommand, RemoteCommandSink, StaticHostEngine,
};
pub use clock::{MonotonicClock, TelemetryClock};
pub use self::core::{AudioManager, TelemetryEvent, TelemetryEventKind};
