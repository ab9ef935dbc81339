// AudioBox Audio - output route and latency facade
// Engine-default and native (iOS) backends behind a single AudioManager

// Module declarations
pub mod config;
pub mod engine;
pub mod error;
pub mod managers;
pub mod route;
pub mod settings;

// Re-exports for convenience
pub use config::AppConfig;
pub use engine::{AudioBackend, AudioManager, RemoteCommand};
pub use managers::LatencySnapshot;
pub use route::{AudioRoute, RouteCategory};
pub use settings::SettingsStore;

/// Install the process-wide log subscriber.
///
/// `log` records from this crate are bridged into `tracing`. Safe to call
/// more than once; later calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .try_init();
    tracing::debug!("[AudioBox] Logging initialized");
}
