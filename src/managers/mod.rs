// Managers Module
//
// Focused managers owned by the AudioManager facade:
// - LatencyManager: cached latency snapshot and per-route manual offset persistence
// - RemoteCommandManager: remote command subscribers and broadcast channel

pub mod latency_manager;
pub mod remote_command_manager;

pub use latency_manager::{LatencyManager, LatencySnapshot};
pub use remote_command_manager::{RemoteCommandHandler, RemoteCommandManager};
