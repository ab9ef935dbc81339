// RemoteCommandManager: remote command fan-out
//
// Single Responsibility: subscriber registration and notification

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::engine::backend::RemoteCommand;

/// Callback invoked synchronously when a remote command arrives.
pub type RemoteCommandHandler = Arc<dyn Fn() + Send + Sync>;

/// Manages subscribers for each remote command kind
///
/// Subscribers are append-only and live as long as the manager. Every
/// notification runs the synchronous handlers first, then publishes the
/// command on a broadcast channel for async consumers.
///
/// # Channel Types
/// - Handlers: one list per [`RemoteCommand`], called on the dispatching thread
/// - Commands: tokio broadcast channel, lagging receivers drop old commands
pub struct RemoteCommandManager {
    handlers: RwLock<[Vec<RemoteCommandHandler>; 5]>,
    commands: broadcast::Sender<RemoteCommand>,
}

impl RemoteCommandManager {
    /// Create a manager whose broadcast channel buffers `capacity` commands
    pub fn new(capacity: usize) -> Self {
        let (commands, _) = broadcast::channel(capacity.max(1));
        Self {
            handlers: RwLock::new(Default::default()),
            commands,
        }
    }

    /// Register `handler` for `command`
    pub fn subscribe(&self, command: RemoteCommand, handler: RemoteCommandHandler) {
        self.handlers
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())[command.index()]
        .push(handler);
    }

    pub fn handler_count(&self, command: RemoteCommand) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())[command.index()]
        .len()
    }

    /// Invoke every handler registered for `command`, then broadcast it
    ///
    /// Handlers run outside the registration lock so they may subscribe
    /// further handlers or query the facade. A panicking handler is logged
    /// and does not stop the remaining ones.
    pub fn notify(&self, command: RemoteCommand) {
        let handlers: Vec<RemoteCommandHandler> = self
            .handlers
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())[command.index()]
        .clone();

        for handler in handlers {
            if catch_unwind(AssertUnwindSafe(|| handler())).is_err() {
                log::error!("[AudioManager] {:?} subscriber panicked", command);
            }
        }

        // No receivers is fine
        let _ = self.commands.send(command);
    }

    /// Subscribe to the broadcast of every notified command
    pub fn subscribe_commands(&self) -> broadcast::Receiver<RemoteCommand> {
        self.commands.subscribe()
    }

    /// Stream wrapper around [`Self::subscribe_commands`]
    pub fn command_stream(&self) -> BroadcastStream<RemoteCommand> {
        BroadcastStream::new(self.commands.subscribe())
    }
}

impl Default for RemoteCommandManager {
    fn default() -> Self {
        Self::new(32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, RemoteCommandHandler) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler_count = Arc::clone(&count);
        let handler: RemoteCommandHandler = Arc::new(move || {
            handler_count.fetch_add(1, Ordering::SeqCst);
        });
        (count, handler)
    }

    #[test]
    fn test_notify_reaches_only_matching_handlers() {
        let manager = RemoteCommandManager::default();
        let (plays, on_play) = counter();
        let (pauses, on_pause) = counter();
        manager.subscribe(RemoteCommand::Play, on_play);
        manager.subscribe(RemoteCommand::Pause, on_pause);

        manager.notify(RemoteCommand::Play);
        manager.notify(RemoteCommand::Play);

        assert_eq!(plays.load(Ordering::SeqCst), 2);
        assert_eq!(pauses.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_multiple_handlers_per_command() {
        let manager = RemoteCommandManager::default();
        let (first, h1) = counter();
        let (second, h2) = counter();
        manager.subscribe(RemoteCommand::NextTrack, h1);
        manager.subscribe(RemoteCommand::NextTrack, h2);
        assert_eq!(manager.handler_count(RemoteCommand::NextTrack), 2);

        manager.notify(RemoteCommand::NextTrack);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_handler_does_not_block_others() {
        let manager = RemoteCommandManager::default();
        let (count, handler) = counter();
        manager.subscribe(RemoteCommand::Pause, Arc::new(|| panic!("subscriber bug")));
        manager.subscribe(RemoteCommand::Pause, handler);

        manager.notify(RemoteCommand::Pause);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_subscribe_during_notify() {
        let manager = Arc::new(RemoteCommandManager::default());
        let inner = Arc::clone(&manager);
        manager.subscribe(
            RemoteCommand::Play,
            Arc::new(move || inner.subscribe(RemoteCommand::Play, Arc::new(|| {}))),
        );

        manager.notify(RemoteCommand::Play);

        assert_eq!(manager.handler_count(RemoteCommand::Play), 2);
    }

    #[test]
    fn test_commands_are_broadcast() {
        let manager = RemoteCommandManager::default();
        let mut rx = manager.subscribe_commands();

        manager.notify(RemoteCommand::PreviousTrack);

        assert_eq!(rx.try_recv().unwrap(), RemoteCommand::PreviousTrack);
    }
}
