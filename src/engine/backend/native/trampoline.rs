//! Stable `extern "C"` entry points handed to the native module.
//!
//! The native callbacks carry no user data, so the registered sink lives in a
//! process-wide slot. Function items have fixed addresses for the lifetime of
//! the process, which keeps the registered pointers valid until
//! `AudioManager_UnregisterRemoteCommands` runs.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;

use crate::engine::backend::{RemoteCommand, RemoteCommandSink};

use super::ffi::RemoteCommandCallback;

static SINK: Lazy<RwLock<Option<Arc<dyn RemoteCommandSink>>>> = Lazy::new(|| RwLock::new(None));

/// Install `sink` as the target of the trampolines. Returns `true` if a
/// previously registered sink was replaced.
pub(super) fn install(sink: Arc<dyn RemoteCommandSink>) -> bool {
    let mut slot = SINK.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    slot.replace(sink).is_some()
}

/// Empty the slot if it still holds `sink`. Returns `false` when a later
/// registration has already replaced it.
pub(super) fn release(sink: &Arc<dyn RemoteCommandSink>) -> bool {
    let mut slot = SINK.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    match slot.as_ref() {
        Some(current) if Arc::ptr_eq(current, sink) => {
            slot.take();
            true
        }
        _ => false,
    }
}

/// Whether native callbacks currently reach a sink.
pub fn is_installed() -> bool {
    SINK.read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .is_some()
}

fn dispatch(command: RemoteCommand) {
    // Clone out of the slot so the sink runs without holding the lock.
    let sink = SINK
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .clone();

    let Some(sink) = sink else {
        log::debug!(
            "[NativeBackend] Dropping {:?}: no remote command sink registered",
            command
        );
        return;
    };

    // Unwinding into the native caller is undefined behavior.
    if catch_unwind(AssertUnwindSafe(|| sink.handle_remote_command(command))).is_err() {
        log::error!("[NativeBackend] Remote command handler panicked on {:?}", command);
    }
}

extern "C" fn play_handler() {
    dispatch(RemoteCommand::Play);
}

extern "C" fn pause_handler() {
    dispatch(RemoteCommand::Pause);
}

extern "C" fn next_track_handler() {
    dispatch(RemoteCommand::NextTrack);
}

extern "C" fn previous_track_handler() {
    dispatch(RemoteCommand::PreviousTrack);
}

extern "C" fn source_changed_handler() {
    dispatch(RemoteCommand::SourceChanged);
}

/// Trampolines in registration order: play, pause, next, previous, source changed.
pub(super) fn callbacks() -> [RemoteCommandCallback; 5] {
    [
        play_handler,
        pause_handler,
        next_track_handler,
        previous_track_handler,
        source_changed_handler,
    ]
}
