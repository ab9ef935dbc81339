//! AudioManager: the process-wide audio output facade.
//!
//! Wraps one [`AudioBackend`] and answers "what is the current output and how
//! much should callers compensate for it". Backend failures never escape:
//! they are logged, reported as telemetry warnings, and replaced with safe
//! defaults (empty strings, zero latency, `Unknown` category).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::config::{AppConfig, TelemetryConfig};
use crate::engine::backend::{platform_backend, AudioBackend, RemoteCommand, RemoteCommandSink};
use crate::engine::clock::{MonotonicClock, TelemetryClock};
use crate::error::{log_backend_error, BackendError};
use crate::managers::{LatencyManager, LatencySnapshot, RemoteCommandManager};
use crate::route::{AudioRoute, RouteCategory};
use crate::settings::{open_store, SettingsStore};

/// Telemetry event emitted by the facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub timestamp_ms: u64,
    pub kind: TelemetryEventKind,
    pub detail: Option<String>,
}

/// Types of telemetry events supported by the facade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEventKind {
    Constructed { hardware: f32, manual: f32 },
    AudioActiveChanged { active: bool },
    ManualLatencyChanged { value: f32 },
    SourceChanged { hardware: f32, manual: f32 },
    Warning,
}

/// State shared between the facade and the backend's remote command path.
struct FacadeState {
    backend: Arc<dyn AudioBackend>,
    latency: LatencyManager,
    commands: RemoteCommandManager,
    // Serializes snapshot refresh and manual latency writes.
    refresh_lock: Mutex<()>,
    // Orders source-change notifications; never taken by manual latency writes.
    notify_lock: Mutex<()>,
    telemetry_tx: broadcast::Sender<TelemetryEvent>,
    clock: Arc<dyn TelemetryClock>,
}

impl FacadeState {
    fn emit_event(&self, kind: TelemetryEventKind, detail: Option<String>) {
        let _ = self.telemetry_tx.send(TelemetryEvent {
            timestamp_ms: self.clock.elapsed_ms(),
            kind,
            detail,
        });
    }

    fn fallback<T>(&self, err: BackendError, context: &str, default: T) -> T {
        log_backend_error(&err, context);
        self.emit_event(
            TelemetryEventKind::Warning,
            Some(format!("{}: {}", context, err)),
        );
        default
    }

    fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        Self::lock_or_recover(&self.refresh_lock, "refresh_lock")
    }

    fn lock_notify(&self) -> MutexGuard<'_, ()> {
        Self::lock_or_recover(&self.notify_lock, "notify_lock")
    }

    fn lock_or_recover<'a>(lock: &'a Mutex<()>, component: &str) -> MutexGuard<'a, ()> {
        lock.lock().unwrap_or_else(|poisoned| {
            log_backend_error(
                &BackendError::LockPoisoned {
                    component: component.to_string(),
                },
                "lock_or_recover",
            );
            poisoned.into_inner()
        })
    }

    fn sanitize_latency(&self, result: Result<f32, BackendError>, context: &str) -> f32 {
        match result {
            Ok(value) if value.is_finite() && value >= 0.0 => value,
            Ok(value) => self.fallback(
                BackendError::DegenerateValue {
                    what: context.to_string(),
                    value,
                },
                context,
                0.0,
            ),
            Err(err) => self.fallback(err, context, 0.0),
        }
    }

    fn output_uid(&self) -> String {
        self.backend
            .output_uid()
            .unwrap_or_else(|err| self.fallback(err, "audio_output_uid", String::new()))
    }

    fn hardware_latency(&self) -> f32 {
        self.sanitize_latency(self.backend.output_latency(), "hardware_latency")
    }

    fn manual_latency(&self) -> f32 {
        self.latency.load_manual(&self.output_uid())
    }

    /// Re-read hardware and manual latency into the snapshot.
    fn refresh(&self) -> LatencySnapshot {
        let snapshot = LatencySnapshot {
            hardware: self.hardware_latency(),
            manual: self.manual_latency(),
        };
        self.latency.replace(snapshot);
        snapshot
    }
}

impl RemoteCommandSink for FacadeState {
    fn handle_remote_command(&self, command: RemoteCommand) {
        if command == RemoteCommand::SourceChanged {
            let _order = self.lock_notify();
            // Subscribers may write the manual latency, so the refresh lock
            // is released before they run.
            let snapshot = {
                let _guard = self.lock_refresh();
                self.refresh()
            };
            log::info!(
                "[AudioManager] Output source changed: hardware={} manual={}",
                snapshot.hardware,
                snapshot.manual
            );
            self.emit_event(
                TelemetryEventKind::SourceChanged {
                    hardware: snapshot.hardware,
                    manual: snapshot.manual,
                },
                None,
            );
            self.commands.notify(command);
        } else {
            log::debug!("[AudioManager] Remote command {:?}", command);
            self.commands.notify(command);
        }
    }
}

/// Process-wide audio output facade.
///
/// Construct it once per process; constructing a second instance on the
/// native backend replaces the first one's remote command registration.
/// Dropping the facade unregisters its remote commands.
pub struct AudioManager {
    state: Arc<FacadeState>,
    registered: AtomicBool,
}

impl AudioManager {
    /// Create the facade with the platform backend and configuration.
    pub fn new() -> Self {
        Self::from_config(AppConfig::load())
    }

    pub fn from_config(config: AppConfig) -> Self {
        let backend = platform_backend(&config);
        let store = open_store(&config.settings);
        Self::with_options(
            backend,
            store,
            &config.telemetry,
            Arc::new(MonotonicClock::new()),
        )
    }

    pub fn with_backend(backend: Arc<dyn AudioBackend>, store: Arc<dyn SettingsStore>) -> Self {
        Self::with_options(
            backend,
            store,
            &TelemetryConfig::default(),
            Arc::new(MonotonicClock::new()),
        )
    }

    /// Registers remote commands with the backend, then takes the initial
    /// latency snapshot.
    pub fn with_options(
        backend: Arc<dyn AudioBackend>,
        store: Arc<dyn SettingsStore>,
        telemetry: &TelemetryConfig,
        clock: Arc<dyn TelemetryClock>,
    ) -> Self {
        let (telemetry_tx, _) = broadcast::channel(telemetry.event_buffer.max(1));
        let state = Arc::new(FacadeState {
            backend,
            latency: LatencyManager::new(store),
            commands: RemoteCommandManager::new(telemetry.command_buffer),
            refresh_lock: Mutex::new(()),
            notify_lock: Mutex::new(()),
            telemetry_tx,
            clock,
        });

        let sink: Arc<dyn RemoteCommandSink> = state.clone();
        let registered = match state.backend.register_remote_commands(sink) {
            Ok(()) => true,
            Err(err) => state.fallback(err, "register_remote_commands", false),
        };

        let snapshot = {
            let _guard = state.lock_refresh();
            state.refresh()
        };
        state.emit_event(
            TelemetryEventKind::Constructed {
                hardware: snapshot.hardware,
                manual: snapshot.manual,
            },
            None,
        );

        Self {
            state,
            registered: AtomicBool::new(registered),
        }
    }

    // ========================================================================
    // OUTPUT CONTROL
    // ========================================================================

    /// Enable or disable audio output. Fire-and-forget.
    pub fn set_audio_active(&self, active: bool) {
        match self.state.backend.set_active(active) {
            Ok(()) => self
                .state
                .emit_event(TelemetryEventKind::AudioActiveChanged { active }, None),
            Err(err) => self.state.fallback(err, "set_audio_active", ()),
        }
    }

    // ========================================================================
    // ROUTE QUERIES
    // ========================================================================

    pub fn audio_output_name(&self) -> String {
        self.state
            .backend
            .output_name()
            .unwrap_or_else(|err| self.state.fallback(err, "audio_output_name", String::new()))
    }

    pub fn audio_output_uid(&self) -> String {
        self.state.output_uid()
    }

    pub fn audio_output_type(&self) -> RouteCategory {
        self.state.backend.output_type().unwrap_or_else(|err| {
            self.state
                .fallback(err, "audio_output_type", RouteCategory::Unknown)
        })
    }

    pub fn audio_route(&self) -> AudioRoute {
        AudioRoute {
            name: self.audio_output_name(),
            uid: self.audio_output_uid(),
            category: self.audio_output_type(),
        }
    }

    // ========================================================================
    // LATENCY
    // ========================================================================

    /// Persisted manual offset for the current route.
    pub fn manual_latency(&self) -> f32 {
        self.state.manual_latency()
    }

    /// Update the cached manual offset and persist it for the current route.
    pub fn set_manual_latency(&self, value: f32) {
        let _guard = self.state.lock_refresh();
        self.state.latency.set_manual(value);
        let uid = self.state.output_uid();
        self.state.latency.persist_manual(&uid, value);
        self.state
            .emit_event(TelemetryEventKind::ManualLatencyChanged { value }, None);
    }

    /// Hardware output latency, queried fresh from the backend.
    pub fn hardware_latency(&self) -> f32 {
        self.state.hardware_latency()
    }

    pub fn input_latency(&self) -> f32 {
        self.state
            .sanitize_latency(self.state.backend.input_latency(), "input_latency")
    }

    /// Cached hardware latency plus cached manual latency.
    ///
    /// Only refreshed at construction and on `SourceChanged`; subscribe with
    /// [`Self::on_source_change`] to know when to re-read.
    pub fn latency(&self) -> f32 {
        self.state.latency.snapshot().total()
    }

    pub fn latency_snapshot(&self) -> LatencySnapshot {
        self.state.latency.snapshot()
    }

    // ========================================================================
    // REMOTE COMMANDS
    // ========================================================================

    /// Push a decoded remote command into the facade, as a backend would.
    pub fn handle_remote_command(&self, command: RemoteCommand) {
        self.state.handle_remote_command(command);
    }

    pub fn subscribe<F>(&self, command: RemoteCommand, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.state.commands.subscribe(command, Arc::new(handler));
    }

    pub fn on_play<F: Fn() + Send + Sync + 'static>(&self, handler: F) {
        self.subscribe(RemoteCommand::Play, handler);
    }

    pub fn on_pause<F: Fn() + Send + Sync + 'static>(&self, handler: F) {
        self.subscribe(RemoteCommand::Pause, handler);
    }

    pub fn on_next_track<F: Fn() + Send + Sync + 'static>(&self, handler: F) {
        self.subscribe(RemoteCommand::NextTrack, handler);
    }

    pub fn on_previous_track<F: Fn() + Send + Sync + 'static>(&self, handler: F) {
        self.subscribe(RemoteCommand::PreviousTrack, handler);
    }

    /// Called after the latency snapshot has been refreshed for the new route.
    pub fn on_source_change<F: Fn() + Send + Sync + 'static>(&self, handler: F) {
        self.subscribe(RemoteCommand::SourceChanged, handler);
    }

    pub fn subscribe_commands(&self) -> broadcast::Receiver<RemoteCommand> {
        self.state.commands.subscribe_commands()
    }

    pub fn command_stream(&self) -> BroadcastStream<RemoteCommand> {
        self.state.commands.command_stream()
    }

    pub fn subscribe_telemetry(&self) -> broadcast::Receiver<TelemetryEvent> {
        self.state.telemetry_tx.subscribe()
    }

    // ========================================================================
    // TEARDOWN
    // ========================================================================

    /// Unregister remote commands with the backend. Idempotent; also run on drop.
    pub fn shutdown(&self) {
        if !self.registered.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(err) = self.state.backend.unregister_remote_commands() {
            self.state.fallback(err, "unregister_remote_commands", ());
        }
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
