//! Integration tests for the engine-default facade
//!
//! These tests exercise the public API the way a host application does:
//! - Construction from configuration
//! - Manual latency persisted to a JSON settings file across restarts
//! - Remote commands pushed by the host and consumed as a stream

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use audiobox_audio::config::{AppConfig, EngineConfig, SettingsConfig};
use audiobox_audio::engine::{AudioManager, EngineDefaultBackend, StaticHostEngine};
use audiobox_audio::settings::{open_store, JsonSettingsStore};
use audiobox_audio::{RemoteCommand, RouteCategory};

fn temp_settings_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "audiobox_it_{}_{}.json",
        name,
        std::process::id()
    ))
}

fn engine_backend(config: EngineConfig) -> Arc<EngineDefaultBackend<StaticHostEngine>> {
    Arc::new(EngineDefaultBackend::new(StaticHostEngine::new(config)))
}

/// Test that the platform facade can be created from configuration
#[test]
fn test_from_config_creation() {
    let manager = AudioManager::from_config(AppConfig::default());
    assert!(manager.hardware_latency() >= 0.0);
    assert!(manager.latency() >= manager.manual_latency());
    drop(manager);
}

#[test]
fn test_manual_latency_survives_restart() {
    let path = temp_settings_path("restart");
    let _ = std::fs::remove_file(&path);

    {
        let store = Arc::new(JsonSettingsStore::open(&path));
        let manager = AudioManager::with_backend(engine_backend(EngineConfig::default()), store);
        assert_eq!(manager.manual_latency(), 0.0);
        manager.set_manual_latency(0.045);
    }

    let store = open_store(&SettingsConfig {
        path: Some(path.clone()),
    });
    assert_eq!(store.get_float("MANUAL_LATENCY", 0.0), 0.045);

    let manager = AudioManager::with_backend(engine_backend(EngineConfig::default()), store);
    assert_eq!(manager.manual_latency(), 0.045);
    let expected = 1024.0 * 4.0 / 48_000.0 + 0.045;
    assert!((manager.latency() - expected).abs() < 1e-6);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_engine_default_reports_built_in_speakers() {
    let backend = engine_backend(EngineConfig {
        dsp_buffer_length: 256,
        dsp_buffer_count: 2,
        sample_rate: 44_100,
    });
    let manager = AudioManager::with_backend(backend.clone(), open_store(&SettingsConfig::default()));

    let route = manager.audio_route();
    assert_eq!(route.name, "Default speakers");
    assert_eq!(route.uid, "");
    assert_eq!(route.category, RouteCategory::BuiltIn);

    manager.set_audio_active(false);
    assert!(backend.engine().is_paused());
    manager.set_audio_active(true);
    assert!(!backend.engine().is_paused());
    assert_eq!(manager.audio_route(), route);
}

#[test]
fn test_host_pushed_source_change() {
    let manager = AudioManager::with_backend(
        engine_backend(EngineConfig::default()),
        open_store(&SettingsConfig::default()),
    );
    let changes = Arc::new(AtomicUsize::new(0));
    {
        let changes = Arc::clone(&changes);
        manager.on_source_change(move || {
            changes.fetch_add(1, Ordering::SeqCst);
        });
    }
    let mut commands = manager.subscribe_commands();

    manager.handle_remote_command(RemoteCommand::SourceChanged);

    assert_eq!(changes.load(Ordering::SeqCst), 1);
    assert_eq!(commands.try_recv().unwrap(), RemoteCommand::SourceChanged);
}
