//! End-to-end tests wiring the real ports together: a sled-backed
//! store, a simulated OS scheme source, and a recording target.

use std::sync::Arc;

use theme_core::{
    create_theme_system, ResolvedTheme, ThemeConfig, ThemeMode, ThemePorts, ThemeSystem,
};
use theme_core::{LogTarget, RecordingTarget};
use theme_platform::{PollingScheme, SchemeSource, SimulatedScheme, UnavailableScheme};
use theme_storage::{KvConfig, SledStore, ThemeStore};

fn sled_store(dir: &tempfile::TempDir) -> Arc<SledStore> {
    let path = dir.path().join("theme_mode.db");
    let config = KvConfig::new(path.to_string_lossy().to_string()).flush_every_ms(None);
    Arc::new(SledStore::new(config).unwrap())
}

#[test]
fn test_preference_survives_restart_via_sled() {
    let dir = tempfile::TempDir::new().unwrap();

    {
        let store = sled_store(&dir);
        let ports = ThemePorts {
            store: Arc::clone(&store) as Arc<dyn ThemeStore>,
            scheme: Arc::new(UnavailableScheme),
            target: Arc::new(LogTarget),
        };
        let system = create_theme_system(ThemeConfig::default(), ports);
        system.set_theme(ThemeMode::Dark);
        store.flush().unwrap();
    }

    // A second instance against the same database picks the value up
    let ports = ThemePorts {
        store: sled_store(&dir),
        scheme: Arc::new(UnavailableScheme),
        target: Arc::new(LogTarget),
    };
    let system = create_theme_system(ThemeConfig::default(), ports);
    assert_eq!(system.theme(), ThemeMode::Dark);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Dark);
}

#[test]
fn test_clear_stored_resets_next_instance_to_default() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = sled_store(&dir);

    let ports = ThemePorts {
        store: Arc::clone(&store) as Arc<dyn ThemeStore>,
        scheme: Arc::new(UnavailableScheme),
        target: Arc::new(LogTarget),
    };
    let system = create_theme_system(ThemeConfig::default(), ports);
    system.set_theme(ThemeMode::Light);
    system.clear_stored();
    drop(system);

    let config = ThemeConfig::new().default_mode(ThemeMode::Dark);
    let ports = ThemePorts {
        store: Arc::clone(&store) as Arc<dyn ThemeStore>,
        scheme: Arc::new(UnavailableScheme),
        target: Arc::new(LogTarget),
    };
    let system = create_theme_system(config, ports);
    assert_eq!(system.theme(), ThemeMode::Dark);
}

#[test]
fn test_system_mode_follows_os_end_to_end() {
    let scheme = Arc::new(SimulatedScheme::new(false));
    let target = Arc::new(RecordingTarget::new());
    let ports = ThemePorts {
        store: Arc::new(theme_storage::MemoryStore::new()),
        scheme: Arc::clone(&scheme) as Arc<dyn SchemeSource>,
        target: Arc::clone(&target) as Arc<dyn theme_core::ThemeTarget>,
    };
    let system = create_theme_system(ThemeConfig::default(), ports);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Light);

    scheme.set_prefers_dark(true);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Dark);
    assert_eq!(
        target.last_applied(),
        Some(("data-theme".to_string(), ResolvedTheme::Dark))
    );

    // Pinning a concrete theme detaches the state from the OS signal
    system.set_theme(ThemeMode::Light);
    scheme.set_prefers_dark(false);
    scheme.set_prefers_dark(true);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Light);

    // And returning to system picks the live reading back up
    system.set_theme(ThemeMode::System);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Dark);
}

#[test]
fn test_destroyed_system_releases_its_watcher() {
    let scheme = Arc::new(SimulatedScheme::new(false));
    let ports = ThemePorts {
        scheme: Arc::clone(&scheme) as Arc<dyn SchemeSource>,
        ..ThemePorts::default()
    };
    let system = create_theme_system(ThemeConfig::default(), ports);
    assert_eq!(scheme.active_watchers(), 1);

    system.destroy();
    assert_eq!(scheme.active_watchers(), 0);

    // Changes after destroy are dropped entirely
    scheme.set_prefers_dark(true);
    assert_eq!(system.resolved_theme(), ResolvedTheme::Light);
}

#[test]
fn test_clones_share_state_and_channels() {
    let system = ThemeSystem::new(
        ThemeConfig::default(),
        ThemePorts {
            scheme: Arc::new(UnavailableScheme),
            ..ThemePorts::default()
        },
    );
    let clone = system.clone();
    let mut events = clone.subscribe_events();
    let state = clone.watch();

    system.set_theme(ThemeMode::Dark);

    assert_eq!(clone.theme(), ThemeMode::Dark);
    let event = events.try_recv().unwrap();
    assert_eq!(event.resolved_theme, ResolvedTheme::Dark);
    assert_eq!(state.borrow().resolved, ResolvedTheme::Dark);
}

#[tokio::test]
async fn test_polling_scheme_registers_inside_runtime() {
    let scheme = PollingScheme::new();
    let handle = scheme.watch(Box::new(|_| {})).unwrap();
    handle.stop();
}
