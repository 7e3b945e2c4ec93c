//! Theme system manager
//!
//! [`ThemeSystem`] owns the current theme preference, resolves `system`
//! against the OS color scheme, persists changes, applies them to the
//! render target, and notifies subscribers. External collaborators are
//! injected as ports ([`ThemeStore`], [`SchemeSource`], [`ThemeTarget`])
//! so every degradation path is an ordinary, testable state.
//!
//! # Example
//!
//! ```rust
//! use theme_core::{create_theme_system, ThemeConfig, ThemeMode, ThemePorts};
//!
//! let system = create_theme_system(ThemeConfig::default(), ThemePorts::default());
//! system.set_theme(ThemeMode::Dark);
//! assert!(system.resolved_theme().is_dark());
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch};

use theme_platform::{PollingScheme, SchemeSource, WatchHandle};
use theme_storage::{MemoryStore, ThemeStore};

use crate::config::ThemeConfig;
use crate::mode::{ResolvedTheme, ThemeMode};
use crate::target::{LogTarget, ThemeTarget};

/// Capacity of the change event channel
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Event broadcast on every theme change
///
/// The second notification channel, for consumers outside the
/// subscriber-callback API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeChanged {
    /// The new preference
    pub theme: ThemeMode,
    /// The new resolved theme
    pub resolved_theme: ResolvedTheme,
}

/// Snapshot of the current theme state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeSnapshot {
    /// Current preference
    pub theme: ThemeMode,
    /// Current resolved theme
    pub resolved: ResolvedTheme,
}

type SubscriberFn = Arc<dyn Fn(ThemeMode, ResolvedTheme) + Send + Sync>;

/// External capabilities the theme system runs against
pub struct ThemePorts {
    /// Preference persistence
    pub store: Arc<dyn ThemeStore>,
    /// OS color-scheme signal
    pub scheme: Arc<dyn SchemeSource>,
    /// Surface the resolved theme is applied to
    pub target: Arc<dyn ThemeTarget>,
}

impl Default for ThemePorts {
    fn default() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            scheme: Arc::new(PollingScheme::new()),
            target: Arc::new(LogTarget),
        }
    }
}

struct SystemInner {
    config: ThemeConfig,
    state: RwLock<ThemeSnapshot>,
    subscribers: Mutex<Vec<(u64, SubscriberFn)>>,
    next_id: AtomicU64,
    events_tx: broadcast::Sender<ThemeChanged>,
    state_tx: watch::Sender<ThemeSnapshot>,
    store: Arc<dyn ThemeStore>,
    scheme: Arc<dyn SchemeSource>,
    target: Arc<dyn ThemeTarget>,
    watch_handle: Mutex<Option<WatchHandle>>,
    destroyed: AtomicBool,
}

impl SystemInner {
    /// Current OS reading, gated by `enable_system`
    fn prefers_dark(&self) -> Option<bool> {
        if self.config.enable_system {
            self.scheme.prefers_dark()
        } else {
            None
        }
    }

    fn apply(&self) {
        let resolved = self.state.read().resolved;
        if self.config.disable_transitions {
            self.target.suppress_transitions();
        }
        self.target.apply(&self.config.attribute, resolved);
        tracing::debug!("Theme applied: {}", resolved);
    }

    fn persist(&self, mode: ThemeMode) {
        if let Err(err) = self.store.save(&self.config.storage_key, mode.as_str()) {
            tracing::warn!("Failed to save theme preference: {}", err);
        }
    }

    /// Notify callback subscribers from a snapshot of the registry
    ///
    /// The lock is released before any callback runs, so callbacks may
    /// subscribe or unsubscribe freely. A callback removed mid-pass
    /// still receives the in-flight notification.
    fn notify(&self) {
        let ThemeSnapshot { theme, resolved } = *self.state.read();
        let subscribers: Vec<SubscriberFn> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in subscribers {
            if catch_unwind(AssertUnwindSafe(|| callback(theme, resolved))).is_err() {
                tracing::error!("Theme subscriber panicked");
            }
        }
    }

    fn publish(&self) {
        let snapshot = *self.state.read();
        let _ = self.events_tx.send(ThemeChanged {
            theme: snapshot.theme,
            resolved_theme: snapshot.resolved,
        });
        self.state_tx.send_replace(snapshot);
    }

    fn set_theme(&self, mode: ThemeMode) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        {
            let mut state = self.state.write();
            state.theme = mode;
            state.resolved = mode.resolve(self.prefers_dark());
        }

        self.persist(mode);
        self.apply();
        self.notify();
        self.publish();
    }

    /// Handle an OS preference change; only meaningful in `system` mode
    fn on_scheme_change(&self, prefers_dark: bool) {
        if self.destroyed.load(Ordering::SeqCst) {
            return;
        }

        {
            let mut state = self.state.write();
            if state.theme != ThemeMode::System {
                return;
            }
            state.resolved = ThemeMode::System.resolve(Some(prefers_dark));
        }

        self.apply();
        self.notify();
        self.publish();
    }

    fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        // Dropping the handle detaches the OS watcher
        self.watch_handle.lock().take();
        self.subscribers.lock().clear();
    }
}

/// Handle removing a registered subscriber callback
///
/// Unsubscribing more than once is a no-op. Dropping the handle does
/// not unsubscribe; the callback stays registered until explicitly
/// removed or the system is destroyed.
pub struct Subscription {
    id: u64,
    inner: Weak<SystemInner>,
}

impl Subscription {
    /// Remove exactly the callback this subscription registered
    pub fn unsubscribe(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.subscribers.lock().retain(|(id, _)| *id != self.id);
        }
    }
}

/// Light/dark/system theme manager
///
/// Cloning is cheap and clones share state, like the other stateful
/// managers in this workspace.
#[derive(Clone)]
pub struct ThemeSystem {
    inner: Arc<SystemInner>,
}

impl ThemeSystem {
    /// Create a theme system
    ///
    /// Reads any stored preference (invalid values are treated as
    /// absent), resolves it, registers an OS preference watcher when
    /// `enable_system` is set, and applies the resolved theme to the
    /// target. Watcher registration failure is non-fatal: `system`
    /// simply always resolves to light.
    pub fn new(config: ThemeConfig, ports: ThemePorts) -> Self {
        let config = config.sanitized();
        let ThemePorts { store, scheme, target } = ports;

        let stored = match store.load(&config.storage_key) {
            Ok(value) => value.and_then(|raw| ThemeMode::from_stored(&raw)),
            Err(err) => {
                tracing::warn!("Failed to read stored theme preference: {}", err);
                None
            }
        };

        let theme = stored.unwrap_or(config.default_mode);
        let prefers_dark = if config.enable_system { scheme.prefers_dark() } else { None };
        let snapshot = ThemeSnapshot { theme, resolved: theme.resolve(prefers_dark) };

        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (state_tx, _) = watch::channel(snapshot);

        let inner = Arc::new(SystemInner {
            config,
            state: RwLock::new(snapshot),
            subscribers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
            events_tx,
            state_tx,
            store,
            scheme,
            target,
            watch_handle: Mutex::new(None),
            destroyed: AtomicBool::new(false),
        });

        if inner.config.enable_system {
            let weak = Arc::downgrade(&inner);
            match inner.scheme.watch(Box::new(move |prefers_dark| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_scheme_change(prefers_dark);
                }
            })) {
                Ok(handle) => *inner.watch_handle.lock() = Some(handle),
                Err(err) => {
                    tracing::warn!("System preference watching unavailable: {}", err);
                }
            }
        }

        inner.apply();

        Self { inner }
    }

    /// The current theme preference
    pub fn theme(&self) -> ThemeMode {
        self.inner.state.read().theme
    }

    /// The current resolved theme
    pub fn resolved_theme(&self) -> ResolvedTheme {
        self.inner.state.read().resolved
    }

    /// Set the theme preference
    ///
    /// In order: updates the preference, recomputes the resolved theme,
    /// persists (best-effort), applies to the target, notifies
    /// subscribers, and broadcasts a [`ThemeChanged`] event. Never
    /// surfaces an error; a no-op after [`ThemeSystem::destroy`].
    pub fn set_theme(&self, mode: ThemeMode) {
        self.inner.set_theme(mode);
    }

    /// Flip between light and dark
    ///
    /// Toggles the current *resolved* theme, so toggling while in
    /// `system` mode pins the opposite concrete theme and never lands
    /// back on `system`.
    pub fn toggle_theme(&self) {
        let next = self.resolved_theme().opposite().as_mode();
        self.set_theme(next);
    }

    /// Register a change callback
    ///
    /// The callback receives `(theme, resolved_theme)` on every change
    /// until the returned [`Subscription`] is unsubscribed or the
    /// system is destroyed.
    pub fn subscribe(
        &self,
        callback: impl Fn(ThemeMode, ResolvedTheme) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.subscribers.lock().push((id, Arc::new(callback)));

        Subscription { id, inner: Arc::downgrade(&self.inner) }
    }

    /// Subscribe to the broadcast event channel
    pub fn subscribe_events(&self) -> broadcast::Receiver<ThemeChanged> {
        self.inner.events_tx.subscribe()
    }

    /// Watch the theme state, for UI-framework bridges
    ///
    /// The receiver always holds the latest [`ThemeSnapshot`].
    pub fn watch(&self) -> watch::Receiver<ThemeSnapshot> {
        self.inner.state_tx.subscribe()
    }

    /// Clear the persisted preference (best-effort)
    ///
    /// The in-memory state is untouched; a freshly constructed system
    /// will fall back to its configured default.
    pub fn clear_stored(&self) {
        if let Err(err) = self.inner.store.remove(&self.inner.config.storage_key) {
            tracing::warn!("Failed to clear stored theme preference: {}", err);
        }
    }

    /// Detach the OS watcher and remove all subscribers
    ///
    /// Idempotent. After this, no further notifications are emitted
    /// and `set_theme` becomes a no-op.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    /// Whether [`ThemeSystem::destroy`] has run
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for ThemeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = *self.inner.state.read();
        f.debug_struct("ThemeSystem")
            .field("theme", &snapshot.theme)
            .field("resolved", &snapshot.resolved)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// Create a theme system
///
/// Convenience factory mirroring [`ThemeSystem::new`].
pub fn create_theme_system(config: ThemeConfig, ports: ThemePorts) -> ThemeSystem {
    ThemeSystem::new(config, ports)
}

/// The theme the operating system currently prefers
///
/// Standalone detection helper; falls back to light when the
/// preference cannot be determined on this host.
pub fn system_theme() -> ResolvedTheme {
    ThemeMode::System.resolve(theme_platform::detect_prefers_dark())
}
