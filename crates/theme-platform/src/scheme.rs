//! Operating-system color-scheme source
//!
//! The theme system consumes the OS preference through the
//! [`SchemeSource`] port: a boolean signal ("does the user prefer
//! dark") plus change notifications. An unavailable source is an
//! ordinary state; the consumer degrades to resolving `system` as
//! light.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

/// Default polling interval for scheme change detection (5 seconds)
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Scheme source error types
#[derive(Debug, Error)]
pub enum SchemeError {
    /// The preference cannot be watched on this host
    #[error("Scheme source unavailable: {0}")]
    Unavailable(String),
}

/// Result type for scheme operations
pub type Result<T> = std::result::Result<T, SchemeError>;

/// Change handler invoked with the new "prefers dark" value
pub type SchemeHandler = Box<dyn Fn(bool) + Send + Sync>;

/// A subscribable "prefers dark" signal
pub trait SchemeSource: Send + Sync {
    /// Current OS preference; `None` when it cannot be determined
    fn prefers_dark(&self) -> Option<bool>;

    /// Register a change handler, fired with the new value on every change
    ///
    /// The handler stays registered until the returned [`WatchHandle`]
    /// is stopped or dropped.
    fn watch(&self, handler: SchemeHandler) -> Result<WatchHandle>;
}

/// Handle detaching a registered change handler
///
/// When dropped, the handler is unregistered and any backing task is
/// stopped.
pub struct WatchHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl WatchHandle {
    /// Create a handle from a cancellation action
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Detach the handler manually
    pub fn stop(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHandle")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Source that never knows the OS preference
///
/// `prefers_dark` reports unknown and watching fails, which makes the
/// theme system resolve `system` to light and skip change handling.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableScheme;

impl SchemeSource for UnavailableScheme {
    fn prefers_dark(&self) -> Option<bool> {
        None
    }

    fn watch(&self, _handler: SchemeHandler) -> Result<WatchHandle> {
        Err(SchemeError::Unavailable(
            "scheme detection disabled".to_string(),
        ))
    }
}

#[derive(Default)]
struct SimulatedInner {
    prefers_dark: Mutex<Option<bool>>,
    handlers: Mutex<Vec<(u64, Arc<SchemeHandler>)>>,
    next_id: AtomicU64,
}

/// Hand-driven scheme source for tests and embedding hosts
///
/// The embedder reports OS preference changes through
/// [`SimulatedScheme::set_prefers_dark`], which fires all registered
/// handlers synchronously.
#[derive(Clone, Default)]
pub struct SimulatedScheme {
    inner: Arc<SimulatedInner>,
}

impl SimulatedScheme {
    /// Create a source with a known initial preference
    pub fn new(prefers_dark: bool) -> Self {
        let scheme = Self::default();
        *scheme.inner.prefers_dark.lock() = Some(prefers_dark);
        scheme
    }

    /// Create a source whose preference is unknown
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Report a preference change, firing all registered handlers
    pub fn set_prefers_dark(&self, dark: bool) {
        *self.inner.prefers_dark.lock() = Some(dark);

        // Snapshot the handler list so a handler may register or
        // detach watchers without deadlocking
        let handlers: Vec<Arc<SchemeHandler>> = self
            .inner
            .handlers
            .lock()
            .iter()
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in handlers {
            handler(dark);
        }
    }

    /// Number of currently registered change handlers
    pub fn active_watchers(&self) -> usize {
        self.inner.handlers.lock().len()
    }
}

impl SchemeSource for SimulatedScheme {
    fn prefers_dark(&self) -> Option<bool> {
        *self.inner.prefers_dark.lock()
    }

    fn watch(&self, handler: SchemeHandler) -> Result<WatchHandle> {
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
        self.inner.handlers.lock().push((id, Arc::new(handler)));

        let inner: Weak<SimulatedInner> = Arc::downgrade(&self.inner);
        Ok(WatchHandle::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner.handlers.lock().retain(|(hid, _)| *hid != id);
            }
        }))
    }
}

/// Scheme source polling the host's detected preference
///
/// [`SchemeSource::watch`] spawns a tokio task that re-detects the OS
/// preference on an interval and fires the handler when it flips.
/// Watching requires a tokio runtime; without one it reports
/// unavailable.
#[derive(Debug, Clone)]
pub struct PollingScheme {
    interval: Duration,
}

impl PollingScheme {
    /// Create a poller with the default interval
    pub fn new() -> Self {
        Self { interval: DEFAULT_POLL_INTERVAL }
    }

    /// Create a poller with a custom interval
    pub fn with_interval(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for PollingScheme {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeSource for PollingScheme {
    fn prefers_dark(&self) -> Option<bool> {
        crate::detect_prefers_dark()
    }

    fn watch(&self, handler: SchemeHandler) -> Result<WatchHandle> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| {
            SchemeError::Unavailable("no tokio runtime for scheme polling".to_string())
        })?;

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let interval = self.interval;

        let task = runtime.spawn(async move {
            let mut last = crate::detect_prefers_dark();
            let mut ticker = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let current = crate::detect_prefers_dark();
                        if current != last {
                            if let Some(dark) = current {
                                tracing::debug!("OS color scheme changed: prefers_dark={}", dark);
                                handler(dark);
                            }
                            last = current;
                        }
                    }
                    _ = &mut stop_rx => {
                        break;
                    }
                }
            }
        });

        Ok(WatchHandle::new(move || {
            let _ = stop_tx.send(());
            task.abort();
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_unavailable_scheme() {
        let scheme = UnavailableScheme;
        assert_eq!(scheme.prefers_dark(), None);
        assert!(scheme.watch(Box::new(|_| {})).is_err());
    }

    #[test]
    fn test_simulated_scheme_initial_value() {
        assert_eq!(SimulatedScheme::new(true).prefers_dark(), Some(true));
        assert_eq!(SimulatedScheme::new(false).prefers_dark(), Some(false));
        assert_eq!(SimulatedScheme::unknown().prefers_dark(), None);
    }

    #[test]
    fn test_simulated_scheme_fires_handlers() {
        let scheme = SimulatedScheme::new(false);
        let fired = Arc::new(Mutex::new(Vec::new()));

        let fired_clone = Arc::clone(&fired);
        let _handle = scheme
            .watch(Box::new(move |dark| fired_clone.lock().push(dark)))
            .unwrap();

        scheme.set_prefers_dark(true);
        scheme.set_prefers_dark(false);

        assert_eq!(*fired.lock(), vec![true, false]);
        assert_eq!(scheme.prefers_dark(), Some(false));
    }

    #[test]
    fn test_simulated_scheme_handle_detaches() {
        let scheme = SimulatedScheme::new(false);
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = Arc::clone(&count);
        let handle = scheme
            .watch(Box::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        assert_eq!(scheme.active_watchers(), 1);

        scheme.set_prefers_dark(true);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        handle.stop();
        assert_eq!(scheme.active_watchers(), 0);

        scheme.set_prefers_dark(false);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_simulated_scheme_handle_drop_detaches() {
        let scheme = SimulatedScheme::new(false);

        {
            let _handle = scheme.watch(Box::new(|_| {})).unwrap();
            assert_eq!(scheme.active_watchers(), 1);
        }

        assert_eq!(scheme.active_watchers(), 0);
    }

    #[test]
    fn test_polling_scheme_needs_runtime() {
        let scheme = PollingScheme::new();
        assert!(matches!(
            scheme.watch(Box::new(|_| {})),
            Err(SchemeError::Unavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_polling_scheme_watch_registers_inside_runtime() {
        let scheme = PollingScheme::with_interval(Duration::from_secs(3600));
        let handle = scheme.watch(Box::new(|_| {})).unwrap();
        handle.stop();
    }
}
