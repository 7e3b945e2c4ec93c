//! Render target port
//!
//! Applying a theme is modeled as a capability: the theme system
//! pushes the resolved theme, under a configurable attribute name, to
//! whatever surface the host renders.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::mode::ResolvedTheme;

/// Surface the resolved theme is applied to
pub trait ThemeTarget: Send + Sync {
    /// Apply the resolved theme under the configured attribute name
    fn apply(&self, attribute: &str, resolved: ResolvedTheme);

    /// Briefly suppress transition animations around a change
    ///
    /// Cosmetic hook; the default does nothing.
    fn suppress_transitions(&self) {}
}

/// Target that only logs applications
///
/// The default for headless hosts and tools that consume theme state
/// exclusively through subscriptions.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTarget;

impl ThemeTarget for LogTarget {
    fn apply(&self, attribute: &str, resolved: ResolvedTheme) {
        tracing::debug!("Applied theme {}={}", attribute, resolved);
    }
}

/// Target recording every application, for tests and inspection
#[derive(Debug, Default)]
pub struct RecordingTarget {
    applied: Mutex<Vec<(String, ResolvedTheme)>>,
    suppressed: AtomicUsize,
}

impl RecordingTarget {
    /// Create an empty recording target
    pub fn new() -> Self {
        Self::default()
    }

    /// All applications in order
    pub fn applied(&self) -> Vec<(String, ResolvedTheme)> {
        self.applied.lock().clone()
    }

    /// The most recent application, if any
    pub fn last_applied(&self) -> Option<(String, ResolvedTheme)> {
        self.applied.lock().last().cloned()
    }

    /// How many times transition suppression was requested
    pub fn suppress_count(&self) -> usize {
        self.suppressed.load(Ordering::SeqCst)
    }
}

impl ThemeTarget for RecordingTarget {
    fn apply(&self, attribute: &str, resolved: ResolvedTheme) {
        self.applied.lock().push((attribute.to_string(), resolved));
    }

    fn suppress_transitions(&self) {
        self.suppressed.fetch_add(1, Ordering::SeqCst);
    }
}
