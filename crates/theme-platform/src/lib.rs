//! Platform color-scheme detection for theme-mode
//!
//! This crate answers one question per platform: does the operating
//! system currently prefer a dark color scheme? It also provides the
//! [`SchemeSource`] port the theme system watches for changes.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod scheme;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

pub use scheme::{
    PollingScheme, Result, SchemeError, SchemeHandler, SchemeSource, SimulatedScheme,
    UnavailableScheme, WatchHandle, DEFAULT_POLL_INTERVAL,
};

/// Detect whether the operating system currently prefers a dark color scheme
///
/// Returns `None` when the preference cannot be determined on this host.
pub fn detect_prefers_dark() -> Option<bool> {
    #[cfg(target_os = "macos")]
    return macos::prefers_dark();

    #[cfg(target_os = "linux")]
    return linux::prefers_dark();

    #[cfg(target_os = "windows")]
    return windows::prefers_dark();

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    None
}
