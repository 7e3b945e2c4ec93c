//! Core theme management
//!
//! Holds the light/dark/system preference model, configuration, the
//! render-target port, and the [`ThemeSystem`] manager that ties the
//! storage and platform crates together.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod mode;
pub mod system;
pub mod target;

pub use config::{ConfigError, ThemeConfig, DEFAULT_ATTRIBUTE, DEFAULT_STORAGE_KEY};
pub use mode::{ResolvedTheme, ThemeMode};
pub use system::{
    create_theme_system, system_theme, Subscription, ThemeChanged, ThemePorts, ThemeSnapshot,
    ThemeSystem,
};
pub use target::{LogTarget, RecordingTarget, ThemeTarget};
