//! Theme preference and resolved theme types

use serde::{Deserialize, Serialize};

/// User-facing theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Always use light mode
    Light,
    /// Always use dark mode
    Dark,
    /// Follow the operating system color scheme
    #[default]
    System,
}

impl ThemeMode {
    /// Get the lowercase name, as persisted and as used in events
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    /// Parse a persisted value
    ///
    /// Only the exact strings `light`, `dark`, and `system` are
    /// accepted; anything else (malformed or legacy data) is treated as
    /// no stored preference.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "system" => Some(ThemeMode::System),
            _ => None,
        }
    }

    /// Resolve this preference against an OS "prefers dark" reading
    ///
    /// `system` follows the reading, falling back to light when the
    /// preference is unknown. Concrete modes resolve to themselves.
    pub fn resolve(&self, prefers_dark: Option<bool>) -> ResolvedTheme {
        match self {
            ThemeMode::Light => ResolvedTheme::Light,
            ThemeMode::Dark => ResolvedTheme::Dark,
            ThemeMode::System => match prefers_dark {
                Some(true) => ResolvedTheme::Dark,
                Some(false) | None => ResolvedTheme::Light,
            },
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ThemeMode::from_stored(&s.to_lowercase()).ok_or_else(|| format!("Unknown theme mode: {}", s))
    }
}

/// The concrete theme actually applied
///
/// Always `light` or `dark`, never `system`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolvedTheme {
    /// Light theme
    #[default]
    Light,
    /// Dark theme
    Dark,
}

impl ResolvedTheme {
    /// Get the lowercase name, as applied to the render target
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolvedTheme::Light => "light",
            ResolvedTheme::Dark => "dark",
        }
    }

    /// The other concrete theme
    pub fn opposite(&self) -> ResolvedTheme {
        match self {
            ResolvedTheme::Light => ResolvedTheme::Dark,
            ResolvedTheme::Dark => ResolvedTheme::Light,
        }
    }

    /// Check if this is the dark theme
    pub fn is_dark(&self) -> bool {
        matches!(self, ResolvedTheme::Dark)
    }

    /// The preference pinning exactly this theme
    pub fn as_mode(&self) -> ThemeMode {
        match self {
            ResolvedTheme::Light => ThemeMode::Light,
            ResolvedTheme::Dark => ThemeMode::Dark,
        }
    }
}

impl std::fmt::Display for ResolvedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
