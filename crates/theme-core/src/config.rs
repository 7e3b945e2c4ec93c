//! Theme system configuration

use thiserror::Error;

use crate::mode::ThemeMode;

/// Default persistence key
pub const DEFAULT_STORAGE_KEY: &str = "theme-mode";

/// Default render-target attribute name
pub const DEFAULT_ATTRIBUTE: &str = "data-theme";

/// Configuration error types
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The storage key is empty
    #[error("Storage key must not be empty")]
    EmptyStorageKey,

    /// The target attribute name is empty
    #[error("Attribute name must not be empty")]
    EmptyAttribute,
}

/// Immutable configuration fixed at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    /// Initial theme when none is stored
    pub default_mode: ThemeMode,
    /// Persistence key
    pub storage_key: String,
    /// Attribute name set on the render target
    pub attribute: String,
    /// Whether to watch the OS color-scheme preference
    pub enable_system: bool,
    /// Whether to suppress transitions while applying a change
    pub disable_transitions: bool,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            default_mode: ThemeMode::System,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            enable_system: true,
            disable_transitions: false,
        }
    }
}

impl ThemeConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initial theme used when none is stored
    pub fn default_mode(mut self, mode: ThemeMode) -> Self {
        self.default_mode = mode;
        self
    }

    /// Set the persistence key
    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the render-target attribute name
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = attribute.into();
        self
    }

    /// Enable or disable OS preference watching
    pub fn enable_system(mut self, enabled: bool) -> Self {
        self.enable_system = enabled;
        self
    }

    /// Enable or disable transition suppression during changes
    pub fn disable_transitions(mut self, disabled: bool) -> Self {
        self.disable_transitions = disabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.attribute.is_empty() {
            return Err(ConfigError::EmptyAttribute);
        }
        Ok(())
    }

    /// Return a copy with invalid fields replaced by their defaults
    ///
    /// Construction never fails over configuration; bad fields are
    /// logged and fall back.
    pub fn sanitized(mut self) -> Self {
        if self.storage_key.is_empty() {
            tracing::warn!("Empty storage key, falling back to {:?}", DEFAULT_STORAGE_KEY);
            self.storage_key = DEFAULT_STORAGE_KEY.to_string();
        }
        if self.attribute.is_empty() {
            tracing::warn!("Empty attribute name, falling back to {:?}", DEFAULT_ATTRIBUTE);
            self.attribute = DEFAULT_ATTRIBUTE.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ThemeConfig::default();
        assert_eq!(config.default_mode, ThemeMode::System);
        assert_eq!(config.storage_key, "theme-mode");
        assert_eq!(config.attribute, "data-theme");
        assert!(config.enable_system);
        assert!(!config.disable_transitions);
    }

    #[test]
    fn test_config_builder() {
        let config = ThemeConfig::new()
            .default_mode(ThemeMode::Dark)
            .storage_key("custom-theme")
            .attribute("data-color-mode")
            .enable_system(false)
            .disable_transitions(true);

        assert_eq!(config.default_mode, ThemeMode::Dark);
        assert_eq!(config.storage_key, "custom-theme");
        assert_eq!(config.attribute, "data-color-mode");
        assert!(!config.enable_system);
        assert!(config.disable_transitions);
    }

    #[test]
    fn test_config_validate() {
        assert_eq!(ThemeConfig::default().validate(), Ok(()));

        let config = ThemeConfig::new().storage_key("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyStorageKey));

        let config = ThemeConfig::new().attribute("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyAttribute));
    }

    #[test]
    fn test_config_sanitized() {
        let config = ThemeConfig::new()
            .storage_key("")
            .attribute("")
            .default_mode(ThemeMode::Light)
            .sanitized();

        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.attribute, DEFAULT_ATTRIBUTE);
        // Valid fields are untouched
        assert_eq!(config.default_mode, ThemeMode::Light);
    }
}
