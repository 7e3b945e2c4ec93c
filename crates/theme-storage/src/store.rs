//! Persistence port for theme preferences
//!
//! The theme system reads and writes a single string value under a
//! configurable key. Storage is a capability: callers inject an
//! implementation, and an unavailable backend is an ordinary, testable
//! state rather than a panic.

use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;

/// Storage error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing storage cannot be reached
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored bytes are not valid UTF-8
    #[error("Corrupt value under key: {0}")]
    Corrupt(String),
}

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value persistence for a theme preference
///
/// Values are raw strings. Reading a key that was never written yields
/// `Ok(None)`; validation of the value is the caller's concern.
pub trait ThemeStore: Send + Sync {
    /// Read the value stored under `key`
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn save(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`, returning whether one existed
    fn remove(&self, key: &str) -> Result<bool>;
}

/// In-memory store
///
/// Backs tests and hosts without durable storage. Contents are lost
/// when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.lock().len()
    }

    /// Check whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.values.lock().is_empty()
    }
}

impl ThemeStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.values.lock().remove(key).is_some())
    }
}

/// Store that is permanently unavailable
///
/// Every operation fails with [`StoreError::Unavailable`]. The theme
/// system degrades to "no persistence" when handed one of these.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl ThemeStore for UnavailableStore {
    fn load(&self, _key: &str) -> Result<Option<String>> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<bool> {
        Err(StoreError::Unavailable("storage disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.is_empty());

        store.save("theme-mode", "dark").unwrap();
        assert_eq!(store.load("theme-mode").unwrap(), Some("dark".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.load("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.save("theme-mode", "light").unwrap();
        store.save("theme-mode", "dark").unwrap();
        assert_eq!(store.load("theme-mode").unwrap(), Some("dark".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_store_remove() {
        let store = MemoryStore::new();
        store.save("theme-mode", "dark").unwrap();

        assert!(store.remove("theme-mode").unwrap());
        assert_eq!(store.load("theme-mode").unwrap(), None);

        // Removing again reports nothing was there
        assert!(!store.remove("theme-mode").unwrap());
    }

    #[test]
    fn test_unavailable_store_fails_every_operation() {
        let store = UnavailableStore;

        assert!(matches!(store.load("k"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.save("k", "v"), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.remove("k"), Err(StoreError::Unavailable(_))));
    }
}
