//! Storage layer for theme-mode
//!
//! This crate provides the persistence port for theme preferences
//! and its backing implementations: an on-disk sled store, an
//! in-memory store, and an always-unavailable store for degraded
//! environments.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod store;

pub use kv::{KvConfig, SledStore};
pub use store::{MemoryStore, Result, StoreError, ThemeStore, UnavailableStore};
