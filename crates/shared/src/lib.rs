//! Shared library for the anime catalog.
//!
//! This crate provides common functionality used by the client and the front end:
//! - Configuration management
//! - Logging infrastructure
//! - Persistent key-value storage

pub mod config;
pub mod logging;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use logging::LogConfig;
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
