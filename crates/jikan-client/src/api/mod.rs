//! Jikan API v4 client implementation.
//!
//! This module provides plain and retry-enabled access to the Jikan API
//! (MyAnimeList unofficial API).

pub mod client;
pub mod endpoint;
pub mod retry;
pub mod types;

pub use client::{decode, JikanClient};
pub use endpoint::Endpoint;
pub use retry::{retry_fixed, RetryPolicy};
pub use types::*;
