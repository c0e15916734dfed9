//! Client library for the Jikan anime data API.
//!
//! Typed endpoints, a fixed-delay retrying request helper, a time-boxed
//! response cache and the cache-aware fetch used by the catalog pages.

pub mod api;
pub mod cache;
pub mod error;
pub mod fetch;

pub use api::{Endpoint, JikanClient, RetryPolicy};
pub use cache::{CacheStats, Clock, ManualClock, SystemClock, TtlCache};
pub use error::FetchError;
pub use fetch::CachedFetcher;
