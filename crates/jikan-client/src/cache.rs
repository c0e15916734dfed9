//! Time-boxed response cache.
//!
//! Entries are stored as `{ "data": <payload>, "timestamp": <epoch ms> }` in a
//! key-value store. An entry is valid while `now - timestamp <= ttl`; expired
//! or unreadable entries are evicted when read. There is no size bound and no
//! eviction besides the TTL.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::KeyValueStore;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Source of the current time in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Clock that only moves when told to
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: Value,
    timestamp: i64,
}

/// TTL cache over a key-value store
#[derive(Clone)]
pub struct TtlCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    enabled: bool,
}

impl TtlCache {
    /// Create a cache using the wall clock
    pub fn new(store: Arc<dyn KeyValueStore>, ttl: Duration, enabled: bool) -> Self {
        Self::with_clock(store, ttl, enabled, Arc::new(SystemClock))
    }

    /// Create a cache reading time from `clock`
    pub fn with_clock(
        store: Arc<dyn KeyValueStore>,
        ttl: Duration,
        enabled: bool,
        clock: Arc<dyn Clock>,
    ) -> Self {
        if enabled {
            info!(ttl_secs = ttl.as_secs(), "Cache initialized");
        }
        Self {
            store,
            clock,
            ttl,
            enabled,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Get a cached payload if present and not expired
    pub fn get_value(&self, key: &str) -> Result<Option<Value>> {
        if !self.enabled {
            return Ok(None);
        }

        let raw = match self.store.get_item(key)? {
            Some(raw) => raw,
            None => {
                debug!(key = key, "Cache miss");
                return Ok(None);
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = key, error = %e, "Discarding unreadable cache entry");
                self.store.remove_item(key)?;
                return Ok(None);
            }
        };

        let age_ms = self.clock.now_millis() - entry.timestamp;
        if age_ms > self.ttl.as_millis() as i64 {
            debug!(key = key, age_ms, "Cache entry expired");
            self.store.remove_item(key)?;
            return Ok(None);
        }

        debug!(key = key, "Cache hit");
        Ok(Some(entry.data))
    }

    /// Store an item stamped with the current time, replacing any prior entry
    pub fn set<T: Serialize>(&self, key: &str, data: &T) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = CacheEntry {
            data: serde_json::to_value(data).context("Failed to serialize cache data")?,
            timestamp: self.clock.now_millis(),
        };
        let content = serde_json::to_string(&entry).context("Failed to serialize cache entry")?;

        self.store
            .set_item(key, &content)
            .with_context(|| format!("Failed to store cache entry {}", key))?;

        debug!(key = key, "Cache stored");
        Ok(())
    }

    /// Remove one entry regardless of age
    pub fn clear(&self, key: &str) -> Result<()> {
        self.store.remove_item(key)?;
        debug!(key = key, "Cache entry cleared");
        Ok(())
    }

    /// Remove every entry
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        info!("Cache cleared");
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats::default();
        let now = self.clock.now_millis();

        for key in self.store.keys()? {
            let Some(raw) = self.store.get_item(&key)? else {
                continue;
            };
            stats.total_entries += 1;
            stats.total_size_bytes += raw.len() as u64;

            let expired = serde_json::from_str::<CacheEntry>(&raw)
                .map(|entry| now - entry.timestamp > self.ttl.as_millis() as i64)
                .unwrap_or(true);
            if expired {
                stats.expired_entries += 1;
            }
        }

        Ok(stats)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub total_size_bytes: u64,
}
