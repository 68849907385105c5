//! Time-bounded lookup cache with JSON persistence.
//!
//! Entries expire a fixed TTL after insertion. Time comes from a pluggable
//! [`Clock`] so expiry can be driven by tests. The cache can be saved to and
//! restored from a JSON file; a corrupt file is deleted on load so the next
//! save starts clean.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::Result;

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

fn unix_secs(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// TtlCache
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry<V> {
    value: V,
    /// Unix seconds after which the entry is stale.
    expires_at: u64,
}

/// Key → (value, expiry) map.
pub struct TtlCache<V> {
    entries: HashMap<String, CacheEntry<V>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Serialize + DeserializeOwned> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    fn now_secs(&self) -> u64 {
        unix_secs(self.clock.now())
    }

    /// Return a fresh value for `key`, or `None` if absent or expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.now_secs();
        self.entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let expires_at = self.now_secs().saturating_add(self.ttl.as_secs());
        self.entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = self.now_secs();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        before - self.entries.len()
    }

    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write live entries to `path` as JSON, creating parent directories.
    ///
    /// Writes to a temp file first and renames on success, so an interrupted
    /// write never leaves a truncated cache behind.
    pub fn save(&mut self, path: &Path) -> Result<()> {
        self.purge_expired();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        let result = (|| -> Result<()> {
            let json = serde_json::to_string(&self.entries)?;
            fs::write(&tmp, json)?;
            fs::rename(&tmp, path)?;
            Ok(())
        })();
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result
    }

    /// Restore a cache from `path`. A missing file yields an empty cache; a
    /// corrupt file is removed and also yields an empty cache.
    pub fn load(path: &Path, ttl: Duration, clock: Arc<dyn Clock>) -> Result<Self> {
        let mut cache = Self::with_clock(ttl, clock);
        if !path.exists() {
            return Ok(cache);
        }
        let contents = fs::read_to_string(path)?;
        match serde_json::from_str::<HashMap<String, CacheEntry<V>>>(&contents) {
            Ok(entries) => {
                cache.entries = entries;
                let dropped = cache.purge_expired();
                log::debug!(
                    "Loaded {} cache entries from {} ({} expired)",
                    cache.entries.len(),
                    path.display(),
                    dropped
                );
            }
            Err(e) => {
                log::warn!("Corrupt cache file {}: {} -- removing", path.display(), e);
                fs::remove_file(path)?;
            }
        }
        Ok(cache)
    }
}

/// Delete a persisted cache file. Returns `true` if a file was removed.
pub fn remove_cache_file(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}
