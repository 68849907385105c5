//! Tests for the TTL cache and its JSON persistence.

mod common;

use autodeck::cache::{remove_cache_file, TtlCache};
use common::ManualClock;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

fn cache_with_clock() -> (TtlCache<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    (TtlCache::with_clock(DAY, clock.clone()), clock)
}

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

#[test]
fn fresh_entry_is_returned() {
    let (mut cache, _clock) = cache_with_clock();
    cache.insert("named:Sol Ring", "artifact".to_string());
    assert_eq!(cache.get("named:Sol Ring").as_deref(), Some("artifact"));
    assert_eq!(cache.get("named:Mana Crypt"), None);
}

#[test]
fn entry_expires_after_ttl() {
    let (mut cache, clock) = cache_with_clock();
    cache.insert("k", "v".to_string());
    clock.advance(DAY - Duration::from_secs(1));
    assert!(cache.get("k").is_some());
    clock.advance(Duration::from_secs(1));
    assert!(cache.get("k").is_none());
}

#[test]
fn purge_removes_only_expired() {
    let (mut cache, clock) = cache_with_clock();
    cache.insert("old", "1".to_string());
    clock.advance(Duration::from_secs(60 * 60));
    cache.insert("new", "2".to_string());
    clock.advance(DAY - Duration::from_secs(60));
    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
    assert!(cache.get("new").is_some());
}

#[test]
fn reinsert_refreshes_expiry() {
    let (mut cache, clock) = cache_with_clock();
    cache.insert("k", "v1".to_string());
    clock.advance(DAY / 2);
    cache.insert("k", "v2".to_string());
    clock.advance(DAY / 2 + Duration::from_secs(10));
    assert_eq!(cache.get("k").as_deref(), Some("v2"));
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let (mut cache, clock) = cache_with_clock();
    cache.insert("a", "alpha".to_string());
    cache.insert("b", "beta".to_string());
    cache.save(&path).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());

    let loaded: TtlCache<String> = TtlCache::load(&path, DAY, clock).unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get("b").as_deref(), Some("beta"));
}

#[test]
fn save_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("cache.json");
    let (mut cache, _clock) = cache_with_clock();
    cache.insert("a", "alpha".to_string());
    cache.save(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn expired_entries_are_dropped_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    let (mut cache, clock) = cache_with_clock();
    cache.insert("a", "alpha".to_string());
    cache.save(&path).unwrap();

    clock.advance(DAY * 2);
    let loaded: TtlCache<String> = TtlCache::load(&path, DAY, clock).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    let loaded: TtlCache<String> =
        TtlCache::load(&dir.path().join("absent.json"), DAY, clock).unwrap();
    assert!(loaded.is_empty());
}

#[test]
fn corrupt_file_is_removed_and_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    fs::write(&path, "{ this is not json").unwrap();
    let clock = Arc::new(ManualClock::new());
    let loaded: TtlCache<String> = TtlCache::load(&path, DAY, clock).unwrap();
    assert!(loaded.is_empty());
    assert!(!path.exists());
}

#[test]
fn remove_cache_file_reports_whether_it_existed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.json");
    assert!(!remove_cache_file(&path).unwrap());
    fs::write(&path, "{}").unwrap();
    assert!(remove_cache_file(&path).unwrap());
    assert!(!path.exists());
}
