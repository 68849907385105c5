//! Tests for the Scryfall client that need no network: response matching
//! and cache-only (offline) lookups.

mod common;

use autodeck::cache::TtlCache;
use autodeck::config::{CACHE_FILE_NAME, CACHE_TTL};
use autodeck::provider::scryfall::{
    identity_cache_key, match_collection, name_cache_key, CollectionResponse,
};
use autodeck::provider::summarize_missing;
use autodeck::{
    CardDataProvider, CardDetails, CardIdentity, DeckBuilder, DeckError, Inventory, NoProgress,
    Preferences, ScryfallClient,
};
use common::{card, ManualClock};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn sol_ring() -> CardDetails {
    let mut c = card("Sol Ring", "Artifact", "", "{1}", "{T}: Add {C}{C}.", 259);
    c.set = "c13".to_string();
    c
}

// ---------------------------------------------------------------------------
// match_collection
// ---------------------------------------------------------------------------

#[test]
fn collection_cards_match_by_set_and_number() {
    let requested = vec![
        CardIdentity::new("Sol Ring", "C13", "259"),
        CardIdentity::new("Arcane Signet", "M3C", "283"),
    ];
    let response = CollectionResponse {
        data: vec![sol_ring()],
        not_found: vec![serde_json::json!({"set": "m3c", "collector_number": "283"})],
    };
    let lookup = match_collection(&requested, response);
    assert_eq!(lookup.found.len(), 1);
    assert_eq!(lookup.found[&requested[0]].name, "Sol Ring");
    assert_eq!(lookup.missing, vec!["Arcane Signet (M3C) 283".to_string()]);
}

#[test]
fn two_faced_card_keys_by_requested_identity() {
    let requested = vec![CardIdentity::new("Delver of Secrets", "ISD", "51")];
    let json = r#"{
        "object": "list",
        "not_found": [],
        "data": [{
            "name": "Delver of Secrets // Insectile Aberration",
            "type_line": "Creature — Human Wizard // Creature — Human Insect",
            "color_identity": ["U"],
            "set": "isd",
            "collector_number": "51",
            "card_faces": [
                {"name": "Delver of Secrets", "mana_cost": "{U}", "oracle_text": "Look at the top card of your library."},
                {"name": "Insectile Aberration", "oracle_text": "Flying"}
            ]
        }]
    }"#;
    let response: CollectionResponse = serde_json::from_str(json).unwrap();
    let lookup = match_collection(&requested, response);
    let details = &lookup.found[&requested[0]];
    assert_eq!(details.mana_cost(), "{U}");
    assert!(details.oracle_text().contains("Flying"));
    assert!(lookup.missing.is_empty());
}

#[test]
fn missing_summary_lists_at_most_five() {
    let missing: Vec<String> = (1..=7).map(|i| format!("Card {i} (TST) {i}")).collect();
    let summary = summarize_missing(&missing).unwrap();
    assert!(summary.starts_with("7 card(s)"));
    assert!(summary.contains("Card 5 (TST) 5"));
    assert!(!summary.contains("Card 6"));
    assert!(summary.ends_with("..."));
    assert!(summarize_missing(&[]).is_none());
}

// ---------------------------------------------------------------------------
// Offline client with a seeded cache
// ---------------------------------------------------------------------------

fn seed_cache(dir: &Path, clock: Arc<ManualClock>) {
    let mut cache: TtlCache<CardDetails> = TtlCache::with_clock(CACHE_TTL, clock);
    let ring = sol_ring();
    cache.insert(name_cache_key("Sol Ring"), ring.clone());
    cache.insert(
        identity_cache_key(&CardIdentity::new("Sol Ring", "C13", "259")),
        ring,
    );
    cache.save(&dir.join(CACHE_FILE_NAME)).unwrap();
}

fn offline_client(dir: &Path, clock: Arc<ManualClock>) -> ScryfallClient {
    ScryfallClient::builder()
        .cache_dir(dir)
        .offline(true)
        .rate_limit(Duration::ZERO)
        .clock(clock)
        .build()
        .unwrap()
}

#[test]
fn offline_name_lookup_uses_cache() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    seed_cache(dir.path(), clock.clone());
    let client = offline_client(dir.path(), clock);

    assert_eq!(client.cached_entries(), 2);
    let ring = client.card_by_name("Sol Ring").unwrap().unwrap();
    assert_eq!(ring.name, "Sol Ring");
    assert!(client.card_by_name("Mana Crypt").unwrap().is_none());
}

#[test]
fn offline_batch_reports_uncached_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    seed_cache(dir.path(), clock.clone());
    let client = offline_client(dir.path(), clock);

    let ids = vec![
        CardIdentity::new("Sol Ring", "C13", "259"),
        CardIdentity::new("Mana Crypt", "2XM", "270"),
    ];
    let lookup = client.cards_by_identity(&ids);
    assert!(lookup.found.contains_key(&ids[0]));
    assert_eq!(lookup.missing, vec!["Mana Crypt (2XM) 270".to_string()]);
}

#[test]
fn expired_cache_entries_do_not_resolve() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    seed_cache(dir.path(), clock.clone());
    clock.advance(CACHE_TTL + Duration::from_secs(1));
    let client = offline_client(dir.path(), clock);

    assert_eq!(client.cached_entries(), 0);
    assert!(client.card_by_name("Sol Ring").unwrap().is_none());
}

#[test]
fn clear_cache_deletes_file() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new());
    seed_cache(dir.path(), clock.clone());
    let client = offline_client(dir.path(), clock);

    assert!(client.cache_file().exists());
    assert!(client.clear_cache().unwrap());
    assert!(!client.cache_file().exists());
    assert_eq!(client.cached_entries(), 0);
    assert!(!client.clear_cache().unwrap());
}

#[test]
fn save_cache_writes_file_in_cache_dir() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = dir.path().join("autodeck");
    let client = offline_client(&cache_dir, Arc::new(ManualClock::new()));
    assert!(cache_dir.is_dir());
    client.save_cache().unwrap();
    assert!(cache_dir.join(CACHE_FILE_NAME).exists());
}

#[test]
fn corrupt_cache_file_is_discarded_on_build() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(CACHE_FILE_NAME), "not json at all").unwrap();
    let client = offline_client(dir.path(), Arc::new(ManualClock::new()));
    assert_eq!(client.cached_entries(), 0);
    assert!(!client.cache_file().exists());
}

// ---------------------------------------------------------------------------
// Unreachable server
// ---------------------------------------------------------------------------

fn unreachable_client(dir: &Path) -> ScryfallClient {
    ScryfallClient::builder()
        .cache_dir(dir)
        .base_url("http://127.0.0.1:1")
        .rate_limit(Duration::ZERO)
        .batch_size(2)
        .build()
        .unwrap()
}

#[test]
fn failed_batches_mark_every_card_missing() {
    let dir = tempfile::tempdir().unwrap();
    let client = unreachable_client(dir.path());
    let ids: Vec<CardIdentity> = (1..=5)
        .map(|i| CardIdentity::new(format!("C{i}"), "TST", i.to_string()))
        .collect();

    let lookup = client.cards_by_identity(&ids);
    assert!(lookup.found.is_empty());
    let expected: Vec<String> = (1..=5).map(|i| format!("C{i} (TST) {i}")).collect();
    assert_eq!(lookup.missing, expected);
    assert_eq!(client.cached_entries(), 0);
}

#[test]
fn failed_name_lookup_is_an_error_and_stops_the_build() {
    let dir = tempfile::tempdir().unwrap();
    let client = unreachable_client(dir.path());
    assert!(client.card_by_name("Sol Ring").is_err());

    let mut rng = StdRng::seed_from_u64(0);
    let result = DeckBuilder::new(&client).build(
        "Sol Ring",
        &Inventory::new(),
        &Preferences::default(),
        &mut rng,
        &mut NoProgress,
    );
    assert!(matches!(result, Err(DeckError::NotFound(_))));
}
