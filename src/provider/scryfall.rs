//! Scryfall HTTP client with batching, rate limiting and a TTL cache.
//!
//! Single cards are fetched from `/cards/named`, printings in bulk from
//! `/cards/collection` in chunks of at most 75 identifiers. Every request is
//! followed by a fixed delay. Successful lookups are cached per lookup key
//! and can be persisted to `scryfall_cache.json` in the cache directory.

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::{BatchLookup, CardDataProvider};
use crate::cache::{self, Clock, SystemClock, TtlCache};
use crate::config;
use crate::error::Result;
use crate::models::{CardDetails, CardIdentity};

pub fn name_cache_key(name: &str) -> String {
    format!("named:{name}")
}

pub fn identity_cache_key(identity: &CardIdentity) -> String {
    format!("id:{identity}")
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct CollectionIdentifier<'a> {
    set: String,
    collector_number: &'a str,
}

#[derive(Debug, Serialize)]
struct CollectionRequest<'a> {
    identifiers: Vec<CollectionIdentifier<'a>>,
}

/// Body of a `/cards/collection` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionResponse {
    #[serde(default)]
    pub data: Vec<CardDetails>,
    #[serde(default)]
    pub not_found: Vec<serde_json::Value>,
}

/// Match returned cards back to the requested identities by set and
/// collector number. Requested identities with no matching card are missing.
pub fn match_collection(requested: &[CardIdentity], response: CollectionResponse) -> BatchLookup {
    let mut lookup = BatchLookup::default();
    let cards: Vec<CardDetails> = response
        .data
        .into_iter()
        .map(CardDetails::normalized)
        .collect();

    for identity in requested {
        match cards
            .iter()
            .find(|c| identity.same_printing(&c.set, &c.collector_number))
        {
            Some(card) => {
                lookup.found.insert(identity.clone(), card.clone());
            }
            None => lookup.missing.push(identity.to_string()),
        }
    }
    lookup
}

// ---------------------------------------------------------------------------
// ScryfallClientBuilder
// ---------------------------------------------------------------------------

/// Builder for a [`ScryfallClient`].
pub struct ScryfallClientBuilder {
    base_url: String,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    rate_limit: Duration,
    batch_size: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Default for ScryfallClientBuilder {
    fn default() -> Self {
        Self {
            base_url: config::SCRYFALL_API_BASE.to_string(),
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(30),
            rate_limit: config::SCRYFALL_RATE_LIMIT_DELAY,
            batch_size: config::SCRYFALL_BATCH_SIZE,
            ttl: config::CACHE_TTL,
            clock: Arc::new(SystemClock),
        }
    }
}

impl ScryfallClientBuilder {
    /// Override the API root (useful for a local mirror).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Directory holding the persisted cache. Defaults to the platform cache
    /// directory (e.g. `~/.cache/autodeck` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, lookups are answered from the cache only.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Delay after each request. Defaults to 100ms.
    pub fn rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit = delay;
        self
    }

    /// Identifiers per collection request, clamped to `1..=75`.
    pub fn batch_size(mut self, size: usize) -> Self {
        self.batch_size = size.clamp(1, config::SCRYFALL_BATCH_SIZE);
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create the cache directory and restore any persisted cache.
    pub fn build(self) -> Result<ScryfallClient> {
        let dir = self.cache_dir.unwrap_or_else(config::default_cache_dir);
        fs::create_dir_all(&dir)?;
        let cache_file = dir.join(config::CACHE_FILE_NAME);
        let cache = TtlCache::load(&cache_file, self.ttl, self.clock)?;
        Ok(ScryfallClient {
            base_url: self.base_url,
            cache_dir: dir,
            offline: self.offline,
            timeout: self.timeout,
            rate_limit: self.rate_limit,
            batch_size: self.batch_size,
            client: RefCell::new(None),
            cache: RefCell::new(cache),
        })
    }
}

// ---------------------------------------------------------------------------
// ScryfallClient
// ---------------------------------------------------------------------------

pub struct ScryfallClient {
    base_url: String,
    /// Directory where the cache file lives.
    pub cache_dir: PathBuf,
    /// If true, never contact the API.
    pub offline: bool,
    timeout: Duration,
    rate_limit: Duration,
    batch_size: usize,
    client: RefCell<Option<Client>>,
    cache: RefCell<TtlCache<CardDetails>>,
}

impl ScryfallClient {
    pub fn builder() -> ScryfallClientBuilder {
        ScryfallClientBuilder::default()
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir.join(config::CACHE_FILE_NAME)
    }

    /// Number of cached lookups.
    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Lazy HTTP client, created on first use.
    fn http(&self) -> Result<Client> {
        let mut slot = self.client.borrow_mut();
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("autodeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        *slot = Some(client.clone());
        Ok(client)
    }

    fn fetch_named(&self, name: &str) -> Result<Option<CardDetails>> {
        let client = self.http()?;
        let url = format!("{}/cards/named", self.base_url);
        log::debug!("GET {} exact={}", url, name);
        let result = client.get(&url).query(&[("exact", name)]).send();
        thread::sleep(self.rate_limit);

        let resp = result?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let card: CardDetails = resp.error_for_status()?.json()?;
        Ok(Some(card.normalized()))
    }

    fn fetch_collection(
        &self,
        client: &Client,
        batch: &[CardIdentity],
    ) -> Result<CollectionResponse> {
        let url = format!("{}/cards/collection", self.base_url);
        let body = CollectionRequest {
            identifiers: batch
                .iter()
                .map(|id| CollectionIdentifier {
                    set: id.set.to_lowercase(),
                    collector_number: &id.collector_number,
                })
                .collect(),
        };
        log::debug!("POST {} ({} identifiers)", url, batch.len());
        let resp = client.post(&url).json(&body).send()?.error_for_status()?;
        Ok(resp.json()?)
    }

    /// Persist live cache entries to the cache file.
    pub fn save_cache(&self) -> Result<()> {
        self.cache.borrow_mut().save(&self.cache_file())
    }

    /// Empty the in-memory cache and delete the cache file. Returns `true`
    /// if a file was deleted.
    pub fn clear_cache(&self) -> Result<bool> {
        self.cache.borrow_mut().clear();
        cache::remove_cache_file(&self.cache_file())
    }
}

impl CardDataProvider for ScryfallClient {
    fn card_by_name(&self, name: &str) -> Result<Option<CardDetails>> {
        let key = name_cache_key(name);
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(Some(hit));
        }
        if self.offline {
            return Ok(None);
        }
        let card = self.fetch_named(name)?;
        if let Some(ref details) = card {
            self.cache.borrow_mut().insert(key, details.clone());
        }
        Ok(card)
    }

    fn cards_by_identity(&self, identities: &[CardIdentity]) -> BatchLookup {
        let mut lookup = BatchLookup::default();
        let mut pending: Vec<CardIdentity> = Vec::new();

        {
            let cache = self.cache.borrow();
            for identity in identities {
                match cache.get(&identity_cache_key(identity)) {
                    Some(details) => {
                        lookup.found.insert(identity.clone(), details);
                    }
                    None => pending.push(identity.clone()),
                }
            }
        }
        log::debug!(
            "{} identities cached, {} to fetch",
            lookup.found.len(),
            pending.len()
        );

        if pending.is_empty() {
            return lookup;
        }
        if self.offline {
            lookup.missing.extend(pending.iter().map(CardIdentity::to_string));
            return lookup;
        }

        let client = match self.http() {
            Ok(client) => client,
            Err(e) => {
                log::warn!("Could not create HTTP client: {}", e);
                lookup.missing.extend(pending.iter().map(CardIdentity::to_string));
                return lookup;
            }
        };

        for batch in pending.chunks(self.batch_size) {
            match self.fetch_collection(&client, batch) {
                Ok(response) => {
                    let resolved = match_collection(batch, response);
                    let mut cache = self.cache.borrow_mut();
                    for (identity, details) in &resolved.found {
                        cache.insert(identity_cache_key(identity), details.clone());
                    }
                    lookup.found.extend(resolved.found);
                    lookup.missing.extend(resolved.missing);
                }
                Err(e) => {
                    log::warn!("Collection request failed for {} cards: {}", batch.len(), e);
                    lookup.missing.extend(batch.iter().map(CardIdentity::to_string));
                }
            }
            thread::sleep(self.rate_limit);
        }

        lookup
    }
}
