//! Commander deck builder for Magic: The Gathering.
//!
//! Reads a personal card inventory, resolves authoritative card data from
//! Scryfall (cached locally with a 24 hour TTL), finds the legendary
//! creatures and planeswalkers that could lead a deck, and assembles a
//! 100-card singleton deck around the chosen commander.
//!
//! # Quick start
//!
//! ```no_run
//! use autodeck::{AutoDeck, Preferences};
//! use rand::thread_rng;
//!
//! let deck = AutoDeck::builder().build().unwrap();
//! let load = deck.load_inventory("inventory.txt").unwrap();
//!
//! let search = deck.commanders(&load.inventory, &Preferences::default());
//! if let Some(best) = search.candidates.first() {
//!     let built = deck
//!         .build_deck(&best.name, &load.inventory, &Preferences::default(), &mut thread_rng())
//!         .unwrap();
//!     println!("{}", built.export_text());
//! }
//! ```

pub mod builder;
pub mod cache;
pub mod classifier;
pub mod cli;
pub mod commanders;
pub mod config;
pub mod error;
pub mod inventory;
pub mod models;
pub mod progress;
pub mod provider;

pub use builder::DeckBuilder;
pub use classifier::{classify, Category, ClassifiedCard};
pub use commanders::{identify_commanders, CommanderSearch};
pub use config::DeckRules;
pub use error::{DeckError, Result};
pub use models::*;
pub use progress::{LogProgress, NoProgress, ProgressObserver};
pub use provider::{CardDataProvider, InMemoryProvider, ScryfallClient};

use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// AutoDeckBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AutoDeck`] instance.
///
/// By default card data comes from Scryfall. Pointing
/// [`card_data`](AutoDeckBuilder::card_data) at a JSON array of card objects
/// switches to a fully local [`InMemoryProvider`].
pub struct AutoDeckBuilder {
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    card_data: Option<PathBuf>,
    rules: DeckRules,
}

impl Default for AutoDeckBuilder {
    fn default() -> Self {
        Self {
            cache_dir: None,
            offline: false,
            timeout: Duration::from_secs(30),
            card_data: None,
            rules: DeckRules::default(),
        }
    }
}

impl AutoDeckBuilder {
    /// Set a custom cache directory.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/autodeck` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// When offline, Scryfall is never contacted and only cached lookups
    /// resolve. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read card data from a local JSON file instead of Scryfall.
    pub fn card_data<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.card_data = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn rules(mut self, rules: DeckRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn build(self) -> Result<AutoDeck> {
        let source = match self.card_data {
            Some(path) => {
                let provider = InMemoryProvider::from_json_file(&path)?;
                log::info!(
                    "Loaded {} cards from {}",
                    provider.len(),
                    path.display()
                );
                CardSource::Local { provider, path }
            }
            None => {
                let mut builder = ScryfallClient::builder()
                    .offline(self.offline)
                    .timeout(self.timeout);
                if let Some(dir) = self.cache_dir {
                    builder = builder.cache_dir(dir);
                }
                CardSource::Scryfall(builder.build()?)
            }
        };
        Ok(AutoDeck {
            source,
            rules: self.rules,
        })
    }
}

// ---------------------------------------------------------------------------
// AutoDeck
// ---------------------------------------------------------------------------

enum CardSource {
    Scryfall(ScryfallClient),
    Local {
        provider: InMemoryProvider,
        path: PathBuf,
    },
}

/// The main entry point: a card-data source plus deck rules.
///
/// Created via [`AutoDeck::builder()`].
pub struct AutoDeck {
    source: CardSource,
    rules: DeckRules,
}

impl AutoDeck {
    pub fn builder() -> AutoDeckBuilder {
        AutoDeckBuilder::default()
    }

    pub fn provider(&self) -> &dyn CardDataProvider {
        match &self.source {
            CardSource::Scryfall(client) => client,
            CardSource::Local { provider, .. } => provider,
        }
    }

    pub fn rules(&self) -> &DeckRules {
        &self.rules
    }

    /// Parse an inventory file. Malformed lines are returned as issues.
    pub fn load_inventory<P: AsRef<Path>>(&self, path: P) -> Result<InventoryLoad> {
        inventory::load_inventory(path)
    }

    /// Rank the commanders the inventory can field.
    pub fn commanders(&self, inventory: &Inventory, preferences: &Preferences) -> CommanderSearch {
        let search =
            identify_commanders(self.provider(), inventory, preferences, &mut LogProgress);
        self.persist_cache();
        search
    }

    /// Build a deck around `commander`, reporting progress to the log.
    pub fn build_deck<R: Rng + ?Sized>(
        &self,
        commander: &str,
        inventory: &Inventory,
        preferences: &Preferences,
        rng: &mut R,
    ) -> Result<BuiltDeck> {
        self.build_deck_with_progress(commander, inventory, preferences, rng, &mut LogProgress)
    }

    pub fn build_deck_with_progress<R: Rng + ?Sized>(
        &self,
        commander: &str,
        inventory: &Inventory,
        preferences: &Preferences,
        rng: &mut R,
        progress: &mut dyn ProgressObserver,
    ) -> Result<BuiltDeck> {
        let result = DeckBuilder::new(self.provider())
            .with_rules(self.rules.clone())
            .build(commander, inventory, preferences, rng, progress);
        self.persist_cache();
        result
    }

    /// Persist the lookup cache. A no-op for local card data.
    pub fn save_cache(&self) -> Result<()> {
        match &self.source {
            CardSource::Scryfall(client) => client.save_cache(),
            CardSource::Local { .. } => Ok(()),
        }
    }

    /// Delete the lookup cache. Returns `true` if a cache file was removed.
    pub fn clear_cache(&self) -> Result<bool> {
        match &self.source {
            CardSource::Scryfall(client) => client.clear_cache(),
            CardSource::Local { .. } => Ok(false),
        }
    }

    fn persist_cache(&self) {
        if let Err(e) = self.save_cache() {
            log::warn!("Could not save card cache: {}", e);
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for AutoDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            CardSource::Scryfall(client) => write!(
                f,
                "AutoDeck(source=scryfall, cache_dir={}, cached={}, offline={})",
                client.cache_dir.display(),
                client.cached_entries(),
                client.offline
            ),
            CardSource::Local { provider, path } => write!(
                f,
                "AutoDeck(source={}, cards={})",
                path.display(),
                provider.len()
            ),
        }
    }
}
