use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::classifier::Category;
use crate::models::Color;

pub const SCRYFALL_API_BASE: &str = "https://api.scryfall.com";

/// Maximum identifiers per `/cards/collection` request.
pub const SCRYFALL_BATCH_SIZE: usize = 75;

/// Pause after each request (Scryfall asks for at most ~10 requests/second).
pub const SCRYFALL_RATE_LIMIT_DELAY: Duration = Duration::from_millis(100);

pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const CACHE_FILE_NAME: &str = "scryfall_cache.json";

pub const TARGET_DECK_SIZE: usize = 100;
pub const TARGET_LAND_COUNT: usize = 37;
pub const MIN_NON_LAND_CARDS: usize = 60;

/// Missing-card warnings list at most this many names.
pub const MISSING_PREVIEW_LEN: usize = 5;

pub fn category_quotas() -> BTreeMap<Category, usize> {
    BTreeMap::from([
        (Category::Ramp, 8),
        (Category::Draw, 8),
        (Category::SpotRemoval, 5),
        (Category::BoardWipe, 3),
        (Category::Threat, 20),
        (Category::Utility, 15),
        (Category::FlexSlots, 4),
    ])
}

/// Advisory spell count per converted mana cost.
pub fn cmc_target_distribution() -> BTreeMap<u32, usize> {
    BTreeMap::from([
        (0, 1),
        (1, 8),
        (2, 15),
        (3, 15),
        (4, 10),
        (5, 5),
        (6, 3),
        (7, 2),
        (8, 1),
        (9, 0),
        (10, 0),
    ])
}

/// Fixed printing `(name, set, collector number)` used for synthesized basic
/// lands; `None` selects the colorless basic.
pub fn basic_land_printing(color: Option<Color>) -> (&'static str, &'static str, &'static str) {
    match color {
        Some(Color::White) => ("Plains", "STA", "63"),
        Some(Color::Blue) => ("Island", "STA", "64"),
        Some(Color::Black) => ("Swamp", "STA", "65"),
        Some(Color::Red) => ("Mountain", "STA", "66"),
        Some(Color::Green) => ("Forest", "STA", "67"),
        None => ("Wastes", "OGW", "183"),
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("autodeck")
    } else {
        PathBuf::from(".autodeck-cache")
    }
}

// ---------------------------------------------------------------------------
// DeckRules
// ---------------------------------------------------------------------------

/// Deck-shape configuration consumed by the builder and the deck report.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckRules {
    pub deck_size: usize,
    /// Advisory; the builder fills lands to reach `deck_size`.
    pub land_count: usize,
    pub min_spells: usize,
    pub quotas: BTreeMap<Category, usize>,
    /// Slot target for a chosen strategy that has no quota of its own.
    /// Zero by default, so strategy cards only arrive through the final fill.
    pub strategy_quota: usize,
    /// Advisory; reported against the built curve, never enforced.
    pub cmc_targets: BTreeMap<u32, usize>,
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            deck_size: TARGET_DECK_SIZE,
            land_count: TARGET_LAND_COUNT,
            min_spells: MIN_NON_LAND_CARDS,
            quotas: category_quotas(),
            strategy_quota: 0,
            cmc_targets: cmc_target_distribution(),
        }
    }
}

impl DeckRules {
    /// Slot target for `category`, honoring the strategy fallback.
    pub fn quota_for(&self, category: Category, strategy: Option<Category>) -> usize {
        match self.quotas.get(&category) {
            Some(&quota) => quota,
            None if strategy == Some(category) => self.strategy_quota,
            None => 0,
        }
    }
}
