//! Shared test fixtures for the autodeck integration tests.
//!
//! Builds card data by hand and serves it through an `InMemoryProvider`, so
//! no test touches the network. `golgari_pool()` is a Black-Green card pool
//! large enough to fill a full deck.

#![allow(dead_code)]

use autodeck::cache::Clock;
use autodeck::inventory::parse_line;
use autodeck::{CardDetails, InMemoryProvider, Inventory, InventoryEntry};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const SET: &str = "TST";

/// Clock that only moves when told to.
pub struct ManualClock(Mutex<SystemTime>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Mutex::new(UNIX_EPOCH + Duration::from_secs(1_700_000_000)))
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.0.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        *self.0.lock().unwrap()
    }
}

/// Rough mana value of a cost string: generic numbers plus one per symbol.
pub fn mana_value(cost: &str) -> f64 {
    cost.split('}')
        .filter_map(|sym| sym.strip_prefix('{'))
        .map(|sym| sym.parse::<f64>().unwrap_or(1.0))
        .sum()
}

pub fn card(
    name: &str,
    type_line: &str,
    colors: &str,
    mana_cost: &str,
    text: &str,
    collector_number: u32,
) -> CardDetails {
    CardDetails {
        name: name.to_string(),
        oracle_text: if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        },
        type_line: type_line.to_string(),
        mana_cost: Some(mana_cost.to_string()),
        color_identity: colors.parse().unwrap(),
        cmc: mana_value(mana_cost),
        rarity: Some("common".to_string()),
        set: SET.to_lowercase(),
        collector_number: collector_number.to_string(),
        card_faces: Vec::new(),
    }
}

pub fn legend(name: &str, colors: &str, mana_cost: &str, text: &str, cn: u32) -> CardDetails {
    card(name, "Legendary Creature \u{2014} Beast", colors, mana_cost, text, cn)
}

/// Inventory line for a card, in the file format.
pub fn line_for(card: &CardDetails, quantity: u32) -> String {
    format!(
        "{} {} ({}) {}",
        quantity,
        card.name,
        card.set.to_uppercase(),
        card.collector_number
    )
}

pub fn entry_for(card: &CardDetails, quantity: u32) -> InventoryEntry {
    parse_line(&line_for(card, quantity)).unwrap()
}

/// One owned copy of every card.
pub fn inventory_of(cards: &[CardDetails]) -> Inventory {
    cards.iter().map(|c| entry_for(c, 1)).collect()
}

pub fn provider_of(cards: &[CardDetails]) -> InMemoryProvider {
    InMemoryProvider::from_cards(cards.iter().cloned())
}

/// Numbered copies of one card template.
fn batch(
    out: &mut Vec<CardDetails>,
    next_cn: &mut u32,
    prefix: &str,
    count: usize,
    type_line: &str,
    colors: &str,
    mana_cost: &str,
    text: &str,
) {
    for i in 1..=count {
        out.push(card(
            &format!("{prefix} {i}"),
            type_line,
            colors,
            mana_cost,
            text,
            *next_cn,
        ));
        *next_cn += 1;
    }
}

pub const GOLGARI_COMMANDER: &str = "Golgari Boss";

pub const RAMP_COUNT: usize = 10;
pub const TOKEN_COUNT: usize = 8;
pub const OFF_COLOR_PREFIX: &str = "Red Smash";

/// A Black-Green commander, 72 eligible spells, 8 non-basic lands, an owned
/// basic Forest and 10 off-color cards.
pub fn golgari_pool() -> Vec<CardDetails> {
    let mut cards = vec![legend(GOLGARI_COMMANDER, "BG", "{1}{B}{G}", "", 1)];
    let mut cn = 100;
    let pool = &mut cards;
    let next = &mut cn;

    batch(
        pool,
        next,
        "Green Ramp",
        RAMP_COUNT,
        "Sorcery",
        "G",
        "{1}{G}",
        "Search your library for a basic land card and put it onto the battlefield.",
    );
    batch(pool, next, "Black Draw", 10, "Instant", "B", "{1}{B}", "Draw a card.");
    batch(
        pool,
        next,
        "Golgari Kill",
        6,
        "Instant",
        "BG",
        "{B}{G}",
        "Destroy target creature.",
    );
    batch(
        pool,
        next,
        "Black Plague",
        3,
        "Sorcery",
        "B",
        "{2}{B}{B}",
        "Destroy all creatures.",
    );
    batch(
        pool,
        next,
        "Green Beast",
        25,
        "Creature \u{2014} Beast",
        "G",
        "{3}{G}",
        "",
    );
    batch(pool, next, "Iron Trinket", 10, "Artifact", "", "{2}", "");
    batch(
        pool,
        next,
        "Spore Maker",
        TOKEN_COUNT,
        "Sorcery",
        "G",
        "{2}{G}",
        "Create a 1/1 creature token.",
    );
    batch(
        pool,
        next,
        OFF_COLOR_PREFIX,
        10,
        "Instant",
        "R",
        "{R}",
        "Destroy target artifact.",
    );
    batch(pool, next, "Jungle Grove", 4, "Land", "G", "", "{T}: Add {G}.");
    batch(pool, next, "Barren Flats", 4, "Land", "", "", "{T}: Add {C}.");

    cards.push(card(
        "Forest",
        "Basic Land \u{2014} Forest",
        "G",
        "",
        "({T}: Add {G}.)",
        900,
    ));
    cards
}
