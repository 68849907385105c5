//! Provider backed by a fixed list of cards.
//!
//! Used for fully offline runs (a JSON array of Scryfall card objects, such
//! as a bulk-data export) and as a test double.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::{BatchLookup, CardDataProvider};
use crate::error::Result;
use crate::models::{CardDetails, CardIdentity};

#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    cards: Vec<CardDetails>,
    by_name: HashMap<String, usize>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards<I: IntoIterator<Item = CardDetails>>(cards: I) -> Self {
        let mut provider = Self::new();
        for card in cards {
            provider.add(card);
        }
        provider
    }

    /// Load a JSON array of card objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let cards: Vec<CardDetails> = serde_json::from_str(&contents)?;
        Ok(Self::from_cards(cards.into_iter().map(CardDetails::normalized)))
    }

    /// Add a card. The first printing added for a name answers name lookups.
    pub fn add(&mut self, card: CardDetails) {
        self.by_name
            .entry(card.name.to_lowercase())
            .or_insert(self.cards.len());
        if let Some((front, _)) = card.name.split_once("//") {
            self.by_name
                .entry(front.trim().to_lowercase())
                .or_insert(self.cards.len());
        }
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardDataProvider for InMemoryProvider {
    fn card_by_name(&self, name: &str) -> Result<Option<CardDetails>> {
        Ok(self
            .by_name
            .get(&name.to_lowercase())
            .map(|&idx| self.cards[idx].clone()))
    }

    fn cards_by_identity(&self, identities: &[CardIdentity]) -> BatchLookup {
        let mut lookup = BatchLookup::default();
        for identity in identities {
            match self
                .cards
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
}
