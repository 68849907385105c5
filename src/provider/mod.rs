//! Card-data providers.
//!
//! A [`CardDataProvider`] answers two kinds of lookups: a loose lookup by
//! card name, and a precise batch lookup by printing identity. The two key
//! spaces are kept apart: batch results are keyed by the requested
//! [`CardIdentity`], never by name.

pub mod memory;
pub mod scryfall;

pub use memory::InMemoryProvider;
pub use scryfall::{ScryfallClient, ScryfallClientBuilder};

use std::collections::HashMap;

use crate::config::MISSING_PREVIEW_LEN;
use crate::error::Result;
use crate::models::{CardDetails, CardIdentity};

/// Result of a batch lookup. Unresolved identities are listed in `missing`
/// as display strings; they are not an error.
#[derive(Debug, Clone, Default)]
pub struct BatchLookup {
    pub found: HashMap<CardIdentity, CardDetails>,
    pub missing: Vec<String>,
}

impl BatchLookup {
    /// Warning text listing at most five missing cards, or `None` when
    /// everything resolved.
    pub fn missing_summary(&self) -> Option<String> {
        summarize_missing(&self.missing)
    }
}

pub fn summarize_missing(missing: &[String]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }
    let preview: Vec<&str> = missing
        .iter()
        .take(MISSING_PREVIEW_LEN)
        .map(String::as_str)
        .collect();
    let ellipsis = if missing.len() > MISSING_PREVIEW_LEN { "..." } else { "" };
    Some(format!(
        "{} card(s) could not be resolved: {}{}",
        missing.len(),
        preview.join(", "),
        ellipsis
    ))
}

/// Source of authoritative card attributes.
pub trait CardDataProvider {
    /// Look up a card by exact name. `Ok(None)` when no card has that name.
    fn card_by_name(&self, name: &str) -> Result<Option<CardDetails>>;

    /// Resolve many printings at once. Failures are reported per identity in
    /// [`BatchLookup::missing`] rather than as an error.
    fn cards_by_identity(&self, identities: &[CardIdentity]) -> BatchLookup;
}

impl<P: CardDataProvider + ?Sized> CardDataProvider for Box<P> {
    fn card_by_name(&self, name: &str) -> Result<Option<CardDetails>> {
        (**self).card_by_name(name)
    }

    fn cards_by_identity(&self, identities: &[CardIdentity]) -> BatchLookup {
        (**self).cards_by_identity(identities)
    }
}
