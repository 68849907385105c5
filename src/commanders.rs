//! Commander identification and relevance scoring.
//!
//! Scans the inventory for legendary creatures and planeswalkers, applies the
//! player's color preference, and scores each candidate either by strategy
//! relevance (keyword occurrences in its own text plus supporting cards) or,
//! without a strategy, by how many inventory cards fit its color identity.

use std::collections::HashSet;

use crate::classifier::ClassifiedCard;
use crate::models::{CommanderCandidate, CommanderOrder, Inventory, Preferences};
use crate::progress::ProgressObserver;
use crate::provider::{summarize_missing, CardDataProvider};

/// Points per strategy keyword occurrence in a commander's own text.
pub const COMMANDER_KEYWORD_BONUS: usize = 10;

/// Result of a commander search.
#[derive(Debug, Clone, Default)]
pub struct CommanderSearch {
    /// Candidates in [`CommanderOrder::TotalScore`] order.
    pub candidates: Vec<CommanderCandidate>,
    /// Inventory printings the provider could not resolve.
    pub missing: Vec<String>,
}

impl CommanderSearch {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Candidates re-sorted for display.
    pub fn sorted(&self, order: CommanderOrder) -> Vec<CommanderCandidate> {
        let mut out = self.candidates.clone();
        sort_candidates(&mut out, order);
        out
    }
}

/// Sort by the chosen score descending, ties broken by name ascending.
pub fn sort_candidates(candidates: &mut [CommanderCandidate], order: CommanderOrder) {
    match order {
        CommanderOrder::TotalScore => candidates.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| a.name.cmp(&b.name))
        }),
        CommanderOrder::CommanderBonus => candidates.sort_by(|a, b| {
            b.commander_bonus
                .cmp(&a.commander_bonus)
                .then_with(|| a.name.cmp(&b.name))
        }),
    }
}

/// Resolve and classify every inventory entry, in inventory order.
/// Returns the classified cards and the unresolved printings.
pub fn classify_inventory(
    provider: &dyn CardDataProvider,
    inventory: &Inventory,
) -> (Vec<ClassifiedCard>, Vec<String>) {
    let lookup = provider.cards_by_identity(&inventory.identities());
    if let Some(summary) = lookup.missing_summary() {
        log::warn!("{}", summary);
    }

    let classified = inventory
        .iter()
        .filter_map(|entry| {
            lookup
                .found
                .get(&entry.identity)
                .map(|details| ClassifiedCard::new(entry.clone(), details.clone()))
        })
        .collect();

    (classified, lookup.missing)
}

/// Find and rank the commanders an inventory can field.
///
/// An empty candidate list is a valid outcome meaning no commander matches
/// the preferences.
pub fn identify_commanders(
    provider: &dyn CardDataProvider,
    inventory: &Inventory,
    preferences: &Preferences,
    progress: &mut dyn ProgressObserver,
) -> CommanderSearch {
    progress.on_progress(0, "Resolving inventory card data...");
    let (cards, missing) = classify_inventory(provider, inventory);

    let total = cards.len().max(1);
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for (idx, card) in cards.iter().enumerate() {
        let percent = ((idx + 1) * 100 / total).min(100) as u8;
        progress.on_progress(percent, "Evaluating commanders...");

        if let Some(candidate) = score_candidate(card, &cards, preferences) {
            if seen_names.insert(candidate.name.clone()) {
                candidates.push(candidate);
            }
        }
    }

    sort_candidates(&mut candidates, CommanderOrder::TotalScore);
    log::info!(
        "{} commander candidate(s) among {} resolved cards",
        candidates.len(),
        cards.len()
    );
    if let Some(summary) = summarize_missing(&missing) {
        log::debug!("Commander search ran without: {}", summary);
    }

    CommanderSearch {
        candidates,
        missing,
    }
}

fn score_candidate(
    card: &ClassifiedCard,
    pool: &[ClassifiedCard],
    preferences: &Preferences,
) -> Option<CommanderCandidate> {
    if !card.details.is_commander_candidate() {
        return None;
    }

    let colors = card.details.color_identity;
    if let Some(preferred) = preferences.colors {
        if !colors.is_subset(preferred) {
            return None;
        }
    }

    let others = pool
        .iter()
        .filter(|other| other.entry.identity != card.entry.identity)
        .filter(|other| !other.details.name.eq_ignore_ascii_case(&card.details.name))
        .filter(|other| other.details.color_identity.is_subset(colors));

    let (relevance, commander_bonus, support_cards) = match preferences.strategy {
        Some(strategy) => {
            let text = card.details.oracle_text().to_lowercase();
            let occurrences = strategy.keyword_occurrences(&text);
            if occurrences == 0 {
                return None;
            }
            let support = others.filter(|o| o.has_category(strategy)).count();
            (
                format!(" (relevant for {})", strategy.title()),
                occurrences * COMMANDER_KEYWORD_BONUS,
                support,
            )
        }
        None => (String::new(), 0, others.count()),
    };

    Some(CommanderCandidate {
        name: card.details.name.clone(),
        identity: card.entry.identity.clone(),
        details: card.details.clone(),
        relevance,
        total_score: commander_bonus + support_cards,
        commander_bonus,
        support_cards,
    })
}
