//! Commander deck assembly.
//!
//! Starting from a commander and the player's inventory, the builder keeps
//! every owned card inside the commander's color identity, fills non-land
//! slots by category quota (chosen strategy first, then ramp, draw, spot
//! removal, board wipes, threats, utility and flex slots), tops up with random
//! leftovers, adds owned non-basic lands, and completes the deck with basic
//! lands weighted by the colored pips of the chosen cards.
//!
//! All randomness comes from the caller's RNG, so a seeded RNG reproduces a
//! build exactly.

pub mod mana;

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};

use crate::classifier::{Category, ClassifiedCard};
use crate::config::{self, DeckRules};
use crate::error::{DeckError, Result};
use crate::models::{
    BuiltDeck, CardDetails, CardIdentity, ColorAdjustment, ColorSet, DeckEntry, DeckRole,
    Inventory, Preferences, SynergyNote,
};
use crate::progress::ProgressObserver;
use crate::provider::CardDataProvider;

/// Categories noted as key support when no strategy claims a card.
const KEY_SUPPORT: [Category; 4] = [
    Category::Ramp,
    Category::Draw,
    Category::SpotRemoval,
    Category::BoardWipe,
];

/// Narrow a color preference to the commander's identity. Returns the
/// preference to apply and, when it had to change, a record of the change.
/// A preference with no colors left is dropped.
pub fn narrow_preference(
    requested: Option<ColorSet>,
    commander: ColorSet,
) -> (Option<ColorSet>, Option<ColorAdjustment>) {
    let Some(requested) = requested else {
        return (None, None);
    };
    let narrowed = requested.intersection(commander);
    let applied = if narrowed.is_empty() { None } else { Some(narrowed) };
    let changed =
        !requested.is_subset(commander) || (requested.is_empty() && !commander.is_empty());
    let adjustment = changed.then_some(ColorAdjustment { requested, applied });
    (applied, adjustment)
}

/// Assembles decks against a card-data provider.
pub struct DeckBuilder<'a> {
    provider: &'a dyn CardDataProvider,
    rules: DeckRules,
}

impl<'a> DeckBuilder<'a> {
    pub fn new(provider: &'a dyn CardDataProvider) -> Self {
        Self {
            provider,
            rules: DeckRules::default(),
        }
    }

    pub fn with_rules(mut self, rules: DeckRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn rules(&self) -> &DeckRules {
        &self.rules
    }

    /// Build a deck around `commander_name`.
    ///
    /// Fails only when the commander cannot be resolved or cannot lead a
    /// deck. An inventory too small for a full deck yields a partial deck
    /// with [`BuiltDeck::shortfall`] set.
    pub fn build<R: Rng + ?Sized>(
        &self,
        commander_name: &str,
        inventory: &Inventory,
        preferences: &Preferences,
        rng: &mut R,
        progress: &mut dyn ProgressObserver,
    ) -> Result<BuiltDeck> {
        let rules = &self.rules;
        progress.on_progress(5, &format!("Starting build for {commander_name}..."));

        let commander = self.resolve_commander(commander_name)?;
        let commander_colors = commander.color_identity;
        log::info!(
            "Commander {} has color identity {}",
            commander.name,
            commander_colors
        );

        let (color_filter, color_adjustment) =
            narrow_preference(preferences.colors, commander_colors);
        if let Some(adj) = color_adjustment {
            log::warn!(
                "Preferred colors {} do not fit {}; using {}",
                adj.requested,
                commander_colors,
                adj.applied.unwrap_or(commander_colors)
            );
        }

        let owned_commander = inventory.find_by_name(&commander.name);
        let commander_identity = owned_commander.map(|e| e.identity.clone());
        let commander_entry = match owned_commander {
            Some(entry) => DeckEntry {
                name: entry.display_name.clone(),
                set: entry.identity.set.clone(),
                collector_number: entry.identity.collector_number.clone(),
                foil: entry.foil,
                role: DeckRole::Commander,
                details: commander.clone(),
            },
            None => DeckEntry {
                name: commander.name.clone(),
                set: commander.set_code(),
                collector_number: commander.collector_number.clone(),
                foil: false,
                role: DeckRole::Commander,
                details: commander.clone(),
            },
        };

        let mut tally: BTreeMap<String, usize> = BTreeMap::new();
        for card_type in commander.card_types() {
            if card_type != "Legendary" {
                *tally.entry(card_type.to_string()).or_insert(0) += 1;
            }
        }

        // -- Resolve and filter the inventory ---------------------------------

        progress.on_progress(15, "Fetching inventory card data...");
        let identities: Vec<CardIdentity> = inventory
            .iter()
            .filter(|e| Some(&e.identity) != commander_identity.as_ref())
            .filter(|e| !e.identity.name.eq_ignore_ascii_case(&commander.name))
            .map(|e| e.identity.clone())
            .collect();
        let lookup = self.provider.cards_by_identity(&identities);
        if let Some(summary) = lookup.missing_summary() {
            log::warn!("{}", summary);
        }

        progress.on_progress(25, "Filtering and classifying available cards...");
        let eligible: Vec<ClassifiedCard> = inventory
            .iter()
            .filter(|entry| entry.is_available())
            .filter_map(|entry| {
                let details = lookup.found.get(&entry.identity)?;
                let colors = details.color_identity;
                if !colors.is_subset(commander_colors) {
                    return None;
                }
                if let Some(filter) = color_filter {
                    if !colors.is_subset(filter) {
                        return None;
                    }
                }
                Some(ClassifiedCard::new(entry.clone(), details.clone()))
            })
            .collect();
        log::info!("{} inventory cards eligible for this commander", eligible.len());

        let (lands, spells): (Vec<&ClassifiedCard>, Vec<&ClassifiedCard>) =
            eligible.iter().partition(|c| c.details.is_land());
        let lands: Vec<&ClassifiedCard> = lands
            .into_iter()
            .filter(|c| !c.details.is_basic_land())
            .collect();

        let mut used: HashSet<&CardIdentity> = HashSet::new();
        if let Some(identity) = commander_identity.as_ref() {
            used.insert(identity);
        }

        // -- Non-land spells ---------------------------------------------------

        let spell_target = rules.min_spells.min(rules.deck_size.saturating_sub(1));
        let chosen = select_spells(
            &spells,
            spell_target,
            preferences.strategy,
            rules,
            &mut used,
            rng,
            progress,
        );

        let mut entries = vec![commander_entry];
        let mut cmc_curve = Vec::with_capacity(chosen.len());
        let mut synergy = Vec::new();

        for card in &chosen {
            entries.push(owned_entry(card, DeckRole::Spell));
            cmc_curve.push(card.details.cmc);
            for category in &card.categories {
                *tally.entry(category.label().to_string()).or_insert(0) += 1;
            }
            if let Some(note) = synergy_note(card, preferences.strategy) {
                synergy.push(note);
            }
        }

        // -- Owned non-basic lands ---------------------------------------------

        progress.on_progress(60, "Adding non-basic lands...");
        let mut land_order = lands;
        land_order.shuffle(rng);
        for card in land_order {
            if entries.len() >= rules.deck_size {
                break;
            }
            if !card.entry.is_available() || !used.insert(&card.entry.identity) {
                continue;
            }
            entries.push(owned_entry(card, DeckRole::Land));
            *tally.entry("Land".to_string()).or_insert(0) += 1;
        }

        // -- Basic lands -------------------------------------------------------

        let demand = mana::pip_demand(entries.iter().map(|e| e.details.mana_cost()));
        let weights = mana::land_color_weights(&demand, commander_colors);
        let basics_needed = rules.deck_size.saturating_sub(entries.len());
        for i in 0..basics_needed {
            let color = mana::choose_land_color(&weights, rng);
            let (name, set, number) = config::basic_land_printing(color);
            entries.push(DeckEntry {
                name: name.to_string(),
                set: set.to_string(),
                collector_number: number.to_string(),
                foil: false,
                role: DeckRole::BasicLand,
                details: CardDetails::basic_land_stub(name, set, number),
            });
            *tally.entry("Basic Land".to_string()).or_insert(0) += 1;
            let percent = 60 + (i + 1) * 20 / basics_needed;
            progress.on_progress(percent as u8, "Completing with basic lands...");
        }

        // -- Final check -------------------------------------------------------

        progress.on_progress(90, "Final deck check...");
        entries.truncate(rules.deck_size);
        let shortfall = rules.deck_size.saturating_sub(entries.len());
        if shortfall > 0 {
            log::warn!(
                "Deck has only {} cards, {} short of {}; inventory too small or preferences too strict",
                entries.len(),
                shortfall,
                rules.deck_size
            );
        } else {
            log::info!("Built a complete {}-card deck", entries.len());
        }
        progress.on_progress(100, "Deck ready!");

        Ok(BuiltDeck {
            commander: commander.name.clone(),
            commander_colors,
            strategy: preferences.strategy,
            entries,
            cmc_curve,
            category_tally: tally,
            synergy,
            color_adjustment,
            missing_cards: lookup.missing,
            eligible_cards: eligible.len(),
            shortfall,
        })
    }

    fn resolve_commander(&self, name: &str) -> Result<CardDetails> {
        let details = match self.provider.card_by_name(name) {
            Ok(Some(details)) => details,
            Ok(None) => {
                return Err(DeckError::NotFound(format!(
                    "No card data found for commander '{name}'"
                )))
            }
            Err(e) => {
                log::warn!("Lookup of commander '{}' failed: {}", name, e);
                return Err(DeckError::NotFound(format!(
                    "Could not resolve commander '{name}': {e}"
                )));
            }
        };
        if !details.can_lead_deck() {
            return Err(DeckError::InvalidCommander(format!(
                "'{}' ({}) cannot be a commander",
                details.name, details.type_line
            )));
        }
        Ok(details)
    }
}

/// Fill up to `target` spell slots: quota-driven by category first, then
/// random leftovers. Cards already in `used` are never picked.
fn select_spells<'c, R: Rng + ?Sized>(
    spells: &[&'c ClassifiedCard],
    target: usize,
    strategy: Option<Category>,
    rules: &DeckRules,
    used: &mut HashSet<&'c CardIdentity>,
    rng: &mut R,
    progress: &mut dyn ProgressObserver,
) -> Vec<&'c ClassifiedCard> {
    let mut order: Vec<&ClassifiedCard> = spells.to_vec();
    order.shuffle(rng);

    let mut fill_order: Vec<Category> = Vec::new();
    if let Some(strategy) = strategy.filter(|s| s.is_strategy()) {
        fill_order.push(strategy);
    }
    for category in Category::GENERAL_FILL_ORDER {
        if !fill_order.contains(&category) {
            fill_order.push(category);
        }
    }

    let mut chosen: Vec<&ClassifiedCard> = Vec::new();
    for category in fill_order {
        if chosen.len() >= target {
            break;
        }
        let quota = rules.quota_for(category, strategy);
        let current = chosen.iter().filter(|c| c.has_category(category)).count();
        let mut needed = quota.saturating_sub(current);
        if needed == 0 {
            continue;
        }

        let mut pool: Vec<&ClassifiedCard> = order
            .iter()
            .copied()
            .filter(|c| c.has_category(category))
            .collect();
        pool.shuffle(rng);

        for card in pool {
            if needed == 0 || chosen.len() >= target {
                break;
            }
            if !card.entry.is_available() || used.contains(&card.entry.identity) {
                continue;
            }
            used.insert(&card.entry.identity);
            chosen.push(card);
            needed -= 1;
            report_spell_progress(progress, chosen.len(), target, category.label());
        }
    }

    if chosen.len() < target {
        let mut rest: Vec<&ClassifiedCard> = order
            .iter()
            .copied()
            .filter(|c| c.entry.is_available() && !used.contains(&c.entry.identity))
            .collect();
        rest.shuffle(rng);
        for card in rest {
            if chosen.len() >= target {
                break;
            }
            used.insert(&card.entry.identity);
            chosen.push(card);
            report_spell_progress(progress, chosen.len(), target, "final fill");
        }
    }

    chosen
}

fn report_spell_progress(
    progress: &mut dyn ProgressObserver,
    count: usize,
    target: usize,
    label: &str,
) {
    let percent = (25 + count * 35 / target.max(1)).min(60);
    progress.on_progress(percent as u8, &format!("Selecting spells: {label}..."));
}

fn owned_entry(card: &ClassifiedCard, role: DeckRole) -> DeckEntry {
    DeckEntry {
        name: card.entry.display_name.clone(),
        set: card.entry.identity.set.clone(),
        collector_number: card.entry.identity.collector_number.clone(),
        foil: card.entry.foil,
        role,
        details: card.details.clone(),
    }
}

fn synergy_note(card: &ClassifiedCard, strategy: Option<Category>) -> Option<SynergyNote> {
    let category = match strategy {
        Some(strategy) if card.has_category(strategy) => strategy,
        _ => KEY_SUPPORT.into_iter().find(|c| card.has_category(*c))?,
    };
    Some(SynergyNote {
        name: card.entry.display_name.clone(),
        category,
    })
}
