use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::card::{CardDetails, CardIdentity};
use super::color::ColorSet;
use crate::classifier::Category;
use crate::config::DeckRules;

// ---------------------------------------------------------------------------
// Preferences — Player's color and strategy wishes
// ---------------------------------------------------------------------------

/// Build preferences. `colors: None` means no color preference;
/// `Some(ColorSet::COLORLESS)` asks for colorless only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    pub colors: Option<ColorSet>,
    pub strategy: Option<Category>,
}

impl Preferences {
    pub fn with_colors(mut self, colors: ColorSet) -> Self {
        self.colors = Some(colors);
        self
    }

    pub fn with_strategy(mut self, strategy: Category) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

// ---------------------------------------------------------------------------
// CommanderCandidate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommanderCandidate {
    pub name: String,
    pub identity: CardIdentity,
    pub details: CardDetails,
    /// Short note such as `" (relevant for Token)"`; empty without a strategy.
    pub relevance: String,
    pub total_score: usize,
    /// Ten points per strategy keyword occurrence in the commander's own text.
    pub commander_bonus: usize,
    pub support_cards: usize,
}

/// Display orderings for commander candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommanderOrder {
    /// Total score descending, then name.
    #[default]
    TotalScore,
    /// Commander-only keyword bonus descending, then name.
    CommanderBonus,
}

impl FromStr for CommanderOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" | "score" | "total_score" => Ok(CommanderOrder::TotalScore),
            "commander" | "bonus" | "commander_bonus" => Ok(CommanderOrder::CommanderBonus),
            _ => Err(format!("Unknown commander order: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// DeckEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckRole {
    Commander,
    Spell,
    Land,
    BasicLand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckEntry {
    pub name: String,
    pub set: String,
    pub collector_number: String,
    pub foil: bool,
    pub role: DeckRole,
    /// Full details for owned cards; a minimal stub for synthesized basics.
    pub details: CardDetails,
}

impl DeckEntry {
    /// Export line: `1 <name> (<SET>) <number>[ *F*]`.
    pub fn export_line(&self) -> String {
        let foil = if self.foil { " *F*" } else { "" };
        format!(
            "1 {} ({}) {}{}",
            self.name, self.set, self.collector_number, foil
        )
    }

    pub fn is_basic_land(&self) -> bool {
        self.role == DeckRole::BasicLand
    }
}

// ---------------------------------------------------------------------------
// Build report pieces
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynergyNote {
    pub name: String,
    pub category: Category,
}

/// Records a color preference the builder had to narrow to the commander's
/// identity. `applied: None` means nothing of the preference survived and
/// the commander's full identity is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorAdjustment {
    pub requested: ColorSet,
    pub applied: Option<ColorSet>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckStats {
    pub total_cards: usize,
    pub land_count: usize,
    pub average_spell_cmc: Option<f64>,
    /// Card-type words (Creature, Artifact, Land, ...) across the deck.
    pub type_counts: BTreeMap<String, usize>,
}

// ---------------------------------------------------------------------------
// BuiltDeck
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltDeck {
    pub commander: String,
    pub commander_colors: ColorSet,
    pub strategy: Option<Category>,
    /// Commander first, then spells, owned lands and synthesized basics.
    pub entries: Vec<DeckEntry>,
    /// Converted mana cost of every non-land spell added.
    pub cmc_curve: Vec<f64>,
    pub category_tally: BTreeMap<String, usize>,
    pub synergy: Vec<SynergyNote>,
    pub color_adjustment: Option<ColorAdjustment>,
    /// Inventory printings the card-data provider could not resolve.
    pub missing_cards: Vec<String>,
    /// Inventory cards that passed the color filters.
    pub eligible_cards: usize,
    /// Cards short of the target deck size; zero for a complete deck.
    pub shortfall: usize,
}

impl BuiltDeck {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall == 0
    }

    pub fn tally(&self, label: &str) -> usize {
        self.category_tally.get(label).copied().unwrap_or(0)
    }

    /// Export lines sorted by card name.
    pub fn export_lines(&self) -> Vec<String> {
        let mut sorted: Vec<&DeckEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted.into_iter().map(DeckEntry::export_line).collect()
    }

    pub fn export_text(&self) -> String {
        self.export_lines().join("\n")
    }

    /// Spell counts bucketed by whole converted mana cost.
    pub fn mana_curve(&self) -> BTreeMap<u32, usize> {
        let mut curve = BTreeMap::new();
        for cmc in &self.cmc_curve {
            *curve.entry(cmc.max(0.0).floor() as u32).or_insert(0) += 1;
        }
        curve
    }

    pub fn stats(&self) -> DeckStats {
        let mut type_counts = BTreeMap::new();
        let mut land_count = 0;
        for entry in &self.entries {
            if entry.details.is_land() {
                land_count += 1;
            }
            for card_type in entry.details.card_types() {
                *type_counts.entry(card_type.to_string()).or_insert(0) += 1;
            }
        }
        let average_spell_cmc = if self.cmc_curve.is_empty() {
            None
        } else {
            Some(self.cmc_curve.iter().sum::<f64>() / self.cmc_curve.len() as f64)
        };
        DeckStats {
            total_cards: self.entries.len(),
            land_count,
            average_spell_cmc,
            type_counts,
        }
    }

    /// Names of added cards tagged with the chosen strategy.
    pub fn strategy_cards(&self) -> Vec<&str> {
        match self.strategy {
            Some(strategy) => self
                .synergy
                .iter()
                .filter(|n| n.category == strategy)
                .map(|n| n.name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Improvement hints: missing cards, low land count, and key categories
    /// under their quota.
    pub fn suggestions(&self, rules: &DeckRules) -> Vec<String> {
        let mut out = Vec::new();
        if self.shortfall > 0 {
            out.push(format!(
                "Missing {} cards to reach {}; try relaxing color or strategy preferences.",
                self.shortfall, rules.deck_size
            ));
        }
        let lands = self.stats().land_count;
        if lands < rules.land_count {
            out.push(format!(
                "Lands: about {} recommended, deck has {}.",
                rules.land_count, lands
            ));
        }
        for category in [Category::Ramp, Category::Draw] {
            let quota = rules.quota_for(category, None);
            let have = self.tally(category.label());
            if have < quota {
                out.push(format!(
                    "{}: target {} cards, deck has {}.",
                    category.title(),
                    quota,
                    have
                ));
            }
        }
        let spot = rules.quota_for(Category::SpotRemoval, None);
        let wipes = rules.quota_for(Category::BoardWipe, None);
        let removal =
            self.tally(Category::SpotRemoval.label()) + self.tally(Category::BoardWipe.label());
        if removal < spot + wipes {
            out.push(format!(
                "Interaction: target {spot} spot removal and {wipes} board wipes, deck has {removal} in total."
            ));
        }
        out
    }
}

impl fmt::Display for BuiltDeck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuiltDeck(commander={}, colors={}, cards={}, shortfall={})",
            self.commander,
            self.commander_colors,
            self.entries.len(),
            self.shortfall
        )
    }
}
