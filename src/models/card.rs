use serde::{Deserialize, Serialize};
use std::fmt;

use super::color::ColorSet;

// ---------------------------------------------------------------------------
// CardIdentity — One printing: name + set + collector number
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardIdentity {
    pub name: String,
    pub set: String,
    pub collector_number: String,
}

impl CardIdentity {
    /// Build an identity, normalizing the set code to uppercase.
    pub fn new(name: impl Into<String>, set: &str, collector_number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            set: set.trim().to_uppercase(),
            collector_number: collector_number.into(),
        }
    }

    /// True when `set`/`collector_number` designate the same printing,
    /// ignoring set-code case.
    pub fn same_printing(&self, set: &str, collector_number: &str) -> bool {
        self.set.eq_ignore_ascii_case(set) && self.collector_number == collector_number
    }
}

impl fmt::Display for CardIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {}", self.name, self.set, self.collector_number)
    }
}

// ---------------------------------------------------------------------------
// CardFace — One face of a multi-faced card
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
}

// ---------------------------------------------------------------------------
// CardDetails — Authoritative card attributes (Scryfall card object subset)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardDetails {
    pub name: String,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub color_identity: ColorSet,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub rarity: Option<String>,
    #[serde(default)]
    pub set: String,
    #[serde(default)]
    pub collector_number: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
}

impl CardDetails {
    /// Fill oracle text and mana cost from `card_faces` when the top-level
    /// fields are absent (two-faced layouts).
    pub fn normalized(mut self) -> Self {
        if self.oracle_text.is_none() && !self.card_faces.is_empty() {
            let joined: Vec<&str> = self
                .card_faces
                .iter()
                .filter_map(|f| f.oracle_text.as_deref())
                .collect();
            if !joined.is_empty() {
                self.oracle_text = Some(joined.join("\n"));
            }
        }
        if self.mana_cost.is_none() {
            self.mana_cost = self.card_faces.first().and_then(|f| f.mana_cost.clone());
        }
        self
    }

    pub fn oracle_text(&self) -> &str {
        self.oracle_text.as_deref().unwrap_or("")
    }

    pub fn mana_cost(&self) -> &str {
        self.mana_cost.as_deref().unwrap_or("")
    }

    pub fn rarity(&self) -> &str {
        self.rarity.as_deref().unwrap_or("common")
    }

    /// Set code in uppercase, the way inventory files write it.
    pub fn set_code(&self) -> String {
        self.set.to_uppercase()
    }

    /// Card types before the em-dash, e.g. `["Legendary", "Creature"]`.
    pub fn card_types(&self) -> Vec<&str> {
        self.type_line
            .split('\u{2014}')
            .next()
            .unwrap_or("")
            .split_whitespace()
            .collect()
    }

    fn has_type(&self, wanted: &str) -> bool {
        self.card_types()
            .iter()
            .any(|t| t.eq_ignore_ascii_case(wanted))
    }

    pub fn is_legendary(&self) -> bool {
        self.has_type("legendary")
    }

    pub fn is_creature(&self) -> bool {
        self.has_type("creature")
    }

    pub fn is_planeswalker(&self) -> bool {
        self.has_type("planeswalker")
    }

    pub fn is_land(&self) -> bool {
        self.has_type("land")
    }

    pub fn is_basic_land(&self) -> bool {
        self.is_land() && self.has_type("basic")
    }

    /// Legendary creature or legendary planeswalker: the shape the
    /// commander search accepts.
    pub fn is_commander_candidate(&self) -> bool {
        let type_line = self.type_line.to_lowercase();
        type_line.contains("legendary")
            && (type_line.contains("creature") || type_line.contains("planeswalker"))
    }

    /// Stricter check used when building: a legendary creature, or a
    /// planeswalker whose text says it can be your commander.
    pub fn can_lead_deck(&self) -> bool {
        let type_line = self.type_line.to_lowercase();
        let legendary_creature = type_line.contains("legendary") && type_line.contains("creature");
        let planeswalker_commander = type_line.contains("planeswalker")
            && self
                .oracle_text()
                .to_lowercase()
                .contains("can be your commander");
        legendary_creature || planeswalker_commander
    }

    /// Minimal details for a synthesized basic land.
    pub fn basic_land_stub(name: &str, set: &str, collector_number: &str) -> Self {
        Self {
            name: name.to_string(),
            type_line: format!("Basic Land \u{2014} {name}"),
            set: set.to_lowercase(),
            collector_number: collector_number.to_string(),
            ..Default::default()
        }
    }
}
