//! Keyword-based card classification.
//!
//! Every card maps to a set of [`Category`] labels. The label-to-keyword
//! table is static: each keyworded category owns an ordered list of lowercase
//! phrases, and a card is tagged when any phrase occurs in its oracle text or
//! type line.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{CardDetails, InventoryEntry};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A thematic tag for a card, also used as a deck-wide strategy preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Ramp,
    Draw,
    SpotRemoval,
    BoardWipe,
    Token,
    Voltron,
    Stax,
    Mill,
    Discard,
    Aristocrats,
    Reanimator,
    Spellslinger,
    EnchantmentsMatter,
    ArtifactsMatter,
    CountersMatter,
    Superfriends,
    Tribal,
    GroupHug,
    GroupSlug,
    PillowFort,
    Theft,
    Threat,
    Utility,
    FlexSlots,
}

impl Category {
    /// Categories that carry a keyword list, in table order.
    pub const KEYWORDED: [Category; 21] = [
        Category::Ramp,
        Category::Draw,
        Category::SpotRemoval,
        Category::BoardWipe,
        Category::Token,
        Category::Voltron,
        Category::Stax,
        Category::Mill,
        Category::Discard,
        Category::Aristocrats,
        Category::Reanimator,
        Category::Spellslinger,
        Category::EnchantmentsMatter,
        Category::ArtifactsMatter,
        Category::CountersMatter,
        Category::Superfriends,
        Category::Tribal,
        Category::GroupHug,
        Category::GroupSlug,
        Category::PillowFort,
        Category::Theft,
    ];

    /// Fill order for the general deck skeleton, after any chosen strategy.
    pub const GENERAL_FILL_ORDER: [Category; 7] = [
        Category::Ramp,
        Category::Draw,
        Category::SpotRemoval,
        Category::BoardWipe,
        Category::Threat,
        Category::Utility,
        Category::FlexSlots,
    ];

    /// Categories whose presence keeps a creature from also counting as a
    /// plain threat.
    const THREAT_EXCLUSIONS: [Category; 6] = [
        Category::Token,
        Category::Voltron,
        Category::Aristocrats,
        Category::Reanimator,
        Category::Superfriends,
        Category::Tribal,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Category::Ramp => "ramp",
            Category::Draw => "draw",
            Category::SpotRemoval => "spot_removal",
            Category::BoardWipe => "board_wipe",
            Category::Token => "token",
            Category::Voltron => "voltron",
            Category::Stax => "stax",
            Category::Mill => "mill",
            Category::Discard => "discard",
            Category::Aristocrats => "aristocrats",
            Category::Reanimator => "reanimator",
            Category::Spellslinger => "spellslinger",
            Category::EnchantmentsMatter => "enchantments_matter",
            Category::ArtifactsMatter => "artifacts_matter",
            Category::CountersMatter => "counters_matter",
            Category::Superfriends => "superfriends",
            Category::Tribal => "tribal",
            Category::GroupHug => "group_hug",
            Category::GroupSlug => "group_slug",
            Category::PillowFort => "pillow_fort",
            Category::Theft => "theft",
            Category::Threat => "threat",
            Category::Utility => "utility",
            Category::FlexSlots => "flex_slots",
        }
    }

    /// Human-readable title, e.g. `"Spot Removal"`.
    pub fn title(self) -> String {
        self.label()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Keyword phrases for this category. Empty for `Threat`, `Utility` and
    /// `FlexSlots`, which are assigned structurally.
    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Ramp => &[
                "add",
                "mana",
                "search your library for a basic land",
                "untap",
                "produces",
                "mana value",
                "tutor for a land",
            ],
            Category::Draw => &[
                "draw a card",
                "scry",
                "look at the top",
                "reveal cards until",
                "card advantage",
                "cantrip",
                "wheel",
            ],
            Category::SpotRemoval => &[
                "destroy target",
                "exile target",
                "return target",
                "counter target spell",
                "deal damage to target creature",
                "damage to target planeswalker",
                "fight",
                "sacrifices a permanent",
            ],
            Category::BoardWipe => &[
                "destroy all",
                "exile all",
                "return all",
                "sacrifice all creatures",
                "nonland permanents",
                "all permanents",
                "deal damage to all creatures",
            ],
            Category::Token => &[
                "create",
                "token creature",
                "populate",
                "tokens you control",
                "token in play",
                "creature token",
            ],
            Category::Voltron => &[
                "attach",
                "equip",
                "aura",
                "power and toughness",
                "first strike",
                "lifelink",
                "trample",
                "flying",
                "indestructible",
                "double strike",
                "hexproof",
                "shroud",
                "vigilance",
                "unblockable",
                "commander damage",
            ],
            Category::Stax => &[
                "can't",
                "skip your",
                "each opponent sacrifices",
                "nontoken creatures don't untap",
                "enchant player",
                "curse",
                "extra cost",
                "pay life",
                "tax",
                "players can't",
                "only one",
                "more to cast",
                "prevent untap",
            ],
            Category::Mill => &[
                "mill",
                "put the top cards",
                "target player exiles",
                "graveyard from library",
                "library into their graveyard",
                "each opponent mills",
            ],
            Category::Discard => &[
                "discard a card",
                "hand",
                "opponent chooses",
                "target player discards",
                "discards a card",
                "each opponent discards",
            ],
            Category::Aristocrats => &[
                "sacrifice a creature",
                "whenever you sacrifice",
                "death trigger",
                "dies",
                "creature leaves the battlefield",
                "drain life",
                "lose life for each creature",
            ],
            Category::Reanimator => &[
                "return target creature card from your graveyard to the battlefield",
                "from graveyard to battlefield",
                "reanimate",
                "graveyard to play",
                "unearth",
                "embrace death",
            ],
            Category::Spellslinger => &[
                "whenever you cast an instant or sorcery spell",
                "copy target instant or sorcery spell",
                "storm",
                "magecraft",
                "spells you control",
                "whenever you cast a noncreature spell",
                "noncreature spell",
                "cast from graveyard",
                "extra turns",
            ],
            Category::EnchantmentsMatter => &[
                "enchantment enters the battlefield",
                "enchantments you control",
                "aura",
                "when you cast an enchantment spell",
                "enchantress",
            ],
            Category::ArtifactsMatter => &[
                "artifact enters the battlefield",
                "artifacts you control",
                "metalcraft",
                "affinity",
                "when you cast an artifact spell",
                "historic spell",
            ],
            Category::CountersMatter => &[
                "+1/+1 counter",
                "put a counter",
                "proliferate",
                "haste if it has a counter",
                "counter on it",
                "remove a counter",
                "double counters",
            ],
            Category::Superfriends => &[
                "planeswalker enters the battlefield",
                "planeswalkers you control",
                "loyalty abilities",
                "emblem",
                "loyalty counter",
            ],
            Category::Tribal => &[
                "elf",
                "goblin",
                "zombie",
                "dragon",
                "angel",
                "human",
                "wizard",
                "vampire",
                "cleric",
                "warrior",
                "merfolk",
                "slivers",
                "cat",
                "dog",
                "elemental",
            ],
            Category::GroupHug => &[
                "each player draws",
                "target player draws",
                "each player gains",
                "everyone draws",
                "gain life",
                "each player creates a token",
                "all players",
            ],
            Category::GroupSlug => &[
                "each opponent loses life",
                "whenever a player casts a spell",
                "damage to each opponent",
                "each opponent sacrifices a permanent",
                "you lose life",
                "punish",
                "pay life",
                "opponent takes damage",
            ],
            Category::PillowFort => &[
                "can't attack you",
                "cost to attack",
                "prevent all combat damage",
                "shroud",
                "hexproof",
                "protection from",
                "untargetable",
            ],
            Category::Theft => &[
                "gain control of target",
                "take control of",
                "steal",
                "opponent controls",
                "exile target permanent an opponent controls",
                "copy target spell an opponent controls",
            ],
            Category::Threat | Category::Utility | Category::FlexSlots => &[],
        }
    }

    /// True for categories a player can pick as a deck strategy.
    pub fn is_strategy(self) -> bool {
        !self.keywords().is_empty()
    }

    /// Parse a user-chosen strategy. Deck categories without keywords
    /// (threat, utility, flex slots) are rejected.
    pub fn parse_strategy(s: &str) -> Result<Self, String> {
        let category: Category = s.parse()?;
        if category.is_strategy() {
            Ok(category)
        } else {
            Err(format!("'{}' is a deck category, not a strategy", category.label()))
        }
    }

    /// One-line explanation of the strategy this category stands for.
    pub const fn description(self) -> &'static str {
        match self {
            Category::Ramp => "Produce more mana than usual to cast expensive spells ahead of schedule.",
            Category::Draw => "Keep the hand full and out-card the table over a long game.",
            Category::SpotRemoval => "Answer individual threats as they appear.",
            Category::BoardWipe => "Reset the battlefield when opponents overextend.",
            Category::Token => "Flood the board with creature tokens to overwhelm or fuel mass effects.",
            Category::Voltron => "Pile equipment and auras on one creature and win through commander damage.",
            Category::Stax => "Restrict opponents' mana, cards and permanents until they cannot function.",
            Category::Mill => "Empty opponents' libraries so they lose by drawing from nothing.",
            Category::Discard => "Strip opponents' hands to limit their options and answers.",
            Category::Aristocrats => "Sacrifice your own creatures for value such as life drain or card draw.",
            Category::Reanimator => "Fill the graveyard with big creatures and bring them back cheaply.",
            Category::Spellslinger => "Chain instants and sorceries to trigger your permanents.",
            Category::EnchantmentsMatter => "Play many enchantments and profit from each one that lands.",
            Category::ArtifactsMatter => "Abuse synergies that reward having and casting artifacts.",
            Category::CountersMatter => "Stack +1/+1 and other counters to grow threats or trigger payoffs.",
            Category::Superfriends => "Deploy and protect several planeswalkers until their ultimates win.",
            Category::Tribal => "Build around one creature type and its shared synergies.",
            Category::GroupHug => "Hand resources to every player, often hiding a win condition.",
            Category::GroupSlug => "Punish every player for ordinary actions and drain the table slowly.",
            Category::PillowFort => "Make yourself too costly or too protected to attack.",
            Category::Theft => "Take opponents' permanents and spells and use them against them.",
            Category::Threat => "Creatures and planeswalkers that pressure opponents on their own.",
            Category::Utility => "Cards that fill support roles without a clear theme.",
            Category::FlexSlots => "Open slots for personal picks.",
        }
    }

    /// Number of keyword occurrences in `text` (lowercased by the caller).
    /// Every non-overlapping occurrence counts, not just presence.
    pub fn keyword_occurrences(self, text: &str) -> usize {
        self.keywords()
            .iter()
            .map(|keyword| text.matches(keyword).count())
            .sum()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '-'], "_");
        Category::KEYWORDED
            .iter()
            .chain(Category::GENERAL_FILL_ORDER.iter())
            .copied()
            .find(|c| c.label() == wanted)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

// ---------------------------------------------------------------------------
// classify
// ---------------------------------------------------------------------------

/// Classify a card into its categories. Never returns an empty set.
pub fn classify(card: &CardDetails) -> BTreeSet<Category> {
    let oracle_text = card.oracle_text().to_lowercase();
    let type_line = card.type_line.to_lowercase();

    let mut categories: BTreeSet<Category> = Category::KEYWORDED
        .iter()
        .copied()
        .filter(|category| {
            category
                .keywords()
                .iter()
                .any(|k| oracle_text.contains(k) || type_line.contains(k))
        })
        .collect();

    if (type_line.contains("creature") || type_line.contains("planeswalker"))
        && !Category::THREAT_EXCLUSIONS
            .iter()
            .any(|c| categories.contains(c))
    {
        categories.insert(Category::Threat);
    }

    // Untagged artifacts, enchantments and lands are utility; so is anything
    // else nothing matched.
    if categories.is_empty() {
        categories.insert(Category::Utility);
    }

    categories
}

// ---------------------------------------------------------------------------
// ClassifiedCard
// ---------------------------------------------------------------------------

/// An inventory entry joined with its card data and categories.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedCard {
    pub entry: InventoryEntry,
    pub details: CardDetails,
    pub categories: BTreeSet<Category>,
}

impl ClassifiedCard {
    pub fn new(entry: InventoryEntry, details: CardDetails) -> Self {
        let categories = classify(&details);
        Self {
            entry,
            details,
            categories,
        }
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.categories.contains(&category)
    }
}
