use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// One of the five colors of Magic, in canonical WUBRG order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    /// The single-letter mana symbol (`W`, `U`, `B`, `R`, `G`).
    pub const fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Color> {
        match symbol.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// ColorSet
// ---------------------------------------------------------------------------

/// A set of colors stored as bit flags. The empty set is colorless.
///
/// Serializes as a list of symbols (`["W", "U"]`), the shape Scryfall uses
/// for `color_identity`. Unknown symbols are ignored on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: Self = Self(0);

    pub const fn new() -> Self {
        Self(0)
    }

    pub const fn from_color(color: Color) -> Self {
        Self(1 << color as u8)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, color: Color) -> bool {
        self.0 & Self::from_color(color).0 != 0
    }

    /// Returns true if every color of `self` is also in `other`.
    pub const fn is_subset(self, other: ColorSet) -> bool {
        self.0 & other.0 == self.0
    }

    pub const fn union(self, other: ColorSet) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: ColorSet) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub const fn with(self, color: Color) -> Self {
        self.union(Self::from_color(color))
    }

    pub fn insert(&mut self, color: Color) {
        *self = self.with(color);
    }

    /// Iterate the colors in WUBRG order.
    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }

    /// Symbols in WUBRG order, e.g. `"WUG"`; empty for colorless.
    pub fn symbols(self) -> String {
        self.iter().map(Color::symbol).collect()
    }
}

impl FromIterator<Color> for ColorSet {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        iter.into_iter().fold(ColorSet::new(), ColorSet::with)
    }
}

impl From<Vec<String>> for ColorSet {
    fn from(symbols: Vec<String>) -> Self {
        symbols
            .iter()
            .filter_map(|s| s.chars().next())
            .filter_map(Color::from_symbol)
            .collect()
    }
}

impl From<ColorSet> for Vec<String> {
    fn from(set: ColorSet) -> Self {
        set.iter().map(|c| c.symbol().to_string()).collect()
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "C")
        } else {
            write!(f, "{}", self.symbols())
        }
    }
}

/// Parses a symbol string such as `"WU"` or `"bg"`. `"C"` (alone) means
/// colorless and yields the empty set.
impl FromStr for ColorSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("c") {
            return Ok(ColorSet::COLORLESS);
        }
        let mut set = ColorSet::new();
        for ch in trimmed.chars().filter(|c| !c.is_whitespace() && *c != ',') {
            match Color::from_symbol(ch) {
                Some(color) => set.insert(color),
                None => return Err(format!("Unknown color symbol '{ch}' in \"{s}\"")),
            }
        }
        Ok(set)
    }
}
