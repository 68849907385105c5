use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::card::CardIdentity;

// ---------------------------------------------------------------------------
// InventoryEntry — One owned printing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    /// Lookup identity; the name is the front face of two-faced cards.
    pub identity: CardIdentity,
    /// Name exactly as written in the inventory file.
    pub display_name: String,
    pub quantity: u32,
    pub foil: bool,
}

impl InventoryEntry {
    /// Availability is a yes/no gate: any owned copy makes the printing
    /// eligible once, regardless of how many copies are owned.
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }
}

// ---------------------------------------------------------------------------
// InventoryIssue — A skipped inventory line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryIssue {
    /// 1-based line number in the source text.
    pub line_number: usize,
    pub line: String,
}

impl std::fmt::Display for InventoryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line {} skipped (unrecognized format): '{}'",
            self.line_number, self.line
        )
    }
}

// ---------------------------------------------------------------------------
// Inventory — Owned printings keyed by identity, in file order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    index: HashMap<CardIdentity, usize>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. A later entry with the same identity replaces the
    /// earlier one in place; quantities are not summed.
    pub fn insert(&mut self, entry: InventoryEntry) {
        match self.index.get(&entry.identity) {
            Some(&pos) => self.entries[pos] = entry,
            None => {
                self.index.insert(entry.identity.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, identity: &CardIdentity) -> Option<&InventoryEntry> {
        self.index.get(identity).map(|&pos| &self.entries[pos])
    }

    /// First entry whose lookup or display name matches, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| {
            e.identity.name.eq_ignore_ascii_case(name) || e.display_name.eq_ignore_ascii_case(name)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter()
    }

    pub fn identities(&self) -> Vec<CardIdentity> {
        self.entries.iter().map(|e| e.identity.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of owned copies across all printings.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }
}

impl FromIterator<InventoryEntry> for Inventory {
    fn from_iter<I: IntoIterator<Item = InventoryEntry>>(iter: I) -> Self {
        let mut inventory = Inventory::new();
        for entry in iter {
            inventory.insert(entry);
        }
        inventory
    }
}

// ---------------------------------------------------------------------------
// InventoryLoad — Parse result: entries plus skipped lines
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InventoryLoad {
    pub inventory: Inventory,
    pub issues: Vec<InventoryIssue>,
}
