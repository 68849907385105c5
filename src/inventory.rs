//! Inventory text parsing and deck export formatting.
//!
//! One card per line: `<quantity> <card name> (<SET>) <collector number>[ *F*]`.
//! Lines that do not match are reported as [`InventoryIssue`]s and skipped.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::Result;
use crate::models::{CardIdentity, InventoryEntry, InventoryIssue, InventoryLoad};

static LINE_PATTERN: OnceLock<Regex> = OnceLock::new();

fn line_pattern() -> &'static Regex {
    LINE_PATTERN.get_or_init(|| {
        Regex::new(r"^(\d+)\s(.+?)\s\((.*?)\)\s*(\d+)(\s*\*[Ff]\*)?\s*$")
            .expect("inventory line pattern is valid")
    })
}

/// Parse a single trimmed, non-empty line.
pub fn parse_line(line: &str) -> Option<InventoryEntry> {
    let caps = line_pattern().captures(line.trim())?;
    let quantity: u32 = caps[1].parse().ok()?;
    let display_name = caps[2].trim().to_string();
    let set = caps[3].trim();
    let collector_number = caps[4].trim().to_string();
    let foil = caps.get(5).is_some();

    let lookup_name = match display_name.split_once("//") {
        Some((front, _)) => front.trim().to_string(),
        None => display_name.clone(),
    };

    Some(InventoryEntry {
        identity: CardIdentity::new(lookup_name, set, collector_number),
        display_name,
        quantity,
        foil,
    })
}

/// Parse inventory text. Blank lines are ignored; malformed lines are
/// collected with their 1-based line number.
pub fn parse_inventory(text: &str) -> InventoryLoad {
    let mut load = InventoryLoad::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Some(entry) => {
                if load.inventory.get(&entry.identity).is_some() {
                    log::debug!("Duplicate inventory line {} for {}", idx + 1, entry.identity);
                }
                load.inventory.insert(entry);
            }
            None => load.issues.push(InventoryIssue {
                line_number: idx + 1,
                line: line.to_string(),
            }),
        }
    }

    if !load.issues.is_empty() {
        log::warn!(
            "{} inventory line(s) skipped because of format errors",
            load.issues.len()
        );
    }
    log::info!("Loaded {} inventory entries", load.inventory.len());
    load
}

/// Read and parse an inventory file (UTF-8).
pub fn load_inventory<P: AsRef<Path>>(path: P) -> Result<InventoryLoad> {
    let text = fs::read_to_string(path)?;
    Ok(parse_inventory(&text))
}

/// Export line for one owned copy of an inventory entry, in the same
/// convention as the inventory file with the quantity fixed at 1.
pub fn export_line(entry: &InventoryEntry) -> String {
    let foil = if entry.foil { " *F*" } else { "" };
    format!(
        "1 {} ({}) {}{}",
        entry.display_name, entry.identity.set, entry.identity.collector_number, foil
    )
}
