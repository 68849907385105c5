//! Tests for inventory parsing, lookup and export formatting.

use autodeck::inventory::{export_line, load_inventory, parse_inventory, parse_line};
use autodeck::CardIdentity;
use std::io::Write;
use tempfile::NamedTempFile;

// ---------------------------------------------------------------------------
// parse_line
// ---------------------------------------------------------------------------

#[test]
fn parses_quantity_name_set_and_number() {
    let entry = parse_line("2 Sol Ring (C13) 259").unwrap();
    assert_eq!(entry.quantity, 2);
    assert_eq!(entry.display_name, "Sol Ring");
    assert_eq!(entry.identity, CardIdentity::new("Sol Ring", "C13", "259"));
    assert!(!entry.foil);
}

#[test]
fn parses_foil_marker() {
    let entry = parse_line("1 Lightning Greaves (2XM) 256 *F*").unwrap();
    assert!(entry.foil);
    assert_eq!(entry.identity.collector_number, "256");
    assert!(parse_line("1 Lightning Greaves (2XM) 256 *f*").unwrap().foil);
}

#[test]
fn set_code_is_uppercased() {
    let entry = parse_line("1 Arcane Signet (m3c) 283").unwrap();
    assert_eq!(entry.identity.set, "M3C");
}

#[test]
fn name_may_contain_punctuation() {
    let entry = parse_line("1 Urza, Lord High Artificer (MH1) 75").unwrap();
    assert_eq!(entry.display_name, "Urza, Lord High Artificer");
    assert_eq!(entry.identity.set, "MH1");
}

#[test]
fn two_faced_name_looks_up_front_face() {
    let entry = parse_line("1 Delver of Secrets // Insectile Aberration (ISD) 51").unwrap();
    assert_eq!(entry.identity.name, "Delver of Secrets");
    assert_eq!(entry.display_name, "Delver of Secrets // Insectile Aberration");
}

#[test]
fn zero_quantity_parses_but_is_unavailable() {
    let entry = parse_line("0 Mana Crypt (2XM) 270").unwrap();
    assert_eq!(entry.quantity, 0);
    assert!(!entry.is_available());
}

#[test]
fn malformed_lines_are_rejected() {
    assert!(parse_line("abc Sol Ring (C13) 259").is_none());
    assert!(parse_line("1 Sol Ring C13 259").is_none());
    assert!(parse_line("1 Sol Ring (C13)").is_none());
    assert!(parse_line("Sol Ring").is_none());
}

// ---------------------------------------------------------------------------
// parse_inventory
// ---------------------------------------------------------------------------

#[test]
fn blank_lines_are_ignored_and_bad_lines_reported() {
    let text = "1 Sol Ring (C13) 259\n\n   \nnot a card line\n3 Forest (STA) 67\n";
    let load = parse_inventory(text);
    assert_eq!(load.inventory.len(), 2);
    assert_eq!(load.issues.len(), 1);
    assert_eq!(load.issues[0].line_number, 4);
    assert_eq!(load.issues[0].line, "not a card line");
    assert!(load.issues[0].to_string().contains("Line 4"));
}

#[test]
fn duplicate_identity_keeps_last_line() {
    let text = "1 Sol Ring (C13) 259\n4 Sol Ring (C13) 259\n";
    let load = parse_inventory(text);
    assert_eq!(load.inventory.len(), 1);
    let entry = load
        .inventory
        .get(&CardIdentity::new("Sol Ring", "C13", "259"))
        .unwrap();
    assert_eq!(entry.quantity, 4);
}

#[test]
fn distinct_printings_are_separate_entries() {
    let text = "1 Sol Ring (C13) 259\n1 Sol Ring (CMR) 472\n";
    let load = parse_inventory(text);
    assert_eq!(load.inventory.len(), 2);
    assert_eq!(load.inventory.total_quantity(), 2);
}

#[test]
fn entries_keep_file_order() {
    let text = "1 Zombify (ODY) 159\n1 Animate Dead (EMA) 78\n";
    let load = parse_inventory(text);
    let names: Vec<&str> = load.inventory.iter().map(|e| e.display_name.as_str()).collect();
    assert_eq!(names, vec!["Zombify", "Animate Dead"]);
}

#[test]
fn find_by_name_ignores_case() {
    let load = parse_inventory("1 Delver of Secrets // Insectile Aberration (ISD) 51\n");
    assert!(load.inventory.find_by_name("delver of secrets").is_some());
    assert!(load
        .inventory
        .find_by_name("Delver of Secrets // Insectile Aberration")
        .is_some());
    assert!(load.inventory.find_by_name("Insectile Aberration").is_none());
}

#[test]
fn load_inventory_reads_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "1 Sol Ring (C13) 259").unwrap();
    writeln!(file, "2 Command Tower (CMR) 350 *F*").unwrap();
    let load = load_inventory(file.path()).unwrap();
    assert_eq!(load.inventory.len(), 2);
    assert!(load.issues.is_empty());
}

#[test]
fn load_inventory_missing_file_is_error() {
    assert!(load_inventory("/definitely/not/here/inventory.txt").is_err());
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[test]
fn export_fixes_quantity_at_one() {
    let entry = parse_line("2 Sol Ring (C13) 259").unwrap();
    assert_eq!(export_line(&entry), "1 Sol Ring (C13) 259");
}

#[test]
fn export_keeps_foil_marker_and_full_name() {
    let entry = parse_line("3 Delver of Secrets // Insectile Aberration (isd) 51 *F*").unwrap();
    assert_eq!(
        export_line(&entry),
        "1 Delver of Secrets // Insectile Aberration (ISD) 51 *F*"
    );
}

#[test]
fn exported_line_parses_back() {
    let entry = parse_line("5 Arcane Signet (M3C) 283 *F*").unwrap();
    let again = parse_line(&export_line(&entry)).unwrap();
    assert_eq!(again.identity, entry.identity);
    assert_eq!(again.quantity, 1);
    assert!(again.foil);
}
