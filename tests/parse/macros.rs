//! Integration tests for `#DEFINE` macro tables

use ddfkit::parse::MacroTable;

#[test]
fn expansion_is_whole_token_only() {
    let mut macros = MacroTable::new();
    macros.add("GRUNT_SPEED", "8").unwrap();

    assert_eq!(macros.expand("GRUNT_SPEED"), "8");
    assert_eq!(macros.expand("grunt_speed"), "8");
    // substrings and supersets stay untouched
    assert_eq!(macros.expand("GRUNT_SPEED_FAST"), "GRUNT_SPEED_FAST");
    assert_eq!(macros.expand("SPEED"), "SPEED");
}

#[test]
fn redefinition_is_rejected() {
    let mut macros = MacroTable::new();
    macros.add("HEALTH", "100").unwrap();
    assert!(macros.add("HEALTH", "200").is_err());
    assert!(macros.add("health", "200").is_err());
    assert_eq!(macros.expand("HEALTH"), "100");
}

#[test]
fn clear_drops_everything() {
    let mut macros = MacroTable::new();
    macros.add("A", "1").unwrap();
    macros.clear();
    assert!(macros.is_empty());
    assert_eq!(macros.expand("A"), "A");
}
