//! Integration tests for definition-name comparison

use std::cmp::Ordering;

use ddfkit::foundation::{cmp_names, names_equal};

#[test]
fn classic_spelling_variants_match() {
    assert!(names_equal("LOST_SOUL", "LOSTSOUL"));
    assert!(names_equal("Lost Soul", "lost_soul"));
    assert!(names_equal("SPAWN_HEALTH", "SpawnHealth"));
}

#[test]
fn distinct_names_stay_distinct() {
    assert!(!names_equal("IMP", "IMPS"));
    assert!(!names_equal("DEMON", "SPECTRE"));
}

#[test]
fn ordering_is_consistent_with_equality() {
    assert_eq!(cmp_names("BARON", "baron"), Ordering::Equal);
    assert_eq!(cmp_names("ARACHNOTRON", "BARON"), Ordering::Less);
    assert_eq!(cmp_names("ZOMBIE", "BARON"), Ordering::Greater);
}

#[test]
fn empty_and_filler_names() {
    assert!(names_equal("", "___"));
    assert!(!names_equal("_A", ""));
}
