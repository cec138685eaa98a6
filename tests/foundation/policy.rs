//! Integration tests for the severity policy

use ddfkit::foundation::{DiagPolicy, MAX_VERSION, MIN_VERSION, OBSOLETE_VERSION};

#[test]
fn version_constants_are_ordered() {
    assert!(MIN_VERSION < OBSOLETE_VERSION);
    assert!(OBSOLETE_VERSION <= MAX_VERSION);
}

#[test]
fn default_policy_warns_without_failing() {
    let p = DiagPolicy::default();
    assert!(!p.escalates());
    assert!(p.warnings_enabled());
    assert!(p.obsoletes_enabled());
}

#[test]
fn strict_beats_lax() {
    let p = DiagPolicy {
        strict: true,
        lax: true,
        ..DiagPolicy::default()
    };
    assert!(p.escalates());
    assert!(p.escalates_at(OBSOLETE_VERSION));
}

#[test]
fn version_gate_opens_at_threshold() {
    let old = DiagPolicy {
        version: OBSOLETE_VERSION - 1,
        ..DiagPolicy::default()
    };
    assert!(!old.escalates_at(OBSOLETE_VERSION));

    let new = DiagPolicy {
        version: OBSOLETE_VERSION,
        ..DiagPolicy::default()
    };
    assert!(new.escalates_at(OBSOLETE_VERSION));
}
