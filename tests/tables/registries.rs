//! Integration tests for definition registries

use ddfkit::tables::{Record, Registry, ThingRecord};

fn registry() -> Registry<ThingRecord> {
    let mut reg = Registry::new();
    reg.declare("IMP", 3001);
    reg.declare("DEMON", 3002);
    reg
}

#[test]
fn override_resets_fields_but_keeps_identity() {
    let mut reg = registry();
    reg.get_mut(0).unwrap().radius = 20.0;

    let idx = reg.declare("IMP", 0);
    assert_eq!(idx, 1, "overridden record moves to the end");
    let imp = reg.get(idx).unwrap();
    assert_eq!(imp.base().number, 3001);
    assert_eq!(imp.radius, ThingRecord::default().radius);
}

#[test]
fn extension_keeps_accumulated_fields() {
    let mut reg = registry();
    reg.get_mut(0).unwrap().spawnhealth = 60.0;

    let idx = reg.reopen("IMP").unwrap();
    assert_eq!(idx, 0, "extension does not reorder");
    assert_eq!(reg.get(idx).unwrap().spawnhealth, 60.0);
}

#[test]
fn internal_names_survive_a_clear() {
    let mut reg = registry();
    reg.declare("__ATKMOBJ_FIREBALL", 0);
    reg.clear_all();

    assert_eq!(reg.lookup_index("IMP"), None);
    assert!(reg.lookup_index("__ATKMOBJ_FIREBALL").is_some());
}

#[test]
fn numeric_lookup_follows_overrides() {
    let mut reg = registry();
    reg.declare("IMP", 0);

    let before = reg.lookup_number(3001);
    assert_eq!(before, Some(1), "the overridden IMP still answers to 3001");
    reg.seal();
    assert_eq!(reg.lookup_number(3001), before);
    assert_eq!(reg.lookup_number(3002), Some(0));
}

#[test]
fn spelling_variants_reach_the_same_record() {
    let mut reg = registry();
    reg.get_mut(0).unwrap().castorder = 3;
    assert_eq!(reg.lookup("imp").unwrap().castorder, 3);
    assert_eq!(reg.lookup("I M P").unwrap().castorder, 3);
}
