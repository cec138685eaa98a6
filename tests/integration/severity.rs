//! Severity policy behavior across whole loads

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;
use ddfkit::tables::RefSlot;

const MISSING_REF: &str = "<THINGS>\n[IMP]\nRANGE_ATTACK=NO_SUCH_ATTACK;\n";
const UNKNOWN_COMMAND: &str = "<THINGS>\n[IMP]\nRADIUS=20;\nWIBBLE=1;\n";

#[test]
fn lax_loads_substitute_first_record_for_broken_references() {
    let policy = DiagPolicy {
        lax: true,
        ..DiagPolicy::default()
    };
    let mut loader = Loader::new(policy);
    loader
        .load_attacks(
            "punch.ddf",
            "<ATTACKS>\n[PLAYER_PUNCH]\nATTACKTYPE=CLOSECOMBAT;\nDAMAGE.VAL=2;\n",
        )
        .unwrap();
    loader.load_things("imp.ddf", MISSING_REF).unwrap();
    loader.finalize().unwrap();

    let imp = loader.thing_by_name("IMP").unwrap();
    let first = loader.attacks().first_enabled().unwrap();
    assert_eq!(loader.attacks().get(first).unwrap().base.name, "PLAYER_PUNCH");
    assert_eq!(imp.range_attack, RefSlot::Resolved(first));
}

#[test]
fn lax_loads_empty_out_unresolvable_references() {
    let policy = DiagPolicy {
        lax: true,
        ..DiagPolicy::default()
    };
    let mut loader = Loader::new(policy);
    loader.load_things("imp.ddf", MISSING_REF).unwrap();
    loader.finalize().unwrap();

    // no attack was ever defined, so there is nothing to substitute
    let imp = loader.thing_by_name("IMP").unwrap();
    assert_eq!(imp.range_attack, RefSlot::Empty);
}

#[test]
fn default_loads_fail_on_broken_references() {
    let mut loader = Loader::new(DiagPolicy::default());
    loader.load_things("imp.ddf", MISSING_REF).unwrap();
    assert!(loader.finalize().is_err());
}

#[test]
fn unknown_commands_warn_by_default() {
    let mut loader = Loader::new(DiagPolicy::default());
    loader.load_things("imp.ddf", UNKNOWN_COMMAND).unwrap();
    assert_eq!(loader.thing_by_name("IMP").unwrap().radius, 20.0);
}

#[test]
fn strict_loads_fail_on_unknown_commands() {
    let policy = DiagPolicy {
        strict: true,
        ..DiagPolicy::default()
    };
    let mut loader = Loader::new(policy);
    assert!(loader.load_things("imp.ddf", UNKNOWN_COMMAND).is_err());
}

#[test]
fn strict_loads_fail_on_bad_numeric_values() {
    let source = "<THINGS>\n[IMP]\nCASTORDER=FISH;\n";

    let mut tolerant = Loader::new(DiagPolicy::default());
    tolerant.load_things("imp.ddf", source).unwrap();
    assert_eq!(tolerant.thing_by_name("IMP").unwrap().castorder, 0);

    let policy = DiagPolicy {
        strict: true,
        ..DiagPolicy::default()
    };
    let mut strict = Loader::new(policy);
    assert!(strict.load_things("imp.ddf", source).is_err());
}
