//! Directive behavior across whole loads

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;

const BASE: &str = "<THINGS>\n\
    [BLOOD]\nSTATES(IDLE)=BLUD:A:8:NORMAL:NOTHING,#REMOVE;\n\
    [PUFF]\nSTATES(IDLE)=PUFF:A:4:NORMAL:NOTHING,#REMOVE;\n\
    [RESPAWN_FLASH]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n\
    [ITEM_RESPAWN]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n";

#[test]
fn clearall_retires_earlier_definitions() {
    let mut loader = Loader::new(DiagPolicy::default());
    loader.load_things("base.ddf", BASE).unwrap();
    loader
        .load_things("old.ddf", "<THINGS>\n[IMP:3001]\nRADIUS=20;\n")
        .unwrap();

    let replacement = format!(
        "<THINGS>\n#CLEARALL\n{}[DEMON:3002]\nRADIUS=30;\n",
        BASE.trim_start_matches("<THINGS>\n")
    );
    loader.load_things("total_conversion.ddf", &replacement).unwrap();
    loader.finalize().unwrap();

    assert!(loader.thing_by_name("IMP").is_none());
    assert!(loader.thing_by_number(3001).is_none());
    assert!(loader.thing_by_name("DEMON").is_some());
}

#[test]
fn version_gates_legacy_spellings() {
    // DAMAGE as a plain attack field is a retired spelling
    let legacy = "<ATTACKS>\n[ZAP]\nATTACKTYPE=SHOT;\nDAMAGE=8;\n";

    let mut old = Loader::new(DiagPolicy::default());
    old.load_attacks("old.ddf", &format!("<ATTACKS>\n#VERSION 1.27\n{}", &legacy[10..]))
        .unwrap();

    let mut new = Loader::new(DiagPolicy::default());
    assert!(new.load_attacks("new.ddf", legacy).is_err());
}

#[test]
fn version_persists_into_later_sources() {
    let mut loader = Loader::new(DiagPolicy::default());
    loader
        .load_sounds(
            "sounds.ddf",
            "<SOUNDS>\n#VERSION 1.27\n[X]\nLUMP_NAME=\"DSX\";\n",
        )
        .unwrap();

    // the legacy spelling is tolerated because the load is pinned to 1.27
    loader
        .load_attacks("old.ddf", "<ATTACKS>\n[ZAP]\nATTACKTYPE=SHOT;\nDAMAGE=8;\n")
        .unwrap();
    assert_eq!(loader.attacks().lookup("ZAP").unwrap().damage.nominal, 8.0);
}

#[test]
fn unsupported_versions_are_rejected() {
    let mut loader = Loader::new(DiagPolicy::default());
    let result = loader.load_sounds(
        "future.ddf",
        "<SOUNDS>\n#VERSION 9.99\n[X]\nLUMP_NAME=\"DSX\";\n",
    );
    assert!(result.is_err());
}
