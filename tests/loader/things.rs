//! Integration tests for thing loading

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;
use ddfkit::tables::{StateLink, ThingFlags};

fn loader() -> Loader {
    let mut loader = Loader::new(DiagPolicy::default());
    loader
        .load_things(
            "base.ddf",
            "<THINGS>\n\
             [BLOOD]\nSTATES(IDLE)=BLUD:A:8:NORMAL:NOTHING,#REMOVE;\n\
             [PUFF]\nSTATES(IDLE)=PUFF:A:4:NORMAL:NOTHING,#REMOVE;\n\
             [RESPAWN_FLASH]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n\
             [ITEM_RESPAWN]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n",
        )
        .unwrap();
    loader
}

const IMP: &str = "<THINGS>\n\
    [IMP:3001]\n\
    SPAWNHEALTH=60;\n\
    RADIUS=20;\n\
    HEIGHT=56;\n\
    SPEED=8;\n\
    PAINCHANCE=66%;\n\
    SPECIAL=SOLID,SHOOTABLE,COUNT_AS_KILL;\n\
    STATES(IDLE)=TROO:A:10:NORMAL:LOOKOUT,TROO:B:10:NORMAL:LOOKOUT,#IDLE;\n";

#[test]
fn monster_round_trip() {
    let mut loader = loader();
    loader.load_things("imp.ddf", IMP).unwrap();
    loader.finalize().unwrap();

    let imp = loader.thing_by_name("IMP").unwrap();
    assert_eq!(imp.base.number, 3001);
    assert_eq!(imp.spawnhealth, 60.0);
    assert!((imp.painchance - 0.66).abs() < 1e-6);
    assert!(imp.flags.contains(ThingFlags::SOLID | ThingFlags::SHOOTABLE));
    assert!(loader.thing_by_number(3001).is_some());
}

#[test]
fn idle_chain_loops_back_to_its_start() {
    let mut loader = loader();
    loader.load_things("imp.ddf", IMP).unwrap();
    loader.finalize().unwrap();

    let imp = loader.thing_by_name("IMP").unwrap();
    let first = imp.states.idle;
    assert!(first > 0);

    let second = match loader.states().get(first).unwrap().next {
        StateLink::Absolute(n) => n,
        ref other => panic!("unresolved link {other:?}"),
    };
    assert_eq!(
        loader.states().get(second).unwrap().next,
        StateLink::Absolute(first)
    );
}

#[test]
fn later_source_overrides_and_resets() {
    let mut loader = loader();
    loader.load_things("imp.ddf", IMP).unwrap();
    loader
        .load_things("patch.ddf", "<THINGS>\n[IMP]\nSPAWNHEALTH=120;\n")
        .unwrap();
    loader.finalize().unwrap();

    let imp = loader.thing_by_name("IMP").unwrap();
    assert_eq!(imp.spawnhealth, 120.0);
    assert_eq!(imp.base.number, 3001, "number survives the override");
    assert_eq!(imp.height, 16.0, "other fields reset to defaults");
}

#[test]
fn extension_keeps_earlier_fields() {
    let mut loader = loader();
    loader.load_things("imp.ddf", IMP).unwrap();
    loader
        .load_things("patch.ddf", "<THINGS>\n[++IMP]\nSPAWNHEALTH=120;\n")
        .unwrap();
    loader.finalize().unwrap();

    let imp = loader.thing_by_name("IMP").unwrap();
    assert_eq!(imp.spawnhealth, 120.0);
    assert_eq!(imp.radius, 20.0);
}

#[test]
fn extending_an_unknown_entry_is_fatal() {
    let mut loader = loader();
    let result = loader.load_things("patch.ddf", "<THINGS>\n[++NOBODY]\nRADIUS=10;\n");
    assert!(result.is_err());
}

#[test]
fn nameless_entries_get_generated_names() {
    let mut loader = loader();
    loader
        .load_things("odd.ddf", "<THINGS>\n[]\nRADIUS=10;\n")
        .unwrap();

    let generated = loader
        .things()
        .iter()
        .find(|t| t.base.name.contains("UNNAMED_MOBJ"))
        .unwrap();
    assert!(generated.base.name.starts_with('_'));
    assert_eq!(generated.radius, 10.0);
}
