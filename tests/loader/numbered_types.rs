//! Integration tests for numbered line and sector types

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;
use ddfkit::tables::{ExitKind, KeyFlags, LightType, TriggerKind};

fn loader() -> Loader {
    Loader::new(DiagPolicy::default())
}

#[test]
fn lines_answer_to_their_entry_number() {
    let mut loader = loader();
    loader
        .load_lines(
            "lines.ddf",
            "<LINES>\n\
             [26]\n\
             TYPE=PUSH;\n\
             KEYS=BLUE_CARD;\n\
             COUNT=-1;\n\
             [1]\n\
             TYPE=MANUAL;\n",
        )
        .unwrap();
    loader.finalize().unwrap();

    let door = loader.line_by_number(26).unwrap();
    assert_eq!(door.trigger, TriggerKind::Pushable);
    assert!(door.keys.contains(KeyFlags::BLUE_CARD));
    assert_eq!(door.count, -1);

    assert_eq!(loader.line_by_number(1).unwrap().trigger, TriggerKind::Manual);
}

#[test]
fn sectors_answer_to_their_entry_number() {
    let mut loader = loader();
    loader
        .load_sectors(
            "sectors.ddf",
            "<SECTORS>\n[9]\nSECRET=TRUE;\n[11]\nEXIT=NORMAL;\nDAMAGE.VAL=20;\n",
        )
        .unwrap();
    loader.finalize().unwrap();

    assert!(loader.sector_by_number(9).unwrap().secret);
    let pit = loader.sector_by_number(11).unwrap();
    assert_eq!(pit.exit, ExitKind::Normal);
    assert_eq!(pit.damage.nominal, 20.0);
}

#[test]
fn generalized_numbers_decode_on_demand() {
    let mut loader = loader();
    loader.finalize().unwrap();

    let sec = loader.sector_by_number(0x21).unwrap();
    assert_eq!(sec.light.kind, LightType::Flash);
    assert_eq!(sec.base.number, 0x21);

    assert!(loader.sector_by_number(0x1F).is_none());
}

#[test]
fn explicit_definitions_beat_generalized_decoding() {
    let mut loader = loader();
    // 24577 is 0x6001, inside the generalized floor range
    loader
        .load_lines("lines.ddf", "<LINES>\n[24577]\nTYPE=SHOOT;\n")
        .unwrap();
    loader.finalize().unwrap();

    let line = loader.line_by_number(24577).unwrap();
    assert_eq!(line.trigger, TriggerKind::Shootable);
}

#[test]
fn gen_cache_survives_until_cleared() {
    let mut loader = loader();
    loader.finalize().unwrap();

    let first = loader.line_by_number(0x6011).unwrap().clone();
    loader.clear_gen_cache();
    let second = loader.line_by_number(0x6011).unwrap();
    assert_eq!(&first, second, "re-decoding is deterministic");
}

#[test]
fn non_numeric_line_names_are_rejected() {
    let mut loader = loader();
    assert!(
        loader
            .load_lines("lines.ddf", "<LINES>\n[DOOR]\nTYPE=MANUAL;\n")
            .is_err()
    );
}
