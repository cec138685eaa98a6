//! Integration tests for generalized type decoding

use ddfkit::tables::{
    ActivatorFlags, GenCache, HeightBase, LightType, MoveType, RefSlot, TriggerKind, is_gen_line,
    is_gen_sector,
};

#[test]
fn generalized_ranges_exclude_classic_numbers() {
    // classic DOOM types stay below both ranges
    assert!(!is_gen_line(1));
    assert!(!is_gen_line(97));
    assert!(!is_gen_sector(9));
    assert!(!is_gen_sector(16));

    assert!(is_gen_line(0x2F80));
    assert!(is_gen_sector(0x20));
}

#[test]
fn lift_decoding() {
    let mut cache = GenCache::new();

    // lift range, speed=1, monsters allowed, delay=3
    let number = 0x3400 | (1 << 3) | (1 << 5) | (3 << 6);
    let line = cache.gen_line(number);

    assert_eq!(line.floor.kind, MoveType::MoveWaitReturn);
    assert_eq!(line.floor.speed_up, 2.0);
    assert_eq!(line.floor.wait, 350);
    assert_eq!(line.floor.sfx_start, RefSlot::Name("PSTART".into()));
    assert!(line.obj.contains(ActivatorFlags::MONSTER));
}

#[test]
fn perpetual_lift_runs_continuously() {
    let mut cache = GenCache::new();
    let line = cache.gen_line(0x3400 | (3 << 8));
    assert_eq!(line.floor.kind, MoveType::Continuous);
    assert!(line.floor.otherref.highest);
}

#[test]
fn ceiling_decoding() {
    let mut cache = GenCache::new();

    // ceiling range, dir=down, target=HnC
    let line = cache.gen_line(0x4000 | (1 << 7));
    assert_eq!(line.ceil.kind, MoveType::Once);
    assert_eq!(line.ceil.speed_down, 1.0);
    assert_eq!(line.ceil.destref.base, HeightBase::Surrounding);
    assert!(line.ceil.destref.ceiling);
    assert_eq!(line.ceil.sfx_down, RefSlot::Name("STNMOV".into()));
}

#[test]
fn decoded_records_carry_internal_names() {
    let mut cache = GenCache::new();
    assert_eq!(cache.gen_line(0x6001).base.name, "_GEN_LINE_6001");
    assert_eq!(cache.gen_sector(0x21).base.name, "_GEN_SECTOR_021");
}

#[test]
fn sector_bits_compose() {
    let mut cache = GenCache::new();

    // flicker lighting plus 20-damage plus secret
    let number = 17 | (3 << 5) | (1 << 7);
    let sec = cache.gen_sector(number);

    assert_eq!(sec.light.kind, LightType::FireFlicker);
    assert_eq!(sec.damage.nominal, 20.0);
    assert!(sec.secret);
}

#[test]
fn trigger_bits_are_shared_by_every_range() {
    let mut cache = GenCache::new();
    for base in [0x2F80, 0x3000, 0x3400, 0x3800, 0x3c00, 0x4000, 0x6000] {
        let line = cache.gen_line(base | 0x2);
        assert_eq!(line.trigger, TriggerKind::Pushable);
        assert_eq!(line.count, 1);
    }
}
