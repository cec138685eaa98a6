//! Integration tests for attack and weapon loading

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;
use ddfkit::tables::{Ammo, RefSlot};

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
        .load_sounds(
            "sounds.ddf",
            "<SOUNDS>\n[FIRSHT]\nLUMP_NAME=\"DSFIRSHT\";\n[PISTOL]\nLUMP_NAME=\"DSPISTOL\";\n",
        )
        .unwrap();
    loader
}

const FIREBALL: &str = "<ATTACKS>\n\
    [IMP_FIREBALL]\n\
    ATTACKTYPE=PROJECTILE;\n\
    ATTACK_HEIGHT=32;\n\
    ATTACKRANGE=2048;\n\
    DAMAGE.VAL=8;\n\
    ATTEMPT_SOUND=FIRSHT;\n\
    RADIUS=6;\n\
    HEIGHT=8;\n\
    SPEED=10;\n\
    SPECIAL=MISSILE,NOGRAVITY;\n\
    STATES(IDLE)=BAL1:A:4:BRIGHT:NOTHING,#IDLE;\n\
    STATES(DEATH)=BAL1:C:6:BRIGHT:NOTHING,#REMOVE;\n";

#[test]
fn projectile_attack_builds_a_companion_object() {
    let mut loader = loader();
    loader.load_attacks("attacks.ddf", FIREBALL).unwrap();
    loader.finalize().unwrap();

    let atk = loader.attacks().lookup("IMP_FIREBALL").unwrap();
    assert!(matches!(atk.mobj, RefSlot::Resolved(_)));

    let companion = loader.thing_by_name("__ATKMOBJ_IMP_FIREBALL").unwrap();
    assert_eq!(companion.radius, 6.0);
    assert!(companion.states.idle > 0);
}

#[test]
fn attack_sounds_resolve_against_the_sound_registry() {
    let mut loader = loader();
    loader.load_attacks("attacks.ddf", FIREBALL).unwrap();
    loader.finalize().unwrap();

    let atk = loader.attacks().lookup("IMP_FIREBALL").unwrap();
    let idx = match atk.init_sound {
        RefSlot::Resolved(i) => i,
        ref other => panic!("unresolved sound {other:?}"),
    };
    assert_eq!(loader.sounds().get(idx).unwrap().base.name, "FIRSHT");
}

#[test]
fn missing_sound_reference_fails_finalize() {
    let mut loader = loader();
    loader
        .load_attacks(
            "attacks.ddf",
            "<ATTACKS>\n[ZAP]\nATTACKTYPE=SHOT;\nATTEMPT_SOUND=NOSUCH;\n",
        )
        .unwrap();
    assert!(loader.finalize().is_err());
}

const PISTOL: &str = "<WEAPONS>\n\
    [PISTOL]\n\
    AMMOTYPE=BULLETS;\n\
    AMMOPERSHOT=1;\n\
    AUTOMATIC=TRUE;\n\
    ATTACK=PLAYER_PISTOL;\n\
    PRIORITY=4;\n\
    BOBBING=75%;\n\
    START_SOUND=PISTOL;\n\
    STATES(UP)=PIST:A:1:NORMAL:RAISE,#UP;\n\
    STATES(DOWN)=PIST:A:1:NORMAL:LOWER,#DOWN;\n\
    STATES(READY)=PIST:A:1:NORMAL:READY,#READY;\n\
    STATES(ATTACK)=PIST:A:4:NORMAL:NOTHING,PIST:B:6:NORMAL:SHOOT,PIST:C:4:NORMAL:NOTHING;\n";

#[test]
fn weapon_round_trip_through_the_loader() {
    let mut loader = loader();
    loader
        .load_attacks(
            "attacks.ddf",
            "<ATTACKS>\n[PLAYER_PISTOL]\nATTACKTYPE=SHOT;\nDAMAGE.VAL=3;\n",
        )
        .unwrap();
    loader.load_weapons("weapons.ddf", PISTOL).unwrap();
    loader.finalize().unwrap();

    let w = loader.weapon_by_name("PISTOL").unwrap();
    assert_eq!(w.primary.ammo, Ammo::Bullet);
    assert!(w.primary.autofire);
    assert!((w.bobbing - 0.75).abs() < 1e-6);
    assert!(w.ready_state > 0);
    assert!(w.primary.attack_state > 0);
    assert!(matches!(w.primary.attack, RefSlot::Resolved(_)));
}

#[test]
fn weapon_frames_are_marked_as_screen_space() {
    let mut loader = loader();
    loader
        .load_attacks(
            "attacks.ddf",
            "<ATTACKS>\n[PLAYER_PISTOL]\nATTACKTYPE=SHOT;\nDAMAGE.VAL=3;\n",
        )
        .unwrap();
    loader.load_weapons("weapons.ddf", PISTOL).unwrap();
    loader.finalize().unwrap();

    let w = loader.weapon_by_name("PISTOL").unwrap();
    assert!(loader.states().get(w.ready_state).unwrap().weapon);
}
