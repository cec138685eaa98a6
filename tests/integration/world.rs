//! A small but complete game-content load

use ddfkit::foundation::DiagPolicy;
use ddfkit::loader::Loader;
use ddfkit::tables::{RefSlot, StateLink, TriggerKind};

const SOUNDS: &str = "<SOUNDS>\n\
    [FIRSHT]\nLUMP_NAME=\"DSFIRSHT\";\n\
    [FIRXPL]\nLUMP_NAME=\"DSFIRXPL\";\n\
    [DMACT]\nLUMP_NAME=\"DSDMACT\";\nLOOP=TRUE;\n";

const ATTACKS: &str = "<ATTACKS>\n\
    [IMP_FIREBALL]\n\
    ATTACKTYPE=PROJECTILE;\n\
    ATTACK_HEIGHT=32;\n\
    DAMAGE.VAL=8;\n\
    ATTEMPT_SOUND=FIRSHT;\n\
    RADIUS=6;\n\
    SPEED=10;\n\
    SPECIAL=MISSILE,NOGRAVITY;\n\
    DEATH_SOUND=FIRXPL;\n\
    STATES(IDLE)=BAL1:A:4:BRIGHT:NOTHING,#IDLE;\n\
    STATES(DEATH)=BAL1:C:6:BRIGHT:NOTHING,#REMOVE;\n";

const THINGS: &str = "<THINGS>\n\
    [BLOOD]\nSTATES(IDLE)=BLUD:A:8:NORMAL:NOTHING,#REMOVE;\n\
    [PUFF]\nSTATES(IDLE)=PUFF:A:4:NORMAL:NOTHING,#REMOVE;\n\
    [RESPAWN_FLASH]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n\
    [ITEM_RESPAWN]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n\
    [IMP:3001]\n\
    SPAWNHEALTH=60;\n\
    RADIUS=20;\n\
    HEIGHT=56;\n\
    SPECIAL=SOLID,SHOOTABLE,COUNT_AS_KILL,MONSTER;\n\
    ACTIVE_SOUND=DMACT;\n\
    RANGE_ATTACK=IMP_FIREBALL;\n\
    CASTORDER=4;\n\
    STATES(IDLE)=TROO:A:10:NORMAL:LOOKOUT,TROO:B:10:NORMAL:LOOKOUT,#IDLE;\n\
    STATES(CHASE)=TROO:A:3:NORMAL:CHASE,TROO:B:3:NORMAL:CHASE,#CHASE;\n\
    STATES(DEATH)=TROO:I:8:NORMAL:NOTHING,TROO:J:8:NORMAL:MAKEDEAD,#REMOVE;\n";

const WEAPONS: &str = "<WEAPONS>\n\
    [PISTOL]\n\
    AMMOTYPE=BULLETS;\n\
    AMMOPERSHOT=1;\n\
    ATTACK=IMP_FIREBALL;\n\
    PRIORITY=4;\n\
    STATES(UP)=PIST:A:1:NORMAL:RAISE,#UP;\n\
    STATES(DOWN)=PIST:A:1:NORMAL:LOWER,#DOWN;\n\
    STATES(READY)=PIST:A:1:NORMAL:READY,#READY;\n\
    STATES(ATTACK)=PIST:A:4:NORMAL:NOTHING,PIST:B:6:NORMAL:SHOOT;\n";

const LINES: &str = "<LINES>\n[1]\nTYPE=MANUAL;\nCEILING.TYPE=MOVE_WAIT_RETURN;\n";

const SECTORS: &str = "<SECTORS>\n[9]\nSECRET=TRUE;\n";

fn build_world() -> Loader {
    let mut loader = Loader::new(DiagPolicy::default());
    for (source, text) in [
        ("sounds.ddf", SOUNDS),
        ("attacks.ddf", ATTACKS),
        ("things.ddf", THINGS),
        ("weapons.ddf", WEAPONS),
        ("lines.ddf", LINES),
        ("sectors.ddf", SECTORS),
    ] {
        loader.load(source, text).unwrap();
    }
    loader.finalize().unwrap();
    loader
}

#[test]
fn every_kind_loads_and_cross_links() {
    let mut loader = build_world();

    let imp = loader.thing_by_name("IMP").unwrap();
    let attack_idx = match imp.range_attack {
        RefSlot::Resolved(i) => i,
        ref other => panic!("unresolved attack {other:?}"),
    };
    assert_eq!(
        loader.attacks().get(attack_idx).unwrap().base.name,
        "IMP_FIREBALL"
    );

    let w = loader.weapon_by_name("PISTOL").unwrap();
    assert!(matches!(w.primary.attack, RefSlot::Resolved(_)));

    assert!(loader.sound_by_name("DMACT").unwrap().looping);
    assert_eq!(loader.line_by_number(1).unwrap().trigger, TriggerKind::Manual);
    assert!(loader.sector_by_number(9).unwrap().secret);
}

#[test]
fn monster_state_chains_are_fully_walkable() {
    let loader = build_world();
    let imp = loader.thing_by_name("IMP").unwrap();

    // every state in the group must end in a resolved link
    for range in &imp.state_group {
        for i in range.first..=range.last {
            let state = loader.states().get(i).unwrap();
            assert!(
                matches!(state.next, StateLink::Absolute(_)),
                "state {i} still symbolic"
            );
        }
    }

    // the death chain terminates, the idle chain loops
    let death = imp.states.death;
    assert!(death > 0);
    let idle = imp.states.idle;
    let mut seen = vec![idle];
    let mut cursor = idle;
    loop {
        let StateLink::Absolute(next) = loader.states().get(cursor).unwrap().next else {
            panic!("broken chain");
        };
        if next == idle {
            break;
        }
        assert!(!seen.contains(&next), "idle chain must return to its head");
        seen.push(next);
        cursor = next;
    }
}

#[test]
fn attack_companion_is_a_first_class_thing() {
    let loader = build_world();
    let companion = loader.thing_by_name("__ATKMOBJ_IMP_FIREBALL").unwrap();
    assert_eq!(companion.radius, 6.0);

    let atk = loader.attacks().lookup("IMP_FIREBALL").unwrap();
    let mobj_idx = atk.mobj.index().unwrap();
    assert_eq!(
        loader.things().get(mobj_idx).unwrap().base.name,
        companion.base.name
    );
}

#[test]
fn cast_order_only_lists_cast_members() {
    let loader = build_world();
    let cast = loader.cast_order();
    assert_eq!(cast.len(), 1);
    assert_eq!(cast[0].base.name, "IMP");
}
