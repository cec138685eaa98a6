//! Decoders for generalized (packed-integer) line and sector types.
//!
//! Maps can reference type numbers that were never defined in source text:
//! within the generalized ranges, the number itself encodes the behavior in
//! bit fields. Decoding is pure and total; every number in range yields a
//! definition. Decoded records are cached per number so repeated queries
//! return the same definition.
//!
//! Bit layouts follow sections 13 and 15 of the BOOM reference.

use std::collections::HashMap;

use crate::base::{RecordBase, RefSlot};
use crate::common::LightType;
use crate::line::{
    ActivatorFlags, HeightBase, HeightRef, KeyFlags, LineRecord, MoveType, TriggerKind,
};
use crate::sector::SectorRecord;

/// Whether a line type number falls in the generalized range.
#[must_use]
pub fn is_gen_line(number: i32) -> bool {
    (0x2F80..=0x7FFF).contains(&number)
}

/// Whether a sector type number falls in the generalized range.
#[must_use]
pub fn is_gen_sector(number: i32) -> bool {
    (0x20..=0xFFF).contains(&number)
}

/// Fills in a default sector record from a generalized sector number.
pub fn make_gen_sector(sec: &mut SectorRecord, number: i32) {
    // lower 5 bits: lighting
    match number & 0x1F {
        1 => {
            // random off
            sec.light.kind = LightType::Flash;
            sec.light.chance = 0.1;
            sec.light.darktime = 8;
            sec.light.brighttime = 8;
        }
        2 | 4 => {
            // blink 0.5 second
            sec.light.kind = LightType::Strobe;
            sec.light.darktime = 15;
            sec.light.brighttime = 5;
        }
        3 => {
            // blink 1.0 second
            sec.light.kind = LightType::Strobe;
            sec.light.darktime = 35;
            sec.light.brighttime = 5;
        }
        8 => {
            // oscillates
            sec.light.kind = LightType::Glow;
            sec.light.darktime = 1;
            sec.light.brighttime = 1;
        }
        12 => {
            // blink 0.5 second, sync
            sec.light.kind = LightType::Strobe;
            sec.light.darktime = 15;
            sec.light.brighttime = 5;
            sec.light.sync = 20;
        }
        13 => {
            // blink 1.0 second, sync
            sec.light.kind = LightType::Strobe;
            sec.light.darktime = 35;
            sec.light.brighttime = 5;
            sec.light.sync = 40;
        }
        17 => {
            // flickers
            sec.light.kind = LightType::FireFlicker;
            sec.light.darktime = 4;
            sec.light.brighttime = 4;
        }
        _ => {}
    }

    // bits 5-6: damage
    match (number >> 5) & 0x3 {
        1 => {
            sec.damage.nominal = 5.0;
            sec.damage.delay = 32;
        }
        2 => {
            sec.damage.nominal = 10.0;
            sec.damage.delay = 32;
        }
        3 => {
            sec.damage.nominal = 20.0;
            sec.damage.delay = 32;
        }
        _ => {}
    }

    // bit 7: secret
    if (number >> 7) & 1 != 0 {
        sec.secret = true;
    }

    // bits 8 (ice/mud) and 9 (wind) ignored
}

fn sfx(name: &str) -> RefSlot {
    RefSlot::Name(name.to_string())
}

fn line_trigger(line: &mut LineRecord, trigger: i32) {
    line.count = if trigger & 0x1 == 0 { 1 } else { -1 };

    line.trigger = match trigger & 0x6 {
        0 => TriggerKind::Walkable,
        2 => TriggerKind::Pushable,
        4 => TriggerKind::Shootable,
        _ => TriggerKind::Manual,
    };
}

fn allow_monsters(monster: bool) -> ActivatorFlags {
    if monster {
        ActivatorFlags::PLAYER | ActivatorFlags::MONSTER
    } else {
        ActivatorFlags::PLAYER
    }
}

fn make_floor(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let model = (number >> 5) & 0x1;
    let dir = (number >> 6) & 0x1;
    let target = (number >> 7) & 0x7;
    let change = (number >> 10) & 0x3;
    let crush = (number >> 12) & 0x1;

    line.obj = allow_monsters(change == 0 && model != 0);

    line.floor.kind = MoveType::Once;
    line.floor.dest = 0.0;

    if crush != 0 {
        line.floor.crush_damage = 10;
    }

    line.floor.destref = match target {
        0 => HeightRef::of(HeightBase::Surrounding).highest(),
        1 => HeightRef::of(HeightBase::Surrounding),
        2 => {
            let r = HeightRef::of(HeightBase::Surrounding).next();
            if dir == 0 { r.highest() } else { r }
        }
        3 => HeightRef::of(HeightBase::Surrounding).ceiling(),
        4 => HeightRef::of(HeightBase::Current).ceiling(),
        5 => HeightRef::of(HeightBase::LowestLowTexture),
        6 => {
            line.floor.dest = if dir != 0 { 24.0 } else { -24.0 };
            HeightRef::of(HeightBase::Current)
        }
        _ => {
            line.floor.dest = if dir != 0 { 32.0 } else { -32.0 };
            HeightRef::of(HeightBase::Current)
        }
    };

    if dir == 0 {
        line.floor.speed_down = (1 << speed) as f32;
        line.floor.sfx_down = sfx("STNMOV");
    } else {
        line.floor.speed_up = (1 << speed) as f32;
        line.floor.sfx_up = sfx("STNMOV");
    }

    // change + model texture rules
    if change > 0 {
        line.floor.tex = if model != 0 { "+" } else { "-" }.to_string();
    }
}

fn make_ceiling(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let model = (number >> 5) & 0x1;
    let dir = (number >> 6) & 0x1;
    let target = (number >> 7) & 0x7;
    let change = (number >> 10) & 0x3;
    let crush = (number >> 12) & 0x1;

    line.obj = allow_monsters(change == 0 && model != 0);

    line.ceil.kind = MoveType::Once;
    line.ceil.dest = 0.0;

    if crush != 0 {
        line.ceil.crush_damage = 10;
    }

    line.ceil.destref = match target {
        0 => HeightRef::of(HeightBase::Surrounding).ceiling().highest(),
        1 => HeightRef::of(HeightBase::Surrounding).ceiling(),
        2 => {
            let r = HeightRef::of(HeightBase::Surrounding).ceiling().next();
            if dir == 0 { r.highest() } else { r }
        }
        3 => HeightRef::of(HeightBase::Surrounding).highest(),
        4 => HeightRef::of(HeightBase::Current),
        5 => HeightRef::of(HeightBase::LowestLowTexture),
        6 => {
            line.ceil.dest = if dir != 0 { 24.0 } else { -24.0 };
            HeightRef::of(HeightBase::Current).ceiling()
        }
        _ => {
            line.ceil.dest = if dir != 0 { 32.0 } else { -32.0 };
            HeightRef::of(HeightBase::Current).ceiling()
        }
    };

    if dir == 0 {
        line.ceil.speed_down = (1 << speed) as f32;
        line.ceil.sfx_down = sfx("STNMOV");
    } else {
        line.ceil.speed_up = (1 << speed) as f32;
        line.ceil.sfx_up = sfx("STNMOV");
    }

    if change > 0 {
        line.ceil.tex = if model != 0 { "+" } else { "-" }.to_string();
    }
}

fn make_door(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let kind = (number >> 5) & 0x3;
    let monster = (number >> 7) & 0x1;
    let delay = (number >> 8) & 0x3;

    line.obj = allow_monsters(monster != 0);

    line.ceil.kind = if kind & 1 != 0 {
        MoveType::Once
    } else {
        MoveType::MoveWaitReturn
    };

    line.ceil.speed_up = (2 << speed) as f32;
    line.ceil.speed_down = line.ceil.speed_up;
    line.ceil.sfx_up = sfx("DOROPN");
    line.ceil.sfx_down = sfx("DORCLS");

    if kind & 2 == 0 {
        // open types
        line.ceil.destref = HeightRef::of(HeightBase::Surrounding).ceiling();
        line.ceil.dest = -4.0;
    } else {
        // close types
        line.ceil.destref = HeightRef::of(HeightBase::Current);
        line.ceil.dest = 0.0;
    }

    line.ceil.wait = match delay {
        0 => 35,
        1 => 150,
        2 => 300,
        _ => 1050,
    };
}

fn make_locked_door(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let kind = (number >> 5) & 0x1;
    let lock = (number >> 6) & 0x7;
    let sk_ck = (number >> 9) & 0x1 != 0;

    // never allow monsters
    line.obj = ActivatorFlags::PLAYER;

    line.ceil.kind = if kind != 0 {
        MoveType::Once
    } else {
        MoveType::MoveWaitReturn
    };
    line.ceil.destref = HeightRef::of(HeightBase::Surrounding).ceiling();
    line.ceil.dest = -4.0;

    line.ceil.speed_up = (2 << speed) as f32;
    line.ceil.speed_down = line.ceil.speed_up;
    line.ceil.sfx_up = sfx("DOROPN");
    line.ceil.sfx_down = sfx("DORCLS");
    line.ceil.wait = 150;

    let pair = |card: KeyFlags, skull: KeyFlags| {
        if sk_ck { card | skull } else { card }
    };

    let (keys, msg) = match lock {
        0 => (KeyFlags::any(), "NeedAnyForDoor"),
        1 => (pair(KeyFlags::RED_CARD, KeyFlags::RED_SKULL), "NeedRedForDoor"),
        2 => (
            pair(KeyFlags::BLUE_CARD, KeyFlags::BLUE_SKULL),
            "NeedBlueForDoor",
        ),
        3 => (
            pair(KeyFlags::YELLOW_CARD, KeyFlags::YELLOW_SKULL),
            "NeedYellowForDoor",
        ),
        4 => (pair(KeyFlags::RED_SKULL, KeyFlags::RED_CARD), "NeedRedForDoor"),
        5 => (
            pair(KeyFlags::BLUE_SKULL, KeyFlags::BLUE_CARD),
            "NeedBlueForDoor",
        ),
        6 => (
            pair(KeyFlags::YELLOW_SKULL, KeyFlags::YELLOW_CARD),
            "NeedYellowForDoor",
        ),
        _ => {
            let mut all = KeyFlags::any() | KeyFlags::STRICTLY_ALL;
            if sk_ck {
                all |= KeyFlags::CARD_SKULL_EQUIV;
            }
            (all, "NeedAllForDoor")
        }
    };

    line.keys = keys;
    line.failedmessage = msg.to_string();
}

fn make_lift(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let monster = (number >> 5) & 0x1;
    let delay = (number >> 6) & 0x3;
    let target = (number >> 8) & 0x3;

    line.obj = allow_monsters(monster != 0);

    line.floor.kind = MoveType::MoveWaitReturn;
    line.floor.dest = 0.0;
    line.floor.other = 0.0;

    line.floor.speed_up = (1 << speed) as f32;
    line.floor.speed_down = line.floor.speed_up;
    line.floor.sfx_start = sfx("PSTART");
    line.floor.sfx_stop = sfx("PSTOP");

    match target {
        0 => {
            line.floor.destref = HeightRef::of(HeightBase::Surrounding).include();
        }
        1 => {
            line.floor.destref = HeightRef::of(HeightBase::Surrounding).next().highest();
        }
        2 => {
            line.floor.destref = HeightRef::of(HeightBase::Surrounding).ceiling().include();
        }
        _ => {
            // perpetual lift
            line.floor.kind = MoveType::Continuous;
            line.floor.destref = HeightRef::of(HeightBase::Surrounding).include();
            line.floor.otherref = HeightRef::of(HeightBase::Surrounding).highest().include();
        }
    }

    line.floor.wait = match delay {
        0 => 35,
        1 => 105,
        2 => 165,
        _ => 350,
    };
}

fn make_stair(line: &mut LineRecord, number: i32) {
    let mut speed = (number >> 3) & 0x3;
    let monster = (number >> 5) & 0x1;
    let step = (number >> 6) & 0x3;
    let dir = (number >> 8) & 0x1;
    let igntxt = (number >> 9) & 0x1;

    line.obj = allow_monsters(monster != 0);

    line.floor.kind = MoveType::Stairs;

    // generalized repeatable stairs alternate between up and down
    if number & 1 != 0 {
        line.newtrignum = number ^ 0x100;
    }

    line.floor.destref = HeightRef::of(HeightBase::Current);
    let step_size = if step != 0 { 8.0 * step as f32 } else { 4.0 };
    line.floor.dest = if dir == 0 { -step_size } else { step_size };

    // speed values are 0.25, 0.5, 2.0, 4.0 (never 1.0)
    if speed >= 2 {
        speed += 1;
    }

    line.floor.speed_down = (1 << speed) as f32 / 4.0;
    line.floor.speed_up = line.floor.speed_down;

    line.floor.sfx_down = sfx("STNMOV");
    line.floor.sfx_up = sfx("STNMOV");

    if igntxt != 0 {
        line.floor.ignore_texture = true;
    }
}

fn make_crusher(line: &mut LineRecord, number: i32) {
    let speed = (number >> 3) & 0x3;
    let monster = (number >> 5) & 0x1;
    let silent = (number >> 6) & 0x1;

    line.obj = allow_monsters(monster != 0);

    line.ceil.kind = MoveType::Continuous;
    line.ceil.destref = HeightRef::of(HeightBase::Current);
    line.ceil.dest = 8.0;

    line.ceil.speed_up = (1 << speed) as f32;
    line.ceil.speed_down = line.ceil.speed_up;
    line.ceil.crush_damage = 10;

    if silent == 0 {
        line.ceil.sfx_up = sfx("STNMOV");
        line.ceil.sfx_down = sfx("STNMOV");
    }
}

/// Fills in a default line record from a generalized line number.
pub fn make_gen_line(line: &mut LineRecord, number: i32) {
    // trigger bits are common to every range
    line_trigger(line, number & 0x7);

    if number >= 0x6000 {
        make_floor(line, number);
    } else if number >= 0x4000 {
        make_ceiling(line, number);
    } else if number >= 0x3c00 {
        make_door(line, number);
    } else if number >= 0x3800 {
        make_locked_door(line, number);
    } else if number >= 0x3400 {
        make_lift(line, number);
    } else if number >= 0x3000 {
        make_stair(line, number);
    } else {
        make_crusher(line, number);
    }
}

/// Cache of decoded generalized definitions, keyed by number.
#[derive(Debug, Default)]
pub struct GenCache {
    lines: HashMap<i32, LineRecord>,
    sectors: HashMap<i32, SectorRecord>,
}

impl GenCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all cached definitions (between map loads).
    pub fn clear(&mut self) {
        self.lines.clear();
        self.sectors.clear();
    }

    /// Looks up or decodes a generalized line type.
    ///
    /// The number must be in the generalized line range.
    pub fn gen_line(&mut self, number: i32) -> &LineRecord {
        debug_assert!(is_gen_line(number));

        self.lines.entry(number).or_insert_with(|| {
            let mut line = LineRecord {
                base: RecordBase::new(format!("_GEN_LINE_{number:04X}"), number),
                ..LineRecord::default()
            };
            make_gen_line(&mut line, number);
            line
        })
    }

    /// Looks up or decodes a generalized sector type.
    ///
    /// The number must be in the generalized sector range.
    pub fn gen_sector(&mut self, number: i32) -> &SectorRecord {
        debug_assert!(is_gen_sector(number));

        self.sectors.entry(number).or_insert_with(|| {
            let mut sec = SectorRecord {
                base: RecordBase::new(format!("_GEN_SECTOR_{number:03X}"), number),
                ..SectorRecord::default()
            };
            make_gen_sector(&mut sec, number);
            sec
        })
    }
}
