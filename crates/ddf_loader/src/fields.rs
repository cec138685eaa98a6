//! Field helpers shared by several entry kinds.
//!
//! Damage blocks, light effects and plane movers appear in more than one
//! definition kind, so their sub-tables live here; each kind wraps them in
//! a projection function pointing at its own copy of the structure.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{Field, ParserSession, parse_field, scan};
use ddf_tables::{
    Damage, HeightBase, HeightRef, LabelOffset, LightEffect, LightType, MoveType, PlaneMover,
    RefSlot, SoundRef, WhenAppear,
};

/// Reads a named cross-reference; resolution happens in the cleanup pass.
pub fn get_ref(_session: &ParserSession, info: &str, dest: &mut RefSlot) -> Result<()> {
    if info.is_empty() || names_equal(info, "NONE") {
        *dest = RefSlot::Empty;
    } else {
        *dest = RefSlot::Name(info.to_string());
    }
    Ok(())
}

/// Reads a `LABEL` or `LABEL:n` state director (n is 1-based in source).
pub fn get_label_offset(session: &ParserSession, info: &str, dest: &mut LabelOffset) -> Result<()> {
    let (label, offset) = match info.split_once(':') {
        Some((l, o)) => {
            let mut n = 0;
            scan::get_numeric(session, o.trim(), &mut n)?;
            (l, (n.max(1) as usize) - 1)
        }
        None => (info, 0),
    };
    if label.is_empty() {
        return Err(session.fatal(Error::syntax(format!("bad state director: {info}"))));
    }
    dest.label = label.to_string();
    dest.offset = offset;
    Ok(())
}

/// Reads one value of a `WHEN_APPEAR` list: a skill digit, a digit range
/// like `1-3`, or a netgame mode name.
pub fn get_when_appear(session: &ParserSession, info: &str, dest: &mut WhenAppear) -> Result<()> {
    let info = info.trim();

    if names_equal(info, "SP") {
        dest.0 |= WhenAppear::SP;
        return Ok(());
    }
    if names_equal(info, "COOP") {
        dest.0 |= WhenAppear::COOP;
        return Ok(());
    }
    if names_equal(info, "DM") {
        dest.0 |= WhenAppear::DM;
        return Ok(());
    }

    let skill_bit = |c: u8| -> Option<u32> {
        if (b'1'..=b'5').contains(&c) {
            Some(1 << (c - b'1'))
        } else {
            None
        }
    };

    let b = info.as_bytes();
    match b {
        [lo, b'-', hi] => {
            let (Some(_), Some(_)) = (skill_bit(*lo), skill_bit(*hi)) else {
                return Err(session.fatal(Error::syntax(format!("bad WHEN_APPEAR value: {info}"))));
            };
            for c in *lo..=*hi {
                dest.0 |= skill_bit(c).unwrap_or(0);
            }
            Ok(())
        }
        [c] if skill_bit(*c).is_some() => {
            dest.0 |= skill_bit(*c).unwrap_or(0);
            Ok(())
        }
        _ => Err(session.fatal(Error::syntax(format!("bad WHEN_APPEAR value: {info}")))),
    }
}

/// Starts a fresh `WHEN_APPEAR` accumulation: the first value of the
/// command clears the everywhere-default so only listed cases remain.
pub fn reset_when_appear(dest: &mut WhenAppear, index: usize) {
    if index == 0 {
        dest.0 = 0;
    }
}

const DAMAGE_FIELDS: &[Field<Damage>] = &[
    Field::set("VAL", |s, t, d| scan::get_float(s, t, &mut d.nominal)),
    Field::set("MAX", |s, t, d| scan::get_float(s, t, &mut d.linear_max)),
    Field::set("ERROR", |s, t, d| scan::get_float(s, t, &mut d.error)),
    Field::set("DELAY", |s, t, d| scan::get_time(s, t, &mut d.delay)),
    Field::set("PAIN_STATE", |s, t, d| get_label_offset(s, t, &mut d.pain)),
    Field::set("DEATH_STATE", |s, t, d| get_label_offset(s, t, &mut d.death)),
    Field::set("OVERKILL_STATE", |s, t, d| {
        get_label_offset(s, t, &mut d.overkill)
    }),
    Field::set("OBITUARY", |s, t, d| scan::get_string(s, t, &mut d.obituary)),
    Field::set("NO_ARMOUR", |s, t, d| scan::get_boolean(s, t, &mut d.no_armour)),
];

/// Dispatches a `DAMAGE.x` sub-field.
pub fn damage_field(
    session: &ParserSession,
    suffix: &str,
    contents: &str,
    dest: &mut Damage,
) -> Result<bool> {
    parse_field(session, DAMAGE_FIELDS, suffix, contents, dest)
}

fn get_light_type(session: &ParserSession, info: &str, dest: &mut LightType) -> Result<()> {
    const NAMES: &[(&str, LightType)] = &[
        ("NONE", LightType::None),
        ("SET", LightType::Set),
        ("FADE", LightType::Fade),
        ("STROBE", LightType::Strobe),
        ("FLASH", LightType::Flash),
        ("GLOW", LightType::Glow),
        ("FIREFLICKER", LightType::FireFlicker),
    ];
    match NAMES.iter().find(|(n, _)| names_equal(n, info)) {
        Some((_, t)) => {
            *dest = *t;
            Ok(())
        }
        None => Err(session.fatal(Error::bad_value("LIGHT.TYPE", info))),
    }
}

const LIGHT_FIELDS: &[Field<LightEffect>] = &[
    Field::set("TYPE", |s, t, l| get_light_type(s, t, &mut l.kind)),
    Field::set("LEVEL", |s, t, l| scan::get_numeric(s, t, &mut l.level)),
    Field::set("CHANCE", |s, t, l| scan::get_percent(s, t, &mut l.chance)),
    Field::set("DARKTIME", |s, t, l| scan::get_time(s, t, &mut l.darktime)),
    Field::set("BRIGHTTIME", |s, t, l| scan::get_time(s, t, &mut l.brighttime)),
    Field::set("SYNC", |s, t, l| scan::get_time(s, t, &mut l.sync)),
    Field::set("STEP", |s, t, l| scan::get_numeric(s, t, &mut l.step)),
];

/// Dispatches a `LIGHT.x` sub-field.
pub fn light_field(
    session: &ParserSession,
    suffix: &str,
    contents: &str,
    dest: &mut LightEffect,
) -> Result<bool> {
    parse_field(session, LIGHT_FIELDS, suffix, contents, dest)
}

fn get_move_type(session: &ParserSession, info: &str, dest: &mut MoveType) -> Result<()> {
    const NAMES: &[(&str, MoveType)] = &[
        ("ONCE", MoveType::Once),
        ("MOVEWAITRETURN", MoveType::MoveWaitReturn),
        ("CONTINUOUS", MoveType::Continuous),
        ("PLAT", MoveType::Plat),
        ("BUILDSTAIRS", MoveType::Stairs),
        ("TOGGLE", MoveType::Toggle),
    ];
    match NAMES.iter().find(|(n, _)| names_equal(n, info)) {
        Some((_, t)) => {
            *dest = *t;
            Ok(())
        }
        None => Err(session.fatal(Error::bad_value("TYPE", info))),
    }
}

/// Reads a destination reference: one or more `+`-joined keywords. The
/// base keywords are exclusive; the modifier keywords accumulate.
fn get_height_ref(session: &ParserSession, info: &str, dest: &mut HeightRef) -> Result<()> {
    if info.contains('+') {
        for part in info.split('+').filter(|p| !p.is_empty()) {
            get_height_ref(session, part, dest)?;
        }
        return Ok(());
    }
    if names_equal(info, "ABSOLUTE") {
        dest.base = HeightBase::Absolute;
    } else if names_equal(info, "CURRENT") {
        dest.base = HeightBase::Current;
    } else if names_equal(info, "SURROUNDING") {
        dest.base = HeightBase::Surrounding;
    } else if names_equal(info, "LOWEST_LO_TEXTURE") {
        dest.base = HeightBase::LowestLowTexture;
    } else if names_equal(info, "CEILING") {
        dest.ceiling = true;
    } else if names_equal(info, "FLOOR") {
        dest.ceiling = false;
    } else if names_equal(info, "HIGHEST") {
        dest.highest = true;
    } else if names_equal(info, "LOWEST") {
        dest.highest = false;
    } else if names_equal(info, "NEXT") {
        dest.next = true;
    } else if names_equal(info, "INCLUDE") {
        dest.include = true;
    } else if names_equal(info, "EXCLUDE") {
        dest.include = false;
    } else {
        return Err(session.fatal(Error::bad_value("DEST_REF", info)));
    }
    Ok(())
}

fn get_sound(session: &ParserSession, info: &str, dest: &mut SoundRef) -> Result<()> {
    get_ref(session, info, dest)
}

const MOVER_FIELDS: &[Field<PlaneMover>] = &[
    Field::set("TYPE", |s, t, m| get_move_type(s, t, &mut m.kind)),
    Field::set("SPEED_UP", |s, t, m| scan::get_float(s, t, &mut m.speed_up)),
    Field::set("SPEED_DOWN", |s, t, m| scan::get_float(s, t, &mut m.speed_down)),
    Field::set("DEST_REF", |s, t, m| get_height_ref(s, t, &mut m.destref)),
    Field::set("DEST_OFFSET", |s, t, m| scan::get_float(s, t, &mut m.dest)),
    Field::set("OTHER_REF", |s, t, m| get_height_ref(s, t, &mut m.otherref)),
    Field::set("OTHER_OFFSET", |s, t, m| scan::get_float(s, t, &mut m.other)),
    Field::set("CRUSH_DAMAGE", |s, t, m| {
        scan::get_numeric(s, t, &mut m.crush_damage)
    }),
    Field::set("TEXTURE", |s, t, m| scan::get_lump_name(s, t, &mut m.tex)),
    Field::set("WAIT", |s, t, m| scan::get_time(s, t, &mut m.wait)),
    Field::set("PREWAIT", |s, t, m| scan::get_time(s, t, &mut m.prewait)),
    Field::set("SFX_START", |s, t, m| get_sound(s, t, &mut m.sfx_start)),
    Field::set("SFX_UP", |s, t, m| get_sound(s, t, &mut m.sfx_up)),
    Field::set("SFX_DOWN", |s, t, m| get_sound(s, t, &mut m.sfx_down)),
    Field::set("SFX_STOP", |s, t, m| get_sound(s, t, &mut m.sfx_stop)),
    Field::set("SCROLL_ANGLE", |s, t, m| {
        scan::get_angle(s, t, &mut m.scroll_angle)
    }),
    Field::set("SCROLL_SPEED", |s, t, m| {
        scan::get_float(s, t, &mut m.scroll_speed)
    }),
    Field::set("IGNORE_TEXTURE", |s, t, m| {
        scan::get_boolean(s, t, &mut m.ignore_texture)
    }),
];

/// Dispatches a `FLOOR.x` / `CEILING.x` sub-field.
pub fn mover_field(
    session: &ParserSession,
    suffix: &str,
    contents: &str,
    dest: &mut PlaneMover,
) -> Result<bool> {
    parse_field(session, MOVER_FIELDS, suffix, contents, dest)
}
