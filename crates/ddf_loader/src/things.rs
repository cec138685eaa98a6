//! The `<THINGS>` entry reader: monsters, items, scenery and players.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{
    ActionDef, ArgKind, CheckFlag, EntryReader, Field, ParserSession, SpecialFlag,
    check_special_flag, parse_field, parse_state_command, scan,
};
use ddf_tables::{
    DynamicLight, DynamicLightType, GlowType, RangeBuilder, Record, Registry, SpriteYAlign,
    StateTable, ThingFlags, ThingRecord,
};

use crate::fields;

/// Splits an entry header into its name and optional `:number` id.
pub(crate) fn split_entry_name<'a>(
    session: &ParserSession,
    header: &'a str,
) -> Result<(&'a str, i32)> {
    match header.split_once(':') {
        Some((name, digits)) => {
            let mut number = 0;
            scan::get_numeric(session, digits, &mut number)?;
            if number <= 0 {
                return Err(session.fatal(Error::syntax(format!("bad entry number: {digits}"))));
            }
            Ok((name, number))
        }
        None => Ok((header, 0)),
    }
}

const THING_FLAGS: &[SpecialFlag] = &[
    SpecialFlag { name: "SPECIAL", bits: ThingFlags::SPECIAL.bits(), negative: false },
    SpecialFlag { name: "SOLID", bits: ThingFlags::SOLID.bits(), negative: false },
    SpecialFlag { name: "SHOOTABLE", bits: ThingFlags::SHOOTABLE.bits(), negative: false },
    SpecialFlag { name: "AMBUSH", bits: ThingFlags::AMBUSH.bits(), negative: false },
    SpecialFlag { name: "MISSILE", bits: ThingFlags::MISSILE.bits(), negative: false },
    SpecialFlag { name: "NOGRAVITY", bits: ThingFlags::NO_GRAVITY.bits(), negative: false },
    SpecialFlag { name: "GRAVITY", bits: ThingFlags::NO_GRAVITY.bits(), negative: true },
    SpecialFlag { name: "DROPOFF", bits: ThingFlags::DROPOFF.bits(), negative: false },
    SpecialFlag { name: "FLOATER", bits: ThingFlags::FLOAT.bits(), negative: false },
    SpecialFlag { name: "CORPSE", bits: ThingFlags::CORPSE.bits(), negative: false },
    SpecialFlag { name: "COUNT_AS_KILL", bits: ThingFlags::COUNT_AS_KILL.bits(), negative: false },
    SpecialFlag { name: "COUNT_AS_ITEM", bits: ThingFlags::COUNT_AS_ITEM.bits(), negative: false },
    SpecialFlag { name: "STEALTH", bits: ThingFlags::STEALTH.bits(), negative: false },
    SpecialFlag { name: "TOUCHY", bits: ThingFlags::TOUCHY.bits(), negative: false },
    SpecialFlag { name: "BOUNCE", bits: ThingFlags::BOUNCE.bits(), negative: false },
    SpecialFlag { name: "NOBLOOD", bits: ThingFlags::NO_BLOOD.bits(), negative: false },
    SpecialFlag { name: "MONSTER", bits: ThingFlags::MONSTER.bits(), negative: false },
    SpecialFlag { name: "NORESPAWN", bits: ThingFlags::NO_RESPAWN.bits(), negative: false },
    SpecialFlag { name: "TELEPORT", bits: ThingFlags::TELEPORT.bits(), negative: false },
    SpecialFlag { name: "HOVER", bits: ThingFlags::HOVER.bits(), negative: false },
    SpecialFlag { name: "USABLE", bits: ThingFlags::USABLE.bits(), negative: false },
];

fn set_special(session: &ParserSession, info: &str, record: &mut ThingRecord) -> Result<()> {
    match check_special_flag(info, THING_FLAGS, true, true) {
        CheckFlag::Positive(bits) => {
            record.flags |= ThingFlags::from_bits_truncate(bits);
        }
        CheckFlag::Negative(bits) => {
            record.flags -= ThingFlags::from_bits_truncate(bits);
        }
        CheckFlag::User(_) => {}
        CheckFlag::Unknown => {
            session.warn_error(Error::syntax(format!("unknown thing special: {info}")))?;
        }
    }
    Ok(())
}

fn set_yalign(session: &ParserSession, info: &str, record: &mut ThingRecord) -> Result<()> {
    record.yalign = if names_equal(info, "BOTTOM") {
        SpriteYAlign::Bottom
    } else if names_equal(info, "MIDDLE") {
        SpriteYAlign::Middle
    } else if names_equal(info, "TOP") {
        SpriteYAlign::Top
    } else {
        return Err(session.fatal(Error::bad_value("YALIGN", info)));
    };
    Ok(())
}

fn set_glow(session: &ParserSession, info: &str, record: &mut ThingRecord) -> Result<()> {
    record.glow_type = if names_equal(info, "NONE") {
        GlowType::None
    } else if names_equal(info, "FLOOR") {
        GlowType::Floor
    } else if names_equal(info, "CEILING") {
        GlowType::Ceiling
    } else if names_equal(info, "WALL") {
        GlowType::Wall
    } else {
        return Err(session.fatal(Error::bad_value("GLOW_TYPE", info)));
    };
    Ok(())
}

fn dlight_field(
    session: &ParserSession,
    suffix: &str,
    contents: &str,
    dest: &mut DynamicLight,
) -> Result<bool> {
    fn set_type(s: &ParserSession, info: &str, d: &mut DynamicLight) -> Result<()> {
        d.kind = if names_equal(info, "NONE") {
            DynamicLightType::None
        } else if names_equal(info, "MODULATE") {
            DynamicLightType::Modulate
        } else if names_equal(info, "ADD") {
            DynamicLightType::Add
        } else {
            return Err(s.fatal(Error::bad_value("DLIGHT.TYPE", info)));
        };
        Ok(())
    }

    const SUB: &[Field<DynamicLight>] = &[
        Field::set("TYPE", set_type),
        Field::set("COLOUR", |s, t, d| scan::get_rgb(s, t, &mut d.colour)),
        Field::set("RADIUS", |s, t, d| scan::get_float(s, t, &mut d.radius)),
        Field::set("LEAKY", |s, t, d| scan::get_boolean(s, t, &mut d.leaky)),
    ];
    parse_field(session, SUB, suffix, contents, dest)
}

const THING_FIELDS: &[Field<ThingRecord>] = &[
    Field::set("SPAWNHEALTH", |s, t, r| scan::get_float(s, t, &mut r.spawnhealth)),
    Field::set("RADIUS", |s, t, r| scan::get_float(s, t, &mut r.radius)),
    Field::set("HEIGHT", |s, t, r| scan::get_float(s, t, &mut r.height)),
    Field::set("MASS", |s, t, r| scan::get_float(s, t, &mut r.mass)),
    Field::set("SPEED", |s, t, r| scan::get_float(s, t, &mut r.speed)),
    Field::set("FAST", |s, t, r| scan::get_float(s, t, &mut r.fast)),
    Field::set("FLOAT_SPEED", |s, t, r| scan::get_float(s, t, &mut r.float_speed)),
    Field::set("STEP_SIZE", |s, t, r| scan::get_float(s, t, &mut r.step_size)),
    Field::set("RESPAWN_TIME", |s, t, r| scan::get_time(s, t, &mut r.respawntime)),
    Field::set("FUSE", |s, t, r| scan::get_time(s, t, &mut r.fuse)),
    Field::set("TRANSLUCENCY", |s, t, r| scan::get_percent(s, t, &mut r.translucency)),
    Field::set("PAINCHANCE", |s, t, r| scan::get_percent(s, t, &mut r.painchance)),
    Field::set("MINATTACK_CHANCE", |s, t, r| {
        scan::get_percent(s, t, &mut r.minatkchance)
    }),
    Field::set("REACTION_TIME", |s, t, r| scan::get_time(s, t, &mut r.reactiontime)),
    Field::set("CASTORDER", |s, t, r| scan::get_numeric(s, t, &mut r.castorder)),
    Field::set("CAST_TITLE", |s, t, r| scan::get_string(s, t, &mut r.cast_title)),
    Field::set("PLAYER", |s, t, r| scan::get_numeric(s, t, &mut r.playernum)),
    Field::set("SIDE", |s, t, r| scan::get_bitset(s, t, &mut r.side)),
    Field::set("BOBBING", |s, t, r| scan::get_percent(s, t, &mut r.bobbing)),
    Field::set("JUMP_HEIGHT", |s, t, r| scan::get_float(s, t, &mut r.jumpheight)),
    Field::set("JUMP_DELAY", |s, t, r| scan::get_time(s, t, &mut r.jump_delay)),
    Field::set("CROUCH_HEIGHT", |s, t, r| scan::get_float(s, t, &mut r.crouchheight)),
    Field::set("VIEW_HEIGHT", |s, t, r| scan::get_percent(s, t, &mut r.viewheight)),
    Field::set("SHOT_HEIGHT", |s, t, r| scan::get_percent(s, t, &mut r.shotheight)),
    Field::set("MAX_FALL", |s, t, r| scan::get_float(s, t, &mut r.maxfall)),
    Field::set("EXPLODE_RADIUS", |s, t, r| {
        scan::get_float(s, t, &mut r.explode_radius)
    }),
    Field::set("RELOAD_SHOTS", |s, t, r| scan::get_numeric(s, t, &mut r.reload_shots)),
    Field::set("SCALE", |s, t, r| scan::get_float(s, t, &mut r.scale)),
    Field::set("ASPECT", |s, t, r| scan::get_float(s, t, &mut r.aspect)),
    Field::set("YALIGN", set_yalign),
    Field::set("GLOW_TYPE", set_glow),
    Field::set("IMMUNITY_CLASS", |s, t, r| scan::get_bitset(s, t, &mut r.immunity)),
    Field::set("RESISTANCE_CLASS", |s, t, r| {
        scan::get_bitset(s, t, &mut r.resistance)
    }),
    Field::set("RESISTANCE_MULTIPLY", |s, t, r| {
        scan::get_float(s, t, &mut r.resist_multiply)
    }),
    Field::set("ARMOUR_PROTECTION", |s, t, r| {
        scan::get_percent(s, t, &mut r.armour_protect)
    }),
    Field::set("ARMOUR_DEPLETION", |s, t, r| {
        scan::get_percent(s, t, &mut r.armour_deplete)
    }),
    Field::set("ARMOUR_CLASS", |s, t, r| scan::get_bitset(s, t, &mut r.armour_class)),
    Field::set("LUNG_CAPACITY", |s, t, r| scan::get_time(s, t, &mut r.lung_capacity)),
    Field::set("GASP_START", |s, t, r| scan::get_time(s, t, &mut r.gasp_start)),
    Field::set("SPECIAL", set_special),
    Field::set("CLOSE_ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.close_attack)),
    Field::set("RANGE_ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.range_attack)),
    Field::set("SPARE_ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.spare_attack)),
    Field::set("DROPITEM", |s, t, r| fields::get_ref(s, t, &mut r.dropitem)),
    Field::set("BLOOD", |s, t, r| fields::get_ref(s, t, &mut r.blood)),
    Field::set("RESPAWN_EFFECT", |s, t, r| {
        fields::get_ref(s, t, &mut r.respawneffect)
    }),
    Field::set("SPIT_SPOT", |s, t, r| fields::get_ref(s, t, &mut r.spitspot)),
    Field::set("ACTIVE_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.active_sound)),
    Field::set("SIGHTING_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.see_sound)),
    Field::set("DEATH_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.death_sound)),
    Field::set("OVERKILL_SOUND", |s, t, r| {
        fields::get_ref(s, t, &mut r.overkill_sound)
    }),
    Field::set("PAIN_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.pain_sound)),
    Field::set("STARTCOMBAT_SOUND", |s, t, r| {
        fields::get_ref(s, t, &mut r.attack_sound)
    }),
    Field::set("WALK_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.walk_sound)),
    Field::set("JUMP_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.jump_sound)),
    Field::set("NOWAY_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.noway_sound)),
    Field::set("OOF_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.oof_sound)),
    Field::set("GASP_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.gasp_sound)),
    Field::sub("*EXPLODE_DAMAGE", |s, f, t, r| {
        fields::damage_field(s, f, t, &mut r.explode_damage)
    }),
    Field::sub("*CHOKE_DAMAGE", |s, f, t, r| {
        fields::damage_field(s, f, t, &mut r.choke_damage)
    }),
    Field::sub("*DLIGHT", |s, f, t, r| dlight_field(s, f, t, &mut r.dlight0)),
    Field::sub("*DLIGHT2", |s, f, t, r| dlight_field(s, f, t, &mut r.dlight1)),
    // pre-1.28 spelling
    Field::set("!EXPLOD_DAMAGE", |s, t, r| {
        scan::get_float(s, t, &mut r.explode_damage.nominal)
    }),
    Field::set("!EXPLOD_DAMAGERANGE", |s, t, r| {
        scan::get_float(s, t, &mut r.explode_damage.linear_max)
    }),
];

/// Actions usable in thing state frames.
pub(crate) const THING_ACTIONS: &[ActionDef] = &[
    ActionDef::new("NOTHING", ArgKind::None),
    ActionDef::new("LOOKOUT", ArgKind::None),
    ActionDef::new("CHASE", ArgKind::None),
    ActionDef::new("MEANDER", ArgKind::None),
    ActionDef::new("FACE_TARGET", ArgKind::None),
    ActionDef::new("RANGE_ATTACK", ArgKind::Attack),
    ActionDef::new("CLOSE_ATTACK", ArgKind::Attack),
    ActionDef::new("SPARE_ATTACK", ArgKind::Attack),
    ActionDef::new("RANGEATTEMPTSND", ArgKind::None),
    ActionDef::new("CLOSEATTEMPTSND", ArgKind::None),
    ActionDef::new("MAKESOUND", ArgKind::None),
    ActionDef::new("MAKEACTIVESOUND", ArgKind::None),
    ActionDef::new("MAKEDEATHSOUND", ArgKind::None),
    ActionDef::new("MAKEOVERKILLSOUND", ArgKind::None),
    ActionDef::new("MAKEPAINSOUND", ArgKind::None),
    ActionDef::new("PLAYSOUND", ArgKind::Sound),
    ActionDef::new("EXPLOSIONDAMAGE", ArgKind::None),
    ActionDef::new("MAKEDEAD", ArgKind::None),
    ActionDef::new("RESET_SPREADER", ArgKind::None),
    ActionDef::new("DROPITEM", ArgKind::Thing),
    ActionDef::new("SPAWN", ArgKind::Thing),
    ActionDef::new("TRANS_SET", ArgKind::Percent),
    ActionDef::new("TRANS_FADE", ArgKind::Percent),
    ActionDef::new("MOVE_FWD", ArgKind::Float),
    ActionDef::new("MOVE_RIGHT", ArgKind::Float),
    ActionDef::new("MOVE_UP", ArgKind::Float),
    ActionDef::new("TURN", ArgKind::Float),
    ActionDef::new("TURN_RANDOM", ArgKind::Int),
    ActionDef::new("MLOOK_TURN", ArgKind::Float),
    ActionDef::new("PATH_CHECK", ArgKind::None),
    ActionDef::new("PATH_FOLLOW", ArgKind::None),
    ActionDef::new("DLIGHT_SET", ArgKind::Int),
    ActionDef::new("DLIGHT_FADE", ArgKind::Int),
    ActionDef::new("DLIGHT_RANDOM", ArgKind::IntPair),
    ActionDef::new("JUMP", ArgKind::Jump),
    ActionDef::new("BECOME", ArgKind::Become),
    ActionDef::new("TELEPORT", ArgKind::None),
    ActionDef::new("RESPAWN", ArgKind::None),
    ActionDef::new("RAISE", ArgKind::None),
    ActionDef::new("TOUCHY_ON", ArgKind::None),
    ActionDef::new("TOUCHY_OFF", ArgKind::None),
    ActionDef::new("BOUNCE_ON", ArgKind::None),
    ActionDef::new("BOUNCE_OFF", ArgKind::None),
];

/// Stores the first state of a labelled chain in its starter field.
/// Unknown labels are fine; they remain reachable through jumps.
pub(crate) fn assign_starter(record: &mut ThingRecord, label: &str, idx: usize) {
    let states = &mut record.states;
    let slot = if names_equal(label, "SPAWN") {
        &mut states.spawn
    } else if names_equal(label, "IDLE") {
        &mut states.idle
    } else if names_equal(label, "CHASE") {
        &mut states.chase
    } else if names_equal(label, "PAIN") {
        &mut states.pain
    } else if names_equal(label, "MISSILE") {
        &mut states.missile
    } else if names_equal(label, "MELEE") {
        &mut states.melee
    } else if names_equal(label, "DEATH") {
        &mut states.death
    } else if names_equal(label, "OVERKILL") {
        &mut states.overkill
    } else if names_equal(label, "RESPAWN") {
        &mut states.raise
    } else if names_equal(label, "RESURRECT") {
        &mut states.resurrect
    } else if names_equal(label, "MEANDER") {
        &mut states.meander
    } else if names_equal(label, "BOUNCE") {
        &mut states.bounce
    } else if names_equal(label, "TOUCH") {
        &mut states.touch
    } else if names_equal(label, "RELOAD") {
        &mut states.reload
    } else if names_equal(label, "GIB") {
        &mut states.gib
    } else {
        return;
    };
    *slot = idx;
}

/// Applies one field to a thing record, trying the field table and then
/// the `STATES(label)` form. Returns false when neither matched.
#[allow(clippy::too_many_arguments)]
pub(crate) fn thing_field(
    session: &ParserSession,
    table: &mut StateTable,
    builder: &mut RangeBuilder,
    record: &mut ThingRecord,
    field: &str,
    contents: &str,
    index: usize,
    is_last: bool,
) -> Result<bool> {
    if parse_field(session, THING_FIELDS, field, contents, record)? {
        return Ok(true);
    }

    if let Some((label, first)) = parse_state_command(
        session, table, builder, field, contents, index, is_last, THING_ACTIONS, false, None,
    )? {
        if let Some(idx) = first {
            assign_starter(record, &label, idx);
        }
        return Ok(true);
    }

    Ok(false)
}

/// Post-checks run when a thing entry finishes.
pub(crate) fn finish_thing_record(session: &ParserSession, record: &mut ThingRecord) -> Result<()> {
    if record.mass < 1.0 {
        session.warn(&format!(
            "bad MASS value {} (min is 1), using 1",
            record.mass
        ));
        record.mass = 1.0;
    }

    if record.flags.contains(ThingFlags::COUNT_AS_KILL) {
        record.flags |= ThingFlags::MONSTER;
    }

    if record.explode_radius < 0.0 {
        return Err(session.fatal(Error::bad_value(
            "EXPLODE_RADIUS",
            format!("{}", record.explode_radius),
        )));
    }

    if record.castorder > 0 && (record.states.chase == 0 || record.states.death == 0) {
        session.warn_error(Error::syntax(
            "cast member needs CHASE and DEATH states, ignoring CASTORDER",
        ))?;
        record.castorder = 0;
    }

    if record.states.idle == 0 {
        record.states.idle = record.states.spawn;
    }

    record.base.crc = record.compute_crc();
    Ok(())
}

/// The `<THINGS>` reader, feeding one registry and the shared state table.
pub struct ThingReader<'a> {
    things: &'a mut Registry<ThingRecord>,
    table: &'a mut StateTable,
    record: ThingRecord,
    builder: RangeBuilder,
    slot: Option<usize>,
}

impl<'a> ThingReader<'a> {
    /// Creates a reader over the given registry and state table.
    pub fn new(things: &'a mut Registry<ThingRecord>, table: &'a mut StateTable) -> Self {
        Self {
            things,
            table,
            record: ThingRecord::default(),
            builder: RangeBuilder::new(),
            slot: None,
        }
    }
}

impl EntryReader for ThingReader<'_> {
    fn tag(&self) -> &str {
        "THINGS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let (name, number) = split_entry_name(session, name)?;

        let generated;
        let name = if name.is_empty() {
            session.warn("new entry is missing a name, generating one");
            generated = ddf_tables::RecordBase::unique_name("UNNAMED_MOBJ", self.things.len());
            generated.as_str()
        } else {
            name
        };

        let idx = if extend {
            self.things.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(ThingRecord::KIND, name))
            })?
        } else {
            self.things.declare(name, number)
        };

        self.record = self
            .things
            .get(idx)
            .cloned()
            .ok_or_else(|| session.fatal(Error::internal("registry slot vanished")))?;
        self.builder = RangeBuilder::new();
        self.slot = Some(idx);
        Ok(())
    }

    fn parse_field(
        &mut self,
        field: &str,
        contents: &str,
        index: usize,
        is_last: bool,
        session: &mut ParserSession,
    ) -> Result<()> {
        if names_equal(field, "WHEN_APPEAR") {
            fields::reset_when_appear(&mut self.record.appear, index);
            return fields::get_when_appear(session, contents, &mut self.record.appear);
        }

        if thing_field(
            session,
            self.table,
            &mut self.builder,
            &mut self.record,
            field,
            contents,
            index,
            is_last,
        )? {
            return Ok(());
        }

        session.warn_error(Error::unknown_command(field))
    }

    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()> {
        let builder = std::mem::take(&mut self.builder);
        builder
            .finish(self.table, &mut self.record.state_group)
            .map_err(|e| session.fatal(e))?;

        finish_thing_record(session, &mut self.record)?;

        let idx = self
            .slot
            .take()
            .ok_or_else(|| session.fatal(Error::internal("finish without start")))?;
        if let Some(slot) = self.things.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.things.clear_all();
        Ok(())
    }
}
