//! The `<ATTACKS>` entry reader.
//!
//! Attack entries are double-barrelled: fields that do not match the
//! attack table fall through to the thing table, applied to a companion
//! object (the projectile or spawned helper). When the entry finishes and
//! the companion was touched, it is committed to the thing registry under
//! an internal `__ATKMOBJ_` name and the attack's `mobj` reference points
//! at it.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{
    CheckFlag, EntryReader, Field, ParserSession, SpecialFlag, check_special_flag, parse_field,
    scan,
};
use ddf_tables::{
    AttackFlags, AttackRecord, AttackStyle, RangeBuilder, Record, RecordBase, RefSlot, Registry,
    StateTable, ThingRecord,
};

use crate::fields;
use crate::things;

/// Prefix for generated companion-object names. The sigil keeps them
/// reachable across `#CLEARALL`.
pub const ATKMOBJ_PREFIX: &str = "__ATKMOBJ_";

const ATTACK_FLAGS: &[SpecialFlag] = &[
    SpecialFlag { name: "SMOKING_TRACER", bits: AttackFlags::TRACE_SMOKE.bits(), negative: false },
    SpecialFlag { name: "KILL_FAILED_SPAWN", bits: AttackFlags::KILL_FAILED_SPAWN.bits(), negative: false },
    SpecialFlag { name: "REMOVE_FAILED_SPAWN", bits: AttackFlags::KILL_FAILED_SPAWN.bits(), negative: true },
    SpecialFlag { name: "PRESTEP_SPAWN", bits: AttackFlags::PRESTEP_SPAWN.bits(), negative: false },
    SpecialFlag { name: "SPAWN_TELEFRAGS", bits: AttackFlags::SPAWN_TELEFRAGS.bits(), negative: false },
    SpecialFlag { name: "NEED_SIGHT", bits: AttackFlags::NEED_SIGHT.bits(), negative: false },
    SpecialFlag { name: "FACE_TARGET", bits: AttackFlags::FACE_TARGET.bits(), negative: false },
    SpecialFlag { name: "PLAYER_ATTACK", bits: AttackFlags::PLAYER.bits(), negative: false },
    SpecialFlag { name: "FORCE_AIM", bits: AttackFlags::FORCE_AIM.bits(), negative: false },
    SpecialFlag { name: "ANGLED_SPAWN", bits: AttackFlags::ANGLED_SPAWN.bits(), negative: false },
    SpecialFlag { name: "TRIGGER_LINES", bits: AttackFlags::NO_TRIGGER_LINES.bits(), negative: true },
    SpecialFlag { name: "SILENT_TO_MONSTERS", bits: AttackFlags::SILENT_TO_MONSTERS.bits(), negative: false },
    SpecialFlag { name: "TARGET", bits: AttackFlags::NO_TARGET.bits(), negative: true },
    SpecialFlag { name: "VAMPIRE", bits: AttackFlags::VAMPIRE.bits(), negative: false },
];

fn set_style(session: &ParserSession, info: &str, record: &mut AttackRecord) -> Result<()> {
    match AttackStyle::NAMES.iter().find(|(n, _)| names_equal(n, info)) {
        Some((_, style)) => {
            record.style = *style;
            Ok(())
        }
        None => Err(session.fatal(Error::bad_value("ATTACKTYPE", info))),
    }
}

fn set_special(session: &ParserSession, info: &str, record: &mut AttackRecord) -> Result<()> {
    match check_special_flag(info, ATTACK_FLAGS, true, false) {
        CheckFlag::Positive(bits) => {
            record.flags |= AttackFlags::from_bits_truncate(bits);
        }
        CheckFlag::Negative(bits) => {
            record.flags -= AttackFlags::from_bits_truncate(bits);
        }
        CheckFlag::User(_) | CheckFlag::Unknown => {
            session.warn_error(Error::syntax(format!("unknown attack special: {info}")))?;
        }
    }
    Ok(())
}

const ATTACK_FIELDS: &[Field<AttackRecord>] = &[
    Field::set("ATTACKTYPE", set_style),
    Field::set("ATTACK_SPECIAL", set_special),
    Field::set("ACCURACY_SLOPE", |s, t, r| {
        scan::get_slope(s, t, &mut r.accuracy_slope)
    }),
    Field::set("ACCURACY_ANGLE", |s, t, r| {
        scan::get_angle(s, t, &mut r.accuracy_angle)
    }),
    Field::set("X_OFFSET", |s, t, r| scan::get_float(s, t, &mut r.xoffset)),
    Field::set("Y_OFFSET", |s, t, r| scan::get_float(s, t, &mut r.yoffset)),
    Field::set("ANGLE_OFFSET", |s, t, r| scan::get_angle(s, t, &mut r.angle_offset)),
    Field::set("SLOPE_OFFSET", |s, t, r| scan::get_slope(s, t, &mut r.slope_offset)),
    Field::set("TRACE_ANGLE", |s, t, r| scan::get_angle(s, t, &mut r.trace_angle)),
    Field::set("ASSAULT_SPEED", |s, t, r| {
        scan::get_float(s, t, &mut r.assault_speed)
    }),
    Field::set("ATTACK_HEIGHT", |s, t, r| scan::get_float(s, t, &mut r.height)),
    Field::set("ATTACKRANGE", |s, t, r| scan::get_float(s, t, &mut r.range)),
    Field::set("SHOTCOUNT", |s, t, r| scan::get_numeric(s, t, &mut r.count)),
    Field::set("TOO_CLOSE_RANGE", |s, t, r| scan::get_numeric(s, t, &mut r.tooclose)),
    Field::set("BERSERK_MULTIPLY", |s, t, r| {
        scan::get_float(s, t, &mut r.berserk_mul)
    }),
    Field::set("NO_TRACE_CHANCE", |s, t, r| {
        scan::get_percent(s, t, &mut r.notracechance)
    }),
    Field::set("KEEP_FIRING_CHANCE", |s, t, r| {
        scan::get_percent(s, t, &mut r.keepfirechance)
    }),
    Field::set("ATTACK_CLASS", |s, t, r| scan::get_bitset(s, t, &mut r.attack_class)),
    Field::set("SPAWNED_OBJECT", |s, t, r| fields::get_ref(s, t, &mut r.spawnedobj)),
    Field::set("SPAWN_OBJECT_STATE", |s, t, r| {
        scan::get_string(s, t, &mut r.objinitstate_ref)
    }),
    Field::set("SPAWN_LIMIT", |s, t, r| scan::get_numeric(s, t, &mut r.spawn_limit)),
    Field::set("PUFF", |s, t, r| fields::get_ref(s, t, &mut r.puff)),
    Field::set("ATTEMPT_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.init_sound)),
    Field::set("ENGAGED_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.sound)),
    Field::sub("*DAMAGE", |s, f, t, r| fields::damage_field(s, f, t, &mut r.damage)),
    // pre-1.28 spellings
    Field::set("!DAMAGE", |s, t, r| scan::get_float(s, t, &mut r.damage.nominal)),
    Field::set("!DAMAGE_RANGE", |s, t, r| {
        scan::get_float(s, t, &mut r.damage.linear_max)
    }),
    Field::set("!DAMAGE_MULTI", |s, t, r| {
        scan::get_float(s, t, &mut r.damage.error)
    }),
];

fn bitset_letter(c: char) -> u32 {
    1 << (c as u32 - 'A' as u32)
}

/// The `<ATTACKS>` reader.
pub struct AttackReader<'a> {
    attacks: &'a mut Registry<AttackRecord>,
    things: &'a mut Registry<ThingRecord>,
    table: &'a mut StateTable,
    record: AttackRecord,
    mobj: ThingRecord,
    mobj_touched: bool,
    builder: RangeBuilder,
    slot: Option<usize>,
}

impl<'a> AttackReader<'a> {
    /// Creates a reader over the attack and thing registries.
    pub fn new(
        attacks: &'a mut Registry<AttackRecord>,
        things: &'a mut Registry<ThingRecord>,
        table: &'a mut StateTable,
    ) -> Self {
        Self {
            attacks,
            things,
            table,
            record: AttackRecord::default(),
            mobj: ThingRecord::default(),
            mobj_touched: false,
            builder: RangeBuilder::new(),
            slot: None,
        }
    }
}

impl EntryReader for AttackReader<'_> {
    fn tag(&self) -> &str {
        "ATTACKS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let (name, number) = things::split_entry_name(session, name)?;

        let idx = if extend {
            self.attacks.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(AttackRecord::KIND, name))
            })?
        } else {
            self.attacks.declare(name, number)
        };

        self.record = self
            .attacks
            .get(idx)
            .cloned()
            .ok_or_else(|| session.fatal(Error::internal("registry slot vanished")))?;
        self.mobj = ThingRecord::default();
        self.mobj_touched = false;
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
        if parse_field(session, ATTACK_FIELDS, field, contents, &mut self.record)? {
            return Ok(());
        }

        // anything else configures the companion object
        if things::thing_field(
            session,
            self.table,
            &mut self.builder,
            &mut self.mobj,
            field,
            contents,
            index,
            is_last,
        )? {
            self.mobj_touched = true;
            return Ok(());
        }

        session.warn_error(Error::unknown_command(field))
    }

    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()> {
        if self.record.damage.nominal < 0.0 {
            session.warn_error_versioned(
                128,
                Error::bad_value("DAMAGE.VAL", format!("{}", self.record.damage.nominal)),
            )?;
            self.record.damage.nominal = 0.0;
        }

        if self.record.style == AttackStyle::None {
            if session.policy.lax {
                session.warn("attack entry has no ATTACKTYPE");
            } else {
                return Err(session.fatal(Error::bad_value("ATTACKTYPE", "missing")));
            }
        }

        if self.record.attack_class == 0 {
            self.record.attack_class = match self.record.style {
                AttackStyle::CloseCombat | AttackStyle::SkullFly => bitset_letter('C'),
                AttackStyle::Shot | AttackStyle::Spray => bitset_letter('B'),
                _ => bitset_letter('M'),
            };
        }

        // traditional berserk behavior for the fist
        if names_equal(&self.record.base.name, "PLAYER_PUNCH") && self.record.berserk_mul == 1.0 {
            self.record.berserk_mul = 10.0;
        }

        if self.mobj_touched {
            let builder = std::mem::take(&mut self.builder);
            let mut mobj = std::mem::take(&mut self.mobj);
            builder
                .finish(self.table, &mut mobj.state_group)
                .map_err(|e| session.fatal(e))?;
            things::finish_thing_record(session, &mut mobj)?;

            let name = format!("{ATKMOBJ_PREFIX}{}", self.record.base.name);
            mobj.base = RecordBase::new(name.clone(), 0);
            mobj.base.crc = mobj.compute_crc();
            self.things.commit(mobj);
            self.record.mobj = RefSlot::Name(name);
        }

        self.record.base.crc = self.record.compute_crc();

        let idx = self
            .slot
            .take()
            .ok_or_else(|| session.fatal(Error::internal("finish without start")))?;
        if let Some(slot) = self.attacks.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.attacks.clear_all();
        Ok(())
    }
}
