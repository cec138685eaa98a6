//! The `<WEAPONS>` entry reader.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{
    ActionDef, ArgKind, CheckFlag, EntryReader, Field, ParserSession, SpecialFlag,
    check_special_flag, parse_field, parse_state_command, scan,
};
use ddf_tables::{
    Ammo, RangeBuilder, Record, Registry, StateTable, WeaponFlags, WeaponRecord,
};

use crate::fields;
use crate::things;

const WEAPON_FLAGS: &[SpecialFlag] = &[
    SpecialFlag { name: "SILENT_TO_MONSTERS", bits: WeaponFlags::SILENT_TO_MONSTERS.bits(), negative: false },
    SpecialFlag { name: "ANIMATED", bits: WeaponFlags::ANIMATED.bits(), negative: false },
    SpecialFlag { name: "SWITCH", bits: WeaponFlags::SWITCH_AWAY.bits(), negative: false },
    SpecialFlag { name: "TRIGGER", bits: WeaponFlags::TRIGGER.bits(), negative: false },
    SpecialFlag { name: "FRESH", bits: WeaponFlags::FRESH.bits(), negative: false },
    SpecialFlag { name: "MANUAL", bits: WeaponFlags::MANUAL.bits(), negative: false },
    SpecialFlag { name: "PARTIAL", bits: WeaponFlags::PARTIAL.bits(), negative: false },
];

fn set_ammo(session: &ParserSession, info: &str, slot_idx: usize, record: &mut WeaponRecord) -> Result<()> {
    match Ammo::NAMES.iter().find(|(n, _)| names_equal(n, info)) {
        Some((_, ammo)) => {
            record.slot_mut(slot_idx).ammo = *ammo;
            Ok(())
        }
        None => Err(session.fatal(Error::bad_value("AMMOTYPE", info))),
    }
}

fn set_special(session: &ParserSession, info: &str, slot_idx: usize, record: &mut WeaponRecord) -> Result<()> {
    let slot = record.slot_mut(slot_idx);
    match check_special_flag(info, WEAPON_FLAGS, true, false) {
        CheckFlag::Positive(bits) => {
            slot.specials |= WeaponFlags::from_bits_truncate(bits);
        }
        CheckFlag::Negative(bits) => {
            slot.specials -= WeaponFlags::from_bits_truncate(bits);
        }
        CheckFlag::User(_) | CheckFlag::Unknown => {
            session.warn_error(Error::syntax(format!("unknown weapon special: {info}")))?;
        }
    }
    Ok(())
}

const WEAPON_FIELDS: &[Field<WeaponRecord>] = &[
    Field::set("AMMOTYPE", |s, t, r| set_ammo(s, t, 0, r)),
    Field::set("AMMOPERSHOT", |s, t, r| {
        scan::get_numeric(s, t, &mut r.primary.ammopershot)
    }),
    Field::set("CLIPSIZE", |s, t, r| {
        scan::get_numeric(s, t, &mut r.primary.clip_size)
    }),
    Field::set("AUTOMATIC", |s, t, r| {
        scan::get_boolean(s, t, &mut r.primary.autofire)
    }),
    Field::set("ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.primary.attack)),
    Field::set("SPECIAL", |s, t, r| set_special(s, t, 0, r)),
    Field::set("SEC_AMMOTYPE", |s, t, r| set_ammo(s, t, 1, r)),
    Field::set("SEC_AMMOPERSHOT", |s, t, r| {
        scan::get_numeric(s, t, &mut r.secondary.ammopershot)
    }),
    Field::set("SEC_CLIPSIZE", |s, t, r| {
        scan::get_numeric(s, t, &mut r.secondary.clip_size)
    }),
    Field::set("SEC_AUTOMATIC", |s, t, r| {
        scan::get_boolean(s, t, &mut r.secondary.autofire)
    }),
    Field::set("SEC_ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.secondary.attack)),
    Field::set("SEC_SPECIAL", |s, t, r| set_special(s, t, 1, r)),
    Field::set("EJECT_ATTACK", |s, t, r| fields::get_ref(s, t, &mut r.eject_attack)),
    Field::set("FREE", |s, t, r| scan::get_boolean(s, t, &mut r.autogive)),
    Field::set("BINDKEY", |s, t, r| scan::get_numeric(s, t, &mut r.bind_key)),
    Field::set("PRIORITY", |s, t, r| scan::get_numeric(s, t, &mut r.priority)),
    Field::set("DANGEROUS", |s, t, r| scan::get_boolean(s, t, &mut r.dangerous)),
    Field::set("UPGRADES", |s, t, r| fields::get_ref(s, t, &mut r.upgrades)),
    Field::set("KICK", |s, t, r| scan::get_float(s, t, &mut r.kick)),
    Field::set("ZOOM_FOV", |s, t, r| scan::get_float(s, t, &mut r.zoom_fov)),
    Field::set("REFIRE_INACCURATE", |s, t, r| {
        scan::get_boolean(s, t, &mut r.refire_inaccurate)
    }),
    Field::set("SHOW_CLIP", |s, t, r| scan::get_boolean(s, t, &mut r.show_clip)),
    Field::set("SHARED_CLIP", |s, t, r| scan::get_boolean(s, t, &mut r.shared_clip)),
    Field::set("NOTHRUST", |s, t, r| scan::get_boolean(s, t, &mut r.nothrust)),
    Field::set("FEEDBACK", |s, t, r| scan::get_boolean(s, t, &mut r.feedback)),
    Field::set("BOBBING", |s, t, r| scan::get_percent(s, t, &mut r.bobbing)),
    Field::set("SWAYING", |s, t, r| scan::get_percent(s, t, &mut r.swaying)),
    Field::set("IDLE_WAIT", |s, t, r| scan::get_time(s, t, &mut r.idle_wait)),
    Field::set("IDLE_CHANCE", |s, t, r| scan::get_percent(s, t, &mut r.idle_chance)),
    Field::set("IDLE_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.idle_sound)),
    Field::set("ENGAGED_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.engaged_sound)),
    Field::set("HIT_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.hit_sound)),
    Field::set("START_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.start_sound)),
];

const WEAPON_ACTIONS: &[ActionDef] = &[
    ActionDef::new("NOTHING", ArgKind::None),
    ActionDef::new("READY", ArgKind::None),
    ActionDef::new("EMPTY", ArgKind::None),
    ActionDef::new("LOWER", ArgKind::None),
    ActionDef::new("RAISE", ArgKind::None),
    ActionDef::new("SHOOT", ArgKind::None),
    ActionDef::new("ESHOOT", ArgKind::None),
    ActionDef::new("FLASH", ArgKind::None),
    ActionDef::new("EFLASH", ArgKind::None),
    ActionDef::new("NOFIRE", ArgKind::None),
    ActionDef::new("NOFIRE_RETURN", ArgKind::None),
    ActionDef::new("CHECK_RELOAD", ArgKind::None),
    ActionDef::new("ECHECK_RELOAD", ArgKind::None),
    ActionDef::new("CLEAR_DECIMATE", ArgKind::None),
    ActionDef::new("KICK", ArgKind::Float),
    ActionDef::new("JUMP", ArgKind::Jump),
    ActionDef::new("PLAYSOUND", ArgKind::Sound),
    ActionDef::new("KILLSOUND", ArgKind::None),
    ActionDef::new("SET_SKIN0", ArgKind::None),
    ActionDef::new("SET_SKIN1", ArgKind::None),
    ActionDef::new("SET_SKIN2", ArgKind::None),
    ActionDef::new("SET_SKIN3", ArgKind::None),
    ActionDef::new("TRANS_SET", ArgKind::Percent),
    ActionDef::new("TRANS_FADE", ArgKind::Percent),
    ActionDef::new("LIGHT0", ArgKind::None),
    ActionDef::new("LIGHT1", ArgKind::None),
    ActionDef::new("LIGHT2", ArgKind::None),
    ActionDef::new("LIGHT3", ArgKind::None),
    ActionDef::new("SEC_SHOOT", ArgKind::None),
    ActionDef::new("SEC_FLASH", ArgKind::None),
    ActionDef::new("SEC_CHECK_RELOAD", ArgKind::None),
];

fn assign_starter(record: &mut WeaponRecord, label: &str, idx: usize) {
    let slot = if names_equal(label, "UP") {
        &mut record.up_state
    } else if names_equal(label, "DOWN") {
        &mut record.down_state
    } else if names_equal(label, "READY") {
        &mut record.ready_state
    } else if names_equal(label, "EMPTY") {
        &mut record.empty_state
    } else if names_equal(label, "IDLE") {
        &mut record.idle_state
    } else if names_equal(label, "CROSSHAIR") {
        &mut record.crosshair_state
    } else if names_equal(label, "ZOOM") {
        &mut record.zoom_state
    } else if names_equal(label, "ATTACK") {
        &mut record.primary.attack_state
    } else if names_equal(label, "RELOAD") {
        &mut record.primary.reload_state
    } else if names_equal(label, "DISCARD") {
        &mut record.primary.discard_state
    } else if names_equal(label, "WARMUP") {
        &mut record.primary.warmup_state
    } else if names_equal(label, "FLASH") {
        &mut record.primary.flash_state
    } else if names_equal(label, "SECATTACK") {
        &mut record.secondary.attack_state
    } else if names_equal(label, "SECRELOAD") {
        &mut record.secondary.reload_state
    } else if names_equal(label, "SECDISCARD") {
        &mut record.secondary.discard_state
    } else if names_equal(label, "SECWARMUP") {
        &mut record.secondary.warmup_state
    } else if names_equal(label, "SECFLASH") {
        &mut record.secondary.flash_state
    } else {
        return;
    };
    *slot = idx;
}

fn finish_weapon_record(session: &ParserSession, record: &mut WeaponRecord) -> Result<()> {
    for idx in 0..2 {
        let slot = record.slot_mut(idx);
        if slot.ammopershot < 0 {
            session.warn(&format!(
                "bad AMMOPERSHOT value {}, using 0",
                slot.ammopershot
            ));
            slot.ammopershot = 0;
        }
        // free firing never consumes ammo
        if slot.ammopershot == 0 {
            slot.ammo = Ammo::NoAmmo;
        }
        if slot.clip_size > 0
            && slot.ammopershot > 0
            && slot.clip_size % slot.ammopershot != 0
        {
            return Err(session.fatal(Error::bad_value(
                "CLIPSIZE",
                format!("{} not a multiple of ammo per shot", slot.clip_size),
            )));
        }
        if slot.discard_state > 0 && !slot.specials.contains(WeaponFlags::PARTIAL) {
            return Err(session.fatal(Error::syntax(
                "DISCARD states require the PARTIAL special",
            )));
        }
    }

    if record.shared_clip {
        if record.primary.clip_size == 0 {
            return Err(session.fatal(Error::syntax("SHARED_CLIP requires a CLIPSIZE")));
        }
        // the secondary slot rides the primary clip at fire time, so it
        // needs its own attack states but no ammo settings of its own
        if record.secondary.attack_state == 0 {
            return Err(session.fatal(Error::syntax(
                "SHARED_CLIP requires SECATTACK states",
            )));
        }
        if record.secondary.ammo != Ammo::NoAmmo
            || record.secondary.ammopershot != 0
            || record.secondary.clip_size != 0
        {
            return Err(session.fatal(Error::syntax(
                "SHARED_CLIP: cannot use SEC_AMMOTYPE, SEC_AMMOPERSHOT or SEC_CLIPSIZE",
            )));
        }
    }

    // the old negative-priority convention for dangerous weapons
    if record.priority < 0 {
        session.obsolete("negative PRIORITY")?;
        record.dangerous = true;
        record.priority = 10;
    }

    record.base.crc = record.compute_crc();
    Ok(())
}

/// The `<WEAPONS>` reader.
pub struct WeaponReader<'a> {
    weapons: &'a mut Registry<WeaponRecord>,
    table: &'a mut StateTable,
    record: WeaponRecord,
    builder: RangeBuilder,
    slot: Option<usize>,
}

impl<'a> WeaponReader<'a> {
    /// Creates a reader over the given registry and state table.
    pub fn new(weapons: &'a mut Registry<WeaponRecord>, table: &'a mut StateTable) -> Self {
        Self {
            weapons,
            table,
            record: WeaponRecord::default(),
            builder: RangeBuilder::new(),
            slot: None,
        }
    }
}

impl EntryReader for WeaponReader<'_> {
    fn tag(&self) -> &str {
        "WEAPONS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let (name, number) = things::split_entry_name(session, name)?;

        let idx = if extend {
            self.weapons.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(WeaponRecord::KIND, name))
            })?
        } else {
            self.weapons.declare(name, number)
        };

        self.record = self
            .weapons
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
        if parse_field(session, WEAPON_FIELDS, field, contents, &mut self.record)? {
            return Ok(());
        }

        if let Some((label, first)) = parse_state_command(
            session,
            self.table,
            &mut self.builder,
            field,
            contents,
            index,
            is_last,
            WEAPON_ACTIONS,
            true,
            None,
        )? {
            if let Some(idx) = first {
                assign_starter(&mut self.record, &label, idx);
            }
            return Ok(());
        }

        session.warn_error(Error::unknown_command(field))
    }

    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()> {
        let builder = std::mem::take(&mut self.builder);
        builder
            .finish(self.table, &mut self.record.state_group)
            .map_err(|e| session.fatal(e))?;

        finish_weapon_record(session, &mut self.record)?;

        let idx = self
            .slot
            .take()
            .ok_or_else(|| session.fatal(Error::internal("finish without start")))?;
        if let Some(slot) = self.weapons.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.weapons.clear_all();
        Ok(())
    }
}
