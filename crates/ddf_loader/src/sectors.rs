//! The `<SECTORS>` entry reader.
//!
//! Sector types are keyed by number, so entry headers must be plain
//! positive integers.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{
    CheckFlag, EntryReader, Field, ParserSession, SpecialFlag, check_special_flag, parse_field,
    scan,
};
use ddf_tables::{ExitKind, Record, Registry, SectorFlags, SectorRecord};

use crate::fields;

/// Parses a numeric entry header, as used by sector and line types.
pub(crate) fn numeric_entry_name(session: &ParserSession, name: &str) -> Result<i32> {
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
        return Err(session.fatal(Error::syntax(format!("bad entry number: [{name}]"))));
    }
    let mut number = 0;
    scan::get_numeric(session, name, &mut number)?;
    if number <= 0 {
        return Err(session.fatal(Error::syntax(format!("entry number out of range: {number}"))));
    }
    Ok(number)
}

const SECTOR_FLAGS: &[SpecialFlag] = &[
    SpecialFlag { name: "WHOLE_REGION", bits: SectorFlags::WHOLE_REGION.bits(), negative: false },
    SpecialFlag { name: "PROPORTIONAL", bits: SectorFlags::PROPORTIONAL.bits(), negative: false },
    SpecialFlag { name: "PUSH_ALL", bits: SectorFlags::PUSH_ALL.bits(), negative: false },
    SpecialFlag { name: "NO_ARMOUR", bits: SectorFlags::NO_ARMOUR.bits(), negative: false },
    SpecialFlag { name: "UNDERWATER", bits: SectorFlags::UNDERWATER.bits(), negative: false },
    SpecialFlag { name: "PERSISTENT", bits: SectorFlags::PERSISTENT.bits(), negative: false },
];

fn set_special(session: &ParserSession, info: &str, record: &mut SectorRecord) -> Result<()> {
    match check_special_flag(info, SECTOR_FLAGS, true, false) {
        CheckFlag::Positive(bits) => {
            record.special_flags |= SectorFlags::from_bits_truncate(bits);
        }
        CheckFlag::Negative(bits) => {
            record.special_flags -= SectorFlags::from_bits_truncate(bits);
        }
        CheckFlag::User(_) | CheckFlag::Unknown => {
            session.warn_error(Error::syntax(format!("unknown sector special: {info}")))?;
        }
    }
    Ok(())
}

fn set_exit(session: &ParserSession, info: &str, record: &mut SectorRecord) -> Result<()> {
    record.exit = if names_equal(info, "NONE") {
        ExitKind::None
    } else if names_equal(info, "NORMAL") {
        ExitKind::Normal
    } else if names_equal(info, "SECRET") {
        ExitKind::Secret
    } else {
        return Err(session.fatal(Error::bad_value("EXIT", info)));
    };
    Ok(())
}

const SECTOR_FIELDS: &[Field<SectorRecord>] = &[
    Field::set("SECRET", |s, t, r| scan::get_boolean(s, t, &mut r.secret)),
    Field::set("HUB", |s, t, r| scan::get_boolean(s, t, &mut r.hub)),
    Field::set("SPECIAL", set_special),
    Field::set("EXIT", set_exit),
    Field::sub("*LIGHT", |s, f, t, r| fields::light_field(s, f, t, &mut r.light)),
    Field::set("GRAVITY", |s, t, r| scan::get_float(s, t, &mut r.gravity)),
    Field::set("FRICTION", |s, t, r| scan::get_float(s, t, &mut r.friction)),
    Field::set("VISCOSITY", |s, t, r| scan::get_float(s, t, &mut r.viscosity)),
    Field::set("DRAG", |s, t, r| scan::get_float(s, t, &mut r.drag)),
    Field::set("AMBIENT_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.ambient_sfx)),
    Field::set("SPLASH_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.splash_sfx)),
    Field::set("PUSH_ANGLE", |s, t, r| scan::get_angle(s, t, &mut r.push_angle)),
    Field::set("PUSH_SPEED", |s, t, r| scan::get_float(s, t, &mut r.push_speed)),
    Field::set("PUSH_ZSPEED", |s, t, r| scan::get_float(s, t, &mut r.push_zspeed)),
    Field::sub("*DAMAGE", |s, f, t, r| fields::damage_field(s, f, t, &mut r.damage)),
    Field::sub("*FLOOR", |s, f, t, r| fields::mover_field(s, f, t, &mut r.floor)),
    Field::sub("*CEILING", |s, f, t, r| fields::mover_field(s, f, t, &mut r.ceil)),
];

/// The `<SECTORS>` reader.
pub struct SectorReader<'a> {
    sectors: &'a mut Registry<SectorRecord>,
    record: SectorRecord,
    slot: Option<usize>,
}

impl<'a> SectorReader<'a> {
    /// Creates a reader over the given registry.
    pub fn new(sectors: &'a mut Registry<SectorRecord>) -> Self {
        Self {
            sectors,
            record: SectorRecord::default(),
            slot: None,
        }
    }
}

impl EntryReader for SectorReader<'_> {
    fn tag(&self) -> &str {
        "SECTORS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let number = numeric_entry_name(session, name)?;
        let name = name.trim();

        let idx = if extend {
            self.sectors.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(SectorRecord::KIND, name))
            })?
        } else {
            self.sectors.declare(name, number)
        };

        self.record = self
            .sectors
            .get(idx)
            .cloned()
            .ok_or_else(|| session.fatal(Error::internal("registry slot vanished")))?;
        self.slot = Some(idx);
        Ok(())
    }

    fn parse_field(
        &mut self,
        field: &str,
        contents: &str,
        index: usize,
        _is_last: bool,
        session: &mut ParserSession,
    ) -> Result<()> {
        if names_equal(field, "WHEN_APPEAR") {
            fields::reset_when_appear(&mut self.record.appear, index);
            return fields::get_when_appear(session, contents, &mut self.record.appear);
        }
        if parse_field(session, SECTOR_FIELDS, field, contents, &mut self.record)? {
            return Ok(());
        }
        session.warn_error(Error::unknown_command(field))
    }

    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()> {
        self.record.base.crc = self.record.compute_crc();

        let idx = self
            .slot
            .take()
            .ok_or_else(|| session.fatal(Error::internal("finish without start")))?;
        if let Some(slot) = self.sectors.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.sectors.clear_all();
        Ok(())
    }
}
