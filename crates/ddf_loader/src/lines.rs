//! The `<LINES>` entry reader.

use ddf_foundation::{Error, Result, names_equal};
use ddf_parse::{
    CheckFlag, EntryReader, Field, ParserSession, SpecialFlag, check_special_flag, parse_field,
    scan,
};
use ddf_tables::{
    ActivatorFlags, Donut, KeyFlags, LineRecord, Record, Registry, Teleport, TriggerKind,
};

use crate::fields;
use crate::sectors::numeric_entry_name;

fn set_trigger(session: &ParserSession, info: &str, record: &mut LineRecord) -> Result<()> {
    record.trigger = if names_equal(info, "WALK") {
        TriggerKind::Walkable
    } else if names_equal(info, "PUSH") {
        TriggerKind::Pushable
    } else if names_equal(info, "SHOOT") {
        TriggerKind::Shootable
    } else if names_equal(info, "MANUAL") {
        TriggerKind::Manual
    } else if names_equal(info, "NONE") {
        TriggerKind::None
    } else {
        return Err(session.fatal(Error::bad_value("TYPE", info)));
    };
    Ok(())
}

const ACTIVATOR_FLAGS: &[SpecialFlag] = &[
    SpecialFlag { name: "PLAYER", bits: ActivatorFlags::PLAYER.bits(), negative: false },
    SpecialFlag { name: "MONSTER", bits: ActivatorFlags::MONSTER.bits(), negative: false },
    SpecialFlag { name: "OTHER", bits: ActivatorFlags::OTHER.bits(), negative: false },
    SpecialFlag { name: "NOBOT", bits: ActivatorFlags::NO_BOT.bits(), negative: false },
];

fn set_activators(session: &ParserSession, info: &str, record: &mut LineRecord) -> Result<()> {
    match check_special_flag(info, ACTIVATOR_FLAGS, true, false) {
        CheckFlag::Positive(bits) => {
            record.obj |= ActivatorFlags::from_bits_truncate(bits);
        }
        CheckFlag::Negative(bits) => {
            record.obj -= ActivatorFlags::from_bits_truncate(bits);
        }
        CheckFlag::User(_) | CheckFlag::Unknown => {
            session.warn_error(Error::syntax(format!("unknown activator: {info}")))?;
        }
    }
    Ok(())
}

const KEY_NAMES: &[(&str, KeyFlags)] = &[
    ("RED_CARD", KeyFlags::RED_CARD),
    ("BLUE_CARD", KeyFlags::BLUE_CARD),
    ("YELLOW_CARD", KeyFlags::YELLOW_CARD),
    ("GREEN_CARD", KeyFlags::GREEN_CARD),
    ("RED_SKULL", KeyFlags::RED_SKULL),
    ("BLUE_SKULL", KeyFlags::BLUE_SKULL),
    ("YELLOW_SKULL", KeyFlags::YELLOW_SKULL),
    ("GREEN_SKULL", KeyFlags::GREEN_SKULL),
    ("STRICTLY_ALL", KeyFlags::STRICTLY_ALL),
    ("CARD_SKULL_EQUIVALENCY", KeyFlags::CARD_SKULL_EQUIV),
];

fn set_keys(session: &ParserSession, info: &str, record: &mut LineRecord) -> Result<()> {
    if names_equal(info, "NONE") {
        record.keys = KeyFlags::empty();
        return Ok(());
    }
    if names_equal(info, "ANY") {
        record.keys |= KeyFlags::any();
        return Ok(());
    }
    if names_equal(info, "ALL") {
        record.keys |= KeyFlags::any() | KeyFlags::STRICTLY_ALL;
        return Ok(());
    }
    match KEY_NAMES.iter().find(|(n, _)| names_equal(n, info)) {
        Some((_, key)) => {
            record.keys |= *key;
            Ok(())
        }
        None => session.warn_error(Error::bad_value("KEYS", info)),
    }
}

const DONUT_FIELDS: &[Field<Donut>] = &[
    Field::set("IN_SOUND", |s, t, d| fields::get_ref(s, t, &mut d.in_sfx)),
    Field::set("IN_STOP_SOUND", |s, t, d| fields::get_ref(s, t, &mut d.in_sfx_stop)),
    Field::set("OUT_SOUND", |s, t, d| fields::get_ref(s, t, &mut d.out_sfx)),
    Field::set("OUT_STOP_SOUND", |s, t, d| fields::get_ref(s, t, &mut d.out_sfx_stop)),
];

const TELEPORT_FIELDS: &[Field<Teleport>] = &[
    Field::set("DELAY", |s, t, d| scan::get_time(s, t, &mut d.delay)),
    Field::set("IN_EFFECT", |s, t, d| fields::get_ref(s, t, &mut d.in_effect)),
    Field::set("OUT_EFFECT", |s, t, d| fields::get_ref(s, t, &mut d.out_effect)),
    Field::set("SAME_DIRECTION", |s, t, d| scan::get_boolean(s, t, &mut d.same_dir)),
    Field::set("LINE_BASED", |s, t, d| scan::get_boolean(s, t, &mut d.line_based)),
];

const LINE_FIELDS: &[Field<LineRecord>] = &[
    Field::set("NEWTRIGGER", |s, t, r| scan::get_numeric(s, t, &mut r.newtrignum)),
    Field::set("TYPE", set_trigger),
    Field::set("ACTIVATORS", set_activators),
    Field::set("KEYS", set_keys),
    Field::set("COUNT", |s, t, r| scan::get_numeric(s, t, &mut r.count)),
    Field::set("FAILED_MESSAGE", |s, t, r| {
        scan::get_string(s, t, &mut r.failedmessage)
    }),
    Field::set("FAILED_SOUND", |s, t, r| fields::get_ref(s, t, &mut r.failed_sfx)),
    Field::sub("*FLOOR", |s, f, t, r| fields::mover_field(s, f, t, &mut r.floor)),
    Field::sub("*CEILING", |s, f, t, r| fields::mover_field(s, f, t, &mut r.ceil)),
    Field::set("DONUT", |s, t, r| scan::get_boolean(s, t, &mut r.donut.enabled)),
    Field::sub("*DONUT", |s, f, t, r| {
        parse_field(s, DONUT_FIELDS, f, t, &mut r.donut)
    }),
    Field::set("TELEPORT", |s, t, r| {
        scan::get_boolean(s, t, &mut r.teleport.enabled)
    }),
    Field::sub("*TELEPORT", |s, f, t, r| {
        parse_field(s, TELEPORT_FIELDS, f, t, &mut r.teleport)
    }),
    Field::sub("*LIGHT", |s, f, t, r| fields::light_field(s, f, t, &mut r.light)),
    Field::set("GRAVITY", |s, t, r| scan::get_float(s, t, &mut r.gravity)),
    Field::set("FRICTION", |s, t, r| scan::get_float(s, t, &mut r.friction)),
];

/// The `<LINES>` reader.
pub struct LineReader<'a> {
    lines: &'a mut Registry<LineRecord>,
    record: LineRecord,
    slot: Option<usize>,
}

impl<'a> LineReader<'a> {
    /// Creates a reader over the given registry.
    pub fn new(lines: &'a mut Registry<LineRecord>) -> Self {
        Self {
            lines,
            record: LineRecord::default(),
            slot: None,
        }
    }
}

impl EntryReader for LineReader<'_> {
    fn tag(&self) -> &str {
        "LINES"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let number = numeric_entry_name(session, name)?;
        let name = name.trim();

        let idx = if extend {
            self.lines.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(LineRecord::KIND, name))
            })?
        } else {
            self.lines.declare(name, number)
        };

        self.record = self
            .lines
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
        if parse_field(session, LINE_FIELDS, field, contents, &mut self.record)? {
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
        if let Some(slot) = self.lines.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.lines.clear_all();
        Ok(())
    }
}
