//! The `<SOUNDS>` entry reader.

use ddf_foundation::{Error, Result};
use ddf_parse::{EntryReader, Field, ParserSession, parse_field, scan};
use ddf_tables::{Record, Registry, SoundRecord};

use crate::things;

const SOUND_FIELDS: &[Field<SoundRecord>] = &[
    Field::set("LUMP_NAME", |s, t, r| scan::get_lump_name(s, t, &mut r.lump_name)),
    Field::set("FILE_NAME", |s, t, r| scan::get_string(s, t, &mut r.file_name)),
    Field::set("SINGULAR", |s, t, r| scan::get_numeric(s, t, &mut r.singularity)),
    Field::set("PRIORITY", |s, t, r| scan::get_numeric(s, t, &mut r.priority)),
    Field::set("VOLUME", |s, t, r| scan::get_percent(s, t, &mut r.volume)),
    Field::set("LOOP", |s, t, r| scan::get_boolean(s, t, &mut r.looping)),
    Field::set("PRECIOUS", |s, t, r| scan::get_boolean(s, t, &mut r.precious)),
    Field::set("MAX_DISTANCE", |s, t, r| {
        scan::get_float(s, t, &mut r.max_distance)
    }),
];

/// The `<SOUNDS>` reader.
pub struct SoundReader<'a> {
    sounds: &'a mut Registry<SoundRecord>,
    record: SoundRecord,
    slot: Option<usize>,
}

impl<'a> SoundReader<'a> {
    /// Creates a reader over the given registry.
    pub fn new(sounds: &'a mut Registry<SoundRecord>) -> Self {
        Self {
            sounds,
            record: SoundRecord::default(),
            slot: None,
        }
    }
}

impl EntryReader for SoundReader<'_> {
    fn tag(&self) -> &str {
        "SOUNDS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession) -> Result<()> {
        let (name, number) = things::split_entry_name(session, name)?;

        let idx = if extend {
            self.sounds.reopen(name).ok_or_else(|| {
                session.fatal(Error::unknown_reference(SoundRecord::KIND, name))
            })?
        } else {
            self.sounds.declare(name, number)
        };

        self.record = self
            .sounds
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
        _index: usize,
        _is_last: bool,
        session: &mut ParserSession,
    ) -> Result<()> {
        if parse_field(session, SOUND_FIELDS, field, contents, &mut self.record)? {
            return Ok(());
        }
        session.warn_error(Error::unknown_command(field))
    }

    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()> {
        if self.record.lump_name.is_empty() && self.record.file_name.is_empty() {
            return Err(session.fatal(Error::syntax(
                "sound entry needs a LUMP_NAME or FILE_NAME",
            )));
        }

        self.record.base.crc = self.record.compute_crc();

        let idx = self
            .slot
            .take()
            .ok_or_else(|| session.fatal(Error::internal("finish without start")))?;
        if let Some(slot) = self.sounds.get_mut(idx) {
            *slot = std::mem::take(&mut self.record);
        }
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.sounds.clear_all();
        Ok(())
    }
}
