//! The top-level loader: owns every registry and drives the per-kind
//! readers over source text.
//!
//! Usage is three-phase: construct a [`Loader`], feed it any number of
//! sources in any order, then call [`finalize`](Loader::finalize) to
//! resolve cross-references and seal the registries for fast lookup.

use ddf_foundation::{DiagPolicy, Error, Result};
use ddf_parse::{ParserSession, read_source};
use ddf_tables::{
    AttackRecord, GenCache, LineRecord, Registry, SectorRecord, SoundRecord, StateTable,
    ThingRecord, WeaponRecord, is_gen_line, is_gen_sector,
};

use crate::attacks::AttackReader;
use crate::cleanup::cleanup_all;
use crate::lines::LineReader;
use crate::sectors::SectorReader;
use crate::sounds::SoundReader;
use crate::things::ThingReader;
use crate::weapons::WeaponReader;

/// Owns every definition table plus the shared state table.
pub struct Loader {
    policy: DiagPolicy,
    things: Registry<ThingRecord>,
    attacks: Registry<AttackRecord>,
    weapons: Registry<WeaponRecord>,
    sounds: Registry<SoundRecord>,
    lines: Registry<LineRecord>,
    sectors: Registry<SectorRecord>,
    states: StateTable,
    gen_cache: GenCache,
}

impl Loader {
    /// Creates an empty loader with the given severity policy.
    #[must_use]
    pub fn new(policy: DiagPolicy) -> Self {
        Self {
            policy,
            things: Registry::new(),
            attacks: Registry::new(),
            weapons: Registry::new(),
            sounds: Registry::new(),
            lines: Registry::new(),
            sectors: Registry::new(),
            states: StateTable::new(),
            gen_cache: GenCache::new(),
        }
    }

    /// Reads a `<THINGS>` source.
    pub fn load_things(&mut self, source: &str, text: &str) -> Result<()> {
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        let mut reader = ThingReader::new(&mut self.things, &mut self.states);
        read_source(&mut reader, &mut session, text)?;
        // a #VERSION directive raises the format version for later sources
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads an `<ATTACKS>` source.
    pub fn load_attacks(&mut self, source: &str, text: &str) -> Result<()> {
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        let mut reader = AttackReader::new(&mut self.attacks, &mut self.things, &mut self.states);
        read_source(&mut reader, &mut session, text)?;
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads a `<WEAPONS>` source.
    pub fn load_weapons(&mut self, source: &str, text: &str) -> Result<()> {
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        let mut reader = WeaponReader::new(&mut self.weapons, &mut self.states);
        read_source(&mut reader, &mut session, text)?;
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads a `<SOUNDS>` source.
    pub fn load_sounds(&mut self, source: &str, text: &str) -> Result<()> {
        let mut reader = SoundReader::new(&mut self.sounds);
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        read_source(&mut reader, &mut session, text)?;
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads a `<LINES>` source.
    pub fn load_lines(&mut self, source: &str, text: &str) -> Result<()> {
        let mut reader = LineReader::new(&mut self.lines);
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        read_source(&mut reader, &mut session, text)?;
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads a `<SECTORS>` source.
    pub fn load_sectors(&mut self, source: &str, text: &str) -> Result<()> {
        let mut reader = SectorReader::new(&mut self.sectors);
        let mut session = ParserSession::new(self.policy);
        session.begin_source(source);
        read_source(&mut reader, &mut session, text)?;
        self.policy.version = session.policy.version;
        Ok(())
    }

    /// Reads a source, dispatching on its `<TAG>` header.
    pub fn load(&mut self, source: &str, text: &str) -> Result<()> {
        let tag = peek_tag(text)
            .ok_or_else(|| Error::directive(format!("{source}: no <TAG> header found")))?;

        if tag.eq_ignore_ascii_case("THINGS") {
            self.load_things(source, text)
        } else if tag.eq_ignore_ascii_case("ATTACKS") {
            self.load_attacks(source, text)
        } else if tag.eq_ignore_ascii_case("WEAPONS") {
            self.load_weapons(source, text)
        } else if tag.eq_ignore_ascii_case("SOUNDS") {
            self.load_sounds(source, text)
        } else if tag.eq_ignore_ascii_case("LINES") {
            self.load_lines(source, text)
        } else if tag.eq_ignore_ascii_case("SECTORS") {
            self.load_sectors(source, text)
        } else {
            Err(Error::directive(format!("{source}: unknown tag <{tag}>")))
        }
    }

    /// Resolves cross-references and seals every registry.
    ///
    /// Must be called once, after the last source has been read and before
    /// any queries.
    pub fn finalize(&mut self) -> Result<()> {
        cleanup_all(
            self.policy,
            &mut self.things,
            &mut self.attacks,
            &mut self.weapons,
            &self.sounds,
            &mut self.lines,
            &mut self.sectors,
            &mut self.states,
        )?;

        self.things.seal();
        self.attacks.seal();
        self.weapons.seal();
        self.sounds.seal();
        self.lines.seal();
        self.sectors.seal();
        Ok(())
    }

    /// The thing registry.
    #[must_use]
    pub fn things(&self) -> &Registry<ThingRecord> {
        &self.things
    }

    /// The attack registry.
    #[must_use]
    pub fn attacks(&self) -> &Registry<AttackRecord> {
        &self.attacks
    }

    /// The weapon registry.
    #[must_use]
    pub fn weapons(&self) -> &Registry<WeaponRecord> {
        &self.weapons
    }

    /// The sound registry.
    #[must_use]
    pub fn sounds(&self) -> &Registry<SoundRecord> {
        &self.sounds
    }

    /// The shared state table.
    #[must_use]
    pub fn states(&self) -> &StateTable {
        &self.states
    }

    /// Looks up a thing definition by name.
    #[must_use]
    pub fn thing_by_name(&self, name: &str) -> Option<&ThingRecord> {
        self.things.lookup(name)
    }

    /// Looks up a thing definition by map-editor number.
    #[must_use]
    pub fn thing_by_number(&self, number: i32) -> Option<&ThingRecord> {
        self.things
            .lookup_number(number)
            .and_then(|i| self.things.get(i))
    }

    /// Looks up a weapon definition by name.
    #[must_use]
    pub fn weapon_by_name(&self, name: &str) -> Option<&WeaponRecord> {
        self.weapons.lookup(name)
    }

    /// Looks up a sound definition by name.
    #[must_use]
    pub fn sound_by_name(&self, name: &str) -> Option<&SoundRecord> {
        self.sounds.lookup(name)
    }

    /// Looks up the thing definition for a player number.
    #[must_use]
    pub fn player_by_number(&self, playernum: i32) -> Option<&ThingRecord> {
        (0..self.things.len())
            .filter_map(|i| self.things.get(i))
            .find(|t| t.playernum == playernum && playernum > 0)
    }

    /// Cast-parade members, ordered by `CASTORDER`.
    #[must_use]
    pub fn cast_order(&self) -> Vec<&ThingRecord> {
        let mut cast: Vec<&ThingRecord> = (0..self.things.len())
            .filter_map(|i| self.things.get(i))
            .filter(|t| t.castorder > 0)
            .collect();
        cast.sort_by_key(|t| t.castorder);
        cast
    }

    /// Looks up a line type by number, decoding generalized (BOOM) types
    /// on demand.
    pub fn line_by_number(&mut self, number: i32) -> Option<&LineRecord> {
        if let Some(idx) = self.lines.lookup_number(number) {
            return self.lines.get(idx);
        }
        if is_gen_line(number) {
            return Some(self.gen_cache.gen_line(number));
        }
        None
    }

    /// Looks up a sector type by number, decoding generalized (BOOM) types
    /// on demand.
    pub fn sector_by_number(&mut self, number: i32) -> Option<&SectorRecord> {
        if let Some(idx) = self.sectors.lookup_number(number) {
            return self.sectors.get(idx);
        }
        if is_gen_sector(number) {
            return Some(self.gen_cache.gen_sector(number));
        }
        None
    }

    /// Drops cached generalized types (between map loads).
    pub fn clear_gen_cache(&mut self) {
        self.gen_cache.clear();
    }
}

fn peek_tag(text: &str) -> Option<&str> {
    let start = text.find('<')?;
    let rest = &text[start + 1..];
    let end = rest.find('>')?;
    let tag = &rest[..end];
    (!tag.is_empty()).then_some(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddf_tables::MoveType;

    fn base_world(loader: &mut Loader) {
        loader
            .load_things(
                "things.ddf",
                "<THINGS>\n\
                 [BLOOD]\nSTATES(IDLE)=BLUD:A:8:NORMAL:NOTHING,#REMOVE;\n\
                 [PUFF]\nSTATES(IDLE)=PUFF:A:4:NORMAL:NOTHING,#REMOVE;\n\
                 [RESPAWN_FLASH]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n\
                 [ITEM_RESPAWN]\nSTATES(IDLE)=IFOG:A:6:BRIGHT:NOTHING,#REMOVE;\n",
            )
            .unwrap();
    }

    #[test]
    fn full_pipeline() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);

        loader
            .load_sounds("sounds.ddf", "<SOUNDS>\n[FIRSHT]\nLUMP_NAME=\"DSFIRSHT\";\n")
            .unwrap();
        loader
            .load_attacks(
                "attacks.ddf",
                "<ATTACKS>\n[IMP_FIREBALL]\nATTACKTYPE=PROJECTILE;\nDAMAGE.VAL=8;\n\
                 ATTEMPT_SOUND=FIRSHT;\n",
            )
            .unwrap();
        loader
            .load_things(
                "imp.ddf",
                "<THINGS>\n[IMP:3001]\nRADIUS=20;\nHEIGHT=56;\n\
                 RANGE_ATTACK=IMP_FIREBALL;\n\
                 STATES(SPAWN)=TROO:A:10:NORMAL:LOOKOUT,#SPAWN;\n",
            )
            .unwrap();

        loader.finalize().unwrap();

        let imp = loader.thing_by_name("IMP").unwrap();
        assert_eq!(imp.base.number, 3001);
        assert!(matches!(imp.range_attack, ddf_tables::RefSlot::Resolved(_)));
        assert!(loader.thing_by_number(3001).is_some());
    }

    #[test]
    fn tag_dispatch() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);
        loader
            .load("lines.ddf", "<LINES>\n[1]\nTYPE=MANUAL;\n")
            .unwrap();
        loader.finalize().unwrap();
        assert!(loader.line_by_number(1).is_some());
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut loader = Loader::new(DiagPolicy::default());
        assert!(loader.load("odd.ddf", "<WIBBLE>\n[X]\n").is_err());
    }

    #[test]
    fn generalized_line_fallback() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);
        loader.finalize().unwrap();

        // 0x6000 range is a generalized floor mover
        let line = loader.line_by_number(0x6001).unwrap();
        assert_ne!(line.floor.kind, MoveType::Undefined);

        // repeated lookups hit the cache
        let again = loader.line_by_number(0x6001).unwrap();
        assert_eq!(again.base.number, 0x6001);

        // plain unknown numbers below the generalized range stay unknown
        assert!(loader.line_by_number(500).is_none());
    }

    #[test]
    fn version_carries_across_sources() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);
        loader
            .load_sounds("sounds.ddf", "<SOUNDS>\n#VERSION 1.30\n[X]\nLUMP_NAME=\"DSX\";\n")
            .unwrap();
        assert_eq!(loader.policy.version, 130);
    }

    #[test]
    fn player_lookup_uses_player_numbers() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);
        loader
            .load_things(
                "players.ddf",
                "<THINGS>\n[OUR_HERO:1]\nPLAYER=1;\nRADIUS=16;\nHEIGHT=56;\n\
                 STATES(SPAWN)=PLAY:A:-1:NORMAL:NOTHING,#REMOVE;\n",
            )
            .unwrap();
        loader.finalize().unwrap();

        assert_eq!(
            loader.player_by_number(1).map(|t| t.base.name.as_str()),
            Some("OUR_HERO")
        );
        assert!(loader.player_by_number(2).is_none());
        assert!(loader.player_by_number(0).is_none());
    }

    #[test]
    fn cast_order_is_sorted() {
        let mut loader = Loader::new(DiagPolicy::default());
        base_world(&mut loader);
        loader
            .load_things(
                "cast.ddf",
                "<THINGS>\n\
                 [ZOMBIE]\nCASTORDER=2;\n\
                 STATES(CHASE)=POSS:A:4:NORMAL:CHASE,#CHASE;\n\
                 STATES(DEATH)=POSS:H:5:NORMAL:NOTHING,#REMOVE;\n\
                 [IMP]\nCASTORDER=1;\n\
                 STATES(CHASE)=TROO:A:3:NORMAL:CHASE,#CHASE;\n\
                 STATES(DEATH)=TROO:I:8:NORMAL:NOTHING,#REMOVE;\n",
            )
            .unwrap();
        loader.finalize().unwrap();

        let cast = loader.cast_order();
        assert_eq!(cast.len(), 2);
        assert_eq!(cast[0].base.name, "IMP");
        assert_eq!(cast[1].base.name, "ZOMBIE");
    }
}
