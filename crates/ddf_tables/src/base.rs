//! Common identity carried by every definition record.

use std::fmt;

use flate2::Crc;

/// Accumulating CRC-32 over a record's contents.
///
/// Finished records hash their fields so the engine can detect whether two
/// loads produced identical content (demo/netgame consistency checks).
pub struct Checksum {
    crc: Crc,
}

impl Checksum {
    /// Creates a fresh checksum.
    #[must_use]
    pub fn new() -> Self {
        Self { crc: Crc::new() }
    }

    /// Feeds a string into the checksum.
    pub fn add_str(&mut self, s: &str) {
        self.crc.update(s.as_bytes());
    }

    /// Feeds an integer into the checksum.
    pub fn add_i32(&mut self, v: i32) {
        self.crc.update(&v.to_le_bytes());
    }

    /// Feeds a float into the checksum.
    pub fn add_f32(&mut self, v: f32) {
        self.crc.update(&v.to_le_bytes());
    }

    /// Returns the accumulated CRC-32 value.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.crc.sum()
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({:08x})", self.value())
    }
}

/// Identity shared by all definition kinds: name, optional numeric id, and
/// the checksum of the finished record.
///
/// Identity survives redefinition: when a later source overrides an entry,
/// the record is reset to defaults but keeps its name and number.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordBase {
    /// Definition name, as written in the entry header (upper-cased).
    pub name: String,
    /// Numeric id from a `[NAME:number]` header, or 0 when absent.
    pub number: i32,
    /// CRC-32 of the finished record, recomputed by `finish_entry`.
    pub crc: u32,
}

impl RecordBase {
    /// Creates an identity with the given name and number.
    #[must_use]
    pub fn new(name: impl Into<String>, number: i32) -> Self {
        Self {
            name: name.into(),
            number,
            crc: 0,
        }
    }

    /// Builds a generated name for an entry that supplied none.
    #[must_use]
    pub fn unique_name(prefix: &str, serial: usize) -> String {
        format!("_{prefix}_{serial}")
    }

    /// Feeds the identity into a checksum.
    pub fn add_to(&self, ck: &mut Checksum) {
        ck.add_str(&self.name);
        ck.add_i32(self.number);
    }
}

/// A named cross-reference, raw until the cleanup pass resolves it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefSlot {
    /// No reference was given.
    Empty,
    /// A name parsed from source, not yet resolved.
    Name(String),
    /// Registry index filled in by the cleanup pass.
    Resolved(usize),
}

impl RefSlot {
    /// The raw name, if still unresolved.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }

    /// The resolved registry index, if resolution has happened.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Resolved(i) => Some(*i),
            _ => None,
        }
    }

    /// Whether no reference was given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl Default for RefSlot {
    fn default() -> Self {
        Self::Empty
    }
}
