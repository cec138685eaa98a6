//! Ordered, name-keyed containers for definition records.
//!
//! Definitions are ordered by completion time and unique by name. Redefining
//! a name moves the existing record to the end of the order and resets it,
//! so "last definition wins" for both lookup and iteration order. A
//! `#CLEARALL` directive does not free anything: it advances a watermark and
//! records below it become invisible to ordinary lookups.

use std::collections::HashMap;

use ddf_foundation::names_equal;

use crate::base::RecordBase;

/// Implemented by every definition record kind stored in a [`Registry`].
pub trait Record: Default {
    /// Kind name used in diagnostics ("thing", "attack", ...).
    const KIND: &'static str;

    /// Shared identity of this record.
    fn base(&self) -> &RecordBase;

    /// Mutable access to the shared identity.
    fn base_mut(&mut self) -> &mut RecordBase;
}

/// Ordered container of records of one kind.
#[derive(Debug, Default)]
pub struct Registry<T: Record> {
    records: Vec<T>,
    disabled_count: usize,
    number_index: Option<HashMap<i32, usize>>,
}

impl<T: Record> Registry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            disabled_count: 0,
            number_index: None,
        }
    }

    /// Number of records, including disabled ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the registry holds no records at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records hidden below the `#CLEARALL` watermark.
    #[must_use]
    pub fn disabled_count(&self) -> usize {
        self.disabled_count
    }

    /// Index of the oldest record still visible to lookups, if any.
    #[must_use]
    pub fn first_enabled(&self) -> Option<usize> {
        (self.disabled_count < self.records.len()).then_some(self.disabled_count)
    }

    /// Direct access by index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.records.get(index)
    }

    /// Direct mutable access by index.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.records.get_mut(index)
    }

    /// Iterates over every record, disabled ones included.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.records.iter()
    }

    /// Iterates mutably over every record, disabled ones included.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.records.iter_mut()
    }

    /// Iterates over the records visible to ordinary lookups.
    pub fn iter_enabled(&self) -> impl Iterator<Item = &T> {
        self.records.iter().skip(self.disabled_count)
    }

    /// Finds a record by name regardless of the disabled watermark.
    ///
    /// This is the view entry definitions get: a header can reopen any
    /// earlier definition, even one hidden by `#CLEARALL`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.records
            .iter()
            .rposition(|r| names_equal(&r.base().name, name))
    }

    /// Finds a record by name under reference-lookup rules.
    ///
    /// Most recent definition wins. Records below the disabled watermark are
    /// invisible unless the reference starts with the internal-name sigil
    /// `_`, which engine-generated definitions use to stay reachable.
    #[must_use]
    pub fn lookup_index(&self, name: &str) -> Option<usize> {
        let idx = self.position(name)?;
        if idx < self.disabled_count && !name.starts_with('_') {
            return None;
        }
        Some(idx)
    }

    /// Reference lookup returning the record itself.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&T> {
        self.lookup_index(name).map(|i| &self.records[i])
    }

    /// Finds a record by numeric id (most recent wins, disabled skipped).
    ///
    /// After [`seal`](Self::seal) this is a hash lookup; during load it is a
    /// tail-first scan with identical results.
    #[must_use]
    pub fn lookup_number(&self, number: i32) -> Option<usize> {
        if number == 0 {
            return None;
        }
        if let Some(index) = &self.number_index {
            return index.get(&number).copied();
        }
        self.records
            .iter()
            .rposition(|r| r.base().number == number)
            .filter(|&i| i >= self.disabled_count)
    }

    /// Opens a definition for the given identity, appending or overriding.
    ///
    /// A fresh name appends a default record. An existing name moves its
    /// record to the end of the order and resets it to defaults, keeping the
    /// identity; a stored number is kept unless the new header supplies one.
    /// Returns the index of the opened record (always the last slot).
    pub fn declare(&mut self, name: &str, number: i32) -> usize {
        if let Some(idx) = self.position(name) {
            let mut rec = self.records.remove(idx);
            if idx < self.disabled_count {
                self.disabled_count -= 1;
            }
            let old = std::mem::take(rec.base_mut());
            rec = T::default();
            *rec.base_mut() = RecordBase {
                name: old.name,
                number: if number != 0 { number } else { old.number },
                crc: 0,
            };
            self.records.push(rec);
        } else {
            let mut rec = T::default();
            *rec.base_mut() = RecordBase::new(name, number);
            self.records.push(rec);
        }
        self.number_index = None;
        self.records.len() - 1
    }

    /// Reopens an existing definition without resetting it (`[++NAME]`).
    ///
    /// Returns `None` when the name was never defined.
    pub fn reopen(&mut self, name: &str) -> Option<usize> {
        self.position(name)
    }

    /// Appends a fully-formed record, replacing any record of the same name.
    ///
    /// Used for engine-generated definitions (attack companion objects).
    pub fn commit(&mut self, rec: T) -> usize {
        if let Some(idx) = self.position(&rec.base().name) {
            self.records.remove(idx);
            if idx < self.disabled_count {
                self.disabled_count -= 1;
            }
        }
        self.records.push(rec);
        self.number_index = None;
        self.records.len() - 1
    }

    /// Advances the disabled watermark over everything defined so far.
    pub fn clear_all(&mut self) {
        self.disabled_count = self.records.len();
        self.number_index = None;
    }

    /// Builds the numeric-id index. Call once after the cleanup pass; the
    /// registry is effectively read-only afterwards.
    pub fn seal(&mut self) {
        let mut index = HashMap::new();
        for (i, rec) in self.records.iter().enumerate().skip(self.disabled_count) {
            let number = rec.base().number;
            if number != 0 {
                index.insert(number, i);
            }
        }
        self.number_index = Some(index);
    }
}
