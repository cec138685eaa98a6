//! `#DEFINE` macro table.
//!
//! Macros are simple name/value pairs. Expansion happens once, on the whole
//! accumulated field value, just before dispatch: an exact (case-insensitive)
//! match of the value against a macro name substitutes the macro's value.
//! There is no recursion and no partial-token substitution, so defining
//! `FOO` never affects a value of `FOOBAR`.

use ddf_foundation::{Error, Result};

/// The per-source macro table. Cleared between sources.
#[derive(Debug, Default)]
pub struct MacroTable {
    defines: Vec<(String, String)>,
}

impl MacroTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// Adds a definition. Redefinition is fatal.
    pub fn add(&mut self, name: &str, value: &str) -> Result<()> {
        if self.defines.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
            return Err(Error::directive(format!("redefinition of '{name}'")));
        }
        self.defines.push((name.to_string(), value.to_string()));
        Ok(())
    }

    /// Expands a field value: the macro's value when the whole token matches
    /// a macro name, otherwise the token unchanged.
    #[must_use]
    pub fn expand<'a>(&'a self, token: &'a str) -> &'a str {
        for (name, value) in &self.defines {
            if name.eq_ignore_ascii_case(token) {
                return value;
            }
        }
        token
    }

    /// Drops all definitions.
    pub fn clear(&mut self) {
        self.defines.clear();
    }
}
