//! Field descriptor tables and command dispatch.
//!
//! Each entry kind owns a static table mapping command names to setter
//! functions. Matching uses DDF name comparison, so `SPAWN HEALTH`,
//! `spawn_health` and `SpawnHealth` all hit the same descriptor. Two name
//! prefixes carry meaning: `!` marks an obsolete alias (the value is still
//! applied, but a deprecation diagnostic fires), and `*` marks a group
//! whose sub-fields are addressed as `GROUP.FIELD` and dispatched
//! recursively into a nested table.

use ddf_foundation::{Result, names_equal};

use crate::session::ParserSession;

/// A setter: interprets the field text and writes it into the target.
pub type SetFn<T> = fn(&ParserSession, &str, &mut T) -> Result<()>;

/// A sub-table dispatcher: receives the sub-field name after the `.` and
/// re-dispatches into a nested table through a projection of the target.
pub type SubFn<T> = fn(&ParserSession, &str, &str, &mut T) -> Result<bool>;

/// How a matched descriptor applies its value.
pub enum FieldKind<T> {
    /// Direct setter.
    Set(SetFn<T>),
    /// Nested group of sub-fields.
    Sub(SubFn<T>),
}

/// One command descriptor.
pub struct Field<T> {
    /// Command name, optionally prefixed `!` (obsolete) or `*` (group).
    pub name: &'static str,
    /// The operation applied on a match.
    pub kind: FieldKind<T>,
}

impl<T> Field<T> {
    /// A direct-setter descriptor.
    #[must_use]
    pub const fn set(name: &'static str, f: SetFn<T>) -> Self {
        Self {
            name,
            kind: FieldKind::Set(f),
        }
    }

    /// A nested-group descriptor. The name should carry the `*` prefix.
    #[must_use]
    pub const fn sub(name: &'static str, f: SubFn<T>) -> Self {
        Self {
            name,
            kind: FieldKind::Sub(f),
        }
    }
}

/// Dispatches one command into a field table.
///
/// Returns `Ok(false)` when no descriptor matches, so the caller can try a
/// fallback table before reporting an unknown command.
pub fn parse_field<T>(
    session: &ParserSession,
    table: &[Field<T>],
    field: &str,
    contents: &str,
    target: &mut T,
) -> Result<bool> {
    for descriptor in table {
        let mut name = descriptor.name;

        let obsolete = name.starts_with('!');
        if obsolete {
            name = &name[1..];
        }

        if let Some(prefix) = name.strip_prefix('*') {
            // group prefix: match "PREFIX.SUFFIX"
            let Some(rest) = field.strip_prefix(prefix) else {
                continue;
            };
            let Some(suffix) = rest.strip_prefix('.') else {
                continue;
            };
            if !suffix.chars().next().is_some_and(|c| c.is_ascii_alphanumeric()) {
                continue;
            }

            if obsolete {
                session.obsolete(field)?;
            }
            let FieldKind::Sub(f) = &descriptor.kind else {
                continue;
            };
            return f(session, suffix, contents, target);
        }

        if !names_equal(field, name) {
            continue;
        }

        if obsolete {
            session.obsolete(field)?;
        }
        let FieldKind::Set(f) = &descriptor.kind else {
            continue;
        };
        f(session, contents, target)?;
        return Ok(true);
    }

    Ok(false)
}
