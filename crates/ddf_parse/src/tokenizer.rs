//! Character-level tokenizer.
//!
//! The source is consumed one character at a time; each character, combined
//! with the current reading status, classifies into a [`CharEvent`] that
//! drives the outer driver loop. Whitespace is insignificant everywhere but
//! inside quoted strings. `{ }` remarks nest and are legal anywhere outside
//! strings. Accumulated name and value text is upper-cased as it is read,
//! except inside strings where the text is kept verbatim.

use ddf_foundation::{Error, Result};

use crate::session::ParserSession;

/// What the tokenizer is in the middle of reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Before the mandatory `<TAG>`.
    WaitingTag,
    /// Inside `<...>`.
    ReadingTag,
    /// Between the tag and the first `[`.
    WaitingEntry,
    /// Inside `[...]`.
    ReadingEntryName,
    /// Reading a command name, up to `=`.
    ReadingCommand,
    /// Reading field data, up to `,` or `;`.
    ReadingData,
    /// Inside a quoted string.
    ReadingString,
    /// Inside a `{ }` remark.
    ReadingRemark,
}

/// Classified outcome of processing one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharEvent {
    /// Character consumed with no structural meaning.
    Nothing,
    /// Character appended to the accumulation buffer.
    OkChar,
    /// `{` outside a string.
    RemarkStart,
    /// `}` closing a remark level.
    RemarkStop,
    /// `<` while waiting for the tag.
    TagStart,
    /// `>` ending the tag.
    TagStop,
    /// `[` starting an entry header.
    EntryStart,
    /// `]` ending an entry header.
    EntryStop,
    /// `=` ending a command name.
    CommandRead,
    /// `;` directly after a command name (malformed).
    PropertyRead,
    /// `(` inside data or a command name.
    GroupStart,
    /// `)` inside data or a command name.
    GroupStop,
    /// `,` inside data.
    Separator,
    /// `;` inside data.
    Terminator,
    /// `"` opening a string.
    StringStart,
    /// `"` closing a string.
    StringStop,
}

/// The character classifier. Holds only the in-string escape flag; the
/// reading status itself is owned by the driver, which also performs the
/// status transitions.
#[derive(Debug, Default)]
pub struct Tokenizer {
    format_char: bool,
}

impl Tokenizer {
    /// Creates a tokenizer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies one character under the given status, appending
    /// accumulated text to `token`.
    pub fn process_char(
        &mut self,
        c: char,
        status: Status,
        token: &mut String,
        session: &ParserSession,
    ) -> Result<CharEvent> {
        if status == Status::ReadingString {
            if !self.format_char && c == '\\' {
                self.format_char = true;
                return Ok(CharEvent::Nothing);
            }
        } else if c.is_whitespace() {
            return Ok(CharEvent::Nothing);
        }

        if status != Status::ReadingString && c == '{' {
            return Ok(CharEvent::RemarkStart);
        }

        if status == Status::ReadingRemark && c == '}' {
            return Ok(CharEvent::RemarkStop);
        }

        if status != Status::ReadingString && c == '}' {
            return Err(session.fatal(Error::syntax("encountered '}' without previous '{'")));
        }

        match status {
            Status::ReadingRemark => Ok(CharEvent::Nothing),

            Status::WaitingTag => {
                if c == '<' {
                    Ok(CharEvent::TagStart)
                } else {
                    Err(session.fatal(Error::syntax("file must start with a tag")))
                }
            }

            Status::ReadingTag => {
                if c == '>' {
                    Ok(CharEvent::TagStop)
                } else {
                    token.push(c);
                    Ok(CharEvent::OkChar)
                }
            }

            Status::WaitingEntry => {
                if c == '[' {
                    Ok(CharEvent::EntryStart)
                } else {
                    Ok(CharEvent::Nothing)
                }
            }

            Status::ReadingEntryName => {
                if c == ']' {
                    Ok(CharEvent::EntryStop)
                } else if c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '+' {
                    token.push(c.to_ascii_uppercase());
                    Ok(CharEvent::OkChar)
                } else {
                    Ok(CharEvent::Nothing)
                }
            }

            Status::ReadingCommand => match c {
                '=' => Ok(CharEvent::CommandRead),
                ';' => Ok(CharEvent::PropertyRead),
                '[' => Ok(CharEvent::EntryStart),
                _ if c.is_ascii_alphanumeric()
                    || c == '_'
                    || c == '('
                    || c == ')'
                    || c == '.' =>
                {
                    token.push(c.to_ascii_uppercase());
                    Ok(CharEvent::OkChar)
                }
                _ => Ok(CharEvent::Nothing),
            },

            Status::ReadingData => match c {
                '"' => Ok(CharEvent::StringStart),
                ';' => Ok(CharEvent::Terminator),
                ',' => Ok(CharEvent::Separator),
                '(' => {
                    token.push(c);
                    Ok(CharEvent::GroupStart)
                }
                ')' => {
                    token.push(c);
                    Ok(CharEvent::GroupStop)
                }
                // sprite data needs more than a few exceptions
                _ if c.is_ascii_alphanumeric()
                    || matches!(
                        c,
                        '_' | '-' | ':' | '.' | '[' | ']' | '\\' | '!' | '#' | '%' | '+' | '@'
                            | '?'
                    ) =>
                {
                    token.push(c.to_ascii_uppercase());
                    Ok(CharEvent::OkChar)
                }
                _ => {
                    if !c.is_control() {
                        session.warn_error(Error::syntax(format!(
                            "illegal character '{c}' found"
                        )))?;
                    }
                    Ok(CharEvent::Nothing)
                }
            },

            Status::ReadingString => {
                if self.format_char {
                    self.format_char = false;
                    // recognised escapes; anything else passes through
                    match c {
                        'n' => token.push('\n'),
                        other => token.push(other),
                    }
                    Ok(CharEvent::OkChar)
                } else if c == '"' {
                    Ok(CharEvent::StringStop)
                } else if c == '\n' {
                    session.warn_error(Error::syntax("unclosed string detected"))?;
                    Ok(CharEvent::Nothing)
                } else {
                    token.push(c);
                    Ok(CharEvent::OkChar)
                }
            }
        }
    }
}
