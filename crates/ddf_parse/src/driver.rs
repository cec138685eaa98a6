//! The outer reading loop.
//!
//! Feeds a source buffer through the tokenizer and turns the event stream
//! into entry-lifecycle callbacks on an [`EntryReader`]: one `start_entry`
//! per `[NAME]` header, one `parse_field` per comma- or
//! semicolon-terminated value, one `finish_entry` when the next header (or
//! the end of the buffer) closes the entry. Line-start `#`-directives and
//! `//` comments are handled here, before the tokenizer sees them.

use ddf_foundation::{Error, MAX_VERSION, MIN_VERSION, Result};

use crate::session::ParserSession;
use crate::tokenizer::{CharEvent, Status, Tokenizer};

/// Entry-lifecycle callbacks for one definition kind.
pub trait EntryReader {
    /// The `<TAG>` this kind's sources must start with.
    fn tag(&self) -> &str;

    /// Opens the entry named by a `[NAME]` header. `extend` is set for the
    /// `[++NAME]` form, which reopens an existing entry without resetting
    /// it.
    fn start_entry(&mut self, name: &str, extend: bool, session: &mut ParserSession)
    -> Result<()>;

    /// Applies one field value at the given positional index. `is_last` is
    /// set for the `;`-terminated value of a command.
    fn parse_field(
        &mut self,
        field: &str,
        contents: &str,
        index: usize,
        is_last: bool,
        session: &mut ParserSession,
    ) -> Result<()>;

    /// Closes the current entry: post-checks, state linking, commit.
    fn finish_entry(&mut self, session: &mut ParserSession) -> Result<()>;

    /// `#CLEARALL`: soft-disable every entry loaded so far.
    fn clear_all(&mut self) -> Result<()>;
}

fn ascii_prefix_ci(bytes: &[u8], prefix: &[u8]) -> bool {
    bytes.len() >= prefix.len()
        && bytes[..prefix.len()].eq_ignore_ascii_case(prefix)
}

fn line_len(bytes: &[u8], pos: usize) -> usize {
    let mut len = 0;
    while pos + len < bytes.len() && bytes[pos + len] != b'\n' && bytes[pos + len] != b'\r' {
        len += 1;
    }
    len
}

/// Consumes a `#DEFINE name value` directive, returning the position just
/// past it. A `\` at the end of a line continues the value onto the next.
fn handle_define(session: &mut ParserSession, bytes: &[u8], start: usize) -> Result<usize> {
    let mut pos = start + "#DEFINE".len();

    while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
        pos += 1;
    }

    let name_start = pos;
    while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let name = String::from_utf8_lossy(&bytes[name_start..pos]).into_owned();

    if pos >= bytes.len() || bytes[pos] == b'\n' {
        return Err(session.fatal(Error::directive(format!("#DEFINE '{name}' as what?!"))));
    }
    pos += 1;

    let mut value = String::new();
    while pos < bytes.len() {
        match bytes[pos] {
            b'\r' => value.push(' '),
            b'\\' if pos + 1 < bytes.len() && bytes[pos + 1] == b'\n' => {
                // continuation: swallow the backslash and the newline
                session.line += 1;
                pos += 1;
            }
            b'\n' => {
                session.line += 1;
                pos += 1;
                break;
            }
            b => value.push(b as char),
        }
        pos += 1;
    }

    session
        .macros
        .add(name.trim(), value.trim())
        .map_err(|e| session.fatal(e))?;
    Ok(pos)
}

/// Parses the text after `#VERSION` as `d.dd` into a whole-number version.
fn parse_version(session: &mut ParserSession, rest: &[u8]) -> Result<()> {
    let text = String::from_utf8_lossy(rest);

    if !text.starts_with(|c: char| c.is_whitespace()) {
        return Err(session.fatal(Error::directive("badly formed #VERSION directive")));
    }

    let text = text.trim();
    let b = text.as_bytes();
    if b.len() < 4 || !b[0].is_ascii_digit() || b[1] != b'.' || !b[2].is_ascii_digit()
        || !b[3].is_ascii_digit()
    {
        return Err(session.fatal(Error::directive("badly formed #VERSION directive")));
    }

    let version = i32::from(b[0] - b'0') * 100 + i32::from(b[2] - b'0') * 10 + i32::from(b[3] - b'0');

    if version < MIN_VERSION {
        session.warn_error(Error::directive(format!(
            "illegal #VERSION number: {version}"
        )))?;
    }
    if version > MAX_VERSION {
        return Err(session.fatal(Error::bad_version(version, MAX_VERSION)));
    }

    session.policy.version = version;
    Ok(())
}

/// Reads one source buffer to completion, driving the reader's callbacks.
///
/// The session must be fresh for this source
/// ([`begin_source`](ParserSession::begin_source)).
pub fn read_source(
    reader: &mut dyn EntryReader,
    session: &mut ParserSession,
    text: &str,
) -> Result<()> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let mut tokenizer = Tokenizer::new();
    let mut status = Status::WaitingTag;
    let mut former_status = status;

    let mut token = String::new();
    let mut current_cmd = String::new();
    let mut current_index = 0;

    let mut comment_level = 0u32;
    let mut bracket_level = 0i32;
    let mut firstgo = true;

    while pos < bytes.len() {
        if comment_level == 0
            && status != Status::ReadingString
            && ascii_prefix_ci(&bytes[pos..], b"#DEFINE")
        {
            pos = handle_define(session, bytes, pos)?;
            token.clear();
            continue;
        }

        // line comments
        if comment_level == 0
            && status != Status::ReadingString
            && pos + 1 < bytes.len()
            && bytes[pos] == b'/'
            && bytes[pos + 1] == b'/'
        {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            if pos >= bytes.len() {
                break;
            }
        }

        let c = bytes[pos] as char;
        pos += 1;

        if c == '\n' {
            session.line += 1;

            let len = line_len(bytes, pos);
            session.line_data = String::from_utf8_lossy(&bytes[pos..pos + len]).into_owned();

            // directives live at line starts, between entries only
            if ascii_prefix_ci(&bytes[pos..], b"#CLEARALL") {
                if !firstgo {
                    return Err(
                        session.fatal(Error::directive("#CLEARALL cannot be used inside an entry"))
                    );
                }
                reader.clear_all()?;
                pos += len;
                continue;
            }

            if ascii_prefix_ci(&bytes[pos..], b"#VERSION") {
                if !firstgo {
                    return Err(
                        session.fatal(Error::directive("#VERSION cannot be used inside an entry"))
                    );
                }
                parse_version(session, &bytes[pos + "#VERSION".len()..pos + len])?;
                pos += len;
                continue;
            }
        }

        match tokenizer.process_char(c, status, &mut token, session)? {
            CharEvent::RemarkStart => {
                if comment_level == 0 {
                    former_status = status;
                    status = Status::ReadingRemark;
                }
                comment_level += 1;
            }

            CharEvent::RemarkStop => {
                comment_level -= 1;
                if comment_level == 0 {
                    status = former_status;
                }
            }

            CharEvent::TagStart => status = Status::ReadingTag,

            CharEvent::TagStop => {
                if !token.eq_ignore_ascii_case(reader.tag()) {
                    return Err(session.fatal(Error::syntax(format!(
                        "start tag <{}> expected, found <{token}>",
                        reader.tag()
                    ))));
                }
                status = Status::WaitingEntry;
                token.clear();
            }

            CharEvent::EntryStart => {
                if bracket_level > 0 {
                    return Err(session.fatal(Error::syntax("unclosed () brackets detected")));
                }

                if firstgo {
                    firstgo = false;
                } else {
                    // finish off the previous entry
                    session.line_data.clear();
                    reader.finish_entry(session)?;
                    token.clear();
                    session.entry.clear();
                }
                status = Status::ReadingEntryName;
            }

            CharEvent::EntryStop => {
                session.entry = format!("[{token}]");

                if let Some(name) = token.strip_prefix("++") {
                    let name = name.to_string();
                    reader.start_entry(&name, true, session)?;
                } else {
                    let name = token.clone();
                    reader.start_entry(&name, false, session)?;
                }

                token.clear();
                status = Status::ReadingCommand;
            }

            CharEvent::CommandRead => {
                current_cmd = std::mem::take(&mut token);
                current_index = 0;
                status = Status::ReadingData;
            }

            CharEvent::GroupStart => bracket_level += 1,

            CharEvent::GroupStop => {
                bracket_level -= 1;
                if bracket_level < 0 {
                    return Err(session.fatal(Error::syntax("unexpected ')' bracket")));
                }
            }

            CharEvent::Separator => {
                if bracket_level > 0 {
                    token.push(',');
                } else {
                    if current_cmd.is_empty() {
                        return Err(session.fatal(Error::syntax("unexpected comma ','")));
                    }
                    if firstgo {
                        session.warn_error(Error::syntax(format!(
                            "command {current_cmd} used outside of any entry"
                        )))?;
                    } else {
                        let contents = session.macros.expand(&token).to_string();
                        let cmd = current_cmd.clone();
                        reader.parse_field(&cmd, &contents, current_index, false, session)?;
                        current_index += 1;
                    }
                    token.clear();
                }
            }

            CharEvent::Terminator => {
                if current_cmd.is_empty() {
                    return Err(session.fatal(Error::syntax("unexpected semicolon ';'")));
                }
                if bracket_level > 0 {
                    return Err(session.fatal(Error::syntax("missing ')' bracket in command")));
                }

                if firstgo {
                    session.warn_error(Error::syntax(format!(
                        "command {current_cmd} used outside of any entry"
                    )))?;
                } else {
                    let contents = session.macros.expand(&token).to_string();
                    let cmd = current_cmd.clone();
                    reader.parse_field(&cmd, &contents, current_index, true, session)?;
                }
                current_index = 0;
                token.clear();
                status = Status::ReadingCommand;
            }

            CharEvent::PropertyRead => {
                session.warn_error(Error::syntax("badly formed command: unexpected semicolon"))?;
            }

            CharEvent::StringStart => status = Status::ReadingString,
            CharEvent::StringStop => status = Status::ReadingData,

            CharEvent::Nothing | CharEvent::OkChar => {}
        }
    }

    session.line_data.clear();

    if comment_level > 0 {
        return Err(session.fatal(Error::syntax("unclosed comments detected")));
    }
    if bracket_level > 0 {
        return Err(session.fatal(Error::syntax("unclosed () brackets detected")));
    }
    if status == Status::ReadingTag {
        return Err(session.fatal(Error::syntax("unclosed <> brackets detected")));
    }
    if status == Status::ReadingEntryName {
        return Err(session.fatal(Error::syntax("unclosed [] brackets detected")));
    }
    if status == Status::ReadingData || status == Status::ReadingString {
        session.warn_error(Error::syntax("unfinished command on last line"))?;
    }

    if !firstgo {
        reader.finish_entry(session)?;
    }
    session.entry.clear();

    Ok(())
}
