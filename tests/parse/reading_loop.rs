//! Integration tests for the reading loop
//!
//! Drives `read_source` with a recording reader and checks the callback
//! sequence for realistic source shapes.

use ddfkit::foundation::Result;
use ddfkit::parse::{EntryReader, ParserSession, read_source};

#[derive(Debug, PartialEq)]
enum Call {
    Start(String, bool),
    Field(String, String, usize, bool),
    Finish,
}

#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl EntryReader for Recorder {
    fn tag(&self) -> &str {
        "THINGS"
    }

    fn start_entry(&mut self, name: &str, extend: bool, _: &mut ParserSession) -> Result<()> {
        self.calls.push(Call::Start(name.to_string(), extend));
        Ok(())
    }

    fn parse_field(
        &mut self,
        field: &str,
        contents: &str,
        index: usize,
        is_last: bool,
        _: &mut ParserSession,
    ) -> Result<()> {
        self.calls.push(Call::Field(
            field.to_string(),
            contents.to_string(),
            index,
            is_last,
        ));
        Ok(())
    }

    fn finish_entry(&mut self, _: &mut ParserSession) -> Result<()> {
        self.calls.push(Call::Finish);
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        self.calls.clear();
        Ok(())
    }
}

fn record(text: &str) -> Vec<Call> {
    let mut session = ParserSession::default();
    session.begin_source("test.ddf");
    let mut reader = Recorder::default();
    read_source(&mut reader, &mut session, text).unwrap();
    reader.calls
}

// =============================================================================
// Entry and Field Shapes
// =============================================================================

#[test]
fn whitespace_and_case_are_normalized() {
    let calls = record("<THINGS>\n\n[Imp]\n  Spawn Health = 60 ;\n");
    assert_eq!(
        calls,
        vec![
            Call::Start("IMP".to_string(), false),
            Call::Field("SPAWNHEALTH".to_string(), "60".to_string(), 0, true),
            Call::Finish,
        ]
    );
}

#[test]
fn multi_value_commands_count_up() {
    let calls = record("<THINGS>\n[X]\nSPECIAL=SOLID,SHOOTABLE,CORPSE;\n");
    assert_eq!(
        calls[1],
        Call::Field("SPECIAL".to_string(), "SOLID".to_string(), 0, false)
    );
    assert_eq!(
        calls[2],
        Call::Field("SPECIAL".to_string(), "SHOOTABLE".to_string(), 1, false)
    );
    assert_eq!(
        calls[3],
        Call::Field("SPECIAL".to_string(), "CORPSE".to_string(), 2, true)
    );
}

#[test]
fn quoted_text_keeps_its_spelling() {
    let calls = record("<THINGS>\n[X]\nCAST_TITLE=\"The Imp, again\";\n");
    assert_eq!(
        calls[1],
        Call::Field(
            "CAST_TITLE".to_string(),
            "The Imp, again".to_string(),
            0,
            true
        )
    );
}

#[test]
fn extension_header_flags_extend() {
    let calls = record("<THINGS>\n[IMP]\nRADIUS=20;\n[++IMP]\nHEIGHT=56;\n");
    assert_eq!(calls[0], Call::Start("IMP".to_string(), false));
    assert_eq!(calls[3], Call::Start("IMP".to_string(), true));
}

// =============================================================================
// Directives
// =============================================================================

#[test]
fn defines_substitute_values() {
    let calls = record(
        "<THINGS>\n#DEFINE IMP_HEALTH 60\n[IMP]\nSPAWNHEALTH=IMP_HEALTH;\n",
    );
    assert_eq!(
        calls[1],
        Call::Field("SPAWNHEALTH".to_string(), "60".to_string(), 0, true)
    );
}

#[test]
fn version_directive_inside_entry_is_fatal() {
    let mut session = ParserSession::default();
    session.begin_source("test.ddf");
    let mut reader = Recorder::default();
    let result = read_source(
        &mut reader,
        &mut session,
        "<THINGS>\n[IMP]\nRADIUS=20;\n#VERSION 1.29\n",
    );
    assert!(result.is_err());
}

// =============================================================================
// Malformed Sources
// =============================================================================

#[test]
fn mismatched_tag_is_fatal() {
    let mut session = ParserSession::default();
    session.begin_source("test.ddf");
    let mut reader = Recorder::default();
    assert!(read_source(&mut reader, &mut session, "<SOUNDS>\n[X]\n").is_err());
}

#[test]
fn command_without_value_escalates_under_strict() {
    let mut session = ParserSession::default();
    session.policy.strict = true;
    session.begin_source("test.ddf");
    let mut reader = Recorder::default();
    assert!(read_source(&mut reader, &mut session, "<THINGS>\n[X]\nRADIUS;\n").is_err());
}

#[test]
fn unterminated_comment_is_fatal() {
    let mut session = ParserSession::default();
    session.begin_source("test.ddf");
    let mut reader = Recorder::default();
    assert!(read_source(&mut reader, &mut session, "<THINGS>\n[X]\n{never closed\n").is_err());
}
