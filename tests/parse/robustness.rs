//! Robustness tests for the reading loop
//!
//! Feeds generated source text through `read_source` and asserts that the
//! loop returns (with an error or not) instead of panicking.

use ddfkit::foundation::Result;
use ddfkit::parse::{EntryReader, ParserSession, read_source};
use proptest::prelude::*;

struct Sink;

impl EntryReader for Sink {
    fn tag(&self) -> &str {
        "THINGS"
    }

    fn start_entry(&mut self, _: &str, _: bool, _: &mut ParserSession) -> Result<()> {
        Ok(())
    }

    fn parse_field(&mut self, _: &str, _: &str, _: usize, _: bool, _: &mut ParserSession) -> Result<()> {
        Ok(())
    }

    fn finish_entry(&mut self, _: &mut ParserSession) -> Result<()> {
        Ok(())
    }

    fn clear_all(&mut self) -> Result<()> {
        Ok(())
    }
}

fn read_all(input: &str) {
    let mut session = ParserSession::default();
    session.begin_source("generated.ddf");
    let mut reader = Sink;
    let _ = read_source(&mut reader, &mut session, input);
}

fn entry_soup() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "\\[\\+?\\+?[A-Z_:]{0,10}\\]?".prop_map(String::from),
        "[A-Z_.]{1,12}(\\([A-Z,]{0,6}\\))?=".prop_map(String::from),
        "[0-9]{1,5}[T%]?".prop_map(String::from),
        r#""[ -~]{0,16}"#.prop_map(String::from),
        Just("#DEFINE D \\\n 2".to_string()),
        Just("#VERSION 1.28".to_string()),
        Just("{ {nested} remark".to_string()),
    ];
    let glue = prop_oneof![
        Just(";".to_string()),
        Just(",".to_string()),
        Just("\n".to_string()),
    ];
    prop::collection::vec(prop_oneof![piece, glue], 0..60).prop_map(|v| v.join(""))
}

proptest! {
    #[test]
    fn arbitrary_text_never_panics(input in prop::collection::vec(any::<char>(), 0..800)) {
        let text: String = input.into_iter().collect();
        read_all(&text);
    }

    #[test]
    fn tagged_entry_soup_never_panics(body in entry_soup()) {
        read_all(&format!("<THINGS>\n{body}"));
    }

    #[test]
    fn truncation_never_panics(cut in 0usize..64) {
        let source = "<THINGS>\n[IMP]\nSTATES(SPAWN)=TROO:A:10:NORMAL:JUMP(SEE,50%);\n";
        let end = source
            .char_indices()
            .map(|(i, _)| i)
            .chain([source.len()])
            .nth(cut.min(source.chars().count()))
            .unwrap_or(source.len());
        read_all(&source[..end]);
    }
}
