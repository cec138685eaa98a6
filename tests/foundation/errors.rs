//! Integration tests for error types
//!
//! Tests error construction, display, and source context.

use ddfkit::foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_syntax() {
    let err = Error::syntax("stray bracket");
    assert!(matches!(err.kind, ErrorKind::Syntax(_)));
    assert!(format!("{err}").contains("stray bracket"));
}

#[test]
fn error_bad_value_names_field_and_value() {
    let err = Error::bad_value("RADIUS", "fish");
    assert!(matches!(err.kind, ErrorKind::BadValue { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("RADIUS"));
    assert!(msg.contains("fish"));
}

#[test]
fn error_unknown_reference() {
    let err = Error::unknown_reference("attack", "MISSING");
    let msg = format!("{err}");
    assert!(msg.contains("attack"));
    assert!(msg.contains("MISSING"));
}

#[test]
fn error_bad_version_reports_limit() {
    let err = Error::bad_version(999, 131);
    assert!(matches!(err.kind, ErrorKind::BadVersion { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("999"));
    assert!(msg.contains("131"));
}

// =============================================================================
// Context
// =============================================================================

#[test]
fn context_attaches_and_displays() {
    let err = Error::unknown_command("WIBBLE").with_context(
        ErrorContext::new()
            .with_source("things.ddf")
            .with_line(42)
            .with_entry("[IMP]")
            .with_line_data("WIBBLE=7;"),
    );

    let ctx = err.context.as_ref().unwrap();
    assert_eq!(ctx.line, Some(42));

    let msg = format!("{ctx}");
    assert!(msg.contains("things.ddf:42"));
    assert!(msg.contains("[IMP]"));
    assert!(msg.contains("WIBBLE=7;"));
}

#[test]
fn io_errors_convert() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such lump");
    let err: Error = io.into();
    assert!(matches!(err.kind, ErrorKind::Io(_)));
}
