//! Integration tests for the value scanners
//!
//! Exercises the scanner vocabulary through the public API with the value
//! shapes found in real definition files.

use ddfkit::parse::{
    CheckFlag, ParserSession, SpecialFlag, TICRATE, check_special_flag, decode_brackets,
    decode_list, get_bitset, get_float, get_numeric, get_percent_any, get_slope, get_time,
};

fn session() -> ParserSession {
    ParserSession::default()
}

// =============================================================================
// Numbers and Times
// =============================================================================

#[test]
fn numeric_takes_leading_digits_only() {
    let s = session();
    let mut v = 0;
    get_numeric(&s, "20.5", &mut v).unwrap();
    assert_eq!(v, 20);
    get_numeric(&s, "0x7FFF", &mut v).unwrap();
    assert_eq!(v, 0x7FFF);
}

#[test]
fn time_without_suffix_is_seconds() {
    let s = session();
    let mut t = 0;
    get_time(&s, "2", &mut t).unwrap();
    assert_eq!(t, 2 * TICRATE);
    get_time(&s, "150T", &mut t).unwrap();
    assert_eq!(t, 150);
    get_time(&s, "MAXT", &mut t).unwrap();
    assert_eq!(t, i32::MAX);
}

#[test]
fn float_accepts_percent_notation() {
    let s = session();
    let mut f = 0.0;
    get_float(&s, "250%", &mut f).unwrap();
    assert!((f - 2.5).abs() < 1e-6);

    let mut p = 0.0;
    get_percent_any(&s, "250%", &mut p).unwrap();
    assert!((p - 2.5).abs() < 1e-6);
}

#[test]
fn slope_is_stored_as_tangent() {
    let s = session();
    let mut slope = 0.0;
    get_slope(&s, "45", &mut slope).unwrap();
    assert!((slope - 1.0).abs() < 1e-4);

    // clamped well before vertical
    get_slope(&s, "89.9", &mut slope).unwrap();
    assert!(slope < 200.0);
}

// =============================================================================
// Bitsets
// =============================================================================

#[test]
fn bitset_letter_ranges_mix_with_singles() {
    let s = session();
    let mut bits = 0;
    get_bitset(&s, "A-DJK", &mut bits).unwrap();
    assert_eq!(bits, 0b1111 | (1 << 9) | (1 << 10));
}

#[test]
fn bitset_numeric_form() {
    let s = session();
    let mut bits = 0;
    get_bitset(&s, "0x30", &mut bits).unwrap();
    assert_eq!(bits, 0x30);
}

// =============================================================================
// Special Flags
// =============================================================================

const FLAGS: &[SpecialFlag] = &[
    SpecialFlag {
        name: "JUMPING",
        bits: 1,
        negative: false,
    },
    SpecialFlag {
        name: "CROUCHING",
        bits: 2,
        negative: false,
    },
];

#[test]
fn flag_prefixes_toggle_sense() {
    assert_eq!(
        check_special_flag("JUMPING", FLAGS, true, false),
        CheckFlag::Positive(1)
    );
    assert_eq!(
        check_special_flag("NOT_JUMPING", FLAGS, true, false),
        CheckFlag::Negative(1)
    );
    assert_eq!(
        check_special_flag("DISABLE_CROUCHING", FLAGS, true, false),
        CheckFlag::Negative(2)
    );
}

#[test]
fn flag_prefixes_can_be_disallowed() {
    assert_eq!(
        check_special_flag("NO_JUMPING", FLAGS, false, false),
        CheckFlag::Unknown
    );
}

#[test]
fn user_prefix_needs_permission() {
    assert_eq!(
        check_special_flag("USER_JUMPING", FLAGS, true, false),
        CheckFlag::Unknown
    );
    assert_eq!(
        check_special_flag("USER_JUMPING", FLAGS, true, true),
        CheckFlag::User(1)
    );
}

// =============================================================================
// Structured Values
// =============================================================================

#[test]
fn brackets_split_keyword_and_argument() {
    assert_eq!(
        decode_brackets("SPAWN_OBJECT(IMP_FIREBALL)"),
        Some(("SPAWN_OBJECT", "IMP_FIREBALL"))
    );
    assert_eq!(decode_brackets("NOTHING"), None);
}

#[test]
fn quoted_text_hides_the_closing_bracket() {
    assert_eq!(
        decode_brackets("SHOW(\"a ) b\")"),
        Some(("SHOW", "\"a ) b\""))
    );
}

#[test]
fn list_divider_skips_bracketed_groups() {
    let s = session();
    assert_eq!(
        decode_list(&s, "JUMP(SEE,50%):REST", ':', false).unwrap(),
        Some(13)
    );
    // simple mode treats brackets as plain characters
    assert_eq!(
        decode_list(&s, "JUMP(SEE,50%)", ',', true).unwrap(),
        Some(8)
    );
}
