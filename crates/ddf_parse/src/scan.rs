//! Scalar value scanners.
//!
//! The shared vocabulary every field table is built from. Scanners write
//! through a destination reference and leave it untouched when a recoverable
//! problem downgrades to a warning, so the field keeps its default.

use ddf_foundation::{Error, Result, names_equal};

use crate::session::ParserSession;

/// Simulation tics per second.
pub const TICRATE: i32 = 35;

/// Leading-prefix integer parse in the manner of `strtol(_, _, 0)`:
/// optional sign, `0x` hex accepted, trailing junk ignored.
pub(crate) fn int_prefix(info: &str) -> i32 {
    let s = info.trim_start();
    let (neg, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let (radix, s) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        (16, hex)
    } else {
        (10, s)
    };

    let digits: String = s.chars().take_while(|c| c.is_digit(radix)).collect();
    let val = i64::from_str_radix(&digits, radix).unwrap_or(0);
    let val = if neg { -val } else { val };
    val.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Leading-prefix float parse in the manner of `sscanf("%f")`.
fn float_prefix(info: &str) -> Option<f32> {
    let s = info.trim_start();
    let mut end = 0;
    let bytes = s.as_bytes();

    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f32>().ok()
}

/// Reads an integer. A value starting with a letter is a warn-error and
/// leaves the destination unchanged.
pub fn get_numeric(session: &ParserSession, info: &str, dest: &mut i32) -> Result<()> {
    if info.chars().next().is_some_and(|c| c.is_ascii_alphabetic()) {
        session.warn_error(Error::syntax(format!("bad numeric value: {info}")))?;
        return Ok(());
    }
    *dest = int_prefix(info);
    Ok(())
}

/// Reads a boolean: `TRUE`/`1` or `FALSE`/`0`. Anything else is fatal.
pub fn get_boolean(session: &ParserSession, info: &str, dest: &mut bool) -> Result<()> {
    if info.eq_ignore_ascii_case("TRUE") || info == "1" {
        *dest = true;
        Ok(())
    } else if info.eq_ignore_ascii_case("FALSE") || info == "0" {
        *dest = false;
        Ok(())
    } else {
        Err(session.fatal(Error::syntax(format!("bad boolean value: {info}"))))
    }
}

/// Reads a free-form string.
pub fn get_string(_session: &ParserSession, info: &str, dest: &mut String) -> Result<()> {
    *dest = info.to_string();
    Ok(())
}

/// Reads a lump name: at most 8 characters. Nine characters is a
/// warn-error, more is fatal.
pub fn get_lump_name(session: &ParserSession, info: &str, dest: &mut String) -> Result<()> {
    if info.len() == 9 {
        session.warn_error(Error::syntax(format!(
            "name {info} too long (should be 8 characters or less)"
        )))?;
    } else if info.len() > 9 {
        return Err(session.fatal(Error::syntax(format!(
            "name {info} too long (must be 8 characters or less)"
        ))));
    }
    *dest = info.to_string();
    Ok(())
}

/// Reads a float. A value carrying `%` is routed through
/// [`get_percent_any`].
pub fn get_float(session: &ParserSession, info: &str, dest: &mut f32) -> Result<()> {
    if info.contains('%') {
        return get_percent_any(session, info, dest);
    }
    match float_prefix(info) {
        Some(v) => {
            *dest = v;
            Ok(())
        }
        None => Err(session.fatal(Error::syntax(format!(
            "bad floating point value: {info}"
        )))),
    }
}

/// Reads a percentage in `0%..100%`, stored as `0.0..1.0`. A missing `%`
/// is a warn-error falling back to a clamped plain float.
pub fn get_percent(session: &ParserSession, info: &str, dest: &mut f32) -> Result<()> {
    let number_len = info
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();

    if info[number_len..].chars().next() != Some('%') {
        session.warn_error(Error::syntax(format!(
            "bad percent value '{info}': should be a number followed by %"
        )))?;
        let mut f = 0.0;
        get_float(session, info, &mut f)?;
        *dest = f.clamp(0.0, 1.0);
        return Ok(());
    }

    let mut f = 0.0;
    get_float(session, &info[..number_len], &mut f)?;
    if !(0.0..=100.0).contains(&f) {
        return Err(session.fatal(Error::syntax(format!(
            "bad percent value '{info}': must be between 0% and 100%"
        ))));
    }
    *dest = f / 100.0;
    Ok(())
}

/// Like [`get_percent`] but without the range restriction.
pub fn get_percent_any(session: &ParserSession, info: &str, dest: &mut f32) -> Result<()> {
    let number_len = info
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .count();

    if info[number_len..].chars().next() != Some('%') {
        session.warn_error(Error::syntax(format!(
            "bad percent value '{info}': should be a number followed by %"
        )))?;
        return get_float(session, info, dest);
    }

    let mut f = 0.0;
    get_float(session, &info[..number_len], &mut f)?;
    *dest = f / 100.0;
    Ok(())
}

/// Reads a duration in tics. A `T` suffix means tics directly, otherwise
/// the value is seconds. `MAXT` is the maximal duration.
pub fn get_time(session: &ParserSession, info: &str, dest: &mut i32) -> Result<()> {
    if info.eq_ignore_ascii_case("maxt") {
        *dest = i32::MAX;
        return Ok(());
    }
    if info.contains('T') || info.contains('t') {
        return get_numeric(session, info, dest);
    }
    match float_prefix(info) {
        Some(v) => {
            *dest = (v * TICRATE as f32) as i32;
            Ok(())
        }
        None => Err(session.fatal(Error::syntax(format!("bad time value: {info}")))),
    }
}

/// Reads an angle in degrees. Exactly 360 becomes 359.5; larger values are
/// a warn-error.
pub fn get_angle(session: &ParserSession, info: &str, dest: &mut f32) -> Result<()> {
    let mut val = 0.0;
    get_float(session, info, &mut val)?;

    if val as i32 == 360 {
        val = 359.5;
    } else if val > 360.0 {
        session.warn_error(Error::syntax(format!(
            "angle '{info}' too large (must be less than 360)"
        )))?;
    }

    *dest = val;
    Ok(())
}

/// Reads a slope as an angle in degrees, clamped to ±89.5 and stored as a
/// tangent.
pub fn get_slope(session: &ParserSession, info: &str, dest: &mut f32) -> Result<()> {
    let mut val = 0.0;
    get_float(session, info, &mut val)?;
    *dest = val.clamp(-89.5, 89.5).to_radians().tan();
    Ok(())
}

/// Reads an RGB colour: `#RRGGBB` or the `NONE` sentinel.
pub fn get_rgb(session: &ParserSession, info: &str, dest: &mut Option<u32>) -> Result<()> {
    if names_equal(info, "NONE") {
        *dest = None;
        return Ok(());
    }

    let hex = info.trim().strip_prefix('#');
    let parsed = hex.and_then(|h| {
        if h.len() >= 6 {
            u32::from_str_radix(&h[..6], 16).ok()
        } else {
            None
        }
    });

    match parsed {
        Some(rgb) => {
            *dest = Some(rgb);
            Ok(())
        }
        None => Err(session.fatal(Error::syntax(format!("bad RGB colour value: {info}")))),
    }
}

/// Reads a bitset: either a plain numeric value, or letters `A`-`Z`
/// (ranges like `A-D` allowed), each letter setting one bit.
pub fn get_bitset(_session: &ParserSession, info: &str, dest: &mut u32) -> Result<()> {
    let first = info.trim_start().chars().next();
    if first.is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '+') {
        *dest = int_prefix(info) as u32;
        return Ok(());
    }

    *dest = 0;
    let bytes = info.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if !c.is_ascii_uppercase() {
            i += 1;
            continue;
        }
        let start = c - b'A';
        let mut end = start;

        if i + 2 < bytes.len()
            && bytes[i + 1] == b'-'
            && bytes[i + 2].is_ascii_uppercase()
            && bytes[i + 2] >= c
        {
            end = bytes[i + 2] - b'A';
        }

        for bit in start..=end {
            *dest |= 1 << bit;
        }
        i += 1;
    }
    Ok(())
}

/// One entry in a special-flag table.
#[derive(Debug, Clone, Copy)]
pub struct SpecialFlag {
    /// Flag name as it appears in source text.
    pub name: &'static str,
    /// Bits set (or cleared) by the flag.
    pub bits: u32,
    /// The flag's sense is inverted (naming it clears the bits).
    pub negative: bool,
}

/// Outcome of a special-flag lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckFlag {
    /// Set these bits.
    Positive(u32),
    /// Clear these bits.
    Negative(u32),
    /// A `USER_`-prefixed flag.
    User(u32),
    /// Not in the table.
    Unknown,
}

fn find_special_flag(prefix: &str, name: &str, flag_set: &[SpecialFlag]) -> Option<usize> {
    flag_set.iter().position(|flag| {
        let bare = flag.name.strip_prefix('!').unwrap_or(flag.name);
        let full = format!("{prefix}{bare}");
        names_equal(name, &full)
    })
}

/// Looks up a flag name in a table, trying the negating prefixes
/// (`NO_`, `NOT_`, `DISABLE_`) and the enabling ones (`ENABLE_`, `USER_`)
/// when allowed.
#[must_use]
pub fn check_special_flag(
    name: &str,
    flag_set: &[SpecialFlag],
    allow_prefixes: bool,
    allow_user: bool,
) -> CheckFlag {
    let mut negate = false;
    let mut user = false;

    let mut index = find_special_flag("", name, flag_set);

    if allow_prefixes {
        if index.is_none() {
            index = find_special_flag("ENABLE_", name, flag_set);
        }
        if index.is_none() {
            negate = true;
            index = find_special_flag("NO_", name, flag_set);
        }
        if index.is_none() {
            index = find_special_flag("NOT_", name, flag_set);
        }
        if index.is_none() {
            index = find_special_flag("DISABLE_", name, flag_set);
        }
        if index.is_none() && allow_user {
            user = true;
            negate = false;
            index = find_special_flag("USER_", name, flag_set);
        }
    }

    let Some(index) = index else {
        return CheckFlag::Unknown;
    };

    let flag = &flag_set[index];
    if flag.negative {
        negate = !negate;
    }

    if user {
        CheckFlag::User(flag.bits)
    } else if negate {
        CheckFlag::Negative(flag.bits)
    } else {
        CheckFlag::Positive(flag.bits)
    }
}

/// Splits `KEYWORD(inner)` into its two parts. The keyword must be
/// non-empty; the inner part may be empty. Quoted strings inside the
/// brackets are handled. Returns `None` when the shape does not match.
#[must_use]
pub fn decode_brackets(info: &str) -> Option<(&str, &str)> {
    let open = info.find('(')?;
    if open == 0 {
        return None;
    }

    let inner_start = open + 1;
    let bytes = info.as_bytes();
    let mut pos = inner_start;
    let mut in_string = false;

    while pos < bytes.len() && (in_string || bytes[pos] != b')') {
        if bytes[pos] == b'\\' && pos + 1 < bytes.len() && bytes[pos + 1] == b'"' {
            pos += 2;
            continue;
        }
        if bytes[pos] == b'"' {
            in_string = !in_string;
        }
        pos += 1;
    }

    if pos >= bytes.len() {
        return None;
    }

    Some((&info[..open], &info[inner_start..pos]))
}

/// Finds the first occurrence of `divider` outside brackets and strings.
/// With `simple`, brackets and strings are not tracked. Unterminated
/// strings and unbalanced brackets are fatal.
pub fn decode_list(
    session: &ParserSession,
    info: &str,
    divider: char,
    simple: bool,
) -> Result<Option<usize>> {
    let mut brackets = 0i32;
    let mut in_string = false;
    let bytes = info.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos] as char;

        if brackets == 0 && !in_string && c == divider {
            return Ok(Some(pos));
        }

        if !simple {
            if c == '\\' && pos + 1 < bytes.len() && bytes[pos + 1] == b'"' {
                pos += 2;
                continue;
            }
            if c == '"' {
                in_string = !in_string;
            }
            if !in_string && c == '(' {
                brackets += 1;
            }
            if !in_string && c == ')' {
                brackets -= 1;
                if brackets < 0 {
                    return Err(session.fatal(Error::syntax(format!(
                        "too many ')' found: {info}"
                    ))));
                }
            }
        }

        pos += 1;
    }

    if in_string {
        return Err(session.fatal(Error::syntax(format!("unterminated string found: {info}"))));
    }
    if brackets != 0 {
        return Err(session.fatal(Error::syntax(format!("unclosed brackets found: {info}"))));
    }

    Ok(None)
}
