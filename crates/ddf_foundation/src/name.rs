//! Definition-name comparison.
//!
//! Entry names, command names and cross-references are matched
//! case-insensitively, with spaces and underscores ignored on both sides.
//! `LOST_SOUL`, `LOSTSOUL` and `Lost Soul` all name the same definition.

use std::cmp::Ordering;

const fn skippable(c: u8) -> bool {
    c == b' ' || c == b'_'
}

/// Compares two definition names, ignoring case, spaces and underscores.
#[must_use]
pub fn cmp_names(a: &str, b: &str) -> Ordering {
    let mut a = a.bytes().filter(|&c| !skippable(c));
    let mut b = b.bytes().filter(|&c| !skippable(c));
    loop {
        match (a.next(), b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let (x, y) = (x.to_ascii_uppercase(), y.to_ascii_uppercase());
                if x != y {
                    return x.cmp(&y);
                }
            }
        }
    }
}

/// Tests two definition names for equality under [`cmp_names`].
#[must_use]
pub fn names_equal(a: &str, b: &str) -> bool {
    cmp_names(a, b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive() {
        assert!(names_equal("IMP", "imp"));
        assert!(names_equal("Imp", "iMp"));
    }

    #[test]
    fn spaces_and_underscores_skipped() {
        assert!(names_equal("LOST_SOUL", "LOSTSOUL"));
        assert!(names_equal("LOST SOUL", "lost_soul"));
        assert!(names_equal("__X", "x"));
        assert!(names_equal("A_ _B", "ab"));
    }

    #[test]
    fn unequal_names() {
        assert!(!names_equal("IMP", "IMPS"));
        assert!(!names_equal("IMP", "DEMON"));
        assert_eq!(cmp_names("ABC", "ABD"), Ordering::Less);
        assert_eq!(cmp_names("ABD", "ABC"), Ordering::Greater);
    }

    #[test]
    fn skippable_only_names() {
        assert!(names_equal("", "___"));
        assert!(names_equal("  ", ""));
        assert!(!names_equal("_", "A"));
    }
}
