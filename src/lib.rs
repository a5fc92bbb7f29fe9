//! Unicode character sets.
//!
//! A [`UnicodeSet`] is a set of Unicode code points together with a set of
//! multi-character strings that are treated as atomic members. Sets are built
//! from a pattern language resembling regular expression character classes
//! (`[a-z]`, `[[:L:]-[a-z]]`, `[abc{ch}]`, `\p{Greek}`), combined with the
//! usual boolean operations, queried for containment and spanned against
//! text.
//!
//! ```
//! use uniset::{SpanCondition, UnicodeSet};
//!
//! let set = UnicodeSet::parse("[a{bc}{cd}]").unwrap();
//! assert!(set.contains('a'));
//! assert!(set.contains_all_str("cdbca"));
//! assert!(!set.contains_all_str("acb"));
//! assert_eq!(set.span("abcx", 0, SpanCondition::Contained), 3);
//! ```
//!
//! Code points are plain `u32` values in `0..=0x10FFFF`; every API taking a
//! code point accepts `impl Into<u32>`, so `char`s can be passed directly.
//! Text is handled as `&str` and all text positions are byte offsets.

pub mod error;
pub mod inversion;
pub mod pattern;
pub mod props;
pub mod set;
pub mod strings;
pub mod symbols;

pub use error::{Error, ErrorKind, Result};
pub use inversion::{CodePointRange, InversionList};
pub use pattern::PatternBuilder;
pub use set::{CloseOver, Element, SpanCondition, UnicodeSet};
pub use strings::StringSet;

/// The smallest code point.
pub const MIN_CODE_POINT: u32 = 0x0000;

/// The largest code point.
pub const MAX_CODE_POINT: u32 = 0x10FFFF;

/// One past [`MAX_CODE_POINT`]. Terminates every inversion list and is never a
/// member of any set.
pub const HIGH: u32 = MAX_CODE_POINT + 1;

/// Checks that `c` is a code point, i.e., lies in `MIN_CODE_POINT..=MAX_CODE_POINT`.
pub(crate) fn check_code_point(c: u32) -> Result<u32> {
    if c > MAX_CODE_POINT {
        Err(Error::invalid_code_point(c))
    } else {
        Ok(c)
    }
}

/// Returns the code point of `s` if `s` consists of exactly one code point.
/// Returns `None` for the empty string and for strings of two or more code points.
///
/// # Examples
/// ```
/// use uniset::single_code_point;
/// assert_eq!(single_code_point("a"), Some(0x61));
/// assert_eq!(single_code_point("🦀"), Some(0x1F980));
/// assert_eq!(single_code_point(""), None);
/// assert_eq!(single_code_point("ab"), None);
/// ```
pub fn single_code_point(s: &str) -> Option<u32> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c as u32),
        _ => None,
    }
}

/// Returns `true` if `c` is a character of the `Pattern_White_Space` property.
pub fn is_pattern_white_space(c: u32) -> bool {
    matches!(
        c,
        0x0009..=0x000D | 0x0020 | 0x0085 | 0x200E | 0x200F | 0x2028 | 0x2029
    )
}

/// Returns `true` if `c` must be escaped to be printed safely,
/// i.e., if it is not in the printable ASCII range 0x0020 to 0x007E.
pub fn is_unprintable(c: u32) -> bool {
    !(0x0020..=0x007E).contains(&c)
}

/// Escapes a code point as `\uXXXX` (BMP) or `\UXXXXXXXX` (supplementary).
///
/// # Examples
/// ```
/// use uniset::escape_code_point;
/// assert_eq!(escape_code_point('a' as u32), r"\u0061");
/// assert_eq!(escape_code_point('\n' as u32), r"\u000A");
/// assert_eq!(escape_code_point(0x1F980), r"\U0001F980");
/// ```
pub fn escape_code_point(c: u32) -> String {
    let mut escaped = String::with_capacity(10);
    push_escaped(&mut escaped, c);
    escaped
}

pub(crate) fn push_escaped(out: &mut String, c: u32) {
    use std::fmt::Write;
    // Writing into a String cannot fail.
    let _ = if c <= 0xFFFF {
        write!(out, "\\u{:04X}", c)
    } else {
        write!(out, "\\U{:08X}", c)
    };
}

/// Decodes the escape sequence at the start of `chars`, which must begin
/// with the character following the backslash. Returns the decoded code point
/// and the number of characters consumed (not counting the backslash).
///
/// Recognized forms:
///
/// - `uXXXX` and `u{X...}` (one to six hex digits),
/// - `UXXXXXXXX`,
/// - `xXX` and `x{X...}`,
/// - octal `ooo` (one to three digits),
/// - `cX` control characters,
/// - `a`, `b`, `e`, `f`, `n`, `r`, `t`, `v`,
/// - any other character, which stands for itself.
///
/// A lead surrogate escape directly followed by a trail surrogate escape, as
/// in `\uD83E\uDD80`, decodes to the supplementary code point of the pair.
///
/// Returns `None` if a numeric escape is malformed or out of range.
pub fn unescape(chars: &[char]) -> Option<(u32, usize)> {
    let first = *chars.first()?;
    let (min, max, radix, mut i, braces) = match first {
        'u' if chars.get(1) == Some(&'{') => (1, 6, 16, 2, true),
        'u' => (4, 4, 16, 1, false),
        'U' => (8, 8, 16, 1, false),
        'x' if chars.get(1) == Some(&'{') => (1, 8, 16, 2, true),
        'x' => (1, 2, 16, 1, false),
        '0'..='7' => (1, 3, 8, 0, false),
        'c' => {
            let c = *chars.get(1)?;
            return Some(((c as u32) & 0x1F, 2));
        }
        _ => {
            let c = match first {
                'a' => 0x07,
                'b' => 0x08,
                'e' => 0x1B,
                'f' => 0x0C,
                'n' => 0x0A,
                'r' => 0x0D,
                't' => 0x09,
                'v' => 0x0B,
                c => c as u32,
            };
            return Some((c, 1));
        }
    };
    let mut code: u32 = 0;
    let mut digits = 0;
    while digits < max {
        match chars.get(i).and_then(|c| c.to_digit(radix)) {
            Some(d) => {
                code = code.checked_mul(radix)?.checked_add(d)?;
                digits += 1;
                i += 1;
            }
            None => break,
        }
    }
    if digits < min {
        return None;
    }
    if braces {
        if chars.get(i) != Some(&'}') {
            return None;
        }
        i += 1;
    }
    if code > MAX_CODE_POINT {
        return None;
    }
    if (0xD800..=0xDBFF).contains(&code) && chars.get(i) == Some(&'\\') {
        if let Some((trail, len)) = unescape(&chars[i + 1..]) {
            if (0xDC00..=0xDFFF).contains(&trail) {
                code = 0x10000 + ((code - 0xD800) << 10) + (trail - 0xDC00);
                i += 1 + len;
            }
        }
    }
    Some((code, i))
}

/// An iterator over the code points in the range `start` to `end`.
#[derive(Debug, Clone)]
pub struct CodePoints {
    current: u32,
    end: u32,
}

impl CodePoints {
    /// Create a new iterator over the code points in the range `start` to `end` (both inclusively).
    /// The iterator is empty if `start > end`.
    pub fn new(start: u32, end: u32) -> Self {
        CodePoints {
            current: start,
            end: end.min(MAX_CODE_POINT),
        }
    }
}

impl Iterator for CodePoints {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current <= self.end {
            let c = self.current;
            self.current += 1;
            Some(c)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = if self.current <= self.end {
            (self.end - self.current + 1) as usize
        } else {
            0
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for CodePoints {}

#[cfg(test)]
mod tests {

    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_unescape_valid() {
        assert_eq!(unescape(&chars("u000A")), Some((0x000A, 5)));
        assert_eq!(unescape(&chars("u{A}")), Some((0x000A, 4)));
        assert_eq!(unescape(&chars("u{10FFFF}")), Some((0x10FFFF, 9)));
        assert_eq!(unescape(&chars("U0001F980")), Some((0x1F980, 9)));
        assert_eq!(unescape(&chars("x41")), Some((0x41, 3)));
        assert_eq!(unescape(&chars("x4z")), Some((0x4, 2)));
        assert_eq!(unescape(&chars("x{1F980}")), Some((0x1F980, 8)));
        assert_eq!(unescape(&chars("101")), Some((0x41, 3)));
        assert_eq!(unescape(&chars("cA")), Some((0x01, 2)));
        assert_eq!(unescape(&chars("n")), Some((0x0A, 1)));
        assert_eq!(unescape(&chars("-")), Some(('-' as u32, 1)));
    }

    #[test]
    fn test_unescape_too_few_digits() {
        assert_eq!(unescape(&chars("u12")), None);
        assert_eq!(unescape(&chars("U1234")), None);
        assert_eq!(unescape(&chars("u{}")), None);
        assert_eq!(unescape(&chars("xg")), None);
    }

    #[test]
    fn test_unescape_unclosed_braces() {
        assert_eq!(unescape(&chars("u{0041")), None);
        assert_eq!(unescape(&chars("x{41")), None);
    }

    #[test]
    fn test_unescape_too_large() {
        assert_eq!(unescape(&chars("U00110000")), None);
        assert_eq!(unescape(&chars("u{110000}")), None);
    }

    #[test]
    fn test_unescape_surrogate_pairs() {
        assert_eq!(unescape(&chars(r"uD83E\uDD80")), Some((0x1F980, 11)));
        assert_eq!(unescape(&chars(r"x{D83E}\x{DD80}z")), Some((0x1F980, 15)));
        // Unpaired surrogates stay as they are.
        assert_eq!(unescape(&chars(r"uD83Ex")), Some((0xD83E, 5)));
        assert_eq!(unescape(&chars(r"uD83E\u0041")), Some((0xD83E, 5)));
        assert_eq!(unescape(&chars(r"uDD80\uD83E")), Some((0xDD80, 5)));
        assert_eq!(unescape(&chars(r"uD83E\uD83E\uDD80")), Some((0xD83E, 5)));
    }

    #[test]
    fn test_unescape_empty() {
        assert_eq!(unescape(&[]), None);
    }

    #[quickcheck]
    fn escape_unescape_inverse(c: u32) -> TestResult {
        if c > MAX_CODE_POINT {
            return TestResult::discard();
        }
        let escaped: Vec<char> = escape_code_point(c).chars().skip(1).collect();
        assert_eq!(unescape(&escaped), Some((c, escaped.len())));
        TestResult::passed()
    }

    #[test]
    fn test_single_code_point_surrogate_pair_text() {
        // A supplementary character is one code point even though it needs two UTF-16 units.
        assert_eq!(single_code_point("\u{10000}"), Some(0x10000));
        assert_eq!(single_code_point("e\u{301}"), None);
    }

    #[test]
    fn test_code_points_iter() {
        assert_eq!(CodePoints::new(0x61, 0x63).collect::<Vec<_>>(), vec![0x61, 0x62, 0x63]);
        assert_eq!(CodePoints::new(0x63, 0x61).count(), 0);
        assert_eq!(CodePoints::new(MAX_CODE_POINT, MAX_CODE_POINT).len(), 1);
    }

    #[test]
    fn test_check_code_point() {
        assert_eq!(check_code_point(0x10FFFF), Ok(0x10FFFF));
        assert_eq!(
            check_code_point(HIGH).map_err(|e| e.kind().clone()),
            Err(ErrorKind::InvalidCodePoint(HIGH))
        );
    }

    #[test]
    fn test_pattern_white_space() {
        assert!(is_pattern_white_space(' ' as u32));
        assert!(is_pattern_white_space(0x2029));
        assert!(!is_pattern_white_space(0x00A0));
    }
}
