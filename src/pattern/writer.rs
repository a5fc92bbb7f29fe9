//! Writing sets as patterns.

use crate::{
    inversion::InversionList, is_pattern_white_space, is_unprintable, push_escaped,
    strings::StringSet, MAX_CODE_POINT, MIN_CODE_POINT,
};

/// Code points that are escaped in every pattern: controls, surrogates and
/// noncharacters.
pub(crate) fn always_escaped(c: u32) -> bool {
    match c {
        0..=0x1F => true,
        0x20..=0x7E => false,
        0x7F..=0x9F => true,
        0xA0..=0xD7FF => false,
        0xD800..=0xDFFF | 0xFDD0..=0xFDEF => true,
        c if (c & 0xFFFE) == 0xFFFE => true,
        c => c > MAX_CODE_POINT,
    }
}

fn is_syntax(c: u32) -> bool {
    matches!(
        char::from_u32(c),
        Some('[' | ']' | '-' | '^' | '&' | '\\' | '{' | '}' | ':' | '$')
    )
}

/// Appends `c`, escaped so that it reads back as a literal.
pub(crate) fn push_char(out: &mut String, c: u32, escape_unprintable: bool) {
    let escape = if escape_unprintable {
        is_unprintable(c)
    } else {
        always_escaped(c)
    };
    if escape {
        push_escaped(out, c);
        return;
    }
    if is_syntax(c) || is_pattern_white_space(c) {
        out.push('\\');
    }
    match char::from_u32(c) {
        Some(c) => out.push(c),
        None => push_escaped(out, c),
    }
}

/// Appends the characters of `s`, each escaped as by [`push_char`].
pub(crate) fn push_str(out: &mut String, s: &str, escape_unprintable: bool) {
    for c in s.chars() {
        push_char(out, c as u32, escape_unprintable);
    }
}

fn push_range(out: &mut String, start: u32, end: u32, escape_unprintable: bool) {
    push_char(out, start, escape_unprintable);
    if start != end {
        if start + 1 != end {
            out.push('-');
        }
        push_char(out, end, escape_unprintable);
    }
}

/// Generates the canonical pattern of a set.
///
/// Sets without strings that contain both the smallest and the largest code
/// point and consist of two or more ranges are written in the negated form
/// `[^...]`, listing the gaps between the ranges.
pub(crate) fn generate(list: &InversionList, strings: &StringSet, escape_unprintable: bool) -> String {
    let mut out = String::from("[");
    let count = list.range_count();
    let negate = count > 1
        && strings.is_empty()
        && list.first() == Some(MIN_CODE_POINT)
        && list.last() == Some(MAX_CODE_POINT);
    if negate {
        out.push('^');
        let ranges: Vec<_> = list.ranges().collect();
        for pair in ranges.windows(2) {
            push_range(&mut out, pair[0].end() + 1, pair[1].start() - 1, escape_unprintable);
        }
    } else {
        for r in list.ranges() {
            push_range(&mut out, r.start(), r.end(), escape_unprintable);
        }
    }
    for s in strings {
        out.push('{');
        push_str(&mut out, s, escape_unprintable);
        out.push('}');
    }
    out.push(']');
    out
}

/// Re-escapes a pattern that was rebuilt by the compiler. Characters that
/// must be escaped and are written literally, or after a single backslash,
/// are replaced by a numeric escape. Property clauses are copied unchanged.
pub(crate) fn reescape(pattern: &str, escape_unprintable: bool) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len());
    let mut backslashes = 0;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if backslashes % 2 == 0 {
            if let Some(len) = property_len(&chars[i..]) {
                out.extend(&chars[i..i + len]);
                backslashes = 0;
                i += len;
                continue;
            }
        }
        let code = c as u32;
        let escape = if escape_unprintable {
            is_unprintable(code)
        } else {
            always_escaped(code)
        };
        if escape {
            if backslashes % 2 == 1 {
                out.pop();
            }
            push_escaped(&mut out, code);
            backslashes = 0;
        } else {
            out.push(c);
            backslashes = if c == '\\' { backslashes + 1 } else { 0 };
        }
        i += 1;
    }
    out
}

/// The length of the property clause at the start of `rest`, if there is one.
/// Syntax characters are always escaped outside of property clauses, so an
/// unescaped `[:` or `\p{` starts one.
fn property_len(rest: &[char]) -> Option<usize> {
    match rest {
        ['[', ':', tail @ ..] => tail.windows(2).position(|w| w == [':', ']']).map(|n| n + 4),
        ['\\', 'p' | 'P' | 'N', '{', tail @ ..] => tail.iter().position(|&c| c == '}').map(|n| n + 4),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CodePointRange;

    fn list(ranges: &[(u32, u32)]) -> InversionList {
        ranges.iter().map(|&(s, e)| CodePointRange::new(s, e)).collect()
    }

    #[test]
    fn test_generate() {
        let strings: StringSet = ["ab", "a-}"].into_iter().collect();
        assert_eq!(
            generate(&list(&[(0x61, 0x63), (0x78, 0x79), (0x5B, 0x5B)]), &strings, false),
            r"[\[a-cxy{a\-\}}{ab}]"
        );
        assert_eq!(generate(&list(&[]), &StringSet::new(), false), "[]");
    }

    #[test]
    fn test_generate_negated() {
        let l = list(&[(0, 0x60), (0x7B, MAX_CODE_POINT)]);
        assert_eq!(generate(&l, &StringSet::new(), false), "[^a-z]");
        let l = list(&[(0, MAX_CODE_POINT)]);
        assert_eq!(generate(&l, &StringSet::new(), true), r"[\u0000-\U0010FFFF]");
        let strings: StringSet = ["ab"].into_iter().collect();
        let l = list(&[(0, 0x60), (0x7B, MAX_CODE_POINT)]);
        assert!(generate(&l, &strings, false).starts_with(r"[\u0000-`"));
    }

    #[test]
    fn test_escapes() {
        let mut out = String::new();
        push_char(&mut out, 0xE9, false);
        push_char(&mut out, 0xE9, true);
        push_char(&mut out, 0xD800, false);
        push_char(&mut out, 0x20, false);
        push_char(&mut out, 0xFFFF, false);
        assert_eq!(out, r"é\u00E9\uD800\ \uFFFF");
    }

    #[test]
    fn test_reescape() {
        assert_eq!(reescape("[é\\\n]", false), "[é\\u000A]");
        assert_eq!(reescape("[é\\\\\n]", false), "[é\\\\\\u000A]");
        assert_eq!(reescape("[é]", true), "[\\u00E9]");
        assert_eq!(reescape("[a-c]", true), "[a-c]");
    }

    #[test]
    fn test_reescape_keeps_property_clauses() {
        assert_eq!(reescape("[[:x=é:]é]", true), "[[:x=é:]\\u00E9]");
        assert_eq!(reescape("[\\p{gc≠L}\\N{é}]", true), "[\\p{gc≠L}\\N{é}]");
        assert_eq!(reescape("[\\\\p{é}]", true), "[\\\\p{\\u00E9}]");
    }
}
