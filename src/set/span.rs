//! Spanning text with a set.
//!
//! A span measures how far a condition on set membership holds from a given
//! position, forward or backward. Multi-character members make this more than
//! a per-code-point test: a member string matches as a whole, and under
//! [`SpanCondition::Contained`] all ways to split the text into members are
//! explored.

use bit_set::BitSet;
use itertools::Itertools;

use crate::{inversion::InversionList, strings::StringSet};

/// How a span advances through text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanCondition {
    /// Advance while no member (code point or string) matches at the
    /// current position.
    NotContained,
    /// Advance over the longest prefix that is a concatenation of members,
    /// trying all alternative splits.
    Contained,
    /// Like [`SpanCondition::Contained`], but always takes the longest member
    /// matching at the current position without backtracking.
    Simple,
}

/// The member strings of a set, prepared for matching.
#[derive(Debug, Clone, Default)]
pub(crate) struct StringMatcher {
    /// Strings ordered by decreasing byte length, ties in code point order.
    longest_first: Vec<String>,
    /// First code points of all strings.
    initials: InversionList,
    /// Last code points of all strings.
    finals: InversionList,
}

impl StringMatcher {
    pub(crate) fn new(strings: &StringSet) -> Self {
        let longest_first = strings
            .iter()
            .sorted_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)))
            .map(str::to_string)
            .collect();
        let initials = strings
            .iter()
            .filter_map(|s| s.chars().next())
            .map(crate::CodePointRange::singleton)
            .collect();
        let finals = strings
            .iter()
            .filter_map(|s| s.chars().next_back())
            .map(crate::CodePointRange::singleton)
            .collect();
        StringMatcher {
            longest_first,
            initials,
            finals,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.longest_first.is_empty()
    }

    /// Byte lengths of the strings that are a prefix of `rest`, longest first.
    fn prefixes_of<'a>(&'a self, rest: &'a str) -> impl Iterator<Item = usize> + 'a {
        let candidate = rest.chars().next().is_some_and(|c| self.initials.contains(c));
        self.longest_first
            .iter()
            .filter(move |s| candidate && rest.starts_with(s.as_str()))
            .map(|s| s.len())
    }

    /// Byte lengths of the strings that are a suffix of `head`, longest first.
    fn suffixes_of<'a>(&'a self, head: &'a str) -> impl Iterator<Item = usize> + 'a {
        let candidate = head.chars().next_back().is_some_and(|c| self.finals.contains(c));
        self.longest_first
            .iter()
            .filter(move |s| candidate && head.ends_with(s.as_str()))
            .map(|s| s.len())
    }

    pub(crate) fn heap_size(&self) -> usize {
        self.longest_first
            .iter()
            .map(|s| s.capacity() + std::mem::size_of::<String>())
            .sum::<usize>()
            + self.initials.heap_size()
            + self.finals.heap_size()
    }
}

/// Rounds a byte offset into `text` down to a char boundary and clamps it to the text.
fn floor_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Spans forward from byte offset `start` and returns the byte offset at
/// which `condition` stops holding.
pub(crate) fn span(
    contains: impl Fn(u32) -> bool,
    strings: &StringMatcher,
    text: &str,
    start: usize,
    condition: SpanCondition,
) -> usize {
    let start = floor_boundary(text, start);
    if strings.is_empty() {
        let inside = condition != SpanCondition::NotContained;
        return text[start..]
            .char_indices()
            .find(|&(_, c)| contains(c as u32) != inside)
            .map_or(text.len(), |(i, _)| start + i);
    }
    match condition {
        SpanCondition::NotContained => text[start..]
            .char_indices()
            .find(|&(i, c)| {
                contains(c as u32) || strings.prefixes_of(&text[start + i..]).next().is_some()
            })
            .map_or(text.len(), |(i, _)| start + i),
        SpanCondition::Simple => {
            let mut pos = start;
            while let Some(c) = text[pos..].chars().next() {
                let code_point = if contains(c as u32) { c.len_utf8() } else { 0 };
                let string = strings.prefixes_of(&text[pos..]).next().unwrap_or(0);
                let step = code_point.max(string);
                if step == 0 {
                    break;
                }
                pos += step;
            }
            pos
        }
        SpanCondition::Contained => {
            // reachable[i] marks that start + i is the end of a chain of members beginning at start.
            let mut reachable = BitSet::with_capacity(text.len() - start + 1);
            reachable.insert(0);
            let mut frontier = start;
            let mut furthest = start;
            for (i, c) in text[start..].char_indices() {
                let pos = start + i;
                if pos > frontier {
                    break;
                }
                if !reachable.contains(i) {
                    continue;
                }
                furthest = pos;
                let mut mark = |len: usize| {
                    reachable.insert(i + len);
                    frontier = frontier.max(pos + len);
                };
                if contains(c as u32) {
                    mark(c.len_utf8());
                }
                for len in strings.prefixes_of(&text[pos..]) {
                    mark(len);
                }
            }
            if reachable.contains(text.len() - start) {
                furthest = text.len();
            }
            furthest
        }
    }
}

/// Spans backward from byte offset `end` and returns the byte offset at
/// which `condition` stops holding.
pub(crate) fn span_back(
    contains: impl Fn(u32) -> bool,
    strings: &StringMatcher,
    text: &str,
    end: usize,
    condition: SpanCondition,
) -> usize {
    let end = floor_boundary(text, end);
    if strings.is_empty() {
        let inside = condition != SpanCondition::NotContained;
        return text[..end]
            .char_indices()
            .rev()
            .find(|&(_, c)| contains(c as u32) != inside)
            .map_or(0, |(i, c)| i + c.len_utf8());
    }
    match condition {
        SpanCondition::NotContained => text[..end]
            .char_indices()
            .rev()
            .find(|&(i, c)| {
                let limit = i + c.len_utf8();
                contains(c as u32) || strings.suffixes_of(&text[..limit]).next().is_some()
            })
            .map_or(0, |(i, c)| i + c.len_utf8()),
        SpanCondition::Simple => {
            let mut pos = end;
            while let Some(c) = text[..pos].chars().next_back() {
                let code_point = if contains(c as u32) { c.len_utf8() } else { 0 };
                let string = strings.suffixes_of(&text[..pos]).next().unwrap_or(0);
                let step = code_point.max(string);
                if step == 0 {
                    break;
                }
                pos -= step;
            }
            pos
        }
        SpanCondition::Contained => {
            // reachable[i] marks that end - i is the start of a chain of members ending at end.
            let mut reachable = BitSet::with_capacity(end + 1);
            reachable.insert(0);
            let mut frontier = end;
            let mut furthest = end;
            for (i, c) in text[..end].char_indices().rev() {
                let pos = i + c.len_utf8();
                if pos < frontier {
                    break;
                }
                let back = end - pos;
                if !reachable.contains(back) {
                    continue;
                }
                furthest = pos;
                let mut mark = |len: usize| {
                    reachable.insert(back + len);
                    frontier = frontier.min(pos - len);
                };
                if contains(c as u32) {
                    mark(c.len_utf8());
                }
                for len in strings.suffixes_of(&text[..pos]) {
                    mark(len);
                }
            }
            if reachable.contains(end) {
                furthest = 0;
            }
            furthest
        }
    }
}
