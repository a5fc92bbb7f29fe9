//! Collaborators of the pattern compiler: variables and string ranges.

use indexmap::IndexMap;

use crate::{Error, Result, UnicodeSet};

/// Resolves `$name` references and stand-in characters in patterns.
pub trait SymbolTable {
    /// Returns the replacement text of the variable `name`.
    fn lookup(&self, name: &str) -> Option<Vec<char>>;

    /// Returns the set a stand-in code point of a variable's text stands for.
    fn lookup_matcher(&self, c: u32) -> Option<&UnicodeSet>;

    /// Parses a variable name starting at `pos`. Returns the name and the
    /// position after it, or `None` if no name starts at `pos`.
    ///
    /// The default accepts an identifier: an alphabetic character or `_`
    /// followed by alphanumeric characters or `_`.
    fn parse_reference(&self, text: &[char], pos: usize) -> Option<(String, usize)> {
        let start = *text.get(pos)?;
        if !(start.is_alphabetic() || start == '_') {
            return None;
        }
        let end = text[pos..]
            .iter()
            .position(|&c| !(c.is_alphanumeric() || c == '_'))
            .map_or(text.len(), |n| pos + n);
        Some((text[pos..end].iter().collect(), end))
    }
}

/// First code point used to stand in for set-valued variables.
const FIRST_STAND_IN: u32 = 0xF0000;

/// A symbol table of named variables.
///
/// A variable is either text, spliced into the pattern where `$name` occurs,
/// or a set, which can be used wherever a nested set is allowed.
///
/// # Example
/// ```
/// use uniset::symbols::Variables;
/// use uniset::{PatternBuilder, UnicodeSet};
///
/// let mut vars = Variables::new();
/// vars.define("vowel", "aeiou");
/// vars.define_set("digit", UnicodeSet::parse("[0-9]").unwrap());
///
/// let set = PatternBuilder::new()
///     .symbols(vars)
///     .build()
///     .parse("[$vowel $digit]")
///     .unwrap();
/// assert!(set.contains('e'));
/// assert!(set.contains('7'));
/// assert!(!set.contains('b'));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Variables {
    text: IndexMap<String, Vec<char>>,
    sets: IndexMap<u32, UnicodeSet>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `name` as the given text.
    pub fn define(&mut self, name: impl Into<String>, text: &str) -> &mut Self {
        self.text.insert(name.into(), text.chars().collect());
        self
    }

    /// Defines `name` as a set.
    pub fn define_set(&mut self, name: impl Into<String>, set: UnicodeSet) -> &mut Self {
        let name = name.into();
        let stand_in = match self.text.get(&name) {
            Some(text) if text.len() == 1 && self.sets.contains_key(&(text[0] as u32)) => {
                text[0] as u32
            }
            _ => FIRST_STAND_IN + self.sets.len() as u32,
        };
        self.sets.insert(stand_in, set);
        // Stand-ins are taken from the supplementary private use area, all valid chars.
        if let Some(c) = char::from_u32(stand_in) {
            self.text.insert(name, vec![c]);
        }
        self
    }

    /// The number of variables.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Iterates over the variable names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.text.keys().map(String::as_str)
    }
}

impl SymbolTable for Variables {
    fn lookup(&self, name: &str) -> Option<Vec<char>> {
        self.text.get(name).cloned()
    }

    fn lookup_matcher(&self, c: u32) -> Option<&UnicodeSet> {
        self.sets.get(&c)
    }
}

/// Expands a `{start}-{end}` string range of a pattern into its members.
pub trait StringRangeExpander {
    fn expand(&self, start: &str, end: &str) -> Result<Vec<String>>;
}

/// The upper limit on the number of strings a single range may produce.
pub const MAX_RANGE_STRINGS: usize = 1 << 16;

/// Expands string ranges position by position.
///
/// The range `{ax}-{cz}` stands for every string whose first code point is
/// in `a..=c` and whose second code point is in `x..=z`. If `start` is longer
/// than `end`, its extra leading code points form a common prefix; unless
/// `require_same_length` is set, which is the default.
///
/// # Example
/// ```
/// use uniset::symbols::{LexicographicRange, StringRangeExpander};
///
/// let strings = LexicographicRange::default().expand("ax", "by").unwrap();
/// assert_eq!(strings, vec!["ax", "ay", "bx", "by"]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LexicographicRange {
    pub require_same_length: bool,
}

impl Default for LexicographicRange {
    fn default() -> Self {
        LexicographicRange {
            require_same_length: true,
        }
    }
}

impl LexicographicRange {
    fn add(prefix: &mut String, starts: &[char], ends: &[char], out: &mut Vec<String>) -> Result<()> {
        let (Some(&start), Some(&end)) = (starts.first(), ends.first()) else {
            out.push(prefix.clone());
            return Ok(());
        };
        if start > end {
            return Err(Error::syntax("Invalid string range"));
        }
        let len = prefix.len();
        for c in start..=end {
            prefix.push(c);
            Self::add(prefix, &starts[1..], &ends[1..], out)?;
            prefix.truncate(len);
            if out.len() > MAX_RANGE_STRINGS {
                return Err(Error::syntax("String range too large"));
            }
        }
        Ok(())
    }
}

impl StringRangeExpander for LexicographicRange {
    fn expand(&self, start: &str, end: &str) -> Result<Vec<String>> {
        let starts: Vec<char> = start.chars().collect();
        let ends: Vec<char> = end.chars().collect();
        if ends.is_empty() || starts.len() < ends.len() {
            return Err(Error::syntax("Invalid string range"));
        }
        let offset = starts.len() - ends.len();
        if self.require_same_length && offset != 0 {
            return Err(Error::syntax("Invalid string range"));
        }
        let mut prefix: String = starts[..offset].iter().collect();
        let mut out = Vec::new();
        Self::add(&mut prefix, &starts[offset..], &ends, &mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand() {
        let r = LexicographicRange::default();
        assert_eq!(r.expand("a", "c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(r.expand("ab", "ab").unwrap(), vec!["ab"]);
        assert_eq!(r.expand("ax", "bx").unwrap(), vec!["ax", "bx"]);
    }

    #[test]
    fn test_expand_errors() {
        let r = LexicographicRange::default();
        assert!(r.expand("b", "a").is_err());
        assert!(r.expand("ab", "c").is_err());
        assert!(r.expand("a", "bc").is_err());
        assert!(r.expand("az", "by").is_err());
        assert!(r.expand("\u{0}\u{0}", "\u{FFFF}\u{FFFF}").is_err());
    }

    #[test]
    fn test_expand_with_prefix() {
        let r = LexicographicRange {
            require_same_length: false,
        };
        assert_eq!(r.expand("abx", "z").unwrap(), vec!["abx", "aby", "abz"]);
    }

    #[test]
    fn test_parse_reference() {
        let vars = Variables::new();
        let text: Vec<char> = "$ab_1 c".chars().collect();
        assert_eq!(vars.parse_reference(&text, 1), Some(("ab_1".to_string(), 5)));
        assert_eq!(vars.parse_reference(&text, 0), None);
        assert_eq!(vars.parse_reference(&text, 7), None);
    }

    #[test]
    fn test_define() {
        let mut vars = Variables::new();
        vars.define("a", "xyz").define_set("b", UnicodeSet::new());
        assert_eq!(vars.lookup("a"), Some(vec!['x', 'y', 'z']));
        let stand_in = vars.lookup("b").unwrap();
        assert_eq!(stand_in.len(), 1);
        assert!(vars.lookup_matcher(stand_in[0] as u32).is_some());
        assert_eq!(vars.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
