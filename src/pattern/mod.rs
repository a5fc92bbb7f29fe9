//! Compiling patterns into sets.
//!
//! The pattern language:
//!
//! ```text
//! pattern  := '[' '^'? item* ']' | property
//! item     := char | char '-' char | '{' string '}' | '{' string '}' '-' '{' string '}'
//!           | pattern | pattern ('&' | '-') pattern
//! property := '[:' '^'? name ('=' value)? ':]' | '\p{' ... '}' | '\P{' ... '}' | '\N{' name '}'
//! ```
//!
//! Adjacent items are united, `&` intersects and `-` subtracts; operators
//! associate to the left. A `-` is literal right after `[` or `[^` and right
//! before `]`. A `$` right before `]` stands for U+FFFF. With a symbol table,
//! `$name` splices in the text of a variable. Pattern white space is ignored
//! unless escaped, see [`PatternBuilder::ignore_space`].

pub(crate) mod cursor;
pub(crate) mod writer;

use std::{fmt, sync::Arc};

use log::debug;

use self::cursor::{Cursor, Token, VARIABLE};
use crate::{
    is_pattern_white_space,
    props::{
        case::{default_case_mapper, CaseMapper},
        Lookup, PropertyResolver,
    },
    single_code_point,
    strings::StringSet,
    symbols::{LexicographicRange, StringRangeExpander, SymbolTable},
    CloseOver, Error, ErrorKind, Result, UnicodeSet,
};

/// Patterns nested deeper than this are rejected.
const MAX_DEPTH: usize = 100;

/// The code point a `$` before the closing `]` stands for.
const ANCHOR: u32 = 0xFFFF;

/// A builder for a pattern [`Parser`].
///
/// # Example
/// ```
/// use uniset::PatternBuilder;
///
/// let parser = PatternBuilder::new().case_insensitive(true).build();
/// let set = parser.parse("[a-c]").unwrap();
/// assert!(set.contains('B'));
/// ```
#[derive(Clone)]
pub struct PatternBuilder {
    ignore_space: bool,
    case_insensitive: bool,
    add_case_mappings: bool,
    resolver: Option<Arc<dyn PropertyResolver>>,
    case_mapper: Option<Arc<dyn CaseMapper>>,
    symbols: Option<Arc<dyn SymbolTable + Send + Sync>>,
    string_ranges: Option<Arc<dyn StringRangeExpander + Send + Sync>>,
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternBuilder {
    pub fn new() -> Self {
        PatternBuilder {
            ignore_space: true,
            case_insensitive: false,
            add_case_mappings: false,
            resolver: None,
            case_mapper: None,
            symbols: None,
            string_ranges: None,
        }
    }

    /// Builds a parser with the current configuration.
    pub fn build(&self) -> Parser {
        Parser {
            config: self.clone(),
        }
    }

    /// Skip `Pattern_White_Space` characters that are not escaped. Enabled by default.
    pub fn ignore_space(&mut self, yes: bool) -> &mut Self {
        self.ignore_space = yes;
        self
    }

    /// Close every bracketed set over case before it is negated. Disabled by default.
    pub fn case_insensitive(&mut self, yes: bool) -> &mut Self {
        self.case_insensitive = yes;
        self
    }

    /// Add the case mappings of every member of a bracketed set before it is
    /// negated. Disabled by default.
    pub fn add_case_mappings(&mut self, yes: bool) -> &mut Self {
        self.add_case_mappings = yes;
        self
    }

    /// Resolve properties with `resolver` instead of the default resolver.
    pub fn resolver(&mut self, resolver: Arc<dyn PropertyResolver>) -> &mut Self {
        self.resolver = Some(resolver);
        self
    }

    /// Use `mapper` instead of the default case mapper.
    pub fn case_mapper(&mut self, mapper: Arc<dyn CaseMapper>) -> &mut Self {
        self.case_mapper = Some(mapper);
        self
    }

    /// Resolve `$name` references and stand-in characters through `symbols`.
    pub fn symbols(&mut self, symbols: impl SymbolTable + Send + Sync + 'static) -> &mut Self {
        self.symbols = Some(Arc::new(symbols));
        self
    }

    /// Expand `{start}-{end}` string ranges with `expander`. The default is
    /// [`LexicographicRange::default`].
    pub fn string_ranges(&mut self, expander: impl StringRangeExpander + Send + Sync + 'static) -> &mut Self {
        self.string_ranges = Some(Arc::new(expander));
        self
    }
}

impl fmt::Debug for PatternBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuilder")
            .field("ignore_space", &self.ignore_space)
            .field("case_insensitive", &self.case_insensitive)
            .field("add_case_mappings", &self.add_case_mappings)
            .field("resolver", &self.resolver.is_some())
            .field("case_mapper", &self.case_mapper.is_some())
            .field("symbols", &self.symbols.is_some())
            .field("string_ranges", &self.string_ranges.is_some())
            .finish()
    }
}

/// Compiles patterns into [`UnicodeSet`]s.
#[derive(Clone, Debug)]
pub struct Parser {
    config: PatternBuilder,
}

impl Parser {
    /// Compiles `pattern`. Only ignorable white space may follow the pattern.
    ///
    /// The returned set remembers a normalized form of the pattern, returned
    /// by [`UnicodeSet::to_pattern`] until the set is modified.
    pub fn parse(&self, pattern: &str) -> Result<UnicodeSet> {
        let symbols = self
            .config
            .symbols
            .as_deref()
            .map(|s| s as &dyn SymbolTable);
        let mut compiler = Compiler {
            config: &self.config,
            lookup: None,
            cursor: Cursor::new(pattern, symbols, self.config.ignore_space),
        };
        let mut rebuilt = String::new();
        let mut set = compiler.compile(&mut rebuilt, 0)?;
        compiler.cursor.skip_ignored();
        if !compiler.cursor.at_end() {
            return Err(compiler.cursor.error("Extra characters after pattern"));
        }
        set.set_pattern(rebuilt);
        debug!(
            "compiled pattern {:?}: {} ranges, {} strings",
            pattern,
            set.range_count(),
            set.string_set().len()
        );
        Ok(set)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Before the opening `[`.
    Start,
    /// Inside the brackets.
    Inside,
    /// After the closing `]`.
    Done,
}

/// The item preceding the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Nothing,
    /// A character not yet added, as it may start a range.
    Char(u32),
    Set,
}

/// The kind of a nested set.
enum Nested<'a> {
    Bracket,
    Property,
    Variable(&'a UnicodeSet),
}

/// The state of one compilation.
struct Compiler<'a> {
    config: &'a PatternBuilder,
    lookup: Option<Lookup>,
    cursor: Cursor<'a>,
}

impl<'a> Compiler<'a> {
    /// Compiles a pattern starting at the cursor. Appends the normalized pattern to `rebuilt`.
    fn compile(&mut self, rebuilt: &mut String, depth: usize) -> Result<UnicodeSet> {
        if depth > MAX_DEPTH {
            return Err(self.cursor.error("Pattern nested too deeply"));
        }
        let mut set = UnicodeSet::new();
        let mut local = String::new();
        let mut keep_local = false;
        let mut mode = Mode::Start;
        let mut last = Last::Nothing;
        let mut last_string: Option<String> = None;
        let mut op: Option<char> = None;
        let mut invert = false;

        while mode != Mode::Done {
            let mut nested = None;
            let mut token = Token { c: 0, escaped: false };
            if self.resembles_property() {
                nested = Some(Nested::Property);
            } else {
                let backup = self.cursor.mark();
                let Some(next) = self.cursor.next()? else {
                    break;
                };
                token = next;
                if token.c == '[' as u32 && !token.escaped {
                    if mode == Mode::Inside {
                        self.cursor.reset(backup);
                        nested = Some(Nested::Bracket);
                    } else {
                        mode = Mode::Inside;
                        local.push('[');
                        let mut backup = self.cursor.mark();
                        let mut next = self.cursor.next()?;
                        if next == Some(Token { c: '^' as u32, escaped: false }) {
                            invert = true;
                            local.push('^');
                            backup = self.cursor.mark();
                            next = self.cursor.next()?;
                        }
                        match next {
                            Some(Token { c, .. }) if c == '-' as u32 => {
                                token = Token { c, escaped: true };
                            }
                            _ => {
                                self.cursor.reset(backup);
                                continue;
                            }
                        }
                    }
                } else if !token.escaped {
                    if let Some(m) = self.cursor.symbols().and_then(|s| s.lookup_matcher(token.c)) {
                        nested = Some(Nested::Variable(m));
                    }
                }
            }

            if let Some(nested) = nested {
                if let Last::Char(c) = last {
                    if op.is_some() {
                        return Err(self.cursor.error("Character expected after operator"));
                    }
                    set.add(c)?;
                    writer::push_char(&mut local, c, false);
                }
                if let Some(op) = op {
                    local.push(op);
                }
                let nested = match nested {
                    Nested::Bracket => self.compile(&mut local, depth + 1)?,
                    Nested::Property => {
                        self.cursor.skip_ignored();
                        self.property(&mut local)?
                    }
                    Nested::Variable(m) => {
                        local.push_str(&m.to_pattern(false));
                        m.clone_as_thawed()
                    }
                };
                keep_local = true;
                if mode == Mode::Start {
                    set = nested;
                    mode = Mode::Done;
                    break;
                }
                match op {
                    Some('-') => set.remove_all(&nested)?,
                    Some('&') => set.retain_all(&nested)?,
                    _ => set.add_all(&nested)?,
                };
                op = None;
                last = Last::Set;
                last_string = None;
                continue;
            }

            if mode == Mode::Start {
                return Err(self.cursor.error("Missing '['"));
            }

            let c = token.c;
            if !token.escaped {
                match char::from_u32(c) {
                    Some(']') => {
                        if let Last::Char(last) = last {
                            set.add(last)?;
                            writer::push_char(&mut local, last, false);
                        }
                        match op {
                            Some('-') => {
                                set.add('-')?;
                                local.push('-');
                            }
                            Some(_) => return Err(self.cursor.error("Trailing '&'")),
                            None => {}
                        }
                        local.push(']');
                        mode = Mode::Done;
                        continue;
                    }
                    Some('-') => {
                        if op.is_none() {
                            if last != Last::Nothing || last_string.is_some() {
                                op = Some('-');
                                continue;
                            }
                            // A '-' that cannot be an operator is literal only before ']'.
                            set.add('-')?;
                            let next = self.cursor.next()?;
                            if next == Some(Token { c: ']' as u32, escaped: false }) {
                                local.push_str("-]");
                                mode = Mode::Done;
                                continue;
                            }
                        }
                        return Err(self.cursor.error("'-' not after a character, string or set"));
                    }
                    Some('&') => {
                        if last == Last::Set && op.is_none() {
                            op = Some('&');
                            continue;
                        }
                        return Err(self.cursor.error("'&' not after a set"));
                    }
                    Some('^') => return Err(self.cursor.error("'^' not after '['")),
                    Some('{') => {
                        if op == Some('&') {
                            return Err(self.cursor.error("Missing operand after operator"));
                        }
                        if let Last::Char(last) = last {
                            set.add(last)?;
                            writer::push_char(&mut local, last, false);
                        }
                        last = Last::Nothing;
                        let s = self.string()?;
                        if op == Some('-') {
                            let Some(start) = last_string.take() else {
                                return Err(self.cursor.error("Missing operand before '-'"));
                            };
                            self.string_range(&mut set, &start, &s)?;
                            local.push('-');
                            op = None;
                        } else {
                            set.add_str(&s)?;
                            last_string = Some(s.clone());
                        }
                        local.push('{');
                        writer::push_str(&mut local, &s, false);
                        local.push('}');
                        continue;
                    }
                    Some(VARIABLE) => {
                        let backup = self.cursor.mark();
                        let next = self.cursor.next()?;
                        let anchor = next == Some(Token { c: ']' as u32, escaped: false });
                        if !anchor && self.cursor.symbols().is_none() {
                            // A literal '$'.
                            self.cursor.reset(backup);
                        } else if anchor && op.is_none() {
                            if let Last::Char(last) = last {
                                set.add(last)?;
                                writer::push_char(&mut local, last, false);
                            }
                            set.add(ANCHOR)?;
                            keep_local = true;
                            local.push_str("$]");
                            mode = Mode::Done;
                            continue;
                        } else {
                            return Err(self.cursor.error("Unquoted '$'"));
                        }
                    }
                    _ => {}
                }
            }

            match last {
                Last::Nothing => {
                    if op == Some('-') && last_string.is_some() {
                        return Err(self.cursor.error("Invalid range"));
                    }
                    last = Last::Char(c);
                    last_string = None;
                }
                Last::Char(start) if op == Some('-') => {
                    if start >= c {
                        return Err(self
                            .cursor
                            .locate(Error::new(ErrorKind::InvalidRange { start, end: c })));
                    }
                    set.add_range(start, c)?;
                    writer::push_char(&mut local, start, false);
                    local.push('-');
                    writer::push_char(&mut local, c, false);
                    last = Last::Nothing;
                    op = None;
                }
                Last::Char(previous) => {
                    set.add(previous)?;
                    writer::push_char(&mut local, previous, false);
                    last = Last::Char(c);
                }
                Last::Set => {
                    if op.is_some() {
                        return Err(self.cursor.error("Set expected after operator"));
                    }
                    last = Last::Char(c);
                }
            }
        }

        if mode != Mode::Done {
            return Err(self.cursor.error("Missing ']'"));
        }
        self.cursor.skip_ignored();

        let closes = self.config.case_insensitive || self.config.add_case_mappings;
        if closes {
            let mapper = self.config.case_mapper.clone().unwrap_or_else(default_case_mapper);
            if self.config.case_insensitive {
                set.close_over_with(CloseOver::Case, mapper.as_ref())?;
            }
            if self.config.add_case_mappings {
                set.close_over_with(CloseOver::AddCaseMappings, mapper.as_ref())?;
            }
        }
        if invert {
            set.complement()?.remove_all_strings()?;
        }

        if keep_local && !closes {
            rebuilt.push_str(&local);
        } else {
            rebuilt.push_str(&writer::generate(set.code_points(), set.string_set(), false));
        }
        Ok(set)
    }

    /// Reads the rest of a `{...}` string after the opening brace.
    fn string(&mut self) -> Result<String> {
        let mut s = String::new();
        while let Some(t) = self.cursor.next()? {
            if t.c == '}' as u32 && !t.escaped {
                if s.is_empty() {
                    return Err(self.cursor.error("Empty string"));
                }
                return Ok(s);
            }
            match char::from_u32(t.c) {
                Some(c) => s.push(c),
                None => return Err(self.cursor.error("Invalid multicharacter string")),
            }
        }
        Err(self.cursor.error("Invalid multicharacter string"))
    }

    /// Adds the members of the string range `{start}-{end}`.
    fn string_range(&mut self, set: &mut UnicodeSet, start: &str, end: &str) -> Result<()> {
        if let (Some(first), Some(last)) = (single_code_point(start), single_code_point(end)) {
            if first > last {
                return Err(self.cursor.error("Invalid string range"));
            }
            set.add_range(first, last)?;
            return Ok(());
        }
        let expanded = match &self.config.string_ranges {
            Some(expander) => expander.expand(start, end),
            None => LexicographicRange::default().expand(start, end),
        };
        for s in expanded.map_err(|e| self.cursor.locate(e))? {
            set.add_str(&s)?;
        }
        Ok(())
    }

    /// Checks whether a property pattern starts at the cursor.
    fn resembles_property(&mut self) -> bool {
        let mark = self.cursor.mark();
        let ignore_space = self.config.ignore_space;
        let first = self.cursor.read(false, ignore_space).ok().flatten();
        let resembles = match first.and_then(|t| char::from_u32(t.c)) {
            Some('[') => {
                let second = self.cursor.read(false, false).ok().flatten();
                second.map(|t| t.c) == Some(':' as u32)
            }
            Some('\\') => {
                let second = self.cursor.read(false, false).ok().flatten();
                matches!(second.and_then(|t| char::from_u32(t.c)), Some('N' | 'p' | 'P'))
            }
            _ => false,
        };
        self.cursor.reset(mark);
        resembles
    }

    /// Compiles the property pattern at the cursor and appends it to
    /// `rebuilt` in canonical form: runs of white space inside the name and
    /// value collapse to a single space and `≠` is written as a negation.
    fn property(&mut self, rebuilt: &mut String) -> Result<UnicodeSet> {
        self.cursor.expand_variable()?;
        let rest = self.cursor.rest();
        let skip_space = |mut i: usize| {
            while rest.get(i).is_some_and(|&c| is_pattern_white_space(c as u32)) {
                i += 1;
            }
            i
        };
        let posix = rest.starts_with(&['[', ':']);
        let is_name = !posix && rest.get(1) == Some(&'N');
        let mut invert = !posix && rest.get(1) == Some(&'P');
        let mut i = skip_space(2);
        if posix {
            if rest.get(i) == Some(&'^') {
                invert = true;
                i += 1;
            }
        } else {
            if rest.get(i) != Some(&'{') {
                return Err(self.cursor.error("Invalid property pattern"));
            }
            i += 1;
        }
        let close = if posix {
            rest[i..].windows(2).position(|w| w == [':', ']'])
        } else {
            rest[i..].iter().position(|&c| c == '}')
        };
        let Some(close) = close.map(|n| i + n) else {
            return Err(self.cursor.error("Invalid property pattern"));
        };
        let body = &rest[i..close];
        let (name, value) = match body.iter().position(|&c| c == '=' || c == '\u{2260}') {
            Some(eq) if !is_name => {
                if body[eq] == '\u{2260}' {
                    invert = !invert;
                }
                (squeeze(&body[..eq]), squeeze(&body[eq + 1..]))
            }
            _ if is_name => ("na".to_string(), squeeze(body)),
            _ => (squeeze(body), String::new()),
        };
        let len = close + if posix { 2 } else { 1 };
        let text = if is_name {
            format!("\\N{{{}}}", value)
        } else {
            let clause = if value.is_empty() { name.clone() } else { format!("{}={}", name, value) };
            match (posix, invert) {
                (true, false) => format!("[:{}:]", clause),
                (true, true) => format!("[:^{}:]", clause),
                (false, false) => format!("\\p{{{}}}", clause),
                (false, true) => format!("\\P{{{}}}", clause),
            }
        };

        let lookup = match self.lookup.take() {
            Some(lookup) => lookup,
            None => match &self.config.resolver {
                Some(resolver) => Lookup::custom(resolver.clone()),
                None => Lookup::default_lookup().map_err(|e| self.cursor.locate(e))?,
            },
        };
        let list = lookup.alias_set(&name, &value);
        self.lookup = Some(lookup);
        let list = list.map_err(|e| self.cursor.locate(e))?;
        self.cursor.advance(len);

        let mut set = UnicodeSet::from_parts(list, StringSet::new(), None);
        if invert {
            set.complement()?;
        }
        rebuilt.push_str(&text);
        Ok(set)
    }
}

/// Trims `text` and collapses each run of white space in it to one space.
fn squeeze(text: &[char]) -> String {
    let text: String = text.iter().collect();
    let words: Vec<&str> = text
        .split(|c: char| is_pattern_white_space(c as u32))
        .filter(|w| !w.is_empty())
        .collect();
    words.join(" ")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        props::tests::TestResolver,
        symbols::Variables,
        SpanCondition, MAX_CODE_POINT,
    };

    fn parse(pattern: &str) -> UnicodeSet {
        UnicodeSet::parse(pattern).unwrap()
    }

    fn test_parser() -> Parser {
        PatternBuilder::new()
            .resolver(Arc::new(TestResolver))
            .build()
    }

    fn ranges(set: &UnicodeSet) -> Vec<(char, char)> {
        set.ranges()
            .map(|r| {
                (
                    char::from_u32(r.start()).unwrap(),
                    char::from_u32(r.end()).unwrap(),
                )
            })
            .collect()
    }

    fn syntax_error(pattern: &str) -> Error {
        let err = UnicodeSet::parse(pattern).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::PatternSyntax(_)),
            "{}: {:?}",
            pattern,
            err
        );
        err
    }

    #[test]
    fn test_chars_and_ranges() {
        assert_eq!(ranges(&parse("[abc]")), vec![('a', 'c')]);
        assert_eq!(ranges(&parse("[a-cx-z]")), vec![('a', 'c'), ('x', 'z')]);
        assert_eq!(ranges(&parse("[ a - c ]")), vec![('a', 'c')]);
        assert_eq!(ranges(&parse("[]")), vec![]);
        assert_eq!(ranges(&parse(r"[a-\x{63}]")), vec![('a', 'c')]);
        assert_eq!(ranges(&parse(r"[\[\]\-]")), vec![('-', '-'), ('[', '['), (']', ']')]);
    }

    #[test]
    fn test_literal_dash() {
        assert_eq!(ranges(&parse("[-a]")), vec![('-', '-'), ('a', 'a')]);
        assert_eq!(ranges(&parse("[a-]")), vec![('-', '-'), ('a', 'a')]);
        assert_eq!(ranges(&parse("[^-a]")).len(), 3);
        assert_eq!(ranges(&parse("[a-c-]")), vec![('-', '-'), ('a', 'c')]);
        syntax_error("[a-c-e]");
    }

    #[test]
    fn test_invalid_ranges() {
        let err = UnicodeSet::parse("[z-a]").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidRange {
                start: 'z' as u32,
                end: 'a' as u32
            }
        );
        assert_eq!(err.position(), Some(4));
        assert!(err.is_input_error());
        assert!(!err.is_programming_error());
        let err = UnicodeSet::parse("[a-a]").unwrap_err();
        assert!(err.is_input_error());
        let err = UnicodeSet::parse(r"[\u0061-\u0030]").unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_negation() {
        let set = parse("[^a-z]");
        assert_eq!(set.range_count(), 2);
        assert!(set.contains(0u32));
        assert!(set.contains(MAX_CODE_POINT));
        assert!(!set.contains('m'));
        // Negation drops strings.
        let set = parse("[^a{bc}]");
        assert!(!set.has_strings());
        assert!(!set.contains('a'));
        assert_eq!(parse("[^]"), UnicodeSet::all_code_points());
    }

    #[test]
    fn test_operators() {
        assert_eq!(parse("[[a-z]-[aeiou]]"), parse("[b-df-hj-np-tv-z]"));
        assert_eq!(parse("[[a-z]&[x-zA-Z]]"), parse("[xyz]"));
        assert_eq!(parse("[[a-c][x-z]]"), parse("[a-cx-z]"));
        // Left to right with equal precedence.
        assert_eq!(parse("[[a-z]-[a-m]&[k-p]]"), parse("[n-p]"));
        assert_eq!(parse("[a[x]]"), parse("[ax]"));
        assert_eq!(parse("[[a-c]d-f]"), parse("[a-f]"));
    }

    #[test]
    fn test_operator_errors() {
        syntax_error("[a&[b]]");
        syntax_error("[[a]&]");
        syntax_error("[[a]-b]");
        syntax_error("[[a]&b]");
        syntax_error("[a^]");
        syntax_error("[a-[b]]");
    }

    #[test]
    fn test_strings() {
        let set = parse("[a{bc}{cd}]");
        assert_eq!(set.strings().collect::<Vec<_>>(), vec!["bc", "cd"]);
        assert_eq!(set.range_count(), 1);
        // A single code point string is a code point.
        assert_eq!(parse("[{x}]"), parse("[x]"));
        assert_eq!(parse(r"[{a\}b}]").strings().collect::<Vec<_>>(), vec!["a}b"]);
        syntax_error("[{}]");
        syntax_error("[{ab]");
    }

    #[test]
    fn test_string_ranges() {
        let set = parse("[{ax}-{by}]");
        assert_eq!(set.strings().collect::<Vec<_>>(), vec!["ax", "ay", "bx", "by"]);
        assert_eq!(parse("[{a}-{c}]"), parse("[a-c]"));
        syntax_error("[{ab}-c]");
        syntax_error("[{b}-{a}]");
        syntax_error("[{ab}-{c}]");
        let set = PatternBuilder::new()
            .string_ranges(LexicographicRange {
                require_same_length: false,
            })
            .build()
            .parse("[{abx}-{z}]")
            .unwrap();
        assert_eq!(set.strings().collect::<Vec<_>>(), vec!["abx", "aby", "abz"]);
    }

    #[test]
    fn test_anchor_and_dollar() {
        assert_eq!(parse("[a$]"), parse(r"[a\uFFFF]"));
        assert_eq!(parse("[a$]").to_pattern(false), "[a$]");
        assert_eq!(parse("[$a]"), parse(r"[\$a]"));
        let with_symbols = PatternBuilder::new().symbols(Variables::new()).build();
        assert!(with_symbols.parse("[$.]").is_err());
        assert!(with_symbols.parse("[a$]").unwrap().contains(ANCHOR));
    }

    #[test]
    fn test_variables() {
        let mut vars = Variables::new();
        vars.define("range", "a-c")
            .define("prop", "[:L:]")
            .define_set("greek", parse("[α-ω]"));
        let parser = PatternBuilder::new()
            .symbols(vars)
            .resolver(Arc::new(TestResolver))
            .build();
        assert_eq!(parser.parse("[$range x]").unwrap(), parse("[a-cx]"));
        assert_eq!(parser.parse("[$greek-[β]]").unwrap(), parse("[αγ-ω]"));
        assert_eq!(parser.parse("$greek").unwrap(), parse("[α-ω]"));
        assert_eq!(parser.parse("[$prop]").unwrap(), parse("[A-Za-z]"));
        assert_eq!(parser.parse("$prop").unwrap(), parse("[A-Za-z]"));
        let err = parser.parse("[$undefined]").unwrap_err();
        assert_eq!(err.position(), Some(1));
    }

    #[test]
    fn test_properties() {
        let p = test_parser();
        assert_eq!(p.parse("[:L:]").unwrap(), parse("[A-Za-z]"));
        assert_eq!(p.parse(r"\p{L}").unwrap(), parse("[A-Za-z]"));
        assert_eq!(p.parse(r"\P{L}").unwrap(), parse("[^A-Za-z]"));
        assert_eq!(p.parse("[:^L:]").unwrap(), parse("[^A-Za-z]"));
        assert_eq!(p.parse(r"\p{gc≠L}").unwrap(), parse("[^A-Za-z]"));
        assert_eq!(p.parse("[[:L:]-[a-z]]").unwrap(), parse("[A-Z]"));
        assert_eq!(p.parse("[[:gc = Nd:]]").unwrap(), parse("[0-9]"));
        assert_eq!(p.parse("[:ccc=230:]").unwrap(), parse(r"[\u0300-\u0314]"));
        assert_eq!(p.parse(r"\p{nv=7}").unwrap(), parse("[7]"));
        assert_eq!(p.parse(r"[\N{SNOWMAN}a]").unwrap(), parse(r"[☃a]"));
        assert_eq!(p.parse(r"[\p{ L } ]").unwrap().to_pattern(false), r"[\p{L}]");
    }

    #[test]
    fn test_rebuilt_property_clauses() {
        let p = test_parser();
        let cases = [
            ("[[:gc≠L:]]", "[[:^gc=L:]]"),
            ("[\\p{gc\t=\tL}]", r"[\p{gc=L}]"),
            (r"[\P{ gc  ≠ Nd }é]", r"[\p{gc=Nd}\u00E9]"),
            (r"[\N{ SNOWMAN }]", r"[\N{SNOWMAN}]"),
            ("[[:^L:]-[:ccc=230:]]", "[[:^L:]-[:ccc=230:]]"),
        ];
        for (pattern, rebuilt) in cases {
            let set = p.parse(pattern).unwrap();
            assert_eq!(set.to_pattern(true), rebuilt, "{}", pattern);
            assert_eq!(p.parse(&set.to_pattern(true)).unwrap(), set, "{}", pattern);
            assert_eq!(p.parse(&set.to_pattern(false)).unwrap(), set, "{}", pattern);
        }
    }

    #[test]
    fn test_property_errors() {
        let p = test_parser();
        let err = p.parse("[[:Bogus:]]").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::UnknownProperty { .. }));
        assert!(err.is_input_error());
        assert_eq!(err.position(), Some(1));
        assert!(p.parse(r"\p{L").is_err());
        assert!(p.parse(r"\pL").is_err());
        assert!(p.parse("[:L").is_err());
    }

    #[test]
    fn test_structure_errors() {
        let err = syntax_error("[abc");
        assert_eq!(err.position(), Some(4));
        syntax_error("abc");
        syntax_error("");
        syntax_error("[a] b");
        syntax_error(r"[\u12]");
        assert!(UnicodeSet::parse("[a] ").is_ok());
        assert!(PatternBuilder::new().ignore_space(false).build().parse("[a] ").is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}a{}", "[".repeat(MAX_DEPTH + 2), "]".repeat(MAX_DEPTH + 2));
        syntax_error(&deep);
        let ok = format!("{}a{}", "[".repeat(50), "]".repeat(50));
        assert_eq!(parse(&ok), parse("[a]"));
    }

    #[test]
    fn test_ignore_space() {
        let p = PatternBuilder::new().ignore_space(false).build();
        assert_eq!(p.parse("[a b]").unwrap(), parse(r"[ab\ ]"));
        assert_eq!(parse("[a b]"), parse("[ab]"));
    }

    #[test]
    fn test_case_insensitive() {
        let p = PatternBuilder::new().case_insensitive(true).build();
        let set = p.parse("[^a-c]").unwrap();
        assert!(!set.contains('B'));
        assert!(set.contains('d'));
        let set = p.parse("[ß]").unwrap();
        assert!(set.contains_str("ss"));
        assert!(set.contains('\u{1E9E}'));
        // The rebuilt pattern reflects the closure.
        assert_eq!(UnicodeSet::parse(&p.parse("[[a]]").unwrap().to_pattern(false)).unwrap(), parse("[aA]"));
    }

    #[test]
    fn test_add_case_mappings() {
        let p = PatternBuilder::new().add_case_mappings(true).build();
        let set = p.parse("[ß]").unwrap();
        assert!(set.contains('ß'));
        assert!(set.contains_str("SS"));
        assert!(set.contains_str("Ss"));
        assert!(!set.contains('\u{1E9E}'));
    }

    #[test]
    fn test_rebuilt_pattern() {
        assert_eq!(parse("[ c b a ]").to_pattern(false), "[a-c]");
        assert_eq!(parse("[[a-c] - [b]]").to_pattern(false), "[[a-c]-[b]]");
        assert_eq!(parse("[[a]{xy}-{xz}]").to_pattern(false), "[[a]{xy}-{xz}]");
        assert_eq!(parse(r"[[\u0000] \n]").to_pattern(false), r"[[\u0000]\u000A]");
        assert_eq!(parse("[[é]]").to_pattern(true), r"[[\u00E9]]");
    }

    #[test]
    fn test_spans_after_parse() {
        let set = parse("[a-z{ch}]");
        assert_eq!(set.span("chart!", 0, SpanCondition::Contained), 5);
        assert_eq!(set.span_back("!chart", 6, SpanCondition::Contained), 1);
    }

    #[cfg(feature = "ucd")]
    #[test]
    fn test_default_resolver() {
        let greek = parse(r"\p{Greek}");
        assert!(greek.contains('α'));
        assert!(parse("[:Lu:]").contains('A'));
        assert!(parse("[:ASCII:]").contains('\u{7F}'));
        assert!(parse("[[:Any:]-[:Assigned:]]").contains(0x378u32));
        assert!(parse(r"[\p{Alphabetic}]").contains('ä'));
        assert!(parse("[:Script=Latin:]").contains('q'));
    }

    #[test]
    fn test_debug() {
        let b = PatternBuilder::new();
        assert!(format!("{:?}", b).starts_with("PatternBuilder { ignore_space: true"));
    }
}
