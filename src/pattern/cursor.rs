//! Reading pattern characters.
//!
//! The cursor walks over the characters of a pattern. It skips ignorable
//! white space, decodes backslash escapes and splices the text of variables
//! into the character stream. A variable's text is read to its end before
//! reading continues in the pattern; variable references inside variable
//! text are not expanded.

use std::rc::Rc;

use crate::{is_pattern_white_space, symbols::SymbolTable, unescape, Error, Result};

/// The marker of a variable reference.
pub(crate) const VARIABLE: char = '$';

/// A saved cursor position, see [`Cursor::mark`] and [`Cursor::reset`].
#[derive(Debug, Clone)]
pub(crate) struct Mark {
    pos: usize,
    splice: Option<(Rc<[char]>, usize)>,
}

/// A character read from the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) c: u32,
    /// The character was written as an escape and has no syntactic meaning.
    pub(crate) escaped: bool,
}

pub(crate) struct Cursor<'a> {
    text: Vec<char>,
    pos: usize,
    /// The text of the variable currently being read and the position in it.
    splice: Option<(Rc<[char]>, usize)>,
    symbols: Option<&'a dyn SymbolTable>,
    ignore_space: bool,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(pattern: &str, symbols: Option<&'a dyn SymbolTable>, ignore_space: bool) -> Self {
        Cursor {
            text: pattern.chars().collect(),
            pos: 0,
            splice: None,
            symbols,
            ignore_space,
        }
    }

    pub(crate) fn symbols(&self) -> Option<&'a dyn SymbolTable> {
        self.symbols
    }

    pub(crate) fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            splice: self.splice.clone(),
        }
    }

    pub(crate) fn reset(&mut self, mark: Mark) {
        self.pos = mark.pos;
        self.splice = mark.splice;
    }

    /// The unread characters of the current source: variable text or the pattern.
    pub(crate) fn rest(&self) -> &[char] {
        match &self.splice {
            Some((buf, p)) if *p < buf.len() => &buf[*p..],
            _ => &self.text[self.pos..],
        }
    }

    /// Returns `true` while unread variable text remains.
    pub(crate) fn in_variable(&self) -> bool {
        matches!(&self.splice, Some((buf, p)) if *p < buf.len())
    }

    /// Consumes `n` characters of the current source.
    pub(crate) fn advance(&mut self, n: usize) {
        if !self.in_variable() {
            self.splice = None;
            self.pos += n;
        } else if let Some((_, p)) = &mut self.splice {
            *p += n;
        }
    }

    pub(crate) fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    /// Skips ignorable white space, if white space is ignored.
    pub(crate) fn skip_ignored(&mut self) {
        if !self.ignore_space {
            return;
        }
        loop {
            match self.rest().first() {
                Some(&c) if is_pattern_white_space(c as u32) => self.advance(1),
                _ => return,
            }
        }
    }

    /// Expands the variable reference at the cursor, if there is one, so that
    /// [`Cursor::rest`] shows its text.
    pub(crate) fn expand_variable(&mut self) -> Result<()> {
        if self.in_variable() || self.text.get(self.pos) != Some(&VARIABLE) {
            return Ok(());
        }
        let Some(symbols) = self.symbols else {
            return Ok(());
        };
        let Some((name, end)) = symbols.parse_reference(&self.text, self.pos + 1) else {
            return Ok(());
        };
        let text = symbols
            .lookup(&name)
            .ok_or_else(|| self.error(format!("Undefined variable ${}", name)))?;
        self.pos = end;
        if !text.is_empty() {
            self.splice = Some((text.into(), 0));
        }
        Ok(())
    }

    /// Returns the next character, or `None` at the end of the pattern.
    pub(crate) fn next(&mut self) -> Result<Option<Token>> {
        self.read(true, self.ignore_space)
    }

    /// Returns the next character with variables expanded, optionally
    /// decoding escapes and skipping ignorable white space.
    pub(crate) fn read(&mut self, escapes: bool, skip_space: bool) -> Result<Option<Token>> {
        loop {
            let before = (self.pos, self.in_variable());
            self.expand_variable()?;
            if (self.pos, self.in_variable()) != before && !self.in_variable() {
                // An empty variable.
                continue;
            }
            let Some(&c) = self.rest().first() else {
                return Ok(None);
            };
            self.advance(1);
            if skip_space && is_pattern_white_space(c as u32) {
                continue;
            }
            if escapes && c == '\\' {
                let (code, len) = unescape(self.rest()).ok_or_else(|| self.error("Invalid escape"))?;
                self.advance(len);
                return Ok(Some(Token {
                    c: code,
                    escaped: true,
                }));
            }
            return Ok(Some(Token {
                c: c as u32,
                escaped: false,
            }));
        }
    }

    /// Attaches the current position to `err`.
    pub(crate) fn locate(&self, err: Error) -> Error {
        const CONTEXT: usize = 16;
        let start = self.pos.saturating_sub(CONTEXT);
        let end = (self.pos + CONTEXT).min(self.text.len());
        let fragment: String = self.text[start..end].iter().collect();
        err.at(self.pos, fragment)
    }

    /// A syntax error at the current position.
    pub(crate) fn error(&self, message: impl Into<String>) -> Error {
        self.locate(Error::syntax(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{symbols::Variables, ErrorKind};

    fn tokens(cursor: &mut Cursor) -> Vec<(char, bool)> {
        let mut out = Vec::new();
        while let Some(t) = cursor.next().unwrap() {
            out.push((char::from_u32(t.c).unwrap(), t.escaped));
        }
        out
    }

    #[test]
    fn test_space_and_escapes() {
        let mut cursor = Cursor::new(r"a b\ c\]", None, true);
        assert_eq!(
            tokens(&mut cursor),
            vec![('a', false), ('b', false), (' ', true), ('c', true), (']', true)]
        );
        let mut cursor = Cursor::new("a b", None, false);
        assert_eq!(tokens(&mut cursor), vec![('a', false), (' ', false), ('b', false)]);
    }

    #[test]
    fn test_invalid_escape() {
        let mut cursor = Cursor::new(r"ab\u12", None, true);
        cursor.next().unwrap();
        cursor.next().unwrap();
        let err = cursor.next().unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::PatternSyntax(_)));
        assert_eq!(err.position(), Some(3));
        assert_eq!(err.fragment(), Some(r"ab\u12"));
    }

    #[test]
    fn test_variables() {
        let mut vars = Variables::new();
        vars.define("v", "x$y").define("empty", "");
        let mut cursor = Cursor::new("a$v$empty$", Some(&vars), true);
        assert_eq!(
            tokens(&mut cursor),
            vec![('a', false), ('x', false), ('$', false), ('y', false), ('$', false)]
        );
        let mut cursor = Cursor::new("$w", Some(&vars), true);
        assert!(cursor.next().is_err());
        let mut cursor = Cursor::new("$v", None, true);
        assert_eq!(tokens(&mut cursor), vec![('$', false), ('v', false)]);
    }

    #[test]
    fn test_mark_reset_inside_variable() {
        let mut vars = Variables::new();
        vars.define("v", "xy");
        let mut cursor = Cursor::new("$vz", Some(&vars), true);
        assert_eq!(cursor.next().unwrap().map(|t| t.c), Some('x' as u32));
        let mark = cursor.mark();
        assert_eq!(cursor.next().unwrap().map(|t| t.c), Some('y' as u32));
        assert_eq!(cursor.next().unwrap().map(|t| t.c), Some('z' as u32));
        cursor.reset(mark);
        assert_eq!(cursor.next().unwrap().map(|t| t.c), Some('y' as u32));
    }
}
