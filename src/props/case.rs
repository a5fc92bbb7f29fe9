//! Case mappings and case closure.
//!
//! A [`CaseMapper`] supplies full case mappings and case-insensitive closures
//! for [`UnicodeSet::close_over`](crate::UnicodeSet::close_over). The built-in
//! [`DefaultCaseMapper`] derives full mappings from the standard library and,
//! with the `ucd` feature, simple case folding equivalence classes from
//! `regex-syntax`.

use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use log::debug;
use smallvec::{smallvec, SmallVec};

use crate::set::Element;

/// The case closure of a single element.
pub type Closure = SmallVec<[Element; 4]>;

/// Full case mappings and closures in the root locale.
pub trait CaseMapper: Send + Sync {
    /// Full lowercase mapping of `c`.
    fn lower(&self, c: char) -> String;

    /// Full uppercase mapping of `c`.
    fn upper(&self, c: char) -> String;

    /// Full titlecase mapping of `c`.
    fn title(&self, c: char) -> String;

    /// Full case folding of `c`.
    fn fold(&self, c: char) -> String;

    fn lower_str(&self, s: &str) -> String {
        s.chars().map(|c| self.lower(c)).collect()
    }

    fn upper_str(&self, s: &str) -> String {
        s.chars().map(|c| self.upper(c)).collect()
    }

    /// Titlecases the first character and lowercases the rest.
    fn title_str(&self, s: &str) -> String {
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => {
                let mut title = self.title(first);
                title.extend(chars.map(|c| self.lower(c)));
                title
            }
            None => String::new(),
        }
    }

    fn fold_str(&self, s: &str) -> String {
        s.chars().map(|c| self.fold(c)).collect()
    }

    /// All code points and strings that are case-insensitively equal to `c`,
    /// not necessarily including `c` itself.
    fn case_closure(&self, c: char) -> Closure;

    /// All code points (with their closures) whose full case folding is the
    /// already folded string `s`. Returns `None` if there are none.
    fn string_case_closure(&self, s: &str) -> Option<Closure>;
}

/// The built-in case mapper.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCaseMapper;

/// Characters whose titlecase differs from their uppercase.
const DIGRAPHS: [(char, char); 4] = [
    ('\u{01C4}', '\u{01C5}'),
    ('\u{01C7}', '\u{01C8}'),
    ('\u{01CA}', '\u{01CB}'),
    ('\u{01F1}', '\u{01F2}'),
];

fn is_cherokee(c: char) -> bool {
    matches!(c, '\u{13A0}'..='\u{13F5}' | '\u{13F8}'..='\u{13FD}' | '\u{AB70}'..='\u{ABBF}')
}

/// Maps folded multi-character strings back to the BMP code points folding to them.
fn unfold_map() -> &'static HashMap<String, SmallVec<[char; 4]>> {
    static UNFOLD: OnceLock<HashMap<String, SmallVec<[char; 4]>>> = OnceLock::new();
    UNFOLD.get_or_init(|| {
        let mut map: HashMap<String, SmallVec<[char; 4]>> = HashMap::new();
        for c in (0..=0xFFFF).filter_map(char::from_u32) {
            let folded = DefaultCaseMapper.fold(c);
            if folded.chars().nth(1).is_some() {
                map.entry(folded).or_default().push(c);
            }
        }
        debug!("built case unfolding map: {} strings", map.len());
        map
    })
}

#[cfg(feature = "ucd")]
fn simple_closure(c: char) -> SmallVec<[char; 4]> {
    use regex_syntax::hir::{ClassUnicode, ClassUnicodeRange};

    let mut class = ClassUnicode::new([ClassUnicodeRange::new(c, c)]);
    if class.try_case_fold_simple().is_err() {
        return smallvec![c];
    }
    class
        .iter()
        .flat_map(|r| r.start()..=r.end())
        .collect()
}

#[cfg(not(feature = "ucd"))]
fn simple_closure(c: char) -> SmallVec<[char; 4]> {
    let mut chars: SmallVec<[char; 4]> = smallvec![c];
    for mapped in [c.to_lowercase().collect::<String>(), c.to_uppercase().collect()] {
        let mut it = mapped.chars();
        if let (Some(m), None) = (it.next(), it.next()) {
            if !chars.contains(&m) {
                chars.push(m);
            }
        }
    }
    chars
}

impl CaseMapper for DefaultCaseMapper {
    fn lower(&self, c: char) -> String {
        c.to_lowercase().collect()
    }

    fn upper(&self, c: char) -> String {
        c.to_uppercase().collect()
    }

    fn title(&self, c: char) -> String {
        for &(base, title) in &DIGRAPHS {
            let base = base as u32;
            if (base..base + 3).contains(&(c as u32)) {
                return title.to_string();
            }
        }
        let mut upper = c.to_uppercase();
        match upper.next() {
            Some(first) => {
                let mut title = first.to_string();
                title.extend(upper.flat_map(char::to_lowercase));
                title
            }
            None => c.to_string(),
        }
    }

    fn fold(&self, c: char) -> String {
        match c {
            '\u{0130}' => "i\u{0307}".to_string(),
            '\u{0131}' => c.to_string(),
            c if is_cherokee(c) => self.upper(c),
            c => self.lower_str(&self.upper_str(&self.lower(c))),
        }
    }

    fn case_closure(&self, c: char) -> Closure {
        let mut closure = Closure::new();
        for e in simple_closure(c) {
            if e != c {
                closure.push(Element::CodePoint(e as u32));
            }
            let folded = self.fold(e);
            if folded.chars().nth(1).is_some() {
                let folded = Element::String(folded);
                if !closure.contains(&folded) {
                    closure.push(folded);
                }
            }
        }
        closure
    }

    fn string_case_closure(&self, s: &str) -> Option<Closure> {
        let chars = unfold_map().get(s)?;
        let mut closure = Closure::new();
        for &c in chars {
            closure.push(Element::CodePoint(c as u32));
            for e in self.case_closure(c) {
                if !closure.contains(&e) {
                    closure.push(e);
                }
            }
        }
        Some(closure)
    }
}

static DEFAULT_CASE_MAPPER: RwLock<Option<Arc<dyn CaseMapper>>> = RwLock::new(None);

/// Returns the case mapper used when none is configured explicitly.
pub fn default_case_mapper() -> Arc<dyn CaseMapper> {
    DEFAULT_CASE_MAPPER
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .unwrap_or_else(|| Arc::new(DefaultCaseMapper))
}

/// Replaces the process-wide default case mapper. `None` restores [`DefaultCaseMapper`].
pub fn set_default_case_mapper(mapper: Option<Arc<dyn CaseMapper>>) {
    *DEFAULT_CASE_MAPPER
        .write()
        .unwrap_or_else(PoisonError::into_inner) = mapper;
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: DefaultCaseMapper = DefaultCaseMapper;

    #[test]
    fn test_mappings() {
        assert_eq!(M.lower('A'), "a");
        assert_eq!(M.upper('ß'), "SS");
        assert_eq!(M.title('ß'), "Ss");
        assert_eq!(M.title('\u{01C6}'), "\u{01C5}");
        assert_eq!(M.title('\u{01F1}'), "\u{01F2}");
        assert_eq!(M.title('a'), "A");
    }

    #[test]
    fn test_fold() {
        assert_eq!(M.fold('A'), "a");
        assert_eq!(M.fold('ß'), "ss");
        assert_eq!(M.fold('\u{1E9E}'), "ss");
        assert_eq!(M.fold('ς'), "σ");
        assert_eq!(M.fold('\u{212A}'), "k");
        assert_eq!(M.fold('\u{0130}'), "i\u{0307}");
        assert_eq!(M.fold('\u{0131}'), "\u{0131}");
        assert_eq!(M.fold('\u{AB70}'), "\u{13A0}");
        assert_eq!(M.fold_str("Straße"), "strasse");
    }

    #[test]
    fn test_title_str() {
        assert_eq!(M.title_str("hELLO"), "Hello");
        assert_eq!(M.title_str(""), "");
    }

    #[test]
    fn test_case_closure() {
        let closure = M.case_closure('a');
        assert!(closure.contains(&Element::CodePoint('A' as u32)));
        let closure = M.case_closure('ß');
        assert!(closure.contains(&Element::String("ss".into())));
    }

    #[cfg(feature = "ucd")]
    #[test]
    fn test_case_closure_simple_folding() {
        let closure = M.case_closure('k');
        assert!(closure.contains(&Element::CodePoint('K' as u32)));
        assert!(closure.contains(&Element::CodePoint(0x212A)));
    }

    #[test]
    fn test_default_case_mapper() {
        // Installs an equivalent mapper, so concurrently running tests are unaffected.
        set_default_case_mapper(Some(Arc::new(DefaultCaseMapper)));
        assert_eq!(default_case_mapper().fold('A'), "a");
        set_default_case_mapper(None);
        assert_eq!(default_case_mapper().upper('a'), "A");
    }

    #[test]
    fn test_string_case_closure() {
        let closure = M.string_case_closure("ss").unwrap();
        assert!(closure.contains(&Element::CodePoint('ß' as u32)));
        assert!(closure.contains(&Element::CodePoint(0x1E9E)));
        assert!(M.string_case_closure("xyz").is_none());
    }
}
