//! Closing a set over case mappings.

use crate::{
    inversion::InversionList, props::case::CaseMapper, set::Element, single_code_point,
    strings::StringSet,
};

/// Which case relation [`UnicodeSet::close_over`](crate::UnicodeSet::close_over) applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseOver {
    /// Replace the set by everything that is case-insensitively equal to one
    /// of its members. Strings are replaced by their case folding unless
    /// code points fold to them.
    Case,
    /// Add the full lowercase, titlecase, uppercase and case folding of every
    /// member. Existing members are kept.
    AddCaseMappings,
}

/// Adds `s` as a code point if it is one, or as a string otherwise.
fn insert(list: &mut InversionList, strings: &mut StringSet, s: &str) {
    match single_code_point(s) {
        // Code points of a &str are always valid.
        Some(c) => {
            let _ = list.add(c);
        }
        None => {
            // Empty strings are not members.
            let _ = strings.insert(s);
        }
    }
}

fn insert_element(list: &mut InversionList, strings: &mut StringSet, e: Element) {
    match e {
        Element::CodePoint(c) => {
            let _ = list.add(c);
        }
        Element::String(s) => insert(list, strings, &s),
    }
}

/// Computes the closure of the set given by `list` and `strings`.
pub(crate) fn close_over(
    list: &InversionList,
    strings: &StringSet,
    attribute: CloseOver,
    mapper: &dyn CaseMapper,
) -> (InversionList, StringSet) {
    let mut closed = list.clone();
    let code_points = list.iter().filter_map(char::from_u32);
    match attribute {
        CloseOver::Case => {
            let mut folded = StringSet::new();
            for c in code_points {
                for e in mapper.case_closure(c) {
                    insert_element(&mut closed, &mut folded, e);
                }
            }
            for s in strings {
                let fold = mapper.fold_str(s);
                match mapper.string_case_closure(&fold) {
                    Some(closure) => {
                        for e in closure {
                            insert_element(&mut closed, &mut folded, e);
                        }
                    }
                    None => insert(&mut closed, &mut folded, &fold),
                }
            }
            (closed, folded)
        }
        CloseOver::AddCaseMappings => {
            let mut mapped = strings.clone();
            for c in code_points {
                for m in [mapper.lower(c), mapper.title(c), mapper.upper(c), mapper.fold(c)] {
                    insert(&mut closed, &mut mapped, &m);
                }
            }
            for s in strings {
                for m in [
                    mapper.lower_str(s),
                    mapper.title_str(s),
                    mapper.upper_str(s),
                    mapper.fold_str(s),
                ] {
                    insert(&mut closed, &mut mapped, &m);
                }
            }
            (closed, mapped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::case::DefaultCaseMapper;

    fn close(list: &[(char, char)], strings: &[&str], attribute: CloseOver) -> (InversionList, StringSet) {
        let list: InversionList = list
            .iter()
            .map(|&(a, b)| crate::CodePointRange::new(a, b))
            .collect();
        let strings: StringSet = strings.iter().copied().collect();
        close_over(&list, &strings, attribute, &DefaultCaseMapper)
    }

    #[test]
    fn test_case() {
        let (list, strings) = close(&[('a', 'b')], &[], CloseOver::Case);
        for c in ['a', 'b', 'A', 'B'] {
            assert!(list.contains(c));
        }
        assert!(strings.is_empty());
    }

    #[test]
    fn test_case_sharp_s() {
        let (list, strings) = close(&[('ß', 'ß')], &[], CloseOver::Case);
        assert!(list.contains('ß'));
        assert!(list.contains('\u{1E9E}'));
        assert!(strings.contains("ss"));
    }

    #[test]
    fn test_case_strings() {
        // "SS" folds to "ss", which ß folds to.
        let (list, strings) = close(&[], &["SS"], CloseOver::Case);
        assert!(list.contains('ß'));
        assert!(strings.contains("ss"));
        assert!(!strings.contains("SS"));

        // Strings no code point folds to are replaced by their folding.
        let (list, strings) = close(&[], &["ABC"], CloseOver::Case);
        assert!(list.is_empty());
        assert_eq!(strings.iter().collect::<Vec<_>>(), vec!["abc"]);
    }

    #[test]
    fn test_add_case_mappings() {
        let (list, strings) = close(&[('a', 'a'), ('ß', 'ß')], &["xY"], CloseOver::AddCaseMappings);
        assert!(list.contains('a'));
        assert!(list.contains('A'));
        assert!(!list.contains('\u{1E9E}'));
        assert_eq!(
            strings.iter().collect::<Vec<_>>(),
            vec!["SS", "Ss", "XY", "Xy", "ss", "xY", "xy"]
        );
    }
}
