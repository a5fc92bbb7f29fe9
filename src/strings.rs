//! The multi-character members of a set.

use std::collections::BTreeSet;

use itertools::{EitherOrBoth, Itertools};

use crate::{inversion::algebra::Op, Error, Result};

/// A sorted set of non-empty strings, each treated as one indivisible member.
///
/// Strings are ordered by code point (the `Ord` of [`String`]), which is the
/// order used to enumerate members and to write patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StringSet {
    strings: BTreeSet<String>,
}

impl StringSet {
    /// Creates an empty set of strings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn contains(&self, s: &str) -> bool {
        self.strings.contains(s)
    }

    /// Inserts a string. Returns `true` if it was not present before.
    ///
    /// The empty string is never a member and is rejected with
    /// [`ErrorKind::InvalidMember`](crate::ErrorKind::InvalidMember).
    ///
    /// # Example
    /// ```
    /// use uniset::StringSet;
    ///
    /// let mut strings = StringSet::new();
    /// assert_eq!(strings.insert("ch"), Ok(true));
    /// assert_eq!(strings.insert("ch"), Ok(false));
    /// assert!(strings.insert("").is_err());
    /// ```
    pub fn insert(&mut self, s: impl Into<String>) -> Result<bool> {
        let s = s.into();
        if s.is_empty() {
            return Err(Error::invalid_member());
        }
        Ok(self.strings.insert(s))
    }

    /// Removes a string. Returns `true` if it was present.
    pub fn remove(&mut self, s: &str) -> bool {
        self.strings.remove(s)
    }

    /// Removes all strings.
    pub fn clear(&mut self) {
        self.strings.clear();
    }

    /// Keeps only the strings for which `f` returns `true`.
    pub fn retain(&mut self, f: impl FnMut(&String) -> bool) {
        self.strings.retain(f);
    }

    /// Iterates over the strings in ascending order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.strings.iter().map(String::as_str)
    }

    /// Combines two sets under `op` with a single merge pass over both sorted sequences.
    ///
    /// # Example
    /// ```
    /// use uniset::StringSet;
    /// use uniset::inversion::algebra::Op;
    ///
    /// let a: StringSet = ["ab", "cd"].into_iter().collect();
    /// let b: StringSet = ["cd", "ef"].into_iter().collect();
    /// let x = a.combine(&b, Op::SymmetricDifference);
    /// assert_eq!(x.iter().collect::<Vec<_>>(), vec!["ab", "ef"]);
    /// ```
    pub fn combine(&self, other: &Self, op: Op) -> Self {
        let strings = self
            .strings
            .iter()
            .merge_join_by(other.strings.iter(), |a, b| a.cmp(b))
            .filter_map(|e| {
                let (left, right, s) = match e {
                    EitherOrBoth::Left(s) => (true, false, s),
                    EitherOrBoth::Right(s) => (false, true, s),
                    EitherOrBoth::Both(s, _) => (true, true, s),
                };
                op.apply(left, right).then(|| s.clone())
            })
            .collect();
        StringSet { strings }
    }

    /// Applies `op` in place, with this set as the left operand.
    pub fn combine_with(&mut self, other: &Self, op: Op) {
        match op {
            // Cheaper than rebuilding when the right operand is small.
            Op::Union => self.strings.extend(other.strings.iter().cloned()),
            Op::Difference => {
                for s in &other.strings {
                    self.strings.remove(s);
                }
            }
            _ => *self = self.combine(other, op),
        }
    }

    pub fn union(&self, other: &Self) -> Self {
        self.combine(other, Op::Union)
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.combine(other, Op::Intersection)
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.combine(other, Op::Difference)
    }

    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.combine(other, Op::SymmetricDifference)
    }

    /// Check if every string of `other` is in this set.
    pub fn contains_all(&self, other: &Self) -> bool {
        other.strings.is_subset(&self.strings)
    }

    /// Check if the two sets share no string.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        self.strings.is_disjoint(&other.strings)
    }

    pub(crate) fn heap_size(&self) -> usize {
        self.strings
            .iter()
            .map(|s| s.capacity() + std::mem::size_of::<String>())
            .sum()
    }
}

impl<S: Into<String>> FromIterator<S> for StringSet {
    /// Collects the non-empty strings of the iterator. Empty strings are skipped.
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let strings = iter
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| !s.is_empty())
            .collect();
        StringSet { strings }
    }
}

impl<'a> IntoIterator for &'a StringSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.strings.iter()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::ErrorKind;

    fn set(strings: &[&str]) -> StringSet {
        strings.iter().copied().collect()
    }

    #[test]
    fn test_insert_empty_is_rejected() {
        let mut strings = StringSet::new();
        assert_eq!(
            strings.insert("").map_err(|e| e.kind().clone()),
            Err(ErrorKind::InvalidMember)
        );
        assert!(strings.is_empty());
    }

    #[test]
    fn test_ordered_enumeration() {
        let strings = set(&["cd", "ab", "b\u{10000}", "b\u{FFFF}"]);
        assert_eq!(
            strings.iter().collect::<Vec<_>>(),
            vec!["ab", "b\u{FFFF}", "b\u{10000}", "cd"]
        );
    }

    #[test]
    fn test_algebra() {
        let a = set(&["ab", "cd", "ef"]);
        let b = set(&["cd", "gh"]);
        assert_eq!(a.union(&b), set(&["ab", "cd", "ef", "gh"]));
        assert_eq!(a.intersection(&b), set(&["cd"]));
        assert_eq!(a.difference(&b), set(&["ab", "ef"]));
        assert_eq!(a.symmetric_difference(&b), set(&["ab", "ef", "gh"]));
        assert!(!a.is_disjoint(&b));
        assert!(a.contains_all(&set(&["ab", "ef"])));
    }

    #[test]
    fn test_combine_with_matches_combine() {
        let a = set(&["ab", "cd", "ef"]);
        let b = set(&["cd", "gh"]);
        for op in [Op::Union, Op::Intersection, Op::Difference, Op::SymmetricDifference] {
            let mut c = a.clone();
            c.combine_with(&b, op);
            assert_eq!(c, a.combine(&b, op), "{:?}", op);
        }
    }

    #[quickcheck]
    fn union_commutes(a: Vec<String>, b: Vec<String>) -> bool {
        let (a, b): (StringSet, StringSet) = (a.into_iter().collect(), b.into_iter().collect());
        a.union(&b) == b.union(&a)
    }

    #[quickcheck]
    fn difference_disjoint_from_subtrahend(a: Vec<String>, b: Vec<String>) -> bool {
        let (a, b): (StringSet, StringSet) = (a.into_iter().collect(), b.into_iter().collect());
        a.difference(&b).is_disjoint(&b)
    }
}
