//! The aggregate set of code points and strings.

pub mod closure;
mod frozen;
pub mod span;

use std::{
    borrow::Cow,
    cmp::Ordering,
    fmt::{self, Display},
    hash::{Hash, Hasher},
    str::FromStr,
    sync::Arc,
};

use log::debug;
use quickcheck::Arbitrary;

pub use closure::CloseOver;
pub use span::SpanCondition;

use self::{frozen::Accelerator, span::StringMatcher};
use crate::{
    check_code_point,
    inversion::{algebra::Op, InversionList},
    pattern::{writer, PatternBuilder},
    props::{
        case::{default_case_mapper, CaseMapper},
        Lookup, Property, PropertyResolver,
    },
    single_code_point,
    strings::StringSet,
    CodePointRange, Error, Result,
};

/// A member of a [`UnicodeSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Element {
    /// A single code point.
    CodePoint(u32),
    /// A string of two or more code points.
    String(String),
}

#[derive(Debug, Clone, Default)]
struct Inner {
    list: InversionList,
    strings: StringSet,
    /// The pattern the set was compiled from, until the set is modified.
    pattern: Option<String>,
    /// Present iff the set is frozen.
    frozen: Option<Accelerator>,
}

/// A set of Unicode code points and strings.
///
/// Code points are stored as an [`InversionList`], strings of two or more
/// code points as a [`StringSet`]. A single-code-point string is always
/// stored as a code point.
///
/// A set can be frozen with [`UnicodeSet::freeze`]. Frozen sets are
/// immutable: every mutator fails with
/// [`ErrorKind::Frozen`](crate::ErrorKind::Frozen), cloning a frozen set
/// shares its storage, and membership tests use precomputed lookup tables.
/// Mutable sets are always deep-copied on clone.
///
/// # Example
/// ```
/// use uniset::UnicodeSet;
///
/// let mut set = UnicodeSet::parse("[a-z]").unwrap();
/// set.remove_range('x', 'z').unwrap().add_str("ch").unwrap();
/// assert!(set.contains('a'));
/// assert!(!set.contains('y'));
/// assert!(set.contains_str("ch"));
/// assert_eq!(set.to_string(), "[a-w{ch}]");
/// ```
pub struct UnicodeSet {
    inner: Arc<Inner>,
}

impl Clone for UnicodeSet {
    fn clone(&self) -> Self {
        if self.is_frozen() {
            UnicodeSet {
                inner: Arc::clone(&self.inner),
            }
        } else {
            UnicodeSet {
                inner: Arc::new((*self.inner).clone()),
            }
        }
    }
}

impl Default for UnicodeSet {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeSet {
    /* Construction */

    /// Creates an empty set.
    pub fn new() -> Self {
        Self::from_parts(InversionList::new(), StringSet::new(), None)
    }

    /// Creates the set of all code points.
    pub fn all_code_points() -> Self {
        Self::from_parts(InversionList::all(), StringSet::new(), None)
    }

    /// Creates the set of code points between `start` and `end` (inclusive).
    /// The set is empty if `start > end`.
    pub fn from_range(start: impl Into<u32>, end: impl Into<u32>) -> Result<Self> {
        Ok(Self::from_parts(
            InversionList::from_range(start, end)?,
            StringSet::new(),
            None,
        ))
    }

    /// Compiles a pattern with the default options.
    ///
    /// See [`PatternBuilder`] for the syntax and for compiling with other options.
    pub fn parse(pattern: &str) -> Result<Self> {
        PatternBuilder::new().build().parse(pattern)
    }

    /// Creates the set of all code points occurring in `text`.
    pub fn from_code_points_of(text: &str) -> Self {
        text.chars().collect()
    }

    pub(crate) fn from_parts(list: InversionList, strings: StringSet, pattern: Option<String>) -> Self {
        UnicodeSet {
            inner: Arc::new(Inner {
                list,
                strings,
                pattern,
                frozen: None,
            }),
        }
    }

    /// Remembers the pattern the set was compiled from.
    pub(crate) fn set_pattern(&mut self, pattern: String) {
        if !self.is_frozen() {
            Arc::make_mut(&mut self.inner).pattern = Some(pattern);
        }
    }

    /* Mutation */

    fn check_thawed(&self) -> Result<()> {
        if self.is_frozen() {
            Err(Error::frozen())
        } else {
            Ok(())
        }
    }

    /// Access to the contents for modification. Must be called only after all
    /// arguments have been validated. Drops the cached pattern.
    fn edit(&mut self) -> Result<&mut Inner> {
        self.check_thawed()?;
        let inner = Arc::make_mut(&mut self.inner);
        inner.pattern = None;
        Ok(inner)
    }

    fn check_range(start: impl Into<u32>, end: impl Into<u32>) -> Result<(u32, u32)> {
        Ok((check_code_point(start.into())?, check_code_point(end.into())?))
    }

    /// Adds a code point.
    pub fn add(&mut self, c: impl Into<u32>) -> Result<&mut Self> {
        let c = check_code_point(c.into())?;
        self.edit()?.list.add(c)?;
        Ok(self)
    }

    /// Adds all code points between `start` and `end` (inclusive). Does
    /// nothing if `start > end`.
    pub fn add_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<&mut Self> {
        let (start, end) = Self::check_range(start, end)?;
        self.edit()?.list.add_range(start, end)?;
        Ok(self)
    }

    /// Adds a string. A string of one code point adds that code point.
    ///
    /// # Example
    /// ```
    /// use uniset::UnicodeSet;
    ///
    /// let mut set = UnicodeSet::new();
    /// set.add_str("a").unwrap().add_str("ab").unwrap();
    /// assert_eq!(set.range_count(), 1);
    /// assert_eq!(set.strings().collect::<Vec<_>>(), vec!["ab"]);
    /// assert!(set.add_str("").is_err());
    /// ```
    pub fn add_str(&mut self, s: &str) -> Result<&mut Self> {
        if s.is_empty() {
            return Err(Error::invalid_member());
        }
        let inner = self.edit()?;
        match single_code_point(s) {
            Some(c) => inner.list.add(c)?,
            None => {
                inner.strings.insert(s)?;
            }
        }
        Ok(self)
    }

    /// Adds every code point of `text` individually.
    pub fn add_all_code_points(&mut self, text: &str) -> Result<&mut Self> {
        let chars: InversionList = text.chars().map(CodePointRange::singleton).collect();
        self.edit()?.list.combine_with(&chars, Op::Union);
        Ok(self)
    }

    fn combine_with(&mut self, other: &UnicodeSet, op: Op) -> Result<&mut Self> {
        let inner = self.edit()?;
        inner.list.combine_with(&other.inner.list, op);
        inner.strings.combine_with(&other.inner.strings, op);
        Ok(self)
    }

    /// Adds all members of `other`.
    pub fn add_all(&mut self, other: &UnicodeSet) -> Result<&mut Self> {
        self.combine_with(other, Op::Union)
    }

    /// Removes a code point.
    pub fn remove(&mut self, c: impl Into<u32>) -> Result<&mut Self> {
        let c = check_code_point(c.into())?;
        self.edit()?.list.remove(c)?;
        Ok(self)
    }

    /// Removes all code points between `start` and `end` (inclusive). Does
    /// nothing if `start > end`.
    pub fn remove_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<&mut Self> {
        let (start, end) = Self::check_range(start, end)?;
        self.edit()?.list.remove_range(start, end)?;
        Ok(self)
    }

    /// Removes a string, or a code point if `s` consists of one.
    pub fn remove_str(&mut self, s: &str) -> Result<&mut Self> {
        let inner = self.edit()?;
        match single_code_point(s) {
            Some(c) => inner.list.remove(c)?,
            None => {
                inner.strings.remove(s);
            }
        }
        Ok(self)
    }

    /// Removes all members of `other`.
    pub fn remove_all(&mut self, other: &UnicodeSet) -> Result<&mut Self> {
        self.combine_with(other, Op::Difference)
    }

    /// Removes all strings, keeping the code points.
    pub fn remove_all_strings(&mut self) -> Result<&mut Self> {
        self.edit()?.strings.clear();
        Ok(self)
    }

    /// Keeps only the code points between `start` and `end` (inclusive).
    /// Strings are removed. The set becomes empty if `start > end`.
    pub fn retain_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<&mut Self> {
        let (start, end) = Self::check_range(start, end)?;
        let inner = self.edit()?;
        inner.list.retain_range(start, end)?;
        inner.strings.clear();
        Ok(self)
    }

    /// Keeps only the code point `c`, if it is a member.
    pub fn retain_code_point(&mut self, c: impl Into<u32>) -> Result<&mut Self> {
        let c = check_code_point(c.into())?;
        self.retain_range(c, c)
    }

    /// Keeps only the member `s`, if it is a member.
    pub fn retain_str(&mut self, s: &str) -> Result<&mut Self> {
        if let Some(c) = single_code_point(s) {
            return self.retain_code_point(c);
        }
        let inner = self.edit()?;
        let present = inner.strings.contains(s);
        inner.list.clear();
        inner.strings.clear();
        if present {
            inner.strings.insert(s)?;
        }
        Ok(self)
    }

    /// Keeps only the members that are also members of `other`.
    pub fn retain_all(&mut self, other: &UnicodeSet) -> Result<&mut Self> {
        self.combine_with(other, Op::Intersection)
    }

    /// Complements the code points with respect to all code points. Strings are
    /// not affected.
    pub fn complement(&mut self) -> Result<&mut Self> {
        self.edit()?.list.complement();
        Ok(self)
    }

    /// Complements the code points between `start` and `end` (inclusive).
    pub fn complement_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<&mut Self> {
        let (start, end) = Self::check_range(start, end)?;
        self.edit()?.list.complement_range(start, end)?;
        Ok(self)
    }

    /// Removes `s` if it is a member and adds it otherwise.
    pub fn complement_str(&mut self, s: &str) -> Result<&mut Self> {
        if s.is_empty() {
            return Err(Error::invalid_member());
        }
        let inner = self.edit()?;
        match single_code_point(s) {
            Some(c) => inner.list.complement_range(c, c)?,
            None => {
                if !inner.strings.remove(s) {
                    inner.strings.insert(s)?;
                }
            }
        }
        Ok(self)
    }

    /// Replaces the members by the symmetric difference with `other`.
    pub fn complement_all(&mut self, other: &UnicodeSet) -> Result<&mut Self> {
        self.combine_with(other, Op::SymmetricDifference)
    }

    /// Replaces the contents by a copy of `other`, including its cached
    /// pattern. The set stays thawed even if `other` is frozen.
    pub fn set_to(&mut self, other: &UnicodeSet) -> Result<&mut Self> {
        let inner = self.edit()?;
        inner.list = other.inner.list.clone();
        inner.strings = other.inner.strings.clone();
        inner.pattern = other.inner.pattern.clone();
        Ok(self)
    }

    /// Replaces the contents by the code points between `start` and `end`
    /// (inclusive). The set becomes empty if `start > end`.
    pub fn set_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<&mut Self> {
        let (start, end) = Self::check_range(start, end)?;
        let inner = self.edit()?;
        inner.list.set_range(start, end)?;
        inner.strings.clear();
        Ok(self)
    }

    /// Removes all members.
    pub fn clear(&mut self) -> Result<&mut Self> {
        let inner = self.edit()?;
        inner.list.clear();
        inner.strings.clear();
        Ok(self)
    }

    fn replace_code_points(&mut self, list: InversionList) -> Result<&mut Self> {
        let inner = self.edit()?;
        inner.list = list;
        inner.strings.clear();
        Ok(self)
    }

    /// Replaces the contents by the code points whose value of `property` is
    /// `value`, as determined by the default property resolver.
    ///
    /// For [`PropertyKind::Mask`](crate::props::PropertyKind::Mask)
    /// properties, `value` is a mask and a code point is included if its
    /// value shares a bit with it.
    pub fn apply_int_property_value(&mut self, property: Property, value: i32) -> Result<&mut Self> {
        self.check_thawed()?;
        let list = Lookup::default_lookup()?.int_value_set(property, value)?;
        self.replace_code_points(list)
    }

    /// Like [`UnicodeSet::apply_int_property_value`], but resolves through `resolver`.
    pub fn apply_int_property_value_with(
        &mut self,
        property: Property,
        value: i32,
        resolver: Arc<dyn PropertyResolver>,
    ) -> Result<&mut Self> {
        self.check_thawed()?;
        let list = Lookup::custom(resolver).int_value_set(property, value)?;
        self.replace_code_points(list)
    }

    /// Replaces the contents by the code points with the property `name=value`,
    /// as determined by the default property resolver. An empty `value` looks
    /// up `name` alone, as in `\p{L}` or `[:Greek:]`.
    ///
    /// # Example
    /// ```
    /// use uniset::UnicodeSet;
    ///
    /// let mut set = UnicodeSet::new();
    /// set.apply_property_alias("Script", "Greek").unwrap();
    /// assert!(set.contains('α'));
    /// assert!(!set.contains('a'));
    /// ```
    pub fn apply_property_alias(&mut self, name: &str, value: &str) -> Result<&mut Self> {
        self.check_thawed()?;
        let list = Lookup::default_lookup()?.alias_set(name, value)?;
        self.replace_code_points(list)
    }

    /// Like [`UnicodeSet::apply_property_alias`], but resolves through `resolver`.
    pub fn apply_property_alias_with(
        &mut self,
        name: &str,
        value: &str,
        resolver: Arc<dyn PropertyResolver>,
    ) -> Result<&mut Self> {
        self.check_thawed()?;
        let list = Lookup::custom(resolver).alias_set(name, value)?;
        self.replace_code_points(list)
    }

    /// Closes the set over case mappings with the default case mapper.
    ///
    /// # Example
    /// ```
    /// use uniset::{CloseOver, UnicodeSet};
    ///
    /// let mut set = UnicodeSet::parse("[ab]").unwrap();
    /// set.close_over(CloseOver::Case).unwrap();
    /// assert!(set.contains('A'));
    /// assert!(set.contains('B'));
    /// ```
    pub fn close_over(&mut self, attribute: CloseOver) -> Result<&mut Self> {
        self.check_thawed()?;
        self.close_over_with(attribute, default_case_mapper().as_ref())
    }

    /// Closes the set over case mappings with the given case mapper.
    pub fn close_over_with(&mut self, attribute: CloseOver, mapper: &dyn CaseMapper) -> Result<&mut Self> {
        self.check_thawed()?;
        let (list, strings) = closure::close_over(&self.inner.list, &self.inner.strings, attribute, mapper);
        let inner = self.edit()?;
        inner.list = list;
        inner.strings = strings;
        Ok(self)
    }

    /// Freezes the set, making it immutable. Freezing a frozen set does nothing.
    pub fn freeze(&mut self) -> &mut Self {
        if !self.is_frozen() {
            let inner = Arc::make_mut(&mut self.inner);
            let accelerator = Accelerator::new(&inner.list, &inner.strings);
            debug!(
                "froze set with {} ranges and {} strings, lookup tables use {} bytes",
                inner.list.range_count(),
                inner.strings.len(),
                accelerator.heap_size()
            );
            inner.frozen = Some(accelerator);
        }
        self
    }

    /// Returns `true` if the set is frozen.
    pub fn is_frozen(&self) -> bool {
        self.inner.frozen.is_some()
    }

    /// Returns a mutable deep copy of the set, frozen or not.
    pub fn clone_as_thawed(&self) -> Self {
        Self::from_parts(
            self.inner.list.clone(),
            self.inner.strings.clone(),
            self.inner.pattern.clone(),
        )
    }

    /// Returns `true` if both handles share the same storage, which is only
    /// the case for clones of a frozen set.
    pub fn shares_storage_with(&self, other: &UnicodeSet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Releases unused capacity. Frozen sets cannot be compacted and fail with
    /// [`ErrorKind::Frozen`](crate::ErrorKind::Frozen).
    pub fn compact(&mut self) -> Result<&mut Self> {
        self.check_thawed()?;
        let inner = Arc::make_mut(&mut self.inner);
        inner.list.compact();
        if let Some(pattern) = inner.pattern.as_mut() {
            pattern.shrink_to_fit();
        }
        Ok(self)
    }

    /* Queries */

    /// Check if a code point is a member.
    pub fn contains(&self, c: impl Into<u32>) -> bool {
        let c = c.into();
        match &self.inner.frozen {
            Some(frozen) => frozen.contains(&self.inner.list, c),
            None => self.inner.list.contains(c),
        }
    }

    /// Check if `s` is a member: a code point if it consists of one, a string otherwise.
    pub fn contains_str(&self, s: &str) -> bool {
        match single_code_point(s) {
            Some(c) => self.contains(c),
            None => self.inner.strings.contains(s),
        }
    }

    /// Check if all code points between `start` and `end` are members.
    pub fn contains_range(&self, start: impl Into<u32>, end: impl Into<u32>) -> Result<bool> {
        self.inner.list.contains_range(start, end)
    }

    /// Check if no code point between `start` and `end` is a member.
    pub fn contains_none_range(&self, start: impl Into<u32>, end: impl Into<u32>) -> Result<bool> {
        self.inner.list.contains_none_range(start, end)
    }

    /// Check if some code point between `start` and `end` is a member.
    pub fn contains_some_range(&self, start: impl Into<u32>, end: impl Into<u32>) -> Result<bool> {
        self.contains_none_range(start, end).map(|none| !none)
    }

    /// Check if every member of `other` is a member of this set.
    pub fn contains_all(&self, other: &UnicodeSet) -> bool {
        self.inner.list.contains_all(&other.inner.list)
            && self.inner.strings.contains_all(&other.inner.strings)
    }

    /// Check if the sets have no member in common.
    pub fn contains_none(&self, other: &UnicodeSet) -> bool {
        self.inner.list.is_disjoint(&other.inner.list)
            && self.inner.strings.is_disjoint(&other.inner.strings)
    }

    /// Check if the sets have a member in common.
    pub fn contains_some(&self, other: &UnicodeSet) -> bool {
        !self.contains_none(other)
    }

    /// Check if `text` is a concatenation of members.
    pub fn contains_all_str(&self, text: &str) -> bool {
        self.span(text, 0, SpanCondition::Contained) == text.len()
    }

    /// Check if no member occurs anywhere in `text`.
    pub fn contains_none_str(&self, text: &str) -> bool {
        self.span(text, 0, SpanCondition::NotContained) == text.len()
    }

    /// Check if some member occurs in `text`.
    pub fn contains_some_str(&self, text: &str) -> bool {
        !self.contains_none_str(text)
    }

    fn matcher(&self) -> Cow<'_, StringMatcher> {
        match &self.inner.frozen {
            Some(frozen) => Cow::Borrowed(&frozen.matcher),
            None if self.inner.strings.is_empty() => Cow::Owned(StringMatcher::default()),
            None => Cow::Owned(StringMatcher::new(&self.inner.strings)),
        }
    }

    /// Returns the byte offset in `text` where `condition` stops holding when
    /// scanning forward from byte offset `start`.
    ///
    /// # Example
    /// ```
    /// use uniset::{SpanCondition, UnicodeSet};
    ///
    /// let set = UnicodeSet::parse("[{xy}{xya}{ax}]").unwrap();
    /// assert_eq!(set.span("xyax", 0, SpanCondition::Contained), 4);
    /// assert_eq!(set.span("xyax", 0, SpanCondition::Simple), 3);
    /// ```
    pub fn span(&self, text: &str, start: usize, condition: SpanCondition) -> usize {
        span::span(|c| self.contains(c), &self.matcher(), text, start, condition)
    }

    /// Returns the byte offset in `text` where `condition` stops holding when
    /// scanning backward from byte offset `end`.
    pub fn span_back(&self, text: &str, end: usize, condition: SpanCondition) -> usize {
        span::span_back(|c| self.contains(c), &self.matcher(), text, end, condition)
    }

    /// The number of members: code points plus strings.
    pub fn len(&self) -> usize {
        self.inner.list.len() + self.inner.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.list.is_empty() && self.inner.strings.is_empty()
    }

    /// Returns the code point at ordinal position `index` among the code points.
    pub fn char_at(&self, index: usize) -> Option<u32> {
        self.inner.list.char_at(index)
    }

    /// Returns the ordinal position of the code point `c` among the code points.
    pub fn index_of(&self, c: impl Into<u32>) -> Option<usize> {
        self.inner.list.index_of(c)
    }

    pub fn range_count(&self) -> usize {
        self.inner.list.range_count()
    }

    /// The first code point of the `i`-th range.
    pub fn range_start(&self, i: usize) -> Option<u32> {
        self.inner.list.range_start(i)
    }

    /// The last code point of the `i`-th range.
    pub fn range_end(&self, i: usize) -> Option<u32> {
        self.inner.list.range_end(i)
    }

    pub fn ranges(&self) -> impl DoubleEndedIterator<Item = CodePointRange> + ExactSizeIterator + '_ {
        self.inner.list.ranges()
    }

    /// The code points of the set.
    pub fn code_points(&self) -> &InversionList {
        &self.inner.list
    }

    /// The strings of the set.
    pub fn string_set(&self) -> &StringSet {
        &self.inner.strings
    }

    /// Iterates over the strings in code point order.
    pub fn strings(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator + '_ {
        self.inner.strings.iter()
    }

    pub fn has_strings(&self) -> bool {
        !self.inner.strings.is_empty()
    }

    /// Iterates over all members: first the code points in ascending order,
    /// then the strings.
    pub fn iter(&self) -> impl Iterator<Item = Element> + '_ {
        self.inner
            .list
            .iter()
            .map(Element::CodePoint)
            .chain(self.strings().map(|s| Element::String(s.to_string())))
    }

    /// Returns `false` only if no member starts with a UTF-16 code unit
    /// whose low byte is `v`. Used to build indexes over sets.
    pub fn matches_index_value(&self, v: u8) -> bool {
        fn low_byte_in(low: u32, high: u32, v: u32) -> bool {
            if high - low >= 0xFF {
                return true;
            }
            let (lo, hi) = (low & 0xFF, high & 0xFF);
            if lo <= hi {
                lo <= v && v <= hi
            } else {
                lo <= v || v <= hi
            }
        }
        fn lead_surrogate(c: u32) -> u32 {
            0xD800 + ((c - 0x10000) >> 10)
        }
        let v = v as u32;
        let in_ranges = self.ranges().any(|r| {
            let (low, high) = (r.start(), r.end());
            if low_byte_in(low, high, v) {
                return true;
            }
            high >= 0x10000 && low_byte_in(lead_surrogate(low.max(0x10000)), lead_surrogate(high), v)
        });
        in_ranges
            || self.strings().filter_map(|s| s.chars().next()).any(|c| {
                let c = c as u32;
                c & 0xFF == v || (c >= 0x10000 && lead_surrogate(c) & 0xFF == v)
            })
    }

    /// Returns the set as a pattern.
    ///
    /// A set compiled from a pattern and not modified since returns that
    /// pattern; otherwise a canonical pattern is generated. With
    /// `escape_unprintable`, non-printable characters are written as `\u`
    /// escapes. Compiling the result yields an equal set.
    pub fn to_pattern(&self, escape_unprintable: bool) -> String {
        match &self.inner.pattern {
            Some(pattern) => writer::reescape(pattern, escape_unprintable),
            None => writer::generate(&self.inner.list, &self.inner.strings, escape_unprintable),
        }
    }

    /* Algebra */

    fn combined(&self, other: &UnicodeSet, op: Op) -> UnicodeSet {
        Self::from_parts(
            self.inner.list.combine(&other.inner.list, op),
            self.inner.strings.combine(&other.inner.strings, op),
            None,
        )
    }

    /// Returns a new set with the members of either set.
    pub fn union(&self, other: &UnicodeSet) -> UnicodeSet {
        self.combined(other, Op::Union)
    }

    /// Returns a new set with the members of both sets.
    pub fn intersection(&self, other: &UnicodeSet) -> UnicodeSet {
        self.combined(other, Op::Intersection)
    }

    /// Returns a new set with the members of this set that are not in `other`.
    pub fn difference(&self, other: &UnicodeSet) -> UnicodeSet {
        self.combined(other, Op::Difference)
    }

    /// Returns a new set with the members of exactly one of the sets.
    pub fn symmetric_difference(&self, other: &UnicodeSet) -> UnicodeSet {
        self.combined(other, Op::SymmetricDifference)
    }
}

impl FromStr for UnicodeSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromIterator<char> for UnicodeSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        let list = iter.into_iter().map(CodePointRange::singleton).collect();
        Self::from_parts(list, StringSet::new(), None)
    }
}

impl FromIterator<CodePointRange> for UnicodeSet {
    fn from_iter<T: IntoIterator<Item = CodePointRange>>(iter: T) -> Self {
        Self::from_parts(iter.into_iter().collect(), StringSet::new(), None)
    }
}

impl PartialEq for UnicodeSet {
    fn eq(&self, other: &Self) -> bool {
        self.inner.list == other.inner.list && self.inner.strings == other.inner.strings
    }
}

impl Eq for UnicodeSet {}

impl Hash for UnicodeSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.list.hash(state);
        self.inner.strings.hash(state);
    }
}

impl PartialOrd for UnicodeSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnicodeSet {
    /// Compares the code point ranges first, then the strings.
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner
            .list
            .cmp(&other.inner.list)
            .then_with(|| self.inner.strings.cmp(&other.inner.strings))
    }
}

impl Display for UnicodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_pattern(false))
    }
}

impl fmt::Debug for UnicodeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnicodeSet")
            .field("ranges", &format_args!("{}", self.inner.list))
            .field("strings", &self.inner.strings)
            .field("frozen", &self.is_frozen())
            .finish()
    }
}

impl Arbitrary for UnicodeSet {
    /// Generates sets whose strings are drawn from a small alphabet, so that
    /// strings overlap with each other and with the code points.
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        const ALPHABET: [char; 4] = ['a', 'b', '{', '\u{10400}'];
        let list = InversionList::arbitrary(g);
        let count = usize::arbitrary(g) % 4;
        let strings = (0..count)
            .map(|_| {
                let len = 2 + usize::arbitrary(g) % 2;
                (0..len)
                    .map(|_| *g.choose(&ALPHABET).unwrap_or(&'a'))
                    .collect::<String>()
            })
            .collect();
        Self::from_parts(list, strings, None)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let strings = self.inner.strings.clone();
        Box::new(
            self.inner
                .list
                .shrink()
                .map(move |list| Self::from_parts(list, strings.clone(), None)),
        )
    }
}
