//! Inversion lists: sets of code points encoded as sorted range boundaries.
//!
//! An inversion list stores the boundaries `b[0] < b[1] < ... < b[n-1] = HIGH`.
//! Even-indexed boundaries start a range (inclusive), odd-indexed boundaries
//! end it (exclusive). A code point `c` is a member iff the number of
//! boundaries `<= c` is odd. The list always ends with the sentinel
//! [`HIGH`](crate::HIGH) and always has odd length. A set containing
//! [`MAX_CODE_POINT`](crate::MAX_CODE_POINT) stores `HIGH` as the limit of its
//! last range, directly followed by the terminating `HIGH`.

pub mod algebra;

use std::{cmp::Ordering, fmt::Display};

use quickcheck::Arbitrary;

use crate::{check_code_point, CodePoints, Result, HIGH, MAX_CODE_POINT};
use algebra::Op;

/// A range of code points defined by a start and an end code point.
/// The range covers all code points between start and end, including the start and the end themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CodePointRange {
    start: u32,
    end: u32,
}

impl CodePointRange {
    /// Create a new range of code points.
    /// If the start is greater than the end, the range is empty.
    pub fn new(start: impl Into<u32>, end: impl Into<u32>) -> Self {
        CodePointRange {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Create a range that contains a single code point.
    pub fn singleton(c: impl Into<u32>) -> Self {
        let c = c.into();
        CodePointRange { start: c, end: c }
    }

    /// Create a range that covers all code points.
    ///
    /// # Example
    /// ```
    /// use uniset::{CodePointRange, MAX_CODE_POINT};
    ///
    /// let range = CodePointRange::all();
    /// assert!(range.contains(0u32));
    /// assert!(range.contains(MAX_CODE_POINT));
    /// ```
    pub fn all() -> Self {
        CodePointRange {
            start: 0,
            end: MAX_CODE_POINT,
        }
    }

    /// Return the number of code points in the range.
    ///
    /// # Example
    /// ```
    /// use uniset::CodePointRange;
    ///
    /// assert_eq!(CodePointRange::new('a', 'z').size(), 26);
    /// assert_eq!(CodePointRange::singleton('a').size(), 1);
    /// assert_eq!(CodePointRange::new('z', 'a').size(), 0);
    /// ```
    pub fn size(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            ((self.end - self.start) + 1) as usize
        }
    }

    /// Iterates over the code points of the range in ascending order.
    pub fn iter(&self) -> CodePoints {
        CodePoints::new(self.start, self.end)
    }

    /// Check if the range is empty. The range is empty if the start is greater than the end.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Returns the lower bound of the range.
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Returns the upper bound of the range.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Check if the range contains all code points.
    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end == MAX_CODE_POINT
    }

    /// Check if a code point is in the range.
    ///
    /// # Example
    /// ```
    /// use uniset::CodePointRange;
    ///
    /// let range = CodePointRange::new('a', 'z');
    /// assert!(range.contains('a'));
    /// assert!(range.contains('m'));
    /// assert!(range.contains(0x7Au32));
    /// assert!(!range.contains('A'));
    /// ```
    pub fn contains(&self, c: impl Into<u32>) -> bool {
        let c = c.into();
        self.start <= c && c <= self.end
    }

    /// Return the intersection of two ranges.
    /// If the two ranges do not overlap, the intersection is empty.
    ///
    /// # Example
    /// ```
    /// use uniset::CodePointRange;
    ///
    /// let r1 = CodePointRange::new('a', 'm');
    /// let r2 = CodePointRange::new('a', 'z');
    /// let r3 = CodePointRange::new('y', 'z');
    ///
    /// assert_eq!(r1.intersect(&r2), CodePointRange::new('a', 'm'));
    /// assert!(r1.intersect(&r3).is_empty());
    /// ```
    pub fn intersect(&self, other: &Self) -> Self {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        CodePointRange::new(start, end)
    }
}

impl PartialOrd for CodePointRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CodePointRange {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            o => o,
        }
    }
}

impl Display for CodePointRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "[]")
        } else if self.start == self.end {
            write!(f, "[U+{:04X}]", self.start)
        } else {
            write!(f, "[U+{:04X}-U+{:04X}]", self.start, self.end)
        }
    }
}

/// Picks a code point, favouring ASCII and the BMP so that generated sets
/// overlap often enough to be interesting.
pub(crate) fn arbitrary_code_point(g: &mut quickcheck::Gen) -> u32 {
    let raw = u32::arbitrary(g);
    match raw % 8 {
        0 => 0,
        1 => MAX_CODE_POINT,
        2..=4 => (raw >> 3) % 0x80,
        5 | 6 => (raw >> 3) % 0x10000,
        _ => (raw >> 3) % (MAX_CODE_POINT + 1),
    }
}

impl Arbitrary for CodePointRange {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let a = arbitrary_code_point(g);
        let b = arbitrary_code_point(g);
        CodePointRange::new(a.min(b), a.max(b))
    }
}

/// A set of code points stored as an inversion list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InversionList {
    list: Vec<u32>,
}

impl Default for InversionList {
    fn default() -> Self {
        Self::new()
    }
}

impl InversionList {
    /// Creates an empty set.
    pub fn new() -> Self {
        InversionList { list: vec![HIGH] }
    }

    /// Creates the set of all code points.
    pub fn all() -> Self {
        InversionList {
            list: vec![0, HIGH, HIGH],
        }
    }

    /// Creates the set of all code points between `start` and `end` (inclusive).
    /// The set is empty if `start > end`.
    pub fn from_range(start: impl Into<u32>, end: impl Into<u32>) -> Result<Self> {
        let mut list = Self::new();
        list.set_range(start, end)?;
        Ok(list)
    }

    /// Wraps a boundary list that is known to be valid.
    pub(crate) fn from_boundaries(list: Vec<u32>) -> Self {
        debug_assert!(Self::valid_boundaries(&list), "invalid list {:?}", list);
        InversionList { list }
    }

    fn valid_boundaries(list: &[u32]) -> bool {
        if list.len() % 2 == 0 || list.last() != Some(&HIGH) {
            return false;
        }
        let bounds = &list[..list.len() - 1];
        bounds.windows(2).all(|w| w[0] < w[1]) && bounds.iter().all(|&b| b <= HIGH)
    }

    /// Checks the representation invariants: odd length, terminated by
    /// `HIGH`, strictly increasing boundaries (the limit `HIGH` of a range
    /// ending at `MAX_CODE_POINT` is the only allowed repetition).
    pub fn is_valid(&self) -> bool {
        Self::valid_boundaries(&self.list)
    }

    /// Returns the raw boundaries, including the terminating `HIGH`.
    pub fn boundaries(&self) -> &[u32] {
        &self.list
    }

    /// Boundaries without the terminator.
    fn bounds(&self) -> &[u32] {
        &self.list[..self.list.len() - 1]
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.list.len() == 1
    }

    /// Check if the set contains every code point.
    pub fn is_full(&self) -> bool {
        self.list == [0, HIGH, HIGH]
    }

    /// The number of code points in the set.
    pub fn len(&self) -> usize {
        self.bounds()
            .chunks_exact(2)
            .map(|r| (r[1] - r[0]) as usize)
            .sum()
    }

    /// The number of maximal ranges in the set.
    pub fn range_count(&self) -> usize {
        self.list.len() / 2
    }

    /// Returns the `i`-th range in ascending order.
    pub fn range(&self, i: usize) -> Option<CodePointRange> {
        if i < self.range_count() {
            Some(CodePointRange::new(self.list[2 * i], self.list[2 * i + 1] - 1))
        } else {
            None
        }
    }

    /// Returns the first code point of the `i`-th range.
    pub fn range_start(&self, i: usize) -> Option<u32> {
        self.range(i).map(|r| r.start())
    }

    /// Returns the last code point of the `i`-th range.
    pub fn range_end(&self, i: usize) -> Option<u32> {
        self.range(i).map(|r| r.end())
    }

    /// Iterates over the maximal ranges of the set in ascending order.
    ///
    /// # Example
    /// ```
    /// use uniset::{CodePointRange, InversionList};
    ///
    /// let mut list = InversionList::new();
    /// list.add_range('x', 'z').unwrap();
    /// list.add_range('a', 'd').unwrap();
    /// list.add_range('c', 'f').unwrap();
    ///
    /// let mut iter = list.ranges();
    /// assert_eq!(iter.next(), Some(CodePointRange::new('a', 'f')));
    /// assert_eq!(iter.next(), Some(CodePointRange::new('x', 'z')));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn ranges(&self) -> impl DoubleEndedIterator<Item = CodePointRange> + ExactSizeIterator + '_ {
        self.bounds()
            .chunks_exact(2)
            .map(|r| CodePointRange::new(r[0], r[1] - 1))
    }

    /// Iterates over all code points of the set in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.ranges().flat_map(|r| r.iter())
    }

    /// The smallest member.
    pub fn first(&self) -> Option<u32> {
        self.range(0).map(|r| r.start())
    }

    /// The largest member.
    pub fn last(&self) -> Option<u32> {
        self.ranges().next_back().map(|r| r.end())
    }

    /// Returns the number of boundaries `<= c`. The code point `c` is a member
    /// iff the returned index is odd.
    pub fn find(&self, c: u32) -> usize {
        self.list.partition_point(|&b| b <= c)
    }

    /// Check if a code point is in the set. Values above `MAX_CODE_POINT`
    /// are never members.
    pub fn contains(&self, c: impl Into<u32>) -> bool {
        let c = c.into();
        c <= MAX_CODE_POINT && self.find(c) % 2 == 1
    }

    /// Check if a single range of the set covers all of `start..=end`.
    /// Returns `true` for an empty interval.
    pub fn contains_range(&self, start: impl Into<u32>, end: impl Into<u32>) -> Result<bool> {
        let (start, end) = (check_code_point(start.into())?, check_code_point(end.into())?);
        if start > end {
            return Ok(true);
        }
        let i = self.find(start);
        Ok(i % 2 == 1 && end < self.list[i])
    }

    /// Check if no code point of `start..=end` is in the set.
    pub fn contains_none_range(&self, start: impl Into<u32>, end: impl Into<u32>) -> Result<bool> {
        let (start, end) = (check_code_point(start.into())?, check_code_point(end.into())?);
        if start > end {
            return Ok(true);
        }
        let i = self.find(start);
        Ok(i % 2 == 0 && end < self.list[i])
    }

    /// Check if every member of `other` is in this set.
    pub fn contains_all(&self, other: &Self) -> bool {
        algebra::superset(&self.list, &other.list)
    }

    /// Check if the two sets share no member.
    pub fn is_disjoint(&self, other: &Self) -> bool {
        algebra::disjoint(&self.list, &other.list)
    }

    /// Returns the code point at ordinal position `index` among the members.
    pub fn char_at(&self, index: usize) -> Option<u32> {
        let mut index = index;
        for r in self.ranges() {
            if index < r.size() {
                return Some(r.start() + index as u32);
            }
            index -= r.size();
        }
        None
    }

    /// Returns the ordinal position of `c` among the members.
    pub fn index_of(&self, c: impl Into<u32>) -> Option<usize> {
        let c = c.into();
        let mut index = 0;
        for r in self.ranges() {
            if c < r.start() {
                return None;
            }
            if c <= r.end() {
                return Some(index + (c - r.start()) as usize);
            }
            index += r.size();
        }
        None
    }

    /* Mutation */

    fn check_range(start: impl Into<u32>, end: impl Into<u32>) -> Result<(u32, u32)> {
        Ok((check_code_point(start.into())?, check_code_point(end.into())?))
    }

    /// Adds a single code point.
    pub fn add(&mut self, c: impl Into<u32>) -> Result<()> {
        let c = c.into();
        self.add_range(c, c)
    }

    /// Adds all code points of `start..=end`. A call with `start > end` does nothing.
    ///
    /// Overlapping and adjacent ranges are merged. The list is spliced in place,
    /// so appending past the last range is amortized constant time.
    pub fn add_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<()> {
        let (start, end) = Self::check_range(start, end)?;
        if start > end {
            return Ok(());
        }
        let limit = end + 1;
        let bounds = self.bounds();
        let i = bounds.partition_point(|&b| b < start);
        let j = bounds.partition_point(|&b| b <= limit);
        let mut splice = Vec::with_capacity(2);
        if i % 2 == 0 {
            splice.push(start);
        }
        if j % 2 == 0 {
            splice.push(limit);
        }
        self.list.splice(i..j, splice);
        Ok(())
    }

    /// Removes a single code point.
    pub fn remove(&mut self, c: impl Into<u32>) -> Result<()> {
        let c = c.into();
        self.remove_range(c, c)
    }

    /// Removes all code points of `start..=end`. A call with `start > end` does nothing.
    pub fn remove_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<()> {
        let (start, end) = Self::check_range(start, end)?;
        if start > end {
            return Ok(());
        }
        let limit = end + 1;
        let bounds = self.bounds();
        let i = bounds.partition_point(|&b| b < start);
        let j = bounds.partition_point(|&b| b <= limit);
        let mut splice = Vec::with_capacity(2);
        if i % 2 == 1 {
            splice.push(start);
        }
        if j % 2 == 1 {
            splice.push(limit);
        }
        self.list.splice(i..j, splice);
        Ok(())
    }

    /// Removes every code point outside `start..=end`. A call with `start > end` does nothing.
    pub fn retain_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<()> {
        let (start, end) = Self::check_range(start, end)?;
        if start > end {
            return Ok(());
        }
        let range = [start, end + 1, HIGH];
        self.list = algebra::merge(&self.list, &range, Op::Intersection);
        Ok(())
    }

    /// Replaces the contents with `start..=end`, or with nothing if `start > end`.
    pub fn set_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<()> {
        let (start, end) = Self::check_range(start, end)?;
        self.list.clear();
        if start <= end {
            self.list.extend([start, end + 1]);
        }
        self.list.push(HIGH);
        Ok(())
    }

    /// Removes all code points.
    pub fn clear(&mut self) {
        self.list.clear();
        self.list.push(HIGH);
    }

    /// Complements the set with respect to all code points.
    ///
    /// # Example
    /// ```
    /// use uniset::{CodePointRange, InversionList, MAX_CODE_POINT};
    ///
    /// let mut list = InversionList::from_range('a', 'z').unwrap();
    /// list.complement();
    /// let mut iter = list.ranges();
    /// assert_eq!(iter.next(), Some(CodePointRange::new(0u32, 0x60u32)));
    /// assert_eq!(iter.next(), Some(CodePointRange::new(0x7Bu32, MAX_CODE_POINT)));
    /// assert_eq!(iter.next(), None);
    /// ```
    pub fn complement(&mut self) {
        self.list.pop();
        if self.list.first() == Some(&0) {
            self.list.remove(0);
        } else {
            self.list.insert(0, 0);
        }
        if self.list.last() == Some(&HIGH) {
            self.list.pop();
        } else {
            self.list.push(HIGH);
        }
        self.list.push(HIGH);
    }

    /// Complements the membership of every code point in `start..=end`.
    /// A call with `start > end` does nothing.
    pub fn complement_range(&mut self, start: impl Into<u32>, end: impl Into<u32>) -> Result<()> {
        let (start, end) = Self::check_range(start, end)?;
        if start > end {
            return Ok(());
        }
        let range = [start, end + 1, HIGH];
        self.list = algebra::merge(&self.list, &range, Op::SymmetricDifference);
        Ok(())
    }

    /* Set algebra */

    /// Combines two sets under the given operation.
    pub fn combine(&self, other: &Self, op: Op) -> Self {
        InversionList {
            list: algebra::merge(&self.list, &other.list, op),
        }
    }

    /// Returns the union of the two sets.
    pub fn union(&self, other: &Self) -> Self {
        self.combine(other, Op::Union)
    }

    /// Returns the intersection of the two sets.
    pub fn intersection(&self, other: &Self) -> Self {
        self.combine(other, Op::Intersection)
    }

    /// Returns the code points of this set that are not in `other`.
    pub fn difference(&self, other: &Self) -> Self {
        self.combine(other, Op::Difference)
    }

    /// Returns the code points that are in exactly one of the two sets.
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.combine(other, Op::SymmetricDifference)
    }

    /// Applies `op` in place, with this set as the left operand.
    pub fn combine_with(&mut self, other: &Self, op: Op) {
        self.list = algebra::merge(&self.list, &other.list, op);
    }

    /// Releases unused capacity.
    pub fn compact(&mut self) {
        self.list.shrink_to_fit();
    }

    /// Bytes of heap storage used by the boundaries.
    pub(crate) fn heap_size(&self) -> usize {
        self.list.capacity() * std::mem::size_of::<u32>()
    }
}

impl PartialOrd for InversionList {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InversionList {
    /// Compares the range lists lexicographically.
    fn cmp(&self, other: &Self) -> Ordering {
        self.ranges().cmp(other.ranges())
    }
}

impl FromIterator<CodePointRange> for InversionList {
    /// Collects the ranges into a set. Empty ranges are skipped and range
    /// ends above `MAX_CODE_POINT` are clamped.
    fn from_iter<T: IntoIterator<Item = CodePointRange>>(iter: T) -> Self {
        let mut list = InversionList::new();
        for r in iter {
            let end = r.end().min(MAX_CODE_POINT);
            if r.start() <= end {
                // Both bounds are valid code points at this point.
                let _ = list.add_range(r.start(), end);
            }
        }
        list
    }
}

impl Display for InversionList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, r) in self.ranges().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", r)?;
        }
        write!(f, "}}")
    }
}

impl Arbitrary for InversionList {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let ranges: Vec<CodePointRange> = Arbitrary::arbitrary(g);
        ranges.into_iter().collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let ranges: Vec<CodePointRange> = self.ranges().collect();
        Box::new(
            ranges
                .shrink()
                .map(|rs| rs.into_iter().collect::<InversionList>()),
        )
    }
}
