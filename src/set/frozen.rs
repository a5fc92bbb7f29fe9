//! Lookup structures built when a set is frozen.

use bit_set::BitSet;

use super::span::StringMatcher;
use crate::{inversion::InversionList, strings::StringSet};

const BMP_LIMIT: u32 = 0x10000;

/// Derived data of a frozen set. Fully built before the set becomes shared
/// and never modified afterwards.
#[derive(Debug, Clone)]
pub(crate) struct Accelerator {
    /// Membership of every BMP code point.
    bmp: BitSet,
    /// Index of the first boundary above the BMP.
    supplementary: usize,
    pub(crate) matcher: StringMatcher,
}

impl Accelerator {
    pub(crate) fn new(list: &InversionList, strings: &StringSet) -> Self {
        let mut bmp = BitSet::with_capacity(BMP_LIMIT as usize);
        for r in list.ranges() {
            if r.start() >= BMP_LIMIT {
                break;
            }
            let end = r.end().min(BMP_LIMIT - 1);
            for c in r.start()..=end {
                bmp.insert(c as usize);
            }
        }
        Accelerator {
            bmp,
            supplementary: list.find(BMP_LIMIT - 1),
            matcher: StringMatcher::new(strings),
        }
    }

    /// Membership test agreeing with [`InversionList::contains`].
    pub(crate) fn contains(&self, list: &InversionList, c: u32) -> bool {
        if c < BMP_LIMIT {
            return self.bmp.contains(c as usize);
        }
        if c > crate::MAX_CODE_POINT {
            return false;
        }
        let upper = &list.boundaries()[self.supplementary..];
        (self.supplementary + upper.partition_point(|&b| b <= c)) % 2 == 1
    }

    /// Bytes of heap storage used by the accelerator.
    pub(crate) fn heap_size(&self) -> usize {
        self.bmp.get_ref().capacity() / 8 + self.matcher.heap_size()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;
    use crate::inversion::arbitrary_code_point;

    #[derive(Debug, Clone)]
    struct Probe(u32);

    impl quickcheck::Arbitrary for Probe {
        fn arbitrary(g: &mut quickcheck::Gen) -> Self {
            Probe(arbitrary_code_point(g))
        }
    }

    #[quickcheck]
    fn agrees_with_list(list: InversionList, probes: Vec<Probe>) -> bool {
        let acc = Accelerator::new(&list, &StringSet::new());
        probes
            .iter()
            .map(|p| p.0)
            .chain([0, 0xFFFF, 0x10000, crate::MAX_CODE_POINT, crate::HIGH])
            .all(|c| acc.contains(&list, c) == list.contains(c))
    }

    #[test]
    fn test_range_across_planes() {
        let list = InversionList::from_range(0xFFF0u32, 0x10010u32).unwrap();
        let acc = Accelerator::new(&list, &StringSet::new());
        for c in 0xFFE0..0x10020 {
            assert_eq!(acc.contains(&list, c), list.contains(c), "{:X}", c);
        }
    }
}
