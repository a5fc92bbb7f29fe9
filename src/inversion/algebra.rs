//! Boolean operations over inversion lists.
//!
//! All operations are a single linear pass over the boundaries of both
//! operands. The pass keeps one polarity bit per operand that flips on every
//! boundary consumed from that operand, and emits a boundary whenever the
//! combined polarity changes. Boundaries shared by both operands are consumed
//! together, so the output never contains empty or touching ranges.

use crate::HIGH;

/// A boolean combination of two sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Members of either operand.
    Union,
    /// Members of both operands.
    Intersection,
    /// Members of the left operand that are not members of the right one.
    Difference,
    /// Members of exactly one operand.
    SymmetricDifference,
}

impl Op {
    /// Combines the membership of a value in the left and right operand.
    #[inline]
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            Op::Union => left || right,
            Op::Intersection => left && right,
            Op::Difference => left && !right,
            Op::SymmetricDifference => left != right,
        }
    }
}

/// Merges two terminated boundary lists under `op`.
///
/// Both inputs must be valid inversion lists, including the terminating
/// [`HIGH`]. The result is a valid inversion list.
pub(crate) fn merge(a: &[u32], b: &[u32], op: Op) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let (mut i, mut j) = (0, 0);
    let (mut in_a, mut in_b) = (false, false);
    let mut inside = false;
    loop {
        let v = a[i].min(b[j]);
        if v == HIGH {
            break;
        }
        if a[i] == v {
            in_a = !in_a;
            i += 1;
        }
        if b[j] == v {
            in_b = !in_b;
            j += 1;
        }
        let now = op.apply(in_a, in_b);
        if now != inside {
            out.push(v);
            inside = now;
        }
    }
    if inside {
        // The range reaches MAX_CODE_POINT.
        out.push(HIGH);
    }
    out.push(HIGH);
    out
}

/// Returns `true` if some code point has a membership pair `(in a, in b)` for
/// which `pred` holds. Stops at the first such code point.
pub(crate) fn any_point(a: &[u32], b: &[u32], pred: impl Fn(bool, bool) -> bool) -> bool {
    if a[0].min(b[0]) > 0 && pred(false, false) {
        return true;
    }
    let (mut i, mut j) = (0, 0);
    let (mut in_a, mut in_b) = (false, false);
    loop {
        let v = a[i].min(b[j]);
        if v == HIGH {
            return false;
        }
        if a[i] == v {
            in_a = !in_a;
            i += 1;
        }
        if b[j] == v {
            in_b = !in_b;
            j += 1;
        }
        if pred(in_a, in_b) {
            return true;
        }
    }
}

/// Returns `true` if the two lists share no code point.
pub(crate) fn disjoint(a: &[u32], b: &[u32]) -> bool {
    !any_point(a, b, |x, y| x && y)
}

/// Returns `true` if every code point of `b` is in `a`.
pub(crate) fn superset(a: &[u32], b: &[u32]) -> bool {
    !any_point(a, b, |x, y| y && !x)
}
