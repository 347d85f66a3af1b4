//! An immutable D-dimensional coordinate.

use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A point in `D`-dimensional space over scalar type `T`.
///
/// Equality and ordering are derived component-wise; for `T = f64` the
/// ordering is a total, deterministic lexicographic order (via
/// [`f64::total_cmp`]) so that two runs over the same input produce the
/// same sorted order regardless of platform or thread scheduling.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point<T, const D: usize> {
    pub coords: [T; D],
}

impl<T, const D: usize> Point<T, D> {
    /// Creates a new point from its coordinates.
    pub fn new(coords: [T; D]) -> Self {
        Point { coords }
    }

    /// The dimension of this point.
    pub fn dim(&self) -> usize {
        D
    }
}

impl<T, const D: usize> Index<usize> for Point<T, D> {
    type Output = T;
    fn index(&self, i: usize) -> &T {
        &self.coords[i]
    }
}

impl<const D: usize> Point<f64, D> {
    /// A total, deterministic lexicographic comparison over coordinates.
    ///
    /// Snaps NaN-free `f64` ordering via `total_cmp`, so it is a genuine
    /// total order rather than `PartialOrd`'s partial one. This is the
    /// canonical predicate this crate picked to resolve the grid
    /// partitioner's boundary-snapping Open Question (see `DESIGN.md`):
    /// downstream code never needs to re-derive tile membership from this
    /// ordering, it only needs reproducible tie-breaking for sorting.
    pub fn lexicographic_cmp(&self, other: &Self) -> std::cmp::Ordering {
        for i in 0..D {
            let ord = self.coords[i].total_cmp(&other.coords[i]);
            if ord != std::cmp::Ordering::Equal {
                return ord;
            }
        }
        std::cmp::Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_and_index() {
        let p = Point::new([1.0, 2.0, 3.0]);
        assert_eq!(p[0], 1.0);
        assert_eq!(p[1], 2.0);
        assert_eq!(p[2], 3.0);
        assert_eq!(p.dim(), 3);
    }

    #[test]
    fn lexicographic_order_is_total() {
        let a = Point::new([0.0, 1.0]);
        let b = Point::new([0.0, 2.0]);
        let c = Point::new([1.0, 0.0]);
        assert_eq!(a.lexicographic_cmp(&b), std::cmp::Ordering::Less);
        assert_eq!(b.lexicographic_cmp(&c), std::cmp::Ordering::Less);
        assert_eq!(a.lexicographic_cmp(&a), std::cmp::Ordering::Equal);
    }
}
