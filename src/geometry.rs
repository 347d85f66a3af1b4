//! The adapter layer between the vendored `delaunay_core` kernel and the
//! rest of this crate: a `Kernel` trait pinning down exactly the kernel
//! operations the tile/splay/engine layers rely on, plus the small
//! geometric value types (`Bbox`, `VertexData`) shared across tiles.

use std::collections::HashSet;

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::delaunay_core::{cell::Cell, point::Point, triangulation_data_structure::Tds};

/// This crate fixes the kernel's scalar type to `f64` everywhere above the
/// `delaunay_core` module: exact-enough geometric predicates (see
/// `delaunay_core::matrix`) are only implemented for `f64`, and nothing in
/// §4 of the specification this crate implements needs any other field.
pub type Scalar = f64;

/// Per-vertex payload: `(home tile id, opaque user info)`, exactly
/// spec.md §3's "Vertex data". `id` is set once, at first insertion, and
/// never mutated afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct VertexData<I, F> {
    pub id: I,
    pub info: F,
}

impl<I, F> VertexData<I, F> {
    pub fn new(id: I, info: F) -> Self {
        VertexData { id, info }
    }
}

/// An axis-aligned bounding box in `D` dimensions, stored as `2*D` `f64`s.
/// Starts empty (`min > max` componentwise) and accumulates via `+=`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Bbox<const D: usize> {
    min: [f64; D],
    max: [f64; D],
}

impl<const D: usize> Default for Bbox<D> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<const D: usize> Bbox<D> {
    pub fn empty() -> Self {
        Bbox {
            min: [f64::INFINITY; D],
            max: [f64::NEG_INFINITY; D],
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..D).any(|i| self.min[i] > self.max[i])
    }

    pub fn min(&self) -> [f64; D] {
        self.min
    }

    pub fn max(&self) -> [f64; D] {
        self.max
    }

    /// `true` iff `p` lies in the half-open box `[min, max)`, the canonical
    /// boundary predicate this crate uses everywhere a point must be
    /// assigned to exactly one side of a shared boundary (see
    /// `partition::Grid` and `DESIGN.md`).
    pub fn contains_half_open(&self, p: &Point<f64, D>) -> bool {
        (0..D).all(|i| p.coords[i] >= self.min[i] && p.coords[i] < self.max[i])
    }

    pub fn add_point(&mut self, p: &Point<f64, D>) {
        for i in 0..D {
            self.min[i] = self.min[i].min(p.coords[i]);
            self.max[i] = self.max[i].max(p.coords[i]);
        }
    }

    pub fn add_bbox(&mut self, other: &Bbox<D>) {
        for i in 0..D {
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    /// `"min0 max0 min1 max1 ..."`, the text stream form spec.md §3
    /// attributes to `Bbox`.
    pub fn to_text(&self) -> String {
        let mut parts = Vec::with_capacity(2 * D);
        for i in 0..D {
            parts.push(self.min[i].to_string());
            parts.push(self.max[i].to_string());
        }
        parts.join(" ")
    }

    pub fn from_text(s: &str) -> Result<Self, &'static str> {
        let numbers: Vec<f64> = s
            .split_whitespace()
            .map(|tok| tok.parse::<f64>().map_err(|_| "invalid bbox number"))
            .collect::<Result<_, _>>()?;
        if numbers.len() != 2 * D {
            return Err("wrong number of bbox fields");
        }
        let mut min = [0.0; D];
        let mut max = [0.0; D];
        for i in 0..D {
            min[i] = numbers[2 * i];
            max[i] = numbers[2 * i + 1];
        }
        Ok(Bbox { min, max })
    }
}

impl<const D: usize> std::ops::AddAssign<&Point<f64, D>> for Bbox<D> {
    fn add_assign(&mut self, p: &Point<f64, D>) {
        self.add_point(p);
    }
}

impl<const D: usize> std::ops::AddAssign<&Bbox<D>> for Bbox<D> {
    fn add_assign(&mut self, other: &Bbox<D>) {
        self.add_bbox(other);
    }
}

/// The set of operations the rest of this crate needs from a single-tile
/// Delaunay kernel (spec.md §6.1): construction, insertion, finite/infinite
/// distinction, point/data access, 1-skeleton adjacency, cell enumeration
/// and a structural validity check. `delaunay_core::Tds` is the concrete,
/// in-crate implementation below.
pub trait Kernel<U, V, const D: usize>: Default {
    fn insert(&mut self, point: Point<Scalar, D>, data: U) -> (Uuid, bool);
    fn bulk_insert<F: FnMut() -> U>(&mut self, points: Vec<Point<Scalar, D>>, make_data: F) -> Vec<Uuid>;
    fn is_infinite_vertex(&self, id: Uuid) -> bool;
    fn vertex_point(&self, id: Uuid) -> Option<Point<Scalar, D>>;
    fn vertex_data(&self, id: Uuid) -> Option<&U>;
    fn finite_vertex_uuids(&self) -> Vec<Uuid>;
    fn number_of_finite_vertices(&self) -> usize;
    fn finite_vertex_neighbors(&self, id: Uuid) -> HashSet<Uuid>;
    fn finite_cells(&self) -> Box<dyn Iterator<Item = &Cell<Scalar, U, V, D>> + '_>;
    fn is_valid(&self) -> Result<(), String>;
}

impl<U, V, const D: usize> Kernel<U, V, D> for Tds<Scalar, U, V, D>
where
    U: Clone + Default,
    V: Clone + Default,
{
    fn insert(&mut self, point: Point<Scalar, D>, data: U) -> (Uuid, bool) {
        Tds::insert(self, point, data)
    }

    fn bulk_insert<F: FnMut() -> U>(&mut self, points: Vec<Point<Scalar, D>>, make_data: F) -> Vec<Uuid> {
        Tds::bulk_insert(self, points, make_data)
    }

    fn is_infinite_vertex(&self, id: Uuid) -> bool {
        Tds::is_infinite_vertex(self, id)
    }

    fn vertex_point(&self, id: Uuid) -> Option<Point<Scalar, D>> {
        Tds::vertex_point(self, id)
    }

    fn vertex_data(&self, id: Uuid) -> Option<&U> {
        Tds::vertex_data(self, id)
    }

    fn finite_vertex_uuids(&self) -> Vec<Uuid> {
        Tds::finite_vertex_uuids(self)
    }

    fn number_of_finite_vertices(&self) -> usize {
        Tds::number_of_finite_vertices(self)
    }

    fn finite_vertex_neighbors(&self, id: Uuid) -> HashSet<Uuid> {
        Tds::finite_vertex_neighbors(self, id)
    }

    fn finite_cells(&self) -> Box<dyn Iterator<Item = &Cell<Scalar, U, V, D>> + '_> {
        Box::new(Tds::finite_cells(self))
    }

    fn is_valid(&self) -> Result<(), String> {
        Tds::is_valid(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bbox_accumulates_points() {
        let mut b = Bbox::<2>::empty();
        assert!(b.is_empty());
        b.add_point(&Point::new([1.0, 2.0]));
        b.add_point(&Point::new([-1.0, 5.0]));
        assert!(!b.is_empty());
        assert_eq!(b.min(), [-1.0, 2.0]);
        assert_eq!(b.max(), [1.0, 5.0]);
    }

    #[test]
    fn bbox_text_round_trips() {
        let mut b = Bbox::<2>::empty();
        b.add_point(&Point::new([1.0, 2.0]));
        b.add_point(&Point::new([3.0, 4.0]));
        let text = b.to_text();
        let parsed = Bbox::<2>::from_text(&text).unwrap();
        assert_eq!(parsed, b);
    }

    #[test]
    fn bbox_half_open_excludes_max_boundary() {
        let mut b = Bbox::<1>::empty();
        b.add_point(&Point::new([0.0]));
        b.add_point(&Point::new([1.0]));
        assert!(b.contains_half_open(&Point::new([0.0])));
        assert!(!b.contains_half_open(&Point::new([1.0])));
    }

    #[test]
    fn tds_implements_kernel_trait() {
        fn assert_kernel<K: Kernel<(), (), 2>>() {}
        assert_kernel::<Tds<Scalar, (), (), 2>>();
    }
}
