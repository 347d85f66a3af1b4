//! A facet is a cell together with the index of the one vertex it omits —
//! the usual `(Cell_handle, int)` pair from CGAL, adapted to this crate's
//! value-owning `Cell`.

use super::{cell::Cell, vertex::Vertex};

#[derive(Clone, Debug)]
pub struct Facet<T, U, V, const D: usize> {
    pub cell: Cell<T, U, V, D>,
    /// Index into `cell.vertices` of the vertex opposite this facet.
    pub opposite: usize,
}

impl<T, U, V, const D: usize> Facet<T, U, V, D>
where
    T: Clone,
    U: Clone,
    V: Clone,
{
    pub fn new(cell: Cell<T, U, V, D>, opposite: usize) -> Self {
        Facet { cell, opposite }
    }

    /// The `D` vertices of this facet, in the cell's original order, minus
    /// the one opposite vertex.
    pub fn vertices(&self) -> Vec<&Vertex<T, U, D>> {
        self.cell
            .vertices
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.opposite)
            .map(|(_, v)| v)
            .collect()
    }

    pub fn is_infinite(&self) -> bool {
        self.cell.infinite
    }
}
