use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{point::Point, utilities::make_uuid, vertex::Vertex};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Cell<T, U, V, const D: usize> {
    pub vertices: Vec<Vertex<T, U, D>>,
    pub uuid: Uuid,
    pub neighbors: Option<Vec<Uuid>>,
    pub data: Option<V>,
    /// `true` iff this cell is incident to one of the triangulation's
    /// bootstrap supercell vertices. Infinite cells have no circumcenter
    /// and never participate in `is_valid`, `finite_neighbors`, or any
    /// tile/main-simplex bookkeeping (spec.md glossary: "finite Delaunay
    /// simplex").
    pub infinite: bool,
}

impl<T, U, V, const D: usize> Cell<T, U, V, D> {
    pub fn new_with_data(vertices: Vec<Vertex<T, U, D>>, data: V) -> Self {
        let uuid = make_uuid();
        let neighbors = None;
        let data = Some(data);
        Cell {
            vertices,
            uuid,
            neighbors,
            data,
            infinite: false,
        }
    }

    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn new(vertices: Vec<Vertex<T, U, D>>) -> Self {
        let uuid = make_uuid();
        let neighbors = None;
        let data = None;
        Cell {
            vertices,
            uuid,
            neighbors,
            data,
            infinite: false,
        }
    }

    pub fn dim(&self) -> usize {
        D
    }

    /// `true` iff `uuid` names one of this cell's vertices.
    pub fn contains_vertex_uuid(&self, uuid: Uuid) -> bool {
        self.vertices.iter().any(|v| v.uuid == uuid)
    }

    /// Sorted vertex uuids, used as a cell-adjacency key that does not
    /// depend on vertex insertion order.
    pub fn vertex_key(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.vertices.iter().map(|v| v.uuid).collect();
        ids.sort();
        ids
    }

    /// The `D+1` facets of this cell, each omitting exactly one vertex.
    /// Returns `(omitted_index, sorted_uuids_of_the_remaining_vertices)`.
    pub fn facet_keys(&self) -> Vec<(usize, Vec<Uuid>)> {
        (0..self.vertices.len())
            .map(|skip| {
                let mut ids: Vec<Uuid> = self
                    .vertices
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != skip)
                    .map(|(_, v)| v.uuid)
                    .collect();
                ids.sort();
                (skip, ids)
            })
            .collect()
    }
}

impl<U, V, const D: usize> Cell<f64, U, V, D> {
    /// Does the circumsphere of this `D+1`-vertex cell strictly contain
    /// `vertex`'s point? Only meaningful for finite cells of maximal
    /// dimension (`number_of_vertices() == D + 1`).
    pub fn circumsphere_contains(&self, vertex: &Vertex<f64, U, D>) -> Result<bool, &'static str> {
        if self.vertices.len() != D + 1 {
            return Err("circumsphere_contains requires a maximal-dimension cell");
        }
        let simplex: Vec<Point<f64, D>> = self.vertices.iter().map(|v| v.point).collect();
        Ok(super::matrix::in_circumsphere(&simplex, &vertex.point))
    }
}
