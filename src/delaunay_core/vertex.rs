//! A vertex is a [`Point`] tagged with a uuid identity and optional opaque
//! user data, following the same shape as a [`super::cell::Cell`].

use std::collections::HashMap;
use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::point::Point;
use super::utilities::make_uuid;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex<T, U, const D: usize> {
    pub point: Point<T, D>,
    pub uuid: Uuid,
    pub data: Option<U>,
}

impl<T, U, const D: usize> Vertex<T, U, D> {
    /// A vertex carrying no user data.
    pub fn new(point: Point<T, D>) -> Self {
        Vertex {
            point,
            uuid: make_uuid(),
            data: None,
        }
    }

    /// A vertex carrying `data`.
    pub fn new_with_data(point: Point<T, D>, data: U) -> Self {
        Vertex {
            point,
            uuid: make_uuid(),
            data: Some(data),
        }
    }

    /// Converts a list of points into fresh, uniquely identified vertices.
    pub fn from_points(points: Vec<Point<T, D>>) -> Vec<Self> {
        points.into_iter().map(Vertex::new).collect()
    }

    /// Indexes a list of vertices by their uuid.
    pub fn into_hashmap(vertices: Vec<Self>) -> HashMap<Uuid, Self> {
        vertices.into_iter().map(|v| (v.uuid, v)).collect()
    }
}
