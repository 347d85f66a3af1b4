//! A tile's local Delaunay triangulation plus its per-vertex home-tile
//! bookkeeping (spec.md §4.3). Grounded on the intent of
//! `delaunay_core::triangulation_data_structure`'s `supercell`/
//! `bowyer_watson` sketch together with `original_source/DDT/Tile.h` and
//! `insert.h`'s `splay_tile`.
//!
//! Cell data is fixed to `()`: main-simplex ownership is derived on demand
//! from a `Selector` rather than cached per cell (`original_source` never
//! stores it either — `main id` is always recomputed from the cell's
//! vertex homes).

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Serialize};

use crate::delaunay_core::{cell::Cell, point::Point, triangulation_data_structure::Tds};
use crate::geometry::{Bbox, Scalar, VertexData};
use crate::select::Selector;
use crate::tile_id::TileId;

pub type TileCell<Info, const D: usize> = Cell<Scalar, VertexData<TileId, Info>, (), D>;

pub struct Tile<Info, const D: usize> {
    id: TileId,
    tds: Tds<Scalar, VertexData<TileId, Info>, (), D>,
    bbox: Bbox<D>,
}

impl<Info, const D: usize> Tile<Info, D>
where
    Info: Clone + Default,
{
    pub fn new(id: TileId) -> Self {
        Tile {
            id,
            tds: Tds::new(Vec::new()),
            bbox: Bbox::empty(),
        }
    }

    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn bbox(&self) -> Bbox<D> {
        self.bbox
    }

    /// The point bbox of a single vertex (a degenerate, zero-volume box).
    pub fn vertex_bbox(&self, v: Uuid) -> Option<Bbox<D>> {
        self.tds.vertex_point(v).map(|p| {
            let mut b = Bbox::empty();
            b.add_point(&p);
            b
        })
    }

    pub fn home_id(&self, v: Uuid) -> Option<TileId> {
        self.tds.vertex_data(v).map(|d| d.id)
    }

    /// The opaque user payload carried by vertex `v`, independent of its
    /// home id. Used when forwarding a foreign vertex onward: the
    /// recipient tile needs the original `Info`, not this tile's.
    pub fn vertex_info(&self, v: Uuid) -> Option<Info> {
        self.tds.vertex_data(v).map(|d| d.info.clone())
    }

    pub fn point(&self, v: Uuid) -> Option<Point<Scalar, D>> {
        self.tds.vertex_point(v)
    }

    pub fn number_of_vertices(&self) -> usize {
        self.tds.number_of_finite_vertices()
    }

    /// Count of vertices whose home is this tile, excluding foreign
    /// copies held only because they are Delaunay-adjacent to a local
    /// vertex (spec.md §3 "local" vs "foreign").
    pub fn number_of_local_vertices(&self) -> usize {
        self.tds
            .finite_vertex_uuids()
            .into_iter()
            .filter(|&v| self.home_id(v) == Some(self.id))
            .count()
    }

    pub fn finite_cells(&self) -> impl Iterator<Item = &TileCell<Info, D>> {
        self.tds.finite_cells()
    }

    /// Attempts to insert every point in `points`, tagging any vertex this
    /// call actually creates with the home id carried alongside it
    /// (duplicates are a no-op). Each point names its own home tile rather
    /// than all sharing one: a tile's inbox mixes locally-partitioned
    /// points with foreign vertices forwarded from peers, and spec.md §4.1
    /// forbids re-deriving a point's home from its coordinates, so the
    /// home id must travel with the point instead. Returns the uuids of
    /// vertices actually created.
    pub fn insert(&mut self, points: Vec<(Point<Scalar, D>, TileId, Info)>) -> Vec<Uuid> {
        let mut inserted = Vec::with_capacity(points.len());
        for (point, home_id, info) in points {
            let (uuid, is_new) = self.tds.insert(point, VertexData::new(home_id, info));
            if is_new {
                self.bbox.add_point(&point);
                inserted.push(uuid);
            }
        }
        inserted
    }

    /// For each vertex of `vertices`, the finite neighbor vertices *not*
    /// already in `vertices`, grouped by their home tile (spec.md §4.3).
    pub fn finite_neighbors(&self, vertices: &[Uuid]) -> HashMap<TileId, HashSet<Uuid>> {
        let present: HashSet<Uuid> = vertices.iter().copied().collect();
        let mut result: HashMap<TileId, HashSet<Uuid>> = HashMap::new();
        for &v in vertices {
            for n in self.tds.finite_vertex_neighbors(v) {
                if present.contains(&n) {
                    continue;
                }
                if let Some(data) = self.tds.vertex_data(n) {
                    result.entry(data.id).or_default().insert(n);
                }
            }
        }
        result
    }

    /// Up to `2*D` vertices minimizing/maximizing each coordinate axis —
    /// the bootstrap full-graph propagation seed (spec.md §4.3, §4.8).
    pub fn axis_extreme_points(&self) -> Vec<Uuid> {
        let finite = self.tds.finite_vertex_uuids();
        if finite.is_empty() {
            return Vec::new();
        }
        let mut extremes = HashSet::new();
        for axis in 0..D {
            let mut min_v = finite[0];
            let mut max_v = finite[0];
            let mut min_c = self.tds.vertex_point(min_v).unwrap().coords[axis];
            let mut max_c = min_c;
            for &v in &finite {
                let c = self.tds.vertex_point(v).unwrap().coords[axis];
                if c < min_c {
                    min_c = c;
                    min_v = v;
                }
                if c > max_c {
                    max_c = c;
                    max_v = v;
                }
            }
            extremes.insert(min_v);
            extremes.insert(max_v);
        }
        extremes.into_iter().collect()
    }

    /// Vertices lying on the current bbox boundary — used for the
    /// bounding propagation step (spec.md §4.3).
    pub fn get_bbox_points(&self) -> Vec<Uuid> {
        let min = self.bbox.min();
        let max = self.bbox.max();
        self.tds
            .finite_vertex_uuids()
            .into_iter()
            .filter(|&v| {
                let p = self.tds.vertex_point(v).unwrap();
                (0..D).any(|i| p.coords[i] == min[i] || p.coords[i] == max[i])
            })
            .collect()
    }

    /// The Selector-elected owner of `cell`: `Selector({home(v) : v in
    /// cell})` (spec.md I3).
    pub fn main_id<S: Selector<TileId>>(&self, cell: &TileCell<Info, D>, selector: &mut S) -> TileId {
        selector.clear();
        for v in &cell.vertices {
            if let Some(data) = &v.data {
                selector.insert(data.id);
            }
        }
        selector.select().unwrap_or(self.id)
    }

    /// Kernel-internal validity plus the locally checkable half of I1:
    /// every foreign vertex held by this tile is incident to at least one
    /// finite cell that also has a local vertex (otherwise it has no
    /// business being here). I2-I4 are cross-tile properties checked by
    /// `engine::Engine::is_valid`.
    pub fn is_valid(&self) -> Result<(), String> {
        self.tds.is_valid()?;
        for v in self.tds.finite_vertex_uuids() {
            let Some(data) = self.tds.vertex_data(v) else { continue };
            if data.id == self.id {
                continue;
            }
            let justified = self.tds.finite_cells().any(|cell| {
                cell.contains_vertex_uuid(v)
                    && cell.vertices.iter().any(|other| {
                        other
                            .data
                            .as_ref()
                            .map(|d| d.id == self.id)
                            .unwrap_or(false)
                    })
            });
            if !justified {
                return Err(format!(
                    "tile {}: foreign vertex {} is not incident to any local finite cell (I1 violation)",
                    self.id, v
                ));
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<Info, const D: usize> Tile<Info, D>
where
    Info: Clone + Default + Serialize + DeserializeOwned,
{
    /// `bbox`, newline, then the kernel's native triangulation stream
    /// (spec.md §4.5 file format).
    pub fn to_text(&self) -> serde_json::Result<String> {
        Ok(format!("{}\n{}", self.bbox.to_text(), self.tds.to_text()?))
    }

    pub fn from_text(id: TileId, s: &str) -> Result<Self, String> {
        let (bbox_line, rest) = s.split_once('\n').ok_or("missing bbox line")?;
        let bbox = Bbox::from_text(bbox_line)?;
        let tds = Tds::from_text(rest).map_err(|e| e.to_string())?;
        Ok(Tile { id, tds, bbox })
    }
}
