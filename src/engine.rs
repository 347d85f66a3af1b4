//! The top-level driver (spec.md §6.5 "configuration") plus finalization
//! and queries (spec.md §4.9): `is_valid`, main-simplex counting, and the
//! tile-adjacency graph. Grounded on `original_source/DDT/algo/algo_ddt.hpp`
//! (the top-level `insert`/`splay` pipeline) and `Tile.h`'s
//! `get_adjacency_graph`.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::config::EngineConfig;
use crate::container::TileContainer;
use crate::delaunay_core::point::Point;
use crate::error::DdtError;
use crate::geometry::Scalar;
use crate::messaging::MessagingContainer;
use crate::partition::Partitioner;
use crate::scheduler::Scheduler;
use crate::select::Selector;
use crate::serializer::Serializer;
use crate::splay;
use crate::tile::{Tile, TileCell};
use crate::tile_id::TileId;

/// Canonical, home-id-based identity of a finite cell: stable across the
/// independent per-tile uuid copies of "the same" global simplex (spec.md
/// §9: "a vertex's canonical identity is `(home_id, coordinates)`").
/// `f64::to_bits` gives a total, hashable encoding of each coordinate.
type CellSignature<const D: usize> = Vec<(TileId, [u64; D])>;

fn cell_signature<Info, const D: usize>(cell: &TileCell<Info, D>) -> CellSignature<D> {
    let mut sig: Vec<(TileId, [u64; D])> = cell
        .vertices
        .iter()
        .map(|v| {
            let home = v.data.as_ref().map(|d| d.id).unwrap_or_default();
            let mut bits = [0u64; D];
            for (i, b) in bits.iter_mut().enumerate() {
                *b = v.point.coords[i].to_bits();
            }
            (home, bits)
        })
        .collect();
    sig.sort();
    sig
}

/// Wires a `Partitioner`, `Selector`, `Serializer` and `Scheduler` together
/// behind the bootstrap + star-splay pipeline (spec.md §4.8) and the
/// bounded tile container (spec.md §4.6). `Info` is the caller's opaque
/// per-point payload; `D` is the (compile-time) ambient dimension.
pub struct Engine<Info, Z, P, Sel, Sch, const D: usize> {
    config: EngineConfig,
    partitioner: P,
    scheduler: Sch,
    container: TileContainer<Info, Z, D>,
    messaging: MessagingContainer<Info, D>,
    _selector: PhantomData<Sel>,
}

impl<Info, Z, P, Sel, Sch, const D: usize> Engine<Info, Z, P, Sel, Sch, D>
where
    Info: Clone + Default + Send + Sync,
    Z: Serializer<Info, D> + Sync,
    P: Partitioner<D>,
    Sel: Selector<TileId> + Default,
    Sch: Scheduler,
{
    /// Validates `config` (§7 "invalid configuration is fatal at
    /// construction") before wiring up the tile container.
    pub fn new(config: EngineConfig, partitioner: P, serializer: Z, scheduler: Sch) -> Result<Self, DdtError> {
        config.validate()?;
        Ok(Engine {
            container: TileContainer::new(config.in_memory_budget, config.max_concurrency, serializer),
            messaging: MessagingContainer::new(),
            config,
            partitioner,
            scheduler,
            _selector: PhantomData,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn partitioner(&self) -> &P {
        &self.partitioner
    }

    /// Runs bootstrap (partition, initial insert, axis-extreme broadcast)
    /// followed by the star-splay loop to a fixed point (spec.md §4.8).
    /// Safe to call more than once with additional points: each call
    /// re-bootstraps only the points it is given and re-splays until
    /// quiescent.
    pub fn insert(&self, points: Vec<(Point<Scalar, D>, Info)>) {
        splay::bootstrap(&self.container, &self.messaging, &self.partitioner, &self.scheduler, points);
        splay::splay_stars(&self.container, &self.messaging, &self.scheduler, self.partitioner.ids());
    }

    fn with_tile<R>(&self, id: TileId, f: impl FnOnce(&Tile<Info, D>) -> R) -> Result<R, DdtError> {
        let guard = self.container.acquire(id)?;
        Ok(guard.with(f))
    }

    /// spec.md §4.9 `is_valid`: per-tile kernel validity plus I1-I3
    /// (`Tile::is_valid`), and the cross-tile reduce I4 requires — every
    /// finite cell held by any tile must also be recorded as *main* in
    /// exactly the tile its vertex homes elect.
    pub fn is_valid(&self) -> Result<(), DdtError> {
        let ids = self.partitioner.ids();
        let mut main_cells: HashMap<CellSignature<D>, TileId> = HashMap::new();
        let mut all_cells: Vec<(CellSignature<D>, TileId)> = Vec::new();

        for &id in &ids {
            self.with_tile(id, |tile| tile.is_valid())?
                .map_err(|message| DdtError::Kernel { tile_id: id, message })?;

            let mut selector = Sel::default();
            self.with_tile(id, |tile| {
                for cell in tile.finite_cells() {
                    let sig = cell_signature(cell);
                    if tile.main_id(cell, &mut selector) == id {
                        main_cells.insert(sig.clone(), id);
                    }
                    all_cells.push((sig, id));
                }
            })?;
        }

        for (sig, holder) in &all_cells {
            if !main_cells.contains_key(sig) {
                return Err(DdtError::Kernel {
                    tile_id: *holder,
                    message: "finite cell has no recorded main owner among resident tiles (I3/I4 violation)".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Total count of cells that are main somewhere: the size of the
    /// global Delaunay triangulation (spec.md §4.9 "main cells ... across
    /// all tiles").
    pub fn number_of_main_simplices(&self) -> Result<usize, DdtError> {
        let ids = self.partitioner.ids();
        let mut count = 0;
        for &id in &ids {
            let mut selector = Sel::default();
            count += self.with_tile(id, |tile| tile.finite_cells().filter(|cell| tile.main_id(cell, &mut selector) == id).count())?;
        }
        Ok(count)
    }

    /// Total count of local (non-foreign) vertices across every tile: the
    /// size of the global point set actually inserted.
    pub fn number_of_vertices(&self) -> Result<usize, DdtError> {
        let ids = self.partitioner.ids();
        let mut count = 0;
        for &id in &ids {
            count += self.with_tile(id, |tile| tile.number_of_local_vertices())?;
        }
        Ok(count)
    }

    /// spec.md §4.9 `adjacency_graph`: the multigraph whose edge `(T, T')`
    /// exists iff some cell main in `T` has a vertex whose home is `T'`.
    pub fn adjacency_graph(&self) -> Result<Vec<(TileId, TileId)>, DdtError> {
        let ids = self.partitioner.ids();
        let mut edges = Vec::new();
        for &id in &ids {
            let mut selector = Sel::default();
            self.with_tile(id, |tile| {
                for cell in tile.finite_cells() {
                    if tile.main_id(cell, &mut selector) != id {
                        continue;
                    }
                    for v in &cell.vertices {
                        if let Some(data) = &v.data {
                            if data.id != id {
                                edges.push((id, data.id));
                            }
                        }
                    }
                }
            })?;
        }
        Ok(edges)
    }

    /// spec.md §4.9 `tiles_begin/end`: the global, deduplicated vertex set
    /// (one entry per home vertex, across every tile). Each tile is
    /// pinned only for the duration of its own scan (the scoped-guard
    /// discipline spec.md §9 calls for), so this never holds more than one
    /// tile resident past what `with_tile` already needs. Feeds the `io`
    /// writers, which need the full point set rather than a lazy stream.
    pub fn main_vertex_points(&self) -> Result<Vec<Point<Scalar, D>>, DdtError> {
        let ids = self.partitioner.ids();
        let mut points = Vec::new();
        for &id in &ids {
            self.with_tile(id, |tile| {
                for v in tile.finite_cells().flat_map(|cell| cell.vertices.iter()) {
                    let Some(data) = &v.data else { continue };
                    if data.id == id {
                        points.push(v.point);
                    }
                }
            })?;
        }
        points.sort_by(|a, b| a.coords.partial_cmp(&b.coords).unwrap_or(std::cmp::Ordering::Equal));
        points.dedup_by(|a, b| a.coords == b.coords);
        Ok(points)
    }

    /// spec.md §4.9 `tiles_begin/end`, iteration over main cells: every
    /// finite cell's vertex coordinates, restricted to the tile that holds
    /// it *main* (so each global simplex appears exactly once).
    pub fn main_cells(&self) -> Result<Vec<Vec<[Scalar; D]>>, DdtError> {
        let ids = self.partitioner.ids();
        let mut cells = Vec::new();
        for &id in &ids {
            let mut selector = Sel::default();
            self.with_tile(id, |tile| {
                for cell in tile.finite_cells() {
                    if tile.main_id(cell, &mut selector) != id {
                        continue;
                    }
                    cells.push(cell.vertices.iter().map(|v| v.point.coords).collect());
                }
            })?;
        }
        Ok(cells)
    }

    /// The same global mesh as [`Self::main_vertex_points`]/[`Self::main_cells`],
    /// reshaped into the deduplicated-point-array-plus-index-list form
    /// `io::vtu::write_vtu` and `io::ply::write_points` actually take: one
    /// entry in `.0` per distinct vertex, each cell in `.1` a list of
    /// indices into `.0` rather than a repeated copy of its coordinates.
    pub fn main_mesh(&self) -> Result<(Vec<[Scalar; D]>, Vec<Vec<usize>>), DdtError> {
        let vertices = self.main_vertex_points()?;
        let mut index_of: HashMap<[u64; D], usize> = HashMap::with_capacity(vertices.len());
        let points: Vec<[Scalar; D]> = vertices
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let mut bits = [0u64; D];
                for (b, c) in bits.iter_mut().zip(p.coords.iter()) {
                    *b = c.to_bits();
                }
                index_of.insert(bits, i);
                p.coords
            })
            .collect();

        let cells = self.main_cells()?;
        let indexed = cells
            .into_iter()
            .map(|cell| {
                cell.iter()
                    .map(|coords| {
                        let mut bits = [0u64; D];
                        for (b, c) in bits.iter_mut().zip(coords.iter()) {
                            *b = c.to_bits();
                        }
                        index_of[&bits]
                    })
                    .collect()
            })
            .collect();
        Ok((points, indexed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfigBuilder;
    use crate::geometry::Bbox;
    use crate::partition::{Constant, Grid};
    use crate::scheduler::Sequential;
    use crate::select::{Max, Median, Min};
    use crate::serializer::NoSerializer;

    fn unit_square_engine<Sel: Selector<TileId> + Default>(
    ) -> Engine<(), NoSerializer, Constant, Sel, Sequential, 2> {
        let config = EngineConfigBuilder::default().build_validated().unwrap();
        Engine::new(config, Constant::default(), NoSerializer, Sequential).unwrap()
    }

    #[test]
    fn single_tile_scenario_has_two_main_triangles_and_no_adjacency() {
        let engine = unit_square_engine::<Min<TileId>>();
        engine.insert(vec![
            (Point::new([0.0, 0.0]), ()),
            (Point::new([1.0, 0.0]), ()),
            (Point::new([0.0, 1.0]), ()),
            (Point::new([1.0, 1.0]), ()),
        ]);
        assert_eq!(engine.number_of_main_simplices().unwrap(), 2);
        assert!(engine.adjacency_graph().unwrap().is_empty());
        assert!(engine.is_valid().is_ok());
    }

    #[test]
    fn duplicate_insertion_leaves_main_simplex_count_unchanged() {
        let engine = unit_square_engine::<Min<TileId>>();
        let points = || {
            vec![
                (Point::new([0.0, 0.0]), ()),
                (Point::new([1.0, 0.0]), ()),
                (Point::new([0.0, 1.0]), ()),
                (Point::new([1.0, 1.0]), ()),
            ]
        };
        engine.insert(points());
        engine.insert(points());
        assert_eq!(engine.number_of_vertices().unwrap(), 4);
        assert_eq!(engine.number_of_main_simplices().unwrap(), 2);
    }

    fn four_cell_grid_engine<Sel: Selector<TileId> + Default>(
    ) -> Engine<(), NoSerializer, Grid<2>, Sel, Sequential, 2> {
        let mut bbox = Bbox::<2>::empty();
        bbox.add_point(&Point::new([0.0, 0.0]));
        bbox.add_point(&Point::new([1.0, 1.0]));
        let config = EngineConfigBuilder::default().build_validated().unwrap();
        Engine::new(config, Grid::<2>::new(bbox, [2, 2]), NoSerializer, Sequential).unwrap()
    }

    fn four_cell_grid_points() -> Vec<(Point<Scalar, 2>, ())> {
        vec![
            (Point::new([0.1, 0.1]), ()),
            (Point::new([0.9, 0.1]), ()),
            (Point::new([0.5, 0.5]), ()),
            (Point::new([0.1, 0.9]), ()),
            (Point::new([0.9, 0.9]), ()),
        ]
    }

    #[test]
    fn four_cell_grid_has_four_main_simplices_under_every_selector() {
        for label in ["min", "max", "median"] {
            let count = match label {
                "min" => {
                    let engine = four_cell_grid_engine::<Min<TileId>>();
                    engine.insert(four_cell_grid_points());
                    engine.number_of_main_simplices().unwrap()
                }
                "max" => {
                    let engine = four_cell_grid_engine::<Max<TileId>>();
                    engine.insert(four_cell_grid_points());
                    engine.number_of_main_simplices().unwrap()
                }
                _ => {
                    let engine = four_cell_grid_engine::<Median<TileId>>();
                    engine.insert(four_cell_grid_points());
                    engine.number_of_main_simplices().unwrap()
                }
            };
            assert_eq!(count, 4, "selector {label} should still elect 4 main simplices total");
        }
    }

    #[test]
    fn four_cell_grid_is_valid_and_has_a_nonempty_adjacency_graph() {
        let engine = four_cell_grid_engine::<Median<TileId>>();
        engine.insert(four_cell_grid_points());
        assert!(engine.is_valid().is_ok());
        assert!(!engine.adjacency_graph().unwrap().is_empty());
    }

    #[test]
    fn main_vertex_points_has_one_entry_per_inserted_point() {
        let engine = four_cell_grid_engine::<Median<TileId>>();
        engine.insert(four_cell_grid_points());
        assert_eq!(engine.main_vertex_points().unwrap().len(), 5);
    }

    #[test]
    fn main_cells_count_matches_number_of_main_simplices() {
        let engine = four_cell_grid_engine::<Median<TileId>>();
        engine.insert(four_cell_grid_points());
        let cells = engine.main_cells().unwrap();
        assert_eq!(cells.len(), engine.number_of_main_simplices().unwrap());
        assert!(cells.iter().all(|c| c.len() == 3));
    }

    #[test]
    fn main_mesh_cell_indices_stay_within_the_point_array() {
        let engine = four_cell_grid_engine::<Median<TileId>>();
        engine.insert(four_cell_grid_points());
        let (points, cells) = engine.main_mesh().unwrap();
        assert_eq!(points.len(), 5);
        assert_eq!(cells.len(), engine.number_of_main_simplices().unwrap());
        for cell in &cells {
            assert_eq!(cell.len(), 3);
            for &idx in cell {
                assert!(idx < points.len());
            }
        }
    }
}
