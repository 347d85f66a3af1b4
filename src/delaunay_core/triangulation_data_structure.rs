//! Data and operations on d-dimensional triangulation data structures.
//!
//! Intended to match functionality of [CGAL Triangulations](https://doc.cgal.org/latest/Triangulation/index.html).
//!
//! `Tds` is the kernel this crate treats as the trusted, single-tile
//! Delaunay triangulation that the rest of the crate (`geometry::Kernel`,
//! `tile`, `splay`) is generic over. Insertion uses the textbook
//! Bowyer-Watson algorithm with a single bootstrap "super-simplex" that
//! encloses the whole working volume, in the spirit of the `supercell`
//! sketch this module's teacher left half-implemented.

use std::cmp::{min, Ordering};
use std::collections::{HashMap, HashSet};

#[cfg(feature = "serde")]
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use uuid::Uuid;

use super::utilities::find_extreme_coordinates;
use super::{cell::Cell, point::Point, vertex::Vertex};

/// Half-extent of the bootstrap super-simplex. Chosen generously relative
/// to the coordinate ranges used throughout this crate's test scenarios;
/// see `DESIGN.md` for why a fixed bound was chosen over dynamically
/// re-sizing the supercell.
const SUPER_SIMPLEX_RADIUS: f64 = 1.0e7;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
/// The `Tds` struct represents a triangulation data structure with vertices and cells, where the vertices
/// and cells are identified by UUIDs.
///
/// # Properties:
///
/// * `vertices`: A HashMap that stores vertices with their corresponding UUIDs as keys. Each `Vertex` has
/// a `Point` of type T, vertex data of type U, and a constant D representing the dimension.
/// * `cells`: The `cells` property is a `HashMap` that stores `Cell` objects. Each `Cell` has
/// one or more `Vertex<T, U, D>` with cell data of type V. Note the dimensionality of the cell may differ
/// from D, though the TDS only stores cells of maximal dimensionality D and infers other lower dimensional
/// cells from the maximal cells and their vertices.
///
/// For example, in 3 dimensions:
///
/// * A 0-dimensional cell is a `Vertex`.
/// * A 1-dimensional cell is an `Edge` given by the `Tetrahedron` and two `Vertex` endpoints.
/// * A 2-dimensional cell is a `Facet` given by the `Tetrahedron` and the opposite `Vertex`.
/// * A 3-dimensional cell is a `Tetrahedron`, the maximal cell.
///
/// A similar pattern holds for higher dimensions.
///
/// In general, vertices are embedded into D-dimensional Euclidean space, and so the `Tds` is a finite simplicial complex.
pub struct Tds<T, U, V, const D: usize> {
    /// A HashMap that stores vertices with their corresponding UUIDs as keys.
    pub vertices: HashMap<Uuid, Vertex<T, U, D>>,

    /// Maximal-dimension cells of the triangulation.
    pub cells: HashMap<Uuid, Cell<T, U, V, D>>,

    /// Uuids of the `D+1` bootstrap super-simplex vertices. Any cell
    /// incident to one of these is infinite.
    infinite_vertices: HashSet<Uuid>,
}

impl<T: std::default::Default + std::marker::Copy, U, V, const D: usize> Tds<T, U, V, D> {
    /// The function creates a new instance of a triangulation data structure with given points, initializing the vertices and
    /// cells.
    ///
    /// # Arguments:
    ///
    /// * `points`: A vector of points with which to initialize the triangulation.
    ///
    /// # Returns:
    ///
    /// A `Tds` with the given points registered as vertices but not yet triangulated;
    /// callers drive triangulation incrementally via [`Tds::insert`].
    pub fn new(points: Vec<Point<T, D>>) -> Self {
        let vertices = Vertex::into_hashmap(Vertex::from_points(points));
        Self {
            vertices,
            cells: HashMap::new(),
            infinite_vertices: HashSet::new(),
        }
    }

    /// The `add` function checks if a vertex with the same coordinates already exists in a hashmap, and
    /// if not, inserts the vertex into the hashmap.
    pub fn add(&mut self, vertex: Vertex<T, U, D>) -> Result<(), &'static str>
    where
        T: PartialEq,
    {
        for val in self.vertices.values() {
            if val.point.coords == vertex.point.coords {
                return Err("Vertex already exists");
            }
        }
        let result = self.vertices.insert(vertex.uuid, vertex);
        match result {
            Some(_) => Err("Uuid already exists"),
            None => Ok(()),
        }
    }

    /// The number of vertices in the triangulation data structure, including
    /// the bootstrap super-simplex ones.
    pub fn number_of_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// The number of *finite* vertices (excludes the bootstrap super-simplex).
    pub fn number_of_finite_vertices(&self) -> usize {
        self.vertices.len() - self.infinite_vertices.len()
    }

    /// The `dim` function returns the dimensionality of the triangulation data structure.
    pub fn dim(&self) -> i32 {
        let len = self.number_of_vertices() as i32;
        min(len - 1, D as i32)
    }

    /// The number of cells in the Tds (finite and infinite).
    pub fn number_of_cells(&self) -> usize {
        self.cells.len()
    }

    /// `true` iff `uuid` names one of the bootstrap super-simplex vertices.
    pub fn is_infinite_vertex(&self, uuid: Uuid) -> bool {
        self.infinite_vertices.contains(&uuid)
    }

    /// The point carried by vertex `uuid`, if it exists.
    pub fn vertex_point(&self, uuid: Uuid) -> Option<Point<T, D>> {
        self.vertices.get(&uuid).map(|v| v.point)
    }

    /// The opaque user data carried by vertex `uuid`, if it exists and has any.
    pub fn vertex_data(&self, uuid: Uuid) -> Option<&U> {
        self.vertices.get(&uuid).and_then(|v| v.data.as_ref())
    }

    /// All finite vertex uuids currently in the triangulation.
    pub fn finite_vertex_uuids(&self) -> Vec<Uuid> {
        self.vertices
            .keys()
            .copied()
            .filter(|id| !self.infinite_vertices.contains(id))
            .collect()
    }

    /// All finite cells.
    pub fn finite_cells(&self) -> impl Iterator<Item = &Cell<T, U, V, D>> {
        self.cells.values().filter(|c| !c.infinite)
    }

    /// The `supercell` function creates a larger cell that contains all the input vertices,
    /// with some padding added.
    fn supercell(&self) -> Result<Cell<T, U, V, D>, &'static str>
    where
        T: Copy + Default + PartialOrd + std::ops::SubAssign<f64> + std::ops::AddAssign<f64>,
        Vertex<T, U, D>: Clone,
    {
        let mut min_coords = find_extreme_coordinates(self.vertices.clone(), Ordering::Less);
        let mut max_coords = find_extreme_coordinates(self.vertices.clone(), Ordering::Greater);

        for elem in min_coords.iter_mut() {
            *elem -= 10.0;
        }
        for elem in max_coords.iter_mut() {
            *elem += 10.0;
        }

        let mut vertices = Vec::with_capacity(D + 1);
        vertices.push(Vertex::new(Point::new(min_coords)));
        for i in 0..D {
            let mut coords = min_coords;
            coords[i] = max_coords[i];
            vertices.push(Vertex::new(Point::new(coords)));
        }
        Ok(Cell::new(vertices))
    }
}

impl<U, V, const D: usize> Tds<f64, U, V, D>
where
    U: Clone,
    V: Clone,
{
    /// Builds the `D+1` vertices of a simplex that encloses the whole
    /// working volume, centered on the origin. See `SUPER_SIMPLEX_RADIUS`.
    fn super_simplex_points() -> Vec<Point<f64, D>> {
        let r = SUPER_SIMPLEX_RADIUS;
        let mut points = Vec::with_capacity(D + 1);
        points.push(Point::new([-r; D]));
        for i in 0..D {
            let mut coords = [-r; D];
            coords[i] = r * (D as f64 + 2.0);
            points.push(Point::new(coords));
        }
        points
    }

    /// Lazily creates the bootstrap super-simplex the first time it's
    /// needed. Idempotent.
    fn ensure_supercell(&mut self) {
        if !self.infinite_vertices.is_empty() {
            return;
        }
        let vertices: Vec<Vertex<f64, U, D>> =
            Self::super_simplex_points().into_iter().map(Vertex::new).collect();
        for v in &vertices {
            self.infinite_vertices.insert(v.uuid);
            self.vertices.insert(v.uuid, v.clone());
        }
        let mut cell = Cell::new(vertices);
        cell.infinite = true;
        self.cells.insert(cell.uuid, cell);
    }

    /// Inserts a single point, tagged with `data`, via incremental
    /// Bowyer-Watson. Returns `(uuid, true)` for a freshly created vertex,
    /// or `(uuid, false)` if a vertex with the same coordinates already
    /// existed (duplicate insertion is a silent no-op per spec.md §7).
    pub fn insert(&mut self, point: Point<f64, D>, data: U) -> (Uuid, bool) {
        if let Some(existing) = self
            .vertices
            .values()
            .find(|v| !self.infinite_vertices.contains(&v.uuid) && v.point.coords == point.coords)
        {
            return (existing.uuid, false);
        }

        self.ensure_supercell();

        let new_vertex = Vertex::new_with_data(point, data);
        let new_uuid = new_vertex.uuid;

        // Find every maximal cell whose circumsphere contains the new point.
        let bad: Vec<Uuid> = self
            .cells
            .values()
            .filter(|c| c.number_of_vertices() == D + 1)
            .filter(|c| c.circumsphere_contains(&new_vertex).unwrap_or(false))
            .map(|c| c.uuid)
            .collect();

        if bad.is_empty() {
            // Shouldn't happen once the supercell is in place (it covers
            // the whole working volume), but fall back to a plain insert
            // with no retriangulation rather than losing the point.
            self.vertices.insert(new_uuid, new_vertex);
            return (new_uuid, true);
        }
        let bad_set: HashSet<Uuid> = bad.iter().copied().collect();

        // Facet key -> incident cell uuids, across the whole triangulation,
        // so we can tell apart boundary facets (incident to exactly one bad
        // cell) from internal ones (incident to two bad cells).
        let mut facet_owners: HashMap<Vec<Uuid>, Vec<Uuid>> = HashMap::new();
        for cell in self.cells.values() {
            for (_, key) in cell.facet_keys() {
                facet_owners.entry(key).or_default().push(cell.uuid);
            }
        }

        let mut boundary_facets: Vec<Vec<Uuid>> = Vec::new();
        for cell_uuid in &bad {
            let cell = &self.cells[cell_uuid];
            for (_, key) in cell.facet_keys() {
                let owners = &facet_owners[&key];
                let bad_owners = owners.iter().filter(|o| bad_set.contains(o)).count();
                if bad_owners == 1 {
                    boundary_facets.push(key);
                }
            }
        }

        for cell_uuid in &bad {
            self.cells.remove(cell_uuid);
        }

        for facet in boundary_facets {
            let mut vertices: Vec<Vertex<f64, U, D>> = facet
                .iter()
                .map(|id| self.vertices[id].clone())
                .collect();
            vertices.push(new_vertex.clone());
            let mut cell = Cell::new(vertices);
            cell.infinite = cell.vertices.iter().any(|v| self.infinite_vertices.contains(&v.uuid));
            self.cells.insert(cell.uuid, cell);
        }

        self.vertices.insert(new_uuid, new_vertex);
        self.rebuild_neighbors();
        (new_uuid, true)
    }

    /// Inserts every point in `points`, tagging freshly created vertices
    /// with `home_id`-derived data via `make_data`. Returns the uuids of
    /// vertices that were actually created (duplicates are skipped).
    pub fn bulk_insert<F>(&mut self, points: Vec<Point<f64, D>>, mut make_data: F) -> Vec<Uuid>
    where
        F: FnMut() -> U,
    {
        let mut inserted = Vec::new();
        for p in points {
            let (uuid, is_new) = self.insert(p, make_data());
            if is_new {
                inserted.push(uuid);
            }
        }
        inserted
    }

    /// Recomputes every maximal cell's neighbor list by matching shared
    /// facets. `O(cells * (D+1))`, simple and correct; this kernel is
    /// explicitly out of this crate's performance scope (spec.md §1).
    fn rebuild_neighbors(&mut self) {
        let mut facet_owners: HashMap<Vec<Uuid>, Vec<Uuid>> = HashMap::new();
        for cell in self.cells.values() {
            for (_, key) in cell.facet_keys() {
                facet_owners.entry(key).or_default().push(cell.uuid);
            }
        }
        let neighbor_lists: HashMap<Uuid, Vec<Uuid>> = self
            .cells
            .values()
            .map(|cell| {
                let mut neighbors = Vec::new();
                for (_, key) in cell.facet_keys() {
                    for owner in &facet_owners[&key] {
                        if *owner != cell.uuid {
                            neighbors.push(*owner);
                        }
                    }
                }
                (cell.uuid, neighbors)
            })
            .collect();
        for (uuid, neighbors) in neighbor_lists {
            if let Some(cell) = self.cells.get_mut(&uuid) {
                cell.neighbors = Some(neighbors);
            }
        }
    }

    /// The finite 1-skeleton neighbors of vertex `v`: every other finite
    /// vertex that shares a finite cell with `v`.
    pub fn finite_vertex_neighbors(&self, v: Uuid) -> HashSet<Uuid> {
        let mut neighbors = HashSet::new();
        for cell in self.finite_cells() {
            if cell.contains_vertex_uuid(v) {
                for other in &cell.vertices {
                    if other.uuid != v {
                        neighbors.insert(other.uuid);
                    }
                }
            }
        }
        neighbors
    }

    /// Runs the kernel's own structural validity check: every maximal cell
    /// has exactly `D+1` distinct vertices, neighbor relations (where
    /// present) are symmetric, and no finite vertex lies strictly inside
    /// the circumsphere of a finite cell it is not part of (the Delaunay
    /// property).
    pub fn is_valid(&self) -> Result<(), String> {
        for cell in self.cells.values() {
            let mut ids: Vec<Uuid> = cell.vertices.iter().map(|v| v.uuid).collect();
            ids.sort();
            ids.dedup();
            if ids.len() != D + 1 {
                return Err(format!("cell {} does not have {} distinct vertices", cell.uuid, D + 1));
            }
            if let Some(neighbors) = &cell.neighbors {
                for n in neighbors {
                    let Some(nc) = self.cells.get(n) else {
                        return Err(format!("cell {} references missing neighbor {}", cell.uuid, n));
                    };
                    let back = nc.neighbors.as_ref().map(|ns| ns.contains(&cell.uuid)).unwrap_or(false);
                    if !back {
                        return Err(format!("asymmetric neighbor relation between {} and {}", cell.uuid, n));
                    }
                }
            }
        }
        for cell in self.finite_cells() {
            for vertex in self.vertices.values() {
                if cell.contains_vertex_uuid(vertex.uuid) || self.infinite_vertices.contains(&vertex.uuid) {
                    continue;
                }
                if cell.circumsphere_contains(vertex).unwrap_or(false) {
                    return Err(format!(
                        "vertex {} lies inside the circumsphere of finite cell {}: not Delaunay",
                        vertex.uuid, cell.uuid
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl<U, V, const D: usize> Tds<f64, U, V, D>
where
    U: Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Text stream serialization: readable JSON, the "text accepted" form
    /// of spec.md §4.5's stream contract.
    pub fn to_text(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Inverse of [`Tds::to_text`].
    pub fn from_text(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Binary stream serialization: compact `postcard` encoding, the
    /// "binary preferred" form of spec.md §4.5's stream contract.
    pub fn to_binary(&self) -> postcard::Result<Vec<u8>> {
        postcard::to_allocvec(self)
    }

    /// Inverse of [`Tds::to_binary`].
    pub fn from_binary(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn tds_new() {
        let points = vec![
            Point::new([1.0, 2.0, 3.0]),
            Point::new([4.0, 5.0, 6.0]),
            Point::new([7.0, 8.0, 9.0]),
            Point::new([10.0, 11.0, 12.0]),
        ];

        let tds: Tds<f64, usize, usize, 3> = Tds::new(points);

        assert_eq!(tds.number_of_vertices(), 4);
        assert_eq!(tds.number_of_cells(), 0);
        assert_eq!(tds.dim(), 3);
    }

    #[test]
    fn tds_add_dim() {
        let points: Vec<Point<f64, 3>> = Vec::new();
        let mut tds: Tds<f64, usize, usize, 3> = Tds::new(points);
        assert_eq!(tds.dim(), -1);

        for (i, p) in [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0], [10.0, 11.0, 12.0]]
            .into_iter()
            .enumerate()
        {
            let _ = tds.add(Vertex::new(Point::new(p)));
            assert_eq!(tds.number_of_vertices(), i + 1);
        }
    }

    #[test]
    fn tds_no_add() {
        let points = vec![Point::new([1.0, 2.0, 3.0])];
        let mut tds: Tds<f64, usize, usize, 3> = Tds::new(points);
        let result = tds.add(Vertex::new(Point::new([1.0, 2.0, 3.0])));
        assert_eq!(tds.number_of_vertices(), 1);
        assert!(result.is_err());
    }

    #[test]
    fn tds_supercell() {
        let points = vec![
            Point::new([1.0, 2.0, 3.0]),
            Point::new([4.0, 5.0, 6.0]),
            Point::new([7.0, 8.0, 9.0]),
            Point::new([10.0, 11.0, 12.0]),
        ];
        let tds: Tds<f64, usize, usize, 3> = Tds::new(points);
        let supercell = tds.supercell().unwrap();
        assert_eq!(supercell.vertices.len(), 4);
        assert!(supercell
            .vertices
            .iter()
            .any(|v| v.point.coords == [-9.0, -8.0, -7.0]));
    }

    #[test]
    fn single_triangle_insertion_creates_one_finite_cell() {
        let mut tds: Tds<f64, (), (), 2> = Tds::new(Vec::new());
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            tds.insert(Point::new(p), ());
        }
        assert_eq!(tds.number_of_finite_vertices(), 3);
        assert_eq!(tds.finite_cells().count(), 1);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn unit_square_has_two_finite_triangles() {
        let mut tds: Tds<f64, (), (), 2> = Tds::new(Vec::new());
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]] {
            tds.insert(Point::new(p), ());
        }
        assert_eq!(tds.finite_cells().count(), 2);
        assert!(tds.is_valid().is_ok());
    }

    #[test]
    fn duplicate_insertion_is_a_no_op() {
        let mut tds: Tds<f64, (), (), 2> = Tds::new(Vec::new());
        let (first, created) = tds.insert(Point::new([0.5, 0.5]), ());
        assert!(created);
        let (second, created_again) = tds.insert(Point::new([0.5, 0.5]), ());
        assert_eq!(first, second);
        assert!(!created_again);
        assert_eq!(tds.number_of_finite_vertices(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn tds_to_and_from_json() {
        let points = vec![
            Point::new([1.0, 2.0, 3.0, 4.0]),
            Point::new([5.0, 6.0, 7.0, 8.0]),
            Point::new([9.0, 10.0, 11.0, 12.0]),
            Point::new([13.0, 14.0, 15.0, 16.0]),
        ];
        let tds: Tds<f64, usize, usize, 4> = Tds::new(points);
        let serialized = tds.to_text().unwrap();
        assert!(serialized.contains("[1.0,2.0,3.0,4.0]"));
        let deserialized: Tds<f64, usize, usize, 4> = Tds::from_text(&serialized).unwrap();
        assert_eq!(deserialized, tds);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn tds_round_trips_through_binary() {
        let mut tds: Tds<f64, (), (), 2> = Tds::new(Vec::new());
        for p in [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]] {
            tds.insert(Point::new(p), ());
        }
        let bytes = tds.to_binary().unwrap();
        let roundtripped: Tds<f64, (), (), 2> = Tds::from_binary(&bytes).unwrap();
        assert_eq!(roundtripped.finite_cells().count(), tds.finite_cells().count());
    }
}
