//! Small helpers shared across the kernel: uuid minting and coordinate-wise
//! reductions used to size the bootstrap supercell.

use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use super::vertex::Vertex;

/// Mints a fresh random uuid for a new vertex or cell.
pub fn make_uuid() -> Uuid {
    Uuid::new_v4()
}

/// Reduces the coordinates of `vertices` component-wise, keeping the
/// minimum (`Ordering::Less`) or the maximum (`Ordering::Greater`) along
/// each axis. Used by [`super::triangulation_data_structure::Tds::supercell`]
/// to size a simplex that encloses every input point.
///
/// # Panics
///
/// Panics if `vertices` is empty; the caller is expected to only invoke
/// this once at least one vertex has been added.
pub fn find_extreme_coordinates<T, U, const D: usize>(
    vertices: HashMap<Uuid, Vertex<T, U, D>>,
    order: Ordering,
) -> [T; D]
where
    T: PartialOrd + Copy,
{
    let mut iter = vertices.into_values();
    let first = iter
        .next()
        .expect("find_extreme_coordinates requires at least one vertex");
    let mut extreme = first.point.coords;
    for vertex in iter {
        for i in 0..D {
            let c = vertex.point.coords[i];
            let keep = match order {
                Ordering::Less => c < extreme[i],
                Ordering::Greater => c > extreme[i],
                Ordering::Equal => false,
            };
            if keep {
                extreme[i] = c;
            }
        }
    }
    extreme
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delaunay_core::point::Point;

    #[test]
    fn extreme_coordinates_min_and_max() {
        let mut vertices = HashMap::new();
        for p in [[1.0, 5.0], [4.0, 2.0], [-3.0, 9.0]] {
            let v: Vertex<f64, (), 2> = Vertex::new(Point::new(p));
            vertices.insert(v.uuid, v);
        }
        let min = find_extreme_coordinates(vertices.clone(), Ordering::Less);
        let max = find_extreme_coordinates(vertices, Ordering::Greater);
        assert_eq!(min, [-3.0, 2.0]);
        assert_eq!(max, [4.0, 9.0]);
    }
}
