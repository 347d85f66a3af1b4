//! Exact-enough geometric predicates for the incremental Bowyer-Watson
//! insertion, built on `nalgebra`'s dynamically sized matrices so the same
//! code serves every dimension `D` without const-generic arithmetic on `D`.

use nalgebra::DMatrix;

use super::point::Point;

/// Sign of the determinant of the `(D+1) x (D+1)` matrix whose rows are
/// `[p_i, 1]` for each of the `D+1` points in `simplex`. A simplex's
/// vertex order is consistently oriented when this sign is constant across
/// insertions; this crate does not rely on a fixed orientation convention,
/// it only needs `in_sphere` below to be self-consistent, which holds
/// regardless of sign as long as both determinants are built the same way.
fn orientation_determinant<const D: usize>(simplex: &[Point<f64, D>]) -> f64 {
    debug_assert_eq!(simplex.len(), D + 1);
    let n = D + 1;
    let mut m = DMatrix::<f64>::zeros(n, n);
    for (row, p) in simplex.iter().enumerate() {
        for col in 0..D {
            m[(row, col)] = p.coords[col];
        }
        m[(row, D)] = 1.0;
    }
    m.determinant()
}

/// The lifted-paraboloid in-sphere predicate: returns `true` iff `query`
/// lies strictly inside the circumsphere of the `D+1` points in `simplex`.
///
/// Builds the standard `(D+2) x (D+2)` determinant with rows
/// `[p_i - query, |p_i - query|^2]` for each simplex vertex plus the query
/// point itself and tests its sign against the simplex's own orientation,
/// so the answer does not depend on vertex ordering.
pub fn in_circumsphere<const D: usize>(simplex: &[Point<f64, D>], query: &Point<f64, D>) -> bool {
    debug_assert_eq!(simplex.len(), D + 1);
    let orientation = orientation_determinant(simplex);
    if orientation.abs() < f64::EPSILON {
        // Degenerate (near-)cosphericity of the simplex itself: treat the
        // query as not strictly inside, matching the duplicate-point
        // no-op policy of never subdividing on a degenerate witness.
        return false;
    }
    let n = D + 2;
    let mut m = DMatrix::<f64>::zeros(n, n);
    let rows = simplex.iter().chain(std::iter::once(query));
    for (row, p) in rows.enumerate() {
        let mut sq = 0.0;
        for col in 0..D {
            let d = p.coords[col] - query.coords[col];
            m[(row, col)] = d;
            sq += d * d;
        }
        m[(row, D)] = sq;
        m[(row, D + 1)] = 1.0;
    }
    let det = m.determinant();
    // The lifted determinant's sign relative to `orientation` is strictly
    // positive iff `query` is inside the circumsphere.
    (det > 0.0) == (orientation > 0.0) && det.abs() > f64::EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_point_is_inside_unit_triangle_circumcircle() {
        let simplex = vec![
            Point::new([0.0, 0.0]),
            Point::new([1.0, 0.0]),
            Point::new([0.0, 1.0]),
        ];
        let inside = Point::new([0.3, 0.3]);
        let outside = Point::new([10.0, 10.0]);
        assert!(in_circumsphere(&simplex, &inside));
        assert!(!in_circumsphere(&simplex, &outside));
    }

    #[test]
    fn works_in_3d() {
        let simplex = vec![
            Point::new([0.0, 0.0, 0.0]),
            Point::new([1.0, 0.0, 0.0]),
            Point::new([0.0, 1.0, 0.0]),
            Point::new([0.0, 0.0, 1.0]),
        ];
        let inside = Point::new([0.2, 0.2, 0.2]);
        let outside = Point::new([50.0, 50.0, 50.0]);
        assert!(in_circumsphere(&simplex, &inside));
        assert!(!in_circumsphere(&simplex, &outside));
    }
}
