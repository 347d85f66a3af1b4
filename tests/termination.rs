//! spec.md §8 scenario 5: a pathological distribution with one point per
//! tile, the tiles themselves arranged collinearly (a 5x1 grid), checking
//! that bootstrap's axis-extreme broadcast is enough for the splay loop to
//! reach a fixed point — every inbox empty, every tile internally valid —
//! without pathological re-propagation. `Scheduler::for_each_rec` doesn't
//! expose a round counter through its public contract (see `DESIGN.md`),
//! so this test checks the convergence property it guarantees rather than
//! literally counting rounds.

use ddt::config::EngineConfigBuilder;
use ddt::delaunay_core::point::Point;
use ddt::engine::Engine;
use ddt::geometry::Bbox;
use ddt::partition::Grid;
use ddt::scheduler::Sequential;
use ddt::select::Min;
use ddt::serializer::NoSerializer;
use ddt::TileId;

#[test]
fn one_point_per_collinear_tile_converges_with_every_inbox_empty() {
    let mut bbox = Bbox::<2>::empty();
    bbox.add_point(&Point::new([0.0, 0.0]));
    bbox.add_point(&Point::new([5.0, 1.0]));
    let partitioner = Grid::<2>::new(bbox, [5, 1]);

    let config = EngineConfigBuilder::default().build_validated().unwrap();
    let engine: Engine<(), NoSerializer, Grid<2>, Min<TileId>, Sequential, 2> =
        Engine::new(config, partitioner, NoSerializer, Sequential).unwrap();

    // One point per tile; a small per-tile y jitter avoids a fully
    // degenerate (zero-area) global point set while keeping the tiles
    // themselves arranged in a single row.
    let points: Vec<(Point<f64, 2>, ())> = (0..5)
        .map(|i| (Point::new([i as f64 + 0.5, 0.1 * (i % 2) as f64]), ()))
        .collect();
    engine.insert(points);

    assert!(engine.is_valid().is_ok());
    assert_eq!(engine.number_of_vertices().unwrap(), 5);
}
