//! Bootstrap + star-splay loop (spec.md §4.8), ported in spirit from
//! `original_source/DDT/insert.h`'s `insert_and_send_all_axis_extreme_points`
//! and `splay_stars`. Both are expressed here as plain functions over a
//! `TileContainer` + `MessagingContainer` pair rather than methods on
//! `Engine`, so they can be unit-tested without pulling in a `Partitioner`/
//! `Selector`/`Scheduler` combination.

use std::collections::HashSet;

use crate::container::TileContainer;
use crate::delaunay_core::point::Point;
use crate::geometry::Scalar;
use crate::logging;
use crate::messaging::MessagingContainer;
use crate::partition::Partitioner;
use crate::scheduler::Scheduler;
use crate::serializer::Serializer;
use crate::tile_id::TileId;

/// Drains `id`'s inbox, inserts the received points into its local
/// triangulation, and queues every newly discovered finite neighbor whose
/// home is some other tile onto that tile's inbox (ported from
/// `insert.h::splay_tile`). Returns the set of tiles that received at
/// least one point plus the total number of points forwarded to other
/// tiles (the quantity spec.md §4.8's reduce accumulates).
fn splay_tile<Info, Z, const D: usize>(
    container: &TileContainer<Info, Z, D>,
    messaging: &MessagingContainer<Info, D>,
    id: TileId,
) -> (HashSet<TileId>, usize)
where
    Info: Clone + Default,
    Z: Serializer<Info, D>,
{
    let received = messaging.take_inbox(id);
    if received.is_empty() {
        return (HashSet::new(), 0);
    }
    let guard = container.acquire(id).expect("pin must succeed while draining a nonempty inbox");
    let inserted = guard.with_mut(|tile| tile.insert(received));
    if inserted.is_empty() {
        return (HashSet::new(), 0);
    }

    let neighbor_map = guard.with(|tile| tile.finite_neighbors(&inserted));
    let mut destinations = HashSet::new();
    for (home, vertices) in &neighbor_map {
        if *home == id {
            continue;
        }
        for &v in vertices {
            let point = guard.with(|tile| tile.point(v).expect("neighbor vertex must have a point"));
            let info = guard.with(|tile| tile.vertex_info(v).unwrap_or_default());
            messaging.push_outbox(id, *home, point, *home, info);
        }
        destinations.insert(*home);
    }
    drop(guard);
    let sent = messaging.send_points(id);
    (destinations, sent)
}

/// One tile's share of the bootstrap pass: insert its initial inbox (the
/// points the `Partitioner` just assigned it), forward newly discovered
/// foreign neighbors, then broadcast this tile's axis-extreme vertices to
/// every other tile so later splay rounds are guaranteed to converge
/// (spec.md §4.8 step 3).
fn bootstrap_tile<Info, Z, const D: usize>(
    container: &TileContainer<Info, Z, D>,
    messaging: &MessagingContainer<Info, D>,
    all_ids: &[TileId],
    id: TileId,
) where
    Info: Clone + Default,
    Z: Serializer<Info, D>,
{
    let received = messaging.take_inbox(id);
    let guard = container.acquire(id).expect("pin must succeed during bootstrap");
    if !received.is_empty() {
        let inserted = guard.with_mut(|tile| tile.insert(received));
        if !inserted.is_empty() {
            let neighbor_map = guard.with(|tile| tile.finite_neighbors(&inserted));
            for (home, vertices) in &neighbor_map {
                if *home == id {
                    continue;
                }
                for &v in vertices {
                    let point = guard.with(|tile| tile.point(v).expect("neighbor vertex must have a point"));
                    let info = guard.with(|tile| tile.vertex_info(v).unwrap_or_default());
                    messaging.push_outbox(id, *home, point, *home, info);
                }
            }
        }
    }

    let extremes = guard.with(|tile| tile.axis_extreme_points());
    let broadcast: Vec<(Point<Scalar, D>, TileId, Info)> = extremes
        .iter()
        .map(|&v| {
            guard.with(|tile| {
                (
                    tile.point(v).expect("extreme vertex must have a point"),
                    tile.home_id(v).unwrap_or(id),
                    tile.vertex_info(v).unwrap_or_default(),
                )
            })
        })
        .collect();
    drop(guard);

    messaging.send_points(id);
    let peers = all_ids.iter().copied().filter(|&p| p != id);
    messaging.send_extreme_points(&broadcast, peers);
}

/// Step 1-4 of spec.md §4.8: partitions `points` into per-tile inboxes,
/// then (in whatever parallelism `scheduler` provides) inserts each tile's
/// share, forwards newly discovered foreign neighbors, and broadcasts
/// every tile's axis-extreme vertices to its peers.
pub fn bootstrap<Info, Z, P, S, const D: usize>(
    container: &TileContainer<Info, Z, D>,
    messaging: &MessagingContainer<Info, D>,
    partitioner: &P,
    scheduler: &S,
    points: Vec<(Point<Scalar, D>, Info)>,
) where
    Info: Clone + Default + Send + Sync,
    Z: Serializer<Info, D> + Sync,
    P: Partitioner<D>,
    S: Scheduler,
{
    for (point, info) in points {
        let home = partitioner.id(&point);
        messaging.push_outbox(home, home, point, home, info);
    }
    let ids = partitioner.ids();
    for &id in &ids {
        messaging.send_points(id);
    }

    scheduler.for_each(&ids, |&id| {
        bootstrap_tile(container, messaging, &ids, id);
    });
}

/// The star-splay fixed-point loop (spec.md §4.8 `splay_stars`): repeats
/// `splay_tile` over the current worklist, seeding the next round with
/// only the tiles that actually received new points, until a round sends
/// nothing. This is a finer-grained generalization of §4.7's "run
/// `for_each` over every tile until a pass sends zero points": limiting
/// each round to the tiles with pending inbox traffic instead of blindly
/// revisiting every tile converges to the same fixed point without the
/// wasted no-op passes a naive full sweep would spend on already-quiescent
/// tiles (see `DESIGN.md`).
pub fn splay_stars<Info, Z, S, const D: usize>(
    container: &TileContainer<Info, Z, D>,
    messaging: &MessagingContainer<Info, D>,
    scheduler: &S,
    ids: Vec<TileId>,
) where
    Info: Clone + Default + Send + Sync,
    Z: Serializer<Info, D> + Sync,
    S: Scheduler,
{
    let pass = std::sync::atomic::AtomicUsize::new(0);
    scheduler.for_each_rec(ids, |&id| {
        let (destinations, sent) = splay_tile(container, messaging, id);
        if sent > 0 {
            let k = pass.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            logging::pass_complete(k, sent);
        }
        destinations.into_iter().collect::<Vec<_>>()
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::TileContainer;
    use crate::partition::{Constant, Grid};
    use crate::scheduler::Sequential;
    use crate::serializer::NoSerializer;

    #[test]
    fn single_tile_bootstrap_and_splay_triangulates_the_unit_square() {
        let partitioner = Constant::new(TileId::new(0));
        let container: TileContainer<(), NoSerializer, 2> = TileContainer::new(None, 1, NoSerializer);
        let messaging: MessagingContainer<(), 2> = MessagingContainer::new();
        let scheduler = Sequential;
        let points = vec![
            (Point::new([0.0, 0.0]), ()),
            (Point::new([1.0, 0.0]), ()),
            (Point::new([0.0, 1.0]), ()),
            (Point::new([1.0, 1.0]), ()),
        ];
        bootstrap(&container, &messaging, &partitioner, &scheduler, points);
        splay_stars(&container, &messaging, &scheduler, <Constant as Partitioner<2>>::ids(&partitioner));

        let guard = container.acquire(TileId::new(0)).unwrap();
        let cells = guard.with(|tile| tile.finite_cells().count());
        assert_eq!(cells, 2);
    }

    #[test]
    fn four_cell_grid_converges_with_no_pending_messages() {
        // Surfaces `pass_complete` events on stderr when this test is run
        // with `--nocapture`; harmless if a logger is already installed.
        let _ = env_logger::try_init();

        let mut bbox = crate::geometry::Bbox::<2>::empty();
        bbox.add_point(&Point::new([0.0, 0.0]));
        bbox.add_point(&Point::new([1.0, 1.0]));
        let partitioner = Grid::<2>::new(bbox, [2, 2]);
        let container: TileContainer<(), NoSerializer, 2> = TileContainer::new(None, 1, NoSerializer);
        let messaging: MessagingContainer<(), 2> = MessagingContainer::new();
        let scheduler = Sequential;
        let points = vec![
            (Point::new([0.1, 0.1]), ()),
            (Point::new([0.9, 0.1]), ()),
            (Point::new([0.5, 0.5]), ()),
            (Point::new([0.1, 0.9]), ()),
            (Point::new([0.9, 0.9]), ()),
        ];
        bootstrap(&container, &messaging, &partitioner, &scheduler, points);
        splay_stars(&container, &messaging, &scheduler, <Grid<2> as Partitioner<2>>::ids(&partitioner));

        for id in <Grid<2> as Partitioner<2>>::ids(&partitioner) {
            assert_eq!(messaging.inbox_len(id), 0);
        }
    }
}
