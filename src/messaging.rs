//! Per-tile inbox/outbox traffic, grounded on
//! `original_source/DDT/Messaging_container.h` and `Point_set_container.h`
//! — byte-identical in the original, so this crate keeps exactly one type
//! for both roles (spec.md §9 Open Question, resolved in `DESIGN.md`).
//!
//! Backed by `dashmap` rather than a plain `HashMap` behind one global
//! lock: §5 rule R2 requires that writes to peer inboxes be guarded
//! per-peer, not serialized across the whole container, since many tiles'
//! workers may be draining their outboxes into different peers at once.

use dashmap::DashMap;

use crate::delaunay_core::point::Point;
use crate::geometry::Scalar;
use crate::tile_id::TileId;

/// One tile's buffers: points it still needs to forward to peers
/// (`outbox`, keyed by destination) and points peers have sent it that it
/// has not yet inserted (`inbox`). Every entry carries the point's *home*
/// tile id alongside its coordinates and payload (spec.md §9: "a vertex's
/// canonical identity is `(home_id, coordinates)`"; cross-tile copies are
/// "value-copies of the foreign point plus its `home_id`") — the home id
/// travels with the point so the receiving tile never has to re-derive it.
#[derive(Debug)]
pub struct Messaging<U, const D: usize> {
    pub outbox: std::collections::HashMap<TileId, Vec<(Point<Scalar, D>, TileId, U)>>,
    pub inbox: Vec<(Point<Scalar, D>, TileId, U)>,
}

impl<U, const D: usize> Default for Messaging<U, D> {
    fn default() -> Self {
        Messaging {
            outbox: std::collections::HashMap::new(),
            inbox: Vec::new(),
        }
    }
}

/// Owns one `Messaging` per tile id. The *send* step for a tile moves its
/// `outbox[to]` entries into `to`'s inbox for every `to != from`; points a
/// tile addressed to itself become its own next-round inbox (spec.md
/// §4.4).
#[derive(Debug, Default)]
pub struct MessagingContainer<U, const D: usize> {
    tiles: DashMap<TileId, Messaging<U, D>>,
}

impl<U, const D: usize> MessagingContainer<U, D> {
    pub fn new() -> Self {
        MessagingContainer { tiles: DashMap::new() }
    }

    /// Queues `(point, home, data)` in `from`'s outbox, addressed to `to`.
    /// `home` is the point's home tile id, carried alongside the
    /// coordinates so the recipient tags the vertex correctly rather than
    /// with its own id.
    pub fn push_outbox(&self, from: TileId, to: TileId, point: Point<Scalar, D>, home: TileId, data: U) {
        self.tiles
            .entry(from)
            .or_default()
            .outbox
            .entry(to)
            .or_default()
            .push((point, home, data));
    }

    /// Drains `id`'s inbox, leaving it empty for the next round.
    pub fn take_inbox(&self, id: TileId) -> Vec<(Point<Scalar, D>, TileId, U)> {
        self.tiles.entry(id).or_default().inbox.drain(..).collect()
    }

    pub fn inbox_len(&self, id: TileId) -> usize {
        self.tiles.get(&id).map(|m| m.inbox.len()).unwrap_or(0)
    }

    /// Flushes `from`'s outbox into every destination's inbox (self-sends
    /// land back in `from`'s own inbox for the next round). Returns the
    /// number of points sent to *other* tiles, the quantity the splay
    /// loop's termination reduce accumulates.
    pub fn send_points(&self, from: TileId) -> usize
    where
        U: Clone,
    {
        let Some(mut messaging) = self.tiles.get_mut(&from) else {
            return 0;
        };
        let outbox = std::mem::take(&mut messaging.outbox);
        drop(messaging);

        let mut sent_to_others = 0;
        for (to, points) in outbox {
            if to == from {
                self.tiles.entry(from).or_default().inbox.extend(points);
            } else {
                sent_to_others += points.len();
                self.tiles.entry(to).or_default().inbox.extend(points);
            }
        }
        sent_to_others
    }

    /// Broadcasts the bootstrap axis-extreme points to every tile in
    /// `destinations` (spec.md §4.8 step 3).
    pub fn send_extreme_points(
        &self,
        points: &[(Point<Scalar, D>, TileId, U)],
        destinations: impl Iterator<Item = TileId>,
    ) where
        U: Clone,
    {
        for to in destinations {
            self.tiles.entry(to).or_default().inbox.extend(points.iter().cloned());
        }
    }
}
