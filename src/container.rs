//! The bounded in-memory tile cache (spec.md §4.6), grounded on
//! `original_source/DDT/Tile_container.h`'s pin-counted LRU. Two
//! concurrent structures back it, matching the split `dashmap`/
//! `parking_lot` usage already established in `messaging.rs`: tiles and
//! their usage records live in `DashMap`s for per-key concurrency (§5 R2),
//! while the admission decision (does loading this tile require an
//! eviction first?) is serialized behind a `parking_lot::Mutex` so two
//! workers can never both decide to evict the same victim (§5 R3).

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::error::DdtError;
use crate::logging;
use crate::serializer::Serializer;
use crate::tile::Tile;
use crate::tile_id::TileId;

struct Usage {
    pin_count: usize,
    last_touched: u64,
}

impl Usage {
    fn new(tick: u64) -> Self {
        Usage { pin_count: 0, last_touched: tick }
    }
}

/// Owns every tile currently resident in memory, evicting the
/// least-recently-touched unpinned tile through `Z` whenever admitting a
/// new one would exceed `in_memory_budget` (`None` means unbounded).
pub struct TileContainer<Info, Z, const D: usize> {
    tiles: DashMap<TileId, Tile<Info, D>>,
    usage: DashMap<TileId, Usage>,
    budget: Option<usize>,
    max_concurrency: usize,
    serializer: Z,
    clock: AtomicU64,
    admission: Mutex<()>,
}

impl<Info, Z, const D: usize> TileContainer<Info, Z, D>
where
    Info: Clone + Default,
    Z: Serializer<Info, D>,
{
    /// `max_concurrency` is only used to annotate a `BudgetExhausted` error
    /// with the R4 value the caller configured (spec.md §5 R4:
    /// `K >= max_concurrency + 1`); it plays no other role here.
    pub fn new(budget: Option<usize>, max_concurrency: usize, serializer: Z) -> Self {
        TileContainer {
            tiles: DashMap::new(),
            usage: DashMap::new(),
            budget,
            max_concurrency,
            serializer,
            clock: AtomicU64::new(0),
            admission: Mutex::new(()),
        }
    }

    pub fn in_memory_count(&self) -> usize {
        self.tiles.len()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }

    fn touch(&self, id: TileId) {
        let tick = self.tick();
        self.usage.entry(id).or_insert_with(|| Usage::new(tick)).last_touched = tick;
    }

    /// Pins `id`, loading it (from the serializer, or fresh if it has
    /// never existed) if it is not already resident. Evicts an unpinned
    /// victim first if the budget would otherwise be exceeded.
    pub fn pin(&self, id: TileId) -> Result<(), DdtError> {
        let _admission_guard = self.admission.lock();
        if !self.tiles.contains_key(&id) {
            if let Some(k) = self.budget {
                if self.in_memory_count() >= k {
                    self.evict_one(k)?;
                }
            }
            let mut tile = Tile::new(id);
            if self.serializer.has_tile(id) {
                // §7 policy: "recover locally from serializer failures
                // (retry once, then propagate)".
                if let Err(first) = self.serializer.load_tile(&mut tile) {
                    self.serializer
                        .load_tile(&mut tile)
                        .map_err(|_| DdtError::Serializer { tile_id: id, source: first })?;
                }
            }
            self.tiles.insert(id, tile);
            logging::tile_loaded(id);
        }
        drop(_admission_guard);

        let tick = self.tick();
        let mut usage = self.usage.entry(id).or_insert_with(|| Usage::new(tick));
        usage.pin_count += 1;
        usage.last_touched = tick;
        Ok(())
    }

    pub fn unpin(&self, id: TileId) {
        if let Some(mut usage) = self.usage.get_mut(&id) {
            usage.pin_count = usage.pin_count.saturating_sub(1);
        }
    }

    pub fn pin_count(&self, id: TileId) -> usize {
        self.usage.get(&id).map(|u| u.pin_count).unwrap_or(0)
    }

    fn evict_one(&self, k: usize) -> Result<(), DdtError> {
        let victim = self
            .usage
            .iter()
            .filter(|entry| entry.value().pin_count == 0 && self.tiles.contains_key(entry.key()))
            .min_by_key(|entry| entry.value().last_touched)
            .map(|entry| *entry.key());

        let Some(victim_id) = victim else {
            return Err(DdtError::BudgetExhausted { k, max_concurrency: self.max_concurrency });
        };

        if let Some(tile) = self.tiles.get(&victim_id) {
            // §7 policy: "recover locally from serializer failures (retry
            // once, then propagate)"; until `save_tile` succeeds the
            // victim stays resident (container invariant d: "eviction
            // never loses data").
            if let Err(first) = self.serializer.save_tile(&tile) {
                self.serializer
                    .save_tile(&tile)
                    .map_err(|_| DdtError::Serializer { tile_id: victim_id, source: first })?;
            }
        }
        self.tiles.remove(&victim_id);
        self.usage.remove(&victim_id);
        logging::tile_saved(victim_id);
        Ok(())
    }

    /// Pins `id` and returns a scoped guard that unpins on drop, the
    /// recommended way to touch a tile (spec.md §5 "every read/write of a
    /// tile happens while it is pinned").
    pub fn acquire(&self, id: TileId) -> Result<TileGuard<'_, Info, Z, D>, DdtError> {
        self.pin(id)?;
        Ok(TileGuard { container: self, id })
    }
}

/// RAII pin: `unpin`s its tile when dropped. Cloning re-pins, since a
/// clone of a live reference to a tile must itself keep it resident.
pub struct TileGuard<'a, Info, Z, const D: usize> {
    container: &'a TileContainer<Info, Z, D>,
    id: TileId,
}

impl<'a, Info, Z, const D: usize> TileGuard<'a, Info, Z, D>
where
    Info: Clone + Default,
    Z: Serializer<Info, D>,
{
    pub fn id(&self) -> TileId {
        self.id
    }

    pub fn with<R>(&self, f: impl FnOnce(&Tile<Info, D>) -> R) -> R {
        let tile = self.container.tiles.get(&self.id).expect("pinned tile missing from container");
        f(&tile)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut Tile<Info, D>) -> R) -> R {
        let mut tile = self.container.tiles.get_mut(&self.id).expect("pinned tile missing from container");
        f(&mut tile)
    }
}

impl<'a, Info, Z, const D: usize> Clone for TileGuard<'a, Info, Z, D>
where
    Info: Clone + Default,
    Z: Serializer<Info, D>,
{
    fn clone(&self) -> Self {
        self.container.pin(self.id).expect("re-pinning an already pinned tile cannot fail on budget");
        TileGuard { container: self.container, id: self.id }
    }
}

impl<'a, Info, Z, const D: usize> Drop for TileGuard<'a, Info, Z, D> {
    fn drop(&mut self) {
        self.container.unpin(self.id);
    }
}
