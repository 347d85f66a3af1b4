//! Error handling (spec.md §7): configuration and budget violations are
//! fatal at construction or at the point they are detected; serializer and
//! kernel failures carry the offending tile id back to the caller.
//! Duplicate points are deliberately *not* an error variant here — they
//! are a silent no-op, handled entirely inside `delaunay_core::Tds::insert`.

use thiserror::Error;

use crate::tile_id::TileId;

#[derive(Error, Debug)]
pub enum DdtError {
    /// `K < max_concurrency + 1`, an unknown partitioner id, or an
    /// inconsistent dimension. Fatal at construction.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O failure while loading or saving a tile. Recoverable once
    /// (§7 policy: "retry once, then propagate"); the affected tile
    /// remains in memory, pinned by the caller.
    #[error("serializer failure for tile {tile_id}: {source}")]
    Serializer {
        tile_id: TileId,
        #[source]
        source: std::io::Error,
    },

    /// A geometric inconsistency inside a tile's local triangulation.
    /// Always indicates a bug; fatal.
    #[error("kernel failure in tile {tile_id}: {message}")]
    Kernel { tile_id: TileId, message: String },

    /// No zero-pin eviction victim was available even though the cache
    /// was full: a violation of R4, i.e. a programming error in how the
    /// engine was configured or driven. Fatal.
    #[error("budget exhausted: no zero-pin eviction victim (K={k}, max_concurrency={max_concurrency})")]
    BudgetExhausted { k: usize, max_concurrency: usize },
}
