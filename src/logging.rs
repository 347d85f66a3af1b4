//! Structured events the engine emits through the `log` facade (spec.md
//! §9: "process-wide logging is a cross-cutting concern owned by the
//! caller; the engine only emits structured events"). Callers wire up
//! `env_logger`, `tracing-log`, or anything else that consumes the `log`
//! crate's records; this module never configures a logger itself.

use log::info;

use crate::tile_id::TileId;

/// A tile was loaded into memory by the tile container (via the
/// serializer or freshly created).
pub fn tile_loaded(id: TileId) {
    info!(target: "ddt::tile", "tile_loaded id={id}");
}

/// A tile was serialized to durable storage, about to be (or already)
/// dropped from memory.
pub fn tile_saved(id: TileId) {
    info!(target: "ddt::tile", "tile_saved id={id}");
}

/// One `for_each` pass of the splay loop completed; `sent` is the number
/// of points forwarded to peer tiles during the pass (zero means the
/// fixed point was reached).
pub fn pass_complete(pass: usize, sent: usize) {
    info!(target: "ddt::splay", "pass_complete pass={pass} sent={sent}");
}
