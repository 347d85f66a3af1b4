//! Outbound output writers (spec.md §6.4). The native round-trip stream
//! lives on the kernel itself (`delaunay_core::Tds::to_text`/`to_binary`,
//! `tile::Tile::to_text`); this module covers the remaining formats named
//! by spec.md: PLY, VTU/PVTU, GeoJSON, DOT (the tile-adjacency graph).
//!
//! Point I/O is otherwise out of this crate's scope (spec.md §1
//! Non-goals: "specified only by the stream contracts in §6.4") — these
//! writers are outbound-only and grounded on
//! `original_source/DDT/io/write_ply.cpp`, `write_tri.hpp`,
//! `IO/write_dot.h`, `serializer/PVTU_file_serializer.h`.

pub mod dot;
#[cfg(feature = "serde")]
pub mod geojson;
pub mod ply;
pub mod vtu;
