//! # ddt
//!
//! A distributed Delaunay triangulation engine: points are partitioned
//! across spatial tiles, each tile computed with an incremental
//! Bowyer-Watson kernel, and a star-splaying pass propagates foreign
//! vertices between tiles until every tile's local triangulation agrees
//! with its neighbors on every simplex crossing a tile boundary.
//!
//! # Features
//! * d-dimensional Delaunay triangulations per tile, out-of-core via a
//!   bounded [`container::TileContainer`]
//! * Pluggable [`partition::Partitioner`], [`select::Selector`],
//!   [`scheduler::Scheduler`] and [`serializer::Serializer`] strategies
//! * Serialization/Deserialization with [serde](https://serde.rs)

#[macro_use]
extern crate derive_builder;

/// The kernel: per-tile incremental Delaunay triangulation data structure,
/// inherited from the single-tile library this crate generalizes.
pub mod delaunay_core {
    pub mod cell;
    pub mod facet;
    pub mod matrix;
    pub mod point;
    pub mod triangulation_data_structure;
    pub mod utilities;
    pub mod vertex;
    // Re-export the `delaunay_core` modules.
    pub use cell::*;
    pub use facet::*;
    pub use matrix::*;
    pub use point::*;
    pub use triangulation_data_structure::*;
    pub use utilities::*;
    pub use vertex::*;
}

pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod io;
pub mod logging;
pub mod messaging;
pub mod partition;
pub mod scheduler;
pub mod select;
pub mod serializer;
pub mod splay;
pub mod tile;
pub mod tile_id;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use engine::Engine;
pub use error::DdtError;
pub use tile_id::TileId;
