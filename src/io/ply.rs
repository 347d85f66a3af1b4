//! ASCII PLY vertex writer, grounded on
//! `original_source/DDT/io/write_ply.cpp`. Only the vertex element is
//! written: PLY's face-list element would need `D == 3`-specific
//! triangle connectivity, which this crate's dimension-generic cells
//! don't carry in a PLY-native form, so the writer stays scoped to the
//! point cloud (one line per vertex, `D` ordinate columns).

/// Renders `points` as an ASCII PLY vertex element.
pub fn write_points<const D: usize>(points: &[[f64; D]]) -> String {
    let mut out = String::new();
    out.push_str("ply\nformat ascii 1.0\n");
    out.push_str(&format!("element vertex {}\n", points.len()));
    for i in 0..D {
        out.push_str(&format!("property float64 c{i}\n"));
    }
    out.push_str("end_header\n");
    for p in points {
        let coords: Vec<String> = p.iter().map(|c| c.to_string()).collect();
        out.push_str(&coords.join(" "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_names_one_property_per_axis() {
        let text = write_points(&[[0.0, 0.0, 0.0], [1.0, 2.0, 3.0]]);
        assert!(text.starts_with("ply\nformat ascii 1.0\nelement vertex 2\n"));
        assert!(text.contains("property float64 c0\n"));
        assert!(text.contains("property float64 c2\n"));
        assert!(text.ends_with("1 2 3\n"));
    }

    #[test]
    fn empty_point_list_has_zero_vertex_count() {
        let text: String = write_points::<2>(&[]);
        assert!(text.contains("element vertex 0\n"));
    }
}
