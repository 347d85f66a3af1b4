//! VTU (per-tile) and PVTU (top-level index) writers, grounded on
//! `original_source/DDT/io/write_tri.hpp` and
//! `serializer/PVTU_file_serializer.h`. `D` dimensions beyond 3 are
//! truncated to the first 3 coordinates, matching VTK's own 3D-only
//! geometry model.

/// The VTK cell type code for a `D`-simplex: `VTK_TRIANGLE` (5) for `D ==
/// 2`, `VTK_TETRA` (10) for `D == 3`, `VTK_VERTEX` (1) otherwise (`D`
/// values this writer has no native VTK cell shape for).
fn vtk_cell_type(d: usize) -> u8 {
    match d {
        2 => 5,
        3 => 10,
        _ => 1,
    }
}

/// Renders one tile's finite cells as a single `<Piece>` VTU document.
/// `cells` holds each cell's vertex indices into `points`.
pub fn write_vtu<const D: usize>(points: &[[f64; D]], cells: &[Vec<usize>]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n");
    out.push_str("<VTKFile type=\"UnstructuredGrid\" version=\"0.1\">\n<UnstructuredGrid>\n");
    out.push_str(&format!("<Piece NumberOfPoints=\"{}\" NumberOfCells=\"{}\">\n", points.len(), cells.len()));

    out.push_str("<Points><DataArray type=\"Float64\" NumberOfComponents=\"3\" format=\"ascii\">\n");
    for p in points {
        let mut xyz = [0.0; 3];
        for (i, slot) in xyz.iter_mut().enumerate().take(D.min(3)) {
            *slot = p[i];
        }
        out.push_str(&format!("{} {} {}\n", xyz[0], xyz[1], xyz[2]));
    }
    out.push_str("</DataArray></Points>\n");

    out.push_str("<Cells>\n<DataArray type=\"Int64\" Name=\"connectivity\" format=\"ascii\">\n");
    for cell in cells {
        let ids: Vec<String> = cell.iter().map(|i| i.to_string()).collect();
        out.push_str(&ids.join(" "));
        out.push('\n');
    }
    out.push_str("</DataArray>\n<DataArray type=\"Int64\" Name=\"offsets\" format=\"ascii\">\n");
    let mut offset = 0usize;
    for cell in cells {
        offset += cell.len();
        out.push_str(&format!("{offset}\n"));
    }
    out.push_str("</DataArray>\n<DataArray type=\"UInt8\" Name=\"types\" format=\"ascii\">\n");
    let vtk_type = vtk_cell_type(D);
    for _ in cells {
        out.push_str(&format!("{vtk_type}\n"));
    }
    out.push_str("</DataArray>\n</Cells>\n</Piece>\n</UnstructuredGrid>\n</VTKFile>\n");
    out
}

/// Renders a top-level PVTU index referencing each tile's `.vtu` piece.
pub fn write_pvtu(piece_paths: &[String]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\"?>\n<VTKFile type=\"PUnstructuredGrid\" version=\"0.1\">\n");
    out.push_str("<PUnstructuredGrid GhostLevel=\"0\">\n");
    out.push_str("<PPoints><PDataArray type=\"Float64\" NumberOfComponents=\"3\"/></PPoints>\n");
    for path in piece_paths {
        out.push_str(&format!("<Piece Source=\"{path}\"/>\n"));
    }
    out.push_str("</PUnstructuredGrid>\n</VTKFile>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vtu_counts_match_input_sizes() {
        let points = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];
        let cells = vec![vec![0, 1, 2]];
        let xml = write_vtu(&points, &cells);
        assert!(xml.contains("NumberOfPoints=\"3\""));
        assert!(xml.contains("NumberOfCells=\"1\""));
        assert!(xml.contains(">5\n")); // VTK_TRIANGLE
    }

    #[test]
    fn pvtu_references_every_piece() {
        let xml = write_pvtu(&["tile_0.vtu".to_string(), "tile_1.vtu".to_string()]);
        assert!(xml.contains("Source=\"tile_0.vtu\""));
        assert!(xml.contains("Source=\"tile_1.vtu\""));
    }
}
