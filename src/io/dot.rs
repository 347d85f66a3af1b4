//! Tile-adjacency graph as GraphViz DOT, ported 1:1 from
//! `original_source/DDT/IO/write_dot.h::write_adjacency_graph_dot`.

use crate::tile_id::TileId;

/// Renders `edges` (as produced by `engine::Engine::adjacency_graph`) as a
/// DOT graph. For an undirected graph (`oriented == false`) each edge is
/// only printed once, in the direction that orders the two tile ids,
/// matching the original's `p.first < p.second` guard.
pub fn write_adjacency_graph(edges: &[(TileId, TileId)], oriented: bool) -> String {
    let mut out = String::new();
    out.push_str(if oriented { "digraph" } else { "graph" });
    out.push_str(" tile_adjacency {\n");
    let arrow = if oriented { "->" } else { "--" };
    for &(a, b) in edges {
        if oriented || a < b {
            out.push_str(&format!("\t{} {} {};\n", a.as_u64(), arrow, b.as_u64()));
        }
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undirected_graph_prints_each_edge_once_in_ascending_order() {
        let edges = vec![(TileId::new(1), TileId::new(0)), (TileId::new(0), TileId::new(1))];
        let dot = write_adjacency_graph(&edges, false);
        assert!(dot.starts_with("graph tile_adjacency {\n"));
        assert_eq!(dot.matches("0 -- 1").count(), 1);
    }

    #[test]
    fn directed_graph_prints_every_edge_as_given() {
        let edges = vec![(TileId::new(1), TileId::new(0)), (TileId::new(0), TileId::new(1))];
        let dot = write_adjacency_graph(&edges, true);
        assert!(dot.starts_with("digraph tile_adjacency {\n"));
        assert_eq!(dot.matches("->").count(), 2);
    }

    #[test]
    fn empty_graph_has_no_edge_lines() {
        let dot = write_adjacency_graph(&[], false);
        assert_eq!(dot, "graph tile_adjacency {\n}");
    }
}
