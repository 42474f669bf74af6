//! Box-hull wire frame: 8 vertices and a fixed 12-edge adjacency.

use crate::frame::VertexExtents;

/// Edge adjacency of the box hull, 1-based vertex indices. The table is
/// the same for every reference-convention choice; only the vertex
/// coordinates move.
pub const HULL_EDGES: [(u8, u8); 12] = [
    (1, 2),
    (2, 3),
    (3, 4),
    (4, 1),
    (5, 6),
    (6, 7),
    (7, 8),
    (8, 5),
    (1, 5),
    (2, 6),
    (3, 7),
    (4, 8),
];

/// Vertices 1-4 are the aft face, 5-8 the forward face; each face runs
/// deck-port, keel-port, keel-starboard, deck-starboard.
pub fn hull_vertices(extents: &VertexExtents) -> [[f64; 3]; 8] {
    let VertexExtents {
        x_aft,
        x_fwd,
        y_port,
        y_stbd,
        z_baseline,
        z_main_deck,
    } = *extents;
    [
        [x_aft, y_port, z_main_deck],
        [x_aft, y_port, z_baseline],
        [x_aft, y_stbd, z_baseline],
        [x_aft, y_stbd, z_main_deck],
        [x_fwd, y_port, z_main_deck],
        [x_fwd, y_port, z_baseline],
        [x_fwd, y_stbd, z_baseline],
        [x_fwd, y_stbd, z_main_deck],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{
        resolve_vertex_extents, LongitudinalDir, LongitudinalRef, VerticalRef,
    };

    #[test]
    fn every_vertex_carries_exactly_three_edges() {
        let mut degree = [0u8; 9];
        for (from, to) in HULL_EDGES {
            degree[from as usize] += 1;
            degree[to as usize] += 1;
        }
        assert_eq!(degree[0], 0);
        for vertex in 1..=8 {
            assert_eq!(degree[vertex], 3, "vertex {vertex}");
        }
    }

    #[test]
    fn box_is_closed_under_every_reference_convention() {
        for xref in [
            LongitudinalRef::ForePerpendicular,
            LongitudinalRef::AftPerpendicular,
            LongitudinalRef::Midships,
        ] {
            for xdir in [LongitudinalDir::Forward, LongitudinalDir::Aft] {
                for zref in [VerticalRef::Baseline, VerticalRef::Draft] {
                    let extents =
                        resolve_vertex_extents(180.0, 32.0, 20.0, 9.0, xref, xdir, zref);
                    let vertices = hull_vertices(&extents);
                    for (from, to) in HULL_EDGES {
                        let a = vertices[from as usize - 1];
                        let b = vertices[to as usize - 1];
                        // Every edge of a box is axis-aligned: exactly one
                        // coordinate differs between its two vertices.
                        let differing = (0..3).filter(|&axis| a[axis] != b[axis]).count();
                        assert_eq!(differing, 1, "{xref:?}/{xdir:?}/{zref:?} edge {from}-{to}");
                    }
                }
            }
        }
    }
}
