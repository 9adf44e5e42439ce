//! Per-cell box extrusion.
//!
//! Every occupied cell becomes an independent axis-aligned box: 8 vertices
//! and 12 triangles, nothing shared with neighbouring cells. Walls between
//! two adjacent occupied cells therefore stay in the mesh as coincident
//! faces on distinct vertices.
//!
//! ## Box Layout
//!
//! ```text
//!   base ring (z = 0)           top ring (z = height)
//!
//!   1 ──── 3                    5 ──── 7
//!   │      │   +y               │      │
//!   │      │   ^                │      │
//!   0 ──── 2   └─> +x           4 ──── 6
//! ```
//!
//! Corner `k` of the top ring is corner `k - 4` of the base ring lifted by
//! `height`.

use super::types::{Face, Mesh, Vertex};
use crate::core::grid_corner_to_world;
use crate::error::{Error, Result};
use crate::grid::OccupancyGrid;

/// Triangles of one box, indices relative to its first vertex.
///
/// Counter-clockwise seen from outside, so an isolated box encloses a
/// positive volume.
const BOX_FACES: [Face; 12] = [
    [0, 2, 4],
    [4, 2, 6],
    [1, 2, 0],
    [3, 2, 1],
    [5, 0, 4],
    [1, 0, 5],
    [3, 7, 2],
    [7, 6, 2],
    [7, 4, 6],
    [5, 4, 7],
    [1, 5, 3],
    [7, 3, 5],
];

/// Vertices emitted per occupied cell
pub const VERTICES_PER_CELL: usize = 8;

/// Faces emitted per occupied cell
pub const FACES_PER_CELL: usize = BOX_FACES.len();

/// Statistics from one mesh build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Occupied cells extruded
    pub cells: usize,
    /// Faces whose winding was changed by repair
    pub faces_reoriented: usize,
    /// Duplicate faces removed
    pub duplicates_removed: usize,
}

/// Extrude the occupied cells of `grid` into a closed mesh.
///
/// See [`build_with_stats`].
pub fn build(grid: &OccupancyGrid, height: f64) -> Result<Mesh> {
    build_with_stats(grid, height).map(|(mesh, _)| mesh)
}

/// Extrude the occupied cells of `grid` into a closed mesh.
///
/// Cell `(x, y)` spans grid corners `(x, y)` to `(x + 1, y + 1)`, mapped to
/// world as `corner * resolution + origin`. After emission the mesh is
/// re-wound if it does not already enclose a positive volume, then faces
/// repeating an earlier face's vertex indices are dropped.
///
/// A grid without occupied cells yields an empty mesh, not an error.
/// `height` must be positive and finite.
pub fn build_with_stats(grid: &OccupancyGrid, height: f64) -> Result<(Mesh, BuildStats)> {
    if !(height.is_finite() && height > 0.0) {
        return Err(Error::Validation(format!(
            "extrusion height must be positive, got {}",
            height
        )));
    }

    let metadata = grid.metadata();
    let resolution = metadata.resolution();
    let origin = metadata.origin().position();

    let occupied = grid.counts().occupied;
    let mut mesh = Mesh::with_capacity(occupied * VERTICES_PER_CELL, occupied * FACES_PER_CELL);
    let mut stats = BuildStats::default();

    for (x, y) in grid.occupied_cells() {
        let base = mesh.vertex_count();
        let ring = [(x, y), (x, y + 1), (x + 1, y), (x + 1, y + 1)]
            .map(|(cx, cy)| grid_corner_to_world(cx, cy, resolution, origin));

        for z in [0.0, height] {
            for corner in &ring {
                mesh.push_vertex(Vertex::new(corner.x, corner.y, z));
            }
        }
        mesh.faces
            .extend(BOX_FACES.iter().map(|f| [base + f[0], base + f[1], base + f[2]]));
        stats.cells += 1;
    }

    if mesh.is_empty() {
        log::debug!("Map '{}' has no occupied cells", metadata.name());
        return Ok((mesh, stats));
    }

    log::debug!(
        "Extruded {} cells: {} vertices, {} faces",
        stats.cells,
        mesh.vertex_count(),
        mesh.face_count()
    );

    if !mesh.is_volume() {
        stats.faces_reoriented = mesh.fix_normals();
        log::debug!("Winding repair reoriented {} faces", stats.faces_reoriented);
    }

    stats.duplicates_removed = mesh.remove_duplicate_faces();
    if stats.duplicates_removed > 0 {
        log::debug!("Removed {} duplicate faces", stats.duplicates_removed);
    }

    Ok((mesh, stats))
}
