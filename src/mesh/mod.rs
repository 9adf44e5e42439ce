//! Mesh construction from occupancy grids.
//!
//! - [`build`]: extrude occupied cells into boxes, repair winding, drop
//!   duplicate faces
//! - [`Mesh`]: indexed triangle mesh with volume and topology queries
//!
//! ```rust,ignore
//! use vastu_mesh::mesh::build;
//!
//! let mesh = build(&grid, 1.5)?;
//! if mesh.is_empty() {
//!     // nothing occupied, skip export
//! }
//! ```

mod builder;
mod repair;
mod types;

pub use builder::{BuildStats, FACES_PER_CELL, VERTICES_PER_CELL, build, build_with_stats};
pub use types::{Face, Mesh, Vertex};
