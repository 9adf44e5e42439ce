//! # VastuMesh
//!
//! Turns 2D occupancy-grid maps into 3D meshes and Gazebo model bundles.
//!
//! ## Overview
//!
//! A map is a grayscale raster plus ROS map_server metadata (resolution,
//! origin, thresholds). Conversion runs in three stages:
//!
//! 1. **Grid** - decode the raster, flip it bottom-up, classify pixels
//!    into Free / Occupied / Unknown cells
//! 2. **Mesh** - extrude every occupied cell into a box of the chosen
//!    height, repair winding, drop duplicate faces
//! 3. **Package** - write the mesh as binary STL plus SDF model, manifest
//!    and world descriptors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vastu_mesh::{ConvertConfig, MapMetadata, process_maps};
//! use std::path::Path;
//!
//! let maps = vec![MapMetadata::from_yaml_file("maps/office.yaml")?];
//! let summary = process_maps(&maps, Path::new("models"), Path::new("worlds"),
//!                            &ConvertConfig::default());
//!
//! println!("{} ok, {} failed", summary.succeeded, summary.failed);
//! ```
//!
//! ## Coordinate System
//!
//! Uses ROS REP-103 convention: X right, Y up (in map view), Z up out of the
//! floor. Grid cell `(x, y)` covers world
//! `[x, x + 1] * resolution + origin.x` by `[y, y + 1] * resolution + origin.y`,
//! with `y = 0` the bottom image row.

#![warn(missing_docs)]

// Metadata and coordinate types
pub mod core;

// Raster loading and occupancy classification
pub mod grid;

// Box extrusion and mesh repair
pub mod mesh;

// STL and SDF writers
pub mod io;

// Bundle layout and batch driver
pub mod package;

// Batch input discovery
pub mod discovery;

// Tool configuration
pub mod config;

pub mod error;

pub use crate::core::{MapMetadata, MapOrigin, PixelPoint, WorldPoint, pixel_to_world};
pub use config::ConvertConfig;
pub use error::{Error, ErrorKind, Result};
pub use grid::{CellState, OccupancyGrid, ThresholdMode};
pub use mesh::{Mesh, Vertex};
pub use package::{
    BatchFailure, BatchSummary, ModelBundle, package, package_batch, process_dir, process_map,
    process_maps,
};

/// Load, normalize and extrude one map.
///
/// Uses `config.grid` for classification and size limits and
/// `config.mesh.height` for the extrusion height. An empty result means
/// the map has no occupied cells.
pub fn convert_map(metadata: &MapMetadata, config: &ConvertConfig) -> Result<Mesh> {
    let raster = grid::load(metadata.image_path())?;

    if !config.accepts_raster(raster.width(), raster.height()) {
        return Err(Error::Validation(format!(
            "raster {}x{} exceeds limit of {} pixels",
            raster.width(),
            raster.height(),
            config.grid.max_pixels
        )));
    }

    log::info!("Processing...");
    let grid = grid::normalize_with_mode(&raster, metadata, config.grid.threshold);
    drop(raster);

    mesh::build(&grid, config.mesh.height)
}
