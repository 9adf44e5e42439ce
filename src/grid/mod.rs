//! Grid loading and normalization.
//!
//! Turns a map raster into an [`OccupancyGrid`]:
//!
//! ```rust,ignore
//! use vastu_mesh::grid::{load, normalize};
//!
//! let raster = load(metadata.image_path())?;
//! let grid = normalize(&raster, &metadata);
//! println!("{} occupied cells", grid.counts().occupied);
//! ```

mod cell;
mod loader;
mod occupancy;

pub use cell::{BINARY_FREE_CUTOFF, CellState, Classifier, ThresholdMode};
pub use loader::load;
pub use occupancy::{CellCounts, OccupancyGrid, normalize, normalize_with_mode};
