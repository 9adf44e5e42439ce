//! Normalized occupancy grid.
//!
//! Storage is row-major and bottom-up: row 0 is the grid's bottom row
//! (lowest world Y), matching the map origin convention. Image rasters are
//! top-down, so [`normalize`] flips them before classification.

use super::cell::{CellState, Classifier, ThresholdMode};
use crate::core::MapMetadata;
use crate::error::{Error, Result};
use image::DynamicImage;

/// Cell counts by state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellCounts {
    /// Free cells
    pub free: usize,
    /// Occupied cells
    pub occupied: usize,
    /// Unknown cells
    pub unknown: usize,
}

impl CellCounts {
    /// Total cells.
    pub fn total(&self) -> usize {
        self.free + self.occupied + self.unknown
    }
}

/// Read-only occupancy grid derived from a map raster.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    metadata: MapMetadata,
}

impl OccupancyGrid {
    /// Build a grid from bottom-up, row-major cells.
    pub fn from_cells(
        width: usize,
        height: usize,
        cells: Vec<CellState>,
        metadata: MapMetadata,
    ) -> Result<Self> {
        if cells.len() != width * height {
            return Err(Error::Validation(format!(
                "grid {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
            metadata,
        })
    }

    /// Width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    pub fn height(&self) -> usize {
        self.height
    }

    /// Metadata of the map this grid came from
    pub fn metadata(&self) -> &MapMetadata {
        &self.metadata
    }

    /// Cell at `(x, y)`, with `y = 0` the bottom row
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Coordinates of all occupied cells, row by row from the bottom.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_occupied())
            .map(move |(i, _)| (i % width, i / width))
    }

    /// Count cells by state
    pub fn counts(&self) -> CellCounts {
        let mut counts = CellCounts::default();
        for state in &self.cells {
            match state {
                CellState::Free => counts.free += 1,
                CellState::Occupied => counts.occupied += 1,
                CellState::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// ASCII rendering, top row first (for debugging and tests)
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                out.push(self.cells[y * self.width + x].as_char());
            }
            out.push('\n');
        }
        out
    }
}

/// Normalize a raster with the fixed binary cutoff.
///
/// See [`normalize_with_mode`].
pub fn normalize(raster: &DynamicImage, metadata: &MapMetadata) -> OccupancyGrid {
    normalize_with_mode(raster, metadata, ThresholdMode::Binary)
}

/// Normalize a raster into an occupancy grid.
///
/// 1. Flip vertically so image row 0 (top) becomes the grid's last row.
/// 2. Convert to 8-bit grayscale.
/// 3. Classify every pixel with `mode`.
pub fn normalize_with_mode(
    raster: &DynamicImage,
    metadata: &MapMetadata,
    mode: ThresholdMode,
) -> OccupancyGrid {
    let gray = image::imageops::flip_vertical(&raster.to_luma8());
    let classifier = Classifier::new(mode, metadata.occupied_thresh(), metadata.free_thresh());

    let width = gray.width() as usize;
    let height = gray.height() as usize;
    let cells: Vec<CellState> = gray
        .pixels()
        .map(|pixel| classifier.classify(pixel.0[0]))
        .collect();

    let grid = OccupancyGrid {
        width,
        height,
        cells,
        metadata: metadata.clone(),
    };

    let counts = grid.counts();
    log::debug!(
        "Normalized '{}' ({} mode): {}x{} cells, {} occupied, {} free, {} unknown",
        metadata.name(),
        mode,
        width,
        height,
        counts.occupied,
        counts.free,
        counts.unknown
    );

    grid
}
