//! Cell states and pixel classification rules.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Intensity at or above which a pixel is Free in [`ThresholdMode::Binary`].
///
/// Anything darker is Occupied. Light-gray "unknown" areas in saved maps
/// (usually 205) therefore extrude as walls.
pub const BINARY_FREE_CUTOFF: u8 = 253;

/// Occupancy state of a single grid cell
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellState {
    /// Traversable space
    Free = 0,

    /// Obstacle, extruded into the mesh
    Occupied = 1,

    /// Neither free nor occupied with confidence
    #[default]
    Unknown = 2,
}

impl CellState {
    /// Is this cell extruded?
    #[inline]
    pub fn is_occupied(self) -> bool {
        self == CellState::Occupied
    }

    /// Single character representation for debugging
    pub fn as_char(self) -> char {
        match self {
            CellState::Free => '.',
            CellState::Occupied => '#',
            CellState::Unknown => '?',
        }
    }
}

/// How pixel intensities become cell states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    /// Fixed cutoff: intensity < 253 is Occupied, everything else Free.
    ///
    /// Ignores the map's thresholds; never produces Unknown.
    #[default]
    Binary,

    /// ROS map_server trinary interpretation of the map's thresholds.
    ///
    /// `p = (255 - intensity) / 255`; `p > occupied_thresh` is Occupied,
    /// `p < free_thresh` is Free, anything between is Unknown.
    Trinary,
}

impl std::fmt::Display for ThresholdMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThresholdMode::Binary => write!(f, "binary"),
            ThresholdMode::Trinary => write!(f, "trinary"),
        }
    }
}

/// Pixel classifier for one map.
#[derive(Clone, Copy, Debug)]
pub struct Classifier {
    mode: ThresholdMode,
    occupied_thresh: f64,
    free_thresh: f64,
}

impl Classifier {
    /// Create a classifier from a mode and the map's probability thresholds.
    pub fn new(mode: ThresholdMode, occupied_thresh: f64, free_thresh: f64) -> Self {
        Self {
            mode,
            occupied_thresh,
            free_thresh,
        }
    }

    /// Classify one 8-bit grayscale intensity.
    #[inline]
    pub fn classify(&self, intensity: u8) -> CellState {
        match self.mode {
            ThresholdMode::Binary => {
                if intensity < BINARY_FREE_CUTOFF {
                    CellState::Occupied
                } else {
                    CellState::Free
                }
            }
            ThresholdMode::Trinary => {
                let p = (255.0 - intensity as f64) / 255.0;
                if p > self.occupied_thresh {
                    CellState::Occupied
                } else if p < self.free_thresh {
                    CellState::Free
                } else {
                    CellState::Unknown
                }
            }
        }
    }
}
