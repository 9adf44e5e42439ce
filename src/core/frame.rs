//! Point types and pixel/world frame conversions.
//!
//! Two conventions meet here:
//!
//! - **Image frame**: origin at the top-left pixel, +Y pointing down.
//! - **World frame**: ROS REP-103, origin at the bottom-left of the map, +Y up.
//!
//! The occupancy grid itself is stored bottom-up (row 0 = lowest world Y), so
//! grid corners map to world with a plain scale + offset. Picking an origin
//! from a clicked image pixel goes through [`pixel_to_world`], which carries
//! the sign and half-pixel convention expected by the simulator world frame.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// World coordinates (meters)
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// X coordinate in meters
    pub x: f64,
    /// Y coordinate in meters
    pub y: f64,
}

impl WorldPoint {
    /// Create a new world point
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Zero point (origin)
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y)
    }
}

/// Image pixel position (may be fractional, e.g. a mouse click on a scaled canvas)
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PixelPoint {
    /// Column, left to right
    pub x: f64,
    /// Row, top to bottom
    pub y: f64,
}

impl PixelPoint {
    /// Create a new pixel point
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance in pixels
    #[inline]
    pub fn distance(&self, other: &PixelPoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Map a picked image pixel to the world-frame map origin.
///
/// `world_x = -(px + 0.5) * resolution`
/// `world_y = -((image_height - py) + 0.5) * resolution`
///
/// The result is the origin value to store in map metadata so that the
/// picked pixel lands on world (0, 0).
pub fn pixel_to_world(pixel: PixelPoint, resolution: f64, image_height: u32) -> WorldPoint {
    let world_x = -((pixel.x + 0.5) * resolution);
    let world_y = -(((image_height as f64 - pixel.y) + 0.5) * resolution);
    WorldPoint::new(world_x, world_y)
}

/// World position of a grid corner.
///
/// Grid corner `(x, y)` is the lower-left corner of cell `(x, y)` in the
/// bottom-up occupancy grid.
#[inline]
pub fn grid_corner_to_world(x: usize, y: usize, resolution: f64, origin: WorldPoint) -> WorldPoint {
    WorldPoint::new(
        x as f64 * resolution + origin.x,
        y as f64 * resolution + origin.y,
    )
}

/// Meters per pixel from two points measured on a (possibly scaled) display.
///
/// `display_scale` is the display zoom factor: a canvas showing the image at
/// half size has `display_scale = 0.5`. The measured pixel span is divided by
/// it to recover image pixels before dividing the real distance.
pub fn resolution_from_span(
    p1: PixelPoint,
    p2: PixelPoint,
    distance_m: f64,
    display_scale: f64,
) -> Result<f64> {
    if !(distance_m.is_finite() && distance_m > 0.0) {
        return Err(Error::Validation(format!(
            "measured distance must be positive, got {}",
            distance_m
        )));
    }
    if !(display_scale.is_finite() && display_scale > 0.0) {
        return Err(Error::Validation(format!(
            "display scale must be positive, got {}",
            display_scale
        )));
    }

    let pixel_distance = p1.distance(&p2);
    if pixel_distance <= f64::EPSILON {
        return Err(Error::Validation(
            "measurement points coincide".to_string(),
        ));
    }

    Ok(distance_m / (pixel_distance / display_scale))
}
