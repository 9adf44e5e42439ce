//! Map metadata record (ROS map_server YAML format).
//!
//! A [`MapMetadata`] is the only thing the conversion pipeline needs to know
//! about a map besides its pixels. It can come from a YAML file next to the
//! image, or be assembled in code by an editing front-end that picked scale
//! and origin interactively.
//!
//! ## YAML Format
//!
//! ```yaml
//! image: office.pgm
//! resolution: 0.05
//! origin: [-10.0, -10.0, 0.0]
//! occupied_thresh: 0.65
//! free_thresh: 0.196
//! negate: 0
//! ```
//!
//! Relative `image` paths are resolved against the YAML file's directory.
//! The map name defaults to the YAML file stem.

use crate::core::frame::{PixelPoint, WorldPoint, pixel_to_world};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default threshold for occupied cells (ROS map_server default)
pub const DEFAULT_OCCUPIED_THRESH: f64 = 0.65;

/// Default threshold for free cells (ROS map_server default)
pub const DEFAULT_FREE_THRESH: f64 = 0.196;

/// Characters rejected in map names
const FORBIDDEN_NAME_CHARS: [char; 7] = ['/', '\\', '<', '>', '&', '"', '\''];

/// World-frame pose of the map's pixel-coordinate origin
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct MapOrigin {
    /// X in meters
    pub x: f64,
    /// Y in meters
    pub y: f64,
    /// Yaw in radians
    pub theta: f64,
}

impl MapOrigin {
    /// Create a new origin
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Planar part of the origin
    pub fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, self.y)
    }
}

/// Raw map YAML as written by ROS map_saver and friends.
#[derive(Debug, Deserialize)]
struct MapYaml {
    /// Image filename (relative to YAML file or absolute)
    image: String,

    /// Map resolution in meters per pixel
    resolution: f64,

    /// Origin of map [x, y, yaw]
    origin: [f64; 3],

    #[serde(default = "default_occupied_thresh")]
    occupied_thresh: f64,

    #[serde(default = "default_free_thresh")]
    free_thresh: f64,
}

fn default_occupied_thresh() -> f64 {
    DEFAULT_OCCUPIED_THRESH
}

fn default_free_thresh() -> f64 {
    DEFAULT_FREE_THRESH
}

/// Immutable description of one map.
///
/// Construct through [`MapMetadata::new`] or [`MapMetadata::from_yaml_file`];
/// both validate, so a `MapMetadata` in hand always satisfies
/// `resolution > 0` and `0 <= free_thresh <= occupied_thresh <= 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct MapMetadata {
    name: String,
    image_path: PathBuf,
    resolution: f64,
    origin: MapOrigin,
    occupied_thresh: f64,
    free_thresh: f64,
}

impl MapMetadata {
    /// Create metadata with default thresholds.
    pub fn new(
        name: impl Into<String>,
        image_path: impl Into<PathBuf>,
        resolution: f64,
        origin: MapOrigin,
    ) -> Result<Self> {
        let metadata = Self {
            name: name.into(),
            image_path: image_path.into(),
            resolution,
            origin,
            occupied_thresh: DEFAULT_OCCUPIED_THRESH,
            free_thresh: DEFAULT_FREE_THRESH,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    /// Replace occupancy thresholds.
    pub fn with_thresholds(mut self, occupied_thresh: f64, free_thresh: f64) -> Result<Self> {
        self.occupied_thresh = occupied_thresh;
        self.free_thresh = free_thresh;
        self.validate()?;
        Ok(self)
    }

    /// Set the origin so that `pixel` (image frame) becomes world (0, 0).
    pub fn with_origin_pixel(mut self, pixel: PixelPoint, image_height: u32) -> Self {
        let world = pixel_to_world(pixel, self.resolution, image_height);
        self.origin = MapOrigin::new(world.x, world.y, 0.0);
        self
    }

    /// Load metadata from a ROS map YAML file.
    ///
    /// The map name is the file stem; a relative image path is resolved
    /// against the YAML file's directory.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                Error::Validation(format!("cannot derive map name from {}", path.display()))
            })?;
        let base_dir = path.parent().unwrap_or(Path::new("."));

        Self::from_yaml_str(&content, name, base_dir).map_err(|e| match e {
            Error::Validation(msg) => {
                Error::Validation(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse metadata from YAML text.
    pub fn from_yaml_str(content: &str, name: &str, base_dir: &Path) -> Result<Self> {
        let raw: MapYaml = serde_yaml::from_str(content)
            .map_err(|e| Error::Validation(format!("invalid map metadata: {}", e)))?;

        let image = PathBuf::from(&raw.image);
        let image_path = if image.is_absolute() {
            image
        } else {
            base_dir.join(image)
        };

        let metadata = Self {
            name: name.to_string(),
            image_path,
            resolution: raw.resolution,
            origin: MapOrigin::new(raw.origin[0], raw.origin[1], raw.origin[2]),
            occupied_thresh: raw.occupied_thresh,
            free_thresh: raw.free_thresh,
        };
        metadata.validate()?;
        Ok(metadata)
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("map name is empty".to_string()));
        }
        // The name becomes a directory, file stems and SDF attribute text
        if self.name == "."
            || self.name == ".."
            || self
                .name
                .chars()
                .any(|c| c.is_control() || FORBIDDEN_NAME_CHARS.contains(&c))
        {
            return Err(Error::Validation(format!(
                "map name {:?} must not contain path separators or XML markup characters",
                self.name
            )));
        }
        if self.image_path.as_os_str().is_empty() {
            return Err(Error::Validation("image path is empty".to_string()));
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::Validation(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if !(self.origin.x.is_finite() && self.origin.y.is_finite() && self.origin.theta.is_finite())
        {
            return Err(Error::Validation("origin must be finite".to_string()));
        }
        for (label, value) in [
            ("occupied_thresh", self.occupied_thresh),
            ("free_thresh", self.free_thresh),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Validation(format!(
                    "{} must be within [0, 1], got {}",
                    label, value
                )));
            }
        }
        if self.free_thresh > self.occupied_thresh {
            return Err(Error::Validation(format!(
                "free_thresh ({}) exceeds occupied_thresh ({})",
                self.free_thresh, self.occupied_thresh
            )));
        }
        Ok(())
    }

    /// Map name (used for file and model names)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the raster image
    pub fn image_path(&self) -> &Path {
        &self.image_path
    }

    /// Meters per pixel
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// World pose of the pixel-coordinate origin
    pub fn origin(&self) -> MapOrigin {
        self.origin
    }

    /// Occupied probability threshold
    pub fn occupied_thresh(&self) -> f64 {
        self.occupied_thresh
    }

    /// Free probability threshold
    pub fn free_thresh(&self) -> f64 {
        self.free_thresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const YAML: &str = "image: office.pgm\nresolution: 0.05\norigin: [-10.0, -5.0, 0.0]\nnegate: 0\n";

    #[test]
    fn test_parse_with_defaults() {
        let meta = MapMetadata::from_yaml_str(YAML, "office", Path::new("/maps")).unwrap();
        assert_eq!(meta.name(), "office");
        assert_eq!(meta.image_path(), Path::new("/maps/office.pgm"));
        assert_relative_eq!(meta.resolution(), 0.05);
        assert_relative_eq!(meta.origin().x, -10.0);
        assert_relative_eq!(meta.origin().y, -5.0);
        assert_relative_eq!(meta.occupied_thresh(), DEFAULT_OCCUPIED_THRESH);
        assert_relative_eq!(meta.free_thresh(), DEFAULT_FREE_THRESH);
    }

    #[test]
    fn test_absolute_image_path_kept() {
        let yaml = "image: /data/lab.png\nresolution: 0.1\norigin: [0, 0, 0]\n";
        let meta = MapMetadata::from_yaml_str(yaml, "lab", Path::new("/maps")).unwrap();
        assert_eq!(meta.image_path(), Path::new("/data/lab.png"));
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let yaml = "image: a.png\norigin: [0, 0, 0]\n";
        let err = MapMetadata::from_yaml_str(yaml, "a", Path::new(".")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_rejects_bad_values() {
        let origin = MapOrigin::default();
        assert!(MapMetadata::new("m", "m.png", 0.0, origin).is_err());
        assert!(MapMetadata::new("m", "m.png", -0.1, origin).is_err());
        assert!(MapMetadata::new("", "m.png", 0.1, origin).is_err());

        let meta = MapMetadata::new("m", "m.png", 0.1, origin).unwrap();
        assert!(meta.clone().with_thresholds(0.3, 0.6).is_err());
        assert!(meta.clone().with_thresholds(1.2, 0.1).is_err());
        assert!(meta.with_thresholds(0.6, 0.3).is_ok());
    }

    #[test]
    fn test_rejects_unsafe_names() {
        let origin = MapOrigin::default();
        for name in ["a/b", "..", ".", "a\\b", "lab<1>", "r&d", "it's", "tab\there"] {
            let err = MapMetadata::new(name, "m.png", 0.1, origin).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{name:?} accepted");
        }
        assert!(MapMetadata::new("floor_2-east.v1", "m.png", 0.1, origin).is_ok());
    }

    #[test]
    fn test_with_origin_pixel() {
        let meta = MapMetadata::new("m", "m.png", 0.05, MapOrigin::default())
            .unwrap()
            .with_origin_pixel(PixelPoint::new(10.0, 90.0), 100);
        assert_relative_eq!(meta.origin().x, -0.525, epsilon = 1e-12);
        assert_relative_eq!(meta.origin().y, -0.525, epsilon = 1e-12);
        assert_relative_eq!(meta.origin().theta, 0.0);
    }
}
