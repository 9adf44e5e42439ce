//! Configuration for VastuMesh
//!
//! Loads tool settings from a TOML file. Every field has a default, so an
//! empty file (or no file at all) is a valid configuration.
//!
//! ```toml
//! [mesh]
//! height = 1.5
//!
//! [grid]
//! threshold = "binary"    # or "trinary"
//! max_pixels = 100000000  # 0 = unlimited
//!
//! [discovery]
//! extensions = ["yaml", "yml"]
//!
//! [logging]
//! level = "info"
//! ```

use crate::error::{Error, Result};
use crate::grid::ThresholdMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Mesh extrusion settings
    #[serde(default)]
    pub mesh: MeshSection,
    /// Raster classification settings
    #[serde(default)]
    pub grid: GridSection,
    /// Metadata discovery settings
    #[serde(default)]
    pub discovery: DiscoverySection,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Mesh extrusion settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MeshSection {
    /// Wall height in meters (default: 1.5)
    #[serde(default = "default_height")]
    pub height: f64,
}

/// Raster classification settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct GridSection {
    /// Pixel classification rule (default: binary)
    #[serde(default)]
    pub threshold: ThresholdMode,

    /// Largest raster accepted, in pixels (default: 100M, 0 = unlimited)
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,
}

/// Metadata discovery settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DiscoverySection {
    /// Metadata file extensions, matched case-insensitively
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

/// Logging settings
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct LoggingSection {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_height() -> f64 {
    1.5
}

fn default_max_pixels() -> u64 {
    100_000_000
}

fn default_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string()]
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for MeshSection {
    fn default() -> Self {
        Self {
            height: default_height(),
        }
    }
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            threshold: ThresholdMode::default(),
            max_pixels: default_max_pixels(),
        }
    }
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ConvertConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: ConvertConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.mesh.height.is_finite() && self.mesh.height > 0.0) {
            return Err(Error::Validation(format!(
                "mesh.height must be positive, got {}",
                self.mesh.height
            )));
        }
        if self.discovery.extensions.is_empty() {
            return Err(Error::Validation(
                "discovery.extensions must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a raster of `width` x `height` pixels is within limits
    pub fn accepts_raster(&self, width: u32, height: u32) -> bool {
        self.grid.max_pixels == 0 || (width as u64) * (height as u64) <= self.grid.max_pixels
    }
}
