//! Raster loading.
//!
//! Any format the `image` crate decodes is accepted (PNG, BMP, JPEG and
//! the PGM files written by ROS map_saver among them). The format is
//! detected from the file contents, not the extension.

use crate::error::{Error, Result};
use image::DynamicImage;
use std::path::Path;

/// Read and decode a raster image.
///
/// Fails with [`Error::Io`] if the file is missing or unreadable and with
/// [`Error::Decode`] if the bytes are not a valid image.
pub fn load(image_path: impl AsRef<Path>) -> Result<DynamicImage> {
    let path = image_path.as_ref();
    log::info!("Loading map file: {}", path.display());

    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    image::load_from_memory(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}
