//! Test utilities for VastuMesh integration tests.
//!
//! Builds small map rasters and their YAML metadata on disk.

#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::path::{Path, PathBuf};

/// Black pixel (occupied)
pub const WALL: u8 = 0;

/// White pixel (free)
pub const FLOOR: u8 = 255;

/// Raster from rows of characters, top row first: `#` = wall, anything else = floor.
pub fn raster_from_ascii(rows: &[&str]) -> GrayImage {
    let height = rows.len() as u32;
    let width = rows.first().map_or(0, |r| r.len()) as u32;
    GrayImage::from_fn(width, height, |x, y| {
        let c = rows[y as usize].as_bytes()[x as usize];
        Luma([if c == b'#' { WALL } else { FLOOR }])
    })
}

/// Save `raster` as `<dir>/<name>.png` and write `<dir>/<name>.yaml` next to it.
///
/// Returns the YAML path.
pub fn write_map(dir: &Path, name: &str, raster: &GrayImage, resolution: f64) -> PathBuf {
    let image_file = format!("{name}.png");
    raster.save(dir.join(&image_file)).unwrap();
    write_yaml(dir, name, &image_file, resolution)
}

/// Write map YAML referencing `image` (relative to `dir`).
pub fn write_yaml(dir: &Path, name: &str, image: &str, resolution: f64) -> PathBuf {
    let yaml_path = dir.join(format!("{name}.yaml"));
    std::fs::write(
        &yaml_path,
        format!(
            "image: {image}\nresolution: {resolution}\norigin: [0.0, 0.0, 0.0]\n\
             occupied_thresh: 0.65\nfree_thresh: 0.196\nnegate: 0\n"
        ),
    )
    .unwrap();
    yaml_path
}

/// A small room: walls on the border, one pillar inside.
pub fn room() -> GrayImage {
    raster_from_ascii(&[
        "######", //
        "#....#", //
        "#..#.#", //
        "#....#", //
        "######",
    ])
}
