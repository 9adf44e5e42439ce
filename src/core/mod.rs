//! Core types shared by every pipeline stage.
//!
//! - [`WorldPoint`] and [`PixelPoint`]: coordinate types
//! - [`MapMetadata`] and [`MapOrigin`]: the per-map description record
//! - [`pixel_to_world`] and [`resolution_from_span`]: helpers for editing
//!   front-ends that pick origin and scale on the image

mod frame;
mod metadata;

pub use frame::{
    PixelPoint, WorldPoint, grid_corner_to_world, pixel_to_world, resolution_from_span,
};
pub use metadata::{DEFAULT_FREE_THRESH, DEFAULT_OCCUPIED_THRESH, MapMetadata, MapOrigin};
