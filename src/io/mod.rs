//! File formats written by the packager.
//!
//! - **Binary STL**: mesh interchange ([`save_stl`], [`load_stl`])
//! - **SDF**: Gazebo model, manifest and world descriptors ([`model_sdf`],
//!   [`model_config`], [`world_sdf`])

pub mod sdf;
pub mod stl;

pub use sdf::{
    DESCRIPTOR_EXTENSION, MANIFEST_FILENAME, MESH_EXTENSION, mesh_uri, model_config, model_sdf,
    world_sdf,
};
pub use stl::{load_stl, read_stl, save_stl, write_stl};
