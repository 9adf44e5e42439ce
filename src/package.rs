//! Model bundle packaging and batch processing.
//!
//! ## Output Layout
//!
//! ```text
//! <model_root>/<name>/meshes/<name>.stl
//! <model_root>/<name>/<name>.sdf
//! <model_root>/<name>/model.config
//! <world_root>/<name>.sdf
//! ```
//!
//! Packaging is not atomic: a failure part-way leaves the files written so
//! far in place. Re-running with the same inputs overwrites every file.

use crate::config::ConvertConfig;
use crate::core::MapMetadata;
use crate::discovery::{SkippedFiles, load_metadata_dir};
use crate::error::{Error, ErrorKind, Result};
use crate::io::{
    DESCRIPTOR_EXTENSION, MANIFEST_FILENAME, MESH_EXTENSION, model_config, model_sdf, save_stl,
    world_sdf,
};
use crate::mesh::Mesh;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of one packaged map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelBundle {
    /// `<model_root>/<name>`
    pub model_dir: PathBuf,
    /// Binary STL mesh
    pub mesh_path: PathBuf,
    /// Model descriptor
    pub model_sdf_path: PathBuf,
    /// Model manifest
    pub manifest_path: PathBuf,
    /// World descriptor
    pub world_path: PathBuf,
}

impl ModelBundle {
    /// Bundle paths for map `name`; nothing is touched on disk.
    pub fn layout(name: &str, model_root: &Path, world_root: &Path) -> Self {
        let model_dir = model_root.join(name);
        Self {
            mesh_path: model_dir
                .join("meshes")
                .join(format!("{name}.{MESH_EXTENSION}")),
            model_sdf_path: model_dir.join(format!("{name}.{DESCRIPTOR_EXTENSION}")),
            manifest_path: model_dir.join(MANIFEST_FILENAME),
            world_path: world_root.join(format!("{name}.{DESCRIPTOR_EXTENSION}")),
            model_dir,
        }
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::io(path, e))
}

fn write_text(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

/// Write a mesh and its descriptors as a Gazebo model bundle.
///
/// Fails with [`Error::EmptyMesh`] before touching the filesystem if the
/// mesh has no faces, and with [`Error::Io`] on any directory or file
/// write failure.
pub fn package(
    mesh: &Mesh,
    metadata: &MapMetadata,
    model_root: &Path,
    world_root: &Path,
) -> Result<ModelBundle> {
    let name = metadata.name();
    if mesh.is_empty() {
        return Err(Error::EmptyMesh {
            name: name.to_string(),
        });
    }

    let bundle = ModelBundle::layout(name, model_root, world_root);
    create_dir(&bundle.model_dir.join("meshes"))?;
    create_dir(world_root)?;

    log::info!("Exporting to file: {}", bundle.mesh_path.display());
    save_stl(mesh, &bundle.mesh_path)?;

    write_text(&bundle.model_sdf_path, &model_sdf(name))?;
    write_text(&bundle.manifest_path, &model_config(name))?;
    write_text(&bundle.world_path, &world_sdf(name))?;

    Ok(bundle)
}

/// One failed item of a batch
#[derive(Debug)]
pub struct BatchFailure {
    /// Map name
    pub name: String,
    /// Error category
    pub kind: ErrorKind,
    /// Full error message
    pub message: String,
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Maps packaged successfully
    pub succeeded: usize,
    /// Maps that failed
    pub failed: usize,
    /// Failure details, in processing order
    pub failures: Vec<BatchFailure>,
    /// Bundles written, in processing order
    pub bundles: Vec<ModelBundle>,
}

impl BatchSummary {
    /// `(success_count, fail_count)`
    pub fn counts(&self) -> (usize, usize) {
        (self.succeeded, self.failed)
    }

    /// Record the result of one item
    pub fn record(&mut self, name: &str, result: Result<ModelBundle>) {
        match result {
            Ok(bundle) => {
                log::info!("Successfully processed map: {}", name);
                self.succeeded += 1;
                self.bundles.push(bundle);
            }
            Err(e) => {
                log::error!("Failed to process map '{}' ({}): {}", name, e.kind(), e);
                self.failed += 1;
                self.failures.push(BatchFailure {
                    name: name.to_string(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    /// Count metadata files that failed to load as failed items.
    ///
    /// The item name is the file stem, matching the name a valid file
    /// would have produced.
    pub fn record_skipped(&mut self, skipped: SkippedFiles) {
        for (path, e) in skipped {
            let name = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            self.record(&name, Err(e));
        }
    }

    fn log_completion(&self) {
        log::info!(
            "Conversion completed. Success: {}, Failed: {}",
            self.succeeded,
            self.failed
        );
    }
}

/// Package already-built meshes, continuing past failures.
pub fn package_batch(
    items: &[(Mesh, MapMetadata)],
    model_root: &Path,
    world_root: &Path,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    for (mesh, metadata) in items {
        summary.record(
            metadata.name(),
            package(mesh, metadata, model_root, world_root),
        );
    }
    summary.log_completion();
    summary
}

/// Load, extrude and package one map.
pub fn process_map(
    metadata: &MapMetadata,
    model_root: &Path,
    world_root: &Path,
    config: &ConvertConfig,
) -> Result<ModelBundle> {
    let mesh = crate::convert_map(metadata, config)?;
    if mesh.is_empty() {
        log::warn!("Map '{}' produced an empty mesh", metadata.name());
    }
    package(&mesh, metadata, model_root, world_root)
}

/// Load, extrude and package every map, continuing past failures.
pub fn process_maps(
    maps: &[MapMetadata],
    model_root: &Path,
    world_root: &Path,
    config: &ConvertConfig,
) -> BatchSummary {
    let mut summary = BatchSummary::default();
    process_into(&mut summary, maps, model_root, world_root, config);
    summary
}

/// Discover, load, extrude and package every map in `map_dir`.
///
/// Metadata files that fail to parse or validate count as failed items
/// alongside maps that fail later in the pipeline. Only an unreadable
/// `map_dir` is an error.
pub fn process_dir(
    map_dir: &Path,
    model_root: &Path,
    world_root: &Path,
    config: &ConvertConfig,
) -> Result<BatchSummary> {
    let (maps, skipped) = load_metadata_dir(map_dir, &config.discovery.extensions)?;

    let mut summary = BatchSummary::default();
    summary.record_skipped(skipped);
    process_into(&mut summary, &maps, model_root, world_root, config);
    Ok(summary)
}

fn process_into(
    summary: &mut BatchSummary,
    maps: &[MapMetadata],
    model_root: &Path,
    world_root: &Path,
    config: &ConvertConfig,
) {
    for metadata in maps {
        log::info!("Processing map: {}", metadata.name());
        summary.record(
            metadata.name(),
            process_map(metadata, model_root, world_root, config),
        );
    }
    summary.log_completion();
}
