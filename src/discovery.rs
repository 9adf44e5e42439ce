//! Metadata file discovery for batch runs.

use crate::core::MapMetadata;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Metadata files in `dir` whose extension matches one of `extensions`
/// (case-insensitive), sorted by path. Subdirectories are not searched.
pub fn find_metadata_files(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        })
        .collect();
    files.sort();

    Ok(files)
}

/// Metadata files that could not be parsed, with the reason
pub type SkippedFiles = Vec<(PathBuf, Error)>;

/// Parse every metadata file found in `dir`.
///
/// Files that fail to parse are logged and returned separately; they never
/// stop the others from loading.
pub fn load_metadata_dir(
    dir: &Path,
    extensions: &[String],
) -> Result<(Vec<MapMetadata>, SkippedFiles)> {
    let files = find_metadata_files(dir, extensions)?;
    log::info!("Found {} metadata files in {}", files.len(), dir.display());

    let mut maps = Vec::with_capacity(files.len());
    let mut skipped = Vec::new();

    for path in files {
        match MapMetadata::from_yaml_file(&path) {
            Ok(metadata) => {
                log::info!("Added map: {}", metadata.name());
                maps.push(metadata);
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", path.display(), e);
                skipped.push((path, e));
            }
        }
    }

    Ok((maps, skipped))
}
