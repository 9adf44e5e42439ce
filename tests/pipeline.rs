//! End-to-end conversion tests: raster on disk to model bundle on disk.

mod common;

use approx::assert_relative_eq;
use tempfile::TempDir;

use vastu_mesh::discovery::load_metadata_dir;
use vastu_mesh::grid::{load, normalize};
use vastu_mesh::io::{load_stl, save_stl};
use vastu_mesh::mesh::build;
use vastu_mesh::{
    CellState, ConvertConfig, ErrorKind, MapMetadata, ThresholdMode, convert_map, package,
    process_maps,
};

use common::{raster_from_ascii, room, write_map, write_yaml};

fn exts() -> Vec<String> {
    vec!["yaml".to_string()]
}

#[test]
fn test_batch_with_missing_image() {
    let temp_dir = TempDir::new().unwrap();
    let maps_dir = temp_dir.path().join("maps");
    let models = temp_dir.path().join("models");
    let worlds = temp_dir.path().join("worlds");
    std::fs::create_dir(&maps_dir).unwrap();

    let m1 = MapMetadata::from_yaml_file(write_map(&maps_dir, "m1", &room(), 0.05)).unwrap();
    let m2 = MapMetadata::from_yaml_file(write_yaml(&maps_dir, "m2", "missing.png", 0.05)).unwrap();
    let m3 = MapMetadata::from_yaml_file(write_map(&maps_dir, "m3", &room(), 0.1)).unwrap();

    let summary = process_maps(&[m1, m2, m3], &models, &worlds, &ConvertConfig::default());
    assert_eq!(summary.counts(), (2, 1));
    assert_eq!(summary.failures[0].name, "m2");
    assert_eq!(summary.failures[0].kind, ErrorKind::Io);

    for name in ["m1", "m3"] {
        assert!(models.join(name).join("meshes").join(format!("{name}.stl")).is_file());
        assert!(models.join(name).join(format!("{name}.sdf")).is_file());
        assert!(models.join(name).join("model.config").is_file());
        assert!(worlds.join(format!("{name}.sdf")).is_file());
    }
    assert!(!models.join("m2").exists());
    assert!(!worlds.join("m2.sdf").exists());
}

#[test]
fn test_batch_reports_decode_and_empty_failures() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();

    std::fs::write(dir.join("junk.png"), b"not a png").unwrap();
    write_yaml(dir, "junk", "junk.png", 0.05);
    write_map(dir, "blank", &raster_from_ascii(&["...", "..."]), 0.05);
    write_map(dir, "room", &room(), 0.05);

    let (maps, skipped) = load_metadata_dir(dir, &exts()).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(maps.len(), 3);

    let out = dir.join("out");
    let summary = process_maps(&maps, &out, &out, &ConvertConfig::default());
    assert_eq!(summary.counts(), (1, 2));

    let kinds: Vec<_> = summary
        .failures
        .iter()
        .map(|f| (f.name.as_str(), f.kind))
        .collect();
    assert!(kinds.contains(&("junk", ErrorKind::Decode)));
    assert!(kinds.contains(&("blank", ErrorKind::EmptyMesh)));
}

#[test]
fn test_package_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = write_map(temp_dir.path(), "room", &room(), 0.05);
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();
    let mesh = convert_map(&metadata, &ConvertConfig::default()).unwrap();

    let out = temp_dir.path().join("out");
    let first = package(&mesh, &metadata, &out, &out).unwrap();
    let read_all = |b: &vastu_mesh::ModelBundle| {
        [
            &b.mesh_path,
            &b.model_sdf_path,
            &b.manifest_path,
            &b.world_path,
        ]
        .map(|p| std::fs::read(p).unwrap())
    };
    let before = read_all(&first);

    let second = package(&mesh, &metadata, &out, &out).unwrap();
    assert_eq!(first, second);
    assert_eq!(before, read_all(&second));
}

#[test]
fn test_stl_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    // Cells far enough apart that no two vertices share a position
    let yaml = write_map(
        temp_dir.path(),
        "posts",
        &raster_from_ascii(&["#...", "....", "..#."]),
        0.05,
    );
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();
    let mesh = convert_map(&metadata, &ConvertConfig::default()).unwrap();
    assert_eq!(mesh.face_count(), 24);

    let path = temp_dir.path().join("posts.stl");
    save_stl(&mesh, &path).unwrap();
    let loaded = load_stl(&path).unwrap();

    assert_eq!(loaded.vertex_count(), mesh.vertex_count());
    assert_eq!(loaded.face_count(), mesh.face_count());
    // Reader numbers vertices in first-seen order, so match by position
    for v in loaded.vertices() {
        assert!(mesh.vertices().iter().any(|o| (*o - *v).length() < 1e-6));
    }
    assert!(loaded.is_volume());
    assert_relative_eq!(loaded.signed_volume(), mesh.signed_volume(), epsilon = 1e-6);
}

#[test]
fn test_stl_round_trip_welds_adjacent_cells() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = write_map(temp_dir.path(), "pair", &raster_from_ascii(&["##"]), 1.0);
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();
    let mesh = convert_map(&metadata, &ConvertConfig::default()).unwrap();
    assert_eq!(mesh.vertex_count(), 16);
    assert_eq!(mesh.face_count(), 24);

    let path = temp_dir.path().join("pair.stl");
    save_stl(&mesh, &path).unwrap();
    let loaded = load_stl(&path).unwrap();

    // The four corners on the shared wall collapse into single vertices
    assert_eq!(loaded.vertex_count(), 12);
    assert_eq!(loaded.face_count(), mesh.face_count());
    assert_relative_eq!(loaded.signed_volume(), mesh.signed_volume(), epsilon = 1e-6);
    assert_relative_eq!(loaded.signed_volume(), 2.0 * 1.5, epsilon = 1e-6);
}

#[test]
fn test_single_cell_volume() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = write_map(temp_dir.path(), "dot", &raster_from_ascii(&["...", ".#.", "..."]), 0.2);
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();

    let mut config = ConvertConfig::default();
    config.mesh.height = 3.0;
    let mesh = convert_map(&metadata, &config).unwrap();

    assert_eq!(mesh.vertex_count(), 8);
    assert_relative_eq!(mesh.signed_volume(), 0.2 * 0.2 * 3.0, epsilon = 1e-9);
    for v in mesh.vertices() {
        assert!([0.2, 0.4].iter().any(|c| (v.x - c).abs() < 1e-12));
        assert!([0.2, 0.4].iter().any(|c| (v.y - c).abs() < 1e-12));
        assert!(v.z == 0.0 || v.z == 3.0);
    }
}

#[test]
fn test_top_row_lands_at_max_grid_y() {
    let temp_dir = TempDir::new().unwrap();
    let yaml = write_map(
        temp_dir.path(),
        "strip",
        &raster_from_ascii(&["####", "....", "...."]),
        1.0,
    );
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();
    let grid = normalize(&load(metadata.image_path()).unwrap(), &metadata);

    assert!(grid.occupied_cells().all(|(_, y)| y == 2));
    assert_eq!(grid.counts().occupied, 4);

    let (lo, hi) = build(&grid, 1.0).unwrap().bounds().unwrap();
    assert_relative_eq!(lo.y, 2.0);
    assert_relative_eq!(hi.y, 3.0);
}

#[test]
fn test_threshold_boundary_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let raster = image::GrayImage::from_fn(2, 1, |x, _| image::Luma([if x == 0 { 253 } else { 252 }]));
    let yaml = write_map(temp_dir.path(), "edge", &raster, 1.0);
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();
    let grid = normalize(&load(metadata.image_path()).unwrap(), &metadata);

    assert_eq!(grid.get(0, 0), Some(CellState::Free));
    assert_eq!(grid.get(1, 0), Some(CellState::Occupied));
}

#[test]
fn test_trinary_skips_unknown_gray() {
    let temp_dir = TempDir::new().unwrap();
    let raster = image::GrayImage::from_fn(3, 1, |x, _| image::Luma([[0, 205, 255][x as usize]]));
    let yaml = write_map(temp_dir.path(), "gray", &raster, 1.0);
    let metadata = MapMetadata::from_yaml_file(yaml).unwrap();

    let binary = convert_map(&metadata, &ConvertConfig::default()).unwrap();
    assert_eq!(binary.face_count(), 24);

    let mut config = ConvertConfig::default();
    config.grid.threshold = ThresholdMode::Trinary;
    let trinary = convert_map(&metadata, &config).unwrap();
    assert_eq!(trinary.face_count(), 12);
}

#[test]
fn test_relative_image_resolved_against_yaml_dir() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("site/maps");
    std::fs::create_dir_all(&nested).unwrap();
    let yaml = write_map(&nested, "lab", &room(), 0.05);

    let metadata = MapMetadata::from_yaml_file(&yaml).unwrap();
    assert_eq!(metadata.image_path(), nested.join("lab.png").as_path());
    assert!(metadata.image_path().is_file());
}
