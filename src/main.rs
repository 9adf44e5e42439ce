//! vastu-mesh - Batch converter from ROS occupancy maps to Gazebo models
//!
//! ## Usage
//!
//! ```bash
//! # Convert every map YAML in ./maps
//! vastu-mesh --map-dir maps --model-dir ~/.gazebo/models --world-dir worlds
//!
//! # Taller walls, ROS trinary thresholds, settings from a file
//! vastu-mesh --map-dir maps --height 2.0 --threshold trinary --config vastu-mesh.toml
//! ```
//!
//! Each map YAML becomes `<model-dir>/<name>/` (mesh, SDF, model.config) and
//! `<world-dir>/<name>.sdf`. A failing map, including one whose YAML does
//! not parse or validate, is reported and counted as failed; the run only
//! aborts when there is nothing to convert.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use vastu_mesh::{ConvertConfig, ThresholdMode, process_dir};

#[derive(Parser)]
#[command(name = "vastu-mesh")]
#[command(about = "Extrude ROS occupancy-grid maps into Gazebo model bundles")]
struct Args {
    /// Directory containing map YAML files
    #[arg(long)]
    map_dir: PathBuf,

    /// Gazebo model output directory
    #[arg(long, default_value = ".")]
    model_dir: PathBuf,

    /// World output directory
    #[arg(long, default_value = ".")]
    world_dir: PathBuf,

    /// Wall height in meters (overrides config)
    #[arg(long)]
    height: Option<f64>,

    /// Pixel classification rule (overrides config)
    #[arg(long, value_enum)]
    threshold: Option<ThresholdMode>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ConvertConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ConvertConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    if let Some(height) = args.height {
        config.mesh.height = height;
    }
    if let Some(threshold) = args.threshold {
        config.grid.threshold = threshold;
    }
    if let Err(e) = config.validate() {
        log::error!("{}", e);
        return ExitCode::FAILURE;
    }

    if !args.map_dir.is_dir() {
        log::error!(
            "Map directory {} not found or is not a directory",
            args.map_dir.display()
        );
        return ExitCode::FAILURE;
    }

    log::info!(
        "Converting maps in {} (height {} m, {} thresholds)",
        args.map_dir.display(),
        config.mesh.height,
        config.grid.threshold
    );

    let summary = match process_dir(&args.map_dir, &args.model_dir, &args.world_dir, &config) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if summary.succeeded + summary.failed == 0 {
        log::error!("No map metadata files found in {}", args.map_dir.display());
        return ExitCode::FAILURE;
    }

    for failure in &summary.failures {
        println!("FAILED {} [{}]: {}", failure.name, failure.kind, failure.message);
    }
    println!(
        "Conversion completed. Success: {}, Failed: {}",
        summary.succeeded, summary.failed
    );

    ExitCode::SUCCESS
}
