pub mod types;
pub mod config;
pub mod error;
pub mod data;
pub mod processing;
pub mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_INPUT: &str = "Steam.geojson";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the points, their connecting path and overlap markers to an HTML map
    Render {
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Config file (defaults to ./config.toml when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Initial zoom level, overriding the config
        #[arg(short, long)]
        zoom: Option<u8>,
        /// Output file (defaults to Map_of_<input name>.html)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Print how often each distinct coordinate occurs
    Overlaps {
        #[arg(value_name = "INPUT", default_value = DEFAULT_INPUT)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render { input, config, zoom, output } => {
            let mut app_config = config::AppConfig::resolve(config.as_deref())?;
            if let Some(zoom) = zoom {
                app_config.map.zoom_start = zoom;
            }
            let output = output.unwrap_or_else(|| render::output_file_name(&input));

            render_map(&input, &output, &app_config)?;
            println!("The map has been saved to {}", output.display());
        }
        Commands::Overlaps { input } => {
            let geometries = data::load_geometries(&input)?;
            let coords = processing::extract_coordinates(&geometries)?;
            let overlaps = processing::rank_by_frequency(processing::count_overlaps(&coords));

            println!("{:>6}  {:>12}  {:>12}", "count", "lat", "lon");
            for overlap in overlaps {
                println!(
                    "{:>6}  {:>12.6}  {:>12.6}",
                    overlap.count, overlap.coordinate.lat, overlap.coordinate.lon
                );
            }
        }
    }

    Ok(())
}

fn render_map(input: &Path, output: &Path, app_config: &config::AppConfig) -> Result<()> {
    // 1. Load
    let geometries = data::load_geometries(input)?;

    // 2. Extract and count
    let coords = processing::extract_coordinates(&geometries)?;
    let overlaps = processing::count_overlaps(&coords);
    let center = processing::mean_center(&coords)?;
    info!("Map center at ({:.6}, {:.6})", center.lat, center.lon);

    // 3. Render
    let map = render::build_map(&coords, &overlaps, center, app_config);
    map.save(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_map_end_to_end() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Steam.geojson");
        fs::write(&input, r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Polygon",
                "coordinates": [[[1.0, 1.0], [3.0, 1.0], [3.0, 3.0], [1.0, 3.0], [1.0, 1.0]]]}}
        ]}"#).unwrap();
        let output = dir.path().join(render::output_file_name(&input));

        render_map(&input, &output, &config::AppConfig::default()).unwrap();

        let html = fs::read_to_string(&output).unwrap();
        assert!(output.ends_with("Map_of_Steam.html"));
        assert!(html.contains("Overlap 2 times"));
        assert!(html.contains("Overlap 1 times"));
    }

    #[test]
    fn test_missing_input_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Steam.geojson");
        let output = dir.path().join("Map_of_Steam.html");

        let err = render_map(&input, &output, &config::AppConfig::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<error::MapError>(), Some(error::MapError::NotFound { .. })));
        assert!(!output.exists());
    }

    #[test]
    fn test_empty_collection_is_error() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("empty.geojson");
        fs::write(&input, r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        let output = dir.path().join("Map_of_empty.html");

        let err = render_map(&input, &output, &config::AppConfig::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<error::MapError>(), Some(error::MapError::EmptyDataset)));
        assert!(!output.exists());
    }

    #[test]
    fn test_null_geometry_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Steam.geojson");
        fs::write(&input, r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [1.0, 1.0]}},
            {"type": "Feature", "properties": {}, "geometry": null},
            {"type": "Feature", "properties": {}, "geometry": {"type": "Point", "coordinates": [2.0, 2.0]}}
        ]}"#).unwrap();
        let output = dir.path().join("Map_of_Steam.html");

        let err = render_map(&input, &output, &config::AppConfig::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<error::MapError>(), Some(error::MapError::NullGeometry { index: 1 })));
        assert!(!output.exists());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["overlap_map", "render"]).unwrap();
        match cli.command {
            Commands::Render { input, config, zoom, output } => {
                assert_eq!(input, PathBuf::from(DEFAULT_INPUT));
                assert!(config.is_none() && zoom.is_none() && output.is_none());
            }
            _ => panic!("expected render"),
        }
    }
}
