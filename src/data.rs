use crate::error::MapError;
use anyhow::{Context, Result, anyhow};
use geo::Geometry;
use geojson::GeoJson;
use shapefile::{Reader, Shape};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Reads every geometry in `path`, in file order.
pub fn load_geometries(path: &Path) -> Result<Vec<Geometry<f64>>> {
    if !path.exists() {
        return Err(MapError::NotFound { path: path.to_path_buf() }.into());
    }

    let extension = path.extension()
        .and_then(|e| e.to_str())
        .map(|s: &str| s.to_lowercase())
        .ok_or_else(|| MapError::MissingExtension { path: path.to_path_buf() })?;

    let geometries = match extension.as_str() {
        "json" | "geojson" => load_geojson(path)?,
        "shp" => load_shapefile(path)?,
        _ => return Err(MapError::UnsupportedFormat(extension).into()),
    };

    info!("Loaded {} geometries from {:?}", geometries.len(), path);
    Ok(geometries)
}

fn load_geojson(path: &Path) -> Result<Vec<Geometry<f64>>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open GeoJSON file: {:?}", path))?;
    let reader = BufReader::new(file);

    let geojson = GeoJson::from_reader(reader)
        .with_context(|| format!("Failed to parse GeoJSON: {:?}", path))?;

    let raw: Vec<Option<geojson::Geometry>> = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features.into_iter().map(|f| f.geometry).collect(),
        GeoJson::Feature(f) => vec![f.geometry],
        GeoJson::Geometry(g) => vec![Some(g)],
    };

    let mut geometries = Vec::with_capacity(raw.len());
    for (index, geometry) in raw.into_iter().enumerate() {
        let Some(geometry) = geometry else {
            return Err(MapError::NullGeometry { index }.into());
        };
        let geometry: Geometry<f64> = geometry.value.try_into()
            .map_err(|e| anyhow!("Failed to convert geojson geometry #{}: {:?}", index, e))?;
        geometries.push(geometry);
    }

    Ok(geometries)
}

fn load_shapefile(path: &Path) -> Result<Vec<Geometry<f64>>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open Shapefile: {:?}", path))?;

    let mut geometries = Vec::new();

    for (index, result) in reader.iter_shapes_and_records().enumerate() {
        let (shape, _record) = result?;

        if let Shape::NullShape = shape {
            return Err(MapError::NullGeometry { index }.into());
        }

        let geometry: Geometry<f64> = shape.try_into()
            .map_err(|e| anyhow!("Failed to convert shape #{}: {:?}", index, e))?;
        geometries.push(geometry);
    }

    Ok(geometries)
}
