use crate::config::AppConfig;
use crate::types::{Coordinate, Overlap};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const MAP_DATA_PLACEHOLDER: &str = "__MAP_DATA__";
const FALLBACK_STEM: &str = "map";

/// Everything the page needs to draw the map. Serialized as-is into the HTML.
#[derive(Debug, Clone, Serialize)]
pub struct MapDocument {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tile_layer: TileLayer,
    pub path: PolyLine,
    pub markers: Vec<CircleMarker>,
    pub layer_control: bool,
    pub scale_control: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
    pub name: String,
    pub overlay: bool,
    pub control: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolyLine {
    pub locations: Vec<[f64; 2]>,
    pub color: String,
    pub weight: f64,
    pub opacity: f64,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleMarker {
    pub location: [f64; 2],
    pub count: usize,
    pub radius: f64,
    pub color: String,
    pub fill: bool,
    pub fill_opacity: f64,
    pub tooltip: String,
}

pub fn marker_radius(count: usize) -> f64 {
    5.0 + count as f64 * 2.0
}

/// `Steam.geojson` -> `Map_of_Steam.html`
pub fn output_file_name(input: &Path) -> PathBuf {
    let stem = input.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(FALLBACK_STEM);
    PathBuf::from(format!("Map_of_{}.html", stem))
}

fn latlon(coord: &Coordinate) -> [f64; 2] {
    [coord.lat, coord.lon]
}

pub fn build_map(
    coords: &[Coordinate],
    overlaps: &[Overlap],
    center: Coordinate,
    config: &AppConfig,
) -> MapDocument {
    let style = &config.map;

    let tile_layer = TileLayer {
        url: config.tiles.tiles_url(),
        attribution: config.tiles.attribution.clone(),
        name: config.tiles.name.clone(),
        overlay: false,
        control: true,
    };

    let path = PolyLine {
        locations: coords.iter().map(latlon).collect(),
        color: style.line_color.clone(),
        weight: style.line_weight,
        opacity: style.line_opacity,
        tooltip: "Link".to_string(),
    };

    let markers = overlaps.iter().map(|overlap| CircleMarker {
        location: latlon(&overlap.coordinate),
        count: overlap.count,
        radius: marker_radius(overlap.count),
        color: style.marker_color.clone(),
        fill: true,
        fill_opacity: style.marker_fill_opacity,
        tooltip: format!("Overlap {} times", overlap.count),
    }).collect();

    MapDocument {
        center: latlon(&center),
        zoom: style.zoom_start,
        tile_layer,
        path,
        markers,
        layer_control: true,
        scale_control: true,
    }
}

impl MapDocument {
    pub fn to_html(&self) -> Result<String> {
        let data = serde_json::to_string(self).context("Failed to serialize map data")?;
        // Keep the data from terminating the surrounding <script> element.
        let data = data.replace("</", "<\\/");
        Ok(PAGE_TEMPLATE.replace(MAP_DATA_PLACEHOLDER, &data))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let html = self.to_html()?;
        fs::write(path, html)
            .with_context(|| format!("Failed to write map file: {:?}", path))?;
        info!(
            "Wrote {} markers and a {}-point path to {:?}",
            self.markers.len(),
            self.path.locations.len(),
            path
        );
        Ok(())
    }
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Overlap Map</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" />
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
    <style>
        html, body { width: 100%; height: 100%; margin: 0; padding: 0; }
        #map { position: absolute; top: 0; bottom: 0; left: 0; right: 0; }
    </style>
</head>
<body>
    <div id="map"></div>
    <script>
        const doc = __MAP_DATA__;

        const map = L.map("map", { center: doc.center, zoom: doc.zoom });

        const base = L.tileLayer(doc.tile_layer.url, {
            attribution: doc.tile_layer.attribution
        }).addTo(map);

        L.polyline(doc.path.locations, {
            color: doc.path.color,
            weight: doc.path.weight,
            opacity: doc.path.opacity
        }).bindTooltip(doc.path.tooltip).addTo(map);

        doc.markers.forEach(function (m) {
            L.circleMarker(m.location, {
                radius: m.radius,
                color: m.color,
                fill: m.fill,
                fillOpacity: m.fill_opacity
            }).bindTooltip(m.tooltip).addTo(map);
        });

        if (doc.layer_control) {
            const baseLayers = {};
            const overlays = {};
            if (doc.tile_layer.control) {
                (doc.tile_layer.overlay ? overlays : baseLayers)[doc.tile_layer.name] = base;
            }
            L.control.layers(baseLayers, overlays).addTo(map);
        }

        if (doc.scale_control) {
            L.control.scale().addTo(map);
        }
    </script>
</body>
</html>
"#;
