//! Interactive HTML map output.
//!
//! [`LeafletRenderer`] emits a single self-contained page: Leaflet is loaded
//! from its CDN and all result data is embedded as a JSON literal.

use std::path::Path;

use serde_json::json;

use crate::error::EstimateError;
use crate::estimator::ReachabilityResult;

/// Turns a computed result into a visual artifact.
pub trait MapRenderer {
    /// # Errors
    ///
    /// Returns [`EstimateError::Render`] if the result cannot be encoded.
    fn render(&self, result: &ReachabilityResult) -> Result<String, EstimateError>;
}

const LEAFLET_VERSION: &str = "1.9.4";

/// Leaflet/OpenStreetMap renderer.
#[derive(Debug, Clone)]
pub struct LeafletRenderer {
    pub zoom: u8,
    pub tile_url: String,
    pub attribution: String,
    pub fill_color: String,
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self {
            zoom: 10,
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_owned(),
            attribution: "&copy; OpenStreetMap contributors".to_owned(),
            fill_color: "#3388ff".to_owned(),
        }
    }
}

impl LeafletRenderer {
    fn map_data(&self, result: &ReachabilityResult) -> serde_json::Value {
        let start = result.request.start();
        let boundary: Vec<serde_json::Value> = result
            .boundary_points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let distance = p
                    .driving_distance_km
                    .map(|km| format!("<br>Driving distance: {km:.1} km"))
                    .unwrap_or_default();
                let duration = p
                    .duration_min
                    .map(|min| format!("<br>Driving time: {min:.0} min"))
                    .unwrap_or_default();
                let popup = format!(
                    "Boundary Point {}: ({:.4}, {:.4})<br>Bearing: {:.1}&deg;{distance}{duration}<br>Status: {}",
                    i + 1,
                    p.coordinate.lat,
                    p.coordinate.lon,
                    p.bearing.degrees(),
                    p.status
                );
                json!({ "lat": p.coordinate.lat, "lon": p.coordinate.lon, "popup": popup })
            })
            .collect();

        json!({
            "start": {
                "lat": start.lat,
                "lon": start.lon,
                "popup": format!("Start: ({:.4}, {:.4})", start.lat, start.lon),
            },
            "zoom": self.zoom,
            "tiles": { "url": self.tile_url, "attribution": self.attribution },
            "polygon": {
                "type": "Feature",
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [result.polygon.to_lon_lat()],
                },
                "properties": {
                    "name": format!("EV Range ({} km)", result.request.battery_range_km()),
                },
            },
            "style": {
                "fillColor": self.fill_color,
                "color": self.fill_color,
                "weight": 2,
                "fillOpacity": 0.4,
            },
            "boundary": boundary,
            "excludedBearings": result.excluded_bearings,
        })
    }
}

impl MapRenderer for LeafletRenderer {
    fn render(&self, result: &ReachabilityResult) -> Result<String, EstimateError> {
        let data = serde_json::to_string(&self.map_data(result))
            .map_err(|e| EstimateError::Render(e.to_string()))?
            // Keep a literal `</script>` in any string from closing the tag.
            .replace("</", "<\\/");

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>EV Range Map</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>html, body, #map {{ height: 100%; margin: 0; }}</style>
</head>
<body>
<div id="map"></div>
<script>
const data = {data};
const map = L.map("map").setView([data.start.lat, data.start.lon], data.zoom);
L.tileLayer(data.tiles.url, {{ attribution: data.tiles.attribution, maxZoom: 19 }}).addTo(map);
L.geoJSON(data.polygon, {{ style: data.style }})
  .bindTooltip(data.polygon.properties.name)
  .addTo(map);
L.marker([data.start.lat, data.start.lon]).bindPopup(data.start.popup).addTo(map);
for (const p of data.boundary) {{
  L.circleMarker([p.lat, p.lon], {{ radius: 4, color: "blue", fill: true, fillColor: "blue" }})
    .bindPopup(p.popup)
    .addTo(map);
}}
</script>
</body>
</html>
"#
        ))
    }
}

/// Renders `result` and writes it to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`EstimateError::Render`] if rendering fails or
/// [`EstimateError::Io`] if the file cannot be written.
pub fn save_map(
    renderer: &dyn MapRenderer,
    result: &ReachabilityResult,
    path: &Path,
) -> Result<(), EstimateError> {
    let html = renderer.render(result)?;
    let io_err = |source| EstimateError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let bytes = html.len();
    std::fs::write(path, html).map_err(io_err)?;
    tracing::info!(path = %path.display(), bytes, "map saved");
    Ok(())
}
