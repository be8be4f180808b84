use crate::error::{ProcessingError, Result};
use crate::models::LoggerMetadata;
use crate::readers::MetadataMap;
use crate::utils::constants::DEFAULT_PLOTS_LINK_DIR;
use crate::utils::coordinates::{bounding_box, centroid};
use crate::utils::filename::plot_file_name;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use tracing::info;

const DEFAULT_ZOOM: u32 = 8;

/// Surface keywords and their marker colors, checked in order
const SURFACE_COLORS: &[(&[&str], &str)] = &[
    (&["block", "rock"], "gray"),
    (&["silt", "sediment"], "darkred"),
    (&["gravel"], "orange"),
    (&["sand"], "beige"),
    (&["pasture"], "green"),
    (&["void"], "black"),
    (&["morraine", "moraine"], "purple"),
];
const DEFAULT_MARKER_COLOR: &str = "blue";

const LEGEND: &[(&str, &str)] = &[
    ("gray", "Blocks/Rock"),
    ("darkred", "Silt/Sediment"),
    ("orange", "Gravel"),
    ("beige", "Sand"),
    ("green", "Pasture"),
    ("black", "Void"),
    ("purple", "Moraine"),
    ("blue", "Other"),
];

/// Marker color for a free-text surface description
pub fn marker_color(surface: &str) -> &'static str {
    let surface = surface.to_lowercase();
    SURFACE_COLORS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| surface.contains(k)))
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_MARKER_COLOR)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub color: &'static str,
    pub tooltip: String,
    pub popup: String,
}

/// Builds the interactive logger map as one HTML page
pub struct MapWriter {
    zoom_start: u32,
}

impl MapWriter {
    pub fn new() -> Self {
        Self {
            zoom_start: DEFAULT_ZOOM,
        }
    }

    /// One marker per logger with a location, linking to its plot if known
    pub fn build_markers(
        &self,
        metadata: &MetadataMap,
        plot_files: &BTreeMap<String, PathBuf>,
        output_path: &Path,
    ) -> Vec<MapMarker> {
        metadata
            .values()
            .filter_map(|row| {
                let location = row.location?;
                let surface = row.surface.as_deref().unwrap_or_default();
                let plot_link = plot_files
                    .get(&row.logger_id)
                    .map(|plot| relative_link(plot, output_path));

                Some(MapMarker {
                    id: row.logger_id.clone(),
                    lat: location.latitude,
                    lon: location.longitude,
                    color: marker_color(surface),
                    tooltip: tooltip_text(row),
                    popup: popup_html(row, plot_link.as_deref()),
                })
            })
            .collect()
    }

    pub fn render_html(&self, markers: &[MapMarker]) -> Result<String> {
        let points: Vec<(f64, f64)> = markers.iter().map(|m| (m.lat, m.lon)).collect();
        let (center_lat, center_lon) = centroid(&points)
            .ok_or_else(|| ProcessingError::MissingData("no logger locations to map".to_string()))?;

        let bounds = if markers.len() > 1 {
            bounding_box(&points)
                .map(|(sw, ne)| format!("[[{}, {}], [{}, {}]]", sw.0, sw.1, ne.0, ne.1))
                .unwrap_or_else(|| "null".to_string())
        } else {
            "null".to_string()
        };

        // Keep "</script>" inside popup text from closing the script block
        let markers_json = serde_json::to_string(markers)?.replace("</", "<\\/");

        let mut legend = String::new();
        for (color, label) in LEGEND {
            let _ = writeln!(
                legend,
                r#"    <p><span class="swatch" style="background:{}"></span> {}</p>"#,
                color, label
            );
        }

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Ground temperature loggers</title>
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  html, body, #map {{ height: 100%; margin: 0; }}
  .legend {{ position: fixed; top: 10px; right: 10px; width: 200px; z-index: 9999;
             background: white; border: 2px solid grey; font-size: 14px; padding: 10px; }}
  .legend p {{ margin: 4px 0; }}
  .swatch {{ display: inline-block; width: 12px; height: 12px; border-radius: 6px;
             border: 1px solid #333; vertical-align: middle; }}
</style>
</head>
<body>
<div id="map"></div>
<div class="legend">
    <h4>Surface Types</h4>
{legend}</div>
<script>
  var map = L.map('map').setView([{center_lat}, {center_lon}], {zoom});

  var baseLayers = {{
    'OpenStreetMap': L.tileLayer('https://{{s}}.tile.openstreetmap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: '&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors'
    }}),
    'OpenTopoMap': L.tileLayer('https://{{s}}.tile.opentopomap.org/{{z}}/{{x}}/{{y}}.png', {{
      attribution: 'Map data: &copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, <a href="http://viewfinderpanoramas.org">SRTM</a> | Map style: &copy; <a href="https://opentopomap.org">OpenTopoMap</a> (<a href="https://creativecommons.org/licenses/by-sa/3.0/">CC-BY-SA</a>)'
    }}),
    'Satellite': L.tileLayer('https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{{z}}/{{y}}/{{x}}', {{
      attribution: 'Tiles &copy; Esri &mdash; Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community'
    }})
  }};
  baseLayers['OpenStreetMap'].addTo(map);
  L.control.layers(baseLayers).addTo(map);
  L.control.scale().addTo(map);

  var markers = {markers_json};
  markers.forEach(function (m) {{
    L.circleMarker([m.lat, m.lon], {{
      radius: 8, color: '#333', weight: 1, fillColor: m.color, fillOpacity: 0.9
    }})
      .bindPopup(m.popup, {{ maxWidth: 350 }})
      .bindTooltip(m.tooltip)
      .addTo(map);
  }});

  var bounds = {bounds};
  if (bounds) {{
    map.fitBounds(bounds, {{ padding: [20, 20] }});
  }}
</script>
</body>
</html>
"#,
            legend = legend,
            center_lat = center_lat,
            center_lon = center_lon,
            zoom = self.zoom_start,
            markers_json = markers_json,
            bounds = bounds,
        ))
    }

    /// Render and save the map; returns the number of markers placed
    pub fn write_map(
        &self,
        metadata: &MetadataMap,
        plot_files: &BTreeMap<String, PathBuf>,
        output_path: &Path,
    ) -> Result<usize> {
        let markers = self.build_markers(metadata, plot_files, output_path);
        let html = self.render_html(&markers)?;

        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(output_path)?);
        writer.write_all(html.as_bytes())?;
        writer.flush()?;

        info!("Interactive map saved to: {}", output_path.display());
        Ok(markers.len())
    }
}

impl Default for MapWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn tooltip_text(row: &LoggerMetadata) -> String {
    let mut text = format!("Logger {}", row.logger_id);
    if let Some(logger_type) = &row.logger_type {
        text.push_str(&format!(" ({})", logger_type));
    }
    if let Some(surface) = &row.surface {
        text.push_str(&format!(" - {}", surface));
    }
    text
}

fn popup_html(row: &LoggerMetadata, plot_link: Option<&str>) -> String {
    let mut html = String::from(r#"<div style="width: 300px;">"#);
    let _ = write!(html, "<h4>Logger {}</h4>", escape_html(&row.logger_id));
    html.push_str(r#"<table style="width: 100%; font-size: 12px;">"#);

    let elevation = row
        .elevation_meters()
        .map(|m| format!("{:.0} m", m))
        .or_else(|| row.elevation.clone());

    let fields: [(&str, Option<String>); 7] = [
        ("Type", row.logger_type.clone()),
        ("Waypoint", row.waypoint().map(str::to_string)),
        ("Elevation", elevation),
        ("Surface", row.surface.clone()),
        ("Access Code", row.access_code.clone()),
        ("Installed", row.installed.clone()),
        ("Notes", row.notes.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = write!(
                html,
                "<tr><td><b>{}:</b></td><td>{}</td></tr>",
                label,
                escape_html(&value)
            );
        }
    }
    html.push_str("</table>");

    match plot_link {
        Some(link) => {
            let _ = write!(
                html,
                r#"<div style="margin-top: 10px;"><a href="{}" target="_blank" style="background-color: #4CAF50; color: white; padding: 8px 16px; text-decoration: none; border-radius: 4px; display: inline-block; font-size: 12px;">View Temperature Plot</a></div>"#,
                escape_html(link)
            );
        }
        None => {
            let _ = write!(
                html,
                r#"<div style="margin-top: 10px; font-size: 10px; color: #666;">Looking for: {}</div>"#,
                escape_html(&plot_file_name(&row.logger_id))
            );
        }
    }

    html.push_str("</div>");
    html
}

/// Link from the map page to a plot, relative to the page's directory
pub fn relative_link(plot_path: &Path, output_path: &Path) -> String {
    let base = output_path.parent().filter(|p| !p.as_os_str().is_empty());

    let relative = match base {
        Some(base) => plot_path.strip_prefix(base).ok().map(Path::to_path_buf),
        None if plot_path.is_relative() => Some(plot_path.to_path_buf()),
        None => None,
    };

    match relative {
        Some(path) => path
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        None => {
            let name = plot_path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            format!("{}/{}", DEFAULT_PLOTS_LINK_DIR, name)
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
