//! HTML writing operations for the Leaflet map.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use serde_json::Value;

use crate::error::Result;

const LEAFLET_VERSION: &str = "1.9.4";

pub(crate) struct HtmlWriter {
    writer: BufWriter<File>
}

/// Implement std::io::Write so `write!` / `writeln!` work.
impl Write for HtmlWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.writer.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.writer.flush() }

    fn write_all(&mut self, buf: &[u8]) -> std::io::Result<()> { self.writer.write_all(buf) }
}

impl HtmlWriter {
    /// Create a new HTML writer to a file path
    pub(crate) fn new(path: &Path) -> Result<Self> {
        Ok(Self { writer: BufWriter::new(File::create(path)?) })
    }

    pub(crate) fn write_header(&mut self, title: &str) -> Result<()> {
        write_html_header(self, title)
    }

    pub(crate) fn write_map(&mut self, tile_url: &str, attribution: &str) -> Result<()> {
        write_html_map(self, tile_url, attribution)
    }

    pub(crate) fn write_layer(&mut self, layer: &Value) -> Result<()> {
        write_html_layer(self, layer)
    }

    pub(crate) fn write_footer(&mut self) -> Result<()> {
        write_html_footer(self)
    }
}

/// Serialize a value for inline use inside a `<script>` element.
pub(crate) fn script_json(value: &impl serde::Serialize) -> Result<String> {
    let json = serde_json::to_string(value).map_err(std::io::Error::other)?;
    Ok(json.replace("</", "<\\/"))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Document head with the Leaflet assets and legend styles, up to the map container.
pub(crate) fn write_html_header<W: Write>(writer: &mut W, title: &str) -> Result<()> {
    writeln!(writer, r##"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8"/>
<meta name="viewport" content="width=device-width, initial-scale=1.0"/>
<title>{title}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css"/>
<script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
<style>
    html, body, #map {{ height: 100%; width: 100%; margin: 0; padding: 0; }}
    .legend {{ background: rgba(255, 255, 255, 0.9); padding: 6px 10px; border-radius: 4px;
              box-shadow: 0 0 6px rgba(0, 0, 0, 0.3); font: 12px sans-serif; line-height: 18px; }}
    .legend .caption {{ font-weight: bold; margin-bottom: 4px; }}
    .legend i {{ display: inline-block; width: 14px; height: 14px; margin-right: 6px;
                vertical-align: middle; opacity: 0.8; }}
    .popup-table th {{ text-align: left; padding-right: 8px; }}
</style>
</head>
<body>
<div id="map"></div>"##,
        title = escape_html(title),
    )?;
    Ok(())
}

/// Map setup: base tiles plus the helpers each layer is added through.
pub(crate) fn write_html_map<W: Write>(writer: &mut W, tile_url: &str, attribution: &str) -> Result<()> {
    writeln!(writer, r##"<script>
const map = L.map("map");
L.tileLayer({tile_url}, {{ attribution: {attribution}, maxZoom: 19 }}).addTo(map);
const overlays = {{}};
const legends = {{}};
const bounds = L.latLngBounds([]);

function escapeHtml(value) {{
    return String(value).replace(/[&<>"']/g, c => ({{ "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#39;" }})[c]);
}}

function popupTable(properties) {{
    const rows = Object.entries(properties).map(([key, value]) =>
        "<tr><th>" + escapeHtml(key) + "</th><td>" + (value === null ? "" : escapeHtml(value)) + "</td></tr>");
    return '<table class="popup-table">' + rows.join("") + "</table>";
}}

function legendControl(layer) {{
    const control = L.control({{ position: "bottomright" }});
    control.onAdd = () => {{
        const div = L.DomUtil.create("div", "legend");
        div.innerHTML = '<div class="caption">' + escapeHtml(layer.caption) + "</div>" +
            layer.legend.map(([name, color]) =>
                '<i style="background:' + color + '"></i>' + escapeHtml(name)).join("<br/>");
        return div;
    }};
    return control;
}}

function addLayer(layer) {{
    const style = feature => ({{
        color: feature.color, fillColor: feature.color, weight: layer.weight, opacity: 0.9, fillOpacity: 0.5,
    }});
    const geojson = L.geoJSON(layer.data, {{
        style: style,
        pointToLayer: (feature, latlng) => layer.circles
            ? L.circleMarker(latlng, {{ ...style(feature), radius: 5 }})
            : L.marker(latlng),
        onEachFeature: (feature, leaflet) => leaflet.bindPopup(popupTable(feature.properties)),
    }}).addTo(map);
    if (geojson.getBounds().isValid()) bounds.extend(geojson.getBounds());
    overlays[layer.caption] = geojson;
    legends[layer.caption] = legendControl(layer).addTo(map);
}}
"##,
        tile_url = script_json(&tile_url)?,
        attribution = script_json(&attribution)?,
    )?;
    Ok(())
}

pub(crate) fn write_html_layer<W: Write>(writer: &mut W, layer: &Value) -> Result<()> {
    writeln!(writer, "addLayer({});", script_json(layer)?)?;
    Ok(())
}

/// Layer control, legend toggling and initial view, then close the document.
pub(crate) fn write_html_footer<W: Write>(writer: &mut W) -> Result<()> {
    writeln!(writer, r##"
L.control.layers(null, overlays, {{ collapsed: false }}).addTo(map);
map.on("overlayadd", e => legends[e.name] && legends[e.name].addTo(map));
map.on("overlayremove", e => legends[e.name] && legends[e.name].remove());
if (bounds.isValid()) {{ map.fitBounds(bounds); }} else {{ map.setView([53.7, -0.4], 10); }}
</script>
</body>
</html>"##)?;
    Ok(())
}
