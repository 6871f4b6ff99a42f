//! Interactive web map export (Leaflet).

mod geojson;
mod html;
mod proj;

use std::{collections::BTreeMap, io::Write, path::Path};

use log::{debug, info};
use serde_json::{json, Value};

pub use proj::Reprojector;

use crate::{
    common,
    config::InteractiveMapConfig,
    dataset::{Dataset, SurveyData},
    error::{Result, SurveyError},
    metrics::unique_values,
    render::{Rgb, Scheme},
};

/// Color of features whose category is null.
const UNCATEGORIZED: Rgb = Rgb::new(153, 153, 153);

/// A dataset shown on the web map, colored by one categorical attribute.
#[derive(Debug, Clone)]
pub struct WebLayer<'a> {
    pub dataset: &'a Dataset,
    pub attribute: String,
    pub scheme: Scheme,
    pub caption: String,
    /// Draw points as filled circles instead of pin markers.
    pub circle_markers: bool,
    /// Stroke weight in pixels.
    pub weight: f64,
}

impl<'a> WebLayer<'a> {
    pub fn new(dataset: &'a Dataset, attribute: &str, scheme: Scheme, caption: &str) -> Self {
        Self {
            dataset,
            attribute: attribute.to_string(),
            scheme,
            caption: caption.to_string(),
            circle_markers: false,
            weight: 2.0,
        }
    }

    pub fn with_circle_markers(mut self) -> Self {
        self.circle_markers = true;
        self
    }

    /// Category colors: categories sorted, colors sampled from the scheme.
    pub fn colors(&self) -> Result<BTreeMap<String, Rgb>> {
        let categories = unique_values(self.dataset, &self.attribute)?;
        Ok(self.scheme.categorize(&categories))
    }

    /// The layer as the JSON object the page script consumes.
    pub(crate) fn to_json(&self, reprojector: &Reprojector) -> Result<Value> {
        let colors = self.colors()?;
        let data = geojson::feature_collection(self.dataset, reprojector, &self.attribute, &colors, UNCATEGORIZED)?;
        let legend = colors.iter()
            .map(|(category, color)| json!([category, color.hex()]))
            .collect::<Vec<_>>();

        debug!("[explore] layer {:?}: {} features, {} categories", self.caption, self.dataset.len(), colors.len());
        Ok(json!({
            "caption": self.caption,
            "attribute": self.attribute,
            "circles": self.circle_markers,
            "weight": self.weight,
            "legend": legend,
            "data": data,
        }))
    }
}

/// The survey's web layers, bottom to top.
pub fn survey_web_layers(data: &SurveyData) -> Vec<WebLayer<'_>> {
    vec![
        WebLayer::new(&data.areas, "UNIT", Scheme::Accent, "UNIT"),
        WebLayer::new(&data.defences, "Type", Scheme::Dark2, "Flood Defence Embankments"),
        WebLayer::new(&data.low_sections, "Type", Scheme::Set1, "Low sections"),
        WebLayer::new(&data.steep_slopes, "Face", Scheme::Tab20b, "Steep slopes"),
        WebLayer::new(&data.palaeochannels, "channel", Scheme::Tab10, "Palaeochannels").with_circle_markers(),
        WebLayer::new(&data.geophysical_survey, "Material", Scheme::Dark2, "Material"),
    ]
}

/// Write a self-contained Leaflet page showing `layers` (last on top) to `output`.
pub fn write_web_map(
    layers: &[WebLayer],
    source_crs: &str,
    config: &InteractiveMapConfig,
    output: &Path,
) -> Result<()> {
    let reprojector = Reprojector::new(source_crs)?;
    common::ensure_parent_exists(output)
        .map_err(|e| SurveyError::Io(std::io::Error::other(format!("{e:#}"))))?;

    let mut writer = html::HtmlWriter::new(output)?;
    writer.write_header("Humber flood embankment data")?;
    writer.write_map(&config.tile_url, &config.tile_attribution)?;
    for layer in layers {
        writer.write_layer(&layer.to_json(&reprojector)?)?;
    }
    writer.write_footer()?;
    writer.flush()?;

    info!("[explore] wrote {} layers to {}", layers.len(), output.display());
    Ok(())
}

/// Build the survey's interactive map.
pub fn render_interactive_map(
    data: &SurveyData,
    source_crs: &str,
    config: &InteractiveMapConfig,
    output: &Path,
) -> Result<()> {
    write_web_map(&survey_web_layers(data), source_crs, config, output)
}
