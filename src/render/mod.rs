//! Static map composition and PNG export.

mod color;
mod compose;
mod extent;
mod layer;
mod legend;
mod scalebar;
mod style;

use std::path::Path;

use log::info;

pub use color::*;
pub use compose::{MapComposition, Paint, RenderInstruction, Stroke, TextAnchor};
pub use extent::{Extent, Viewport};
pub use layer::{LayerRole, RenderLayer};
pub use legend::{Legend, LegendEntry, LEGEND_TITLE};
pub use scalebar::{BarLabel, BarSegment, ScaleBar, SCALE_BAR_LENGTH};
pub use style::LayerStyle;

use crate::{config::StaticMapConfig, dataset::SurveyData, error::Result};

/// Identifier attribute the basemap palette is keyed on.
pub const AREA_ID: &str = "FloodArea_";

/// The survey's layer stack, bottom to top.
pub fn survey_layers(data: &SurveyData) -> Result<Vec<RenderLayer<'_>>> {
    Ok(vec![
        RenderLayer::basemap(&data.areas, LayerStyle::polygon(Some(WHITE), Some(LIGHT_GRAY)).with_line_width(0.5)),
        RenderLayer::basemap(&data.areas, LayerStyle::polygon(None, Some(WHITE)).with_opacity(0.25))
            .with_palette_fills(AREA_ID, &AREA_PALETTE)?,
        RenderLayer::overlay(&data.defences, LayerStyle::line(BLUE, 2.0)
            .with_opacity(0.25)
            .with_label("Flood embankments")
            .with_legend_order(0)),
        RenderLayer::overlay(&data.geophysical_survey, LayerStyle::line(LIME, 1.0)
            .with_label("Geophysical survey extents")
            .with_legend_order(4)),
        RenderLayer::overlay(&data.low_sections, LayerStyle::line(DARK_ORANGE, 1.0)
            .with_label("Low sections of embankments")
            .with_legend_order(1)),
        RenderLayer::overlay(&data.steep_slopes, LayerStyle::polygon(Some(BLACK), Some(BLACK))
            .with_label("Steep embankment slopes")
            .with_legend_order(2)),
        RenderLayer::overlay(&data.palaeochannels, LayerStyle::point(GRAY_70, 3.0)
            .with_label("Palaeochannel intersections")
            .with_legend_order(3)),
    ])
}

/// Compose the survey map and write it to `output`.
pub fn render_static_map(data: &SurveyData, config: &StaticMapConfig, output: &Path) -> Result<()> {
    let layers = survey_layers(data)?;
    let map = MapComposition::build(&layers, config)?;
    info!(
        "[render] composed {} layers into {} instructions",
        layers.len(),
        map.instructions().len(),
    );
    map.render_png(output)
}
