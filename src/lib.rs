#![doc = "Embankmap public API"]
mod common;
mod config;
mod dataset;
mod error;
mod explore;
mod metrics;
mod render;

#[doc(inline)]
pub use config::{DatasetPaths, InteractiveMapConfig, StaticMapConfig, SurveyConfig, OSGB_PROJ4};

#[doc(inline)]
pub use dataset::{Dataset, GeometryKind, SurveyData};

#[doc(inline)]
pub use error::{Result, SurveyError};

#[doc(inline)]
pub use metrics::{
    count, count_present, grouped_count, grouped_total, percentage, ratio, total, total_length_km, unique_values,
    SurveyReport, METRES_PER_KM,
};

#[doc(inline)]
pub use render::{
    assign_palette, assign_palette_numeric, render_static_map, survey_layers, BarLabel, BarSegment, Extent,
    LayerRole, LayerStyle, Legend, LegendEntry, MapComposition, Paint, RenderInstruction, RenderLayer, Rgb,
    ScaleBar, Scheme, Stroke, TextAnchor, Viewport, AREA_PALETTE, LEGEND_TITLE, SCALE_BAR_LENGTH,
};

#[doc(inline)]
pub use explore::{render_interactive_map, survey_web_layers, write_web_map, Reprojector, WebLayer};
