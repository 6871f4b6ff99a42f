use crate::{
    dataset::GeometryKind,
    render::{color::Rgb, layer::{LayerRole, RenderLayer}},
};

pub const LEGEND_TITLE: &str = "Legend";

#[derive(Clone, Debug, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Rgb,
    pub opacity: f64,
    pub kind: GeometryKind,
}

/// Legend of a static map: one entry per overlay, by legend order then draw order.
#[derive(Clone, Debug, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build entries from every overlay layer. The basemap is never listed.
    pub fn from_layers(layers: &[RenderLayer]) -> Self {
        let mut overlays = layers.iter()
            .filter(|layer| layer.role() == LayerRole::Overlay)
            .collect::<Vec<_>>();
        overlays.sort_by_key(|layer| layer.style().legend_order.unwrap_or(u32::MAX));

        let entries = overlays.into_iter()
            .filter_map(|layer| {
                let style = layer.style();
                Some(LegendEntry {
                    label: layer.label().to_string(),
                    color: style.swatch_color()?,
                    opacity: style.opacity,
                    kind: style.geometry_kind,
                })
            })
            .collect();

        Self { title: LEGEND_TITLE.to_string(), entries }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.entries.is_empty() }
}
