use serde::Serialize;

use crate::{dataset::GeometryKind, render::color::Rgb};

/// How one layer is painted on the static map.
///
/// Widths and sizes are in typographic points and scaled to pixels by the
/// viewport, so a style looks the same at any output resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub geometry_kind: GeometryKind,
    /// Polygon face or point marker color. `None` leaves faces unpainted.
    pub fill_color: Option<Rgb>,
    /// Polygon outline or line color. `None` draws no outline.
    pub edge_color: Option<Rgb>,
    /// Alpha applied to both fill and edge, in [0, 1].
    pub opacity: f64,
    pub line_width: f64,
    /// Marker diameter for point layers.
    pub marker_size: f64,
    pub legend_label: Option<String>,
    /// Position in the legend. Unset entries follow the ordered ones, in draw order.
    pub legend_order: Option<u32>,
}

impl LayerStyle {
    pub fn polygon(fill_color: Option<Rgb>, edge_color: Option<Rgb>) -> Self {
        Self {
            geometry_kind: GeometryKind::Polygon,
            fill_color,
            edge_color,
            opacity: 1.0,
            line_width: 0.1,
            marker_size: 0.0,
            legend_label: None,
            legend_order: None,
        }
    }

    pub fn line(color: Rgb, line_width: f64) -> Self {
        Self {
            geometry_kind: GeometryKind::Line,
            fill_color: None,
            edge_color: Some(color),
            opacity: 1.0,
            line_width,
            marker_size: 0.0,
            legend_label: None,
            legend_order: None,
        }
    }

    pub fn point(color: Rgb, marker_size: f64) -> Self {
        Self {
            geometry_kind: GeometryKind::Point,
            fill_color: Some(color),
            edge_color: None,
            opacity: 1.0,
            line_width: 0.0,
            marker_size,
            legend_label: None,
            legend_order: None,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_line_width(mut self, line_width: f64) -> Self {
        self.line_width = line_width;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.legend_label = Some(label.into());
        self
    }

    pub fn with_legend_order(mut self, order: u32) -> Self {
        self.legend_order = Some(order);
        self
    }

    /// Color shown for this style in a legend swatch.
    pub fn swatch_color(&self) -> Option<Rgb> {
        match self.geometry_kind {
            GeometryKind::Line => self.edge_color.or(self.fill_color),
            GeometryKind::Polygon | GeometryKind::Point => self.fill_color.or(self.edge_color),
        }
    }
}
