use polars::prelude::DataType;

use crate::{
    dataset::Dataset,
    error::{Result, SurveyError},
    render::{color::{Rgb, assign_palette, assign_palette_numeric}, style::LayerStyle},
};

/// Whether a layer is the reference basemap or a data overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerRole {
    /// Drawn for context; sets the map extent and never appears in the legend.
    Basemap,
    Overlay,
}

/// A dataset paired with the style it is drawn with. The dataset is borrowed, never copied.
#[derive(Debug, Clone)]
pub struct RenderLayer<'a> {
    pub(crate) dataset: &'a Dataset,
    pub(crate) role: LayerRole,
    pub(crate) style: LayerStyle,
    /// Per-feature face colors overriding `style.fill_color`, one per row.
    pub(crate) feature_fills: Option<Vec<Option<Rgb>>>,
}

impl<'a> RenderLayer<'a> {
    pub fn basemap(dataset: &'a Dataset, style: LayerStyle) -> Self {
        Self { dataset, role: LayerRole::Basemap, style, feature_fills: None }
    }

    pub fn overlay(dataset: &'a Dataset, style: LayerStyle) -> Self {
        Self { dataset, role: LayerRole::Overlay, style, feature_fills: None }
    }

    /// Color each feature by the palette color of its `id_attr` value.
    /// Identifiers are sorted in the column's own order (numbers by value, text
    /// lexically) before assignment and wrap around the palette.
    pub fn with_palette_fills(mut self, id_attr: &str, palette: &[Rgb]) -> Result<Self> {
        let column = self.dataset.column(id_attr)?;

        let fills = if column.dtype() == &DataType::String {
            let ids = column.str()?;
            let colors = assign_palette(&ids.into_iter().flatten().collect::<Vec<_>>(), palette)?;
            ids.into_iter()
                .map(|id| id.and_then(|id| colors.get(id).copied()))
                .collect()
        } else {
            let column = column.cast(&DataType::Float64)?;
            let ids = column.f64()?;
            let colors = assign_palette_numeric(&ids.into_iter().flatten().collect::<Vec<_>>(), palette)?;
            ids.into_iter()
                .map(|id| id.and_then(|id| {
                    colors.binary_search_by(|(key, _)| key.total_cmp(&id)).ok().map(|i| colors[i].1)
                }))
                .collect()
        };

        self.feature_fills = Some(fills);
        Ok(self)
    }

    #[inline] pub fn dataset(&self) -> &Dataset { self.dataset }

    #[inline] pub fn role(&self) -> LayerRole { self.role }

    #[inline] pub fn style(&self) -> &LayerStyle { &self.style }

    /// Face color of feature `i`.
    pub fn fill_for(&self, i: usize) -> Option<Rgb> {
        match &self.feature_fills {
            Some(fills) => fills.get(i).copied().flatten().or(self.style.fill_color),
            None => self.style.fill_color,
        }
    }

    /// Label shown in the legend: the style's label, else the dataset name.
    pub fn label(&self) -> &str {
        self.style.legend_label.as_deref().unwrap_or(self.dataset.name())
    }

    pub(crate) fn check(&self) -> Result<()> {
        if let Some(fills) = &self.feature_fills {
            if fills.len() != self.dataset.len() {
                return Err(SurveyError::Render(format!(
                    "layer {}: {} fill colors for {} features",
                    self.dataset.name(),
                    fills.len(),
                    self.dataset.len(),
                )))
            }
        }
        Ok(())
    }
}
