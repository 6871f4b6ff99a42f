use std::path::{Path, PathBuf};

use geo::{BoundingRect, Coord, Geometry, Rect};
use polars::{frame::DataFrame, prelude::Column};

use crate::{dataset::GeometryKind, error::{Result, SurveyError}};

/// A loaded vector dataset: one attribute row per feature plus its geometry.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    path: Option<PathBuf>,
    kind: GeometryKind,
    data: DataFrame,
    geoms: Vec<Geometry<f64>>,
}

impl Dataset {
    /// Pair an attribute table with its geometries, row for row.
    pub fn new(name: impl Into<String>, kind: GeometryKind, data: DataFrame, geoms: Vec<Geometry<f64>>) -> Result<Self> {
        let name = name.into();
        if data.width() > 0 && data.height() != geoms.len() {
            return Err(SurveyError::malformed(&name, format!(
                "{} attribute rows for {} geometries",
                data.height(),
                geoms.len(),
            )))
        }
        Ok(Self { name, path: None, kind, data, geoms })
    }

    pub(crate) fn with_path(mut self, path: &Path) -> Self {
        self.path = Some(path.to_path_buf());
        self
    }

    #[inline] pub fn name(&self) -> &str { &self.name }

    #[inline] pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    #[inline] pub fn kind(&self) -> GeometryKind { self.kind }

    /// Attribute table.
    #[inline] pub fn data(&self) -> &DataFrame { &self.data }

    #[inline] pub fn geoms(&self) -> &[Geometry<f64>] { &self.geoms }

    /// Number of features.
    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    /// Column names in table order.
    pub fn columns(&self) -> Vec<String> {
        self.data.get_column_names().into_iter().map(|name| name.to_string()).collect()
    }

    /// Look up a column, reporting the dataset name when it is absent.
    pub fn column(&self, attribute: &str) -> Result<&Column> {
        self.data.column(attribute)
            .map_err(|_| SurveyError::missing(&self.name, attribute))
    }

    /// Bounding rectangle of every geometry in the dataset.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.geoms.iter()
            .filter_map(|geom| geom.bounding_rect())
            .reduce(|a, b| Rect::new(
                Coord {
                    x: a.min().x.min(b.min().x),
                    y: a.min().y.min(b.min().y),
                },
                Coord {
                    x: a.max().x.max(b.max().x),
                    y: a.max().y.max(b.max().y),
                }
            ))
    }
}
