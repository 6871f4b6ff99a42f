use std::fmt;

use serde::{Deserialize, Serialize};
use shapefile::ShapeType;

/// Rendering primitive family of a dataset's features.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeometryKind {
    Polygon,
    Line,
    Point,
}

impl GeometryKind {
    /// Map a shapefile header type onto a geometry kind (None for null shapes and multipatches).
    pub(crate) fn from_shape_type(ty: ShapeType) -> Option<Self> {
        match ty {
            ShapeType::Polygon | ShapeType::PolygonM | ShapeType::PolygonZ => Some(Self::Polygon),
            ShapeType::Polyline | ShapeType::PolylineM | ShapeType::PolylineZ => Some(Self::Line),
            ShapeType::Point | ShapeType::PointM | ShapeType::PointZ
            | ShapeType::Multipoint | ShapeType::MultipointM | ShapeType::MultipointZ => Some(Self::Point),
            ShapeType::NullShape | ShapeType::Multipatch => None,
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Polygon => write!(f, "polygon"),
            Self::Line => write!(f, "line"),
            Self::Point => write!(f, "point"),
        }
    }
}
