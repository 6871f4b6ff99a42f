use geo::{Coord, Geometry, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::{Result, SurveyError};

const WGS84_PROJ4: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Reprojects from a projected source CRS (metres) to WGS84 longitude/latitude in degrees.
pub struct Reprojector {
    from: Proj4,
    to: Proj4,
}

impl Reprojector {
    pub fn new(source_proj4: &str) -> Result<Self> {
        let from = Proj4::from_proj_string(source_proj4)
            .map_err(|e| SurveyError::Projection(format!("failed to build source PROJ.4 {source_proj4:?}: {e}")))?;
        let to = Proj4::from_proj_string(WGS84_PROJ4)
            .map_err(|e| SurveyError::Projection(format!("failed to build target PROJ.4: {e}")))?;
        Ok(Self { from, to })
    }

    /// Project one coordinate: metres in, degrees out.
    pub fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        transform(&self.from, &self.to, &mut point)
            .map_err(|e| SurveyError::Projection(format!("({}, {}): {e}", coord.x, coord.y)))?;
        Ok(Coord { x: point.0.to_degrees(), y: point.1.to_degrees() })
    }

    pub fn geometry(&self, geom: &Geometry<f64>) -> Result<Geometry<f64>> {
        geom.try_map_coords(|coord| self.coord(coord))
    }
}
