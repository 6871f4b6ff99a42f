use std::path::Path;

use log::info;

use crate::{config::DatasetPaths, dataset::Dataset, error::Result};

/// The six survey datasets a run works from, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct SurveyData {
    /// Flood area polygons (basemap).
    pub areas: Dataset,
    /// Embankment centre-line network.
    pub defences: Dataset,
    /// LIDAR-derived low crest sections.
    pub low_sections: Dataset,
    /// LIDAR-derived steep slope polygons.
    pub steep_slopes: Dataset,
    /// LIDAR-derived palaeochannel intersections (points).
    pub palaeochannels: Dataset,
    /// DEMP geophysical survey lines.
    pub geophysical_survey: Dataset,
}

impl SurveyData {
    /// Load every dataset from `data_dir`; the first failure aborts the load.
    pub fn load(data_dir: &Path, paths: &DatasetPaths) -> Result<Self> {
        info!("[dataset::survey] loading survey datasets from {}", data_dir.display());
        Ok(Self {
            areas: Dataset::read_shapefile("areas", &data_dir.join(&paths.areas))?,
            defences: Dataset::read_shapefile("defences", &data_dir.join(&paths.defences))?,
            low_sections: Dataset::read_shapefile("low_sections", &data_dir.join(&paths.low_sections))?,
            steep_slopes: Dataset::read_shapefile("steep_slopes", &data_dir.join(&paths.steep_slopes))?,
            palaeochannels: Dataset::read_shapefile("palaeochannels", &data_dir.join(&paths.palaeochannels))?,
            geophysical_survey: Dataset::read_shapefile("geophysical_survey", &data_dir.join(&paths.geophysical_survey))?,
        })
    }
}
