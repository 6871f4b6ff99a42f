use std::{fs::File, io::BufReader, path::{Path, PathBuf}};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SurveyError};

/// British National Grid (EPSG:27700), the native CRS of the survey shapefiles.
pub const OSGB_PROJ4: &str = "+proj=tmerc +lat_0=49 +lon_0=-2 +k=0.9996012717 +x_0=400000 +y_0=-100000 \
    +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489 +units=m +no_defs +type=crs";

/// Dataset locations, relative to the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetPaths {
    pub areas: PathBuf,
    pub defences: PathBuf,
    pub low_sections: PathBuf,
    pub steep_slopes: PathBuf,
    pub palaeochannels: PathBuf,
    pub geophysical_survey: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            areas: "HSCR_Flood_Areas/HSCR_FloodAreas_2080406.shp".into(),
            defences: "Flood_embankment_network/Embankment_alignment_Humber_primary.shp".into(),
            low_sections: "LIDAR_derived_data/Embankment_low_sections_defects.shp".into(),
            steep_slopes: "LIDAR_derived_data/Embankment_steep_slope_anomalies.shp".into(),
            palaeochannels: "LIDAR_derived_data/Palaeochannel_anomalies_intersect_embank.shp".into(),
            geophysical_survey: "Geophysical_survey_data_material_composition/Geophysical_survey_embankment_materials.shp".into(),
        }
    }
}

/// Settings for the static map image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticMapConfig {
    /// Output PNG path.
    pub output: PathBuf,
    /// Image width in pixels; height follows the map extent's aspect ratio.
    pub width_px: u32,
    /// Buffer added around the basemap bounds, in native map units (metres).
    pub extent_buffer: f64,
    /// Scale bar anchor as fractions of the extent (across, up).
    pub scale_bar_location: (f64, f64),
}

impl Default for StaticMapConfig {
    fn default() -> Self {
        Self {
            output: "Humber_flood_embankment_data.png".into(),
            width_px: 4800,
            extent_buffer: 10_000.0,
            scale_bar_location: (0.92, 0.95),
        }
    }
}

/// Settings for the interactive web map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractiveMapConfig {
    /// Output HTML path.
    pub output: PathBuf,
    /// Tile URL template for the base layer.
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for InteractiveMapConfig {
    fn default() -> Self {
        Self {
            output: "Interactive_Humber_flood_embankment_data.html".into(),
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            tile_attribution: "&copy; OpenStreetMap contributors".into(),
        }
    }
}

/// Top-level configuration; `Default` reproduces the fixed inputs and outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SurveyConfig {
    pub datasets: DatasetPaths,
    /// PROJ.4 definition of the datasets' coordinate reference system.
    pub source_crs: String,
    #[serde(rename = "static")]
    pub static_map: StaticMapConfig,
    pub interactive: InteractiveMapConfig,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            datasets: DatasetPaths::default(),
            source_crs: OSGB_PROJ4.to_string(),
            static_map: StaticMapConfig::default(),
            interactive: InteractiveMapConfig::default(),
        }
    }
}

impl SurveyConfig {
    /// Read a JSON config file; missing keys fall back to defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| SurveyError::Config(format!("cannot open {}: {e}", path.display())))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| SurveyError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (across, up) = self.static_map.scale_bar_location;
        if !(0.0..=1.0).contains(&across) || !(0.0..=1.0).contains(&up) {
            return Err(SurveyError::Config(format!("scale bar location ({across}, {up}) outside the unit square")))
        }
        if self.static_map.width_px == 0 {
            return Err(SurveyError::Config("image width must be positive".into()))
        }
        if !self.static_map.extent_buffer.is_finite() || self.static_map.extent_buffer < 0.0 {
            return Err(SurveyError::Config("extent buffer must be a non-negative number".into()))
        }
        Ok(())
    }
}
