use std::{collections::{BTreeMap, BTreeSet}, fmt};

use log::info;
use serde::Serialize;

use crate::{dataset::{Dataset, SurveyData}, error::Result, metrics::*};

/// Length attribute of the embankment network, low sections and steep slopes (metres).
pub const SHAPE_LENGTH: &str = "Shape_Leng";
/// Ground-surveyed distance of the geophysical survey lines (metres).
pub const SURVEYED_DISTANCE: &str = "Tot_dist_m";

#[derive(Debug, Clone, Serialize)]
pub struct NetworkSummary {
    pub total_km: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LowSectionSummary {
    pub total_km: f64,
    /// Share of the embankment network length.
    pub percent_of_network: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SteepSlopeSummary {
    pub count: usize,
    pub faces: BTreeSet<String>,
    pub count_by_face: BTreeMap<String, usize>,
    pub percent_by_face: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PalaeochannelSummary {
    pub count: usize,
    pub channel_types: BTreeSet<String>,
    pub depressions: usize,
    pub percent_depressions: f64,
    pub percent_extrusions: f64,
}

impl PalaeochannelSummary {
    /// `count` is the number of classified intersections; the depression share is
    /// taken over every intersection with a `channel` type.
    fn compute(channels: &Dataset) -> Result<Self> {
        let typed = count_present(channels, "channel")?;
        let depressions = count(channels, Some(("channel", "Depression")))?;
        let percent_depressions = percentage(depressions as f64, typed as f64, "palaeochannels")?;
        Ok(Self {
            count: count_present(channels, "Class")?,
            channel_types: unique_values(channels, "channel")?,
            depressions,
            percent_depressions,
            percent_extrusions: 100.0 - percent_depressions,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeophysicalSummary {
    pub features: usize,
    pub columns: Vec<String>,
    pub surveyed_km: f64,
    pub percent_of_network: f64,
    pub percent_unsurveyed: f64,
    pub materials: BTreeSet<String>,
    pub km_by_material: BTreeMap<String, f64>,
    pub km_by_saturation: BTreeMap<String, f64>,
    pub km_by_hydraulic_unit: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HydraulicUnitSummary {
    pub surveyed: usize,
    pub units: BTreeSet<String>,
    pub total: usize,
    pub flood_areas: usize,
}

/// The descriptive statistics of one survey snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub network: NetworkSummary,
    pub low_sections: LowSectionSummary,
    pub steep_slopes: SteepSlopeSummary,
    pub palaeochannels: PalaeochannelSummary,
    pub geophysical_survey: GeophysicalSummary,
    pub hydraulic_units: HydraulicUnitSummary,
}

/// Convert every value of a grouped total from metres to kilometres.
fn to_km(groups: BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    groups.into_iter().map(|(key, metres)| (key, metres / METRES_PER_KM)).collect()
}

impl SurveyReport {
    pub fn compute(data: &SurveyData) -> Result<Self> {
        let network = NetworkSummary { total_km: total_length_km(&data.defences, SHAPE_LENGTH)? };

        let low_sections = LowSectionSummary {
            total_km: total_length_km(&data.low_sections, SHAPE_LENGTH)?,
            percent_of_network: ratio((&data.low_sections, SHAPE_LENGTH), (&data.defences, SHAPE_LENGTH))?,
        };

        // Shape_Leng of the steep slope polygons is a perimeter, so only counts are meaningful.
        let steep_slopes = {
            let instances = count(&data.steep_slopes, None)?;
            let count_by_face = grouped_count(&data.steep_slopes, "Face")?;
            let percent_by_face = count_by_face.iter()
                .map(|(face, &n)| Ok((face.clone(), percentage(n as f64, instances as f64, "steep_slopes")?)))
                .collect::<Result<BTreeMap<_, _>>>()?;
            SteepSlopeSummary {
                count: instances,
                faces: unique_values(&data.steep_slopes, "Face")?,
                count_by_face,
                percent_by_face,
            }
        };

        let palaeochannels = PalaeochannelSummary::compute(&data.palaeochannels)?;

        let survey = &data.geophysical_survey;
        let geophysical_survey = {
            let percent_of_network = ratio((survey, SURVEYED_DISTANCE), (&data.defences, SHAPE_LENGTH))?;
            GeophysicalSummary {
                features: count(survey, None)?,
                columns: survey.columns(),
                surveyed_km: total_length_km(survey, SURVEYED_DISTANCE)?,
                percent_of_network,
                percent_unsurveyed: 100.0 - percent_of_network,
                materials: unique_values(survey, "Material")?,
                km_by_material: to_km(grouped_total(survey, "Material", SURVEYED_DISTANCE)?),
                km_by_saturation: to_km(grouped_total(survey, "Saturation", SURVEYED_DISTANCE)?),
                km_by_hydraulic_unit: to_km(grouped_total(survey, "HS_Hyd_Uni", SURVEYED_DISTANCE)?),
            }
        };

        let hydraulic_units = {
            let units = unique_values(&data.areas, "UNIT")?;
            HydraulicUnitSummary {
                surveyed: unique_values(survey, "HS_Hyd_Uni")?.len(),
                total: units.len(),
                units,
                flood_areas: unique_values(&data.areas, "FloodArea_")?.len(),
            }
        };

        info!("[metrics::report] computed survey report");
        Ok(Self { network, low_sections, steep_slopes, palaeochannels, geophysical_survey, hydraulic_units })
    }
}

/// Quote and join a set of names: 'a', 'b'.
fn list<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values.into_iter().map(|v| format!("'{v}'")).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for SurveyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Embankment network")?;
        writeln!(f, "  total length: {:.3} km", self.network.total_km)?;

        writeln!(f, "Low sections")?;
        writeln!(f, "  total length: {:.3} km", self.low_sections.total_km)?;
        writeln!(f, "  share of network: {:.1} %", self.low_sections.percent_of_network)?;

        writeln!(f, "Steep slopes")?;
        writeln!(f, "  instances: {}", self.steep_slopes.count)?;
        writeln!(f, "  faces: [{}]", list(&self.steep_slopes.faces))?;
        for (face, n) in &self.steep_slopes.count_by_face {
            let pct = self.steep_slopes.percent_by_face.get(face).copied().unwrap_or_default();
            writeln!(f, "  {face}: {n} ({pct:.1} %)")?;
        }

        writeln!(f, "Palaeochannels")?;
        writeln!(f, "  instances: {}", self.palaeochannels.count)?;
        writeln!(f, "  types: {} [{}]", self.palaeochannels.channel_types.len(), list(&self.palaeochannels.channel_types))?;
        writeln!(f, "  depressions: {} ({:.1} %), extrusions {:.1} %",
            self.palaeochannels.depressions,
            self.palaeochannels.percent_depressions,
            self.palaeochannels.percent_extrusions,
        )?;

        let survey = &self.geophysical_survey;
        writeln!(f, "Geophysical survey")?;
        writeln!(f, "  features: {}", survey.features)?;
        writeln!(f, "  columns: [{}]", list(&survey.columns))?;
        writeln!(f, "  surveyed distance: {:.3} km", survey.surveyed_km)?;
        writeln!(f, "  share of network surveyed: {:.1} % ({:.1} % remaining)", survey.percent_of_network, survey.percent_unsurveyed)?;
        writeln!(f, "  materials: [{}]", list(&survey.materials))?;
        for (title, groups) in [
            ("by material", &survey.km_by_material),
            ("by saturation", &survey.km_by_saturation),
            ("by hydraulic unit", &survey.km_by_hydraulic_unit),
        ] {
            writeln!(f, "  surveyed km {title}:")?;
            for (key, km) in groups {
                writeln!(f, "    {key}: {km:.3}")?;
            }
        }

        writeln!(f, "Hydraulic units")?;
        writeln!(f, "  surveyed: {} of {}", self.hydraulic_units.surveyed, self.hydraulic_units.total)?;
        writeln!(f, "  units: [{}]", list(&self.hydraulic_units.units))?;
        write!(f, "  flood areas: {}", self.hydraulic_units.flood_areas)
    }
}
