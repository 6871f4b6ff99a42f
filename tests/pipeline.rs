use std::path::Path;

use embankmap::{
    DatasetPaths, GeometryKind, InteractiveMapConfig, LEGEND_TITLE, Legend, MapComposition, OSGB_PROJ4,
    RenderInstruction, StaticMapConfig, SurveyData, SurveyError, SurveyReport, render_interactive_map,
    render_static_map, survey_layers,
};
use shapefile::{
    Point, Polygon, PolygonRing, Polyline,
    dbase::{FieldName, FieldValue, Record, TableWriterBuilder},
    record::EsriShape,
};

/// Attribute field of a fixture shapefile.
enum Field {
    Text(&'static str),
    Number(&'static str),
}

impl Field {
    fn name(&self) -> FieldName {
        let name = match self { Field::Text(n) | Field::Number(n) => *n };
        FieldName::try_from(name).unwrap()
    }
}

fn table(fields: &[Field]) -> TableWriterBuilder {
    fields.iter().fold(TableWriterBuilder::new(), |builder, field| match field {
        Field::Text(_) => builder.add_character_field(field.name(), 32),
        Field::Number(_) => builder.add_numeric_field(field.name(), 18, 4),
    })
}

fn record(fields: &[Field], values: &[&str]) -> Record {
    let mut record = Record::default();
    for (field, value) in fields.iter().zip(values) {
        let (name, value) = match field {
            Field::Text(n) => (n, FieldValue::Character(Some(value.to_string()))),
            Field::Number(n) => (n, FieldValue::Numeric(Some(value.parse().unwrap()))),
        };
        record.insert(name.to_string(), value);
    }
    record
}

fn write<S: EsriShape>(root: &Path, rel: &Path, fields: &[Field], rows: Vec<(S, &[&str])>) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut writer = shapefile::Writer::from_path(&path, table(fields)).unwrap();
    for (shape, values) in rows {
        writer.write_shape_and_record(&shape, &record(fields, values)).unwrap();
    }
}

fn square(x: f64, y: f64, size: f64) -> Polygon {
    Polygon::new(PolygonRing::Outer(vec![
        Point::new(x, y),
        Point::new(x, y + size),
        Point::new(x + size, y + size),
        Point::new(x + size, y),
        Point::new(x, y),
    ]))
}

fn line(points: &[(f64, f64)]) -> Polyline {
    Polyline::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
}

/// A miniature survey: 3 flood areas, 550 km of embankment, 8.25 km of low sections,
/// 4 steep slopes, 4 palaeochannels and 205 km of geophysical survey.
fn write_survey(root: &Path) {
    let paths = DatasetPaths::default();

    let fields = [Field::Text("FloodArea_"), Field::Text("UNIT")];
    write(root, &paths.areas, &fields, vec![
        (square(480_000.0, 410_000.0, 10_000.0), &["FA02", "Hull"][..]),
        (square(490_000.0, 410_000.0, 10_000.0), &["FA01", "Hull"][..]),
        (square(500_000.0, 410_000.0, 20_000.0), &["FA03", "Goole"][..]),
    ]);

    let fields = [Field::Text("Type"), Field::Number("Shape_Leng")];
    write(root, &paths.defences, &fields, vec![
        (line(&[(481_000.0, 415_000.0), (499_000.0, 415_000.0)]), &["Earth", "250000"][..]),
        (line(&[(501_000.0, 420_000.0), (519_000.0, 425_000.0)]), &["Earth", "300000"][..]),
    ]);
    write(root, &paths.low_sections, &fields, vec![
        (line(&[(482_000.0, 415_000.0), (483_000.0, 415_000.0)]), &["Low", "8000"][..]),
        (line(&[(505_000.0, 421_000.0), (505_200.0, 421_100.0)]), &["Low", "250"][..]),
    ]);

    let fields = [Field::Text("Face"), Field::Number("Shape_Leng")];
    write(root, &paths.steep_slopes, &fields, vec![
        (square(484_000.0, 414_000.0, 50.0), &["Rear", "200"][..]),
        (square(486_000.0, 414_000.0, 50.0), &["Rear", "200"][..]),
        (square(502_000.0, 420_000.0, 50.0), &["Front", "200"][..]),
        (square(510_000.0, 422_000.0, 50.0), &["Rear", "200"][..]),
    ]);

    let fields = [Field::Text("channel"), Field::Text("Class")];
    write(root, &paths.palaeochannels, &fields, vec![
        (Point::new(485_000.0, 415_000.0), &["Depression", "A"][..]),
        (Point::new(495_000.0, 415_000.0), &["Depression", "B"][..]),
        (Point::new(503_000.0, 420_500.0), &["Extrusion", "A"][..]),
        (Point::new(515_000.0, 424_000.0), &["Depression", "A"][..]),
    ]);

    let fields = [
        Field::Text("Material"),
        Field::Text("Saturation"),
        Field::Text("HS_Hyd_Uni"),
        Field::Number("Tot_dist_m"),
    ];
    write(root, &paths.geophysical_survey, &fields, vec![
        (line(&[(481_000.0, 415_100.0), (490_000.0, 415_100.0)]), &["CLAY", "Normal", "Hull", "100000"][..]),
        (line(&[(490_000.0, 415_100.0), (499_000.0, 415_100.0)]), &["SILT", "Wet", "Hull", "50000"][..]),
        (line(&[(501_000.0, 420_100.0), (519_000.0, 425_100.0)]), &["CLAY", "Normal", "Goole", "55000"][..]),
    ]);
}

fn load() -> (tempfile::TempDir, SurveyData) {
    let dir = tempfile::tempdir().unwrap();
    write_survey(dir.path());
    let data = SurveyData::load(dir.path(), &DatasetPaths::default()).unwrap();
    (dir, data)
}

#[test]
fn loads_every_dataset() {
    let (_dir, data) = load();

    assert_eq!(data.areas.kind(), GeometryKind::Polygon);
    assert_eq!(data.defences.kind(), GeometryKind::Line);
    assert_eq!(data.steep_slopes.kind(), GeometryKind::Polygon);
    assert_eq!(data.palaeochannels.kind(), GeometryKind::Point);
    assert_eq!(data.areas.len(), 3);
    assert_eq!(data.geophysical_survey.len(), 3);
    assert_eq!(data.geophysical_survey.columns(), ["FID", "HS_Hyd_Uni", "Material", "Saturation", "Tot_dist_m"]);

    let bounds = data.areas.bounds().unwrap();
    assert_eq!(bounds.min().x, 480_000.0);
    assert_eq!(bounds.max().x, 520_000.0);
    assert_eq!(bounds.max().y, 430_000.0);
}

#[test]
fn report_reproduces_the_survey_figures() {
    let (_dir, data) = load();
    let report = SurveyReport::compute(&data).unwrap();

    assert!((report.network.total_km - 550.0).abs() < 1e-9);
    assert!((report.low_sections.total_km - 8.25).abs() < 1e-9);
    assert_eq!(format!("{:.1}", report.low_sections.percent_of_network), "1.5");

    assert_eq!(report.steep_slopes.count, 4);
    assert_eq!(report.steep_slopes.count_by_face["Rear"], 3);
    assert_eq!(report.steep_slopes.percent_by_face["Front"], 25.0);

    assert_eq!(report.palaeochannels.count, 4);
    assert_eq!(report.palaeochannels.depressions, 3);
    assert_eq!(report.palaeochannels.channel_types.len(), 2);
    assert_eq!(report.palaeochannels.percent_extrusions, 25.0);

    let survey = &report.geophysical_survey;
    assert_eq!(survey.features, 3);
    assert!((survey.surveyed_km - 205.0).abs() < 1e-9);
    assert_eq!(format!("{:.1}", survey.percent_of_network), "37.3");
    assert!((survey.km_by_material["CLAY"] - 155.0).abs() < 1e-9);
    assert!((survey.km_by_material["SILT"] - 50.0).abs() < 1e-9);
    assert!((survey.km_by_saturation["Normal"] - 155.0).abs() < 1e-9);
    assert!((survey.km_by_hydraulic_unit.values().sum::<f64>() - survey.surveyed_km).abs() < 1e-9);

    assert_eq!(report.hydraulic_units.surveyed, 2);
    assert_eq!(report.hydraulic_units.total, 2);
    assert_eq!(report.hydraulic_units.flood_areas, 3);

    let text = report.to_string();
    assert!(text.contains("share of network: 1.5 %"));
    assert!(text.contains("Rear: 3 (75.0 %)"));

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["steep_slopes"]["count"], 4);
    assert_eq!(json["hydraulic_units"]["units"], serde_json::json!(["Goole", "Hull"]));
}

#[test]
fn renders_the_static_map() {
    let (dir, data) = load();
    let out = dir.path().join("out/Humber_flood_embankment_data.png");
    let config = StaticMapConfig { width_px: 480, ..StaticMapConfig::default() };

    render_static_map(&data, &config, &out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn static_map_is_fully_labelled() {
    let (_dir, data) = load();
    let layers = survey_layers(&data).unwrap();

    let legend = Legend::from_layers(&layers);
    assert_eq!(legend.title, LEGEND_TITLE);
    let labels = legend.entries.iter().map(|e| e.label.as_str()).collect::<Vec<_>>();
    assert_eq!(labels, [
        "Flood embankments",
        "Low sections of embankments",
        "Steep embankment slopes",
        "Palaeochannel intersections",
        "Geophysical survey extents",
    ]);

    let config = StaticMapConfig { width_px: 480, ..StaticMapConfig::default() };
    let map = MapComposition::build(&layers, &config).unwrap();
    let texts = map.instructions().iter()
        .filter_map(|step| match step {
            RenderInstruction::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>();
    for label in ["Legend", "Flood embankments", "Geophysical survey extents", "0 km", "10 km", "20 km"] {
        assert!(texts.contains(&label), "missing label {label}");
    }
}

#[test]
fn renders_the_interactive_map() {
    let (dir, data) = load();
    let out = dir.path().join("Interactive_Humber_flood_embankment_data.html");

    render_interactive_map(&data, OSGB_PROJ4, &InteractiveMapConfig::default(), &out).unwrap();

    let html = std::fs::read_to_string(&out).unwrap();
    assert_eq!(html.matches("addLayer({").count(), 6);
    for caption in ["UNIT", "Flood Defence Embankments", "Low sections", "Steep slopes", "Palaeochannels", "Material"] {
        assert!(html.contains(&format!(r#""caption":"{caption}""#)), "missing layer {caption}");
    }
    assert!(html.contains(r#""circles":true"#));
}

#[test]
fn missing_dataset_aborts_the_load() {
    let dir = tempfile::tempdir().unwrap();
    write_survey(dir.path());
    std::fs::remove_file(dir.path().join(DatasetPaths::default().steep_slopes)).unwrap();

    let err = SurveyData::load(dir.path(), &DatasetPaths::default()).unwrap_err();
    assert!(matches!(err, SurveyError::DatasetNotFound(path) if path.ends_with("Embankment_steep_slope_anomalies.shp")));
}
