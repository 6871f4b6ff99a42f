use std::collections::BTreeMap;

use geo::{Coord, Geometry, LineString, Polygon};
use polars::prelude::{Column, DataType};
use serde_json::{json, Map, Value};

use crate::{
    dataset::Dataset,
    error::Result,
    explore::proj::Reprojector,
    render::Rgb,
};

/// Decimal places kept for lon/lat (about 10 cm).
const COORD_PRECISION: f64 = 1e6;

fn position(c: &Coord<f64>) -> Value {
    json!([(c.x * COORD_PRECISION).round() / COORD_PRECISION, (c.y * COORD_PRECISION).round() / COORD_PRECISION])
}

fn ring(ls: &LineString<f64>) -> Value {
    Value::Array(ls.coords().map(position).collect())
}

fn polygon(p: &Polygon<f64>) -> Value {
    Value::Array(std::iter::once(p.exterior()).chain(p.interiors()).map(ring).collect())
}

/// GeoJSON geometry object; empty collections become `null`.
pub(crate) fn geometry_to_geojson(geom: &Geometry<f64>) -> Value {
    match geom {
        Geometry::Point(p) => json!({ "type": "Point", "coordinates": position(&p.0) }),
        Geometry::MultiPoint(mp) => json!({
            "type": "MultiPoint",
            "coordinates": mp.0.iter().map(|p| position(&p.0)).collect::<Vec<_>>(),
        }),
        Geometry::Line(l) => json!({ "type": "LineString", "coordinates": [position(&l.start), position(&l.end)] }),
        Geometry::LineString(ls) => json!({ "type": "LineString", "coordinates": ring(ls) }),
        Geometry::MultiLineString(mls) => json!({
            "type": "MultiLineString",
            "coordinates": mls.0.iter().map(ring).collect::<Vec<_>>(),
        }),
        Geometry::Polygon(p) => json!({ "type": "Polygon", "coordinates": polygon(p) }),
        Geometry::MultiPolygon(mp) => json!({
            "type": "MultiPolygon",
            "coordinates": mp.0.iter().map(polygon).collect::<Vec<_>>(),
        }),
        Geometry::Rect(r) => json!({ "type": "Polygon", "coordinates": polygon(&r.to_polygon()) }),
        Geometry::Triangle(t) => json!({ "type": "Polygon", "coordinates": polygon(&t.to_polygon()) }),
        Geometry::GeometryCollection(gc) if gc.0.is_empty() => Value::Null,
        Geometry::GeometryCollection(gc) => json!({
            "type": "GeometryCollection",
            "geometries": gc.0.iter().map(geometry_to_geojson).collect::<Vec<_>>(),
        }),
    }
}

/// One attribute value as JSON; nulls and non-finite numbers become `null`.
fn cell(column: &Column, idx: usize) -> Value {
    match column.dtype() {
        DataType::String => column.str().ok()
            .and_then(|s| s.get(idx))
            .map(|s| json!(s))
            .unwrap_or(Value::Null),
        DataType::Float64 => column.f64().ok()
            .and_then(|v| v.get(idx))
            .filter(|v| v.is_finite())
            .map(|v| json!(v))
            .unwrap_or(Value::Null),
        DataType::UInt32 => column.u32().ok()
            .and_then(|v| v.get(idx))
            .map(|v| json!(v))
            .unwrap_or(Value::Null),
        _ => column.get(idx).ok()
            .filter(|v| !v.is_null())
            .map(|v| json!(v.to_string()))
            .unwrap_or(Value::Null),
    }
}

/// Export a dataset as a GeoJSON FeatureCollection in WGS84.
///
/// Every attribute is carried into `properties`. Each feature also gets a foreign
/// `color` member, looked up from its `attribute` value in `colors` (`fallback` when
/// the value is null or uncolored).
pub(crate) fn feature_collection(
    dataset: &Dataset,
    reprojector: &Reprojector,
    attribute: &str,
    colors: &BTreeMap<String, Rgb>,
    fallback: Rgb,
) -> Result<Value> {
    let category = dataset.column(attribute)?.cast(&DataType::String)?;
    let category = category.str()?;
    let columns = dataset.data().get_columns();

    let mut features = Vec::with_capacity(dataset.len());
    for (idx, geom) in dataset.geoms().iter().enumerate() {
        let mut properties = Map::new();
        for column in columns {
            properties.insert(column.name().to_string(), cell(column, idx));
        }

        let color = category.get(idx)
            .and_then(|value| colors.get(value))
            .copied()
            .unwrap_or(fallback);

        features.push(json!({
            "type": "Feature",
            "id": idx,
            "geometry": geometry_to_geojson(&reprojector.geometry(geom)?),
            "properties": properties,
            "color": color.hex(),
        }));
    }

    Ok(json!({
        "type": "FeatureCollection",
        "features": features,
    }))
}
