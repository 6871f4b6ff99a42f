use std::path::Path;

use anyhow::{Context, Result};
use geo::{Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};
use shapefile::{self as shp, dbase::Record, PolygonRing, Shape};

/// Reads all shapes + attribute records from a given `.shp` file path, with the header shape type.
pub(crate) fn read_shapefile(path: &Path) -> Result<(shp::ShapeType, Vec<(Shape, Record)>)> {
    let mut reader = shp::Reader::from_path(path)
        .with_context(|| format!("Failed to open shapefile: {}", path.display()))?;

    let shape_type = reader.header().shape_type;
    let mut items = Vec::with_capacity(reader.shape_count()?);
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result.context("Error reading shape+record")?;
        items.push((shape, record));
    }
    Ok((shape_type, items))
}

/// Convert any shapefile shape to a geo geometry; null shapes become an empty collection.
pub(crate) fn shape_to_geometry(shape: Shape) -> Result<Geometry<f64>> {
    let geom = match shape {
        Shape::NullShape => Geometry::GeometryCollection(GeometryCollection::default()),
        Shape::Point(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointM(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::PointZ(p) => Geometry::Point(Point::new(p.x, p.y)),
        Shape::Multipoint(mp) => multipoint(mp.points(), |p| (p.x, p.y)),
        Shape::MultipointM(mp) => multipoint(mp.points(), |p| (p.x, p.y)),
        Shape::MultipointZ(mp) => multipoint(mp.points(), |p| (p.x, p.y)),
        Shape::Polyline(line) => polyline(line.parts(), |p| (p.x, p.y)),
        Shape::PolylineM(line) => polyline(line.parts(), |p| (p.x, p.y)),
        Shape::PolylineZ(line) => polyline(line.parts(), |p| (p.x, p.y)),
        Shape::Polygon(poly) => Geometry::MultiPolygon(rings_to_multipolygon(poly.rings(), |p| (p.x, p.y))),
        Shape::PolygonM(poly) => Geometry::MultiPolygon(rings_to_multipolygon(poly.rings(), |p| (p.x, p.y))),
        Shape::PolygonZ(poly) => Geometry::MultiPolygon(rings_to_multipolygon(poly.rings(), |p| (p.x, p.y))),
        other => anyhow::bail!("unsupported shape type: {:?}", other.shapetype()),
    };
    Ok(geom)
}

fn multipoint<P>(points: &[P], xy: impl Fn(&P) -> (f64, f64)) -> Geometry<f64> {
    Geometry::MultiPoint(MultiPoint(points.iter()
        .map(|p| { let (x, y) = xy(p); Point::new(x, y) })
        .collect()))
}

fn polyline<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> (f64, f64)) -> Geometry<f64> {
    Geometry::MultiLineString(MultiLineString(parts.iter()
        .map(|part| LineString(part.iter().map(|p| { let (x, y) = xy(p); Coord { x, y } }).collect()))
        .collect()))
}

/// Convert shapefile polygon rings to geo::MultiPolygon<f64>.
fn rings_to_multipolygon<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> MultiPolygon<f64> {
    /// Ensure first and last are the same for geo::LineString coords
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
            if first != last { coords.push(first) }
        }
    }

    // Each outer ring is followed by its holes (Shapefile stores rings in this order).
    let mut polys: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let mut coords = ring.points().iter()
            .map(|p| { let (x, y) = xy(p); Coord { x, y } })
            .collect::<Vec<_>>();
        ensure_closed(&mut coords);
        let ls = LineString(coords);

        match ring {
            PolygonRing::Outer(_) => {
                // flush previous polygon
                if let Some(ext) = current_exterior.take() {
                    polys.push(Polygon::new(ext, std::mem::take(&mut current_holes)));
                }
                current_exterior = Some(ls);
            }
            PolygonRing::Inner(_) => current_holes.push(ls),
        }
    }
    if let Some(ext) = current_exterior {
        polys.push(Polygon::new(ext, current_holes));
    }

    MultiPolygon(polys)
}

#[cfg(test)]
mod tests {
    use geo::Area;
    use shapefile::Point as ShpPoint;

    use super::*;

    fn square(x0: f64, y0: f64, size: f64) -> Vec<ShpPoint> {
        // Shapefile outer rings run clockwise.
        vec![
            ShpPoint::new(x0, y0),
            ShpPoint::new(x0, y0 + size),
            ShpPoint::new(x0 + size, y0 + size),
            ShpPoint::new(x0 + size, y0),
        ]
    }

    #[test]
    fn polygon_with_hole() {
        let mut hole = square(2.0, 2.0, 2.0);
        hole.reverse();
        let polygon = shp::Polygon::with_rings(vec![
            PolygonRing::Outer(square(0.0, 0.0, 10.0)),
            PolygonRing::Inner(hole),
        ]);

        let Geometry::MultiPolygon(mp) = shape_to_geometry(Shape::Polygon(polygon)).unwrap() else {
            panic!("expected a multipolygon");
        };
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);
        assert!((mp.unsigned_area() - 96.0).abs() < 1e-9);
        // rings are closed
        let ext = &mp.0[0].exterior().0;
        assert_eq!(ext.first(), ext.last());
    }

    #[test]
    fn polyline_parts_become_linestrings() {
        let line = shp::Polyline::with_parts(vec![
            vec![ShpPoint::new(0.0, 0.0), ShpPoint::new(3.0, 4.0)],
            vec![ShpPoint::new(10.0, 0.0), ShpPoint::new(10.0, 1.0)],
        ]);
        let Geometry::MultiLineString(mls) = shape_to_geometry(Shape::Polyline(line)).unwrap() else {
            panic!("expected a multilinestring");
        };
        assert_eq!(mls.0.len(), 2);
        assert_eq!(mls.0[0].0[1], Coord { x: 3.0, y: 4.0 });
    }

    #[test]
    fn null_shape_is_empty() {
        let geom = shape_to_geometry(Shape::NullShape).unwrap();
        assert!(matches!(geom, Geometry::GeometryCollection(gc) if gc.0.is_empty()));
    }
}
