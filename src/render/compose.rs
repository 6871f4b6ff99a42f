use std::path::Path;

use geo::{Coord, CoordsIter, Geometry, LineString, Polygon};
use log::{debug, info};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

use crate::{
    common,
    config::StaticMapConfig,
    dataset::GeometryKind,
    error::{Result, SurveyError},
    render::{
        color::{BLACK, Rgb, WHITE},
        extent::{Extent, Viewport},
        layer::{LayerRole, RenderLayer},
        legend::Legend,
        scalebar::ScaleBar,
    },
};

type Pixel = (i32, i32);

/// Color with alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub opacity: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: u32,
}

/// One drawing step in pixel space. A composition is an ordered list of these,
/// consumed front to back by a single render pass.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderInstruction {
    Background(Rgb),
    Polygon { ring: Vec<Pixel>, fill: Option<Paint>, edge: Option<Stroke> },
    Path { points: Vec<Pixel>, stroke: Stroke },
    Marker { center: Pixel, radius: i32, paint: Paint },
    Rect { corners: [Pixel; 2], fill: Option<Paint>, edge: Option<Stroke> },
    Text { text: String, position: Pixel, size: f64, anchor: TextAnchor },
}

/// Which corner of the text box sits on `position`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    BaselineLeft,
}

/// A fully laid-out static map: the viewport plus every drawing step in order.
#[derive(Clone, Debug)]
pub struct MapComposition {
    viewport: Viewport,
    instructions: Vec<RenderInstruction>,
}

impl MapComposition {
    /// Lay out `layers` (in draw order) with a legend of the overlays and a scale bar.
    /// The extent is the bounds of the basemap layers, buffered.
    pub fn build(layers: &[RenderLayer], config: &StaticMapConfig) -> Result<Self> {
        for layer in layers {
            layer.check()?;
        }

        let bounds = layers.iter()
            .filter(|layer| layer.role() == LayerRole::Basemap)
            .filter_map(|layer| layer.dataset().bounds())
            .reduce(|a, b| geo::Rect::new(
                Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
            ))
            .ok_or_else(|| SurveyError::Render("no basemap geometry to set the map extent".into()))?;

        let extent = Extent::buffered(bounds, config.extent_buffer);
        let viewport = Viewport::new(extent, config.width_px)?;
        debug!("[render::compose] viewport {}x{} px over {:?}", viewport.width_px, viewport.height_px, extent);

        let mut instructions = vec![RenderInstruction::Background(WHITE)];
        for layer in layers {
            push_layer(&mut instructions, layer, &viewport);
        }
        push_legend(&mut instructions, &Legend::from_layers(layers), &viewport);
        push_scale_bar(&mut instructions, &ScaleBar::anchored(&extent, config.scale_bar_location), &viewport);

        Ok(Self { viewport, instructions })
    }

    #[inline] pub fn viewport(&self) -> &Viewport { &self.viewport }

    #[inline] pub fn instructions(&self) -> &[RenderInstruction] { &self.instructions }

    /// Draw every instruction onto a fresh bitmap and write it to `path` as PNG.
    pub fn render_png(self, path: &Path) -> Result<()> {
        common::ensure_parent_exists(path).map_err(render_error)?;

        let size = (self.viewport.width_px, self.viewport.height_px);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        draw_instructions(&root, self.instructions)?;

        root.present().map_err(render_error)?;
        info!("[render::compose] wrote {}x{} px map to {}", size.0, size.1, path.display());
        Ok(())
    }
}

/// Consume `instructions` front to back onto `root`. Any failed step, labels
/// included, aborts the render.
fn draw_instructions<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    instructions: Vec<RenderInstruction>,
) -> Result<()> {
    for instruction in instructions {
        match instruction {
            RenderInstruction::Background(color) => {
                root.fill(&rgb(color)).map_err(render_error)?;
            }
            RenderInstruction::Polygon { ring, fill, edge } => {
                if let Some(fill) = fill {
                    root.draw(&plotters::element::Polygon::new(ring.clone(), filled(fill)))
                        .map_err(render_error)?;
                }
                if let Some(edge) = edge {
                    let mut closed = ring;
                    if let Some(&first) = closed.first() { closed.push(first) }
                    root.draw(&PathElement::new(closed, stroked(edge))).map_err(render_error)?;
                }
            }
            RenderInstruction::Path { points, stroke } => {
                root.draw(&PathElement::new(points, stroked(stroke))).map_err(render_error)?;
            }
            RenderInstruction::Marker { center, radius, paint } => {
                root.draw(&Circle::new(center, radius, filled(paint))).map_err(render_error)?;
            }
            RenderInstruction::Rect { corners, fill, edge } => {
                if let Some(fill) = fill {
                    root.draw(&Rectangle::new(corners, filled(fill))).map_err(render_error)?;
                }
                if let Some(edge) = edge {
                    root.draw(&Rectangle::new(corners, stroked(edge))).map_err(render_error)?;
                }
            }
            RenderInstruction::Text { text, position, size, anchor } => {
                let pos = match anchor {
                    TextAnchor::TopLeft => Pos::new(HPos::Left, VPos::Top),
                    TextAnchor::BaselineLeft => Pos::new(HPos::Left, VPos::Bottom),
                };
                let style = ("sans-serif", size).into_font().color(&rgb(BLACK)).pos(pos);
                root.draw(&Text::new(text, position, style))
                    .map_err(|e| SurveyError::Render(format!("cannot draw map label: {e}")))?;
            }
        }
    }
    Ok(())
}

fn render_error(e: impl std::fmt::Display) -> SurveyError {
    SurveyError::Render(e.to_string())
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn filled(paint: Paint) -> ShapeStyle {
    ShapeStyle { color: rgb(paint.color).mix(paint.opacity), filled: true, stroke_width: 1 }
}

fn stroked(stroke: Stroke) -> ShapeStyle {
    ShapeStyle { color: rgb(stroke.paint.color).mix(stroke.paint.opacity), filled: false, stroke_width: stroke.width }
}

fn project_ring(ring: &LineString<f64>, viewport: &Viewport) -> Vec<Pixel> {
    let mut pixels = ring.coords_iter().map(|c| viewport.to_pixel(c)).collect::<Vec<_>>();
    pixels.dedup();
    pixels
}

/// Exterior rings of every polygon in a geometry. Holes are not drawn.
fn polygons_of(geom: &Geometry<f64>) -> Vec<&Polygon<f64>> {
    match geom {
        Geometry::Polygon(p) => vec![p],
        Geometry::MultiPolygon(mp) => mp.0.iter().collect(),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(polygons_of).collect(),
        _ => Vec::new(),
    }
}

fn lines_of(geom: &Geometry<f64>) -> Vec<&LineString<f64>> {
    match geom {
        Geometry::LineString(ls) => vec![ls],
        Geometry::MultiLineString(mls) => mls.0.iter().collect(),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(lines_of).collect(),
        _ => Vec::new(),
    }
}

fn points_of(geom: &Geometry<f64>) -> Vec<Coord<f64>> {
    match geom {
        Geometry::Point(p) => vec![p.0],
        Geometry::MultiPoint(mp) => mp.0.iter().map(|p| p.0).collect(),
        Geometry::GeometryCollection(gc) => gc.0.iter().flat_map(points_of).collect(),
        _ => Vec::new(),
    }
}

fn push_layer(out: &mut Vec<RenderInstruction>, layer: &RenderLayer, viewport: &Viewport) {
    let style = layer.style();
    let edge = style.edge_color.map(|color| Stroke {
        paint: Paint { color, opacity: style.opacity },
        width: viewport.stroke_px(style.line_width),
    });
    let before = out.len();

    for (i, geom) in layer.dataset().geoms().iter().enumerate() {
        match style.geometry_kind {
            GeometryKind::Polygon => {
                let fill = layer.fill_for(i).map(|color| Paint { color, opacity: style.opacity });
                for polygon in polygons_of(geom) {
                    let ring = project_ring(polygon.exterior(), viewport);
                    if ring.len() < 3 { continue }
                    out.push(RenderInstruction::Polygon { ring, fill, edge });
                }
            }
            GeometryKind::Line => {
                let Some(stroke) = edge else { continue };
                for line in lines_of(geom) {
                    let points = project_ring(line, viewport);
                    if points.len() < 2 { continue }
                    out.push(RenderInstruction::Path { points, stroke });
                }
            }
            GeometryKind::Point => {
                let Some(color) = layer.fill_for(i) else { continue };
                let radius = (viewport.points(style.marker_size) / 2.0).round().max(1.0) as i32;
                for coord in points_of(geom) {
                    out.push(RenderInstruction::Marker {
                        center: viewport.to_pixel(coord),
                        radius,
                        paint: Paint { color, opacity: style.opacity },
                    });
                }
            }
        }
    }

    debug!("[render::compose] layer {}: {} instructions", layer.dataset().name(), out.len() - before);
}

/// Rough text width; labels only need to fit inside the legend frame.
fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * 0.6
}

fn push_legend(out: &mut Vec<RenderInstruction>, legend: &Legend, viewport: &Viewport) {
    if legend.is_empty() { return }

    let title_size = viewport.points(14.0);
    let entry_size = viewport.points(12.0);
    let pad = viewport.points(8.0);
    let row = entry_size * 1.6;
    let swatch = (viewport.points(20.0), viewport.points(10.0));

    let content_width = legend.entries.iter()
        .map(|entry| swatch.0 + pad + text_width(&entry.label, entry_size))
        .fold(text_width(&legend.title, title_size), f64::max);
    let width = content_width + 2.0 * pad;
    let height = pad + title_size * 1.4 + row * legend.entries.len() as f64 + pad;

    let (x0, y0) = (pad, pad);
    out.push(RenderInstruction::Rect {
        corners: [(x0 as i32, y0 as i32), ((x0 + width) as i32, (y0 + height) as i32)],
        fill: Some(Paint { color: WHITE, opacity: 1.0 }),
        edge: Some(Stroke { paint: Paint { color: Rgb::new(204, 204, 204), opacity: 1.0 }, width: viewport.stroke_px(0.8) }),
    });

    let title_x = x0 + (width - text_width(&legend.title, title_size)) / 2.0;
    out.push(RenderInstruction::Text {
        text: legend.title.clone(),
        position: (title_x as i32, (y0 + pad) as i32),
        size: title_size,
        anchor: TextAnchor::TopLeft,
    });

    let swatch_edge = Stroke { paint: Paint { color: BLACK, opacity: 1.0 }, width: 1 };
    for (i, entry) in legend.entries.iter().enumerate() {
        let top = y0 + pad + title_size * 1.4 + row * i as f64;
        let sx = x0 + pad;
        let sy = top + (row - swatch.1) / 2.0;
        out.push(RenderInstruction::Rect {
            corners: [(sx as i32, sy as i32), ((sx + swatch.0) as i32, (sy + swatch.1) as i32)],
            fill: Some(Paint { color: entry.color, opacity: entry.opacity }),
            edge: Some(Stroke { paint: Paint { opacity: entry.opacity, ..swatch_edge.paint }, ..swatch_edge }),
        });
        out.push(RenderInstruction::Text {
            text: entry.label.clone(),
            position: ((sx + swatch.0 + pad) as i32, (top + (row - entry_size) / 2.0) as i32),
            size: entry_size,
            anchor: TextAnchor::TopLeft,
        });
    }
}

fn push_scale_bar(out: &mut Vec<RenderInstruction>, bar: &ScaleBar, viewport: &Viewport) {
    for segment in bar.segments() {
        out.push(RenderInstruction::Path {
            points: vec![viewport.to_pixel(segment.from), viewport.to_pixel(segment.to)],
            stroke: Stroke {
                paint: Paint { color: segment.color, opacity: 1.0 },
                width: viewport.stroke_px(segment.line_width),
            },
        });
    }
    for label in bar.labels() {
        out.push(RenderInstruction::Text {
            text: label.text.to_string(),
            position: viewport.to_pixel(label.position),
            size: viewport.points(10.0),
            anchor: TextAnchor::BaselineLeft,
        });
    }
}

#[cfg(test)]
mod tests {
    use geo::{line_string, point, polygon, MultiPolygon};
    use polars::prelude::{Column, DataFrame};

    use super::*;
    use crate::{
        dataset::Dataset,
        render::{color::{AREA_PALETTE, BLUE, GRAY_70, LIGHT_GRAY, WHITE}, style::LayerStyle},
    };

    fn dataset(name: &str, kind: GeometryKind, geoms: Vec<Geometry<f64>>) -> Dataset {
        let ids = (0..geoms.len()).map(|i| format!("FA{i}")).collect::<Vec<_>>();
        let data = DataFrame::new(vec![Column::new("FloodArea_".into(), ids)]).unwrap();
        Dataset::new(name, kind, data, geoms).unwrap()
    }

    fn areas() -> Dataset {
        dataset("areas", GeometryKind::Polygon, vec![
            Geometry::MultiPolygon(MultiPolygon(vec![polygon![
                (x: 20_000.0, y: 20_000.0), (x: 60_000.0, y: 20_000.0),
                (x: 60_000.0, y: 40_000.0), (x: 20_000.0, y: 40_000.0),
            ]])),
            Geometry::MultiPolygon(MultiPolygon(vec![polygon![
                (x: 60_000.0, y: 20_000.0), (x: 100_000.0, y: 20_000.0),
                (x: 100_000.0, y: 40_000.0), (x: 60_000.0, y: 40_000.0),
            ]])),
        ])
    }

    fn config(width_px: u32) -> StaticMapConfig {
        StaticMapConfig { width_px, ..StaticMapConfig::default() }
    }

    #[test]
    fn extent_is_buffered_basemap() {
        let areas = areas();
        let layers = [RenderLayer::basemap(&areas, LayerStyle::polygon(Some(WHITE), Some(LIGHT_GRAY)))];
        let map = MapComposition::build(&layers, &config(1000)).unwrap();

        let vp = map.viewport();
        assert_eq!(vp.extent.min, Coord { x: 10_000.0, y: 10_000.0 });
        assert_eq!(vp.extent.max, Coord { x: 110_000.0, y: 50_000.0 });
        assert_eq!(vp.height_px, 400);
    }

    #[test]
    fn instructions_follow_layer_order() {
        let areas = areas();
        let lines = dataset("defences", GeometryKind::Line, vec![
            Geometry::LineString(line_string![(x: 20_000.0, y: 30_000.0), (x: 100_000.0, y: 30_000.0)]),
        ]);
        let points = dataset("palaeochannels", GeometryKind::Point, vec![
            Geometry::Point(point!(x: 50_000.0, y: 30_000.0)),
        ]);
        let layers = [
            RenderLayer::basemap(&areas, LayerStyle::polygon(Some(WHITE), Some(LIGHT_GRAY))),
            RenderLayer::overlay(&lines, LayerStyle::line(BLUE, 2.0).with_opacity(0.25)),
            RenderLayer::overlay(&points, LayerStyle::point(GRAY_70, 3.0)),
        ];
        let map = MapComposition::build(&layers, &config(1000)).unwrap();
        let steps = map.instructions();

        assert_eq!(steps[0], RenderInstruction::Background(WHITE));
        assert!(matches!(steps[1], RenderInstruction::Polygon { .. }));
        assert!(matches!(steps[2], RenderInstruction::Polygon { .. }));
        match &steps[3] {
            RenderInstruction::Path { points, stroke } => {
                assert_eq!(points.len(), 2);
                assert_eq!(stroke.paint, Paint { color: BLUE, opacity: 0.25 });
            }
            other => panic!("expected the embankment path, got {other:?}"),
        }
        assert!(matches!(steps[4], RenderInstruction::Marker { center: (400, 200), .. }));
        // legend frame follows the layers, scale bar comes last
        assert!(matches!(steps[5], RenderInstruction::Rect { .. }));
        assert!(matches!(steps.last(), Some(RenderInstruction::Text { text, .. }) if text == "0 km"));
    }

    #[test]
    fn basemap_fills_come_from_the_palette() {
        let areas = areas();
        let layers = [
            RenderLayer::basemap(&areas, LayerStyle::polygon(Some(WHITE), Some(WHITE)).with_opacity(0.25))
                .with_palette_fills("FloodArea_", &AREA_PALETTE)
                .unwrap(),
        ];
        let map = MapComposition::build(&layers, &config(500)).unwrap();

        let fills = map.instructions().iter()
            .filter_map(|step| match step {
                RenderInstruction::Polygon { fill, .. } => *fill,
                _ => None,
            })
            .collect::<Vec<_>>();
        assert_eq!(fills, [
            Paint { color: AREA_PALETTE[0], opacity: 0.25 },
            Paint { color: AREA_PALETTE[1], opacity: 0.25 },
        ]);
        // no overlays, no legend
        assert!(!map.instructions().iter().any(|s| matches!(s, RenderInstruction::Rect { .. })));
    }

    #[test]
    fn no_basemap_is_an_error() {
        let lines = dataset("defences", GeometryKind::Line, vec![
            Geometry::LineString(line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)]),
        ]);
        let layers = [RenderLayer::overlay(&lines, LayerStyle::line(BLUE, 1.0))];
        assert!(matches!(MapComposition::build(&layers, &config(100)), Err(SurveyError::Render(_))));
    }

    #[test]
    fn labels_are_drawn() {
        let (w, h) = (120, 40);
        let mut buffer = vec![0u8; (w * h * 3) as usize];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (w, h)).into_drawing_area();
            draw_instructions(&root, vec![
                RenderInstruction::Background(WHITE),
                RenderInstruction::Text {
                    text: "20 km".into(),
                    position: (10, 30),
                    size: 24.0,
                    anchor: TextAnchor::BaselineLeft,
                },
            ]).unwrap();
            root.present().unwrap();
        }
        assert!(buffer.iter().any(|&channel| channel < 128), "label left no dark pixels");
    }

    #[test]
    fn writes_a_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maps").join("small.png");

        let areas = areas();
        let layers = [RenderLayer::basemap(&areas, LayerStyle::polygon(Some(WHITE), Some(LIGHT_GRAY)))];
        MapComposition::build(&layers, &config(240)).unwrap().render_png(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
