use geo::Coord;

use crate::render::{color::{BLACK, Rgb, WHITE}, extent::Extent};

/// Full bar length in map units (metres).
pub const SCALE_BAR_LENGTH: f64 = 20_000.0;
const HALF: f64 = SCALE_BAR_LENGTH / 2.0;
/// Vertical offset of the labels below the bar.
const LABEL_DROP: f64 = 4_500.0;

/// One straight stroke of the bar, in map coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct BarSegment {
    pub from: Coord<f64>,
    pub to: Coord<f64>,
    pub color: Rgb,
    /// Stroke width in points.
    pub line_width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BarLabel {
    pub text: &'static str,
    /// Left baseline position of the text.
    pub position: Coord<f64>,
}

/// A 20 km bar extending left of its anchor: a thick black base, then
/// alternating black and white 10 km halves drawn over it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBar {
    pub anchor: Coord<f64>,
}

impl ScaleBar {
    /// Anchor the bar at fractional position `location` (across, up) of the extent.
    pub fn anchored(extent: &Extent, location: (f64, f64)) -> Self {
        Self { anchor: extent.at_fraction(location.0, location.1) }
    }

    fn at(&self, dx: f64, dy: f64) -> Coord<f64> {
        Coord { x: self.anchor.x + dx, y: self.anchor.y + dy }
    }

    /// Segments in draw order.
    pub fn segments(&self) -> [BarSegment; 3] {
        [
            BarSegment { from: self.anchor, to: self.at(-SCALE_BAR_LENGTH, 0.0), color: BLACK, line_width: 9.0 },
            BarSegment { from: self.anchor, to: self.at(-HALF, 0.0), color: BLACK, line_width: 6.0 },
            BarSegment { from: self.at(-HALF, 0.0), to: self.at(-SCALE_BAR_LENGTH, 0.0), color: WHITE, line_width: 6.0 },
        ]
    }

    pub fn labels(&self) -> [BarLabel; 3] {
        [
            BarLabel { text: "20 km", position: self.at(0.0, -LABEL_DROP) },
            BarLabel { text: "10 km", position: self.at(-12_500.0, -LABEL_DROP) },
            BarLabel { text: "0 km", position: self.at(-24_500.0, -LABEL_DROP) },
        ]
    }
}
