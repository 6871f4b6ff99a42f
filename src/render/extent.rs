use geo::{Coord, Rect};

use crate::error::{Result, SurveyError};

/// Typographic points across the figure: a 16 inch wide figure at 72 points per inch.
const FIGURE_WIDTH_PT: f64 = 16.0 * 72.0;

/// The displayed map area, in native map units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Extent {
    pub min: Coord<f64>,
    pub max: Coord<f64>,
}

impl Extent {
    /// Grow `bounds` by `buffer` on every side.
    pub fn buffered(bounds: Rect<f64>, buffer: f64) -> Self {
        Self {
            min: Coord { x: bounds.min().x - buffer, y: bounds.min().y - buffer },
            max: Coord { x: bounds.max().x + buffer, y: bounds.max().y + buffer },
        }
    }

    #[inline] pub fn width(&self) -> f64 { self.max.x - self.min.x }

    #[inline] pub fn height(&self) -> f64 { self.max.y - self.min.y }

    /// Point at fractional position (`across`, `up`) measured from the lower-left corner.
    pub fn at_fraction(&self, across: f64, up: f64) -> Coord<f64> {
        Coord {
            x: self.min.x + self.width() * across,
            y: self.min.y + self.height() * up,
        }
    }
}

/// Maps an extent onto an image of fixed width, with the height following the extent's
/// aspect ratio so no padding is needed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub extent: Extent,
    pub width_px: u32,
    pub height_px: u32,
}

impl Viewport {
    pub fn new(extent: Extent, width_px: u32) -> Result<Self> {
        let (w, h) = (extent.width(), extent.height());
        if !(w > 0.0 && h > 0.0 && w.is_finite() && h.is_finite()) {
            return Err(SurveyError::Render(format!("degenerate map extent {w} x {h}")))
        }
        if width_px == 0 {
            return Err(SurveyError::Render("image width must be positive".into()))
        }

        let height_px = ((width_px as f64) * h / w).round().max(1.0) as u32;
        Ok(Self { extent, width_px, height_px })
    }

    /// Project a map coordinate to a pixel (y down).
    pub fn to_pixel(&self, coord: Coord<f64>) -> (i32, i32) {
        let sx = self.width_px as f64 / self.extent.width();
        let sy = self.height_px as f64 / self.extent.height();
        let x = (coord.x - self.extent.min.x) * sx;
        let y = (self.extent.max.y - coord.y) * sy; // invert vertically
        (x.round() as i32, y.round() as i32)
    }

    /// Convert a size in points to pixels at this image width.
    pub fn points(&self, pt: f64) -> f64 {
        pt * self.width_px as f64 / FIGURE_WIDTH_PT
    }

    /// A stroke width in whole pixels, never thinner than one.
    pub fn stroke_px(&self, pt: f64) -> u32 {
        self.points(pt).round().max(1.0) as u32
    }
}
