use kurbo::{Point, Rect};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::raster::Raster;

/// Size and background of a static plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Straight-alpha background, must be opaque.
    pub bg_rgba: [u8; 4],
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            bg_rgba: [255, 255, 255, 255],
        }
    }
}

impl PlotStyle {
    /// Reject empty or oversized canvases and translucent backgrounds.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.width < 64 || self.height < 64 {
            return Err(ModevizError::validation("plot must be at least 64x64 pixels"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(ModevizError::validation("plot width/height exceeds u16"));
        }
        if self.bg_rgba[3] != 255 {
            return Err(ModevizError::validation("plot bg_rgba must be opaque"));
        }
        Ok(())
    }

    pub(crate) fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub(crate) fn raster(&self) -> ModevizResult<Raster> {
        self.validate()?;
        Raster::new(self.canvas(), Rgba8::from_array(self.bg_rgba))
    }

    /// Drawing area inside a fixed margin.
    pub(crate) fn plot_area(&self) -> Rect {
        let m = (f64::from(self.width.min(self.height)) * 0.08).max(8.0);
        Rect::new(
            m,
            m,
            f64::from(self.width) - m,
            f64::from(self.height) - m,
        )
    }
}

/// Maps a data-space window onto a pixel rectangle, `y` up in data space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    px: Rect,
    x: (f64, f64),
    y: (f64, f64),
}

impl Viewport {
    /// Stretch `x`/`y` independently onto `px`. Zero-width ranges are widened.
    pub(crate) fn new(px: Rect, x: (f64, f64), y: (f64, f64)) -> Self {
        Self {
            px,
            x: widen(x),
            y: widen(y),
        }
    }

    /// One scale for both axes, centered in `px`.
    pub(crate) fn fit_equal(px: Rect, x: (f64, f64), y: (f64, f64)) -> Self {
        let (x, y) = (widen(x), widen(y));
        let sx = px.width() / (x.1 - x.0);
        let sy = px.height() / (y.1 - y.0);
        let s = sx.min(sy);
        let half_w = 0.5 * px.width() / s;
        let half_h = 0.5 * px.height() / s;
        let cx = 0.5 * (x.0 + x.1);
        let cy = 0.5 * (y.0 + y.1);
        Self {
            px,
            x: (cx - half_w, cx + half_w),
            y: (cy - half_h, cy + half_h),
        }
    }

    pub(crate) fn to_px(&self, x: f64, y: f64) -> Point {
        let tx = (x - self.x.0) / (self.x.1 - self.x.0);
        let ty = (y - self.y.0) / (self.y.1 - self.y.0);
        Point::new(
            self.px.x0 + tx * self.px.width(),
            self.px.y1 - ty * self.px.height(),
        )
    }

    pub(crate) fn x_range(&self) -> (f64, f64) {
        self.x
    }

    pub(crate) fn y_range(&self) -> (f64, f64) {
        self.y
    }
}

fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        let c = 0.5 * (lo + hi);
        let half = (c.abs() * 0.5).max(0.5);
        (c - half, c + half)
    }
}

/// Outline of `r` drawn with `width`-pixel lines inside the rectangle.
pub(crate) fn outline(raster: &mut Raster, r: Rect, width: f64, color: Rgba8) {
    raster.fill_rect(Rect::new(r.x0, r.y0, r.x1, r.y0 + width), color);
    raster.fill_rect(Rect::new(r.x0, r.y1 - width, r.x1, r.y1), color);
    raster.fill_rect(Rect::new(r.x0, r.y0, r.x0 + width, r.y1), color);
    raster.fill_rect(Rect::new(r.x1 - width, r.y0, r.x1, r.y1), color);
}
