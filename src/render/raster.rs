use kurbo::{BezPath, Point, Rect, Shape as _};

use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::frame::FrameRGBA;

/// Immediate-mode drawing surface backed by `vello_cpu`.
///
/// Everything is drawn in pixel coordinates, `y` pointing down. [`Raster::finish`] flushes the
/// recorded geometry and returns **premultiplied** RGBA8 pixels.
pub struct Raster {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Raster {
    /// Start a frame cleared to `bg`.
    pub fn new(canvas: Canvas, bg: Rgba8) -> ModevizResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ModevizError::evaluation("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ModevizError::evaluation("canvas height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(ModevizError::validation("canvas width/height must be non-zero"));
        }

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        let mut raster = Self { width, height, ctx };
        raster.fill_rect(
            Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            bg,
        );
        Ok(raster)
    }

    /// Surface size.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: u32::from(self.width),
            height: u32::from(self.height),
        }
    }

    /// Fill an axis-aligned rectangle.
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        self.set_color(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Fill a closed path (non-zero winding).
    pub fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.set_color(color);
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Filled disc.
    pub fn dot(&mut self, center: Point, radius: f64, color: Rgba8) {
        if radius <= 0.0 {
            return;
        }
        let path = kurbo::Circle::new(center, radius).to_path(0.1);
        self.fill_path(&path, color);
    }

    /// Straight segment of the given pixel width with butt caps.
    pub fn line(&mut self, a: Point, b: Point, width: f64, color: Rgba8) {
        if let Some(quad) = segment_quad(a, b, width) {
            self.fill_path(&quad, color);
        }
    }

    /// Connected segments; interior vertices get round joins.
    pub fn polyline(&mut self, points: &[Point], width: f64, color: Rgba8) {
        for pair in points.windows(2) {
            self.line(pair[0], pair[1], width, color);
        }
        if points.len() > 2 {
            for &p in &points[1..points.len() - 1] {
                self.dot(p, 0.5 * width, color);
            }
        }
    }

    /// Polyline drawn as alternating `dash`/`gap` lengths measured along the whole path.
    pub fn dashed_polyline(
        &mut self,
        points: &[Point],
        width: f64,
        dash: f64,
        gap: f64,
        color: Rgba8,
    ) {
        if dash <= 0.0 {
            return;
        }
        if gap <= 0.0 {
            self.polyline(points, width, color);
            return;
        }
        let period = dash + gap;
        let mut travelled = 0.0;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let len = a.distance(b);
            if len <= 0.0 {
                continue;
            }
            let mut s = 0.0;
            while s < len {
                let phase = (travelled + s) % period;
                let (on, run) = if phase < dash {
                    (true, dash - phase)
                } else {
                    (false, period - phase)
                };
                let e = (s + run).min(len);
                if on {
                    self.line(a.lerp(b, s / len), a.lerp(b, e / len), width, color);
                }
                s = e;
            }
            travelled += len;
        }
    }

    /// Seven-segment text with its top-left corner at `origin`. Returns the advance width.
    ///
    /// Supports digits, `-`, `.`, `:`, `/`, `e` and space; other characters advance blank.
    pub fn seven_segment(&mut self, text: &str, origin: Point, height: f64, color: Rgba8) -> f64 {
        let m = GlyphMetrics::for_height(height);
        let mut x = origin.x;
        for ch in text.chars() {
            self.glyph(ch, Point::new(x, origin.y), &m, color);
            x += m.advance;
        }
        x - origin.x
    }

    fn glyph(&mut self, ch: char, at: Point, m: &GlyphMetrics, color: Rgba8) {
        let (x0, y0, w, h, s) = (at.x, at.y, m.width, m.height, m.stroke);
        match ch {
            '.' => self.fill_rect(Rect::new(x0, y0 + h - s, x0 + s, y0 + h), color),
            ':' => {
                let cx = x0 + 0.5 * (w - s);
                self.fill_rect(Rect::new(cx, y0 + 0.25 * h, cx + s, y0 + 0.25 * h + s), color);
                self.fill_rect(Rect::new(cx, y0 + 0.75 * h - s, cx + s, y0 + 0.75 * h), color);
            }
            '/' => self.line(
                Point::new(x0, y0 + h),
                Point::new(x0 + w, y0),
                s,
                color,
            ),
            _ => {
                let Some(mask) = segment_mask(ch) else {
                    return;
                };
                let mid = y0 + 0.5 * h;
                let segments = [
                    Rect::new(x0, y0, x0 + w, y0 + s),
                    Rect::new(x0 + w - s, y0, x0 + w, mid),
                    Rect::new(x0 + w - s, mid, x0 + w, y0 + h),
                    Rect::new(x0, y0 + h - s, x0 + w, y0 + h),
                    Rect::new(x0, mid, x0 + s, y0 + h),
                    Rect::new(x0, y0, x0 + s, mid),
                    Rect::new(x0, mid - 0.5 * s, x0 + w, mid + 0.5 * s),
                ];
                for (bit, rect) in segments.into_iter().enumerate() {
                    if mask & (1 << bit) != 0 {
                        self.fill_rect(rect, color);
                    }
                }
            }
        }
    }

    /// Rasterize everything drawn so far.
    pub fn finish(mut self) -> ModevizResult<FrameRGBA> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let data = pixmap.data_as_u8_slice().to_vec();
        let canvas = self.canvas();
        if data.len() != canvas.rgba_len() {
            return Err(ModevizError::evaluation(
                "rasterized pixmap size does not match canvas",
            ));
        }
        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data,
            premultiplied: true,
        })
    }

    fn set_color(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

/// Width taken by `text` when drawn with [`Raster::seven_segment`] at `height`.
pub fn seven_segment_width(text: &str, height: f64) -> f64 {
    GlyphMetrics::for_height(height).advance * text.chars().count() as f64
}

struct GlyphMetrics {
    width: f64,
    height: f64,
    stroke: f64,
    advance: f64,
}

impl GlyphMetrics {
    fn for_height(height: f64) -> Self {
        let height = height.max(3.0);
        let width = 0.55 * height;
        Self {
            width,
            height,
            stroke: (0.14 * height).max(1.0),
            advance: width + 0.3 * height,
        }
    }
}

// Bits: a (top), b (top right), c (bottom right), d (bottom), e (bottom left), f (top left),
// g (middle).
fn segment_mask(ch: char) -> Option<u8> {
    Some(match ch {
        '0' => 0x3f,
        '1' => 0x06,
        '2' => 0x5b,
        '3' => 0x4f,
        '4' => 0x66,
        '5' => 0x6d,
        '6' => 0x7d,
        '7' => 0x07,
        '8' => 0x7f,
        '9' => 0x6f,
        '-' => 0x40,
        'e' | 'E' => 0x79,
        _ => return None,
    })
}

fn segment_quad(a: Point, b: Point, width: f64) -> Option<BezPath> {
    let d = b - a;
    let len = d.hypot();
    if !len.is_finite() || len <= 0.0 || width <= 0.0 {
        return None;
    }
    let n = kurbo::Vec2::new(-d.y, d.x) * (0.5 * width / len);
    let mut p = BezPath::new();
    p.move_to(a + n);
    p.line_to(b + n);
    p.line_to(b - n);
    p.line_to(a - n);
    p.close_path();
    Some(p)
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
