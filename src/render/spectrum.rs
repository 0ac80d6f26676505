use kurbo::Point;

use crate::foundation::core::Rgba8;
use crate::foundation::error::ModevizResult;
use crate::render::frame::FrameRGBA;
use crate::render::plot::{PlotStyle, Viewport};
use crate::spectrum::{Spectrum, Stem};

/// Camera and colors of the spectrum plot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpectrumPlotStyle {
    /// Canvas.
    pub plot: PlotStyle,
    /// Rotation about the vertical axis, degrees.
    pub azimuth_deg: f64,
    /// Tilt above the floor plane, degrees.
    pub elevation_deg: f64,
    /// Stretch stems so the tallest reaches the floor's half-span. Off by default: stems are
    /// `|b|` tall on the same scale as the unit circle.
    pub normalize_heights: bool,
}

impl Default for SpectrumPlotStyle {
    fn default() -> Self {
        Self {
            plot: PlotStyle {
                width: 800,
                height: 700,
                ..PlotStyle::default()
            },
            azimuth_deg: -60.0,
            elevation_deg: 30.0,
            normalize_heights: false,
        }
    }
}

const STEM: Rgba8 = Rgba8 {
    r: 31,
    g: 119,
    b: 180,
    a: 160,
};
const MARKER: Rgba8 = Rgba8::rgb(214, 39, 40);
const CIRCLE: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 140,
};
const FLOOR: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 40,
};

/// Fixed orthographic camera.
#[derive(Clone, Copy, Debug)]
struct Camera {
    right: [f64; 3],
    up: [f64; 3],
    toward: [f64; 3],
}

impl Camera {
    fn new(azimuth_deg: f64, elevation_deg: f64) -> Self {
        let (sa, ca) = azimuth_deg.to_radians().sin_cos();
        let (se, ce) = elevation_deg.to_radians().sin_cos();
        Self {
            right: [-sa, ca, 0.0],
            up: [-se * ca, -se * sa, ce],
            toward: [ce * ca, ce * sa, se],
        }
    }

    fn project(&self, p: [f64; 3]) -> (f64, f64) {
        (dot(self.right, p), dot(self.up, p))
    }

    /// Larger means closer to the viewer.
    fn depth(&self, p: [f64; 3]) -> f64 {
        dot(self.toward, p)
    }
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Finite stems plus the data-to-pixel mapping they are drawn with.
struct SpectrumScene {
    cam: Camera,
    vp: Viewport,
    stems: Vec<Stem>,
    reach: f64,
    z_scale: f64,
}

impl SpectrumScene {
    fn new(spectrum: &Spectrum, style: &SpectrumPlotStyle) -> Self {
        let cam = Camera::new(style.azimuth_deg, style.elevation_deg);
        let stems: Vec<Stem> = spectrum
            .stems()
            .filter(|s| s.re.is_finite() && s.im.is_finite() && s.height.is_finite())
            .collect();

        let reach = stems
            .iter()
            .map(|s| s.re.abs().max(s.im.abs()))
            .fold(1.0_f64, f64::max)
            * 1.15;
        let tallest = stems.iter().map(|s| s.height).fold(0.0_f64, f64::max);
        let z_scale = if style.normalize_heights && tallest > 0.0 {
            reach / tallest
        } else {
            1.0
        };
        let z_top = tallest * z_scale;

        let mut xs = Vec::with_capacity(8);
        let mut ys = Vec::with_capacity(8);
        for corner in floor_corners(reach) {
            for z in [0.0, z_top] {
                let (x, y) = cam.project([corner[0], corner[1], z]);
                xs.push(x);
                ys.push(y);
            }
        }
        let bounds = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                })
        };
        let vp = Viewport::fit_equal(style.plot.plot_area(), bounds(&xs), bounds(&ys));
        Self {
            cam,
            vp,
            stems,
            reach,
            z_scale,
        }
    }

    fn to_px(&self, p: [f64; 3]) -> Point {
        let (x, y) = self.cam.project(p);
        self.vp.to_px(x, y)
    }

    fn stem_top(&self, s: &Stem) -> [f64; 3] {
        [s.re, s.im, s.height * self.z_scale]
    }
}

fn floor_corners(reach: f64) -> [[f64; 3]; 4] {
    [
        [-reach, -reach, 0.0],
        [reach, -reach, 0.0],
        [reach, reach, 0.0],
        [-reach, reach, 0.0],
    ]
}

/// 3D stem plot of a DMD spectrum.
///
/// Each eigenvalue `mu` gets a stem from `(Re mu, Im mu, 0)` up to `|b|`, topped by a marker. A
/// dashed unit circle lies in the floor plane. All three axes share one scale unless
/// [`SpectrumPlotStyle::normalize_heights`] is set.
#[tracing::instrument(skip_all, fields(modes = spectrum.len()))]
pub fn render_spectrum(spectrum: &Spectrum, style: &SpectrumPlotStyle) -> ModevizResult<FrameRGBA> {
    spectrum.validate()?;
    let mut raster = style.plot.raster()?;
    let scene = SpectrumScene::new(spectrum, style);
    let reach = scene.reach;

    // Floor: outline and the two axes through the origin.
    let floor = floor_corners(reach);
    let mut outline: Vec<Point> = floor.iter().map(|&c| scene.to_px(c)).collect();
    outline.push(scene.to_px(floor[0]));
    raster.polyline(&outline, 1.0, FLOOR);
    raster.line(
        scene.to_px([-reach, 0.0, 0.0]),
        scene.to_px([reach, 0.0, 0.0]),
        1.0,
        FLOOR,
    );
    raster.line(
        scene.to_px([0.0, -reach, 0.0]),
        scene.to_px([0.0, reach, 0.0]),
        1.0,
        FLOOR,
    );

    let circle: Vec<Point> = (0..=100)
        .map(|k| {
            let th = std::f64::consts::TAU * f64::from(k) / 100.0;
            scene.to_px([th.cos(), th.sin(), 0.0])
        })
        .collect();
    raster.dashed_polyline(&circle, 1.5, 6.0, 4.0, CIRCLE);

    let mut order: Vec<&Stem> = scene.stems.iter().collect();
    order.sort_by(|a, b| {
        let da = scene.cam.depth([a.re, a.im, 0.0]);
        let db = scene.cam.depth([b.re, b.im, 0.0]);
        da.total_cmp(&db)
    });
    for s in order {
        let base = scene.to_px([s.re, s.im, 0.0]);
        let top = scene.to_px(scene.stem_top(s));
        raster.line(base, top, 2.0, STEM);
        raster.dot(top, 4.5, MARKER);
    }

    tracing::debug!(
        drawn = scene.stems.len(),
        skipped = spectrum.len() - scene.stems.len(),
        reach,
        z_scale = scene.z_scale,
        "spectrum plotted"
    );
    raster.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/spectrum.rs"]
mod tests;
