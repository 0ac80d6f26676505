use kurbo::{Point, Rect};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::foundation::math::Extent;
use crate::render::frame::FrameRGBA;
use crate::render::plot::{PlotStyle, Viewport, outline};

/// Point marker shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    /// Filled disc.
    #[default]
    Circle,
    /// Filled square.
    Square,
}

/// One singular-value curve, plotted against index `1..=values.len()`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecaySeries {
    /// Name used in errors and logs.
    pub label: String,
    /// Singular values in index order.
    pub values: Vec<f64>,
    /// Line and marker color.
    pub color: Rgba8,
    /// Marker drawn at every value.
    #[serde(default)]
    pub marker: Marker,
}

/// Curves plus an optional dashed horizontal asymptote.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DecayPlot {
    /// Curves, drawn in order.
    pub series: Vec<DecaySeries>,
    /// Height of the dashed reference line.
    #[serde(default)]
    pub asymptote: Option<f64>,
}

impl DecayPlot {
    /// At least one series, none empty.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.series.is_empty() {
            return Err(ModevizError::empty_series("<decay plot>"));
        }
        for s in &self.series {
            if s.values.is_empty() {
                return Err(ModevizError::empty_series(s.label.clone()));
            }
        }
        if self.asymptote.is_some_and(|a| !a.is_finite()) {
            return Err(ModevizError::validation("asymptote must be finite"));
        }
        Ok(())
    }
}

/// Asymptote of the "decays to a constant" reference curve.
pub const REFERENCE_FLOOR: f64 = 0.1;

/// The two illustrative curves: `exp(-0.3 i)` decaying to zero and `exp(-0.2 i) + 0.1`
/// decaying to a constant, for `i = 1..=n`.
pub fn reference_decay_plot(n: usize) -> DecayPlot {
    let xs = || (1..=n).map(|i| i as f64);
    DecayPlot {
        series: vec![
            DecaySeries {
                label: "converge to zero".to_owned(),
                values: xs().map(|x| (-0.3 * x).exp()).collect(),
                color: Rgba8::rgb(31, 119, 180),
                marker: Marker::Circle,
            },
            DecaySeries {
                label: "converge to constant".to_owned(),
                values: xs().map(|x| (-0.2 * x).exp() + REFERENCE_FLOOR).collect(),
                color: Rgba8::rgb(214, 39, 40),
                marker: Marker::Square,
            },
        ],
        asymptote: Some(REFERENCE_FLOOR),
    }
}

const AXIS: Rgba8 = Rgba8::rgb(60, 60, 60);
const GRID: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 0,
    a: 32,
};
const ASYMPTOTE: Rgba8 = Rgba8 {
    r: 128,
    g: 128,
    b: 128,
    a: 150,
};
const GRID_LINES: usize = 5;

/// Line-and-marker plot of singular values against their index.
#[tracing::instrument(skip_all, fields(series = plot.series.len()))]
pub fn render_decay(plot: &DecayPlot, style: &PlotStyle) -> ModevizResult<FrameRGBA> {
    plot.validate()?;
    let mut raster = style.raster()?;

    let n_max = plot
        .series
        .iter()
        .map(|s| s.values.len())
        .max()
        .unwrap_or(1);
    let mut ys: Extent = plot
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .collect();
    ys.observe(0.0);
    if let Some(a) = plot.asymptote {
        ys.observe(a);
    }
    let (y_lo, y_hi) = ys.bounds().unwrap_or((0.0, 1.0));
    let pad = 0.05 * (y_hi - y_lo);
    let area = style.plot_area();
    let vp = Viewport::new(
        area,
        (0.5, n_max as f64 + 0.5),
        (y_lo - pad, y_hi + pad),
    );

    let (x0, x1) = vp.x_range();
    let (v0, v1) = vp.y_range();
    for k in 0..=GRID_LINES {
        let f = k as f64 / GRID_LINES as f64;
        let gx = vp.to_px(x0 + f * (x1 - x0), v0).x;
        let gy = vp.to_px(x0, v0 + f * (v1 - v0)).y;
        raster.line(Point::new(gx, area.y0), Point::new(gx, area.y1), 1.0, GRID);
        raster.line(Point::new(area.x0, gy), Point::new(area.x1, gy), 1.0, GRID);
    }
    outline(&mut raster, area, 1.5, AXIS);

    if let Some(a) = plot.asymptote {
        let y = vp.to_px(x0, a).y;
        raster.dashed_polyline(
            &[Point::new(area.x0, y), Point::new(area.x1, y)],
            1.5,
            8.0,
            5.0,
            ASYMPTOTE,
        );
    }

    for s in &plot.series {
        let points: Vec<Point> = s
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| vp.to_px((i + 1) as f64, v))
            .collect();
        raster.polyline(&points, 2.0, s.color);
        for &p in &points {
            match s.marker {
                Marker::Circle => raster.dot(p, 4.0, s.color),
                Marker::Square => {
                    raster.fill_rect(Rect::new(p.x - 3.5, p.y - 3.5, p.x + 3.5, p.y + 3.5), s.color)
                }
            }
        }
    }

    raster.finish()
}

#[cfg(test)]
#[path = "../../tests/unit/render/decay.rs"]
mod tests;
