use crate::foundation::core::Rgba8;
use crate::foundation::math::{Extent, lerp_u8};

/// Smallest half-width a color range may have.
pub const MIN_HALF_WIDTH: f64 = 1e-12;

/// How a family's observed extent becomes a color range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// `[-vmax, vmax]` with `vmax = max(|min|, |max|)`; zero sits at the colormap center.
    #[default]
    Symmetric,
    /// `[min, max]` as observed.
    MinMax,
}

/// A closed value range mapped onto a colormap. Never zero-width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    /// Build a range from an observed extent.
    ///
    /// A degenerate extent (`min == max`, or nothing finite observed) is widened to a symmetric
    /// band of [`MIN_HALF_WIDTH`] (or a relative epsilon for large magnitudes) around its value.
    pub fn from_extent(extent: Extent, mode: ScaleMode) -> Self {
        let (lo, hi) = extent.bounds().unwrap_or((0.0, 0.0));
        let (lo, hi) = match mode {
            ScaleMode::Symmetric => {
                let vmax = lo.abs().max(hi.abs());
                (-vmax, vmax)
            }
            ScaleMode::MinMax => (lo, hi),
        };

        if hi > lo {
            return Self { min: lo, max: hi };
        }
        let center = 0.5 * lo + 0.5 * hi;
        let half = MIN_HALF_WIDTH.max(center.abs() * 1e-9);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `max - min`, always positive; `+inf` when the bounds span more than `f64::MAX`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Half of `max - min`, finite for any finite bounds.
    fn half_width(&self) -> f64 {
        0.5 * self.max - 0.5 * self.min
    }

    /// Position of `v` in `[0, 1]`, clamped; `None` for non-finite values.
    pub fn normalize(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        Some(((0.5 * v - 0.5 * self.min) / self.half_width()).clamp(0.0, 1.0))
    }
}

/// Color used for NaN and infinite samples.
pub const BAD_VALUE_COLOR: Rgba8 = Rgba8::rgb(128, 128, 128);

/// Diverging colormap, low values red and high values blue, white at the center.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Colormap {
    /// ColorBrewer RdBu (11 classes), interpolated linearly.
    #[default]
    RdBu,
}

const RDBU: [[u8; 3]; 11] = [
    [0x67, 0x00, 0x1f],
    [0xb2, 0x18, 0x2b],
    [0xd6, 0x60, 0x4d],
    [0xf4, 0xa5, 0x82],
    [0xfd, 0xdb, 0xc7],
    [0xf7, 0xf7, 0xf7],
    [0xd1, 0xe5, 0xf0],
    [0x92, 0xc5, 0xde],
    [0x43, 0x93, 0xc3],
    [0x21, 0x66, 0xac],
    [0x05, 0x30, 0x61],
];

impl Colormap {
    /// Color at position `t` in `[0, 1]` (clamped).
    pub fn sample(self, t: f64) -> Rgba8 {
        let stops = match self {
            Self::RdBu => &RDBU,
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let pos = t * (stops.len() - 1) as f64;
        let i = (pos.floor() as usize).min(stops.len() - 2);
        let f = pos - i as f64;
        let (a, b) = (stops[i], stops[i + 1]);
        Rgba8::rgb(
            lerp_u8(a[0], b[0], f),
            lerp_u8(a[1], b[1], f),
            lerp_u8(a[2], b[2], f),
        )
    }

    /// Color of `v` under `scale`.
    pub fn color_for(self, scale: &ColorScale, v: f64) -> Rgba8 {
        match scale.normalize(v) {
            Some(t) => self.sample(t),
            None => BAD_VALUE_COLOR,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/colormap.rs"]
mod tests;
