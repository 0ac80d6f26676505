pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate one 8-bit channel; `t` is clamped to `[0, 1]`.
pub(crate) fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
    lerp(f64::from(a), f64::from(b), t.clamp(0.0, 1.0))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Running min/max over finite samples; NaN and infinities are skipped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Extent {
    bounds: Option<(f64, f64)>,
}

impl Extent {
    /// Empty extent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one sample into the extent.
    pub fn observe(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        self.bounds = Some(match self.bounds {
            None => (v, v),
            Some((lo, hi)) => (lo.min(v), hi.max(v)),
        });
    }

    /// Fold another extent into this one.
    pub fn merge(&mut self, other: Extent) {
        if let Some((lo, hi)) = other.bounds {
            self.observe(lo);
            self.observe(hi);
        }
    }

    /// `(min, max)` of everything observed, or `None` when no finite sample was seen.
    pub fn bounds(self) -> Option<(f64, f64)> {
        self.bounds
    }
}

impl FromIterator<f64> for Extent {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut e = Extent::new();
        for v in iter {
            e.observe(v);
        }
        e
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
