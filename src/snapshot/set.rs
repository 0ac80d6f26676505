use num_complex::Complex64;

use crate::foundation::error::{ModevizError, ModevizResult};
use crate::foundation::math::Extent;
use crate::snapshot::header::{SnapshotHeader, ValueKind};

/// One scalar channel of the stacked velocity field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    /// First half of each snapshot column.
    U,
    /// Second half of each snapshot column.
    V,
}

impl Component {
    /// Both components in storage order.
    pub const ALL: [Component; 2] = [Component::U, Component::V];

    /// Lowercase name, also used as the default scale family key.
    pub fn name(self) -> &'static str {
        match self {
            Self::U => "u",
            Self::V => "v",
        }
    }

    /// Row range of this component inside a snapshot column.
    pub fn rows(self, header: &SnapshotHeader) -> std::ops::Range<usize> {
        let n = header.points_per_component();
        match self {
            Self::U => 0..n,
            Self::V => n..2 * n,
        }
    }
}

/// Scalar projection used to color a (possibly complex) value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexPart {
    /// Real part.
    #[default]
    Real,
    /// Imaginary part.
    Imag,
    /// Modulus.
    Magnitude,
    /// Argument in radians, `(-pi, pi]`.
    Phase,
}

/// Element type of a snapshot set.
pub trait SnapshotScalar: Copy + std::fmt::Debug + PartialEq + Send + Sync + 'static {
    /// Value kind written to / read from files for this element type.
    const KIND: ValueKind;

    /// Reduce to one real number for coloring.
    fn project(self, part: ComplexPart) -> f64;
}

impl SnapshotScalar for f64 {
    const KIND: ValueKind = ValueKind::Real;

    fn project(self, part: ComplexPart) -> f64 {
        match part {
            ComplexPart::Real => self,
            ComplexPart::Imag => 0.0,
            ComplexPart::Magnitude => self.abs(),
            ComplexPart::Phase => {
                if self < 0.0 {
                    std::f64::consts::PI
                } else {
                    0.0
                }
            }
        }
    }
}

impl SnapshotScalar for Complex64 {
    const KIND: ValueKind = ValueKind::Complex;

    fn project(self, part: ComplexPart) -> f64 {
        match part {
            ComplexPart::Real => self.re,
            ComplexPart::Imag => self.im,
            ComplexPart::Magnitude => self.norm(),
            ComplexPart::Phase => self.arg(),
        }
    }
}

/// A `height x width` grid of one component at one time index, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ComponentGrid<T> {
    width: usize,
    height: usize,
    values: Vec<T>,
}

impl<T: Copy> ComponentGrid<T> {
    /// Wrap row-major `values`; the length must be `width * height`.
    pub fn from_row_major(width: usize, height: usize, values: Vec<T>) -> ModevizResult<Self> {
        if values.len() != width * height {
            return Err(ModevizError::validation(format!(
                "grid of {width}x{height} needs {} values, got {}",
                width * height,
                values.len()
            )));
        }
        Ok(Self {
            width,
            height,
            values,
        })
    }

    /// Columns (x extent).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Rows (y extent).
    pub fn height(&self) -> usize {
        self.height
    }

    /// Value at row `y`, column `x`.
    pub fn get(&self, y: usize, x: usize) -> Option<T> {
        if y >= self.height || x >= self.width {
            return None;
        }
        self.values.get(y * self.width + x).copied()
    }

    /// Iterate rows, each `width` long.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, T> {
        self.values.chunks_exact(self.width)
    }

    /// Flat row-major values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Apply `f` element-wise.
    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> ComponentGrid<U> {
        ComponentGrid {
            width: self.width,
            height: self.height,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }
}

/// Decoded snapshot payload: `points_per_snapshot` rows by `snapshot_count` columns.
///
/// Storage is column-major, one contiguous column per snapshot, which is also the file order.
/// Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSnapshotSet<T> {
    header: SnapshotHeader,
    data: Vec<T>,
}

impl<T: SnapshotScalar> FieldSnapshotSet<T> {
    /// Build from column-major `data`.
    pub fn from_columns(header: SnapshotHeader, data: Vec<T>) -> ModevizResult<Self> {
        header.validate("<snapshot set>")?;
        if data.len() != header.element_count() {
            return Err(ModevizError::validation(format!(
                "snapshot set with {header} needs {} values, got {}",
                header.element_count(),
                data.len()
            )));
        }
        Ok(Self { header, data })
    }

    /// Declared dimensions.
    pub fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    /// Rows per column.
    pub fn rows(&self) -> usize {
        self.header.points_per_snapshot()
    }

    /// Columns (time indices).
    pub fn columns(&self) -> usize {
        self.header.snapshot_count as usize
    }

    /// Element at (`row`, `column`).
    pub fn get(&self, row: usize, column: usize) -> Option<T> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        self.data.get(column * self.rows() + row).copied()
    }

    /// All rows of snapshot `t`.
    pub fn column(&self, t: usize) -> Option<&[T]> {
        let rows = self.rows();
        self.data.get(t * rows..(t + 1) * rows)
    }

    /// Flat column-major storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Raw rows of `kind` at time `t`, in row-major spatial order.
    pub fn component_slice(&self, kind: Component, t: usize) -> ModevizResult<&[T]> {
        let column = self.column(t).ok_or_else(|| {
            ModevizError::validation(format!(
                "time index {t} out of range for {} snapshots",
                self.columns()
            ))
        })?;
        Ok(&column[kind.rows(&self.header)])
    }

    /// Component `kind` at time `t` reshaped to `grid_height x grid_width`.
    ///
    /// This is the only place the U-then-V stacking convention is interpreted.
    pub fn component(&self, kind: Component, t: usize) -> ModevizResult<ComponentGrid<T>> {
        let values = self.component_slice(kind, t)?.to_vec();
        ComponentGrid::from_row_major(
            self.header.grid_width as usize,
            self.header.grid_height as usize,
            values,
        )
    }

    /// Min/max of the projected values of `kind` over every time index.
    pub fn component_extent(&self, kind: Component, part: ComplexPart) -> Extent {
        let rows = kind.rows(&self.header);
        self.data
            .chunks_exact(self.rows())
            .flat_map(|col| col[rows.clone()].iter())
            .map(|v| v.project(part))
            .collect()
    }

    /// Apply `f` element-wise, keeping dimensions.
    pub fn map<U: SnapshotScalar>(&self, f: impl Fn(T) -> U) -> FieldSnapshotSet<U> {
        FieldSnapshotSet {
            header: self.header,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl FieldSnapshotSet<Complex64> {
    /// Combine equal-shaped real and imaginary sets element-wise.
    pub fn from_parts(
        real: &FieldSnapshotSet<f64>,
        imag: &FieldSnapshotSet<f64>,
    ) -> ModevizResult<Self> {
        if real.header != imag.header {
            return Err(ModevizError::dimension_mismatch(format!(
                "real part has {}, imaginary part has {}",
                real.header, imag.header
            )));
        }
        let data = real
            .data
            .iter()
            .zip(imag.data.iter())
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect();
        Ok(Self {
            header: real.header,
            data,
        })
    }

    /// Real parts as a real set.
    pub fn real_part(&self) -> FieldSnapshotSet<f64> {
        self.map(|c| c.re)
    }

    /// Imaginary parts as a real set.
    pub fn imag_part(&self) -> FieldSnapshotSet<f64> {
        self.map(|c| c.im)
    }
}

/// Per-component value ranges, as logged after decoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SetSummary {
    /// Range of the U component.
    pub u: Option<(f64, f64)>,
    /// Range of the V component.
    pub v: Option<(f64, f64)>,
}

/// A decoded set of either value kind.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotSet {
    /// Real-valued set.
    Real(FieldSnapshotSet<f64>),
    /// Complex-valued set.
    Complex(FieldSnapshotSet<Complex64>),
}

impl SnapshotSet {
    /// Declared dimensions.
    pub fn header(&self) -> &SnapshotHeader {
        match self {
            Self::Real(s) => s.header(),
            Self::Complex(s) => s.header(),
        }
    }

    /// Element type.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Real(_) => ValueKind::Real,
            Self::Complex(_) => ValueKind::Complex,
        }
    }

    /// Projected component grid at time `t`.
    pub fn projected_component(
        &self,
        kind: Component,
        t: usize,
        part: ComplexPart,
    ) -> ModevizResult<ComponentGrid<f64>> {
        Ok(match self {
            Self::Real(s) => s.component(kind, t)?.map(|v| v.project(part)),
            Self::Complex(s) => s.component(kind, t)?.map(|v| v.project(part)),
        })
    }

    /// Projected min/max of `kind` over every time index.
    pub fn component_extent(&self, kind: Component, part: ComplexPart) -> Extent {
        match self {
            Self::Real(s) => s.component_extent(kind, part),
            Self::Complex(s) => s.component_extent(kind, part),
        }
    }

    /// Per-component ranges of the `part` projection.
    pub fn summary(&self, part: ComplexPart) -> SetSummary {
        SetSummary {
            u: self.component_extent(Component::U, part).bounds(),
            v: self.component_extent(Component::V, part).bounds(),
        }
    }
}

impl From<FieldSnapshotSet<f64>> for SnapshotSet {
    fn from(s: FieldSnapshotSet<f64>) -> Self {
        Self::Real(s)
    }
}

impl From<FieldSnapshotSet<Complex64>> for SnapshotSet {
    fn from(s: FieldSnapshotSet<Complex64>) -> Self {
        Self::Complex(s)
    }
}

/// A snapshot set plus the label panels refer to it by.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSet {
    /// Unique label within one comparison.
    pub label: String,
    /// Decoded data.
    pub set: SnapshotSet,
}

impl LabeledSet {
    /// Pair a label with a set.
    pub fn new(label: impl Into<String>, set: impl Into<SnapshotSet>) -> Self {
        Self {
            label: label.into(),
            set: set.into(),
        }
    }
}

/// Check every set shares the first set's grid and snapshot count and return those dimensions.
pub fn ensure_same_dims<'a>(
    sets: impl IntoIterator<Item = &'a LabeledSet>,
) -> ModevizResult<SnapshotHeader> {
    let mut iter = sets.into_iter();
    let first = iter
        .next()
        .ok_or_else(|| ModevizError::empty_series("<no snapshot sets>"))?;
    let dims = *first.set.header();
    for other in iter {
        let h = other.set.header();
        if !h.same_dims(&dims) {
            return Err(ModevizError::dimension_mismatch(format!(
                "'{}' has {dims} but '{}' has {h}",
                first.label, other.label
            )));
        }
    }
    Ok(dims)
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/set.rs"]
mod tests;
