use kurbo::Rect;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::snapshot::set::{ComplexPart, Component};

/// One heatmap slot: which set, which component, how it is projected and scaled.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Panel {
    /// Label of the [`LabeledSet`](crate::LabeledSet) shown here.
    pub set: String,
    /// Velocity component.
    pub component: Component,
    /// Explicit scale family; panels without one share the family named after their component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Projection applied to complex values.
    #[serde(default)]
    pub part: ComplexPart,
}

impl Panel {
    /// Panel with the default family and projection.
    pub fn new(set: impl Into<String>, component: Component) -> Self {
        Self {
            set: set.into(),
            component,
            family: None,
            part: ComplexPart::default(),
        }
    }

    /// Builder: put the panel in an explicit scale family.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }

    /// Builder: choose the complex projection.
    pub fn with_part(mut self, part: ComplexPart) -> Self {
        self.part = part;
        self
    }

    /// Key of the scale family this panel belongs to.
    pub fn family_key(&self) -> &str {
        self.family.as_deref().unwrap_or(self.component.name())
    }
}

/// Panels placed row-major into a fixed number of columns.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PanelLayout {
    /// Panels per row.
    pub columns: u32,
    /// Panels in row-major order.
    pub panels: Vec<Panel>,
}

impl PanelLayout {
    /// Two rows (U on top, V below) with one column per label.
    pub fn velocity_comparison<S: AsRef<str>>(labels: &[S]) -> Self {
        let panels = Component::ALL
            .iter()
            .flat_map(|&c| labels.iter().map(move |l| Panel::new(l.as_ref(), c)))
            .collect();
        Self {
            columns: labels.len() as u32,
            panels,
        }
    }

    /// Reject zero columns, an empty panel list and blank labels.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.columns == 0 {
            return Err(ModevizError::validation("layout columns must be > 0"));
        }
        if self.panels.is_empty() {
            return Err(ModevizError::empty_series("<panel layout>"));
        }
        for (i, p) in self.panels.iter().enumerate() {
            if p.set.trim().is_empty() {
                return Err(ModevizError::validation(format!(
                    "panel {i} has an empty set label"
                )));
            }
            if p.family.as_deref().is_some_and(|f| f.trim().is_empty()) {
                return Err(ModevizError::validation(format!(
                    "panel {i} has an empty scale family"
                )));
            }
        }
        Ok(())
    }

    /// Number of rows needed to hold every panel.
    pub fn rows(&self) -> u32 {
        if self.columns == 0 {
            return 0;
        }
        (self.panels.len() as u32).div_ceil(self.columns)
    }

    /// `(row, column)` of panel `i`.
    pub fn cell_of(&self, i: usize) -> (u32, u32) {
        let cols = self.columns.max(1) as usize;
        ((i / cols) as u32, (i % cols) as u32)
    }
}

pub(crate) const MARGIN: u32 = 12;
pub(crate) const HEADER_H: u32 = 24;
pub(crate) const PANEL_GAP: u32 = 12;
pub(crate) const BAR_GAP: u32 = 4;
pub(crate) const BAR_W: u32 = 10;

/// Pixel geometry of a comparison frame.
///
/// ```text
/// +-------------------------------------------------+
/// | 12/49  [=========progress=========            ] |  header
/// | [heatmap][bar]  [heatmap][bar]  [heatmap][bar]  |  row 0
/// | [heatmap][bar]  [heatmap][bar]  [heatmap][bar]  |  row 1
/// +-------------------------------------------------+
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FrameGeometry {
    canvas: Canvas,
    heat_w: u32,
    heat_h: u32,
    cell_px: u32,
    slots: Vec<(u32, u32)>,
}

impl FrameGeometry {
    /// Lay out `layout` for `grid_width x grid_height` grids drawn at `cell_px` per grid cell.
    pub fn new(
        grid_width: u32,
        grid_height: u32,
        layout: &PanelLayout,
        cell_px: u32,
    ) -> ModevizResult<Self> {
        layout.validate()?;
        if cell_px == 0 {
            return Err(ModevizError::validation("cell_px must be > 0"));
        }
        let too_big = || ModevizError::validation("comparison frame is too large to render");

        let heat_w = grid_width.checked_mul(cell_px).ok_or_else(too_big)?;
        let heat_h = grid_height.checked_mul(cell_px).ok_or_else(too_big)?;
        let slot_w = heat_w
            .checked_add(BAR_GAP + BAR_W + PANEL_GAP)
            .ok_or_else(too_big)?;
        let slot_h = heat_h.checked_add(PANEL_GAP).ok_or_else(too_big)?;

        let width = slot_w
            .checked_mul(layout.columns)
            .and_then(|w| w.checked_add(2 * MARGIN))
            .and_then(|w| w.checked_sub(PANEL_GAP))
            .ok_or_else(too_big)?;
        let height = slot_h
            .checked_mul(layout.rows())
            .and_then(|h| h.checked_add(2 * MARGIN + HEADER_H))
            .and_then(|h| h.checked_sub(PANEL_GAP))
            .ok_or_else(too_big)?;

        let slots = (0..layout.panels.len())
            .map(|i| {
                let (row, col) = layout.cell_of(i);
                (MARGIN + col * slot_w, MARGIN + HEADER_H + row * slot_h)
            })
            .collect();

        let canvas = Canvas { width, height }.even();
        let limit = u32::from(u16::MAX);
        if canvas.width > limit || canvas.height > limit {
            return Err(ModevizError::validation(format!(
                "comparison frame {}x{} exceeds the {limit}x{limit} raster limit",
                canvas.width, canvas.height
            )));
        }

        Ok(Self {
            canvas,
            heat_w,
            heat_h,
            cell_px,
            slots,
        })
    }

    /// Output size, rounded up to even dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Pixels per grid cell.
    pub fn cell_px(&self) -> u32 {
        self.cell_px
    }

    /// Strip above the panels holding the time annotation.
    pub fn header_rect(&self) -> Rect {
        Rect::new(
            f64::from(MARGIN),
            f64::from(MARGIN / 2),
            f64::from(self.canvas.width - MARGIN),
            f64::from(MARGIN / 2 + HEADER_H - 4),
        )
    }

    /// Heatmap area of panel `i`.
    pub fn heatmap_rect(&self, i: usize) -> Option<Rect> {
        let &(x, y) = self.slots.get(i)?;
        Some(Rect::new(
            f64::from(x),
            f64::from(y),
            f64::from(x + self.heat_w),
            f64::from(y + self.heat_h),
        ))
    }

    /// Color bar beside panel `i`.
    pub fn colorbar_rect(&self, i: usize) -> Option<Rect> {
        let &(x, y) = self.slots.get(i)?;
        let x0 = x + self.heat_w + BAR_GAP;
        Some(Rect::new(
            f64::from(x0),
            f64::from(y),
            f64::from(x0 + BAR_W),
            f64::from(y + self.heat_h),
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
