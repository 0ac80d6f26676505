use std::collections::HashSet;

use kurbo::{Point, Rect};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::colormap::{ColorScale, Colormap, ScaleMode};
use crate::render::frame::FrameRGBA;
use crate::render::layout::{FrameGeometry, PanelLayout};
use crate::render::raster::{Raster, seven_segment_width};
use crate::render::scale::{GlobalScales, compute_global_scales};
use crate::snapshot::header::SnapshotHeader;
use crate::snapshot::set::{LabeledSet, ensure_same_dims};

/// Visual settings of a comparison render.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Pixels per grid cell.
    pub cell_px: u32,
    /// How family extents become color ranges.
    pub scale_mode: ScaleMode,
    /// Colormap for heatmaps and color bars.
    pub colormap: Colormap,
    /// Straight-alpha background.
    pub bg_rgba: [u8; 4],
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            cell_px: 8,
            scale_mode: ScaleMode::default(),
            colormap: Colormap::default(),
            bg_rgba: [18, 20, 28, 255],
        }
    }
}

impl RenderStyle {
    /// Reject a zero cell size or a translucent background.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.cell_px == 0 {
            return Err(ModevizError::validation("style.cell_px must be > 0"));
        }
        if self.bg_rgba[3] != 255 {
            return Err(ModevizError::validation("style.bg_rgba must be opaque"));
        }
        Ok(())
    }
}

/// Counters reported after a render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames handed to the sink.
    pub frames_pushed: u64,
    /// Time steps available in the data.
    pub snapshot_count: u64,
    /// Frame size.
    pub width: u32,
    /// Frame size.
    pub height: u32,
}

const TEXT: Rgba8 = Rgba8::rgb(220, 224, 232);
const TRACK: Rgba8 = Rgba8::rgb(52, 56, 68);
const ZERO_TICK: Rgba8 = Rgba8::rgb(150, 154, 166);

/// Renders side-by-side heatmaps of several snapshot sets, one frame per time index.
///
/// Construction does all validation and the full-data scale pass. After that every frame is a
/// pure function of `t`.
pub struct ComparisonRenderer<'a> {
    sets: Vec<&'a LabeledSet>,
    layout: PanelLayout,
    style: RenderStyle,
    header: SnapshotHeader,
    geometry: FrameGeometry,
    scales: GlobalScales,
}

impl std::fmt::Debug for ComparisonRenderer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparisonRenderer")
            .field("header", &self.header)
            .field("panels", &self.layout.panels.len())
            .field("canvas", &self.geometry.canvas())
            .finish_non_exhaustive()
    }
}

impl<'a> ComparisonRenderer<'a> {
    /// Validate inputs and compute the global color scales.
    ///
    /// Fails with `DimensionMismatch` when sets disagree on grid size or snapshot count, with
    /// `EmptySeries` for an empty layout or no sets, and with `Validation` for unknown or
    /// duplicated labels and bad style values.
    #[tracing::instrument(skip_all, fields(sets = sets.len(), panels = layout.panels.len()))]
    pub fn new(
        sets: &'a [LabeledSet],
        layout: PanelLayout,
        style: RenderStyle,
    ) -> ModevizResult<Self> {
        layout.validate()?;
        style.validate()?;
        let header = ensure_same_dims(sets)?;

        let mut seen = HashSet::new();
        for s in sets {
            if !seen.insert(s.label.as_str()) {
                return Err(ModevizError::validation(format!(
                    "duplicate set label '{}'",
                    s.label
                )));
            }
        }

        let panel_sets = layout
            .panels
            .iter()
            .map(|p| {
                sets.iter().find(|s| s.label == p.set).ok_or_else(|| {
                    ModevizError::validation(format!("panel refers to unknown set '{}'", p.set))
                })
            })
            .collect::<ModevizResult<Vec<_>>>()?;

        let geometry = FrameGeometry::new(
            header.grid_width,
            header.grid_height,
            &layout,
            style.cell_px,
        )?;
        let scales = compute_global_scales(sets, &layout, style.scale_mode)?;

        tracing::debug!(%header, canvas = ?geometry.canvas(), families = scales.len(), "comparison ready");
        Ok(Self {
            sets: panel_sets,
            layout,
            style,
            header,
            geometry,
            scales,
        })
    }

    /// One frame per snapshot.
    pub fn frame_count(&self) -> u64 {
        u64::from(self.header.snapshot_count)
    }

    /// Shared dimensions of every input set.
    pub fn header(&self) -> &SnapshotHeader {
        &self.header
    }

    /// Frame size (even in both dimensions).
    pub fn canvas(&self) -> Canvas {
        self.geometry.canvas()
    }

    /// Precomputed per-family color ranges.
    pub fn scales(&self) -> &GlobalScales {
        &self.scales
    }

    /// Draw every panel at time index `t`.
    pub fn render_frame(&self, t: u64) -> ModevizResult<FrameRGBA> {
        if t >= self.frame_count() {
            return Err(ModevizError::evaluation(format!(
                "time index {t} out of range for {} snapshots",
                self.frame_count()
            )));
        }
        let ti = t as usize;
        let mut raster = Raster::new(
            self.geometry.canvas(),
            Rgba8::from_array(self.style.bg_rgba),
        )?;

        self.draw_time_annotation(&mut raster, t);

        for (i, (panel, labeled)) in self.layout.panels.iter().zip(&self.sets).enumerate() {
            let scale = self.scales.get(panel.family_key()).ok_or_else(|| {
                ModevizError::evaluation(format!(
                    "no color scale for family '{}'",
                    panel.family_key()
                ))
            })?;
            let heat = self
                .geometry
                .heatmap_rect(i)
                .ok_or_else(|| ModevizError::evaluation("panel outside frame geometry"))?;
            let bar = self
                .geometry
                .colorbar_rect(i)
                .ok_or_else(|| ModevizError::evaluation("panel outside frame geometry"))?;

            let grid = labeled
                .set
                .projected_component(panel.component, ti, panel.part)?;
            let cell = f64::from(self.geometry.cell_px());
            let rows = grid.height();
            for (y, row) in grid.rows().enumerate() {
                // Grid row 0 sits at the bottom of the heatmap.
                let y0 = heat.y0 + ((rows - 1 - y) as f64) * cell;
                for (x, &v) in row.iter().enumerate() {
                    let x0 = heat.x0 + (x as f64) * cell;
                    raster.fill_rect(
                        Rect::new(x0, y0, x0 + cell, y0 + cell),
                        self.style.colormap.color_for(scale, v),
                    );
                }
            }

            self.draw_colorbar(&mut raster, bar, scale);
        }

        raster.finish()
    }

    /// Render `0..frame_count` in order into `sink`.
    #[tracing::instrument(skip_all, fields(frames = self.frame_count()))]
    pub fn render_to_sink(&self, sink: &mut dyn FrameSink, fps: Fps) -> ModevizResult<RenderStats> {
        self.drive(sink, fps, 0)
    }

    /// Render only the last time index into `sink`.
    #[tracing::instrument(skip_all)]
    pub fn render_final_to_sink(&self, sink: &mut dyn FrameSink) -> ModevizResult<RenderStats> {
        self.drive(sink, Fps::default(), self.frame_count().saturating_sub(1))
    }

    fn drive(&self, sink: &mut dyn FrameSink, fps: Fps, first: u64) -> ModevizResult<RenderStats> {
        let n = self.frame_count();
        if n == 0 {
            return Err(ModevizError::empty_series("<comparison>"));
        }
        let canvas = self.canvas();
        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps,
            frame_count: n - first,
        })?;

        let mut stats = RenderStats {
            snapshot_count: n,
            width: canvas.width,
            height: canvas.height,
            ..RenderStats::default()
        };
        for t in first..n {
            let frame = self.render_frame(t)?;
            sink.push_frame(FrameIndex(t), &frame)?;
            stats.frames_pushed += 1;
            tracing::trace!(t, "frame pushed");
        }
        sink.end()?;
        Ok(stats)
    }

    fn draw_time_annotation(&self, raster: &mut Raster, t: u64) {
        let area = self.geometry.header_rect();
        let n = self.frame_count();
        let digit_h = (area.height() - 4.0).max(6.0);
        let label = format!("{t}/{}", n.saturating_sub(1));
        let label_w = seven_segment_width(&label, digit_h);
        raster.seven_segment(&label, Point::new(area.x0, area.y0 + 2.0), digit_h, TEXT);

        let x0 = area.x0 + label_w + 12.0;
        if x0 + 8.0 >= area.x1 {
            return;
        }
        let mid = area.center().y;
        let track = Rect::new(x0, mid - 3.0, area.x1, mid + 3.0);
        raster.fill_rect(track, TRACK);
        let done = (t + 1) as f64 / n.max(1) as f64;
        raster.fill_rect(
            Rect::new(x0, track.y0, x0 + track.width() * done, track.y1),
            TEXT,
        );
    }

    fn draw_colorbar(&self, raster: &mut Raster, bar: Rect, scale: &ColorScale) {
        let steps = bar.height().round().max(1.0) as usize;
        let step_h = bar.height() / steps as f64;
        for k in 0..steps {
            let t = (k as f64 + 0.5) / steps as f64;
            let y1 = bar.y1 - (k as f64) * step_h;
            raster.fill_rect(
                Rect::new(bar.x0, y1 - step_h, bar.x1, y1),
                self.style.colormap.sample(t),
            );
        }
        if scale.min() <= 0.0 && scale.max() >= 0.0 {
            let zero = scale.normalize(0.0).unwrap_or(0.5);
            let y = (bar.y1 - zero * bar.height()).round();
            raster.fill_rect(Rect::new(bar.x1, y - 1.0, bar.x1 + 3.0, y), ZERO_TICK);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/comparison.rs"]
mod tests;
