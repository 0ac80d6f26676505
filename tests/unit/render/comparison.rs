use num_complex::Complex64;

use super::*;
use crate::encode::sink::InMemorySink;
use crate::render::layout::Panel;
use crate::snapshot::set::{ComplexPart, Component, FieldSnapshotSet};

fn set(nx: u32, ny: u32, n: u32, f: impl Fn(usize) -> f64) -> FieldSnapshotSet<f64> {
    let h = SnapshotHeader::new(nx, ny, n).unwrap();
    let data = (0..h.element_count()).map(f).collect();
    FieldSnapshotSet::from_columns(h, data).unwrap()
}

fn style(cell_px: u32, scale_mode: ScaleMode) -> RenderStyle {
    RenderStyle {
        cell_px,
        scale_mode,
        ..RenderStyle::default()
    }
}

fn rgb(c: Rgba8) -> [u8; 4] {
    [c.r, c.g, c.b, 255]
}

#[test]
fn mismatched_snapshot_counts_fail_before_rendering() {
    let sets = vec![
        LabeledSet::new("a", set(4, 4, 10, |i| i as f64)),
        LabeledSet::new("b", set(4, 4, 8, |i| i as f64)),
    ];
    let layout = PanelLayout::velocity_comparison(&["a", "b"]);
    let err = ComparisonRenderer::new(&sets, layout, RenderStyle::default()).unwrap_err();
    assert!(matches!(err, ModevizError::DimensionMismatch(_)), "{err}");
}

#[test]
fn unknown_and_duplicate_labels_are_rejected() {
    let sets = vec![LabeledSet::new("a", set(2, 2, 2, |i| i as f64))];
    let err = ComparisonRenderer::new(
        &sets,
        PanelLayout::velocity_comparison(&["a", "nope"]),
        RenderStyle::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModevizError::Validation(_)));

    let dup = vec![
        LabeledSet::new("a", set(2, 2, 2, |i| i as f64)),
        LabeledSet::new("a", set(2, 2, 2, |i| -(i as f64))),
    ];
    let err = ComparisonRenderer::new(
        &dup,
        PanelLayout::velocity_comparison(&["a"]),
        RenderStyle::default(),
    )
    .unwrap_err();
    assert!(matches!(err, ModevizError::Validation(_)));
}

#[test]
fn empty_inputs_are_empty_series() {
    let none: Vec<LabeledSet> = Vec::new();
    assert!(matches!(
        ComparisonRenderer::new(
            &none,
            PanelLayout::velocity_comparison(&["a"]),
            RenderStyle::default()
        ),
        Err(ModevizError::EmptySeries(_))
    ));

    let sets = vec![LabeledSet::new("a", set(2, 2, 2, |i| i as f64))];
    let layout = PanelLayout {
        columns: 1,
        panels: vec![],
    };
    assert!(matches!(
        ComparisonRenderer::new(&sets, layout, RenderStyle::default()),
        Err(ModevizError::EmptySeries(_))
    ));
}

#[test]
fn zero_cell_size_is_rejected() {
    let sets = vec![LabeledSet::new("a", set(2, 2, 2, |i| i as f64))];
    assert!(matches!(
        ComparisonRenderer::new(
            &sets,
            PanelLayout::velocity_comparison(&["a"]),
            style(0, ScaleMode::Symmetric)
        ),
        Err(ModevizError::Validation(_))
    ));
}

#[test]
fn frames_are_pushed_once_per_snapshot_in_order() {
    let sets = vec![
        LabeledSet::new("orig", set(3, 2, 5, |i| (i as f64).sin())),
        LabeledSet::new("rank2", set(3, 2, 5, |i| (i as f64).cos())),
    ];
    let r = ComparisonRenderer::new(
        &sets,
        PanelLayout::velocity_comparison(&["orig", "rank2"]),
        style(4, ScaleMode::Symmetric),
    )
    .unwrap();

    let mut sink = InMemorySink::new();
    let stats = r.render_to_sink(&mut sink, Fps::new(5, 1).unwrap()).unwrap();
    assert_eq!(stats.frames_pushed, 5);
    assert_eq!(stats.snapshot_count, 5);
    assert!(sink.is_ended());

    let cfg = sink.config().unwrap();
    assert_eq!(cfg.frame_count, 5);
    assert_eq!(cfg.fps, Fps::new(5, 1).unwrap());
    assert_eq!((cfg.width, cfg.height), (stats.width, stats.height));
    assert_eq!(cfg.width % 2, 0);
    assert_eq!(cfg.height % 2, 0);

    let indices: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    assert_ne!(sink.frames()[0].1, sink.frames()[1].1);
}

#[test]
fn static_render_keeps_only_the_final_frame() {
    let sets = vec![LabeledSet::new("a", set(2, 2, 4, |i| i as f64))];
    let r = ComparisonRenderer::new(
        &sets,
        PanelLayout::velocity_comparison(&["a"]),
        RenderStyle::default(),
    )
    .unwrap();
    let mut sink = InMemorySink::new();
    let stats = r.render_final_to_sink(&mut sink).unwrap();
    assert_eq!(stats.frames_pushed, 1);
    assert_eq!(sink.frames().len(), 1);
    assert_eq!(sink.frames()[0].0, FrameIndex(3));
    assert_eq!(sink.frames()[0].1, r.render_frame(3).unwrap());
}

#[test]
fn render_frame_is_deterministic_and_bounded() {
    let sets = vec![LabeledSet::new("a", set(2, 2, 2, |i| i as f64))];
    let r = ComparisonRenderer::new(
        &sets,
        PanelLayout::velocity_comparison(&["a"]),
        RenderStyle::default(),
    )
    .unwrap();
    assert_eq!(r.render_frame(1).unwrap(), r.render_frame(1).unwrap());
    assert!(matches!(
        r.render_frame(2),
        Err(ModevizError::Evaluation(_))
    ));
}

#[test]
fn heatmap_draws_row_zero_at_the_bottom() {
    // U = [[1, 2], [3, 4]], V = [[5, 6], [7, 8]].
    let sets = vec![LabeledSet::new("a", set(2, 2, 1, |i| (i + 1) as f64))];
    let layout = PanelLayout::velocity_comparison(&["a"]);
    let geometry = FrameGeometry::new(2, 2, &layout, 4).unwrap();
    let r = ComparisonRenderer::new(&sets, layout, style(4, ScaleMode::MinMax)).unwrap();
    let frame = r.render_frame(0).unwrap();

    let u = geometry.heatmap_rect(0).unwrap();
    let bottom_left = frame.pixel(u.x0 as u32 + 1, u.y1 as u32 - 2).unwrap();
    let top_right = frame.pixel(u.x1 as u32 - 2, u.y0 as u32 + 1).unwrap();
    assert_eq!(bottom_left, rgb(Colormap::RdBu.sample(0.0)));
    assert_eq!(top_right, rgb(Colormap::RdBu.sample(1.0)));

    let v = geometry.heatmap_rect(1).unwrap();
    assert_eq!(
        frame.pixel(v.x0 as u32 + 1, v.y1 as u32 - 2).unwrap(),
        rgb(Colormap::RdBu.sample(0.0))
    );
}

#[test]
fn shared_scale_colors_equal_values_equally_across_sets() {
    let sets = vec![
        LabeledSet::new("a", set(2, 2, 2, |_| 1.0)),
        LabeledSet::new("b", set(2, 2, 2, |i| if i < 8 { 1.0 } else { -1.0 })),
    ];
    let layout = PanelLayout::velocity_comparison(&["a", "b"]);
    let geometry = FrameGeometry::new(2, 2, &layout, 4).unwrap();
    let r = ComparisonRenderer::new(&sets, layout, RenderStyle::default()).unwrap();
    let u = r.scales().get("u").unwrap();
    assert_eq!((u.min(), u.max()), (-1.0, 1.0));

    let frame = r.render_frame(0).unwrap();
    let a_u = geometry.heatmap_rect(0).unwrap();
    let b_u = geometry.heatmap_rect(1).unwrap();
    let pa = frame.pixel(a_u.x0 as u32 + 1, a_u.y0 as u32 + 1).unwrap();
    let pb = frame.pixel(b_u.x0 as u32 + 1, b_u.y0 as u32 + 1).unwrap();
    assert_eq!(pa, pb);
    assert_eq!(pa, rgb(Colormap::RdBu.sample(1.0)));
}

#[test]
fn complex_panel_renders_requested_part() {
    let h = SnapshotHeader::new(1, 1, 1).unwrap();
    let c = FieldSnapshotSet::from_columns(
        h,
        vec![Complex64::new(0.0, 2.0), Complex64::new(0.0, -2.0)],
    )
    .unwrap();
    let sets = vec![LabeledSet::new("c", c)];
    let layout = PanelLayout {
        columns: 2,
        panels: vec![
            Panel::new("c", Component::U).with_part(ComplexPart::Imag),
            Panel::new("c", Component::V).with_part(ComplexPart::Imag),
        ],
    };
    let geometry = FrameGeometry::new(1, 1, &layout, 4).unwrap();
    let r = ComparisonRenderer::new(&sets, layout, RenderStyle::default()).unwrap();
    let frame = r.render_frame(0).unwrap();

    let u = geometry.heatmap_rect(0).unwrap();
    let v = geometry.heatmap_rect(1).unwrap();
    assert_eq!(
        frame.pixel(u.x0 as u32 + 1, u.y0 as u32 + 1).unwrap(),
        rgb(Colormap::RdBu.sample(1.0))
    );
    assert_eq!(
        frame.pixel(v.x0 as u32 + 1, v.y0 as u32 + 1).unwrap(),
        rgb(Colormap::RdBu.sample(0.0))
    );
}

#[test]
fn oversized_frame_fails_before_the_sink_starts() {
    let sets = vec![LabeledSet::new("wide", set(9000, 2, 1, |i| i as f64))];
    let layout = PanelLayout::velocity_comparison(&["wide"]);
    let err = ComparisonRenderer::new(&sets, layout, style(8, ScaleMode::Symmetric)).unwrap_err();
    assert!(matches!(err, ModevizError::Validation(_)), "{err}");
}
