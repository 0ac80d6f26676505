use num_complex::Complex64;

use super::*;
use crate::foundation::error::ModevizError;

fn count(frame: &FrameRGBA, pred: impl Fn([u8; 4]) -> bool) -> usize {
    frame
        .data
        .chunks_exact(4)
        .filter(|px| pred([px[0], px[1], px[2], px[3]]))
        .count()
}

fn is_marker(px: [u8; 4]) -> bool {
    px[0] > 190 && px[1] < 80 && px[2] < 80
}

fn sample_spectrum() -> Spectrum {
    Spectrum::new(
        vec![
            Complex64::new(0.95, 0.31),
            Complex64::new(0.95, -0.31),
            Complex64::new(0.5, 0.0),
        ],
        vec![
            Complex64::new(2.0, 0.0),
            Complex64::new(2.0, 0.0),
            Complex64::new(0.0, 0.5),
        ],
    )
    .unwrap()
}

#[test]
fn renders_markers_and_circle_on_white() {
    let style = SpectrumPlotStyle::default();
    let frame = render_spectrum(&sample_spectrum(), &style).unwrap();
    assert_eq!((frame.width, frame.height), (800, 700));
    assert_eq!(frame.pixel(0, 0), Some([255, 255, 255, 255]));
    assert!(count(&frame, is_marker) > 50);
    // unit circle and floor lines darken some pixels
    assert!(count(&frame, |px| px[0] < 200 && px[1] < 200 && px[2] < 200) > 100);
}

#[test]
fn stems_stay_inside_the_canvas() {
    let far = Spectrum::new(
        vec![Complex64::new(5.0, -4.0)],
        vec![Complex64::new(1e6, 0.0)],
    )
    .unwrap();
    let frame = render_spectrum(&far, &SpectrumPlotStyle::default()).unwrap();
    let markers = count(&frame, is_marker);
    assert!(markers > 20, "marker clipped: {markers}");
}

#[test]
fn invalid_spectrum_is_rejected_before_drawing() {
    let bad = Spectrum {
        eigenvalues: vec![Complex64::new(1.0, 0.0)],
        amplitudes: vec![],
    };
    assert!(matches!(
        render_spectrum(&bad, &SpectrumPlotStyle::default()),
        Err(ModevizError::DimensionMismatch(_))
    ));
}

#[test]
fn non_finite_modes_are_skipped() {
    let s = Spectrum::new(
        vec![Complex64::new(f64::NAN, 0.0), Complex64::new(0.5, 0.5)],
        vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)],
    )
    .unwrap();
    let frame = render_spectrum(&s, &SpectrumPlotStyle::default()).unwrap();
    assert!(count(&frame, is_marker) > 20);
}

fn pixel_height(scene: &SpectrumScene, re: f64, im: f64, z: f64) -> f64 {
    scene.to_px([re, im, 0.0]).y - scene.to_px([re, im, z]).y
}

#[test]
fn stem_heights_share_the_floor_scale() {
    let s = Spectrum::new(
        vec![Complex64::new(0.8, 0.2), Complex64::new(-0.5, 0.4)],
        vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 3.0)],
    )
    .unwrap();
    let scene = SpectrumScene::new(&s, &SpectrumPlotStyle::default());
    let unit = &scene.stems[0];
    let top = scene.stem_top(unit);
    assert_eq!(top, [0.8, 0.2, 1.0]);
    assert!((scene.to_px(top).y - scene.to_px([0.8, 0.2, 1.0]).y).abs() < 1e-9);

    // |b| = 3 is drawn three times as tall as |b| = 1.
    let tall = pixel_height(&scene, -0.5, 0.4, scene.stem_top(&scene.stems[1])[2]);
    let short = pixel_height(&scene, 0.8, 0.2, top[2]);
    assert!((tall / short - 3.0).abs() < 1e-9, "{tall} vs {short}");
}

#[test]
fn normalized_heights_are_opt_in() {
    let s = Spectrum::new(
        vec![Complex64::new(0.5, 0.0), Complex64::new(0.0, 0.5)],
        vec![Complex64::new(1.0, 0.0), Complex64::new(1000.0, 0.0)],
    )
    .unwrap();
    let style = SpectrumPlotStyle {
        normalize_heights: true,
        ..SpectrumPlotStyle::default()
    };
    let scene = SpectrumScene::new(&s, &style);
    assert!((scene.stem_top(&scene.stems[1])[2] - scene.reach).abs() < 1e-9);
    assert!(scene.stem_top(&scene.stems[0])[2] < scene.reach / 100.0);

    let plain = SpectrumScene::new(&s, &SpectrumPlotStyle::default());
    assert_eq!(plain.stem_top(&plain.stems[1])[2], 1000.0);
}
