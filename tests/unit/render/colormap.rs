use super::*;

fn extent(values: &[f64]) -> Extent {
    values.iter().copied().collect()
}

#[test]
fn symmetric_scale_uses_largest_magnitude() {
    let s = ColorScale::from_extent(extent(&[-0.5, 2.0]), ScaleMode::Symmetric);
    assert_eq!((s.min(), s.max()), (-2.0, 2.0));

    let s = ColorScale::from_extent(extent(&[-3.0, 1.0]), ScaleMode::Symmetric);
    assert_eq!((s.min(), s.max()), (-3.0, 3.0));
}

#[test]
fn min_max_scale_keeps_observed_bounds() {
    let s = ColorScale::from_extent(extent(&[1.0, 4.0, 2.5]), ScaleMode::MinMax);
    assert_eq!((s.min(), s.max()), (1.0, 4.0));
}

#[test]
fn all_zero_extent_is_widened() {
    for mode in [ScaleMode::Symmetric, ScaleMode::MinMax] {
        let s = ColorScale::from_extent(extent(&[0.0; 12]), mode);
        assert!(s.width() > 0.0);
        assert_eq!(s.min(), -s.max());
    }
}

#[test]
fn constant_nonzero_extent_is_widened_around_value() {
    let s = ColorScale::from_extent(extent(&[5.0, 5.0]), ScaleMode::MinMax);
    assert!(s.width() > 0.0);
    assert!(s.min() < 5.0 && s.max() > 5.0);
    assert!((0.5 * (s.min() + s.max()) - 5.0).abs() < 1e-12);
}

#[test]
fn huge_constant_extent_is_still_widened() {
    let s = ColorScale::from_extent(extent(&[1e300]), ScaleMode::MinMax);
    assert!(s.max() > s.min());
}

#[test]
fn empty_extent_falls_back_to_epsilon_band() {
    let s = ColorScale::from_extent(Extent::new(), ScaleMode::Symmetric);
    assert_eq!(s.min(), -MIN_HALF_WIDTH);
    assert_eq!(s.max(), MIN_HALF_WIDTH);
}

#[test]
fn normalize_clamps_and_rejects_nan() {
    let s = ColorScale::from_extent(extent(&[-1.0, 1.0]), ScaleMode::Symmetric);
    assert_eq!(s.normalize(0.0), Some(0.5));
    assert_eq!(s.normalize(10.0), Some(1.0));
    assert_eq!(s.normalize(-10.0), Some(0.0));
    assert_eq!(s.normalize(f64::NAN), None);
}

#[test]
fn rdbu_endpoints_and_center() {
    let cm = Colormap::RdBu;
    assert_eq!(cm.sample(0.0), Rgba8::rgb(0x67, 0x00, 0x1f));
    assert_eq!(cm.sample(0.5), Rgba8::rgb(0xf7, 0xf7, 0xf7));
    assert_eq!(cm.sample(1.0), Rgba8::rgb(0x05, 0x30, 0x61));
    assert_eq!(cm.sample(-3.0), cm.sample(0.0));
}

#[test]
fn color_for_marks_bad_values() {
    let s = ColorScale::from_extent(extent(&[-1.0, 1.0]), ScaleMode::Symmetric);
    assert_eq!(Colormap::RdBu.color_for(&s, f64::INFINITY), BAD_VALUE_COLOR);
    assert_eq!(Colormap::RdBu.color_for(&s, 0.0), Colormap::RdBu.sample(0.5));
}

#[test]
fn extreme_extent_still_spreads_values() {
    let s = ColorScale::from_extent(extent(&[-1e308, 1e308]), ScaleMode::Symmetric);
    assert_eq!(s.normalize(-1e308), Some(0.0));
    assert_eq!(s.normalize(0.0), Some(0.5));
    assert_eq!(s.normalize(1e308), Some(1.0));
    let quarter = s.normalize(-5e307).unwrap();
    assert!((quarter - 0.25).abs() < 1e-12);
}

#[test]
fn extreme_constant_extent_stays_finite() {
    let s = ColorScale::from_extent(extent(&[1e308]), ScaleMode::MinMax);
    assert!(s.min().is_finite() && s.max().is_finite());
    assert!(s.max() > s.min());
    let mid = s.normalize(1e308).unwrap();
    assert!((mid - 0.5).abs() < 1e-6);
}
