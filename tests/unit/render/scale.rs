use num_complex::Complex64;
use proptest::prelude::*;

use super::*;
use crate::render::layout::Panel;
use crate::snapshot::header::SnapshotHeader;
use crate::snapshot::set::{ComplexPart, Component, FieldSnapshotSet};

fn real_set(nx: u32, ny: u32, n: u32, data: Vec<f64>) -> FieldSnapshotSet<f64> {
    let h = SnapshotHeader::new(nx, ny, n).unwrap();
    FieldSnapshotSet::from_columns(h, data).unwrap()
}

/// Column `t` holds U = `t + 1`, V = `-(t + 1) * 10` at every point.
fn stepped(label: &str, offset: f64) -> LabeledSet {
    let (nx, ny, n) = (2u32, 2u32, 3u32);
    let mut data = Vec::new();
    for t in 0..n {
        let u = f64::from(t) + 1.0 + offset;
        data.extend(std::iter::repeat_n(u, 4));
        data.extend(std::iter::repeat_n(-u * 10.0, 4));
    }
    LabeledSet::new(label, real_set(nx, ny, n, data))
}

#[test]
fn families_default_to_components_across_sets() {
    let sets = vec![stepped("a", 0.0), stepped("b", 2.0)];
    let layout = PanelLayout::velocity_comparison(&["a", "b"]);

    let scales = compute_global_scales(&sets, &layout, ScaleMode::MinMax).unwrap();
    assert_eq!(scales.len(), 2);

    let u = scales.get("u").unwrap();
    assert_eq!((u.min(), u.max()), (1.0, 5.0));
    let v = scales.get("v").unwrap();
    assert_eq!((v.min(), v.max()), (-50.0, -10.0));

    let sym = compute_global_scales(&sets, &layout, ScaleMode::Symmetric).unwrap();
    let v = sym.get("v").unwrap();
    assert_eq!((v.min(), v.max()), (-50.0, 50.0));
}

#[test]
fn explicit_family_pools_components() {
    let sets = vec![stepped("a", 0.0)];
    let layout = PanelLayout {
        columns: 2,
        panels: vec![
            Panel::new("a", Component::U).with_family("all"),
            Panel::new("a", Component::V).with_family("all"),
        ],
    };
    let scales = compute_global_scales(&sets, &layout, ScaleMode::MinMax).unwrap();
    let names: Vec<&str> = scales.iter().map(|(k, _)| k).collect();
    assert_eq!(names, vec!["all"]);
    let all = scales.get("all").unwrap();
    assert_eq!((all.min(), all.max()), (-30.0, 3.0));
}

#[test]
fn unknown_label_is_a_validation_error() {
    let sets = vec![stepped("a", 0.0)];
    let layout = PanelLayout::velocity_comparison(&["a", "missing"]);
    assert!(matches!(
        compute_global_scales(&sets, &layout, ScaleMode::Symmetric),
        Err(ModevizError::Validation(msg)) if msg.contains("missing")
    ));
}

#[test]
fn all_zero_field_gets_nonzero_width() {
    let sets = vec![LabeledSet::new("z", real_set(2, 2, 3, vec![0.0; 24]))];
    let layout = PanelLayout::velocity_comparison(&["z"]);
    for mode in [ScaleMode::Symmetric, ScaleMode::MinMax] {
        let scales = compute_global_scales(&sets, &layout, mode).unwrap();
        for (_, s) in scales.iter() {
            assert!(s.width() > 0.0);
        }
    }
}

#[test]
fn non_finite_values_are_ignored() {
    let mut data = vec![1.0; 8];
    data[0] = f64::NAN;
    data[1] = f64::INFINITY;
    data[2] = -2.0;
    let sets = vec![LabeledSet::new("a", real_set(2, 2, 1, data))];
    let layout = PanelLayout::velocity_comparison(&["a"]);
    let u = *compute_global_scales(&sets, &layout, ScaleMode::MinMax)
        .unwrap()
        .get("u")
        .unwrap();
    assert_eq!((u.min(), u.max()), (-2.0, 1.0));
}

#[test]
fn complex_panels_use_their_projection() {
    let h = SnapshotHeader::new(1, 1, 1).unwrap();
    let set = FieldSnapshotSet::from_columns(
        h,
        vec![Complex64::new(3.0, -4.0), Complex64::new(0.0, 1.0)],
    )
    .unwrap();
    let sets = vec![LabeledSet::new("c", set)];
    let layout = PanelLayout {
        columns: 1,
        panels: vec![
            Panel::new("c", Component::U)
                .with_part(ComplexPart::Magnitude)
                .with_family("mag"),
            Panel::new("c", Component::U).with_family("re"),
        ],
    };
    let scales = compute_global_scales(&sets, &layout, ScaleMode::Symmetric).unwrap();
    assert_eq!(scales.get("mag").unwrap().max(), 5.0);
    assert_eq!(scales.get("re").unwrap().max(), 3.0);
}

proptest! {
    #[test]
    fn scales_ignore_time_column_order(
        values in proptest::collection::vec(-1e6f64..1e6, 8 * 4),
        rotate in 0usize..4,
        sym in any::<bool>(),
    ) {
        let mode = if sym { ScaleMode::Symmetric } else { ScaleMode::MinMax };
        let columns: Vec<&[f64]> = values.chunks(8).collect();
        let mut permuted = columns.clone();
        permuted.rotate_left(rotate);
        permuted.swap(0, 3);

        let a = real_set(2, 2, 4, columns.concat());
        let b = real_set(2, 2, 4, permuted.concat());
        let layout = PanelLayout::velocity_comparison(&["x"]);

        let sa = compute_global_scales(&[LabeledSet::new("x", a)], &layout, mode).unwrap();
        let sb = compute_global_scales(&[LabeledSet::new("x", b)], &layout, mode).unwrap();
        prop_assert_eq!(sa, sb);
    }
}
