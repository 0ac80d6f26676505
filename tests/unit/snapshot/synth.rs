use super::*;
use crate::snapshot::set::Component;

#[test]
fn rejects_degenerate_sampling() {
    assert!(generate_velocity_field(1, 4, 4, false).is_err());
    assert!(generate_velocity_field(4, 4, 1, false).is_err());
}

#[test]
fn first_snapshot_matches_closed_form() {
    let set = generate_velocity_field(5, 3, 4, false).unwrap();
    assert_eq!(set.header().grid_width, 5);
    assert_eq!(set.header().grid_height, 3);
    assert_eq!(set.columns(), 4);

    let u = set.component(Component::U, 0).unwrap();
    let v = set.component(Component::V, 0).unwrap();
    // x = pi/2 at i = 1, y = pi at j = 1.
    let x = PI / 2.0;
    let y = PI;
    assert!((u.get(1, 1).unwrap() - x.sin() * y.cos()).abs() < 1e-12);
    assert!((v.get(1, 1).unwrap() + x.cos() * y.sin()).abs() < 1e-12);
}

#[test]
fn last_snapshot_wraps_to_first_without_growth() {
    let set = generate_velocity_field(4, 4, 5, false).unwrap();
    let first = set.column(0).unwrap();
    let last = set.column(4).unwrap();
    for (a, b) in first.iter().zip(last) {
        assert!((a - b).abs() < 1e-9);
    }
}

#[test]
fn growth_scales_later_snapshots() {
    let flat = generate_velocity_field(4, 4, 5, false).unwrap();
    let grown = generate_velocity_field(4, 4, 5, true).unwrap();
    let tau = 2.0 * PI;
    let scale = (0.1 * tau).exp() + (-0.05 * tau).exp();
    for (a, b) in flat.column(4).unwrap().iter().zip(grown.column(4).unwrap()) {
        assert!((a * scale - b).abs() < 1e-9);
    }
}
