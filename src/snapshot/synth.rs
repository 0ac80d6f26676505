use std::f64::consts::PI;

use crate::foundation::error::{ModevizError, ModevizResult};
use crate::snapshot::header::SnapshotHeader;
use crate::snapshot::set::FieldSnapshotSet;

/// Generate a Taylor-Green-like velocity field sampled on `[0, 2pi]^2`.
///
/// `u = sin(x) cos(y + tau)`, `v = -cos(x) sin(y + tau)`, with `tau` sweeping `[0, 2pi]` over the
/// snapshots. With `include_growth` each snapshot is scaled by `exp(0.1 tau) + exp(-0.05 tau)`,
/// which gives DMD a growing and a decaying mode to find.
pub fn generate_velocity_field(
    nx: u32,
    ny: u32,
    snapshots: u32,
    include_growth: bool,
) -> ModevizResult<FieldSnapshotSet<f64>> {
    if nx < 2 || ny < 2 || snapshots < 2 {
        return Err(ModevizError::validation(format!(
            "synthetic field needs nx, ny, snapshots >= 2 (got {nx}, {ny}, {snapshots})"
        )));
    }
    let header = SnapshotHeader::new(nx, ny, snapshots)?;
    let n = header.points_per_component();
    let (w, h) = (nx as usize, ny as usize);

    let mut data = vec![0.0f64; header.element_count()];
    for (t, column) in data.chunks_exact_mut(header.points_per_snapshot()).enumerate() {
        let tau = t as f64 * 2.0 * PI / f64::from(snapshots - 1);
        let scale = if include_growth {
            (0.1 * tau).exp() + (-0.05 * tau).exp()
        } else {
            1.0
        };

        let (u, v) = column.split_at_mut(n);
        for j in 0..h {
            let y = j as f64 * 2.0 * PI / (h - 1) as f64;
            for i in 0..w {
                let x = i as f64 * 2.0 * PI / (w - 1) as f64;
                u[i + j * w] = x.sin() * (y + tau).cos() * scale;
                v[i + j * w] = -x.cos() * (y + tau).sin() * scale;
            }
        }
    }

    FieldSnapshotSet::from_columns(header, data)
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/synth.rs"]
mod tests;
