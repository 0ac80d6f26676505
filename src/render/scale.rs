use std::collections::BTreeMap;

use crate::foundation::error::{ModevizError, ModevizResult};
use crate::foundation::math::Extent;
use crate::render::colormap::{ColorScale, ScaleMode};
use crate::render::layout::PanelLayout;
use crate::snapshot::set::LabeledSet;

/// One color range per scale family, fixed before the first frame is drawn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlobalScales {
    by_family: BTreeMap<String, ColorScale>,
}

impl GlobalScales {
    /// Range of `family`, if any panel uses it.
    pub fn get(&self, family: &str) -> Option<&ColorScale> {
        self.by_family.get(family)
    }

    /// Families in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColorScale)> {
        self.by_family.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of families.
    pub fn len(&self) -> usize {
        self.by_family.len()
    }

    /// `true` when no family was computed.
    pub fn is_empty(&self) -> bool {
        self.by_family.is_empty()
    }
}

/// First pass: scan every time index of every set a panel shows and fold the values into one
/// extent per family.
///
/// Only min/max are kept, so the result does not depend on the order of snapshot columns.
#[tracing::instrument(skip_all, fields(panels = layout.panels.len(), ?mode))]
pub fn compute_global_scales(
    sets: &[LabeledSet],
    layout: &PanelLayout,
    mode: ScaleMode,
) -> ModevizResult<GlobalScales> {
    layout.validate()?;

    let mut extents: BTreeMap<String, Extent> = BTreeMap::new();
    for panel in &layout.panels {
        let labeled = sets
            .iter()
            .find(|s| s.label == panel.set)
            .ok_or_else(|| {
                ModevizError::validation(format!("panel refers to unknown set '{}'", panel.set))
            })?;
        let e = labeled.set.component_extent(panel.component, panel.part);
        extents
            .entry(panel.family_key().to_owned())
            .or_default()
            .merge(e);
    }

    let by_family = extents
        .into_iter()
        .map(|(family, extent)| {
            let scale = ColorScale::from_extent(extent, mode);
            tracing::debug!(
                family = %family,
                observed = ?extent.bounds(),
                min = scale.min(),
                max = scale.max(),
                "color scale"
            );
            (family, scale)
        })
        .collect();
    Ok(GlobalScales { by_family })
}

#[cfg(test)]
#[path = "../../tests/unit/render/scale.rs"]
mod tests;
