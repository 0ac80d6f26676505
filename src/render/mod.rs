//! Rasterization of comparison frames and static plots.
//!
//! All drawing goes through [`raster::Raster`], a thin wrapper over `vello_cpu`; frames come out as
//! premultiplied RGBA8.

/// Diverging colormap and value-to-color ranges.
pub mod colormap;
/// Multi-panel comparison renderer.
pub mod comparison;
/// Singular-value decay plot.
pub mod decay;
/// Frame buffer type.
pub mod frame;
/// Panel placement and frame geometry.
pub mod layout;
/// Shared plot canvas settings.
pub mod plot;
/// Drawing primitives.
pub mod raster;
/// Global per-family color scales.
pub mod scale;
/// 3D DMD spectrum plot.
pub mod spectrum;
