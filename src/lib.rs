//! modeviz renders snapshot data from POD/DMD reduced-order models.
//!
//! - Decode binary snapshot files into typed [`SnapshotSet`]s
//! - Compare several sets side by side with [`ComparisonRenderer`], one frame per time step, using
//!   color scales shared across the whole run
//! - Plot a DMD spectrum in 3D and singular-value decay curves
//! - Stream frames into a [`FrameSink`] (PNG, GIF, MP4)
//!
//! [`run_comparison`] drives the whole thing from a JSON [`RunConfig`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Run description files.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Decode, render and encode in one call.
pub mod pipeline;
/// Rasterization of comparisons and plots.
pub mod render;
/// Snapshot files and sets.
pub mod snapshot;
/// DMD spectrum tables.
pub mod spectrum;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use crate::foundation::error::{ModevizError, ModevizResult};
pub use crate::foundation::math::Extent;

pub use crate::config::{InputSpec, OutputFormat, OutputSpec, RunConfig};
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::gif::{GifSink, GifSinkOpts};
pub use crate::encode::png::PngSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::pipeline::run_comparison;
pub use crate::render::colormap::{ColorScale, Colormap, ScaleMode};
pub use crate::render::comparison::{ComparisonRenderer, RenderStats, RenderStyle};
pub use crate::render::frame::FrameRGBA;
pub use crate::render::layout::{Panel, PanelLayout};
pub use crate::render::scale::{GlobalScales, compute_global_scales};
pub use crate::snapshot::decode::{decode_bytes, decode_path};
pub use crate::snapshot::header::{SnapshotHeader, ValueKind};
pub use crate::snapshot::set::{
    Component, ComplexPart, ComponentGrid, FieldSnapshotSet, LabeledSet, SnapshotSet,
};
pub use crate::spectrum::Spectrum;
