//! JSON run description for a comparison render.
//!
//! ```json
//! {
//!   "inputs": [
//!     { "label": "original", "path": "flow.bin", "kind": "real" },
//!     { "label": "rank 5", "path": "pod_rank5.bin", "kind": "real" }
//!   ],
//!   "style": { "cell_px": 6, "scale_mode": "symmetric" },
//!   "output": { "path": "out/compare.gif", "fps": { "num": 10, "den": 1 } }
//! }
//! ```
//!
//! `layout` may be omitted, in which case every input gets one column with U above V. Relative
//! paths are resolved against the directory holding the config file.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::foundation::core::Fps;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::comparison::RenderStyle;
use crate::render::layout::PanelLayout;
use crate::snapshot::header::ValueKind;

/// One snapshot file and the label panels use for it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputSpec {
    /// Unique label.
    pub label: String,
    /// Snapshot file.
    pub path: PathBuf,
    /// Element type to decode the file as.
    pub kind: ValueKind,
}

/// Output artifact type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Final frame only.
    Png,
    /// Looping animation.
    Gif,
    /// H.264 video through the system `ffmpeg`.
    Mp4,
}

impl OutputFormat {
    /// Guess from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "mp4" => Some(Self::Mp4),
            _ => None,
        }
    }

    /// `true` for formats that hold every frame.
    pub fn is_animated(self) -> bool {
        !matches!(self, Self::Png)
    }
}

/// Where and how to write the result.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSpec {
    /// Output file.
    pub path: PathBuf,
    /// Explicit format; inferred from the extension when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// Playback rate for animated formats.
    #[serde(default)]
    pub fps: Fps,
    /// Replace an existing MP4 instead of failing.
    #[serde(default)]
    pub overwrite: bool,
}

impl OutputSpec {
    /// Explicit format, else the one implied by the extension.
    pub fn resolved_format(&self) -> ModevizResult<OutputFormat> {
        self.format
            .or_else(|| OutputFormat::from_path(&self.path))
            .ok_or_else(|| {
                ModevizError::validation(format!(
                    "cannot infer output format from '{}' (use png, gif or mp4)",
                    self.path.display()
                ))
            })
    }
}

/// A full comparison run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Files to decode, in column order for the default layout.
    pub inputs: Vec<InputSpec>,
    /// Panel arrangement; defaults to [`PanelLayout::velocity_comparison`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<PanelLayout>,
    /// Cell size, scale mode and colors.
    #[serde(default)]
    pub style: RenderStyle,
    /// Output artifact.
    pub output: OutputSpec,
}

impl RunConfig {
    /// Parse from a JSON reader. Paths are kept as written.
    pub fn from_reader<R: std::io::Read>(r: R) -> ModevizResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ModevizError::validation(format!("parse run config JSON: {e}")))
    }

    /// Parse a JSON file and resolve relative paths against its directory.
    pub fn from_path(path: impl AsRef<Path>) -> ModevizResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ModevizError::validation(format!("open run config '{}': {e}", path.display()))
        })?;
        let mut cfg = Self::from_reader(BufReader::new(f))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        cfg.resolve_paths(base);
        Ok(cfg)
    }

    /// Make every relative input and output path relative to `base` instead.
    pub fn resolve_paths(&mut self, base: &Path) {
        for input in &mut self.inputs {
            if input.path.is_relative() {
                input.path = base.join(&input.path);
            }
        }
        if self.output.path.is_relative() {
            self.output.path = base.join(&self.output.path);
        }
    }

    /// Explicit layout, or one column per input with U above V.
    pub fn layout(&self) -> PanelLayout {
        self.layout.clone().unwrap_or_else(|| {
            let labels: Vec<&str> = self.inputs.iter().map(|i| i.label.as_str()).collect();
            PanelLayout::velocity_comparison(&labels)
        })
    }

    /// Check everything that can be checked without reading the inputs.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.inputs.is_empty() {
            return Err(ModevizError::empty_series("<run config inputs>"));
        }
        let mut labels = HashSet::new();
        for input in &self.inputs {
            if input.label.trim().is_empty() {
                return Err(ModevizError::validation("input label must be non-empty"));
            }
            if !labels.insert(input.label.as_str()) {
                return Err(ModevizError::validation(format!(
                    "duplicate input label '{}'",
                    input.label
                )));
            }
        }

        let layout = self.layout();
        layout.validate()?;
        for panel in &layout.panels {
            if !labels.contains(panel.set.as_str()) {
                return Err(ModevizError::validation(format!(
                    "panel refers to unknown input '{}'",
                    panel.set
                )));
            }
        }

        self.style.validate()?;
        self.output.fps.validate()?;
        self.output.resolved_format()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
