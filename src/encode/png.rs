use std::path::{Path, PathBuf};

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::encode::{flatten_premul_over_bg_to_opaque_rgba8, write_atomically};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::frame::FrameRGBA;

/// Sink that keeps only the most recent frame and writes it as a PNG in `end`.
///
/// Used for static comparisons, where the final time step stands for the whole run.
pub struct PngSink {
    out_path: PathBuf,
    bg_rgba: [u8; 4],
    gate: FrameGate,
    last: Option<FrameRGBA>,
}

impl PngSink {
    /// Create a sink writing to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>, bg_rgba: [u8; 4]) -> Self {
        Self {
            out_path: out_path.into(),
            bg_rgba,
            gate: FrameGate::default(),
            last: None,
        }
    }
}

impl FrameSink for PngSink {
    fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()> {
        self.gate.begin(cfg)?;
        self.last = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<()> {
        self.gate.admit(idx, frame)?;
        self.last = Some(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> ModevizResult<()> {
        self.gate.finish()?;
        let frame = self
            .last
            .take()
            .ok_or_else(|| ModevizError::empty_series(self.out_path.display().to_string()))?;
        write_png(&self.out_path, &frame, self.bg_rgba)
    }
}

/// Encode `frame` as an opaque PNG at `path`.
pub fn write_png(path: &Path, frame: &FrameRGBA, bg_rgba: [u8; 4]) -> ModevizResult<()> {
    let mut opaque = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        flatten_premul_over_bg_to_opaque_rgba8(&mut opaque, &frame.data, bg_rgba)?;
    } else {
        opaque.copy_from_slice(&frame.data);
    }

    let mut encoded = std::io::Cursor::new(Vec::new());
    image::write_buffer_with_format(
        &mut encoded,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| ModevizError::evaluation(format!("png encoding failed: {e}")))?;

    write_atomically(path, encoded.get_ref())?;
    tracing::info!(path = %path.display(), width = frame.width, height = frame.height, "wrote png");
    Ok(())
}
