use crate::foundation::core::{Canvas, Fps, FrameIndex};
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::frame::FrameRGBA;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Playback rate for animated outputs.
    pub fps: Fps,
    /// Number of frames that will be pushed.
    pub frame_count: u64,
}

impl SinkConfig {
    /// Frame size as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }
}

/// Sink contract for consuming rendered frames in time order.
///
/// Ordering contract: `push_frame` is called in strictly increasing `FrameIndex` order.
pub trait FrameSink {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()>;
    /// Push one frame in strictly increasing time order.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> ModevizResult<()>;
}

/// Rejects out-of-order frames and frames of the wrong size.
#[derive(Debug, Default)]
pub(crate) struct FrameGate {
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FrameGate {
    pub(crate) fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()> {
        cfg.fps.validate()?;
        if cfg.width == 0 || cfg.height == 0 {
            return Err(ModevizError::validation(
                "sink width/height must be non-zero",
            ));
        }
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    pub(crate) fn admit(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<SinkConfig> {
        let cfg = self
            .cfg
            .ok_or_else(|| ModevizError::evaluation("sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(ModevizError::evaluation(format!(
                "sink received out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(ModevizError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }
        if frame.data.len() != cfg.canvas().rgba_len() {
            return Err(ModevizError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        self.last_idx = Some(idx);
        Ok(cfg)
    }

    pub(crate) fn finish(&mut self) -> ModevizResult<SinkConfig> {
        self.cfg
            .take()
            .ok_or_else(|| ModevizError::evaluation("sink not started"))
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, FrameRGBA)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[(FrameIndex, FrameRGBA)] {
        &self.frames
    }

    /// Whether `end` was called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<()> {
        self.frames.push((idx, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> ModevizResult<()> {
        self.ended = true;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
