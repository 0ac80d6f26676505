use std::path::PathBuf;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::encode::{flatten_premul_over_bg_to_opaque_rgba8, write_atomically};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::frame::FrameRGBA;

/// Options for [`GifSink`].
#[derive(Clone, Debug)]
pub struct GifSinkOpts {
    /// Output GIF path.
    pub out_path: PathBuf,
    /// Background color used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Encoder speed, 1 (best quality) to 30 (fastest).
    pub speed: i32,
}

impl GifSinkOpts {
    /// Create options for outputting a GIF to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            bg_rgba: [0, 0, 0, 255],
            speed: 10,
        }
    }
}

/// Sink producing an infinitely looping animated GIF at the configured frame rate.
///
/// Frames are buffered; the GIF is encoded and written only in `end`.
pub struct GifSink {
    opts: GifSinkOpts,
    gate: FrameGate,
    delay: Option<Delay>,
    frames: Vec<Frame>,
}

impl GifSink {
    /// Create a new GIF sink.
    pub fn new(opts: GifSinkOpts) -> Self {
        Self {
            opts,
            gate: FrameGate::default(),
            delay: None,
            frames: Vec::new(),
        }
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()> {
        self.gate.begin(cfg)?;
        if !(1..=30).contains(&self.opts.speed) {
            return Err(ModevizError::validation(
                "gif encoder speed must be in 1..=30",
            ));
        }

        // One frame lasts den/num seconds.
        self.delay = Some(Delay::from_numer_denom_ms(
            cfg.fps.den.saturating_mul(1000),
            cfg.fps.num,
        ));
        self.frames = Vec::with_capacity(cfg.frame_count.min(4096) as usize);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<()> {
        let cfg = self.gate.admit(idx, frame)?;
        let delay = self
            .delay
            .ok_or_else(|| ModevizError::evaluation("gif sink not started"))?;

        let mut opaque = vec![0u8; frame.data.len()];
        flatten_premul_over_bg_to_opaque_rgba8(&mut opaque, &frame.data, self.opts.bg_rgba)?;
        let img = RgbaImage::from_raw(cfg.width, cfg.height, opaque)
            .ok_or_else(|| ModevizError::evaluation("gif frame buffer has the wrong length"))?;
        self.frames.push(Frame::from_parts(img, 0, 0, delay));
        Ok(())
    }

    fn end(&mut self) -> ModevizResult<()> {
        let cfg = self.gate.finish()?;
        self.delay = None;
        let frames = std::mem::take(&mut self.frames);
        if frames.is_empty() {
            return Err(ModevizError::empty_series(
                self.opts.out_path.display().to_string(),
            ));
        }
        let count = frames.len();

        let mut encoded = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut encoded, self.opts.speed);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| ModevizError::evaluation(format!("gif encoder setup failed: {e}")))?;
            encoder
                .encode_frames(frames)
                .map_err(|e| ModevizError::evaluation(format!("gif encoding failed: {e}")))?;
        }

        write_atomically(&self.opts.out_path, &encoded)?;
        tracing::info!(
            path = %self.opts.out_path.display(),
            frames = count,
            duration_secs = cfg.fps.frames_to_secs(count as u64),
            bytes = encoded.len(),
            "wrote gif"
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
