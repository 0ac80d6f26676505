use std::ffi::OsString;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

use crate::encode::sink::{FrameGate, FrameSink, SinkConfig};
use crate::encode::{ensure_parent_dir, flatten_premul_over_bg_to_opaque_rgba8};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ModevizError, ModevizResult};
use crate::render::frame::FrameRGBA;

/// Options for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkOpts {
    /// Target `.mp4` file.
    pub out_path: PathBuf,
    /// Replace `out_path` if it exists; otherwise `begin` fails.
    pub overwrite: bool,
    /// Straight-alpha color the frames are composited over.
    pub bg_rgba: [u8; 4],
}

impl FfmpegSinkOpts {
    /// Overwriting MP4 output to `out_path` on black.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            bg_rgba: [0, 0, 0, 255],
        }
    }
}

/// A running `ffmpeg` child reading raw frames on stdin.
struct Encoder {
    child: Child,
    stdin: Option<ChildStdin>,
    stderr: Option<JoinHandle<std::io::Result<Vec<u8>>>>,
}

impl Encoder {
    fn spawn(args: Vec<OsString>) -> ModevizResult<Self> {
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ModevizError::evaluation(format!("could not start ffmpeg: {e}")))?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(ModevizError::evaluation("ffmpeg stdin was not captured"));
        };
        // ffmpeg blocks if its stderr pipe fills up.
        let stderr = child.stderr.take().map(|mut pipe| {
            std::thread::spawn(move || -> std::io::Result<Vec<u8>> {
                let mut buf = Vec::new();
                pipe.read_to_end(&mut buf)?;
                Ok(buf)
            })
        });
        Ok(Self {
            child,
            stdin: Some(stdin),
            stderr,
        })
    }

    fn write(&mut self, bytes: &[u8]) -> ModevizResult<()> {
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| ModevizError::evaluation("ffmpeg input already closed"))?;
        stdin
            .write_all(bytes)
            .map_err(|e| ModevizError::evaluation(format!("ffmpeg stopped reading frames: {e}")))
    }

    /// Close stdin, wait for exit, return the status and captured stderr.
    fn finish(mut self) -> ModevizResult<(ExitStatus, String)> {
        drop(self.stdin.take());
        let status = self
            .child
            .wait()
            .map_err(|e| ModevizError::evaluation(format!("waiting for ffmpeg failed: {e}")))?;
        let log = match self.stderr.take() {
            Some(h) => h
                .join()
                .map_err(|_| ModevizError::evaluation("ffmpeg stderr reader panicked"))?
                .map_err(|e| ModevizError::evaluation(format!("reading ffmpeg stderr: {e}")))?,
            None => Vec::new(),
        };
        Ok((status, String::from_utf8_lossy(&log).trim().to_owned()))
    }

    fn abort(mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Command line for raw RGBA frames in, H.264/yuv420p MP4 out.
fn encoder_args(cfg: SinkConfig, out: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push("-s".into());
    args.push(format!("{}x{}", cfg.width, cfg.height).into());
    // Input rate must precede `-i`.
    args.push("-r".into());
    args.push(format!("{}/{}", cfg.fps.num, cfg.fps.den).into());
    args.extend(
        [
            "-i",
            "pipe:0",
            "-an",
            "-c:v",
            "libx264",
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
            "-f",
            "mp4",
        ]
        .iter()
        .map(OsString::from),
    );
    args.push(out.as_os_str().to_owned());
    args
}

/// MP4 sink backed by the system `ffmpeg`.
///
/// Frames go to `<out>.partial`, which is renamed onto `out_path` only after `ffmpeg` exits
/// cleanly. Dropping the sink before `end` kills the encoder and removes the partial file.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,
    gate: FrameGate,
    encoder: Option<Encoder>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    /// Sink with `opts`; nothing is spawned until `begin`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            gate: FrameGate::default(),
            encoder: None,
            opaque: Vec::new(),
        }
    }

    fn partial_path(&self) -> PathBuf {
        let mut name = self.opts.out_path.clone().into_os_string();
        name.push(".partial");
        PathBuf::from(name)
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> ModevizResult<()> {
        self.gate.begin(cfg)?;
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(ModevizError::validation(format!(
                "mp4 frames must have even width and height, got {}x{}",
                cfg.width, cfg.height
            )));
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(ModevizError::validation(format!(
                "'{}' exists and overwrite is off",
                self.opts.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(ModevizError::evaluation(
                "mp4 output needs `ffmpeg` on PATH",
            ));
        }
        ensure_parent_dir(&self.opts.out_path)?;

        let encoder = Encoder::spawn(encoder_args(cfg, &self.partial_path()))?;
        tracing::debug!(width = cfg.width, height = cfg.height, fps = cfg.fps.as_f64(), "ffmpeg started");
        self.opaque = vec![0u8; cfg.canvas().rgba_len()];
        self.encoder = Some(encoder);
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> ModevizResult<()> {
        self.gate.admit(idx, frame)?;
        flatten_premul_over_bg_to_opaque_rgba8(&mut self.opaque, &frame.data, self.opts.bg_rgba)?;
        self.encoder
            .as_mut()
            .ok_or_else(|| ModevizError::evaluation("ffmpeg sink is not running"))?
            .write(&self.opaque)
    }

    fn end(&mut self) -> ModevizResult<()> {
        self.gate.finish()?;
        let encoder = self
            .encoder
            .take()
            .ok_or_else(|| ModevizError::evaluation("ffmpeg sink is not running"))?;
        let (status, log) = encoder.finish()?;

        let partial = self.partial_path();
        if !status.success() {
            let _ = std::fs::remove_file(&partial);
            return Err(ModevizError::evaluation(format!(
                "ffmpeg failed ({status}): {log}"
            )));
        }
        std::fs::rename(&partial, &self.opts.out_path).map_err(|e| {
            ModevizError::evaluation(format!(
                "could not rename '{}' to '{}': {e}",
                partial.display(),
                self.opts.out_path.display()
            ))
        })?;
        tracing::info!(path = %self.opts.out_path.display(), "wrote mp4");
        Ok(())
    }
}

impl Drop for FfmpegSink {
    fn drop(&mut self) {
        if let Some(encoder) = self.encoder.take() {
            encoder.abort();
            let _ = std::fs::remove_file(self.partial_path());
        }
    }
}

/// `true` when `ffmpeg -version` runs successfully.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success())
}
