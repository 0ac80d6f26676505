//! Encoding sinks.
//!
//! Sinks consume rendered frames in time order and produce the output artifact.

use std::path::Path;

use crate::foundation::error::{ModevizError, ModevizResult};
use crate::foundation::math::mul_div255_u16;

/// `ffmpeg`-based MP4 sink (system `ffmpeg`).
pub mod ffmpeg;
/// Looping GIF sink.
pub mod gif;
/// Final-frame PNG sink.
pub mod png;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ModevizResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Flatten premultiplied RGBA8 over an opaque background color.
pub(crate) fn flatten_premul_over_bg_to_opaque_rgba8(
    dst: &mut [u8],
    src_premul: &[u8],
    bg_rgba: [u8; 4],
) -> ModevizResult<()> {
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(ModevizError::validation(
            "flatten_premul_over_bg_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(s);
            continue;
        }

        let inv = 255u16 - a;
        let r = s[0] as u16 + mul_div255_u16(bg_r, inv);
        let g = s[1] as u16 + mul_div255_u16(bg_g, inv);
        let b = s[2] as u16 + mul_div255_u16(bg_b, inv);

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

/// Write `bytes` to `path` via a sibling `.partial` file; `path` only ever holds a complete file.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> ModevizResult<()> {
    use anyhow::Context as _;

    ensure_parent_dir(path)?;
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| {
            ModevizError::validation(format!("output path '{}' has no file name", path.display()))
        })?;
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes)
        .with_context(|| format!("failed to write '{}'", tmp.display()))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(anyhow::Error::new(e)
            .context(format!("failed to move output into '{}'", path.display()))
            .into());
    }
    Ok(())
}
