use std::path::Path;

use anyhow::Context as _;
use num_complex::Complex64;

use crate::foundation::error::{ModevizError, ModevizResult};
use crate::snapshot::header::{ELEMENT_LEN, HEADER_LEN, SnapshotHeader, ValueKind};
use crate::snapshot::set::{ComplexPart, FieldSnapshotSet, SnapshotSet};

/// Read and decode a snapshot file as `kind`.
///
/// The whole file is read in one pass; no handle outlives the call.
#[tracing::instrument(skip_all, fields(path = %path.display(), ?kind))]
pub fn decode_path(path: &Path, kind: ValueKind) -> ModevizResult<SnapshotSet> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read snapshot file '{}'", path.display()))?;
    let set = decode_bytes(&bytes, kind, &path.display().to_string())?;

    let summary = set.summary(ComplexPart::Real);
    tracing::debug!(
        dims = %set.header(),
        u_range = ?summary.u,
        v_range = ?summary.v,
        "decoded snapshot file"
    );
    Ok(set)
}

/// Decode an in-memory snapshot file. `source_name` identifies the buffer in errors.
pub fn decode_bytes(bytes: &[u8], kind: ValueKind, source_name: &str) -> ModevizResult<SnapshotSet> {
    Ok(match kind {
        ValueKind::Real => SnapshotSet::Real(decode_real(bytes, source_name)?),
        ValueKind::Complex => SnapshotSet::Complex(decode_complex(bytes, source_name)?),
    })
}

/// Decode a real-valued snapshot file.
pub fn decode_real(bytes: &[u8], source_name: &str) -> ModevizResult<FieldSnapshotSet<f64>> {
    let (header, payload) = split_checked(bytes, ValueKind::Real, source_name)?;
    FieldSnapshotSet::from_columns(header, read_f64_block(payload))
}

/// Decode a complex-valued snapshot file (real block, then imaginary block).
pub fn decode_complex(
    bytes: &[u8],
    source_name: &str,
) -> ModevizResult<FieldSnapshotSet<Complex64>> {
    let (header, payload) = split_checked(bytes, ValueKind::Complex, source_name)?;
    let (re_bytes, im_bytes) = payload.split_at(payload.len() / 2);
    let re = FieldSnapshotSet::from_columns(header, read_f64_block(re_bytes))?;
    let im = FieldSnapshotSet::from_columns(header, read_f64_block(im_bytes))?;
    FieldSnapshotSet::from_parts(&re, &im)
}

/// Parse the header and check the payload length matches it exactly.
fn split_checked<'a>(
    bytes: &'a [u8],
    kind: ValueKind,
    source_name: &str,
) -> ModevizResult<(SnapshotHeader, &'a [u8])> {
    let header = SnapshotHeader::parse(bytes, source_name)?;
    let payload = &bytes[HEADER_LEN..];
    let found = payload.len() as u64;

    let Some(expected) = header.payload_len(kind) else {
        return Err(ModevizError::size_mismatch(source_name, u64::MAX, found));
    };
    if expected != found {
        return Err(ModevizError::size_mismatch(source_name, expected, found));
    }
    Ok((header, payload))
}

fn read_f64_block(bytes: &[u8]) -> Vec<f64> {
    bytes
        .chunks_exact(ELEMENT_LEN)
        .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/decode.rs"]
mod tests;
