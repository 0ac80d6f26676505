use std::path::Path;

use anyhow::Context as _;
use num_complex::Complex64;

use crate::encode::ensure_parent_dir;
use crate::foundation::error::ModevizResult;
use crate::snapshot::header::{ELEMENT_LEN, HEADER_LEN, ValueKind};
use crate::snapshot::set::{FieldSnapshotSet, SnapshotSet};

/// Serialize a real set in the snapshot file layout.
pub fn encode_real(set: &FieldSnapshotSet<f64>) -> ModevizResult<Vec<u8>> {
    let mut out = with_header(set.header().to_bytes()?, set.as_slice().len(), ValueKind::Real);
    push_f64s(&mut out, set.as_slice().iter().copied());
    Ok(out)
}

/// Serialize a complex set: all real parts, then all imaginary parts.
pub fn encode_complex(set: &FieldSnapshotSet<Complex64>) -> ModevizResult<Vec<u8>> {
    let mut out = with_header(
        set.header().to_bytes()?,
        set.as_slice().len(),
        ValueKind::Complex,
    );
    push_f64s(&mut out, set.as_slice().iter().map(|c| c.re));
    push_f64s(&mut out, set.as_slice().iter().map(|c| c.im));
    Ok(out)
}

/// Serialize either kind.
pub fn encode_set(set: &SnapshotSet) -> ModevizResult<Vec<u8>> {
    match set {
        SnapshotSet::Real(s) => encode_real(s),
        SnapshotSet::Complex(s) => encode_complex(s),
    }
}

/// Write `set` to `path`, creating parent directories.
pub fn write_set(path: &Path, set: &SnapshotSet) -> ModevizResult<()> {
    let bytes = encode_set(set)?;
    ensure_parent_dir(path)?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write snapshot file '{}'", path.display()))?;
    tracing::info!(path = %path.display(), dims = %set.header(), kind = ?set.kind(), "wrote snapshot file");
    Ok(())
}

fn with_header(header: [u8; HEADER_LEN], elements: usize, kind: ValueKind) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + elements * ELEMENT_LEN * kind.blocks() as usize);
    out.extend_from_slice(&header);
    out
}

fn push_f64s(out: &mut Vec<u8>, values: impl Iterator<Item = f64>) {
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
}
