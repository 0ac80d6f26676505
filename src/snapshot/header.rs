use crate::foundation::error::{ModevizError, ModevizResult};

/// Size in bytes of the fixed header: three little-endian `i32`.
pub const HEADER_LEN: usize = 12;

/// Bytes per payload element (`f64`).
pub const ELEMENT_LEN: usize = 8;

/// Element type stored in a snapshot file. The caller picks it; files carry no tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// One block of `f64` values.
    Real,
    /// Two blocks of `f64`: real parts, then imaginary parts.
    Complex,
}

impl ValueKind {
    /// Number of `f64` blocks in the payload.
    pub fn blocks(self) -> u64 {
        match self {
            Self::Real => 1,
            Self::Complex => 2,
        }
    }
}

/// Dimensions declared at the start of a snapshot file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct SnapshotHeader {
    /// Grid points along x.
    pub grid_width: u32,
    /// Grid points along y.
    pub grid_height: u32,
    /// Number of time samples (columns).
    pub snapshot_count: u32,
}

impl SnapshotHeader {
    /// Create a validated header.
    pub fn new(grid_width: u32, grid_height: u32, snapshot_count: u32) -> ModevizResult<Self> {
        let h = Self {
            grid_width,
            grid_height,
            snapshot_count,
        };
        h.validate("<header>")?;
        Ok(h)
    }

    /// Check all dimensions are positive. `source_name` is used in the error.
    pub fn validate(&self, source_name: &str) -> ModevizResult<()> {
        if self.grid_width == 0 {
            return Err(ModevizError::malformed_header(
                source_name,
                "grid_width must be positive",
            ));
        }
        if self.grid_height == 0 {
            return Err(ModevizError::malformed_header(
                source_name,
                "grid_height must be positive",
            ));
        }
        if self.snapshot_count == 0 {
            return Err(ModevizError::empty_series(source_name));
        }
        Ok(())
    }

    /// Parse the header from the first [`HEADER_LEN`] bytes of `bytes`.
    pub fn parse(bytes: &[u8], source_name: &str) -> ModevizResult<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(ModevizError::malformed_header(
                source_name,
                format!(
                    "expected at least {HEADER_LEN} header bytes, found {}",
                    bytes.len()
                ),
            ));
        }

        let field =
            |i: usize| i32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let (nx, ny, n) = (field(0), field(4), field(8));

        let positive = |name: &str, v: i32| -> ModevizResult<u32> {
            if v <= 0 {
                return Err(ModevizError::malformed_header(
                    source_name,
                    format!("{name} must be positive, got {v}"),
                ));
            }
            Ok(v as u32)
        };
        let grid_width = positive("grid_width", nx)?;
        let grid_height = positive("grid_height", ny)?;
        if n < 0 {
            return Err(ModevizError::malformed_header(
                source_name,
                format!("snapshot_count must not be negative, got {n}"),
            ));
        }
        if n == 0 {
            return Err(ModevizError::empty_series(source_name));
        }

        Ok(Self {
            grid_width,
            grid_height,
            snapshot_count: n as u32,
        })
    }

    /// Encode as three little-endian `i32`.
    ///
    /// Dimensions above `i32::MAX` cannot be represented in the file format.
    pub fn to_bytes(&self) -> ModevizResult<[u8; HEADER_LEN]> {
        let as_i32 = |name: &str, v: u32| {
            i32::try_from(v).map_err(|_| {
                ModevizError::validation(format!("{name} {v} does not fit the file header"))
            })
        };
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(&as_i32("grid_width", self.grid_width)?.to_le_bytes());
        out[4..8].copy_from_slice(&as_i32("grid_height", self.grid_height)?.to_le_bytes());
        out[8..12].copy_from_slice(&as_i32("snapshot_count", self.snapshot_count)?.to_le_bytes());
        Ok(out)
    }

    /// Grid points per component (`grid_width * grid_height`).
    pub fn points_per_component(&self) -> usize {
        (self.grid_width as usize) * (self.grid_height as usize)
    }

    /// Rows per snapshot column (`2 * grid_width * grid_height`).
    pub fn points_per_snapshot(&self) -> usize {
        2 * self.points_per_component()
    }

    /// Elements in one payload block (`points_per_snapshot * snapshot_count`).
    pub fn element_count(&self) -> usize {
        self.points_per_snapshot() * (self.snapshot_count as usize)
    }

    /// Payload byte length for `kind`, or `None` when it overflows `u64`.
    pub fn payload_len(&self, kind: ValueKind) -> Option<u64> {
        2u64.checked_mul(u64::from(self.grid_width))?
            .checked_mul(u64::from(self.grid_height))?
            .checked_mul(u64::from(self.snapshot_count))?
            .checked_mul(ELEMENT_LEN as u64)?
            .checked_mul(kind.blocks())
    }

    /// Same grid and snapshot count as `other`.
    pub fn same_dims(&self, other: &SnapshotHeader) -> bool {
        self == other
    }
}

impl std::fmt::Display for SnapshotHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "nx={}, ny={}, snapshots={}",
            self.grid_width, self.grid_height, self.snapshot_count
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/snapshot/header.rs"]
mod tests;
