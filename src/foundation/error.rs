/// Convenience result type used across modeviz.
pub type ModevizResult<T> = Result<T, ModevizError>;

/// Top-level error taxonomy.
///
/// The first four variants are the structural failures of a visualization run. They are all
/// terminal: a run that hits one of them stops before any output artifact is written.
#[derive(thiserror::Error, Debug)]
pub enum ModevizError {
    /// Snapshot file too short to hold a header, or header fields out of range.
    #[error("malformed header in '{source_name}': {reason}")]
    MalformedHeader {
        /// File path or buffer name the header was read from.
        source_name: String,
        /// Which header check failed.
        reason: String,
    },

    /// Payload length inconsistent with the header-declared dimensions.
    #[error(
        "size mismatch in '{source_name}': header declares {expected} payload bytes, found {found}"
    )]
    SizeMismatch {
        /// File path or buffer name.
        source_name: String,
        /// Payload bytes implied by the header (saturated on overflow).
        expected: u64,
        /// Payload bytes actually present.
        found: u64,
    },

    /// Snapshot sets that must be compared disagree on grid size or snapshot count.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A series with zero snapshots (or nothing at all to render).
    #[error("empty series in '{0}'")]
    EmptySeries(String),

    /// Invalid user-provided configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rendering or encoding frames.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModevizError {
    /// Build a [`ModevizError::MalformedHeader`] value.
    pub fn malformed_header(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`ModevizError::SizeMismatch`] value.
    pub fn size_mismatch(source_name: impl Into<String>, expected: u64, found: u64) -> Self {
        Self::SizeMismatch {
            source_name: source_name.into(),
            expected,
            found,
        }
    }

    /// Build a [`ModevizError::DimensionMismatch`] value.
    pub fn dimension_mismatch(msg: impl Into<String>) -> Self {
        Self::DimensionMismatch(msg.into())
    }

    /// Build a [`ModevizError::EmptySeries`] value.
    pub fn empty_series(source_name: impl Into<String>) -> Self {
        Self::EmptySeries(source_name.into())
    }

    /// Build a [`ModevizError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ModevizError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
