//! DMD spectrum data: eigenvalues paired with mode amplitudes.

use std::path::Path;

use num_complex::Complex64;

use crate::foundation::error::{ModevizError, ModevizResult};

/// `real,imag` CSV tables.
pub mod table;

/// Eigenvalues and amplitudes of equal length.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// Discrete-time eigenvalues `mu_i`.
    pub eigenvalues: Vec<Complex64>,
    /// Mode amplitudes `b_i`.
    pub amplitudes: Vec<Complex64>,
}

/// One stem of the spectrum plot: eigenvalue position and amplitude height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stem {
    /// `Re(mu)`.
    pub re: f64,
    /// `Im(mu)`.
    pub im: f64,
    /// `|b|`.
    pub height: f64,
}

impl Spectrum {
    /// Pair eigenvalues with amplitudes.
    pub fn new(eigenvalues: Vec<Complex64>, amplitudes: Vec<Complex64>) -> ModevizResult<Self> {
        let s = Self {
            eigenvalues,
            amplitudes,
        };
        s.validate()?;
        Ok(s)
    }

    /// Equal, non-zero counts.
    pub fn validate(&self) -> ModevizResult<()> {
        if self.eigenvalues.len() != self.amplitudes.len() {
            return Err(ModevizError::dimension_mismatch(format!(
                "{} eigenvalues but {} amplitudes",
                self.eigenvalues.len(),
                self.amplitudes.len()
            )));
        }
        if self.eigenvalues.is_empty() {
            return Err(ModevizError::empty_series("<spectrum>"));
        }
        Ok(())
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    /// `true` when there are no modes.
    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Stems in input order.
    pub fn stems(&self) -> impl Iterator<Item = Stem> + '_ {
        self.eigenvalues
            .iter()
            .zip(&self.amplitudes)
            .map(|(mu, b)| Stem {
                re: mu.re,
                im: mu.im,
                height: b.norm(),
            })
    }
}

/// Read eigenvalue and amplitude tables and pair them.
pub fn load_spectrum(eigenvalues: &Path, amplitudes: &Path) -> ModevizResult<Spectrum> {
    let eig = table::read_complex_csv(eigenvalues)?;
    let amp = table::read_complex_csv(amplitudes)?;
    Spectrum::new(eig, amp)
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/mod.rs"]
mod tests;
