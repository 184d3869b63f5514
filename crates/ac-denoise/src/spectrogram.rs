//! Complex (bin x frame) matrix and its magnitude/phase decomposition

use ndarray::{Array2, Zip};
use rustfft::num_complex::Complex;

use crate::error::{DenoiseError, DenoiseResult};

/// Short-time spectrum of a signal, shaped `(bins, frames)`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    data: Array2<Complex<f64>>,
}

impl Spectrogram {
    /// Wrap a `(bins, frames)` matrix
    pub fn from_array(data: Array2<Complex<f64>>) -> Self {
        Self { data }
    }

    /// Rebuild from magnitude and unit-modulus phase of identical shape
    pub fn from_magnitude_phase(
        magnitude: &Array2<f64>,
        phase: &Array2<Complex<f64>>,
    ) -> DenoiseResult<Self> {
        if magnitude.dim() != phase.dim() {
            return Err(DenoiseError::ShapeMismatch {
                magnitude: magnitude.dim(),
                phase: phase.dim(),
            });
        }

        let data = Zip::from(magnitude)
            .and(phase)
            .map_collect(|&mag, &dir| dir * mag);

        Ok(Self { data })
    }

    /// Number of frequency bins
    pub fn bins(&self) -> usize {
        self.data.nrows()
    }

    /// Number of time frames
    pub fn frames(&self) -> usize {
        self.data.ncols()
    }

    /// Underlying matrix
    pub fn as_array(&self) -> &Array2<Complex<f64>> {
        &self.data
    }

    /// Magnitude matrix
    pub fn magnitude(&self) -> Array2<f64> {
        self.data.mapv(|c| c.norm())
    }

    /// Polar decomposition into magnitude (>= 0) and phase (|p| = 1)
    ///
    /// Zero coefficients get phase `1 + 0i`.
    pub fn magnitude_phase(&self) -> (Array2<f64>, Array2<Complex<f64>>) {
        let magnitude = self.magnitude();
        let phase = Zip::from(&self.data)
            .and(&magnitude)
            .map_collect(|&c, &mag| {
                if mag > 0.0 {
                    c / mag
                } else {
                    Complex::new(1.0, 0.0)
                }
            });
        (magnitude, phase)
    }
}
