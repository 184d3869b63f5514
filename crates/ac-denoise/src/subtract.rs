//! Magnitude-domain spectral subtraction

use ndarray::{Array2, ArrayView2};

use crate::config::validate_reduce_factor;
use crate::error::{DenoiseError, DenoiseResult};
use crate::profile::NoiseProfile;

/// Subtract `factor * profile[bin]` from every frame, floored at zero
///
/// The zero floor is what produces musical noise at high factors.
pub fn subtract_profile(
    magnitude: &Array2<f64>,
    profile: &NoiseProfile,
    factor: f64,
) -> DenoiseResult<Array2<f64>> {
    check_profile(magnitude.nrows(), profile)?;
    validate_reduce_factor(factor)?;

    let noise = ArrayView2::from_shape((profile.len(), 1), profile.magnitude())
        .map_err(|e| DenoiseError::Transform(e.to_string()))?;

    let mut reduced = magnitude - &(&noise * factor);
    reduced.mapv_inplace(|m| m.max(0.0));
    Ok(reduced)
}

/// Profile length must match the bin axis
pub fn check_profile(bins: usize, profile: &NoiseProfile) -> DenoiseResult<()> {
    if profile.len() != bins {
        return Err(DenoiseError::ProfileMismatch {
            expected: bins,
            got: profile.len(),
        });
    }
    Ok(())
}

/// Smallest and largest value of a magnitude matrix
pub fn magnitude_range(magnitude: &Array2<f64>) -> (f64, f64) {
    if magnitude.is_empty() {
        return (0.0, 0.0);
    }
    magnitude
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| (lo.min(m), hi.max(m)))
}
