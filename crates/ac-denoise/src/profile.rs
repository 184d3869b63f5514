//! Noise profile learning from a leading noise-only segment

use ndarray::Axis;
use serde::Serialize;

use crate::config::validate_profile_duration;
use crate::error::{DenoiseError, DenoiseResult};
use crate::signal::Signal;
use crate::stft::Stft;

/// Average magnitude spectrum of a noise sample
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoiseProfile {
    /// Mean magnitude per bin
    magnitude: Vec<f64>,
    /// Number of frames averaged
    frame_count: usize,
    /// Number of signal samples the frames were taken from
    noise_samples: usize,
}

impl NoiseProfile {
    /// Build profile from externally computed magnitudes
    pub fn from_magnitudes(magnitude: Vec<f64>) -> DenoiseResult<Self> {
        if let Some(bad) = magnitude.iter().find(|m| !m.is_finite() || **m < 0.0) {
            return Err(DenoiseError::InvalidConfig(format!(
                "noise profile magnitudes must be finite and non-negative, got {}",
                bad
            )));
        }
        Ok(Self {
            magnitude,
            frame_count: 0,
            noise_samples: 0,
        })
    }

    /// Magnitude per bin
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// Profile has no bins
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Frames averaged into the profile
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Samples of noise the profile was learned from
    pub fn noise_samples(&self) -> usize {
        self.noise_samples
    }
}

/// Learn a profile from the first `duration_seconds` of `signal`
///
/// A duration longer than the signal uses the whole signal.
pub fn estimate(stft: &Stft, signal: &Signal, duration_seconds: f64) -> DenoiseResult<NoiseProfile> {
    validate_profile_duration(duration_seconds)?;

    let noise = signal.head(duration_seconds);
    let magnitude = stft.forward(noise)?.magnitude();
    let frame_count = magnitude.ncols();

    // At least one frame always exists, even for an empty slice
    let mean = magnitude
        .mean_axis(Axis(1))
        .ok_or_else(|| DenoiseError::Transform("noise sample produced no frames".to_string()))?;

    Ok(NoiseProfile {
        magnitude: mean.to_vec(),
        frame_count,
        noise_samples: noise.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StftConfig;

    fn stft() -> Stft {
        Stft::new(&StftConfig::new(512, 128)).unwrap()
    }

    #[test]
    fn test_profile_length() {
        let signal = Signal::new(vec![0.01; 8000], 8000).unwrap();
        let profile = estimate(&stft(), &signal, 0.5).unwrap();
        assert_eq!(profile.len(), 257);
        assert_eq!(profile.noise_samples(), 4000);
        assert_eq!(profile.frame_count(), 1 + 4000 / 128);
    }

    #[test]
    fn test_duration_clamped_to_signal() {
        let signal = Signal::new(vec![0.01; 300], 8000).unwrap();
        let profile = estimate(&stft(), &signal, 10.0).unwrap();
        assert_eq!(profile.len(), 257);
        assert_eq!(profile.noise_samples(), 300);
    }

    #[test]
    fn test_empty_signal_profile_is_zero() {
        let signal = Signal::new(Vec::new(), 8000).unwrap();
        let profile = estimate(&stft(), &signal, 1.0).unwrap();
        assert_eq!(profile.len(), 257);
        assert!(profile.magnitude().iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_rejects_non_positive_duration() {
        let signal = Signal::new(vec![0.0; 100], 8000).unwrap();
        assert!(estimate(&stft(), &signal, 0.0).is_err());
        assert!(estimate(&stft(), &signal, -1.0).is_err());
        assert!(estimate(&stft(), &signal, f64::NAN).is_err());
    }

    #[test]
    fn test_dc_profile() {
        // Constant input concentrates interior frames in the DC bin
        let signal = Signal::new(vec![0.5; 16_000], 8000).unwrap();
        let profile = estimate(&stft(), &signal, 2.0).unwrap();
        let dc = profile.magnitude()[0];
        assert!(dc > profile.magnitude()[10] * 100.0);
        assert!(profile.magnitude().iter().all(|&m| m >= 0.0));
    }

    #[test]
    fn test_from_magnitudes_validation() {
        assert!(NoiseProfile::from_magnitudes(vec![0.0, 1.0]).is_ok());
        assert!(NoiseProfile::from_magnitudes(vec![0.0, -1.0]).is_err());
        assert!(NoiseProfile::from_magnitudes(vec![f64::NAN]).is_err());
    }
}
