//! Mono sample buffer with its sample rate

use crate::error::{DenoiseError, DenoiseResult};

/// Mono audio signal
///
/// Samples are owned; the core never modifies a signal in place and returns
/// new ones instead.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl Signal {
    /// Create signal, rejecting a zero sample rate
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> DenoiseResult<Self> {
        if sample_rate == 0 {
            return Err(DenoiseError::InvalidSampleRate(sample_rate));
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// All-zero signal of the given length
    pub fn silence(len: usize, sample_rate: u32) -> DenoiseResult<Self> {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample data
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Consume into raw samples
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }

    /// Sample rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Signal has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Leading slice of `seconds`, clamped to the signal length
    pub fn head(&self, seconds: f64) -> &[f64] {
        let wanted = (seconds * self.sample_rate as f64).floor();
        let count = if wanted.is_finite() && wanted > 0.0 {
            (wanted as usize).min(self.samples.len())
        } else {
            0
        };
        &self.samples[..count]
    }

    /// Mean of squared samples, zero when empty
    pub fn mean_power(&self) -> f64 {
        mean_power(&self.samples)
    }

    /// Peak absolute sample value
    pub fn peak(&self) -> f64 {
        self.samples.iter().map(|s| s.abs()).fold(0.0, f64::max)
    }

    /// Smallest and largest sample, `None` when empty
    pub fn range(&self) -> Option<(f64, f64)> {
        if self.samples.is_empty() {
            return None;
        }
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Mean power of a sample slice
pub fn mean_power(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64
}
