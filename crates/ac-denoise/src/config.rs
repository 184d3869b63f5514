//! Configuration for spectral subtraction

use serde::{Deserialize, Serialize};

use crate::error::{DenoiseError, DenoiseResult};

/// Default processing sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Default STFT frame size (samples)
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Default STFT hop size (75% overlap)
pub const DEFAULT_HOP_SIZE: usize = 512;

/// Default noise reduction factor
pub const DEFAULT_REDUCE_FACTOR: f64 = 0.8;

/// Default noise profile duration (seconds)
pub const DEFAULT_PROFILE_DURATION: f64 = 2.0;

/// Short-time transform configuration
///
/// Profile estimation and full-signal analysis must share one of these,
/// otherwise their bin counts disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StftConfig {
    /// Samples per analysis window
    pub frame_size: usize,
    /// Samples advanced between windows
    pub hop_size: usize,
    /// Run per-frame FFTs on the rayon pool
    pub parallel: bool,
}

impl Default for StftConfig {
    fn default() -> Self {
        Self {
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            parallel: true,
        }
    }
}

impl StftConfig {
    /// Create config with explicit frame and hop size
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        Self {
            frame_size,
            hop_size,
            ..Default::default()
        }
    }

    /// Set parallel frame processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of frequency bins per frame
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Check frame/hop relationship
    pub fn validate(&self) -> DenoiseResult<()> {
        if self.frame_size == 0 {
            return Err(DenoiseError::InvalidConfig(
                "frame size must be greater than zero".to_string(),
            ));
        }
        if self.frame_size % 2 != 0 {
            return Err(DenoiseError::InvalidConfig(format!(
                "frame size must be even, got {}",
                self.frame_size
            )));
        }
        if self.hop_size == 0 {
            return Err(DenoiseError::InvalidConfig(
                "hop size must be greater than zero".to_string(),
            ));
        }
        if self.hop_size > self.frame_size {
            return Err(DenoiseError::InvalidConfig(format!(
                "hop size {} exceeds frame size {}",
                self.hop_size, self.frame_size
            )));
        }
        Ok(())
    }
}

/// Noise reducer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DenoiseConfig {
    /// Processing sample rate (Hz)
    pub sample_rate: u32,
    /// Fraction of the noise profile subtracted from each frame
    pub reduce_factor: f64,
    /// Leading duration used as the noise sample (seconds)
    pub profile_duration_seconds: f64,
    /// STFT frame size
    pub frame_size: usize,
    /// STFT hop size
    pub hop_size: usize,
    /// Parallel per-frame transforms
    pub parallel: bool,
}

impl Default for DenoiseConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            reduce_factor: DEFAULT_REDUCE_FACTOR,
            profile_duration_seconds: DEFAULT_PROFILE_DURATION,
            frame_size: DEFAULT_FRAME_SIZE,
            hop_size: DEFAULT_HOP_SIZE,
            parallel: true,
        }
    }
}

impl DenoiseConfig {
    /// Set sample rate
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set reduction factor
    pub fn with_reduce_factor(mut self, factor: f64) -> Self {
        self.reduce_factor = factor;
        self
    }

    /// Set noise profile duration
    pub fn with_profile_duration(mut self, seconds: f64) -> Self {
        self.profile_duration_seconds = seconds;
        self
    }

    /// Set frame and hop size
    pub fn with_frame(mut self, frame_size: usize, hop_size: usize) -> Self {
        self.frame_size = frame_size;
        self.hop_size = hop_size;
        self
    }

    /// Set parallel frame processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Transform part of the config
    pub fn stft(&self) -> StftConfig {
        StftConfig {
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            parallel: self.parallel,
        }
    }

    /// Validate every field
    pub fn validate(&self) -> DenoiseResult<()> {
        if self.sample_rate == 0 {
            return Err(DenoiseError::InvalidSampleRate(self.sample_rate));
        }
        validate_reduce_factor(self.reduce_factor)?;
        validate_profile_duration(self.profile_duration_seconds)?;
        self.stft().validate()
    }
}

/// Reduction factor must be a real number; range is not enforced
pub(crate) fn validate_reduce_factor(factor: f64) -> DenoiseResult<()> {
    if !factor.is_finite() {
        return Err(DenoiseError::InvalidConfig(format!(
            "reduce factor must be finite, got {}",
            factor
        )));
    }
    Ok(())
}

/// Profile duration must be positive and finite
pub(crate) fn validate_profile_duration(seconds: f64) -> DenoiseResult<()> {
    if !seconds.is_finite() || seconds <= 0.0 {
        return Err(DenoiseError::InvalidConfig(format!(
            "profile duration must be greater than zero, got {}",
            seconds
        )));
    }
    Ok(())
}
