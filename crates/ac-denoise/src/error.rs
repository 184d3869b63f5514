//! Error types for the denoise core

use thiserror::Error;

/// Denoise error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DenoiseError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid sample rate
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(u32),

    /// Noise profile does not match the transform bin count
    #[error("Noise profile mismatch: transform produces {expected} bins, profile has {got}")]
    ProfileMismatch {
        /// Bins per transform frame
        expected: usize,
        /// Bins in the profile
        got: usize,
    },

    /// Spectrogram was produced by a different transform configuration
    #[error("Spectrogram mismatch: transform expects {expected} bins, got {got}")]
    SpectrogramMismatch {
        /// Bins per transform frame
        expected: usize,
        /// Bins in the spectrogram
        got: usize,
    },

    /// Signal sample rate differs from the configured one
    #[error("Sample rate mismatch: configured {expected}Hz, signal is {got}Hz")]
    SampleRateMismatch {
        /// Reducer sample rate
        expected: u32,
        /// Signal sample rate
        got: u32,
    },

    /// Magnitude and phase matrices disagree in shape
    #[error("Spectrogram shape mismatch: magnitude {magnitude:?}, phase {phase:?}")]
    ShapeMismatch {
        /// Magnitude `(bins, frames)`
        magnitude: (usize, usize),
        /// Phase `(bins, frames)`
        phase: (usize, usize),
    },

    /// FFT backend failure
    #[error("Transform error: {0}")]
    Transform(String),
}

impl DenoiseError {
    /// Setup problem, fatal to the call
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfig(_) | Self::InvalidSampleRate(_))
    }

    /// Caller passed inputs that do not belong together
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Self::ProfileMismatch { .. }
                | Self::SpectrogramMismatch { .. }
                | Self::SampleRateMismatch { .. }
                | Self::ShapeMismatch { .. }
        )
    }
}

/// Result type for denoise operations
pub type DenoiseResult<T> = Result<T, DenoiseError>;
