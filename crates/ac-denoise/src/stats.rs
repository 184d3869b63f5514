//! Before/after statistics for a denoise call

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::signal::mean_power;

/// Average power reduction, `10 * log10(P_in / P_out)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PowerReduction {
    /// Finite reduction in dB (negative means the output got louder)
    Decibels(f64),
    /// Output is silent while input is not
    Infinite,
    /// Ratio has no meaning (empty or silent input)
    Undefined,
}

impl PowerReduction {
    /// Compare two sample buffers
    pub fn between(original: &[f64], processed: &[f64]) -> Self {
        if original.is_empty() || processed.is_empty() {
            return Self::Undefined;
        }
        Self::from_powers(mean_power(original), mean_power(processed))
    }

    /// Compare two mean powers
    pub fn from_powers(original: f64, processed: f64) -> Self {
        if !original.is_finite() || !processed.is_finite() || original <= 0.0 {
            return Self::Undefined;
        }
        if processed <= 0.0 {
            return Self::Infinite;
        }
        Self::Decibels(10.0 * (original / processed).log10())
    }

    /// Finite value in dB, if any
    pub fn as_db(&self) -> Option<f64> {
        match self {
            Self::Decibels(db) => Some(*db),
            _ => None,
        }
    }

    /// Reduction is a finite number
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Decibels(_))
    }
}

impl std::fmt::Display for PowerReduction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decibels(db) => write!(f, "{:.1}dB", db),
            Self::Infinite => write!(f, "infdB"),
            Self::Undefined => write!(f, "undefined"),
        }
    }
}

/// Elapsed time per processing stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageTimings {
    /// Noise profile estimation
    pub profile: Duration,
    /// Full-signal STFT
    pub analysis: Duration,
    /// Magnitude subtraction
    pub subtraction: Duration,
    /// Inverse STFT
    pub synthesis: Duration,
}

impl StageTimings {
    /// Sum of all stages
    pub fn total(&self) -> Duration {
        self.profile + self.analysis + self.subtraction + self.synthesis
    }
}
