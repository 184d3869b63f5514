//! Processing checkpoints reported to an injected observer
//!
//! The numeric core does no logging of its own. Callers that want
//! diagnostics pass a [`DenoiseObserver`] and route events wherever they like.

use std::time::Duration;

use crate::stats::PowerReduction;

/// Stage boundary reached during a denoise call
#[derive(Debug, Clone, PartialEq)]
pub enum Checkpoint {
    /// Noise profile learned
    ProfileEstimated {
        /// Samples in the noise-only segment
        noise_samples: usize,
        /// Frames averaged
        frames: usize,
        /// Profile length
        bins: usize,
        /// Stage time
        elapsed: Duration,
    },
    /// Full-signal STFT computed
    TransformComputed {
        /// Frequency bins per frame
        bins: usize,
        /// Frame count
        frames: usize,
        /// Smallest magnitude
        min_magnitude: f64,
        /// Largest magnitude
        max_magnitude: f64,
        /// Stage time
        elapsed: Duration,
    },
    /// Profile subtracted from the magnitude matrix
    ReductionApplied {
        /// Factor the profile was scaled by
        reduce_factor: f64,
        /// Smallest reduced magnitude
        min_magnitude: f64,
        /// Largest reduced magnitude
        max_magnitude: f64,
        /// Stage time
        elapsed: Duration,
    },
    /// Time-domain signal rebuilt
    ReconstructionComplete {
        /// Output length
        samples: usize,
        /// Input vs output power
        power_reduction: PowerReduction,
        /// Stage time
        elapsed: Duration,
    },
}

impl Checkpoint {
    /// Short stage name
    pub fn name(&self) -> &'static str {
        match self {
            Self::ProfileEstimated { .. } => "profile",
            Self::TransformComputed { .. } => "analysis",
            Self::ReductionApplied { .. } => "subtraction",
            Self::ReconstructionComplete { .. } => "synthesis",
        }
    }

    /// Time spent in the stage
    pub fn elapsed(&self) -> Duration {
        match self {
            Self::ProfileEstimated { elapsed, .. }
            | Self::TransformComputed { elapsed, .. }
            | Self::ReductionApplied { elapsed, .. }
            | Self::ReconstructionComplete { elapsed, .. } => *elapsed,
        }
    }
}

/// Non-fatal input condition; processing still completes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateInput {
    /// Signal has no samples
    EmptySignal,
    /// Input is all zeros, power reduction is undefined
    SilentInput,
    /// Input is shorter than one hop, so the output is empty
    ShortSignal,
    /// Output is all zeros, power reduction is infinite
    SilentOutput,
}

impl std::fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySignal => write!(f, "signal is empty"),
            Self::SilentInput => write!(f, "input signal is silent"),
            Self::ShortSignal => write!(f, "signal is shorter than one hop, output is empty"),
            Self::SilentOutput => write!(f, "processed signal is silent"),
        }
    }
}

/// Receiver for processing telemetry
pub trait DenoiseObserver {
    /// Stage finished
    fn checkpoint(&mut self, checkpoint: &Checkpoint);

    /// Degenerate input detected
    fn degenerate_input(&mut self, _condition: DegenerateInput) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl DenoiseObserver for NullObserver {
    fn checkpoint(&mut self, _checkpoint: &Checkpoint) {}
}

/// Observer that keeps every event, in order
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Checkpoints received
    pub checkpoints: Vec<Checkpoint>,
    /// Degenerate conditions received
    pub conditions: Vec<DegenerateInput>,
}

impl RecordingObserver {
    /// Create empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage names in the order they were reported
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.checkpoints.iter().map(Checkpoint::name).collect()
    }
}

impl DenoiseObserver for RecordingObserver {
    fn checkpoint(&mut self, checkpoint: &Checkpoint) {
        self.checkpoints.push(checkpoint.clone());
    }

    fn degenerate_input(&mut self, condition: DegenerateInput) {
        self.conditions.push(condition);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_observer() {
        let mut observer = RecordingObserver::new();
        observer.checkpoint(&Checkpoint::ProfileEstimated {
            noise_samples: 10,
            frames: 1,
            bins: 5,
            elapsed: Duration::from_millis(3),
        });
        observer.degenerate_input(DegenerateInput::SilentInput);

        assert_eq!(observer.stage_names(), vec!["profile"]);
        assert_eq!(observer.checkpoints[0].elapsed(), Duration::from_millis(3));
        assert_eq!(observer.conditions, vec![DegenerateInput::SilentInput]);
    }
}
