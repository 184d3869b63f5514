//! Noise reducer: profile estimation, subtraction and reconstruction

use std::time::Instant;

use crate::config::{validate_reduce_factor, DenoiseConfig};
use crate::error::{DenoiseError, DenoiseResult};
use crate::observer::{Checkpoint, DegenerateInput, DenoiseObserver, NullObserver};
use crate::profile::{self, NoiseProfile};
use crate::signal::Signal;
use crate::spectrogram::Spectrogram;
use crate::stats::{PowerReduction, StageTimings};
use crate::stft::Stft;
use crate::subtract::{check_profile, magnitude_range, subtract_profile};

/// Output of a full processing call
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Denoised signal
    pub signal: Signal,
    /// Profile that was subtracted
    pub profile: NoiseProfile,
    /// Per-stage elapsed time
    pub timings: StageTimings,
    /// Average power reduction
    pub power_reduction: PowerReduction,
}

/// Spectral subtraction noise reducer
///
/// Holds only validated configuration and planned transforms, so one
/// instance can serve any number of calls, including concurrent ones.
#[derive(Debug)]
pub struct NoiseReducer {
    config: DenoiseConfig,
    stft: Stft,
}

impl NoiseReducer {
    /// Validate config and plan transforms
    pub fn new(config: DenoiseConfig) -> DenoiseResult<Self> {
        config.validate()?;
        let stft = Stft::new(&config.stft())?;
        Ok(Self { config, stft })
    }

    /// Reducer with default settings
    pub fn with_defaults() -> DenoiseResult<Self> {
        Self::new(DenoiseConfig::default())
    }

    /// Active configuration
    pub fn config(&self) -> &DenoiseConfig {
        &self.config
    }

    /// Underlying transform
    pub fn stft(&self) -> &Stft {
        &self.stft
    }

    /// Bins per frame, and therefore the required profile length
    pub fn num_bins(&self) -> usize {
        self.stft.num_bins()
    }

    /// Learn a noise profile from the leading `duration_seconds`
    pub fn estimate_profile(
        &self,
        signal: &Signal,
        duration_seconds: f64,
    ) -> DenoiseResult<NoiseProfile> {
        self.check_signal(signal)?;
        profile::estimate(&self.stft, signal, duration_seconds)
    }

    /// Subtract `profile` from `signal` and resynthesize
    pub fn denoise(
        &self,
        signal: &Signal,
        profile: &NoiseProfile,
        reduce_factor: f64,
    ) -> DenoiseResult<Signal> {
        let mut timings = StageTimings::default();
        self.denoise_inner(signal, profile, reduce_factor, &mut timings, &mut NullObserver)
    }

    /// [`denoise`](Self::denoise) reporting checkpoints to `observer`
    pub fn denoise_observed(
        &self,
        signal: &Signal,
        profile: &NoiseProfile,
        reduce_factor: f64,
        observer: &mut dyn DenoiseObserver,
    ) -> DenoiseResult<Signal> {
        let mut timings = StageTimings::default();
        self.denoise_inner(signal, profile, reduce_factor, &mut timings, observer)
    }

    /// Estimate profile from the signal head, then denoise the whole signal
    pub fn process(
        &self,
        signal: &Signal,
        reduce_factor: f64,
        profile_duration_seconds: f64,
    ) -> DenoiseResult<ProcessingResult> {
        self.process_observed(signal, reduce_factor, profile_duration_seconds, &mut NullObserver)
    }

    /// [`process`](Self::process) reporting checkpoints to `observer`
    pub fn process_observed(
        &self,
        signal: &Signal,
        reduce_factor: f64,
        profile_duration_seconds: f64,
        observer: &mut dyn DenoiseObserver,
    ) -> DenoiseResult<ProcessingResult> {
        validate_reduce_factor(reduce_factor)?;
        let mut timings = StageTimings::default();

        let start = Instant::now();
        let profile = self.estimate_profile(signal, profile_duration_seconds)?;
        timings.profile = start.elapsed();
        observer.checkpoint(&Checkpoint::ProfileEstimated {
            noise_samples: profile.noise_samples(),
            frames: profile.frame_count(),
            bins: profile.len(),
            elapsed: timings.profile,
        });

        let denoised = self.denoise_inner(signal, &profile, reduce_factor, &mut timings, observer)?;
        let power_reduction = PowerReduction::between(signal.samples(), denoised.samples());

        Ok(ProcessingResult {
            signal: denoised,
            profile,
            timings,
            power_reduction,
        })
    }

    fn denoise_inner(
        &self,
        signal: &Signal,
        profile: &NoiseProfile,
        reduce_factor: f64,
        timings: &mut StageTimings,
        observer: &mut dyn DenoiseObserver,
    ) -> DenoiseResult<Signal> {
        self.check_signal(signal)?;
        check_profile(self.num_bins(), profile)?;
        validate_reduce_factor(reduce_factor)?;

        let start = Instant::now();
        let spectrogram = self.stft.forward(signal.samples())?;
        let (magnitude, phase) = spectrogram.magnitude_phase();
        timings.analysis = start.elapsed();
        let (min_magnitude, max_magnitude) = magnitude_range(&magnitude);
        observer.checkpoint(&Checkpoint::TransformComputed {
            bins: spectrogram.bins(),
            frames: spectrogram.frames(),
            min_magnitude,
            max_magnitude,
            elapsed: timings.analysis,
        });

        let start = Instant::now();
        let reduced = subtract_profile(&magnitude, profile, reduce_factor)?;
        timings.subtraction = start.elapsed();
        let (min_magnitude, max_magnitude) = magnitude_range(&reduced);
        observer.checkpoint(&Checkpoint::ReductionApplied {
            reduce_factor,
            min_magnitude,
            max_magnitude,
            elapsed: timings.subtraction,
        });

        let start = Instant::now();
        let rebuilt = Spectrogram::from_magnitude_phase(&reduced, &phase)?;
        let samples = self.stft.inverse(&rebuilt)?;
        timings.synthesis = start.elapsed();

        let power_reduction = PowerReduction::between(signal.samples(), &samples);
        report_degenerate(signal.samples(), &samples, observer);
        observer.checkpoint(&Checkpoint::ReconstructionComplete {
            samples: samples.len(),
            power_reduction,
            elapsed: timings.synthesis,
        });

        Signal::new(samples, signal.sample_rate())
    }

    fn check_signal(&self, signal: &Signal) -> DenoiseResult<()> {
        if signal.sample_rate() != self.config.sample_rate {
            return Err(DenoiseError::SampleRateMismatch {
                expected: self.config.sample_rate,
                got: signal.sample_rate(),
            });
        }
        Ok(())
    }
}

fn report_degenerate(original: &[f64], processed: &[f64], observer: &mut dyn DenoiseObserver) {
    if original.is_empty() {
        observer.degenerate_input(DegenerateInput::EmptySignal);
    } else if original.iter().all(|&s| s == 0.0) {
        observer.degenerate_input(DegenerateInput::SilentInput);
    } else if processed.is_empty() {
        observer.degenerate_input(DegenerateInput::ShortSignal);
    } else if processed.iter().all(|&s| s == 0.0) {
        observer.degenerate_input(DegenerateInput::SilentOutput);
    }
}
