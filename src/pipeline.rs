//! File-to-file cleaning pipeline
//!
//! load (decode + mono + resample) -> spectral subtraction -> save (WAV / FLAC)

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use ac_denoise::{NoiseReducer, PowerReduction, StageTimings};
use ac_file::{AudioDecoder, AudioEncoder, FileError};

use crate::error::CleanerResult;
use crate::observer::LogObserver;
use crate::settings::CleanerSettings;

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of one `process_file` call
#[derive(Debug, Clone)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sample_rate: u32,
    pub input_samples: usize,
    pub output_samples: usize,
    pub output_bytes: u64,
    pub power_reduction: PowerReduction,
    pub load_time: Duration,
    pub process_time: Duration,
    pub save_time: Duration,
    pub stages: StageTimings,
}

impl FileReport {
    pub fn total_time(&self) -> Duration {
        self.load_time + self.process_time + self.save_time
    }

    pub fn input_duration(&self) -> f64 {
        self.input_samples as f64 / self.sample_rate as f64
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLEANER
// ═══════════════════════════════════════════════════════════════════════════════

/// Loads, denoises and writes audio files with one fixed configuration
#[derive(Debug)]
pub struct AudioCleaner {
    settings: CleanerSettings,
    reducer: NoiseReducer,
    decoder: AudioDecoder,
    encoder: AudioEncoder,
}

impl AudioCleaner {
    pub fn new(settings: CleanerSettings) -> CleanerResult<Self> {
        settings.validate()?;
        let reducer = NoiseReducer::new(settings.denoise.clone())?;
        let encoder = AudioEncoder::new(settings.output)?;

        Ok(Self {
            settings,
            reducer,
            decoder: AudioDecoder::new(),
            encoder,
        })
    }

    pub fn settings(&self) -> &CleanerSettings {
        &self.settings
    }

    /// Clean `input` and write the result to `output`
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> CleanerResult<FileReport> {
        let input = input.as_ref();
        let output = output.as_ref();
        let sample_rate = self.settings.denoise.sample_rate;

        if !input.is_file() {
            return Err(FileError::InputNotFound(input.to_path_buf()).into());
        }
        let container = AudioEncoder::check_output(output)?;
        log::info!("Processing {} -> {}", input.display(), output.display());

        let start = Instant::now();
        let signal = self.decoder.load_signal(input, sample_rate)?;
        let load_time = start.elapsed();
        log::debug!(
            "Loaded {} samples @ {}Hz ({:.2}s) in {:.2}s",
            signal.len(),
            sample_rate,
            signal.duration(),
            load_time.as_secs_f64()
        );
        if let Some((min, max)) = signal.range() {
            log::debug!("Input range [{:.4}, {:.4}], mean power {:.6e}", min, max, signal.mean_power());
        }

        let start = Instant::now();
        let result = self.reducer.process_observed(
            &signal,
            self.settings.denoise.reduce_factor,
            self.settings.denoise.profile_duration_seconds,
            &mut LogObserver,
        )?;
        let process_time = start.elapsed();
        log::debug!(
            "Noise reduction took {:.2}s (profile {:.3}s, analysis {:.3}s, subtraction {:.3}s, synthesis {:.3}s)",
            process_time.as_secs_f64(),
            result.timings.profile.as_secs_f64(),
            result.timings.analysis.as_secs_f64(),
            result.timings.subtraction.as_secs_f64(),
            result.timings.synthesis.as_secs_f64()
        );

        let start = Instant::now();
        let output_bytes = self.encoder.save(&result.signal, output, Some(sample_rate))?;
        let save_time = start.elapsed();
        log::debug!(
            "Saved {} bytes of {} in {:.2}s",
            output_bytes,
            container.extension(),
            save_time.as_secs_f64()
        );

        let report = FileReport {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            sample_rate,
            input_samples: signal.len(),
            output_samples: result.signal.len(),
            output_bytes,
            power_reduction: result.power_reduction,
            load_time,
            process_time,
            save_time,
            stages: result.timings,
        };

        log::info!(
            "Cleaned {} ({:.2}s audio) in {:.2}s, power reduction {}",
            input.display(),
            report.input_duration(),
            report.total_time().as_secs_f64(),
            report.power_reduction
        );
        Ok(report)
    }
}
