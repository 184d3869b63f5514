//! Routes core checkpoints into the `log` facade

use ac_denoise::{Checkpoint, DegenerateInput, DenoiseObserver};

/// Logs every checkpoint at debug level and degenerate input as a warning
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl DenoiseObserver for LogObserver {
    fn checkpoint(&mut self, checkpoint: &Checkpoint) {
        let ms = checkpoint.elapsed().as_secs_f64() * 1000.0;
        match checkpoint {
            Checkpoint::ProfileEstimated {
                noise_samples,
                frames,
                bins,
                ..
            } => log::debug!(
                "Noise profile from {} samples: {} frames x {} bins ({:.1}ms)",
                noise_samples,
                frames,
                bins,
                ms
            ),
            Checkpoint::TransformComputed {
                bins,
                frames,
                min_magnitude,
                max_magnitude,
                ..
            } => log::debug!(
                "STFT {}x{}, magnitude range [{:.6}, {:.6}] ({:.1}ms)",
                bins,
                frames,
                min_magnitude,
                max_magnitude,
                ms
            ),
            Checkpoint::ReductionApplied {
                reduce_factor,
                min_magnitude,
                max_magnitude,
                ..
            } => log::debug!(
                "Subtracted profile x{}, magnitude range [{:.6}, {:.6}] ({:.1}ms)",
                reduce_factor,
                min_magnitude,
                max_magnitude,
                ms
            ),
            Checkpoint::ReconstructionComplete {
                samples,
                power_reduction,
                ..
            } => log::debug!(
                "Reconstructed {} samples, power reduction {} ({:.1}ms)",
                samples,
                power_reduction,
                ms
            ),
        }
    }

    fn degenerate_input(&mut self, condition: DegenerateInput) {
        log::warn!("Degenerate input: {}", condition);
    }
}
