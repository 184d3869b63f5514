//! Band-limited sample rate conversion and channel mixing

use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::error::{FileError, FileResult};

/// Input frames fed to the resampler per call
const CHUNK_SIZE: usize = 1024;

fn sinc_parameters() -> SincInterpolationParameters {
    SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    }
}

fn resample_error(err: impl std::fmt::Display) -> FileError {
    FileError::Resample(err.to_string())
}

/// Resample mono `samples` from `from_rate` to `to_rate`
///
/// Windowed-sinc interpolation with an anti-aliasing cutoff just below the
/// lower Nyquist frequency. Output length is `round(len * to_rate / from_rate)`
/// and the filter delay is removed, so duration and alignment are kept.
/// Equal rates return a copy.
pub fn resample(samples: &[f64], from_rate: u32, to_rate: u32) -> FileResult<Vec<f64>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(FileError::Resample(format!(
            "invalid rate conversion {}Hz -> {}Hz",
            from_rate, to_rate
        )));
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let expected = (samples.len() as f64 * ratio).round() as usize;

    let mut resampler = SincFixedIn::<f64>::new(ratio, 1.0, sinc_parameters(), CHUNK_SIZE, 1)
        .map_err(resample_error)?;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(delay + expected + CHUNK_SIZE);

    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let end = pos + resampler.input_frames_next();
        let chunk: [&[f64]; 1] = [&samples[pos..end]];
        let frames = resampler
            .process(&chunk[..], None)
            .map_err(resample_error)?;
        output.extend_from_slice(&frames[0]);
        pos = end;
    }

    if pos < samples.len() {
        let tail: [&[f64]; 1] = [&samples[pos..]];
        let frames = resampler
            .process_partial(Some(&tail[..]), None)
            .map_err(resample_error)?;
        output.extend_from_slice(&frames[0]);
    }

    // Flush the filter tail
    while output.len() < delay + expected {
        let frames = resampler
            .process_partial(None::<&[&[f64]]>, None)
            .map_err(resample_error)?;
        if frames[0].is_empty() {
            break;
        }
        output.extend_from_slice(&frames[0]);
    }

    output.drain(..delay.min(output.len()));
    output.resize(expected, 0.0);
    Ok(output)
}

/// Average all channels into one
pub fn mix_to_mono(channels: &[Vec<f64>]) -> Vec<f64> {
    match channels {
        [] => Vec::new(),
        [mono] => mono.clone(),
        _ => {
            let num_samples = channels.iter().map(Vec::len).max().unwrap_or(0);
            let scale = 1.0 / channels.len() as f64;
            (0..num_samples)
                .map(|i| {
                    channels
                        .iter()
                        .map(|ch| ch.get(i).copied().unwrap_or(0.0))
                        .sum::<f64>()
                        * scale
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sine(freq: f64, rate: u32, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / rate as f64).sin())
            .collect()
    }

    fn rms(samples: &[f64]) -> f64 {
        (samples.iter().map(|s| s * s).sum::<f64>() / samples.len() as f64).sqrt()
    }

    #[test]
    fn test_same_rate_is_copy() {
        let input = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&input, 44100, 44100).unwrap(), input);
        assert!(resample(&[], 48000, 44100).unwrap().is_empty());
    }

    #[test]
    fn test_zero_rate_rejected() {
        assert!(matches!(
            resample(&[0.1, 0.2], 0, 44100),
            Err(FileError::Resample(_))
        ));
    }

    #[test]
    fn test_duration_preserved() {
        let input = vec![0.0; 48000];
        assert_eq!(resample(&input, 48000, 44100).unwrap().len(), 44100);
        assert_eq!(resample(&input, 48000, 16000).unwrap().len(), 16000);
        assert_eq!(resample(&input[..22050], 22050, 44100).unwrap().len(), 44100);
        assert_eq!(resample(&input[..300], 44100, 22050).unwrap().len(), 150);
    }

    #[test]
    fn test_sine_survives_resampling() {
        let input = sine(100.0, 48000, 48000);
        let output = resample(&input, 48000, 44100).unwrap();
        assert_eq!(output.len(), 44100);

        // Skip the filter ramp at both edges
        let interior = &output[1000..output.len() - 1000];
        assert_abs_diff_eq!(rms(interior), std::f64::consts::FRAC_1_SQRT_2, epsilon = 5e-3);
        let peak = interior.iter().fold(0.0f64, |m, s| m.max(s.abs()));
        assert_abs_diff_eq!(peak, 1.0, epsilon = 5e-3);
    }

    #[test]
    fn test_content_above_nyquist_is_removed() {
        // 12kHz cannot be represented at 16kHz and must not fold back to 4kHz
        let input = sine(12000.0, 48000, 48000);
        let output = resample(&input, 48000, 16000).unwrap();
        assert_eq!(output.len(), 16000);
        assert!(rms(&output) < 0.05, "rms={}", rms(&output));
    }

    #[test]
    fn test_mix_to_mono() {
        assert_eq!(mix_to_mono(&[vec![1.0, 0.0], vec![0.0, 1.0]]), vec![0.5, 0.5]);
        assert_eq!(mix_to_mono(&[vec![0.25, 0.5]]), vec![0.25, 0.5]);
        assert!(mix_to_mono(&[]).is_empty());
    }
}
