//! Short-time Fourier transform with overlap-add resynthesis
//!
//! Framing is centered: the signal is zero-padded by `frame_size / 2` on both
//! sides, so frame `f` is centered on sample `f * hop_size`. A signal of
//! `len` samples produces `1 + len / hop_size` frames and resynthesizes to
//! `hop_size * (len / hop_size)` samples.

use std::sync::Arc;

use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use rustfft::num_complex::Complex;

use crate::config::StftConfig;
use crate::error::{DenoiseError, DenoiseResult};
use crate::spectrogram::Spectrogram;

/// Overlap-added squared window below this is treated as uncovered
const WINDOW_SUM_EPSILON: f64 = 1e-10;

/// Frames resynthesized per parallel batch
const SYNTHESIS_BATCH: usize = 256;

/// Periodic Hann window
pub fn hann_window(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos()))
        .collect()
}

/// Planned forward/inverse transform pair for one frame/hop configuration
pub struct Stft {
    frame_size: usize,
    hop_size: usize,
    parallel: bool,
    window: Vec<f64>,
    forward: Arc<dyn RealToComplex<f64>>,
    inverse: Arc<dyn ComplexToReal<f64>>,
}

impl std::fmt::Debug for Stft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stft")
            .field("frame_size", &self.frame_size)
            .field("hop_size", &self.hop_size)
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl Stft {
    /// Validate config and plan both FFT directions
    pub fn new(config: &StftConfig) -> DenoiseResult<Self> {
        config.validate()?;

        let mut planner = RealFftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(config.frame_size);
        let inverse = planner.plan_fft_inverse(config.frame_size);

        Ok(Self {
            frame_size: config.frame_size,
            hop_size: config.hop_size,
            parallel: config.parallel,
            window: hann_window(config.frame_size),
            forward,
            inverse,
        })
    }

    /// Frame size
    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    /// Hop size
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Bins per frame
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2 + 1
    }

    /// Frames produced for a signal of `len` samples
    pub fn num_frames(&self, len: usize) -> usize {
        1 + len / self.hop_size
    }

    /// Samples resynthesized from `frames` frames
    pub fn output_len(&self, frames: usize) -> usize {
        self.hop_size * frames.saturating_sub(1)
    }

    /// Forward transform of a whole signal
    pub fn forward(&self, samples: &[f64]) -> DenoiseResult<Spectrogram> {
        let frames = self.num_frames(samples.len());

        let columns: Vec<Vec<Complex<f64>>> = if self.parallel {
            (0..frames)
                .into_par_iter()
                .map_init(
                    || (self.forward.make_input_vec(), self.forward.make_scratch_vec()),
                    |(input, scratch), frame| -> DenoiseResult<Vec<Complex<f64>>> {
                        let mut spectrum = self.forward.make_output_vec();
                        self.analyze_frame(samples, frame, input, &mut spectrum, scratch)?;
                        Ok(spectrum)
                    },
                )
                .collect::<DenoiseResult<Vec<_>>>()?
        } else {
            let mut input = self.forward.make_input_vec();
            let mut scratch = self.forward.make_scratch_vec();
            (0..frames)
                .map(|frame| -> DenoiseResult<Vec<Complex<f64>>> {
                    let mut spectrum = self.forward.make_output_vec();
                    self.analyze_frame(samples, frame, &mut input, &mut spectrum, &mut scratch)?;
                    Ok(spectrum)
                })
                .collect::<DenoiseResult<Vec<_>>>()?
        };

        let data = Array2::from_shape_fn((self.num_bins(), frames), |(bin, frame)| {
            columns[frame][bin]
        });

        Ok(Spectrogram::from_array(data))
    }

    /// Inverse transform with window-sum normalized overlap-add
    pub fn inverse(&self, spectrogram: &Spectrogram) -> DenoiseResult<Vec<f64>> {
        if spectrogram.bins() != self.num_bins() {
            return Err(DenoiseError::SpectrogramMismatch {
                expected: self.num_bins(),
                got: spectrogram.bins(),
            });
        }

        let frames = spectrogram.frames();
        let padded_len = self.frame_size + self.hop_size * frames.saturating_sub(1);
        let mut accum = vec![0.0; padded_len];
        let mut window_sum = vec![0.0; padded_len];
        let data = spectrogram.as_array();

        for batch_start in (0..frames).step_by(SYNTHESIS_BATCH) {
            let batch_end = (batch_start + SYNTHESIS_BATCH).min(frames);

            let blocks: Vec<Vec<f64>> = if self.parallel {
                (batch_start..batch_end)
                    .into_par_iter()
                    .map_init(
                        || (self.inverse.make_input_vec(), self.inverse.make_scratch_vec()),
                        |(spectrum, scratch), frame| -> DenoiseResult<Vec<f64>> {
                            let mut block = self.inverse.make_output_vec();
                            self.synthesize_frame(data.column(frame), spectrum, &mut block, scratch)?;
                            Ok(block)
                        },
                    )
                    .collect::<DenoiseResult<Vec<_>>>()?
            } else {
                let mut spectrum = self.inverse.make_input_vec();
                let mut scratch = self.inverse.make_scratch_vec();
                (batch_start..batch_end)
                    .map(|frame| -> DenoiseResult<Vec<f64>> {
                        let mut block = self.inverse.make_output_vec();
                        self.synthesize_frame(
                            data.column(frame),
                            &mut spectrum,
                            &mut block,
                            &mut scratch,
                        )?;
                        Ok(block)
                    })
                    .collect::<DenoiseResult<Vec<_>>>()?
            };

            // Summed in frame order regardless of how blocks were computed
            for (offset, block) in blocks.iter().enumerate() {
                let start = (batch_start + offset) * self.hop_size;
                for (i, (&sample, &w)) in block.iter().zip(&self.window).enumerate() {
                    accum[start + i] += sample;
                    window_sum[start + i] += w * w;
                }
            }
        }

        let pad = self.frame_size / 2;
        let len = self.output_len(frames);

        Ok(accum[pad..pad + len]
            .iter()
            .zip(&window_sum[pad..pad + len])
            .map(|(&sample, &norm)| {
                if norm > WINDOW_SUM_EPSILON {
                    sample / norm
                } else {
                    sample
                }
            })
            .collect())
    }

    /// Window one centered frame and transform it
    fn analyze_frame(
        &self,
        samples: &[f64],
        frame: usize,
        input: &mut [f64],
        spectrum: &mut [Complex<f64>],
        scratch: &mut [Complex<f64>],
    ) -> DenoiseResult<()> {
        let pad = self.frame_size / 2;
        let start = frame * self.hop_size;

        for (i, (slot, &w)) in input.iter_mut().zip(&self.window).enumerate() {
            let pos = start + i;
            *slot = if pos >= pad && pos - pad < samples.len() {
                samples[pos - pad] * w
            } else {
                0.0
            };
        }

        self.forward
            .process_with_scratch(input, spectrum, scratch)
            .map_err(|e| DenoiseError::Transform(e.to_string()))
    }

    /// Inverse transform one column and apply the synthesis window
    fn synthesize_frame(
        &self,
        column: ArrayView1<'_, Complex<f64>>,
        spectrum: &mut [Complex<f64>],
        block: &mut [f64],
        scratch: &mut [Complex<f64>],
    ) -> DenoiseResult<()> {
        for (dst, src) in spectrum.iter_mut().zip(column.iter()) {
            *dst = *src;
        }

        // A real signal has purely real DC and Nyquist bins
        spectrum[0].im = 0.0;
        if let Some(last) = spectrum.last_mut() {
            last.im = 0.0;
        }

        self.inverse
            .process_with_scratch(spectrum, block, scratch)
            .map_err(|e| DenoiseError::Transform(e.to_string()))?;

        let norm = 1.0 / self.frame_size as f64;
        for (sample, &w) in block.iter_mut().zip(&self.window) {
            *sample *= norm * w;
        }

        Ok(())
    }
}
