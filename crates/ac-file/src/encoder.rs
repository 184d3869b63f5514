//! Mono audio encoding: WAV via hound, FLAC via flac-bound

use std::path::Path;

use ac_denoise::Signal;
use serde::{Deserialize, Serialize};

use crate::error::{FileError, FileResult};
use crate::resample::resample;
use crate::validate::ensure_directory;

/// Highest bit depth written to FLAC
const FLAC_MAX_BITS: u16 = 24;
/// Frames per FLAC `process_interleaved` call
const FLAC_BLOCK_SIZE: usize = 4096;
const FLAC_COMPRESSION_LEVEL: u32 = 5;

/// Output sample format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputFormat {
    /// 16, 24 or 32
    pub bit_depth: u16,
    /// IEEE float samples (32-bit WAV only)
    pub float: bool,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self {
            bit_depth: 16,
            float: false,
        }
    }
}

impl OutputFormat {
    pub fn pcm(bit_depth: u16) -> Self {
        Self {
            bit_depth,
            float: false,
        }
    }

    pub fn float32() -> Self {
        Self {
            bit_depth: 32,
            float: true,
        }
    }

    pub fn validate(&self) -> FileResult<()> {
        match (self.bit_depth, self.float) {
            (16 | 24 | 32, false) | (32, true) => Ok(()),
            (bits, float) => Err(FileError::UnsupportedFormat(format!(
                "{}-bit {} output",
                bits,
                if float { "float" } else { "PCM" }
            ))),
        }
    }

    /// Bit depth used for FLAC, which stores integers of at most 24 bits
    pub fn flac_bits(&self) -> u16 {
        self.bit_depth.min(FLAC_MAX_BITS)
    }

    fn wav_spec(&self, sample_rate: u32) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: self.bit_depth,
            sample_format: if self.float {
                hound::SampleFormat::Float
            } else {
                hound::SampleFormat::Int
            },
        }
    }
}

/// Output container, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    Wav,
    Flac,
}

impl Container {
    /// Container for `path`, or `UnsupportedFormat` for any other extension
    pub fn from_path(path: &Path) -> FileResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("wav") => Ok(Self::Wav),
            Some("flac") => Ok(Self::Flac),
            _ => Err(FileError::UnsupportedFormat(format!(
                "{}: output must be .wav or .flac",
                path.display()
            ))),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }
}

fn to_int(sample: f64, bits: u16) -> i32 {
    let max_val = ((1i64 << (bits - 1)) - 1) as f64;
    (sample.clamp(-1.0, 1.0) * max_val).round() as i32
}

/// Mono WAV / FLAC writer
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioEncoder {
    format: OutputFormat,
}

impl AudioEncoder {
    pub fn new(format: OutputFormat) -> FileResult<Self> {
        format.validate()?;
        Ok(Self { format })
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Check that `path` names a writable container without touching disk
    pub fn check_output(path: impl AsRef<Path>) -> FileResult<Container> {
        Container::from_path(path.as_ref())
    }

    /// Write `signal` to `path`, returning the file size in bytes
    ///
    /// The container follows the extension (`.wav` or `.flac`). Parent
    /// directories are created. With `sample_rate` set and different from the
    /// signal's rate, the signal is resampled first.
    pub fn save(
        &self,
        signal: &Signal,
        path: impl AsRef<Path>,
        sample_rate: Option<u32>,
    ) -> FileResult<u64> {
        let path = path.as_ref();
        let container = Container::from_path(path)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent)?;
        }

        let target_rate = sample_rate.unwrap_or(signal.sample_rate());
        let resampled;
        let samples = if target_rate != signal.sample_rate() {
            log::debug!(
                "Resampling output {}Hz -> {}Hz",
                signal.sample_rate(),
                target_rate
            );
            resampled = resample(signal.samples(), signal.sample_rate(), target_rate)?;
            &resampled[..]
        } else {
            signal.samples()
        };

        match container {
            Container::Wav => self.write_wav(samples, target_rate, path)?,
            Container::Flac => self.write_flac(samples, target_rate, path)?,
        }

        let bytes = std::fs::metadata(path)?.len();
        log::debug!(
            "Wrote {} samples to {} ({} bytes, {})",
            samples.len(),
            path.display(),
            bytes,
            container.extension()
        );
        Ok(bytes)
    }

    fn write_wav(&self, samples: &[f64], sample_rate: u32, path: &Path) -> FileResult<()> {
        let mut writer = hound::WavWriter::create(path, self.format.wav_spec(sample_rate))
            .map_err(|e| FileError::write(path, e))?;

        match (self.format.bit_depth, self.format.float) {
            (32, true) => {
                for &sample in samples {
                    writer
                        .write_sample(sample as f32)
                        .map_err(|e| FileError::write(path, e))?;
                }
            }
            (16, false) => {
                for &sample in samples {
                    writer
                        .write_sample(to_int(sample, 16) as i16)
                        .map_err(|e| FileError::write(path, e))?;
                }
            }
            (bits, false) => {
                for &sample in samples {
                    writer
                        .write_sample(to_int(sample, bits))
                        .map_err(|e| FileError::write(path, e))?;
                }
            }
            (bits, true) => {
                return Err(FileError::UnsupportedFormat(format!("{}-bit float WAV", bits)));
            }
        }

        writer.finalize().map_err(|e| FileError::write(path, e))
    }

    fn write_flac(&self, samples: &[f64], sample_rate: u32, path: &Path) -> FileResult<()> {
        let bits = self.format.flac_bits();
        if bits != self.format.bit_depth || self.format.float {
            log::warn!(
                "FLAC stores at most {}-bit integers, writing {} at {} bits",
                FLAC_MAX_BITS,
                path.display(),
                bits
            );
        }

        let bytes = encode_flac(samples, sample_rate, bits).map_err(|e| FileError::write(path, e))?;
        std::fs::write(path, bytes).map_err(|e| FileError::write(path, e))
    }
}

fn encode_flac(samples: &[f64], sample_rate: u32, bits: u16) -> Result<Vec<u8>, String> {
    use flac_bound::{FlacEncoder, WriteWrapper};

    let mut output = Vec::new();

    let encoder_config = FlacEncoder::new()
        .ok_or_else(|| "FLAC encoder init failed".to_string())?
        .channels(1)
        .sample_rate(sample_rate)
        .bits_per_sample(bits as u32)
        .compression_level(FLAC_COMPRESSION_LEVEL);

    let mut wrapper = WriteWrapper(&mut output);
    let mut encoder = encoder_config
        .init_write(&mut wrapper)
        .map_err(|e| format!("FLAC init write failed: {:?}", e))?;

    let ints: Vec<i32> = samples.iter().map(|&s| to_int(s, bits)).collect();
    for block in ints.chunks(FLAC_BLOCK_SIZE) {
        encoder
            .process_interleaved(block, block.len() as u32)
            .map_err(|e| format!("FLAC process failed: {:?}", e))?;
    }

    encoder
        .finish()
        .map_err(|e| format!("FLAC finish failed: {:?}", e))?;

    Ok(output)
}
