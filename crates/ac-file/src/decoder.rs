//! Audio decoding
//!
//! WAV goes through hound for exact integer/float handling, everything else
//! through symphonia's probe.

use std::fs::File;
use std::path::Path;

use ac_denoise::Signal;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::{FileError, FileResult};
use crate::resample::{mix_to_mono, resample};

/// Decoded multichannel audio at its native rate
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Samples per channel, normalized to [-1, 1]
    pub channels: Vec<Vec<f64>>,
    /// Native sample rate in Hz
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples() as f64 / self.sample_rate as f64
    }

    /// Channel average
    pub fn to_mono(&self) -> Vec<f64> {
        mix_to_mono(&self.channels)
    }
}

/// Stateless file decoder
#[derive(Debug, Clone, Copy, Default)]
pub struct AudioDecoder;

impl AudioDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode a file into per-channel samples
    pub fn decode(&self, path: impl AsRef<Path>) -> FileResult<DecodedAudio> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(FileError::InputNotFound(path.to_path_buf()));
        }

        let is_wav = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"));

        let decoded = if is_wav {
            decode_wav(path)?
        } else {
            decode_symphonia(path)?
        };

        log::debug!(
            "Decoded {}: {} channel(s), {} samples @ {}Hz ({:.2}s)",
            path.display(),
            decoded.num_channels(),
            decoded.num_samples(),
            decoded.sample_rate,
            decoded.duration()
        );
        Ok(decoded)
    }

    /// Decode, mix to mono and bring to `target_rate`
    pub fn load_signal(&self, path: impl AsRef<Path>, target_rate: u32) -> FileResult<Signal> {
        let decoded = self.decode(path)?;
        let mono = decoded.to_mono();

        let samples = if decoded.sample_rate != target_rate {
            log::debug!(
                "Resampling {}Hz -> {}Hz",
                decoded.sample_rate,
                target_rate
            );
            resample(&mono, decoded.sample_rate, target_rate)?
        } else {
            mono
        };

        Ok(Signal::new(samples, target_rate)?)
    }
}

fn decode_wav(path: &Path) -> FileResult<DecodedAudio> {
    let reader = hound::WavReader::open(path).map_err(|e| FileError::read(path, e))?;
    let spec = reader.spec();
    let num_channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(|e| FileError::read(path, e))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<Result<_, _>>()
                .map_err(|e| FileError::read(path, e))?
        }
    };

    let mut channels = vec![Vec::with_capacity(interleaved.len() / num_channels); num_channels];
    for (i, sample) in interleaved.into_iter().enumerate() {
        channels[i % num_channels].push(sample);
    }

    Ok(DecodedAudio {
        channels,
        sample_rate: spec.sample_rate,
    })
}

fn decode_symphonia(path: &Path) -> FileResult<DecodedAudio> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| match e {
            SymphoniaError::Unsupported(what) => {
                FileError::UnsupportedFormat(format!("{}: {}", path.display(), what))
            }
            other => FileError::read(path, other),
        })?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| FileError::read(path, "no audio track"))?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| FileError::read(path, "unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| FileError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;

    let mut channels: Vec<Vec<f64>> = Vec::new();
    let mut buffer: Option<SampleBuffer<f64>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => return Err(FileError::read(path, e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // Corrupt packet, skip it and keep going
            Err(SymphoniaError::DecodeError(msg)) => {
                log::warn!("{}: skipping undecodable packet: {}", path.display(), msg);
                continue;
            }
            Err(e) => return Err(FileError::read(path, e)),
        };

        let spec = *decoded.spec();
        let num_channels = spec.channels.count().max(1);
        if channels.is_empty() {
            channels = vec![Vec::new(); num_channels];
        }

        let frames = decoded.capacity();
        if buffer
            .as_ref()
            .is_none_or(|buf| buf.capacity() < frames * num_channels)
        {
            buffer = Some(SampleBuffer::new(frames as u64, spec));
        }
        let Some(buf) = buffer.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        for (i, &sample) in buf.samples().iter().enumerate() {
            if let Some(channel) = channels.get_mut(i % num_channels) {
                channel.push(sample);
            }
        }
    }

    Ok(DecodedAudio {
        channels,
        sample_rate,
    })
}
