//! Decoder backend agreement and full save/load cycles

use std::path::Path;

use ac_denoise::Signal;
use ac_file::{AudioDecoder, AudioEncoder, FileError, OutputFormat};
use approx::assert_abs_diff_eq;

fn sine(len: usize, rate: u32) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 * (2.0 * std::f64::consts::PI * 440.0 * i as f64 / rate as f64).sin())
        .collect()
}

fn write_stereo(path: &Path, left: &[f64], right: &[f64], rate: u32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample((l * 32767.0) as i16).unwrap();
        writer.write_sample((r * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_symphonia_and_hound_agree() {
    let dir = tempfile::tempdir().unwrap();
    let left = sine(4410, 44100);
    let right: Vec<f64> = left.iter().map(|s| -s).collect();

    // Same RIFF bytes; the extension decides which backend reads them
    let wav_path = dir.path().join("clip.wav");
    let riff_path = dir.path().join("clip.riff");
    write_stereo(&wav_path, &left, &right, 44100);
    std::fs::copy(&wav_path, &riff_path).unwrap();

    let decoder = AudioDecoder::new();
    let via_hound = decoder.decode(&wav_path).unwrap();
    let via_symphonia = decoder.decode(&riff_path).unwrap();

    assert_eq!(via_symphonia.sample_rate, 44100);
    assert_eq!(via_symphonia.num_channels(), 2);
    assert_eq!(via_symphonia.num_samples(), via_hound.num_samples());
    for (a, b) in via_symphonia.channels[1].iter().zip(&via_hound.channels[1]) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-9);
    }

    // Opposite channels cancel in the mixdown
    let mono = decoder.load_signal(&wav_path, 44100).unwrap();
    assert!(mono.peak() < 1e-3);
}

#[test]
fn test_save_then_load_at_other_rate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("tone.wav");

    let signal = Signal::new(sine(48000, 48000), 48000).unwrap();
    AudioEncoder::new(OutputFormat::pcm(24))
        .unwrap()
        .save(&signal, &path, None)
        .unwrap();

    let loaded = AudioDecoder::new().load_signal(&path, 44100).unwrap();
    assert_eq!(loaded.sample_rate(), 44100);
    assert_eq!(loaded.len(), 44100);
    assert_abs_diff_eq!(loaded.duration(), signal.duration(), epsilon = 1e-4);
    assert_abs_diff_eq!(loaded.peak(), 0.5, epsilon = 1e-2);
}

#[test]
fn test_unrecognized_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.ogg");
    std::fs::write(&path, vec![0x5au8; 4096]).unwrap();

    let err = AudioDecoder::new().decode(&path).unwrap_err();
    assert!(matches!(
        err,
        FileError::UnsupportedFormat(_) | FileError::ReadError { .. }
    ));
}

/// Minimal 16-bit mono AIFF: FORM / COMM / SSND
fn write_aiff(path: &Path, samples: &[i16], rate: u32) {
    // 80-bit extended sample rate
    let exponent = 31 - rate.leading_zeros();
    let mut rate_bytes = Vec::with_capacity(10);
    rate_bytes.extend_from_slice(&((16383 + exponent) as u16).to_be_bytes());
    rate_bytes.extend_from_slice(&((rate as u64) << (63 - exponent)).to_be_bytes());

    let mut comm = Vec::new();
    comm.extend_from_slice(&1u16.to_be_bytes());
    comm.extend_from_slice(&(samples.len() as u32).to_be_bytes());
    comm.extend_from_slice(&16u16.to_be_bytes());
    comm.extend_from_slice(&rate_bytes);

    let mut ssnd = vec![0u8; 8];
    for s in samples {
        ssnd.extend_from_slice(&s.to_be_bytes());
    }

    let mut body = b"AIFF".to_vec();
    for (id, chunk) in [(b"COMM", &comm), (b"SSND", &ssnd)] {
        body.extend_from_slice(id);
        body.extend_from_slice(&(chunk.len() as u32).to_be_bytes());
        body.extend_from_slice(chunk);
    }

    let mut file = b"FORM".to_vec();
    file.extend_from_slice(&(body.len() as u32).to_be_bytes());
    file.extend_from_slice(&body);
    std::fs::write(path, file).unwrap();
}

#[test]
fn test_aiff_input_accepted_and_decoded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.aiff");
    let samples: Vec<i16> = sine(800, 8000).iter().map(|s| (s * 32767.0) as i16).collect();
    write_aiff(&path, &samples, 8000);

    assert!(ac_file::validate_audio_file(&path));
    let decoded = AudioDecoder::new().decode(&path).unwrap();
    assert_eq!(decoded.sample_rate, 8000);
    assert_eq!(decoded.num_channels(), 1);
    assert_eq!(decoded.num_samples(), 800);
    for (a, &b) in decoded.channels[0].iter().zip(&samples) {
        assert_abs_diff_eq!(*a, b as f64 / 32768.0, epsilon = 1e-9);
    }
}
