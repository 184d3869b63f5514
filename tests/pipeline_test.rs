//! End-to-end file pipeline tests

use std::path::Path;

use ac_denoise::PowerReduction;
use ac_file::{AudioDecoder, FileError};
use audio_cleaner::{AudioCleaner, CleanerError, CleanerSettings};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Tone from `tone_start` seconds on, over seeded white noise
fn write_noisy_tone(path: &Path, rate: u32, channels: u16, seconds: f64, tone_start: f64) -> usize {
    let spec = hound::WavSpec {
        channels,
        sample_rate: rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut rng = StdRng::seed_from_u64(7);
    let mut writer = hound::WavWriter::create(path, spec).unwrap();

    let frames = (seconds * rate as f64) as usize;
    for i in 0..frames {
        let t = i as f64 / rate as f64;
        let tone = if t >= tone_start {
            0.5 * (2.0 * std::f64::consts::PI * 440.0 * t).sin()
        } else {
            0.0
        };
        for _ in 0..channels {
            let noise: f64 = rng.random_range(-0.1..0.1);
            writer
                .write_sample(((tone + noise) * 32767.0) as i16)
                .unwrap();
        }
    }
    writer.finalize().unwrap();
    frames
}

fn read_samples(path: &Path) -> (hound::WavSpec, Vec<i16>) {
    let mut reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let samples = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    (spec, samples)
}

#[test]
fn test_clean_mono_wav() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("noisy.wav");
    let output = dir.path().join("cleaned").join("deep").join("clean.wav");
    let frames = write_noisy_tone(&input, 44100, 1, 3.0, 1.0);

    let mut settings = CleanerSettings::default();
    settings.denoise.profile_duration_seconds = 1.0;
    let cleaner = AudioCleaner::new(settings).unwrap();
    let report = cleaner.process_file(&input, &output).unwrap();

    assert!(output.is_file());
    assert_eq!(report.input_samples, frames);
    assert_eq!(report.output_samples, 512 * (frames / 512));
    assert_eq!(report.output_bytes, std::fs::metadata(&output).unwrap().len());
    assert!(report.power_reduction.as_db().unwrap() > 0.0);

    let (spec, samples) = read_samples(&output);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(samples.len(), report.output_samples);
}

#[test]
fn test_stereo_input_resampled() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("stereo_48k.wav");
    let output = dir.path().join("out.wav");
    write_noisy_tone(&input, 48000, 2, 2.0, 0.5);

    let mut settings = CleanerSettings::default();
    settings.denoise.profile_duration_seconds = 0.5;
    settings.output.bit_depth = 24;
    let report = AudioCleaner::new(settings)
        .unwrap()
        .process_file(&input, &output)
        .unwrap();

    assert_eq!(report.sample_rate, 44100);
    assert_eq!(report.input_samples, 88200);

    let reader = hound::WavReader::open(&output).unwrap();
    assert_eq!(reader.spec().channels, 1);
    assert_eq!(reader.spec().sample_rate, 44100);
    assert_eq!(reader.spec().bits_per_sample, 24);
    assert_eq!(reader.len() as usize, report.output_samples);
}

#[test]
fn test_silent_input_completes() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("silence.wav");
    let output = dir.path().join("silence_out.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 44100,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&input, spec).unwrap();
    for _ in 0..44100 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let report = AudioCleaner::new(CleanerSettings::default())
        .unwrap()
        .process_file(&input, &output)
        .unwrap();
    assert_eq!(report.power_reduction, PowerReduction::Undefined);

    let (_, samples) = read_samples(&output);
    assert!(samples.iter().all(|&s| s == 0));
}

#[test]
fn test_clean_to_flac() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.flac");
    write_noisy_tone(&input, 44100, 1, 2.0, 0.5);

    let mut settings = CleanerSettings::default();
    settings.denoise.profile_duration_seconds = 0.5;
    settings.output.bit_depth = 24;
    let report = AudioCleaner::new(settings)
        .unwrap()
        .process_file(&input, &output)
        .unwrap();

    assert_eq!(report.output_bytes, std::fs::metadata(&output).unwrap().len());
    let decoded = AudioDecoder::new().decode(&output).unwrap();
    assert_eq!(decoded.num_channels(), 1);
    assert_eq!(decoded.sample_rate, 44100);
    assert_eq!(decoded.num_samples(), report.output_samples);
}

#[test]
fn test_unsupported_output_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.ogg");
    write_noisy_tone(&input, 44100, 1, 0.5, 0.0);

    let err = AudioCleaner::new(CleanerSettings::default())
        .unwrap()
        .process_file(&input, &output)
        .unwrap_err();
    assert!(matches!(
        err,
        CleanerError::File(FileError::UnsupportedFormat(_))
    ));
    assert!(!output.exists());
}
