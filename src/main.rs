//! Audio Cleaner command line
//!
//! Usage:
//!   audio-cleaner input.mp3 output.wav
//!   audio-cleaner input.wav output.wav -f 0.6 -d 1.5
//!   audio-cleaner input.flac out/clean.flac --config settings.json --log-level info

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use audio_cleaner::{AudioCleaner, CleanerSettings, setup_logging};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

#[derive(Parser, Debug)]
#[command(
    name = "audio-cleaner",
    version,
    about = "Remove stationary background noise by spectral subtraction"
)]
struct Cli {
    /// Audio file to clean (mp3, wav, flac, ogg, m4a, aiff)
    input_file: PathBuf,

    /// Destination file, .wav or .flac
    output_file: PathBuf,

    /// Noise reduction factor [default: 0.8]
    #[arg(short = 'f', long)]
    noise_factor: Option<f64>,

    /// Seconds at the start used as the noise sample [default: 2.0]
    #[arg(short, long)]
    duration: Option<f64>,

    /// Processing sample rate in Hz [default: 44100]
    #[arg(short, long)]
    sample_rate: Option<u32>,

    /// STFT frame size [default: 2048]
    #[arg(long)]
    frame_size: Option<usize>,

    /// STFT hop size [default: 512]
    #[arg(long)]
    hop_size: Option<usize>,

    /// Output bit depth: 16, 24 or 32 [default: 16]
    #[arg(long)]
    bit_depth: Option<u16>,

    /// JSON settings file; flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file [default: logs/audio_cleaner.log]
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Console log level [default: debug]
    #[arg(long)]
    log_level: Option<String>,

    /// Log file level [default: debug]
    #[arg(long)]
    log_file_level: Option<String>,
}

impl Cli {
    fn settings(&self) -> Result<CleanerSettings> {
        let mut settings = match &self.config {
            Some(path) => CleanerSettings::load(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?,
            None => CleanerSettings::default(),
        };

        let denoise = &mut settings.denoise;
        if let Some(factor) = self.noise_factor {
            denoise.reduce_factor = factor;
        }
        if let Some(seconds) = self.duration {
            denoise.profile_duration_seconds = seconds;
        }
        if let Some(rate) = self.sample_rate {
            denoise.sample_rate = rate;
        }
        if let Some(frame_size) = self.frame_size {
            denoise.frame_size = frame_size;
        }
        if let Some(hop_size) = self.hop_size {
            denoise.hop_size = hop_size;
        }
        if let Some(bits) = self.bit_depth {
            settings.output.bit_depth = bits;
            settings.output.float = false;
        }
        if let Some(file) = &self.log_file {
            settings.log.file = Some(file.clone());
        }
        if let Some(level) = &self.log_level {
            settings.log.level = level.clone();
        }
        if let Some(level) = &self.log_file_level {
            settings.log.file_level = level.clone();
        }

        settings.validate().context("Invalid settings")?;
        Ok(settings)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if !ac_file::validate_audio_file(&cli.input_file) {
        Cli::command()
            .error(
                ErrorKind::ValueValidation,
                format!(
                    "input file '{}' does not exist or is not a supported audio file",
                    cli.input_file.display()
                ),
            )
            .exit();
    }

    let settings = match cli.settings().and_then(|settings| {
        setup_logging(&settings.log).context("Failed to set up logging")?;
        Ok(settings)
    }) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Error processing {}: {:#}", cli.input_file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: CleanerSettings) -> Result<()> {
    log::info!(
        "Audio Cleaner v{} (factor {}, profile {}s, {}Hz, frame {}/{})",
        env!("CARGO_PKG_VERSION"),
        settings.denoise.reduce_factor,
        settings.denoise.profile_duration_seconds,
        settings.denoise.sample_rate,
        settings.denoise.frame_size,
        settings.denoise.hop_size
    );

    let cleaner = AudioCleaner::new(settings).context("Failed to initialize audio cleaner")?;
    let report = cleaner
        .process_file(&cli.input_file, &cli.output_file)
        .context("Failed to clean audio")?;

    log::info!(
        "Wrote {} ({} bytes), load {:.2}s / process {:.2}s / save {:.2}s",
        report.output.display(),
        report.output_bytes,
        report.load_time.as_secs_f64(),
        report.process_time.as_secs_f64(),
        report.save_time.as_secs_f64()
    );
    Ok(())
}
