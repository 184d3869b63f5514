//! Audio Cleaner file I/O
//!
//! - Decoding: hound for WAV, symphonia for MP3 / FLAC / OGG / M4A / AIFF
//! - Mono mixdown and windowed-sinc resampling (rubato) to the processing rate
//! - WAV encoding via hound (16/24/32-bit PCM or 32-bit float)
//! - FLAC encoding via flac-bound (16/24-bit)

pub mod decoder;
pub mod encoder;
pub mod resample;
pub mod validate;

mod error;

pub use decoder::{AudioDecoder, DecodedAudio};
pub use encoder::{AudioEncoder, Container, OutputFormat};
pub use error::{FileError, FileResult};
pub use resample::{mix_to_mono, resample};
pub use validate::{SUPPORTED_EXTENSIONS, ensure_directory, validate_audio_file};
