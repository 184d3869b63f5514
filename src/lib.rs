//! Audio Cleaner
//!
//! Command-line noise reduction: decode an audio file, learn a noise profile
//! from its opening seconds, remove it by spectral subtraction and write the
//! result as WAV or FLAC.

pub mod error;
pub mod logging;
pub mod observer;
pub mod pipeline;
pub mod settings;

pub use error::{CleanerError, CleanerResult};
pub use logging::setup_logging;
pub use observer::LogObserver;
pub use pipeline::{AudioCleaner, FileReport};
pub use settings::{CleanerSettings, LogSettings};
