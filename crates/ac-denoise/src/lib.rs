//! Audio Cleaner spectral subtraction core
//!
//! Removes stationary background noise from a mono, pre-loaded signal:
//!
//! ## Noise Profile
//! - Leading noise-only segment, clamped to the signal length
//! - Mean STFT magnitude per frequency bin
//!
//! ## Spectral Subtraction
//! - Scaled profile subtracted from every frame, floored at zero
//! - Original phase kept
//! - Centered Hann STFT with window-sum normalized overlap-add
//!
//! The core never touches files and never logs. Diagnostics are delivered
//! through [`DenoiseObserver`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ac_denoise::{DenoiseConfig, NoiseReducer, Signal};
//!
//! let reducer = NoiseReducer::new(DenoiseConfig::default())?;
//! let signal = Signal::new(samples, 44100)?;
//! let result = reducer.process(&signal, 0.8, 2.0)?;
//! println!("power reduction: {}", result.power_reduction);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod observer;
pub mod profile;
pub mod reducer;
pub mod signal;
pub mod spectrogram;
pub mod stats;
pub mod stft;
pub mod subtract;

mod error;

pub use config::{DenoiseConfig, StftConfig};
pub use error::{DenoiseError, DenoiseResult};
pub use observer::{Checkpoint, DegenerateInput, DenoiseObserver, NullObserver, RecordingObserver};
pub use profile::NoiseProfile;
pub use reducer::{NoiseReducer, ProcessingResult};
pub use signal::Signal;
pub use spectrogram::Spectrogram;
pub use stats::{PowerReduction, StageTimings};
pub use stft::Stft;
