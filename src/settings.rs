//! Application settings
//!
//! Loaded from JSON; every section and field is optional and falls back to
//! its default. Command line flags are applied on top by the binary.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ac_denoise::DenoiseConfig;
use ac_file::OutputFormat;
use serde::{Deserialize, Serialize};

use crate::error::{CleanerError, CleanerResult};

/// Default log file location
pub const DEFAULT_LOG_FILE: &str = "logs/audio_cleaner.log";

/// Default console log level
pub const DEFAULT_LOG_LEVEL: &str = "debug";

/// Default log file level
pub const DEFAULT_FILE_LOG_LEVEL: &str = "debug";

/// Log file size that triggers rotation
pub const DEFAULT_ROTATION_BYTES: u64 = 10 * 1024 * 1024;

/// Rotated log files older than this are deleted at startup
pub const DEFAULT_RETENTION_DAYS: u64 = 7;

/// Logging section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Console level name (`error`, `warn`, `info`, `debug`, `trace`, `off`)
    pub level: String,
    /// Log file; `None` logs to stderr only
    pub file: Option<PathBuf>,
    /// Log file level name, independent of the console level
    pub file_level: String,
    /// Rotate the log file once it would exceed this size; 0 never rotates
    pub rotation_bytes: u64,
    /// Days to keep rotated log files
    pub retention_days: u64,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
            file_level: DEFAULT_FILE_LOG_LEVEL.to_string(),
            rotation_bytes: DEFAULT_ROTATION_BYTES,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl LogSettings {
    /// Parsed console level filter
    pub fn level_filter(&self) -> CleanerResult<log::LevelFilter> {
        parse_level(&self.level)
    }

    /// Parsed log file level filter
    pub fn file_level_filter(&self) -> CleanerResult<log::LevelFilter> {
        parse_level(&self.file_level)
    }
}

fn parse_level(name: &str) -> CleanerResult<log::LevelFilter> {
    log::LevelFilter::from_str(name)
        .map_err(|_| CleanerError::Settings(format!("unknown log level '{}'", name)))
}

/// Full application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerSettings {
    pub denoise: DenoiseConfig,
    pub output: OutputFormat,
    pub log: LogSettings,
}

impl CleanerSettings {
    /// Parse from a JSON string
    pub fn from_json(json: &str) -> CleanerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> CleanerResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            CleanerError::Settings(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Serialize as pretty JSON
    pub fn to_json(&self) -> CleanerResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section
    pub fn validate(&self) -> CleanerResult<()> {
        self.denoise.validate()?;
        self.output.validate()?;
        self.log.level_filter()?;
        self.log.file_level_filter()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CleanerSettings::default();
        assert_eq!(settings.denoise.sample_rate, 44100);
        assert_eq!(settings.output.bit_depth, 16);
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.file, Some(PathBuf::from(DEFAULT_LOG_FILE)));
        assert_eq!(settings.log.file_level, "debug");
        assert_eq!(settings.log.rotation_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.log.retention_days, 7);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let settings = CleanerSettings::from_json(
            r#"{ "denoise": { "reduce_factor": 0.5 }, "output": { "bit_depth": 24 }, "log": { "file": null } }"#,
        )
        .unwrap();
        assert_eq!(settings.denoise.reduce_factor, 0.5);
        assert_eq!(settings.denoise.frame_size, 2048);
        assert_eq!(settings.output.bit_depth, 24);
        assert_eq!(settings.log.file, None);
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.file_level, "debug");
    }

    #[test]
    fn test_console_and_file_levels_separate() {
        let settings = CleanerSettings::from_json(
            r#"{ "log": { "level": "warn", "file_level": "trace", "rotation_bytes": 0 } }"#,
        )
        .unwrap();
        assert_eq!(settings.log.level_filter().unwrap(), log::LevelFilter::Warn);
        assert_eq!(settings.log.file_level_filter().unwrap(), log::LevelFilter::Trace);
        assert_eq!(settings.log.rotation_bytes, 0);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut settings = CleanerSettings::default();
        settings.denoise.hop_size = 256;
        let parsed = CleanerSettings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_invalid_sections() {
        let mut settings = CleanerSettings::default();
        settings.log.level = "loud".to_string();
        assert!(matches!(settings.validate(), Err(CleanerError::Settings(_))));

        let mut settings = CleanerSettings::default();
        settings.log.file_level = "chatty".to_string();
        assert!(matches!(settings.validate(), Err(CleanerError::Settings(_))));

        let mut settings = CleanerSettings::default();
        settings.output.bit_depth = 8;
        assert!(matches!(settings.validate(), Err(CleanerError::File(_))));

        let mut settings = CleanerSettings::default();
        settings.denoise.hop_size = 0;
        assert!(matches!(settings.validate(), Err(CleanerError::Denoise(_))));

        assert!(matches!(
            CleanerSettings::from_json("{ not json"),
            Err(CleanerError::Json(_))
        ));
    }
}
