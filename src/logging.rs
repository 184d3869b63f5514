//! Logger setup
//!
//! Console lines go through env_logger on stderr at the configured level
//! (`RUST_LOG` overrides it). The optional log file has its own level, rotates
//! by size and drops rotated files past the retention period. Both share one
//! line format:
//!
//! ```text
//! 2026-01-31 14:02:11 | INFO     | audio_cleaner::pipeline:88 - Cleaned input.wav
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

use chrono::Local;
use env_logger::Builder;
use log::{LevelFilter, Log, Metadata, Record};

use crate::error::{CleanerError, CleanerResult};
use crate::settings::LogSettings;

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Install the global logger
///
/// Fails if a logger is already installed, a level name is unknown or the log
/// file cannot be opened.
pub fn setup_logging(settings: &LogSettings) -> CleanerResult<()> {
    let file = match settings.file.as_deref() {
        Some(path) => {
            let retention = Duration::from_secs(settings.retention_days * SECONDS_PER_DAY);
            match prune_rotated(path, retention) {
                Ok(0) => {}
                Ok(removed) => eprintln!("Removed {} expired log files", removed),
                Err(e) => eprintln!("Cannot prune old logs next to {}: {}", path.display(), e),
            }
            Some(LogFile::open(
                path,
                settings.file_level_filter()?,
                settings.rotation_bytes,
            )?)
        }
        None => None,
    };

    let logger = CleanerLogger::new(settings.level_filter()?, file);
    let max_level = logger.max_level();
    log::set_boxed_logger(Box::new(logger)).map_err(|e| CleanerError::Logging(e.to_string()))?;
    log::set_max_level(max_level);

    if let Some(path) = settings.file.as_deref() {
        log::debug!("Logging to {}", path.display());
    }
    Ok(())
}

/// stderr through env_logger plus an optional file with its own filter
struct CleanerLogger {
    console: env_logger::Logger,
    file: Option<LogFile>,
}

impl CleanerLogger {
    fn new(console_level: LevelFilter, file: Option<LogFile>) -> Self {
        let console = Builder::new()
            .filter_level(console_level)
            .parse_default_env()
            .format(|buf, record| write_line(buf, record))
            .build();
        Self { console, file }
    }

    fn max_level(&self) -> LevelFilter {
        let file_level = self.file.as_ref().map_or(LevelFilter::Off, |f| f.level);
        self.console.filter().max(file_level)
    }
}

impl Log for CleanerLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata)
            || self
                .file
                .as_ref()
                .is_some_and(|f| metadata.level() <= f.level)
    }

    fn log(&self, record: &Record) {
        if self.console.matches(record) {
            self.console.log(record);
        }
        if let Some(file) = &self.file {
            if record.level() <= file.level {
                if let Err(e) = file.write_record(record) {
                    eprintln!("Cannot write to {}: {}", file.path.display(), e);
                }
            }
        }
    }

    fn flush(&self) {
        self.console.flush();
        if let Some(file) = &self.file {
            if let Ok(mut state) = file.state.lock() {
                let _ = state.file.flush();
            }
        }
    }
}

/// Append-only log file rotated once it would grow past `max_bytes`
struct LogFile {
    path: PathBuf,
    level: LevelFilter,
    /// 0 disables rotation
    max_bytes: u64,
    state: Mutex<FileState>,
}

struct FileState {
    file: File,
    written: u64,
}

impl LogFile {
    fn open(path: &Path, level: LevelFilter, max_bytes: u64) -> CleanerResult<Self> {
        let file = open_log_file(path)?;
        let written = file.metadata().map(|m| m.len()).unwrap_or(0);
        Ok(Self {
            path: path.to_path_buf(),
            level,
            max_bytes,
            state: Mutex::new(FileState { file, written }),
        })
    }

    fn write_record(&self, record: &Record) -> io::Result<()> {
        let mut line = Vec::new();
        write_line(&mut line, record)?;

        let mut state = self
            .state
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        let len = line.len() as u64;
        if self.max_bytes > 0 && state.written > 0 && state.written + len > self.max_bytes {
            state.file.flush()?;
            std::fs::rename(&self.path, rotated_path(&self.path))?;
            state.file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            state.written = 0;
        }
        state.file.write_all(&line)?;
        state.written += len;
        Ok(())
    }
}

fn open_log_file(path: &Path) -> CleanerResult<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CleanerError::Logging(format!("{}: {}", path.display(), e)))
}

/// `logs/run.log` -> `logs/run.2026-01-31_14-02-11_123456.log`
fn rotated_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S_%6f");
    let name = match path.extension() {
        Some(ext) => format!("{}.{}.{}", stem, stamp, ext.to_string_lossy()),
        None => format!("{}.{}", stem, stamp),
    };
    path.with_file_name(name)
}

/// Delete rotated siblings of `path` last modified more than `retention` ago
fn prune_rotated(path: &Path, retention: Duration) -> io::Result<usize> {
    let Some(name) = path.file_name() else {
        return Ok(0);
    };
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let prefix = format!("{}.", stem);
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) if parent.is_dir() => parent,
        Some(_) => return Ok(0),
        None => Path::new("."),
    };

    let now = SystemTime::now();
    let mut removed = 0;
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let entry_name = entry.file_name();
        if entry_name.as_os_str() == name || !entry_name.to_string_lossy().starts_with(&prefix) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        if now.duration_since(modified).unwrap_or_default() > retention {
            std::fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// `timestamp | LEVEL | module:line - message`
fn write_line(out: &mut impl Write, record: &Record) -> io::Result<()> {
    writeln!(
        out,
        "{} | {:<8} | {}:{} - {}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        record.level(),
        record.module_path().unwrap_or_else(|| record.target()),
        record.line().unwrap_or(0),
        record.args()
    )
}
