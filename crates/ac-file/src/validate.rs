//! Input validation and directory helpers

use std::path::Path;

use crate::error::FileResult;

/// Input extensions accepted by the decoder
pub const SUPPORTED_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a", "aiff", "aif"];

/// File exists and carries a supported extension (case-insensitive)
pub fn validate_audio_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if !path.is_file() {
        log::error!("File does not exist: {}", path.display());
        return false;
    }

    let supported = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| s.eq_ignore_ascii_case(ext))
        });
    if !supported {
        log::error!("Unsupported file format: {}", path.display());
    }
    supported
}

/// Create `path` and all parents; no-op when it already exists
pub fn ensure_directory(path: impl AsRef<Path>) -> FileResult<()> {
    std::fs::create_dir_all(path.as_ref())?;
    Ok(())
}
