//! The locator module finds the audio files under a music source directory.

use crate::error::{MinerError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub const SUPPORTED_AUDIO_EXTENSIONS: &[&str] = &[".mp3"];

/// Whether the path has a supported audio extension. The comparison ignores case.
pub fn is_supported_audio_file(p: &Path) -> bool {
    let extension = p
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| format!(".{}", s.to_lowercase()))
        .unwrap_or_default();
    SUPPORTED_AUDIO_EXTENSIONS.contains(&extension.as_str())
}

/// Recursively collect every regular file under `root` with a supported audio extension.
///
/// Fails if `root` itself cannot be traversed. Unreadable entries further down are logged and
/// skipped. The result is sorted, but callers should not rely on any particular order.
pub fn locate_audio_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| MinerError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(MinerError::io(
            root,
            io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                let message = e.to_string();
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, message));
                return Err(MinerError::io(root, source));
            }
            Err(e) => {
                warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };
        if entry.file_type().is_file() && is_supported_audio_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Located {} audio files under {}", files.len(), root.display());
    Ok(files)
}
