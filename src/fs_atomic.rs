use crate::error::AppError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `bytes` next to `destination` first, then renames over it, so the
/// destination is either untouched or complete. An existing file is replaced.
pub fn atomic_write_replace(destination: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let temp = staging_path_for(destination, "partial");
    if let Err(error) = fs::write(&temp, bytes) {
        let _ = fs::remove_file(&temp);
        return Err(AppError::Io(format!(
            "failed to write {}: {}",
            temp.display(),
            error
        )));
    }
    // std's rename replaces an existing target on every platform.
    fs::rename(&temp, destination).map_err(|error| {
        let _ = fs::remove_file(&temp);
        AppError::Io(format!(
            "failed to replace {}: {}",
            destination.display(),
            error
        ))
    })
}

/// Hidden sibling of `path` (`.{name}.{tag}-{nanos}-{n}`) that does not exist yet.
pub fn staging_path_for(path: &Path, tag: &str) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    let stamp = Local::now().timestamp_nanos_opt().unwrap_or(0);
    let mut attempt = 0u32;
    loop {
        let candidate_name = format!(".{}.{}-{}-{}", name, tag, stamp, attempt);
        let candidate = path
            .parent()
            .map_or_else(|| PathBuf::from(&candidate_name), |dir| dir.join(&candidate_name));
        if fs::symlink_metadata(&candidate).is_err() {
            return candidate;
        }
        attempt += 1;
    }
}
