use crate::error::AppError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const IMAGE_EXTENSION: &str = "png";

/// Regular files directly inside `folder`, ordered by file name.
pub fn collect_rename_targets(folder: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !folder.is_dir() {
        return Err(AppError::NotFound(folder.to_path_buf()));
    }
    let mut files = list_files(folder)?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `.png` files (any case) directly inside `folder`, ordered by file name.
/// Paths are `folder` joined with the file name, not canonicalized.
pub fn collect_images(folder: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !folder.is_dir() {
        return Err(AppError::NotFound(folder.to_path_buf()));
    }
    let mut images: Vec<PathBuf> = list_files(folder)?
        .into_iter()
        .filter(|path| has_extension(path, IMAGE_EXTENSION))
        .collect();
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    for image in &images {
        tracing::info!("Found image: {}", image.display());
    }
    Ok(images)
}

fn list_files(folder: &Path) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(folder).min_depth(1).max_depth(1) {
        let entry = entry
            .map_err(|e| AppError::Io(format!("failed to read {}: {}", folder.display(), e)))?;
        let path = folder.join(entry.file_name());
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_ascii_lowercase().ends_with(&format!(".{}", wanted)))
        .unwrap_or(false)
}
