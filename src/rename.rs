use crate::error::AppError;
use crate::file_collect::collect_rename_targets;
use crate::fs_atomic::staging_path_for;
use crate::model::{
    ExecuteStatus, OperationProgressEvent, RenameExecuteDetail, RenameExecuteResponse,
    RenameRequest,
};
use chrono::{DateTime, Local};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct PlannedRename {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub modified: Option<DateTime<Local>>,
}

impl PlannedRename {
    fn is_unchanged(&self) -> bool {
        self.source == self.destination
    }
}

/// `{prefix}{index:03}{suffix}{extension}`; `extension` carries its dot.
pub fn frame_file_name(prefix: &str, index: u32, suffix: &str, extension: &str) -> String {
    format!("{}{:03}{}{}", prefix, index, suffix, extension)
}

/// Recovers the sequence number from a name produced by [`frame_file_name`].
pub fn parse_frame_index(file_name: &str, prefix: &str, suffix: &str) -> Option<u32> {
    let pattern = format!(
        r"^{}(\d{{3,}}){}(?:\.[^.]*)?$",
        regex::escape(prefix),
        regex::escape(suffix)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(file_name)?.get(1)?.as_str().parse().ok()
}

pub fn plan_renames(request: &RenameRequest) -> Result<Vec<PlannedRename>, AppError> {
    let files = collect_rename_targets(&request.folder)?;
    if files.is_empty() {
        return Err(AppError::Precondition(format!(
            "Folder {} contains no files",
            request.folder.display()
        )));
    }

    let mut dated: Vec<(PathBuf, Option<DateTime<Local>>)> = files
        .into_iter()
        .map(|file| {
            let modified = read_modified_datetime(&file);
            if modified.is_none() {
                tracing::warn!(
                    "Cannot read modification time of {}, ordering it last",
                    file.display()
                );
            }
            (file, modified)
        })
        .collect();
    // Stable: equal timestamps keep name order.
    dated.sort_by_key(|(_, modified)| (modified.is_none(), *modified));

    let forced_extension = request.extension.as_deref().and_then(normalize_extension);
    let mut index = request.start_number;
    let mut planned = Vec::with_capacity(dated.len());
    for (source, modified) in dated {
        let extension = match &forced_extension {
            Some(forced) => forced.clone(),
            None => original_extension(&source),
        };
        let name = frame_file_name(&request.prefix, index, &request.suffix, &extension);
        let destination = source
            .parent()
            .map_or_else(|| PathBuf::from(&name), |parent| parent.join(&name));
        planned.push(PlannedRename {
            source,
            destination,
            modified,
        });
        index = index.saturating_add(1);
    }
    Ok(planned)
}

pub fn execute<FProgress>(
    request: &RenameRequest,
    mut report_progress: FProgress,
) -> Result<RenameExecuteResponse, AppError>
where
    FProgress: FnMut(OperationProgressEvent),
{
    let plan = plan_renames(request)?;
    let total = plan.len();

    // A destination that is still some other file's current name would be
    // clobbered by a direct rename, so every file moves through a temp name.
    let needs_staging = {
        let source_keys: HashSet<String> =
            plan.iter().map(|item| destination_key(&item.source)).collect();
        plan.iter().any(|item| {
            !item.is_unchanged() && source_keys.contains(&destination_key(&item.destination))
        })
    };

    let current_paths: Vec<Result<PathBuf, String>> = if needs_staging {
        tracing::debug!("Staging {} files under temporary names", total);
        plan.iter().map(stage_one).collect()
    } else {
        plan.iter().map(|item| Ok(item.source.clone())).collect()
    };

    let mut details = Vec::with_capacity(total);
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for (item, current) in plan.iter().zip(current_paths) {
        let detail = finish_one(item, current);
        match detail.status {
            ExecuteStatus::Succeeded => succeeded += 1,
            ExecuteStatus::Failed => failed += 1,
            ExecuteStatus::Skipped => skipped += 1,
        }
        let current_path = Some(detail.source_path.clone());
        details.push(detail);
        report_progress(OperationProgressEvent {
            operation: "rename".to_string(),
            processed: details.len(),
            total,
            current_path,
            done: false,
        });
    }

    report_progress(OperationProgressEvent {
        operation: "rename".to_string(),
        processed: details.len(),
        total,
        current_path: None,
        done: true,
    });

    Ok(RenameExecuteResponse {
        processed: succeeded + failed + skipped,
        succeeded,
        failed,
        skipped,
        details,
    })
}

fn stage_one(item: &PlannedRename) -> Result<PathBuf, String> {
    if item.is_unchanged() {
        return Ok(item.source.clone());
    }
    let staged = staging_path_for(&item.source, "stage");
    fs::rename(&item.source, &staged)
        .map(|_| staged)
        .map_err(|e| format!("failed to stage under a temporary name: {}", e))
}

fn finish_one(item: &PlannedRename, current: Result<PathBuf, String>) -> RenameExecuteDetail {
    let source_name = display_name(&item.source);
    let destination_name = display_name(&item.destination);
    let detail = |status: ExecuteStatus, reason: Option<String>| RenameExecuteDetail {
        source_path: item.source.to_string_lossy().to_string(),
        destination_path: item.destination.to_string_lossy().to_string(),
        status,
        reason,
    };

    if item.is_unchanged() {
        tracing::info!("File {} already has its target name", source_name);
        return detail(ExecuteStatus::Skipped, Some("unchanged".to_string()));
    }

    let current = match current {
        Ok(path) => path,
        Err(error) => {
            tracing::error!("Failed to rename file {}: {}", source_name, error);
            return detail(ExecuteStatus::Failed, Some(error));
        }
    };

    match move_into_place(&current, &item.destination) {
        Ok(()) => {
            tracing::info!("Renamed file {} to {}", source_name, destination_name);
            detail(ExecuteStatus::Succeeded, None)
        }
        Err(error) => {
            tracing::error!("Failed to rename file {}: {}", source_name, error);
            let reason = match restore_original(&current, &item.source) {
                Ok(()) => error,
                Err(restore_error) => {
                    tracing::error!("Could not restore {}: {}", source_name, restore_error);
                    format!("{}; {}", error, restore_error)
                }
            };
            detail(ExecuteStatus::Failed, Some(reason))
        }
    }
}

/// Never replaces an existing entry: the destination must be free.
fn move_into_place(current: &Path, destination: &Path) -> Result<(), String> {
    if fs::symlink_metadata(destination).is_ok() {
        return Err(format!("{} already exists", display_name(destination)));
    }
    fs::rename(current, destination).map_err(|e| e.to_string())
}

/// Moves a staged file back to its original name when that name is still free.
fn restore_original(current: &Path, source: &Path) -> Result<(), String> {
    if current == source {
        return Ok(());
    }
    move_into_place(current, source)
        .map_err(|e| format!("left as {} ({})", current.display(), e))
}

fn read_modified_datetime(path: &Path) -> Option<DateTime<Local>> {
    let metadata = fs::metadata(path).ok()?;
    let modified = metadata.modified().ok()?;
    Some(DateTime::<Local>::from(modified))
}

fn original_extension(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

fn normalize_extension(value: &str) -> Option<String> {
    let trimmed = value.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!(".{}", trimmed))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

fn destination_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}
