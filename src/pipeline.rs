use crate::correlate::write_output_csv;
use crate::error::AppError;
use crate::file_collect::collect_images;
use crate::model::{AppSettings, RenameRequest, Timecode};
use crate::rename;
use crate::shell::{PickTarget, Shell};
use crate::timecode::read_timecodes;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    SelectRenameDir,
    Rename,
    SelectTimecodeFile,
    SelectImageDir,
    ReadInputs,
    ValidateCounts,
    WriteOutput,
    Done,
    Aborted,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Step::SelectRenameDir => "select rename folder",
            Step::Rename => "rename",
            Step::SelectTimecodeFile => "select timecode file",
            Step::SelectImageDir => "select image folder",
            Step::ReadInputs => "read inputs",
            Step::ValidateCounts => "validate counts",
            Step::WriteOutput => "write output",
            Step::Done => "done",
            Step::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Completed { output: PathBuf, rows: usize },
    Aborted { step: Step, reason: String },
}

/// Each state owns what the steps before it produced.
enum State {
    SelectRenameDir,
    Rename {
        folder: PathBuf,
    },
    SelectTimecodeFile,
    SelectImageDir {
        timecode_file: PathBuf,
    },
    ReadInputs {
        timecode_file: PathBuf,
        image_dir: PathBuf,
    },
    ValidateCounts {
        timecode_file: PathBuf,
        timecodes: Vec<Timecode>,
        image_paths: Vec<PathBuf>,
    },
    WriteOutput {
        timecode_file: PathBuf,
        timecodes: Vec<Timecode>,
        image_paths: Vec<PathBuf>,
    },
    Done {
        output: PathBuf,
        rows: usize,
    },
}

impl State {
    fn step(&self) -> Step {
        match self {
            State::SelectRenameDir => Step::SelectRenameDir,
            State::Rename { .. } => Step::Rename,
            State::SelectTimecodeFile => Step::SelectTimecodeFile,
            State::SelectImageDir { .. } => Step::SelectImageDir,
            State::ReadInputs { .. } => Step::ReadInputs,
            State::ValidateCounts { .. } => Step::ValidateCounts,
            State::WriteOutput { .. } => Step::WriteOutput,
            State::Done { .. } => Step::Done,
        }
    }
}

/// Runs the whole rename → correlate sequence. Never returns an error: any
/// failure is logged, shown through `shell`, and ends the run as `Aborted`.
pub fn run_pipeline(shell: &mut dyn Shell, settings: &AppSettings) -> PipelineOutcome {
    let mut state = State::SelectRenameDir;
    loop {
        let step = state.step();
        tracing::info!("Step: {}", step);
        state = match advance(state, shell, settings) {
            Ok(State::Done { output, rows }) => {
                tracing::info!("Finished: {} rows written to {}", rows, output.display());
                shell.show_info(
                    "Success",
                    &format!("CSV file created: {}", output.display()),
                );
                return PipelineOutcome::Completed { output, rows };
            }
            Ok(next) => next,
            Err(error) => {
                let reason = abort_message(&error);
                tracing::error!("Aborted during {}: {}", step, error);
                shell.show_error("Error", &reason);
                return PipelineOutcome::Aborted { step, reason };
            }
        };
    }
}

fn advance(
    state: State,
    shell: &mut dyn Shell,
    settings: &AppSettings,
) -> Result<State, AppError> {
    match state {
        State::SelectRenameDir => {
            shell.show_info(
                "Instructions",
                &format!(
                    "Step 1: select the folder with files to rename.\n\
                     Files will be renamed as {}, {} and so on.",
                    example_name(settings, 0),
                    example_name(settings, 1)
                ),
            );
            let folder = pick(shell, PickTarget::RenameDirectory, "No folder selected for renaming")?;
            Ok(State::Rename { folder })
        }
        State::Rename { folder } => {
            shell.show_info(
                "Information",
                &format!(
                    "Renaming files in folder:\n{}\n\nFiles get the prefix '{}' and sequential numbers.",
                    folder.display(),
                    settings.rename.prefix
                ),
            );
            let request = RenameRequest {
                folder,
                start_number: settings.rename.start_number,
                prefix: settings.rename.prefix.clone(),
                suffix: settings.rename.suffix.clone(),
                extension: settings.rename.extension.clone(),
            };
            let response = match rename::execute(&request, |event| shell.report_progress(&event)) {
                Ok(response) => response,
                // A missing or empty folder only skips renaming; the run goes on.
                Err(error @ (AppError::NotFound(_) | AppError::Precondition(_))) => {
                    tracing::error!("Rename skipped: {}", error);
                    shell.show_error("Error", &error.to_string());
                    return Ok(State::SelectTimecodeFile);
                }
                Err(error) => return Err(error),
            };
            tracing::info!(
                "Rename finished: {} renamed, {} failed, {} unchanged",
                response.succeeded,
                response.failed,
                response.skipped
            );
            let message = if response.failed == 0 {
                format!("Files renamed successfully ({}).", response.processed)
            } else {
                format!(
                    "Renamed {} of {} files; {} failed, see the log for details.",
                    response.succeeded + response.skipped,
                    response.processed,
                    response.failed
                )
            };
            shell.show_info("Success", &message);
            Ok(State::SelectTimecodeFile)
        }
        State::SelectTimecodeFile => {
            shell.show_info(
                "Instructions",
                "Step 2: select the CSV file with timecodes.\n\
                 It must contain the columns 'Source In' and 'Source Out'.",
            );
            let timecode_file = pick(shell, PickTarget::TimecodeFile, "No timecode file selected")?;
            Ok(State::SelectImageDir { timecode_file })
        }
        State::SelectImageDir { timecode_file } => {
            shell.show_info(
                "Instructions",
                "Step 3: select the folder with images.\n\
                 The folder must contain .png images.",
            );
            let image_dir = pick(shell, PickTarget::ImageDirectory, "No image folder selected")?;
            Ok(State::ReadInputs {
                timecode_file,
                image_dir,
            })
        }
        State::ReadInputs {
            timecode_file,
            image_dir,
        } => {
            shell.show_info(
                "Instructions",
                "Step 4: reading timecodes and images.\n\
                 The number of timecodes must match the number of images.",
            );
            let timecodes = read_timecodes(&timecode_file)?;
            let image_paths = collect_images(&image_dir)?;
            tracing::info!("Found {} images in {}", image_paths.len(), image_dir.display());
            Ok(State::ValidateCounts {
                timecode_file,
                timecodes,
                image_paths,
            })
        }
        State::ValidateCounts {
            timecode_file,
            timecodes,
            image_paths,
        } => {
            if image_paths.is_empty() {
                return Err(AppError::Precondition(
                    "No images found in the selected folder".to_string(),
                ));
            }
            if timecodes.len() != image_paths.len() {
                return Err(AppError::LengthMismatch {
                    timecodes: timecodes.len(),
                    images: image_paths.len(),
                });
            }
            Ok(State::WriteOutput {
                timecode_file,
                timecodes,
                image_paths,
            })
        }
        State::WriteOutput {
            timecode_file,
            timecodes,
            image_paths,
        } => {
            shell.show_info(
                "Instructions",
                "Step 5: creating the output CSV file.\n\
                 It lists timecodes, image paths and their presets.",
            );
            let output = timecode_file
                .parent()
                .map_or_else(PathBuf::new, PathBuf::from)
                .join(&settings.output_file_name);
            let rows = write_output_csv(&timecodes, &image_paths, &output, |event| {
                shell.report_progress(&event)
            })?;
            Ok(State::Done { output, rows })
        }
        State::Done { output, rows } => Ok(State::Done { output, rows }),
    }
}

fn pick(shell: &mut dyn Shell, target: PickTarget, cancelled: &str) -> Result<PathBuf, AppError> {
    match shell.pick(target) {
        Some(path) if !path.as_os_str().is_empty() => {
            tracing::info!("Selected for {:?}: {}", target, path.display());
            Ok(path)
        }
        _ => Err(AppError::Cancelled(cancelled.to_string())),
    }
}

fn abort_message(error: &AppError) -> String {
    match error {
        AppError::Cancelled(message) | AppError::Precondition(message) => {
            format!("{}. The program has finished.", message)
        }
        AppError::NotFound(_) | AppError::LengthMismatch { .. } => {
            format!("{}. The program has finished.", error)
        }
        other => format!("An error occurred: {}", other),
    }
}

fn example_name(settings: &AppSettings, offset: u32) -> String {
    let extension = settings
        .rename
        .extension
        .as_deref()
        .map(|ext| format!(".{}", ext.trim_start_matches('.')))
        .unwrap_or_else(|| ".png".to_string());
    rename::frame_file_name(
        &settings.rename.prefix,
        settings.rename.start_number.saturating_add(offset),
        &settings.rename.suffix,
        &extension,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_messages_by_kind() {
        assert_eq!(
            abort_message(&AppError::Cancelled("No timecode file selected".to_string())),
            "No timecode file selected. The program has finished."
        );
        assert_eq!(
            abort_message(&AppError::LengthMismatch {
                timecodes: 3,
                images: 2
            }),
            "Timecode count (3) does not match image count (2). The program has finished."
        );
        assert!(abort_message(&AppError::Io("disk full".to_string()))
            .starts_with("An error occurred: "));
    }

    #[test]
    fn example_names_follow_settings() {
        let mut settings = AppSettings::default();
        assert_eq!(example_name(&settings, 0), "Frame_001.png");
        settings.rename.start_number = 9;
        settings.rename.extension = Some("jpg".to_string());
        assert_eq!(example_name(&settings, 1), "Frame_010.jpg");
    }
}
