use crate::error::AppError;
use crate::fs_atomic::atomic_write_replace;
use crate::model::{CorrelatedRow, OperationProgressEvent, Timecode};
use crate::preset::image_record;
use std::path::{Path, PathBuf};

/// Pairs `timecodes[i]` with `image_paths[i]` and classifies each image.
pub fn correlate<FProgress>(
    timecodes: &[Timecode],
    image_paths: &[PathBuf],
    mut report_progress: FProgress,
) -> Result<Vec<CorrelatedRow>, AppError>
where
    FProgress: FnMut(OperationProgressEvent),
{
    if timecodes.len() != image_paths.len() {
        tracing::error!(
            "Timecode count {} does not match image count {}",
            timecodes.len(),
            image_paths.len()
        );
        return Err(AppError::LengthMismatch {
            timecodes: timecodes.len(),
            images: image_paths.len(),
        });
    }

    let total = timecodes.len();
    let mut rows = Vec::with_capacity(total);
    for (timecode, path) in timecodes.iter().zip(image_paths) {
        let record = image_record(path);
        rows.push(CorrelatedRow {
            start: timecode.start.clone(),
            end: timecode.end.clone(),
            path: record.path.to_string_lossy().to_string(),
            preset: record.preset,
        });
        report_progress(OperationProgressEvent {
            operation: "correlate".to_string(),
            processed: rows.len(),
            total,
            current_path: Some(path.to_string_lossy().to_string()),
            done: false,
        });
    }
    report_progress(OperationProgressEvent {
        operation: "correlate".to_string(),
        processed: rows.len(),
        total,
        current_path: None,
        done: true,
    });
    Ok(rows)
}

/// Header-first `start,end,path,preset` CSV, replacing any file at `output`.
pub fn render_csv(rows: &[CorrelatedRow]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(["start", "end", "path", "preset"])?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| AppError::Csv(e.to_string()))
}

pub fn write_output_csv<FProgress>(
    timecodes: &[Timecode],
    image_paths: &[PathBuf],
    output: &Path,
    report_progress: FProgress,
) -> Result<usize, AppError>
where
    FProgress: FnMut(OperationProgressEvent),
{
    let rows = correlate(timecodes, image_paths, report_progress)?;
    let body = render_csv(&rows)?;
    atomic_write_replace(output, &body)?;
    tracing::info!("Output CSV written: {}", output.display());
    Ok(rows.len())
}
