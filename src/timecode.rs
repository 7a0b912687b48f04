use crate::error::AppError;
use crate::model::Timecode;
use csv::{ReaderBuilder, StringRecord};
use std::path::Path;

pub const SOURCE_IN_COLUMN: &str = "Source In";
pub const SOURCE_OUT_COLUMN: &str = "Source Out";

#[derive(Debug, Clone, Copy)]
struct TimecodeColumns {
    source_in: usize,
    source_out: usize,
}

impl TimecodeColumns {
    fn from_headers(headers: &StringRecord) -> Option<Self> {
        Some(Self {
            source_in: headers.iter().position(|h| h == SOURCE_IN_COLUMN)?,
            source_out: headers.iter().position(|h| h == SOURCE_OUT_COLUMN)?,
        })
    }

    fn extract(&self, row: &StringRecord) -> Option<Timecode> {
        Some(Timecode::new(row.get(self.source_in)?, row.get(self.source_out)?))
    }
}

/// Reads "Source In"/"Source Out" pairs in file order. Rows that do not carry
/// both columns are skipped without error.
pub fn read_timecodes(path: &Path) -> Result<Vec<Timecode>, AppError> {
    if !path.is_file() {
        tracing::error!("Timecode file {} not found", path.display());
        return Err(AppError::NotFound(path.to_path_buf()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let columns = TimecodeColumns::from_headers(&headers);
    if columns.is_none() {
        tracing::warn!(
            "{} has no '{}'/'{}' columns, no timecodes read",
            path.display(),
            SOURCE_IN_COLUMN,
            SOURCE_OUT_COLUMN
        );
    }

    let mut timecodes = Vec::new();
    for (row_idx, row_result) in reader.records().enumerate() {
        let row = match row_result {
            Ok(row) => row,
            Err(err) => {
                tracing::warn!("CSV row {} parse error: {}", row_idx + 2, err);
                continue;
            }
        };
        if let Some(timecode) = columns.as_ref().and_then(|c| c.extract(&row)) {
            timecodes.push(timecode);
        }
    }

    tracing::info!("Read {} timecodes from {}", timecodes.len(), path.display());
    tracing::debug!("Timecodes: {:?}", timecodes);
    Ok(timecodes)
}
