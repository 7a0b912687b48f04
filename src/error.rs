use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cancelled: {0}")]
    Cancelled(String),
    #[error("Precondition failed: {0}")]
    Precondition(String),
    #[error("Timecode count ({timecodes}) does not match image count ({images})")]
    LengthMismatch { timecodes: usize, images: usize },
    #[error("No such file or directory: '{}'", .0.display())]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Settings error: {0}")]
    Settings(String),
    #[error("Logging error: {0}")]
    Logging(String),
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value.to_string())
    }
}
