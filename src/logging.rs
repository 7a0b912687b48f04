//! Process-wide log sink: console (stderr) plus an append-only log file.
//!
//! Initialized once at startup. `RUST_LOG` overrides the configured level.

use crate::error::AppError;
use crate::model::AppSettings;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub fn init_logging(settings: &AppSettings) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_ascii_lowercase()));

    let file_layer = match settings.log_file.as_deref() {
        Some(log_file) => {
            let (dir, name) = split_log_path(Path::new(log_file))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::NEVER)
                .filename_prefix(name)
                .build(&dir)
                .map_err(|e| AppError::Logging(format!("cannot open {}: {}", log_file, e)))?;
            Some(fmt::layer().with_writer(appender).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::Logging(e.to_string()))
}

fn split_log_path(path: &Path) -> Result<(PathBuf, String), AppError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Logging(format!("invalid log file {}", path.display())))?
        .to_string();
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    Ok((dir, name))
}
