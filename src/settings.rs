use crate::error::AppError;
use crate::model::AppSettings;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_DIR_NAME: &str = "isp-production";
const SETTINGS_FILE_NAME: &str = "settings.json";
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

pub fn settings_file_path() -> Result<PathBuf, AppError> {
    let mut dir = dirs::config_dir()
        .ok_or_else(|| AppError::Settings("no user config directory available".to_string()))?;
    dir.push(SETTINGS_DIR_NAME);
    dir.push(SETTINGS_FILE_NAME);
    Ok(dir)
}

/// Missing file means defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, AppError> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }

    let content = fs::read_to_string(path).map_err(|e| AppError::Settings(e.to_string()))?;
    let settings: AppSettings =
        serde_json::from_str(&content).map_err(|e| AppError::Settings(e.to_string()))?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), AppError> {
    validate_settings(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| AppError::Settings(e.to_string()))?;
    }
    let body =
        serde_json::to_string_pretty(settings).map_err(|e| AppError::Settings(e.to_string()))?;
    fs::write(path, body).map_err(|e| AppError::Settings(e.to_string()))
}

pub fn validate_settings(settings: &AppSettings) -> Result<(), AppError> {
    check_name_part("rename prefix", &settings.rename.prefix)?;
    check_name_part("rename suffix", &settings.rename.suffix)?;
    if let Some(extension) = &settings.rename.extension {
        check_name_part("rename extension", extension)?;
    }
    if settings.output_file_name.trim().is_empty() {
        return Err(AppError::Settings(
            "output file name must not be empty".to_string(),
        ));
    }
    check_name_part("output file name", &settings.output_file_name)?;
    if let Some(log_file) = &settings.log_file {
        if log_file.trim().is_empty() {
            return Err(AppError::Settings("log file must not be empty".to_string()));
        }
    }
    if !LOG_LEVELS.contains(&settings.log_level.to_ascii_lowercase().as_str()) {
        return Err(AppError::Settings(format!(
            "log level must be one of {}, got `{}`",
            LOG_LEVELS.join("/"),
            settings.log_level
        )));
    }
    Ok(())
}

fn check_name_part(label: &str, value: &str) -> Result<(), AppError> {
    let invalid_chars = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    if let Some(ch) = value
        .chars()
        .find(|ch| invalid_chars.contains(ch) || ch.is_control())
    {
        return Err(AppError::Settings(format!(
            "{} contains a character not allowed in file names: {:?}",
            label, ch
        )));
    }
    Ok(())
}
