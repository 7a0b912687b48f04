use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One in/out pair read from the timecode CSV. Values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecode {
    pub start: String,
    pub end: String,
}

impl Timecode {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Preset {
    #[serde(rename = "Preset_1")]
    Preset1,
    #[serde(rename = "Preset_2")]
    Preset2,
    #[serde(rename = "Unknown_Preset")]
    Unknown,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Preset1 => "Preset_1",
            Preset::Preset2 => "Preset_2",
            Preset::Unknown => "Unknown_Preset",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    pub path: PathBuf,
    pub preset: Preset,
}

/// Output unit. Field order is the column order of the output CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelatedRow {
    pub start: String,
    pub end: String,
    pub path: String,
    pub preset: Preset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub folder: PathBuf,
    pub start_number: u32,
    pub prefix: String,
    pub suffix: String,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecuteStatus {
    Succeeded,
    Failed,
    Skipped,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameExecuteDetail {
    pub source_path: String,
    pub destination_path: String,
    pub status: ExecuteStatus,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameExecuteResponse {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub details: Vec<RenameExecuteDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationProgressEvent {
    pub operation: String,
    pub processed: usize,
    pub total: usize,
    pub current_path: Option<String>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenameDefaults {
    pub start_number: u32,
    pub prefix: String,
    pub suffix: String,
    pub extension: Option<String>,
}

impl Default for RenameDefaults {
    fn default() -> Self {
        Self {
            start_number: 1,
            prefix: "Frame_".to_string(),
            suffix: String::new(),
            extension: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub rename: RenameDefaults,
    pub output_file_name: String,
    pub log_file: Option<String>,
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            rename: RenameDefaults::default(),
            output_file_name: "output.csv".to_string(),
            log_file: Some("isp_production.log".to_string()),
            log_level: "info".to_string(),
        }
    }
}
