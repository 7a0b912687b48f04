use crate::model::{ImageRecord, Preset};
use image::ImageReader;
use std::path::Path;

impl Preset {
    pub fn from_dimensions(width: u32, height: u32) -> Preset {
        match (width, height) {
            (794, 1054) | (794, 1060) => Preset::Preset1,
            (1920, 1080) => Preset::Preset2,
            _ => Preset::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyIssue {
    UnrecognizedResolution { width: u32, height: u32 },
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub preset: Preset,
    pub issue: Option<ClassifyIssue>,
}

/// Never fails: anything that cannot be decoded classifies as `Unknown`.
pub fn classify_image(path: &Path) -> Classification {
    match read_dimensions(path) {
        Ok((width, height)) => {
            let preset = Preset::from_dimensions(width, height);
            let issue = (preset == Preset::Unknown)
                .then_some(ClassifyIssue::UnrecognizedResolution { width, height });
            Classification { preset, issue }
        }
        Err(reason) => Classification {
            preset: Preset::Unknown,
            issue: Some(ClassifyIssue::Unreadable(reason)),
        },
    }
}

pub fn determine_preset(path: &Path) -> Preset {
    let classification = classify_image(path);
    match &classification.issue {
        Some(ClassifyIssue::UnrecognizedResolution { width, height }) => {
            tracing::warn!(
                "Unknown image resolution {}: {}x{}",
                path.display(),
                width,
                height
            );
        }
        Some(ClassifyIssue::Unreadable(reason)) => {
            tracing::error!(
                "Failed to read image resolution {}: {}",
                path.display(),
                reason
            );
        }
        None => {}
    }
    classification.preset
}

pub fn image_record(path: &Path) -> ImageRecord {
    ImageRecord {
        path: path.to_path_buf(),
        preset: determine_preset(path),
    }
}

fn read_dimensions(path: &Path) -> Result<(u32, u32), String> {
    ImageReader::open(path)
        .map_err(|e| e.to_string())?
        .with_guessed_format()
        .map_err(|e| e.to_string())?
        .into_dimensions()
        .map_err(|e| e.to_string())
}
