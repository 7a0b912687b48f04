use crate::model::AppSettings;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(
    version,
    about = "Renames frames by modification time and correlates them with CSV timecodes"
)]
pub struct Cli {
    /// Settings file to use instead of the one in the user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder whose files are renamed (prompted for when omitted).
    #[arg(long, value_name = "DIR")]
    pub rename_dir: Option<PathBuf>,

    /// CSV export with "Source In" / "Source Out" columns.
    #[arg(long, value_name = "FILE")]
    pub timecodes: Option<PathBuf>,

    /// Folder with the .png frames to correlate.
    #[arg(long, value_name = "DIR")]
    pub images: Option<PathBuf>,

    #[arg(long)]
    pub start_number: Option<u32>,

    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long)]
    pub suffix: Option<String>,

    /// Give every renamed file this extension instead of keeping its own.
    #[arg(long)]
    pub extension: Option<String>,

    /// Name of the CSV written next to the timecode file.
    #[arg(long, value_name = "NAME")]
    pub output_name: Option<String>,

    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[arg(long, value_name = "FILE")]
    pub log_file: Option<String>,

    /// Store the effective settings (including the flags above) as the new defaults.
    #[arg(long, default_value_t = false)]
    pub save_settings: bool,

    /// Use native dialogs instead of console prompts.
    #[cfg(feature = "gui")]
    #[arg(long, default_value_t = false)]
    pub gui: bool,
}

impl Cli {
    pub fn apply_overrides(&self, settings: &mut AppSettings) {
        if let Some(start_number) = self.start_number {
            settings.rename.start_number = start_number;
        }
        if let Some(prefix) = &self.prefix {
            settings.rename.prefix = prefix.clone();
        }
        if let Some(suffix) = &self.suffix {
            settings.rename.suffix = suffix.clone();
        }
        if let Some(extension) = &self.extension {
            settings.rename.extension = Some(extension.clone());
        }
        if let Some(output_name) = &self.output_name {
            settings.output_file_name = output_name.clone();
        }
        if let Some(log_level) = &self.log_level {
            settings.log_level = log_level.clone();
        }
        if let Some(log_file) = &self.log_file {
            settings.log_file = Some(log_file.clone());
        }
    }
}
