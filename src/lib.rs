pub mod cli;
pub mod correlate;
pub mod error;
pub mod file_collect;
mod fs_atomic;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod preset;
pub mod rename;
pub mod settings;
pub mod shell;
pub mod timecode;

use crate::cli::Cli;
use crate::error::AppError;
use crate::model::AppSettings;
use crate::pipeline::{run_pipeline, PipelineOutcome};
use crate::shell::{ConsoleShell, PickTarget, Shell};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

pub fn run(cli: Cli) -> ExitCode {
    let (settings_path, loaded) = resolve_settings(&cli);
    let (settings, settings_error) = match loaded {
        Ok(settings) => (settings, None),
        Err(error) => (AppSettings::default(), Some(error)),
    };

    if let Err(error) = logging::init_logging(&settings) {
        eprintln!("{}", error);
        return ExitCode::FAILURE;
    }
    if let Some(error) = settings_error {
        tracing::error!("{}", error);
        return ExitCode::FAILURE;
    }
    tracing::info!("Starting with settings from {}", settings_path.display());

    if cli.save_settings {
        match settings::save_settings(&settings_path, &settings) {
            Ok(()) => tracing::info!("Settings saved to {}", settings_path.display()),
            Err(error) => tracing::warn!("Could not save settings: {}", error),
        }
    }

    let mut shell = build_shell(&cli);
    match run_pipeline(shell.as_mut(), &settings) {
        PipelineOutcome::Completed { .. } => ExitCode::SUCCESS,
        PipelineOutcome::Aborted { .. } => ExitCode::FAILURE,
    }
}

fn resolve_settings(cli: &Cli) -> (PathBuf, Result<AppSettings, AppError>) {
    let path = match cli.config.clone() {
        Some(path) => path,
        None => match settings::settings_file_path() {
            Ok(path) => path,
            Err(error) => return (PathBuf::from("settings.json"), Err(error)),
        },
    };
    let loaded = settings::load_settings(&path).and_then(|mut settings| {
        cli.apply_overrides(&mut settings);
        settings::validate_settings(&settings)?;
        Ok(settings)
    });
    (path, loaded)
}

fn build_shell(cli: &Cli) -> Box<dyn Shell> {
    #[cfg(feature = "gui")]
    {
        if cli.gui {
            return Box::new(shell::DialogShell);
        }
    }
    Box::new(
        ConsoleShell::new(io::stdin().lock(), io::stdout())
            .preselect(PickTarget::RenameDirectory, cli.rename_dir.clone())
            .preselect(PickTarget::TimecodeFile, cli.timecodes.clone())
            .preselect(PickTarget::ImageDirectory, cli.images.clone()),
    )
}
