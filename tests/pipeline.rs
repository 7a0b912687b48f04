use image::RgbImage;
use isp_production_lib::model::AppSettings;
use isp_production_lib::pipeline::{run_pipeline, PipelineOutcome, Step};
use isp_production_lib::shell::{PickTarget, Shell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[derive(Default)]
struct ScriptedShell {
    answers: HashMap<PickTarget, PathBuf>,
    infos: Vec<String>,
    errors: Vec<String>,
}

impl ScriptedShell {
    fn answer(mut self, target: PickTarget, path: &Path) -> Self {
        self.answers.insert(target, path.to_path_buf());
        self
    }
}

impl Shell for ScriptedShell {
    fn pick(&mut self, target: PickTarget) -> Option<PathBuf> {
        self.answers.get(&target).cloned()
    }

    fn show_info(&mut self, _title: &str, message: &str) {
        self.infos.push(message.to_string());
    }

    fn show_error(&mut self, _title: &str, message: &str) {
        self.errors.push(message.to_string());
    }
}

fn png_with_mtime(path: &Path, width: u32, height: u32, secs: u64) {
    RgbImage::new(width, height).save(path).unwrap();
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn write_timecodes(dir: &Path, rows: &[(&str, &str)]) -> PathBuf {
    let path = dir.join("edit.csv");
    let mut body = String::from("Reel,Source In,Source Out\n");
    for (start, end) in rows {
        body.push_str(&format!("A001,{},{}\n", start, end));
    }
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn renames_then_writes_correlated_csv() {
    let frames = tempfile::tempdir().unwrap();
    let edit = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("b.png"), 1920, 1080, 100);
    png_with_mtime(&frames.path().join("a.png"), 794, 1054, 200);
    png_with_mtime(&frames.path().join("c.png"), 640, 480, 300);
    let timecodes = write_timecodes(
        edit.path(),
        &[
            ("00:00:01:00", "00:00:02:00"),
            ("00:00:02:00", "00:00:03:10"),
            ("00:00:03:10", "00:00:05:00"),
        ],
    );
    let mut shell = ScriptedShell::default()
        .answer(PickTarget::RenameDirectory, frames.path())
        .answer(PickTarget::TimecodeFile, &timecodes)
        .answer(PickTarget::ImageDirectory, frames.path());

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    let output = edit.path().join("output.csv");
    assert_eq!(
        outcome,
        PipelineOutcome::Completed {
            output: output.clone(),
            rows: 3
        }
    );
    assert!(shell.errors.is_empty());
    let frame = |n: u32| frames.path().join(format!("Frame_00{}.png", n)).display().to_string();
    let expected = format!(
        "start,end,path,preset\r\n\
         00:00:01:00,00:00:02:00,{},Preset_2\r\n\
         00:00:02:00,00:00:03:10,{},Preset_1\r\n\
         00:00:03:10,00:00:05:00,{},Unknown_Preset\r\n",
        frame(1),
        frame(2),
        frame(3)
    );
    assert_eq!(fs::read_to_string(&output).unwrap(), expected);
    assert!(shell
        .infos
        .last()
        .unwrap()
        .starts_with("CSV file created:"));
}

#[test]
fn cancelled_timecode_pick_aborts_without_output() {
    let frames = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("a.png"), 794, 1060, 10);
    let mut shell = ScriptedShell::default().answer(PickTarget::RenameDirectory, frames.path());

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            step: Step::SelectTimecodeFile,
            ..
        }
    ));
    assert_eq!(
        shell.errors,
        vec!["No timecode file selected. The program has finished.".to_string()]
    );
    assert!(frames.path().join("Frame_001.png").exists());
}

#[test]
fn count_mismatch_aborts_before_writing() {
    let frames = tempfile::tempdir().unwrap();
    let edit = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("a.png"), 794, 1054, 10);
    png_with_mtime(&frames.path().join("b.png"), 794, 1054, 20);
    let timecodes = write_timecodes(edit.path(), &[("1", "2")]);
    let mut shell = ScriptedShell::default()
        .answer(PickTarget::RenameDirectory, frames.path())
        .answer(PickTarget::TimecodeFile, &timecodes)
        .answer(PickTarget::ImageDirectory, frames.path());

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            step: Step::ValidateCounts,
            ..
        }
    ));
    assert!(!edit.path().join("output.csv").exists());
    assert_eq!(shell.errors.len(), 1);
}

#[test]
fn folder_without_png_aborts() {
    let frames = tempfile::tempdir().unwrap();
    let images = tempfile::tempdir().unwrap();
    let edit = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("a.png"), 794, 1054, 10);
    fs::write(images.path().join("notes.txt"), "not an image").unwrap();
    let timecodes = write_timecodes(edit.path(), &[("1", "2")]);
    let mut shell = ScriptedShell::default()
        .answer(PickTarget::RenameDirectory, frames.path())
        .answer(PickTarget::TimecodeFile, &timecodes)
        .answer(PickTarget::ImageDirectory, images.path());

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    assert_eq!(
        outcome,
        PipelineOutcome::Aborted {
            step: Step::ValidateCounts,
            reason: "No images found in the selected folder. The program has finished."
                .to_string(),
        }
    );
}

#[test]
fn empty_rename_folder_skips_renaming_and_continues() {
    let empty = tempfile::tempdir().unwrap();
    let frames = tempfile::tempdir().unwrap();
    let edit = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("shot.png"), 794, 1060, 10);
    let timecodes = write_timecodes(edit.path(), &[("00:00:00:00", "00:00:01:00")]);
    let mut shell = ScriptedShell::default()
        .answer(PickTarget::RenameDirectory, empty.path())
        .answer(PickTarget::TimecodeFile, &timecodes)
        .answer(PickTarget::ImageDirectory, frames.path());

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    assert_eq!(
        outcome,
        PipelineOutcome::Completed {
            output: edit.path().join("output.csv"),
            rows: 1
        }
    );
    assert_eq!(shell.errors.len(), 1);
    assert!(shell.errors[0].contains("contains no files"));
    assert!(frames.path().join("shot.png").exists());
}

#[test]
fn missing_rename_folder_is_reported_then_next_step_runs() {
    let scratch = tempfile::tempdir().unwrap();
    let missing = scratch.path().join("gone");
    let mut shell = ScriptedShell::default().answer(PickTarget::RenameDirectory, &missing);

    let outcome = run_pipeline(&mut shell, &AppSettings::default());

    assert!(matches!(
        outcome,
        PipelineOutcome::Aborted {
            step: Step::SelectTimecodeFile,
            ..
        }
    ));
    assert_eq!(shell.errors.len(), 2);
    assert!(shell.errors[0].contains("gone"));
}

#[test]
fn custom_output_name_and_prefix_are_used() {
    let frames = tempfile::tempdir().unwrap();
    let edit = tempfile::tempdir().unwrap();
    png_with_mtime(&frames.path().join("z.png"), 1920, 1080, 10);
    let timecodes = write_timecodes(edit.path(), &[("10:00:00:00", "10:00:01:00")]);
    let mut settings = AppSettings::default();
    settings.rename.prefix = "Page_".to_string();
    settings.output_file_name = "ae_import.csv".to_string();
    let mut shell = ScriptedShell::default()
        .answer(PickTarget::RenameDirectory, frames.path())
        .answer(PickTarget::TimecodeFile, &timecodes)
        .answer(PickTarget::ImageDirectory, frames.path());

    let outcome = run_pipeline(&mut shell, &settings);

    let output = edit.path().join("ae_import.csv");
    assert_eq!(
        outcome,
        PipelineOutcome::Completed {
            output: output.clone(),
            rows: 1
        }
    );
    let body = fs::read_to_string(output).unwrap();
    assert!(body.contains("Page_001.png,Preset_2"));
}
