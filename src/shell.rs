//! User-interaction collaborator: path pickers and message boxes.
//!
//! Every call blocks until the user answers. `None` from [`Shell::pick`]
//! always means the user cancelled.

use crate::model::OperationProgressEvent;
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickTarget {
    RenameDirectory,
    TimecodeFile,
    ImageDirectory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickMode {
    Directory,
    CsvFile,
}

impl PickTarget {
    pub fn title(&self) -> &'static str {
        match self {
            PickTarget::RenameDirectory => "Select the folder with files to rename",
            PickTarget::TimecodeFile => "Select the timecode CSV file",
            PickTarget::ImageDirectory => "Select the folder with images",
        }
    }

    pub fn mode(&self) -> PickMode {
        match self {
            PickTarget::TimecodeFile => PickMode::CsvFile,
            PickTarget::RenameDirectory | PickTarget::ImageDirectory => PickMode::Directory,
        }
    }
}

pub trait Shell {
    fn pick(&mut self, target: PickTarget) -> Option<PathBuf>;
    fn show_info(&mut self, title: &str, message: &str);
    fn show_error(&mut self, title: &str, message: &str);
    fn report_progress(&mut self, _event: &OperationProgressEvent) {}
}

/// Text prompts on any reader/writer pair. Targets answered up front (from
/// command-line flags) are returned without prompting.
pub struct ConsoleShell<R, W> {
    input: R,
    output: W,
    preselected: HashMap<PickTarget, PathBuf>,
}

impl<R: BufRead, W: Write> ConsoleShell<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            preselected: HashMap::new(),
        }
    }

    pub fn preselect(mut self, target: PickTarget, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.preselected.insert(target, path);
        }
        self
    }

    /// A closed or broken output only loses the text; the run carries on.
    fn emit(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(error) = self
            .output
            .write_fmt(text)
            .and_then(|()| self.output.flush())
        {
            tracing::warn!("Failed to write to console: {}", error);
        }
    }

    fn read_answer(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| answer.to_string())
            }
            Err(error) => {
                tracing::error!("Failed to read answer: {}", error);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> Shell for ConsoleShell<R, W> {
    fn pick(&mut self, target: PickTarget) -> Option<PathBuf> {
        if let Some(path) = self.preselected.remove(&target) {
            return Some(path);
        }
        let hint = match target.mode() {
            PickMode::Directory => "folder",
            PickMode::CsvFile => "CSV file",
        };
        self.emit(format_args!(
            "{} ({} path, empty to cancel): ",
            target.title(),
            hint
        ));
        self.read_answer().map(PathBuf::from)
    }

    fn show_info(&mut self, title: &str, message: &str) {
        self.emit(format_args!("[{}] {}\n", title, message));
    }

    fn show_error(&mut self, title: &str, message: &str) {
        self.emit(format_args!("[{}] ERROR: {}\n", title, message));
    }

    fn report_progress(&mut self, event: &OperationProgressEvent) {
        if event.done {
            self.emit(format_args!(
                "{}: {}/{} done\n",
                event.operation, event.processed, event.total
            ));
        }
    }
}

/// Native modal dialogs.
#[cfg(feature = "gui")]
#[derive(Debug, Default)]
pub struct DialogShell;

#[cfg(feature = "gui")]
impl Shell for DialogShell {
    fn pick(&mut self, target: PickTarget) -> Option<PathBuf> {
        let dialog = rfd::FileDialog::new().set_title(target.title());
        match target.mode() {
            PickMode::Directory => dialog.pick_folder(),
            PickMode::CsvFile => dialog.add_filter("CSV files", &["csv"]).pick_file(),
        }
    }

    fn show_info(&mut self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Info)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    fn show_error(&mut self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn console_answers_and_cancel() {
        let input = Cursor::new("/data/frames\n\n");
        let mut output = Vec::new();
        {
            let mut shell = ConsoleShell::new(input, &mut output);
            assert_eq!(
                shell.pick(PickTarget::RenameDirectory),
                Some(PathBuf::from("/data/frames"))
            );
            assert_eq!(shell.pick(PickTarget::TimecodeFile), None);
            assert_eq!(shell.pick(PickTarget::ImageDirectory), None);
        }
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Select the timecode CSV file (CSV file path"));
    }

    #[test]
    fn preselected_targets_skip_the_prompt_once() {
        let mut output = Vec::new();
        let mut shell = ConsoleShell::new(Cursor::new(""), &mut output)
            .preselect(PickTarget::ImageDirectory, Some(PathBuf::from("imgs")))
            .preselect(PickTarget::TimecodeFile, None);

        assert_eq!(
            shell.pick(PickTarget::ImageDirectory),
            Some(PathBuf::from("imgs"))
        );
        assert_eq!(shell.pick(PickTarget::ImageDirectory), None);
        assert_eq!(shell.pick(PickTarget::TimecodeFile), None);
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }
    }

    #[test]
    fn broken_output_still_reads_answers() {
        let mut shell = ConsoleShell::new(Cursor::new("frames\n"), BrokenPipe);
        shell.show_info("Instructions", "Step 1");
        shell.show_error("Error", "nothing");
        assert_eq!(
            shell.pick(PickTarget::RenameDirectory),
            Some(PathBuf::from("frames"))
        );
    }
}
