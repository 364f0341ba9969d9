use crate::error::Error;
use crate::process::{run_capture, Capture};

/// Sub-command that makes the external binary show its file-open dialog.
pub const OPEN_SUBCOMMAND: &str = "o";

/// Outcome of the file-open dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Picked {
    Path(String),
    /// Diagnostic text from the binary, e.g. when the dialog was cancelled.
    Failed(String),
}

/// Runs `<program> o` and reports the chosen path.
///
/// The path is returned as printed, minus its line terminator; it is not
/// checked for existence or extension.
pub async fn pick_file(program: &str) -> Result<Picked, Error> {
    let picked = match run_capture(program, [OPEN_SUBCOMMAND]).await? {
        Capture::Stdout(mut path) => {
            trim_line_ending(&mut path);
            Picked::Path(path)
        }
        Capture::Stderr(diagnostic) => Picked::Failed(diagnostic),
    };
    Ok(picked)
}

fn trim_line_ending(text: &mut String) {
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
}
