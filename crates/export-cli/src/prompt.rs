use std::io::{BufRead, BufReader, Stderr, Stdin, Write};
use std::path::Path;

use scene_export::{ConfirmOverwrite, OverwriteMode};

/// Asks `Overwrite <path>? [y/N]` and reads one line of answer.
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl Prompt<BufReader<Stdin>, Stderr> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(std::io::stdin()), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> ConfirmOverwrite for Prompt<R, W> {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        if write!(self.output, "Overwrite {}? [y/N] ", path.display()).is_err() {
            return false;
        }
        let _ = self.output.flush();
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Overwrite decision for the configured mode.
pub enum CliConfirm {
    Always,
    Never,
    Ask(Prompt<BufReader<Stdin>, Stderr>),
}

impl CliConfirm {
    pub fn from_mode(mode: OverwriteMode) -> Self {
        match mode {
            OverwriteMode::Always => CliConfirm::Always,
            OverwriteMode::Never => CliConfirm::Never,
            OverwriteMode::Ask => CliConfirm::Ask(Prompt::stdio()),
        }
    }
}

impl ConfirmOverwrite for CliConfirm {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        match self {
            CliConfirm::Always => true,
            CliConfirm::Never => false,
            CliConfirm::Ask(prompt) => prompt.confirm_overwrite(path),
        }
    }
}
