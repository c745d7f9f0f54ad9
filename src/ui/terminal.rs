//! Interactive terminal UI.

use console::Term;
use std::fmt::Display;
use std::io::Write;

use super::{
    panel, NonInteractiveUI, OutputMode, ProgressSpinner, RunSummary, SpinnerHandle, Theme,
    UserInterface,
};

/// Colored output with live spinners. Status goes to stdout, failures to
/// stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: Theme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: Theme::detect(),
            mode,
        }
    }

    /// Write a status line unless the mode hides status.
    fn status(&self, text: impl Display) {
        if self.mode.shows_status() {
            writeln!(&self.out, "{}", text).ok();
        }
    }

    fn write_block(mut term: &Term, lines: &[String]) {
        writeln!(term).ok();
        for line in lines {
            writeln!(term, "{}", line).ok();
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.status(msg);
    }

    fn success(&mut self, msg: &str) {
        self.status(self.theme.format_success(msg));
    }

    fn warning(&mut self, msg: &str) {
        self.status(self.theme.format_warning(msg));
    }

    fn error(&mut self, msg: &str) {
        writeln!(&self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        let spinner = if self.mode.shows_spinners() {
            ProgressSpinner::new(message)
        } else {
            ProgressSpinner::hidden()
        };
        Box::new(spinner)
    }

    fn show_header(&mut self, title: &str) {
        self.status(format_args!("\n{}\n", self.theme.format_header(title)));
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        if self.mode.shows_command_output() {
            let step = format!("[{}/{}]", current, total);
            writeln!(&self.out, "{}", self.theme.dim.apply_to(step)).ok();
        }
    }

    fn show_hint(&mut self, hint: &str) {
        self.status(format_args!("  {}", self.theme.hint.apply_to(hint)));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        let lines = panel::error_block(&self.theme, command, output, hint);
        Self::write_block(&self.err, &lines);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        if self.mode.shows_summary() {
            let lines = panel::run_summary(&self.theme, summary);
            Self::write_block(&self.out, &lines);
        }
    }
}

/// Create the appropriate UI based on context.
///
/// Falls back to plain output when stdout is not a terminal, even if an
/// interactive UI was requested.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
