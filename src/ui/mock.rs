//! Mock UI implementation for testing.
//!
//! `MockUI` records every call, spinner outcomes included, as one ordered
//! log of [`UiEvent`]s.
//!
//! # Example
//!
//! ```
//! use envstrap::ui::{MockUI, UiEvent, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("Bootstrapping demo");
//! ui.success("Done!");
//!
//! assert!(ui.has_success("Done"));
//! assert_eq!(ui.events()[0], UiEvent::Header("Bootstrapping demo".into()));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use super::{OutputMode, RunSummary, SpinnerHandle, UserInterface};

/// One recorded UI call.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Message(String),
    Success(String),
    Warning(String),
    Error(String),
    Header(String),
    Progress(usize, usize),
    Hint(String),
    SpinnerStarted(String),
    SpinnerFinished(SpinnerStatus, String),
    ErrorBlock {
        command: String,
        output: String,
        hint: Option<String>,
    },
    Summary(RunSummary),
}

/// How a mock spinner finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinnerStatus {
    Success,
    Error,
    Skipped,
}

type EventLog = Rc<RefCell<Vec<UiEvent>>>;

/// Mock UI implementation for testing.
#[derive(Debug, Default)]
pub struct MockUI {
    mode: OutputMode,
    events: EventLog,
}

impl MockUI {
    /// Create a new MockUI with Normal output mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new MockUI with a specific output mode.
    pub fn with_mode(mode: OutputMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Everything recorded so far, in call order.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    fn pick<T>(&self, select: impl Fn(&UiEvent) -> Option<T>) -> Vec<T> {
        self.events.borrow().iter().filter_map(select).collect()
    }

    fn text_of(&self, kind: fn(&UiEvent) -> Option<&String>) -> Vec<String> {
        self.pick(|e| kind(e).cloned())
    }

    fn record(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }

    pub fn successes(&self) -> Vec<String> {
        self.text_of(|e| match e {
            UiEvent::Success(s) => Some(s),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.text_of(|e| match e {
            UiEvent::Warning(s) => Some(s),
            _ => None,
        })
    }

    pub fn errors(&self) -> Vec<String> {
        self.text_of(|e| match e {
            UiEvent::Error(s) => Some(s),
            _ => None,
        })
    }

    /// Labels of every spinner started.
    pub fn spinners(&self) -> Vec<String> {
        self.text_of(|e| match e {
            UiEvent::SpinnerStarted(s) => Some(s),
            _ => None,
        })
    }

    /// How each spinner finished, in order.
    pub fn spinner_outcomes(&self) -> Vec<(SpinnerStatus, String)> {
        self.pick(|e| match e {
            UiEvent::SpinnerFinished(status, msg) => Some((*status, msg.clone())),
            _ => None,
        })
    }

    /// Error blocks as (command, output, hint).
    pub fn error_blocks(&self) -> Vec<(String, String, Option<String>)> {
        self.pick(|e| match e {
            UiEvent::ErrorBlock {
                command,
                output,
                hint,
            } => Some((command.clone(), output.clone(), hint.clone())),
            _ => None,
        })
    }

    pub fn has_message(&self, msg: &str) -> bool {
        self.any(|e| matches!(e, UiEvent::Message(m) if m.contains(msg)))
    }

    pub fn has_success(&self, msg: &str) -> bool {
        self.successes().iter().any(|m| m.contains(msg))
    }

    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings().iter().any(|m| m.contains(msg))
    }

    pub fn has_error(&self, msg: &str) -> bool {
        self.errors().iter().any(|m| m.contains(msg))
    }

    /// Hints count whether shown alone or under an error block.
    pub fn has_hint(&self, msg: &str) -> bool {
        self.any(|e| match e {
            UiEvent::Hint(h) => h.contains(msg),
            UiEvent::ErrorBlock { hint: Some(h), .. } => h.contains(msg),
            _ => false,
        })
    }

    fn any(&self, test: impl Fn(&UiEvent) -> bool) -> bool {
        self.events.borrow().iter().any(test)
    }
}

impl UserInterface for MockUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        self.record(UiEvent::Message(msg.to_string()));
    }

    fn success(&mut self, msg: &str) {
        self.record(UiEvent::Success(msg.to_string()));
    }

    fn warning(&mut self, msg: &str) {
        self.record(UiEvent::Warning(msg.to_string()));
    }

    fn error(&mut self, msg: &str) {
        self.record(UiEvent::Error(msg.to_string()));
    }

    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle> {
        self.record(UiEvent::SpinnerStarted(message.to_string()));
        Box::new(MockSpinner {
            events: Rc::clone(&self.events),
        })
    }

    fn show_header(&mut self, title: &str) {
        self.record(UiEvent::Header(title.to_string()));
    }

    fn show_progress(&mut self, current: usize, total: usize) {
        self.record(UiEvent::Progress(current, total));
    }

    fn show_hint(&mut self, hint: &str) {
        self.record(UiEvent::Hint(hint.to_string()));
    }

    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>) {
        self.record(UiEvent::ErrorBlock {
            command: command.to_string(),
            output: output.to_string(),
            hint: hint.map(str::to_string),
        });
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.record(UiEvent::Summary(summary.clone()));
    }
}

/// Spinner that writes its outcome into the owning [`MockUI`]'s log.
#[derive(Debug)]
pub struct MockSpinner {
    events: EventLog,
}

impl MockSpinner {
    fn finish(&self, status: SpinnerStatus, msg: &str) {
        self.events
            .borrow_mut()
            .push(UiEvent::SpinnerFinished(status, msg.to_string()));
    }
}

impl SpinnerHandle for MockSpinner {
    fn finish_success(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Success, msg);
    }

    fn finish_error(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Error, msg);
    }

    fn finish_skipped(&mut self, msg: &str) {
        self.finish(SpinnerStatus::Skipped, msg);
    }
}
