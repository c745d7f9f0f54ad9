//! Boxed blocks shared by the terminal and plain renderers.
//!
//! Renderers return finished lines; each UI decides where they go.

use std::fmt::Display;

use super::{format_duration, RunSummary, Theme};

/// Width of the horizontal edges, corner included.
const EDGE_WIDTH: usize = 37;

/// A block of rows framed by light box-drawing characters.
pub struct Panel<'t> {
    theme: &'t Theme,
    indent: usize,
    lines: Vec<String>,
}

impl<'t> Panel<'t> {
    /// Open a panel whose top edge carries `title`.
    pub fn open(theme: &'t Theme, indent: usize, title: &str) -> Self {
        let mut panel = Self {
            theme,
            indent,
            lines: Vec::new(),
        };
        panel.edge("┌─", Some(title));
        panel
    }

    /// Start a titled section inside the panel.
    pub fn section(&mut self, title: &str) {
        self.edge("├─", Some(title));
    }

    /// Untitled separator.
    pub fn divider(&mut self) {
        self.edge("├", None);
    }

    /// One framed row.
    pub fn row(&mut self, text: impl Display) {
        let line = format!(
            "{:indent$}{} {}",
            "",
            self.theme.border.apply_to("│"),
            text,
            indent = self.indent
        );
        self.lines.push(line.trim_end().to_string());
    }

    /// Draw the bottom edge and hand back the lines.
    pub fn close(mut self) -> Vec<String> {
        self.edge("└", None);
        self.lines
    }

    fn edge(&mut self, corner: &str, title: Option<&str>) {
        let head = match title {
            Some(t) => format!("{} {} ", corner, t),
            None => corner.to_string(),
        };
        let fill = EDGE_WIDTH.saturating_sub(head.chars().count());
        let edge = format!("{}{}", head, "─".repeat(fill));
        self.lines.push(format!(
            "{:indent$}{}",
            "",
            self.theme.border.apply_to(edge),
            indent = self.indent
        ));
    }
}

/// A failed command, its captured output and an optional hint.
pub fn error_block(theme: &Theme, command: &str, output: &str, hint: Option<&str>) -> Vec<String> {
    let mut panel = Panel::open(theme, 4, "Command");
    panel.row(theme.command.apply_to(command));
    if !output.is_empty() {
        panel.section("Output");
        for line in output.lines() {
            panel.row(line);
        }
    }

    let mut lines = panel.close();
    if let Some(h) = hint {
        lines.push(format!("    {}", theme.hint.apply_to(format!("Hint: {}", h))));
    }
    lines
}

/// Per-step outcome table followed by the totals.
pub fn run_summary(theme: &Theme, summary: &RunSummary) -> Vec<String> {
    let mut panel = Panel::open(theme, 2, "Summary");

    for line in &summary.lines {
        let note = match (line.duration, &line.detail) {
            (Some(d), _) => format_duration(d),
            (None, Some(detail)) => detail.clone(),
            (None, None) => String::new(),
        };
        panel.row(format_args!(
            "{} {:<20} {}",
            theme.status_icon(line.status),
            line.name,
            theme.dim.apply_to(note)
        ));
    }

    let dot = theme.dim.apply_to("·");
    panel.divider();
    panel.row(format_args!(
        "Total: {} {} {} run {} {} skipped",
        theme.dim.apply_to(format_duration(summary.total_duration)),
        dot,
        summary.steps_run,
        dot,
        summary.steps_skipped
    ));
    panel.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::StepStatus;
    use crate::ui::SummaryLine;
    use std::time::Duration;

    #[test]
    fn edges_share_one_width() {
        let theme = Theme::plain();
        let mut panel = Panel::open(&theme, 0, "Command");
        panel.section("Output");
        panel.divider();
        let lines = panel.close();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("┌─ Command ─"));
        assert!(lines[1].starts_with("├─ Output ─"));
        assert!(lines.iter().all(|l| l.chars().count() == EDGE_WIDTH));
    }

    #[test]
    fn error_block_frames_command_and_output() {
        let theme = Theme::plain();
        let lines = error_block(
            &theme,
            "/env/bin/pip install click",
            "ERROR: no network\nretrying",
            Some("Check network access"),
        );

        assert_eq!(lines[1], "    │ /env/bin/pip install click");
        assert!(lines[2].contains("Output"));
        assert_eq!(lines[3], "    │ ERROR: no network");
        assert_eq!(lines[4], "    │ retrying");
        assert!(lines[5].trim_start().starts_with('└'));
        assert_eq!(lines[6], "    Hint: Check network access");
    }

    #[test]
    fn error_block_without_output_or_hint() {
        let theme = Theme::plain();
        let lines = error_block(&theme, "virtualenv .", "", None);

        assert_eq!(lines.len(), 3);
        assert!(!lines.iter().any(|l| l.contains("Output")));
    }

    #[test]
    fn summary_lists_steps_then_totals() {
        let theme = Theme::plain();
        let summary = RunSummary {
            lines: vec![
                SummaryLine {
                    name: "create environment".to_string(),
                    status: StepStatus::Skipped,
                    duration: None,
                    detail: Some("environment already present".to_string()),
                },
                SummaryLine {
                    name: "install click".to_string(),
                    status: StepStatus::Completed,
                    duration: Some(Duration::from_millis(40)),
                    detail: None,
                },
            ],
            total_duration: Duration::from_millis(1500),
            steps_run: 1,
            steps_skipped: 1,
            success: true,
            failed_steps: Vec::new(),
        };

        let lines = run_summary(&theme, &summary);

        assert!(lines[0].contains("Summary"));
        assert!(lines[1].contains("create environment"));
        assert!(lines[1].ends_with("environment already present"));
        assert!(lines[2].ends_with("40ms"));
        assert_eq!(lines[4], "  │ Total: 1.5s · 1 run · 1 skipped");
        assert_eq!(lines.len(), 6);
    }
}
