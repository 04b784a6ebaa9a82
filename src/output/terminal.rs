//! Terminal renderer: one line per check, nested checks indented.

use colored::Colorize;

use crate::checks::{CheckOutcome, Status};
use crate::config::TermConfig;
use crate::output::OutputRenderer;

/// Terminal output renderer with colored status icons.
pub struct TerminalRenderer {
    /// Indent nested checks two spaces per level.
    pub use_level: bool,
    /// Width of the heading rule.
    pub max_width: usize,
}

impl TerminalRenderer {
    pub fn new(term: &TermConfig) -> Self {
        Self {
            use_level: term.use_level,
            max_width: term.max_width,
        }
    }

    fn render_node(&self, outcome: &CheckOutcome, level: usize, output: &mut String) {
        let indent = if self.use_level { "  ".repeat(level) } else { String::new() };
        let is_group = !outcome.children.is_empty();

        let icon = match outcome.status {
            Status::Passed => "✔".green().bold(),
            Status::Failed => "✖".red().bold(),
            Status::Skipped => "-".dimmed(),
        };

        let line = match outcome.status {
            Status::Skipped => format!("{}...{}", outcome.msg, outcome.detail).dimmed(),
            _ if is_group => outcome.msg.bold(),
            Status::Passed => format!("{}...{}", outcome.msg, outcome.detail).green(),
            Status::Failed => format!("{}...{}", outcome.msg, outcome.detail).red(),
        };
        output.push_str(&format!("{indent}{icon} {line}\n"));

        for child in &outcome.children {
            self.render_node(child, level + 1, output);
        }
    }

    /// `===== title =====` spanning `max_width` columns.
    fn heading(&self, title: &str) -> String {
        let title = format!(" {title} ");
        let width = title.chars().count();
        if width >= self.max_width {
            return title.trim().to_string();
        }
        let left = (self.max_width - width) / 2;
        let right = self.max_width - width - left;
        format!("{}{title}{}", "=".repeat(left), "=".repeat(right))
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(&TermConfig::default())
    }
}

impl OutputRenderer for TerminalRenderer {
    fn render(&self, outcome: &CheckOutcome) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", self.heading(&outcome.name).bold()));

        if outcome.children.is_empty() {
            self.render_node(outcome, 0, &mut output);
        } else {
            for child in &outcome.children {
                self.render_node(child, 0, &mut output);
            }
        }

        let summary = outcome.summary();
        let result = if outcome.passed() {
            "PASSED".green().bold()
        } else {
            "FAILED".red().bold()
        };
        output.push_str(&format!("{}\n", "─".repeat(self.max_width.min(35)).dimmed()));
        output.push_str(&format!(
            " {result} {} {}: {} passed, {} failed, {} skipped\n",
            summary.total.to_string().bold(),
            if summary.total == 1 { "check" } else { "checks" },
            summary.passed.to_string().green().bold(),
            summary.failed.to_string().red().bold(),
            summary.skipped.to_string().dimmed(),
        ));
        output
    }
}
