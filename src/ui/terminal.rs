//! Interactive terminal UI.

use console::Term;
use std::io::Write;

use crate::error::Result;

use super::{
    prompt_user, should_use_colors, KilnTheme, NonInteractiveUI, OutputMode, Prompt,
    PromptResult, RunSummary, UserInterface,
};

/// Interactive terminal UI implementation.
///
/// Normal output goes to stdout; warnings and errors go to stderr.
pub struct TerminalUI {
    term: Term,
    err: Term,
    theme: KilnTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            KilnTheme::new()
        } else {
            KilnTheme::plain()
        };

        Self {
            term: Term::stdout(),
            err: Term::stderr(),
            theme,
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.term, "{}", msg).ok();
    }

    fn note(&mut self, msg: &str) {
        if self.mode.shows_notes() {
            writeln!(self.term, "  {}", self.theme.format_note(msg)).ok();
        }
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.term, "  {}", self.theme.format_success(msg)).ok();
    }

    fn skipped(&mut self, msg: &str) {
        writeln!(self.term, "  {}", self.theme.format_skipped(msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_warning(msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        prompt_user(prompt, &self.term)
    }

    fn show_phase(&mut self, title: &str, description: Option<&str>) {
        if self.mode.shows_progress() {
            writeln!(self.term, "\n{}", self.theme.format_phase(title, description)).ok();
        }
    }

    fn show_step(&mut self, title: &str, description: Option<&str>) {
        if self.mode.shows_progress() {
            writeln!(self.term, "{}", self.theme.format_step(title, description)).ok();
        }
    }

    fn show_run_header(&mut self, name: &str, version: Option<&str>, step_count: usize) {
        let step_label = if step_count == 1 { "step" } else { "steps" };
        let version = version.map(|v| format!(" v{}", v)).unwrap_or_default();
        writeln!(
            self.term,
            "\n{} {} {}\n",
            self.theme.format_header(name),
            self.theme.dim.apply_to(version),
            self.theme
                .dim
                .apply_to(format!("· {} {}", step_count, step_label)),
        )
        .ok();
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        writeln!(self.term).ok();
        writeln!(
            self.term,
            "{} {}",
            self.theme.highlight.apply_to("Summary:"),
            self.theme.dim.apply_to(summary.line())
        )
        .ok();
    }
}

/// Create the appropriate UI based on context.
pub fn create_ui(interactive: bool, mode: OutputMode) -> Box<dyn UserInterface> {
    if interactive && Term::stdout().is_term() {
        Box::new(TerminalUI::new(mode))
    } else {
        Box::new(NonInteractiveUI::new(mode))
    }
}
