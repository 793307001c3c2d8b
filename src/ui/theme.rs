//! Visual theme and styling.

use console::Style;

/// kiln's visual theme.
#[derive(Debug, Clone)]
pub struct KilnTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for phase titles (cyan bold).
    pub phase: Style,
    /// Style for step titles (bold).
    pub step_title: Style,
    /// Style for headers (magenta bold).
    pub header: Style,
}

impl Default for KilnTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl KilnTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            phase: Style::new().cyan().bold(),
            step_title: Style::new().bold(),
            header: Style::new().bold().magenta(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            phase: Style::new(),
            step_title: Style::new(),
            header: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a skipped message (icon + text in dim).
    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format an informational note.
    pub fn format_note(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("ℹ {}", msg)))
    }

    /// Format a phase title with optional description.
    pub fn format_phase(&self, title: &str, description: Option<&str>) -> String {
        match description {
            Some(desc) => format!(
                "{}\n  {}",
                self.phase.apply_to(format!("▶ {}", title)),
                self.dim.apply_to(desc)
            ),
            None => format!("{}", self.phase.apply_to(format!("▶ {}", title))),
        }
    }

    /// Format a step title with optional description.
    pub fn format_step(&self, title: &str, description: Option<&str>) -> String {
        match description {
            Some(desc) => format!(
                "{} {}",
                self.step_title.apply_to(format!("◆ {}", title)),
                self.dim.apply_to(desc)
            ),
            None => format!("{}", self.step_title.apply_to(format!("◆ {}", title))),
        }
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        format!(
            "{} {}",
            self.header.apply_to("🔥"),
            self.highlight.apply_to(title)
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check if stdout is a TTY
    console::Term::stdout().is_term()
}
