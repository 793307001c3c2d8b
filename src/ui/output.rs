//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show everything, including informational notes.
    Verbose,
    /// Show progress and status.
    #[default]
    Normal,
    /// Show step results and final status only.
    Quiet,
}

impl OutputMode {
    /// Check if this mode shows informational notes.
    pub fn shows_notes(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }

    /// Check if this mode shows phase and step headers.
    pub fn shows_progress(&self) -> bool {
        matches!(self, Self::Verbose | Self::Normal)
    }
}
