//! Shell command execution.

pub mod command;
pub mod interactive;
pub mod platform;

pub use command::{execute, CommandOptions, CommandResult};
pub use interactive::{execute_interactive, match_interaction, OperatorInput};
pub use platform::is_ci;
