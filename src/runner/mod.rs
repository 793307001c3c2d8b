//! Workflow orchestration: prompt collection and the phase/step loop.

pub mod prompts;
pub mod workflow;

pub use prompts::{build_prompt, collect_variables};
pub use workflow::{RunOptions, WorkflowResult, WorkflowRunner, DEFAULT_COMPLETION_MESSAGE};
