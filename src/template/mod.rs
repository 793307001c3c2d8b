//! Variables, conditions and template resolution.
//!
//! - [`VariableStore`] holds the run's variables
//! - [`Condition`] parses and evaluates `when:` expressions
//! - [`TemplateResolver`] expands `{{name}}` and `{{#if}}` blocks

pub mod condition;
pub mod resolver;
pub mod store;

pub use condition::Condition;
pub use resolver::TemplateResolver;
pub use store::{Value, VariableStore};
