//! Template resolution against the variable store.
//!
//! # Syntax
//!
//! - `{{#if COND}}BODY{{/if}}` - BODY if COND holds, otherwise nothing
//! - `{{name}}` - replaced with the variable's value
//!
//! Conditional blocks are resolved first. Each block ends at the nearest
//! `{{/if}}`; blocks do not nest. An unknown `{{name}}` is left in the output
//! untouched and a warning is logged.
//!
//! # Example
//!
//! ```
//! use kiln::template::{TemplateResolver, VariableStore};
//!
//! let mut store = VariableStore::new();
//! store.insert("name", "demo");
//! store.insert("use_ts", true);
//!
//! let resolver = TemplateResolver::new(&store);
//! assert_eq!(
//!     resolver.resolve("{{name}}{{#if use_ts}}.ts{{/if}}"),
//!     "demo.ts"
//! );
//! ```

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::condition::Condition;
use super::store::VariableStore;

static IF_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{#if\s+(.*?)\}\}(.*?)\{\{/if\}\}").unwrap());
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

/// Resolves templates and conditions against a borrowed store.
#[derive(Debug, Clone, Copy)]
pub struct TemplateResolver<'a> {
    store: &'a VariableStore,
}

impl<'a> TemplateResolver<'a> {
    pub fn new(store: &'a VariableStore) -> Self {
        Self { store }
    }

    /// Resolve conditional blocks, then variables.
    pub fn resolve(&self, text: &str) -> String {
        let without_blocks = IF_BLOCK.replace_all(text, |caps: &Captures<'_>| {
            if Condition::parse(&caps[1]).evaluate(self.store) {
                caps[2].to_string()
            } else {
                String::new()
            }
        });

        VARIABLE
            .replace_all(&without_blocks, |caps: &Captures<'_>| {
                let name = &caps[1];
                match self.store.get(name) {
                    Some(value) => value.to_string(),
                    None => {
                        tracing::warn!("Variable '{}' is not defined, leaving it unresolved", name);
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }

    /// Evaluate a bare condition.
    pub fn evaluate(&self, condition: &str) -> bool {
        Condition::parse(condition).evaluate(self.store)
    }

    /// Evaluate a `when:` value (braces optional).
    pub fn evaluate_when(&self, when: &str) -> bool {
        Condition::parse_when(when).evaluate(self.store)
    }
}
