//! Restricted condition expressions.
//!
//! Conditions accept exactly three forms, tried in this order:
//!
//! - `name == 'literal'` (or double quotes): string equality
//! - `name`: truthy check
//! - `!name`: negated truthy check
//!
//! Anything else parses as [`Condition::Unrecognized`] and evaluates to false.

use regex::Regex;
use std::sync::LazyLock;

use super::store::VariableStore;

static EQUALITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\w+)\s*==\s*(?:'([^']*)'|"([^"]*)")$"#).unwrap()
});
static TRUTHY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\w+)$").unwrap());
static FALSY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^!\s*(\w+)$").unwrap());

/// A parsed condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `var == 'literal'`
    Equality { var: String, literal: String },
    /// `var`
    Truthy { var: String },
    /// `!var`
    Falsy { var: String },
    /// Any other text
    Unrecognized(String),
}

impl Condition {
    /// Parse a condition string. Surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();

        if let Some(caps) = EQUALITY.captures(input) {
            let literal = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            return Self::Equality {
                var: caps[1].to_string(),
                literal: literal.to_string(),
            };
        }
        if let Some(caps) = TRUTHY.captures(input) {
            return Self::Truthy {
                var: caps[1].to_string(),
            };
        }
        if let Some(caps) = FALSY.captures(input) {
            return Self::Falsy {
                var: caps[1].to_string(),
            };
        }
        Self::Unrecognized(input.to_string())
    }

    /// Parse a `when:` value, which may be wrapped in `{{` `}}`.
    pub fn parse_when(input: &str) -> Self {
        Self::parse(strip_delimiters(input))
    }

    /// Evaluate against the store. Unrecognized conditions are false.
    pub fn evaluate(&self, store: &VariableStore) -> bool {
        match self {
            Self::Equality { var, literal } => store
                .get(var)
                .is_some_and(|value| value.to_string() == *literal),
            Self::Truthy { var } => store.is_truthy(var),
            Self::Falsy { var } => !store.is_truthy(var),
            Self::Unrecognized(text) => {
                tracing::warn!("Unrecognized condition '{}', treating as false", text);
                false
            }
        }
    }
}

/// Strip one pair of surrounding `{{` `}}` and whitespace.
fn strip_delimiters(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
        .map_or(trimmed, str::trim)
}
