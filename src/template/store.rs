//! The run's variable store.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A scalar variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Value {
    /// Truthiness used by conditions.
    ///
    /// False for boolean `false`, numeric zero, the empty string and the
    /// strings `"false"` and `"none"`.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !(s.is_empty() || s == "false" || s == "none"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            // Whole numbers print without a trailing ".0".
            Self::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// Name → value map shared by every resolver call.
///
/// Written while variables are collected (seed, then prompt answers) and only
/// read once phases start; the workflow runner hands out `&VariableStore`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableStore {
    values: HashMap<String, Value>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from the document's `config.variables`. Null entries
    /// stay unset.
    pub fn seeded(variables: &HashMap<String, Option<Value>>) -> Self {
        Self {
            values: variables
                .iter()
                .filter_map(|(name, value)| Some((name.clone(), value.clone()?)))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Merge answers in; later entries win.
    pub fn merge(&mut self, answers: impl IntoIterator<Item = (String, Value)>) {
        self.values.extend(answers);
    }

    /// Truthy check; an absent variable is falsy.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }
}
