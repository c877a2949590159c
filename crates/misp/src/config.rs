//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Host-tunable interpreter settings.
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Evaluation steps allowed per top-level evaluation; `None` is unbounded.
    pub gas_limit: Option<u64>,
    /// Name under which the global scope holds a reference to itself.
    pub self_binding: Option<String>,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            gas_limit: None,
            self_binding: Some("@".to_string()),
        }
    }
}

impl InterpreterConfig {
    /// Deserialize from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
