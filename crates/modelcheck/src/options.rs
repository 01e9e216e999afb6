//! Per-field validator configuration.

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Param name used by [`ValidatorOptions::compare_to`].
pub const DEFAULT_TARGET_KEY: &str = "path";

/// Configuration bag handed to a validator for one field.
///
/// Validators read their parameters by name (`min` reads `"min"`, `pattern`
/// reads `"pattern"`). Comparison validators look up the param named by
/// `target_key` to find their target path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidatorOptions {
    /// Named parameters
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, Value>,
    /// Message template replacing the validator's default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Name of the param holding a comparison target path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_key: Option<String>,
}

impl ValidatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options holding a single parameter.
    pub fn with(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new().param(key, value)
    }

    /// Options for a comparison validator targeting `path`.
    pub fn compare_to(path: impl Into<String>) -> Self {
        Self::new()
            .param(DEFAULT_TARGET_KEY, Value::String(path.into()))
            .with_target_key(DEFAULT_TARGET_KEY)
    }

    /// Add a parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Override the default message template.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Name the param that holds the comparison target path.
    pub fn with_target_key(mut self, key: impl Into<String>) -> Self {
        self.target_key = Some(key.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn message_override(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn target_key(&self) -> Option<&str> {
        self.target_key.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_to_sets_target_key() {
        let options = ValidatorOptions::compare_to("../sibling");
        assert_eq!(options.target_key(), Some("path"));
        assert_eq!(options.get("path"), Some(&Value::from("../sibling")));
    }

    #[test]
    fn deserializes_from_json() {
        let options: ValidatorOptions = serde_json::from_str(
            r#"{"params": {"min": 10}, "message": "At least {0}"}"#,
        )
        .unwrap();
        assert_eq!(options.get("min"), Some(&Value::Number(10.0)));
        assert_eq!(options.message_override(), Some("At least {0}"));
        assert!(options.target_key().is_none());
    }
}
