//! # Action Sanitizer
//!
//! Strips credentials from actions before they are embedded in diagnostic
//! reports. Sanitizing works on the action's JSON form: every object key in
//! the redaction set has its value replaced by [`REDACTED`], at any depth.

use serde_json::Value;
use std::collections::HashSet;

use crate::shared::action::Action;
use crate::shared::config::{AppConfig, DEFAULT_REDACTED_KEYS};

/// Mask written in place of redacted values
pub const REDACTED: &str = "********";

/// Redacts secret-bearing fields from actions
#[derive(Debug, Clone)]
pub struct ActionSanitizer {
    redacted_keys: HashSet<String>,
}

impl Default for ActionSanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_REDACTED_KEYS.iter().map(|key| key.to_string()))
    }
}

impl ActionSanitizer {
    pub fn new<I>(redacted_keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            redacted_keys: redacted_keys.into_iter().collect(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.redacted_keys.iter().cloned())
    }

    /// JSON form of `action` with secrets masked; `null` if it can't be encoded
    pub fn sanitize(&self, action: &Action) -> Value {
        match serde_json::to_value(action) {
            Ok(value) => self.sanitize_value(value),
            Err(err) => {
                tracing::warn!(
                    "Failed to encode {} for sanitizing: {}",
                    action.action_type(),
                    err
                );
                Value::Null
            }
        }
    }

    /// Mask secrets in an arbitrary JSON value
    pub fn sanitize_value(&self, value: Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| {
                        if self.redacted_keys.contains(&key) {
                            (key, Value::String(REDACTED.to_string()))
                        } else {
                            (key, self.sanitize_value(value))
                        }
                    })
                    .collect(),
            ),
            Value::Array(items) => {
                Value::Array(items.into_iter().map(|item| self.sanitize_value(item)).collect())
            }
            other => other,
        }
    }
}
