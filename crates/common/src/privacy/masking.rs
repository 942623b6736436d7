//! Recursive masking of sensitive values in JSON documents

use serde_json::{Map, Value};

/// Replacement written over sensitive values.
pub const MASK: &str = "***MASKED***";

/// Key fragments that mark a value as sensitive (matched case-insensitively).
const SENSITIVE_PATTERNS: &[&str] = &[
    "api_key",
    "apikey",
    "token",
    "password",
    "secret",
    "key",
    "credential",
    "auth",
    "authorization",
];

/// Whether a mapping key names sensitive material.
pub fn is_sensitive_key(key: &str) -> bool {
    let lower = key.to_ascii_lowercase();
    SENSITIVE_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Return a copy of `value` with sensitive entries replaced by [`MASK`].
///
/// Structure is preserved. A sensitive key whose value is empty (null or an
/// empty string) becomes `null` so "unset" stays distinguishable from "set".
pub fn mask_secrets(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let masked: Map<String, Value> = map
                .iter()
                .map(|(key, inner)| {
                    let replaced = if is_sensitive_key(key) {
                        mask_leaf(inner)
                    } else {
                        mask_secrets(inner)
                    };
                    (key.clone(), replaced)
                })
                .collect();
            Value::Object(masked)
        }
        Value::Array(items) => Value::Array(items.iter().map(mask_secrets).collect()),
        other => other.clone(),
    }
}

fn mask_leaf(value: &Value) -> Value {
    match value {
        Value::Null => Value::Null,
        Value::String(text) if text.is_empty() => Value::Null,
        _ => Value::String(MASK.to_string()),
    }
}
