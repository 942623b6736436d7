//! Credential redaction for exported workflow definitions.

use adminhub_domain::constants::{REDACTED_CREDENTIAL_ID, REDACTED_CREDENTIAL_NAME};
use serde_json::{json, Value};

/// A sanitized copy of a workflow definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    pub workflow: Value,
    /// Number of credential references replaced
    pub redacted: usize,
}

/// Replace every `nodes[].credentials` entry with a fixed placeholder.
///
/// Credential slot names are kept so the workflow structure stays
/// recognizable. The input is never modified.
pub fn sanitize_credentials(workflow: &Value) -> Sanitized {
    let mut workflow = workflow.clone();
    let mut redacted = 0;

    if let Some(nodes) = workflow.get_mut("nodes").and_then(Value::as_array_mut) {
        for credentials in nodes
            .iter_mut()
            .filter_map(|node| node.get_mut("credentials"))
            .filter_map(Value::as_object_mut)
        {
            for reference in credentials.values_mut() {
                *reference = placeholder();
                redacted += 1;
            }
        }
    }

    Sanitized { workflow, redacted }
}

fn placeholder() -> Value {
    json!({ "id": REDACTED_CREDENTIAL_ID, "name": REDACTED_CREDENTIAL_NAME })
}
