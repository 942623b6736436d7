//! Export bundle written for backups

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::EXPORT_ATTRIBUTION;

/// A full workflow payload plus export metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub workflow: Value,
    pub exported_at: DateTime<Utc>,
    pub exported_by: String,
    /// `true` only when the caller explicitly asked for raw credential
    /// references.
    pub credentials_included: bool,
}

impl ExportBundle {
    pub fn new(workflow: Value, exported_at: DateTime<Utc>, credentials_included: bool) -> Self {
        Self {
            workflow,
            exported_at,
            exported_by: EXPORT_ATTRIBUTION.to_string(),
            credentials_included,
        }
    }

    /// Display name of the exported workflow, if the payload carries one.
    pub fn workflow_name(&self) -> Option<&str> {
        self.workflow.get("name").and_then(Value::as_str)
    }
}
