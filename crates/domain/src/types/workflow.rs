//! Workflow listing records
//!
//! [`RawWorkflowRecord`] mirrors one element of the service's listing payload
//! and is deliberately permissive; [`WorkflowSummary`] is the validated form
//! and can only be obtained through [`WorkflowSummary::new`] or
//! `TryFrom<RawWorkflowRecord>`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{HubError, Result};

/// Summary of one workflow as returned by a listing call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary {
    active: bool,
    id: String,
    name: String,
    node_count: u64,
    connection_count: u64,
    created_at: String,
    updated_at: String,
}

impl WorkflowSummary {
    /// Build a summary, trimming the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Validation`] when the identifier is empty after
    /// trimming.
    pub fn new(
        active: bool,
        id: &str,
        name: impl Into<String>,
        node_count: u64,
        connection_count: u64,
        created_at: impl Into<String>,
        updated_at: impl Into<String>,
    ) -> Result<Self> {
        let id = id.trim();
        if id.is_empty() {
            return Err(HubError::Validation("Workflow ID cannot be empty".into()));
        }

        Ok(Self {
            active,
            id: id.to_string(),
            name: name.into(),
            node_count,
            connection_count,
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        })
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> u64 {
        self.node_count
    }

    pub fn connection_count(&self) -> u64 {
        self.connection_count
    }

    /// Creation timestamp, ISO-8601 as sent by the service.
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    /// Last update timestamp, ISO-8601 as sent by the service.
    pub fn updated_at(&self) -> &str {
        &self.updated_at
    }
}

/// A workflow identifier as it may appear on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IdField {
    Text(String),
    Number(serde_json::Number),
}

impl IdField {
    fn as_string(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Node or connection count. Listings may carry a number, the full node
/// array, or the connection map keyed by source node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CountField {
    Count(u64),
    Items(Vec<Value>),
    Entries(Map<String, Value>),
}

impl Default for CountField {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl CountField {
    pub fn count(&self) -> u64 {
        match self {
            Self::Count(count) => *count,
            Self::Items(items) => items.len() as u64,
            Self::Entries(entries) => entries.len() as u64,
        }
    }
}

/// One record of a listing payload before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawWorkflowRecord {
    pub active: bool,
    pub id: IdField,
    pub name: String,
    #[serde(default)]
    pub nodes: CountField,
    #[serde(default)]
    pub connections: CountField,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<RawWorkflowRecord> for WorkflowSummary {
    type Error = HubError;

    fn try_from(raw: RawWorkflowRecord) -> Result<Self> {
        Self::new(
            raw.active,
            &raw.id.as_string(),
            raw.name,
            raw.nodes.count(),
            raw.connections.count(),
            raw.created_at,
            raw.updated_at,
        )
    }
}

/// One page of a workflow listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowPage {
    pub workflows: Vec<WorkflowSummary>,
    /// Opaque continuation token, passed through untouched.
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_valid_workflow_summary() {
        let summary = WorkflowSummary::new(
            true,
            "workflow_123",
            "Test Workflow",
            5,
            4,
            "2025-08-22T10:00:00Z",
            "2025-08-22T12:00:00Z",
        )
        .unwrap();

        assert!(summary.active());
        assert_eq!(summary.id(), "workflow_123");
        assert_eq!(summary.name(), "Test Workflow");
        assert_eq!(summary.node_count(), 5);
        assert_eq!(summary.connection_count(), 4);
    }

    #[test]
    fn test_empty_workflow_id_fails() {
        for id in ["", "   "] {
            let result = WorkflowSummary::new(true, id, "Test", 0, 0, "a", "b");
            assert!(matches!(result, Err(HubError::Validation(_))), "id: {id:?}");
        }
    }

    #[test]
    fn test_identifier_is_trimmed() {
        let summary = WorkflowSummary::new(false, "  wf-9 ", "n", 0, 0, "a", "b").unwrap();
        assert_eq!(summary.id(), "wf-9");
    }

    #[test]
    fn test_raw_record_counts_from_arrays_and_maps() {
        let raw: RawWorkflowRecord = serde_json::from_value(json!({
            "active": false,
            "id": 42,
            "name": "Nightly sync",
            "nodes": [{ "name": "Start" }, { "name": "HTTP" }, { "name": "Slack" }],
            "connections": { "Start": {}, "HTTP": {} },
            "createdAt": "2025-08-22T10:00:00Z",
            "updatedAt": "2025-08-22T11:00:00Z"
        }))
        .unwrap();

        let summary = WorkflowSummary::try_from(raw).unwrap();
        assert_eq!(summary.id(), "42");
        assert_eq!(summary.node_count(), 3);
        assert_eq!(summary.connection_count(), 2);
    }

    #[test]
    fn test_raw_record_missing_counts_default_to_zero() {
        let raw: RawWorkflowRecord = serde_json::from_value(json!({
            "active": true,
            "id": "wf",
            "name": "n",
            "createdAt": "c",
            "updatedAt": "u"
        }))
        .unwrap();

        let summary = WorkflowSummary::try_from(raw).unwrap();
        assert_eq!(summary.node_count(), 0);
        assert_eq!(summary.connection_count(), 0);
    }

    #[test]
    fn test_raw_record_requires_timestamps() {
        let result = serde_json::from_value::<RawWorkflowRecord>(json!({
            "active": true,
            "id": "wf",
            "name": "n"
        }));
        assert!(result.is_err());
    }
}
