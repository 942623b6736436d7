//! Normalization of workflow listing payloads.
//!
//! The service answers list calls either with an envelope
//! `{"data": [...], "nextCursor": ...}` or, on older versions, a bare array.
//! Any other shape yields an empty page. Each record is validated on its
//! own; malformed ones are skipped without failing the listing.

use adminhub_domain::{RawWorkflowRecord, WorkflowPage, WorkflowSummary};
use serde_json::Value;
use tracing::{debug, warn};

/// Outcome of normalizing a single listing record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    Parsed(WorkflowSummary),
    Skipped(SkippedRecord),
}

/// A listing record that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the original payload
    pub index: usize,
    pub reason: String,
}

/// A normalized page plus the records that were dropped from it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedListing {
    pub page: WorkflowPage,
    pub skipped: Vec<SkippedRecord>,
}

/// Validate one raw record.
pub fn normalize_record(index: usize, record: Value) -> RecordOutcome {
    let parsed = serde_json::from_value::<RawWorkflowRecord>(record)
        .map_err(|e| e.to_string())
        .and_then(|raw| WorkflowSummary::try_from(raw).map_err(|e| e.to_string()));

    match parsed {
        Ok(summary) => RecordOutcome::Parsed(summary),
        Err(reason) => RecordOutcome::Skipped(SkippedRecord { index, reason }),
    }
}

/// Normalize a decoded listing body, preserving record order.
pub fn normalize_listing(payload: Value) -> NormalizedListing {
    let (records, next_cursor) = match payload {
        Value::Array(records) => (records, None),
        Value::Object(mut envelope) => {
            let next_cursor = match envelope.remove("nextCursor") {
                Some(Value::String(cursor)) => Some(cursor),
                _ => None,
            };
            match envelope.remove("data") {
                Some(Value::Array(records)) => (records, next_cursor),
                _ => {
                    warn!("listing envelope has no data array, treating as empty");
                    (Vec::new(), next_cursor)
                }
            }
        }
        other => {
            warn!(kind = value_kind(&other), "unexpected listing payload, treating as empty");
            (Vec::new(), None)
        }
    };

    let total = records.len();
    let mut listing = NormalizedListing::default();
    listing.page.next_cursor = next_cursor;

    for (index, record) in records.into_iter().enumerate() {
        match normalize_record(index, record) {
            RecordOutcome::Parsed(summary) => listing.page.workflows.push(summary),
            RecordOutcome::Skipped(skipped) => {
                warn!(index = skipped.index, reason = %skipped.reason, "skipping malformed workflow record");
                listing.skipped.push(skipped);
            }
        }
    }

    debug!(
        total,
        parsed = listing.page.workflows.len(),
        skipped = listing.skipped.len(),
        has_next_cursor = listing.page.next_cursor.is_some(),
        "normalized workflow listing"
    );
    listing
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
