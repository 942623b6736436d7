//! Data types exchanged with the workflow service and its callers

pub mod export;
pub mod health;
pub mod workflow;

pub use export::ExportBundle;
pub use health::{HealthState, HealthStatus};
pub use workflow::{CountField, RawWorkflowRecord, WorkflowPage, WorkflowSummary};
