//! Workflow-service API client and its building blocks.
//!
//! - [`executor`]: bounded retries over the pooled transport
//! - [`normalizer`]: listing payload shapes to [`WorkflowPage`](adminhub_domain::WorkflowPage)
//! - [`sanitizer`]: credential redaction for exports
//! - [`health`]: never-failing health probe

mod client;
pub mod executor;
pub mod health;
pub mod normalizer;
pub mod sanitizer;

pub use client::{ConnectionScope, ListQuery, N8nClient, N8nClientBuilder};
pub use executor::{ApiResponse, RequestExecutor};
pub use health::{HealthProber, WorkflowLister};
pub use normalizer::{normalize_listing, NormalizedListing, RecordOutcome, SkippedRecord};
pub use sanitizer::{sanitize_credentials, Sanitized};
