//! # Admin Hub Infrastructure
//!
//! Everything in the admin hub that performs I/O.
//!
//! This crate contains:
//! - The pooled HTTP transport ([`http`])
//! - The workflow-service client and its retry, normalization, redaction
//!   and health-probe stages ([`n8n`])
//! - Configuration loading and validation ([`config`])
//! - Conversion of `reqwest` failures into [`HubError`](adminhub_domain::HubError)
//!
//! ## Architecture
//! - Depends on `adminhub-domain` for types and `adminhub-common` for retry
//!   and time abstractions
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod n8n;

// Re-export commonly used items
pub use n8n::{ConnectionScope, ListQuery, N8nClient, N8nClientBuilder};
