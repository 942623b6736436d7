//! # Admin Hub Domain
//!
//! Business domain types for the workflow-automation admin hub.
//!
//! This crate contains:
//! - The `HubError` taxonomy and `Result` alias
//! - Client and application configuration with validation
//! - Workflow listing, export and health types
//! - Domain constants
//!
//! ## Architecture
//! - No dependencies on other adminhub crates
//! - No I/O: everything here is pure data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
