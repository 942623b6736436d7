//! Privacy helpers for anything rendered to a human or a log

pub mod masking;

pub use masking::{is_sensitive_key, mask_secrets, MASK};
