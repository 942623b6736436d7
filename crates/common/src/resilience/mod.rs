//! Resilience patterns for transient failures
//!
//! Provides the backoff arithmetic and the retry decision. The retry loop
//! itself lives with the caller, which knows how to classify its errors and
//! may need to interleave its own waits (e.g. honoring `Retry-After`).

pub mod retry;

pub use retry::{BackoffStrategy, RetryDecision, RetryPolicy};
