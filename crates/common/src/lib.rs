//! Common runtime utilities shared across adminhub crates.
//!
//! - [`time`]: clock and sleep abstractions so retry timing can be injected
//! - [`resilience`]: backoff strategy and retry policy
//! - [`privacy`]: masking of sensitive values before display
//! - [`testing`]: deterministic doubles (`test-utils` feature)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod privacy;
pub mod resilience;
pub mod time;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use resilience::{BackoffStrategy, RetryDecision, RetryPolicy};
pub use time::{Clock, Sleeper, SystemClock, TokioSleeper};
