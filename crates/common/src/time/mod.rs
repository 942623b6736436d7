//! Time abstraction for testability
//!
//! [`Clock`] measures elapsed time and reads the wall clock; [`Sleeper`]
//! suspends the calling task. Production code uses [`SystemClock`] and
//! [`TokioSleeper`]; tests swap in the doubles from `crate::testing`.

mod clock;
mod sleeper;

pub use clock::{Clock, SystemClock};
pub use sleeper::{Sleeper, TokioSleeper};
