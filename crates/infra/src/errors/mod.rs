//! Error conversions for infrastructure failures.

mod conversions;

pub use conversions::{body_read_error, InfraError};
