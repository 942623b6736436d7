use std::time::{Instant, SystemTime};

/// Trait for time operations to enable testing
///
/// Lets code work with either real system time or mocked time.
pub trait Clock: Send + Sync {
    /// Get current instant (monotonic time)
    ///
    /// Suitable for measuring durations.
    fn now(&self) -> Instant;

    /// Get current system time (wall clock)
    fn system_time(&self) -> SystemTime;
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}
