//! Retry policy with exponential backoff

use std::time::Duration;

/// Default total number of attempts (initial try + retries)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default exponential multiplier
pub const DEFAULT_MULTIPLIER: Duration = Duration::from_secs(1);

/// Default floor for backoff delays
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_secs(4);

/// Default ceiling for backoff delays
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(10);

/// Maximum exponent for exponential backoff calculation to prevent overflow
const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Backoff strategy for calculating retry delays
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// Fixed delay between retries
    Fixed(Duration),
    /// `multiplier * 2^(attempt - 1)`, clamped to `[min_delay, max_delay]`
    Exponential { multiplier: Duration, min_delay: Duration, max_delay: Duration },
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            multiplier: DEFAULT_MULTIPLIER,
            min_delay: DEFAULT_MIN_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }
}

impl BackoffStrategy {
    /// Delay to wait after the given 1-based attempt failed.
    pub fn calculate_delay(&self, attempt: u32) -> Duration {
        match self {
            Self::Fixed(delay) => *delay,
            Self::Exponential { multiplier, min_delay, max_delay } => {
                let exponent = attempt.saturating_sub(1).min(MAX_BACKOFF_EXPONENT);
                let raw = multiplier.saturating_mul(1u32 << exponent);
                raw.clamp(*min_delay, (*max_delay).max(*min_delay))
            }
        }
    }
}

/// Decision for whether to retry an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryDecision {
    /// Retry after sleeping for the given delay
    Retry(Duration),
    /// The error is not retryable; surface it now
    Stop,
    /// The error is retryable but the attempt budget is spent
    Exhausted,
}

/// Bounded retry policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS, backoff: BackoffStrategy::default() }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: BackoffStrategy) -> Self {
        Self { max_attempts: max_attempts.max(1), backoff }
    }

    /// Policy with the same attempt budget and no waiting between attempts.
    pub fn without_delay(max_attempts: u32) -> Self {
        Self::new(max_attempts, BackoffStrategy::Fixed(Duration::ZERO))
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }

    /// Decide what to do after `attempt` (1-based) failed.
    pub fn decide(&self, attempt: u32, retryable: bool) -> RetryDecision {
        if !retryable {
            RetryDecision::Stop
        } else if attempt >= self.max_attempts {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Retry(self.backoff.calculate_delay(attempt))
        }
    }
}
