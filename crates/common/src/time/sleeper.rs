use std::time::Duration;

use async_trait::async_trait;

/// Suspends the calling task for a duration.
///
/// Retry loops take a `Sleeper` instead of calling `tokio::time::sleep`
/// directly so tests can observe requested delays without waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by the Tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
