//! Health probing.
//!
//! A probe lists a single workflow and times the round trip. It never
//! fails: every error is folded into an unhealthy [`HealthStatus`].

use std::sync::Arc;

use adminhub_common::{Clock, SystemClock};
use adminhub_domain::{HealthStatus, Result, WorkflowPage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::client::ListQuery;

/// Source of workflow listings a probe can exercise.
#[async_trait]
pub trait WorkflowLister: Send + Sync {
    async fn list_page(&self, query: &ListQuery) -> Result<WorkflowPage>;
}

/// Measures service reachability with a minimal listing call.
#[derive(Clone)]
pub struct HealthProber {
    clock: Arc<dyn Clock>,
}

impl Default for HealthProber {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl HealthProber {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Probe `lister`, reporting against `api_url`.
    pub async fn probe(&self, lister: &dyn WorkflowLister, api_url: &str) -> HealthStatus {
        let query = ListQuery::default().with_limit(1);
        let started = self.clock.now();
        let result = lister.list_page(&query).await;
        let response_time = self.clock.now().saturating_duration_since(started);
        let checked_at = DateTime::<Utc>::from(self.clock.system_time());

        match result {
            Ok(page) => {
                info!(
                    response_time_ms = response_time.as_millis() as u64,
                    "workflow service is healthy"
                );
                HealthStatus::healthy(response_time, api_url, page.workflows.len(), checked_at)
            }
            Err(err) => {
                warn!(
                    response_time_ms = response_time.as_millis() as u64,
                    kind = err.label(),
                    error = %err,
                    "workflow service health check failed"
                );
                HealthStatus::unhealthy(response_time, api_url, err.to_string(), checked_at)
            }
        }
    }
}
