//! Health probe results

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability verdict of a health probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

/// Outcome of one health probe. Always produced, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: HealthState,
    #[serde(rename = "response_time_seconds", with = "duration_secs")]
    pub response_time: Duration,
    pub api_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthStatus {
    pub fn healthy(
        response_time: Duration,
        api_url: impl Into<String>,
        workflow_count: usize,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: HealthState::Healthy,
            response_time,
            api_url: api_url.into(),
            workflow_count: Some(workflow_count),
            error: None,
            checked_at,
        }
    }

    pub fn unhealthy(
        response_time: Duration,
        api_url: impl Into<String>,
        error: impl Into<String>,
        checked_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: HealthState::Unhealthy,
            response_time,
            api_url: api_url.into(),
            workflow_count: None,
            error: Some(error.into()),
            checked_at,
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Serialize durations as fractional seconds rounded to milliseconds.
mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let rounded = (value.as_secs_f64() * 1000.0).round() / 1000.0;
        serializer.serialize_f64(rounded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
