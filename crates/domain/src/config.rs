//! Configuration structures
//!
//! [`ClientConfig`] is the validated, immutable input of the API client.
//! [`AppConfig`] is the raw shape loaded from environment or file; it is
//! turned into a `ClientConfig` with [`N8nSettings::to_client_config`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{API_VERSION_PATH, DEFAULT_BASE_URL, DEFAULT_BACKUP_DIRECTORY};
use crate::errors::{HubError, Result};

/// Normalize a base address to its canonical API-root form.
///
/// Trailing slashes are stripped and [`API_VERSION_PATH`] is appended unless
/// already present, so the result ends with it exactly once.
///
/// ```
/// use adminhub_domain::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://localhost:5678/"), "http://localhost:5678/api/v1");
/// assert_eq!(normalize_base_url("http://localhost:5678/api/v1"), "http://localhost:5678/api/v1");
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');

    if trimmed.ends_with(API_VERSION_PATH) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_VERSION_PATH}")
    }
}

/// Validated client configuration.
///
/// Immutable once constructed. The API key is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: String,
    base_url: String,
    workflow_id: Option<String>,
}

impl ClientConfig {
    /// Build a configuration, validating every field.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::Config`] if the API key is empty, or if the base
    /// address is not an absolute `http`/`https` URL with a host.
    pub fn new(api_key: impl Into<String>, base_url: &str, workflow_id: Option<&str>) -> Result<Self> {
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(HubError::Config("API key is required".into()));
        }

        validate_base_url(base_url)?;

        let workflow_id =
            workflow_id.map(str::trim).filter(|id| !id.is_empty()).map(ToString::to_string);

        Ok(Self { api_key, base_url: normalize_base_url(base_url), workflow_id })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Canonical base address, always ending in [`API_VERSION_PATH`].
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn workflow_id(&self) -> Option<&str> {
        self.workflow_id.as_deref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("workflow_id", &self.workflow_id)
            .finish()
    }
}

fn validate_base_url(raw: &str) -> Result<()> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| HubError::Config(format!("Invalid base URL '{raw}': {e}")))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(HubError::Config(format!(
            "Base URL must start with http:// or https://, got '{raw}'"
        )));
    }

    if !parsed.host_str().is_some_and(|host| !host.is_empty()) {
        return Err(HubError::Config(format!("Base URL has no host: '{raw}'")));
    }

    Ok(())
}

/// Output format for the log subscriber
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = HubError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(HubError::Config(format!("Unknown log format: {other}"))),
        }
    }
}

/// Raw workflow-service settings as loaded from env or file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct N8nSettings {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub workflow_id: Option<String>,
}

impl Default for N8nSettings {
    fn default() -> Self {
        Self { api_key: String::new(), base_url: default_base_url(), workflow_id: None }
    }
}

impl N8nSettings {
    /// Validate these settings into a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::new`].
    pub fn to_client_config(&self) -> Result<ClientConfig> {
        ClientConfig::new(self.api_key.clone(), &self.base_url, self.workflow_id.as_deref())
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub n8n: N8nSettings,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default = "default_backup_directory")]
    pub backup_directory: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            n8n: N8nSettings::default(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            backup_directory: default_backup_directory(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backup_directory() -> PathBuf {
    PathBuf::from(DEFAULT_BACKUP_DIRECTORY)
}
