//! Configuration health report.

use std::path::Path;

use adminhub_domain::constants::MIN_RECOMMENDED_API_KEY_LEN;
use adminhub_domain::AppConfig;
use serde::Serialize;
use url::Url;

use super::loader::{ENV_API_KEY, ENV_WORKFLOW_ID};

/// Findings of a configuration check, grouped by severity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigReport {
    /// Problems that prevent the client from working
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub info: Vec<String>,
    /// Problems resolved during the check
    pub fixed: Vec<String>,
}

impl ConfigReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Check `config` for missing or suspicious settings.
///
/// With `fix` set, a missing backup directory is created instead of being
/// reported.
pub fn validate(config: &AppConfig, fix: bool) -> ConfigReport {
    let mut report = ConfigReport::default();
    let n8n = &config.n8n;

    if n8n.api_key.trim().is_empty() {
        report.errors.push(format!("API key is required ({ENV_API_KEY})"));
    } else if n8n.api_key.trim().len() < MIN_RECOMMENDED_API_KEY_LEN {
        report
            .warnings
            .push("API key appears to be very short; ensure it was generated by the service".into());
    }

    if !n8n.workflow_id.as_deref().is_some_and(|id| !id.trim().is_empty()) {
        report.warnings.push(format!(
            "No default workflow ID set ({ENV_WORKFLOW_ID}); export requires an explicit ID"
        ));
    }

    check_base_url(&n8n.base_url, &mut report);
    check_backup_directory(&config.backup_directory, fix, &mut report);

    tracing::debug!(
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        info = report.info.len(),
        fixed = report.fixed.len(),
        "validated configuration"
    );
    report
}

fn check_base_url(raw: &str, report: &mut ConfigReport) {
    let parsed = match Url::parse(raw.trim()) {
        Ok(parsed) if parsed.host_str().is_some_and(|h| !h.is_empty()) => parsed,
        _ => {
            report.errors.push(format!("Invalid base URL format: {raw}"));
            return;
        }
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        report.warnings.push(format!("Base URL should use http:// or https:// scheme: {raw}"));
    }

    if matches!(parsed.host_str(), Some("localhost" | "127.0.0.1" | "[::1]")) {
        report.info.push("Using a local service address; ensure this is intended".into());
    }
}

fn check_backup_directory(dir: &Path, fix: bool, report: &mut ConfigReport) {
    if !dir.exists() {
        if !fix {
            report.warnings.push(format!(
                "Backup directory does not exist: {} (use --fix to create)",
                dir.display()
            ));
            return;
        }

        match std::fs::create_dir_all(dir) {
            Ok(()) => report.fixed.push(format!("Created backup directory: {}", dir.display())),
            Err(e) => report
                .errors
                .push(format!("Cannot create backup directory {}: {e}", dir.display())),
        }
    } else if !dir.is_dir() {
        report
            .errors
            .push(format!("Backup path exists but is not a directory: {}", dir.display()));
    }
}
