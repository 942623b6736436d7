//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file from the working directory if one exists
//! 2. Attempts to load from environment variables
//! 3. If `N8N_API_KEY` is not set, falls back to a config file
//! 4. Environment variables override values read from a file
//!
//! ## Environment Variables
//! - `N8N_API_KEY`: API key (required when no config file is used)
//! - `N8N_BASE_URL`: Service address, default `http://localhost:5678`
//! - `N8N_WORKFLOW_ID`: Default workflow for exports
//! - `ADMINHUB_LOG_LEVEL`: Log level directive, default `info`
//! - `ADMINHUB_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `ADMINHUB_BACKUP_DIR`: Export directory, default `./backups`
//!
//! ## File Locations
//! The loader probes `adminhub.toml` and `adminhub.json` in the current
//! directory, its two parents, and next to the executable.

use std::path::{Path, PathBuf};

use adminhub_domain::{AppConfig, HubError, Result};

pub const ENV_API_KEY: &str = "N8N_API_KEY";
pub const ENV_BASE_URL: &str = "N8N_BASE_URL";
pub const ENV_WORKFLOW_ID: &str = "N8N_WORKFLOW_ID";
pub const ENV_LOG_LEVEL: &str = "ADMINHUB_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "ADMINHUB_LOG_FORMAT";
pub const ENV_BACKUP_DIR: &str = "ADMINHUB_BACKUP_DIR";

const CONFIG_FILE_NAMES: [&str; 2] = ["adminhub.toml", "adminhub.json"];

/// Load configuration with automatic fallback strategy
///
/// With an explicit `path`, that file is read and environment variables are
/// layered on top. Otherwise the environment is tried first and a probed
/// config file second.
///
/// # Errors
/// Returns `HubError::Config` if:
/// - Neither the environment nor any config file provides configuration
/// - The file is missing, unreadable or malformed
/// - An environment value is invalid
pub fn load(path: Option<PathBuf>) -> Result<AppConfig> {
    load_dotenv();

    if let Some(path) = path {
        return load_from_file(Some(path)).and_then(|config| apply_overrides(config, env_lookup));
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to load from environment, trying file");
            load_from_file(None).and_then(|config| apply_overrides(config, env_lookup))
        }
    }
}

/// Like [`load`], but falls back to defaults plus whatever environment
/// variables are set when no source provides an API key.
///
/// Used by commands that report on configuration rather than use it.
///
/// # Errors
/// Same as [`load`] for explicit paths and malformed files.
pub fn load_or_default(path: Option<PathBuf>) -> Result<AppConfig> {
    if path.is_some() {
        return load(path);
    }

    load_dotenv();
    if let Ok(config) = load_from_env() {
        return Ok(config);
    }

    match probe_config_paths() {
        Some(found) => {
            load_from_file(Some(found)).and_then(|config| apply_overrides(config, env_lookup))
        }
        None => {
            tracing::debug!("No configuration source found, using defaults");
            apply_overrides(AppConfig::default(), env_lookup)
        }
    }
}

/// Load configuration from process environment variables
///
/// # Errors
/// Returns `HubError::Config` if `N8N_API_KEY` is missing or another value is
/// invalid.
pub fn load_from_env() -> Result<AppConfig> {
    load_from_lookup(env_lookup)
}

/// Load configuration from an arbitrary variable source
///
/// # Errors
/// See [`load_from_env`].
pub fn load_from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if non_empty(&lookup, ENV_API_KEY).is_none() {
        return Err(HubError::Config(format!(
            "Missing required environment variable: {ENV_API_KEY}"
        )));
    }

    apply_overrides(AppConfig::default(), lookup)
}

/// Overwrite fields of `config` with every variable `lookup` provides.
///
/// Unset and empty variables leave the field unchanged.
///
/// # Errors
/// Returns `HubError::Config` for an unknown log format.
pub fn apply_overrides<F>(mut config: AppConfig, lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = non_empty(&lookup, ENV_API_KEY) {
        config.n8n.api_key = api_key;
    }
    if let Some(base_url) = non_empty(&lookup, ENV_BASE_URL) {
        config.n8n.base_url = base_url;
    }
    if let Some(workflow_id) = non_empty(&lookup, ENV_WORKFLOW_ID) {
        config.n8n.workflow_id = Some(workflow_id);
    }
    if let Some(level) = non_empty(&lookup, ENV_LOG_LEVEL) {
        config.log_level = level;
    }
    if let Some(format) = non_empty(&lookup, ENV_LOG_FORMAT) {
        config.log_format = format.parse()?;
    }
    if let Some(dir) = non_empty(&lookup, ENV_BACKUP_DIR) {
        config.backup_directory = PathBuf::from(dir);
    }

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `HubError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(HubError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            HubError::Config(format!(
                "{ENV_API_KEY} is not set and no config file was found in any of the standard locations"
            ))
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| HubError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| HubError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| HubError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(HubError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use adminhub_domain::constants::DEFAULT_BASE_URL;
    use adminhub_domain::LogFormat;
    use tempfile::NamedTempFile;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn temp_config(contents: &str, extension: &str) -> (NamedTempFile, PathBuf) {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(contents.as_bytes()).unwrap();
        let path = temp_file.path().with_extension(extension);
        std::fs::copy(temp_file.path(), &path).unwrap();
        (temp_file, path)
    }

    #[test]
    fn test_load_from_lookup_all_vars_set() {
        let config = load_from_lookup(vars(&[
            (ENV_API_KEY, "key-123"),
            (ENV_BASE_URL, "https://n8n.example.com"),
            (ENV_WORKFLOW_ID, "wf-9"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_LOG_FORMAT, "json"),
            (ENV_BACKUP_DIR, "/var/backups/n8n"),
        ]))
        .unwrap();

        assert_eq!(config.n8n.api_key, "key-123");
        assert_eq!(config.n8n.base_url, "https://n8n.example.com");
        assert_eq!(config.n8n.workflow_id.as_deref(), Some("wf-9"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.backup_directory, PathBuf::from("/var/backups/n8n"));
    }

    #[test]
    fn test_load_from_lookup_defaults() {
        let config = load_from_lookup(vars(&[(ENV_API_KEY, "key-123")])).unwrap();

        assert_eq!(config.n8n.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.n8n.workflow_id, None);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_lookup_missing_key() {
        for pairs in [vec![], vec![(ENV_API_KEY, "   ")]] {
            let err = load_from_lookup(vars(&pairs)).unwrap_err();
            assert!(matches!(err, HubError::Config(ref msg) if msg.contains(ENV_API_KEY)));
        }
    }

    #[test]
    fn test_invalid_log_format_is_config_error() {
        let err = load_from_lookup(vars(&[(ENV_API_KEY, "k"), (ENV_LOG_FORMAT, "xml")]))
            .unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.n8n.api_key = "from-file".into();
        config.n8n.workflow_id = Some("file-wf".into());

        let config = apply_overrides(config, vars(&[(ENV_WORKFLOW_ID, "env-wf")])).unwrap();

        assert_eq!(config.n8n.api_key, "from-file");
        assert_eq!(config.n8n.workflow_id.as_deref(), Some("env-wf"));
    }

    #[test]
    fn test_load_from_file_toml() {
        let (_temp, path) = temp_config(
            r#"
log_level = "warn"
backup_directory = "/tmp/adminhub-backups"

[n8n]
api_key = "toml-key"
base_url = "https://automation.internal"
workflow_id = "wf-1"
"#,
            "toml",
        );

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.n8n.api_key, "toml-key");
        assert_eq!(config.n8n.base_url, "https://automation.internal");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Pretty);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_json() {
        let (_temp, path) =
            temp_config(r#"{ "n8n": { "api_key": "json-key" }, "log_format": "compact" }"#, "json");

        let config = load_from_file(Some(path.clone())).unwrap();
        assert_eq!(config.n8n.api_key, "json-key");
        assert_eq!(config.log_format, LogFormat::Compact);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/adminhub.toml"))).unwrap_err();
        assert!(matches!(err, HubError::Config(_)));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let (_temp, path) = temp_config(r#"{ "this is": "not valid json" "#, "json");

        assert!(load_from_file(Some(path.clone())).is_err());

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", &PathBuf::from("adminhub.yaml"));
        assert!(matches!(result, Err(HubError::Config(_))));
    }
}
