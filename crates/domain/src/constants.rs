//! Domain constants
//!
//! Values shared by the client, the CLI and the tests.

/// Path component every canonical base address ends with.
pub const API_VERSION_PATH: &str = "/api/v1";

/// Base address used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5678";

/// Header carrying the raw API key. The service rejects `Authorization: Bearer`.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Default page size for workflow listings.
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Retry-After fallback when a 429 response omits the header.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Attribution tag written into every export bundle.
pub const EXPORT_ATTRIBUTION: &str = "AI Admin Hub";

/// Placeholder credential identifier used by the sanitizer.
pub const REDACTED_CREDENTIAL_ID: &str = "REMOVED_FOR_SECURITY";

/// Placeholder credential name used by the sanitizer.
pub const REDACTED_CREDENTIAL_NAME: &str = "CREDENTIAL_PLACEHOLDER";

/// API keys shorter than this are flagged by config validation.
pub const MIN_RECOMMENDED_API_KEY_LEN: usize = 20;

/// Default directory for exported workflow backups.
pub const DEFAULT_BACKUP_DIRECTORY: &str = "./backups";
