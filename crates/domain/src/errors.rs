//! Error types used throughout the admin hub

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a [`HubError`], used for retry decisions and
/// logging labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Invalid or missing configuration, raised at construction
    Config,
    /// 401 from the service
    Authentication,
    /// 429 from the service
    RateLimit,
    /// Any other 4xx, including 404
    ClientRequest,
    /// 5xx from the service
    Server,
    /// Connection failures and timeouts
    Transport,
    /// Caller-supplied input rejected before any request
    Validation,
    /// A success response whose body could not be decoded
    InvalidResponse,
}

/// Main error type for the admin hub
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HubError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Client error ({status}): {message}")]
    ClientRequest { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl HubError {
    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(_) => ErrorCategory::Config,
            Self::Auth(_) => ErrorCategory::Authentication,
            Self::RateLimited { .. } => ErrorCategory::RateLimit,
            Self::ClientRequest { .. } | Self::NotFound(_) => ErrorCategory::ClientRequest,
            Self::Server { .. } => ErrorCategory::Server,
            Self::Transport(_) => ErrorCategory::Transport,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::InvalidResponse(_) => ErrorCategory::InvalidResponse,
        }
    }

    /// Whether the request executor may re-attempt after this error.
    ///
    /// Only transport failures and rate limiting are retried; every other
    /// kind propagates on first occurrence.
    pub fn is_retryable(&self) -> bool {
        matches!(self.category(), ErrorCategory::Transport | ErrorCategory::RateLimit)
    }

    /// HTTP status attached to this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth(_) => Some(401),
            Self::RateLimited { .. } => Some(429),
            Self::NotFound(_) => Some(404),
            Self::ClientRequest { status, .. } | Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable label suitable for structured logging.
    pub fn label(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Config => "config",
            ErrorCategory::Authentication => "auth",
            ErrorCategory::RateLimit => "rate_limited",
            ErrorCategory::ClientRequest => "client_request",
            ErrorCategory::Server => "server",
            ErrorCategory::Transport => "transport",
            ErrorCategory::Validation => "validation",
            ErrorCategory::InvalidResponse => "invalid_response",
        }
    }

    /// Collapse a retryable failure into the transport error surfaced once the
    /// retry budget is spent.
    pub fn into_exhausted(self, attempts: u32) -> Self {
        match self {
            Self::Transport(message) => {
                Self::Transport(format!("{message} (gave up after {attempts} attempts)"))
            }
            Self::RateLimited { retry_after } => Self::Transport(format!(
                "rate limited, last Retry-After {}s (gave up after {attempts} attempts)",
                retry_after.as_secs()
            )),
            other => other,
        }
    }
}

/// Result type alias for admin hub operations
pub type Result<T> = std::result::Result<T, HubError>;
