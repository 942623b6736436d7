use std::sync::Arc;
use std::time::Duration;

use adminhub_domain::constants::API_KEY_HEADER;
use adminhub_domain::{ClientConfig, HubError, Result};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client as ReqwestClient;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

use crate::errors::InfraError;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on in-flight requests per client.
pub const MAX_CONCURRENT_REQUESTS: usize = 20;

/// Idle keep-alive connections retained per host.
pub const MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("adminhub/", env!("CARGO_PKG_VERSION"));

/// An open transport: the pooled reqwest client plus the concurrency gate.
///
/// Cheap to clone; clones share the same pool and permits.
#[derive(Clone)]
pub struct Transport {
    client: ReqwestClient,
    permits: Arc<Semaphore>,
}

impl Transport {
    pub fn client(&self) -> &ReqwestClient {
        &self.client
    }

    /// Wait for a free request slot.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| HubError::Transport("connection pool closed".into()))
    }
}

/// Lazily opened, explicitly closable HTTP transport.
///
/// The reqwest client is built on first use and dropped by [`close`], which
/// releases every pooled connection. A later request opens a fresh pool.
///
/// [`close`]: ConnectionManager::close
pub struct ConnectionManager {
    base_url: String,
    headers: HeaderMap,
    timeout: Duration,
    max_concurrent: usize,
    max_idle_per_host: usize,
    user_agent: String,
    transport: Mutex<Option<Transport>>,
}

impl ConnectionManager {
    /// Start building a connection manager for `config`.
    pub fn builder(config: &ClientConfig) -> ConnectionManagerBuilder {
        ConnectionManagerBuilder::new(config)
    }

    /// Convenience constructor with default pool limits.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the API root.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Return the open transport, building it first if needed.
    pub fn transport(&self) -> Result<Transport> {
        let mut guard = self.transport.lock();
        if let Some(transport) = guard.as_ref() {
            return Ok(transport.clone());
        }

        let transport = self.build_transport()?;
        debug!(
            base_url = %self.base_url,
            max_concurrent = self.max_concurrent,
            max_idle_per_host = self.max_idle_per_host,
            "opened HTTP transport"
        );
        *guard = Some(transport.clone());
        Ok(transport)
    }

    /// Open the transport eagerly.
    pub fn open(&self) -> Result<()> {
        self.transport().map(|_| ())
    }

    /// Release the pooled transport. Safe to call repeatedly.
    pub fn close(&self) {
        if self.transport.lock().take().is_some() {
            debug!(base_url = %self.base_url, "closed HTTP transport");
        }
    }

    pub fn is_open(&self) -> bool {
        self.transport.lock().is_some()
    }

    fn build_transport(&self) -> Result<Transport> {
        let client = ReqwestClient::builder()
            .timeout(self.timeout)
            .pool_max_idle_per_host(self.max_idle_per_host)
            .user_agent(self.user_agent.as_str())
            .default_headers(self.headers.clone())
            .build()
            .map_err(|err| HubError::from(InfraError::from(err)))?;

        Ok(Transport { client, permits: Arc::new(Semaphore::new(self.max_concurrent)) })
    }
}

impl std::fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionManager")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("max_concurrent", &self.max_concurrent)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

/// Builder for [`ConnectionManager`].
#[derive(Debug)]
pub struct ConnectionManagerBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
    max_concurrent: usize,
    max_idle_per_host: usize,
    user_agent: String,
}

impl ConnectionManagerBuilder {
    fn new(config: &ClientConfig) -> Self {
        Self {
            api_key: config.api_key().to_string(),
            base_url: config.base_url().to_string(),
            timeout: REQUEST_TIMEOUT,
            max_concurrent: MAX_CONCURRENT_REQUESTS,
            max_idle_per_host: MAX_IDLE_PER_HOST,
            user_agent: USER_AGENT.to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_concurrent(mut self, limit: usize) -> Self {
        self.max_concurrent = limit.max(1);
        self
    }

    pub fn max_idle_per_host(mut self, limit: usize) -> Self {
        self.max_idle_per_host = limit;
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    pub fn build(self) -> Result<ConnectionManager> {
        let headers = default_headers(&self.api_key)?;

        Ok(ConnectionManager {
            base_url: self.base_url,
            headers,
            timeout: self.timeout,
            max_concurrent: self.max_concurrent,
            max_idle_per_host: self.max_idle_per_host,
            user_agent: self.user_agent,
            transport: Mutex::new(None),
        })
    }
}

fn default_headers(api_key: &str) -> Result<HeaderMap> {
    let mut key = HeaderValue::from_str(api_key)
        .map_err(|_| HubError::Config("API key contains characters not allowed in a header".into()))?;
    key.set_sensitive(true);

    let name = HeaderName::from_bytes(API_KEY_HEADER.as_bytes())
        .map_err(|e| HubError::Config(format!("invalid API key header name: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(name, key);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}
