//! Workflow-service API client.

use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use adminhub_common::{Clock, RetryPolicy, Sleeper, SystemClock, TokioSleeper};
use adminhub_domain::constants::DEFAULT_LIST_LIMIT;
use adminhub_domain::{
    ClientConfig, ExportBundle, HealthStatus, HubError, Result, WorkflowPage, WorkflowSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, info, info_span, instrument, warn, Span};

use super::executor::{ApiResponse, RequestExecutor};
use super::health::{HealthProber, WorkflowLister};
use super::normalizer::normalize_listing;
use super::sanitizer::sanitize_credentials;
use crate::http::{ConnectionManager, REQUEST_TIMEOUT};

/// Listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: u32,
    /// Only return active workflows
    pub active_only: bool,
    /// Continuation token from a previous page
    pub cursor: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self { limit: DEFAULT_LIST_LIMIT, active_only: false, cursor: None }
    }
}

impl ListQuery {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn active_only(mut self, active_only: bool) -> Self {
        self.active_only = active_only;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("limit", self.limit.to_string())];
        if self.active_only {
            params.push(("active", "true".to_string()));
        }
        if let Some(cursor) = &self.cursor {
            params.push(("cursor", cursor.clone()));
        }
        params
    }
}

/// Client for the workflow-automation REST API.
///
/// Owns a lazily opened connection pool. Use [`session`] for a scope that
/// releases the pool on exit, or call [`close`] explicitly.
///
/// [`session`]: N8nClient::session
/// [`close`]: N8nClient::close
pub struct N8nClient {
    config: ClientConfig,
    connection: ConnectionManager,
    executor: RequestExecutor,
    prober: HealthProber,
    clock: Arc<dyn Clock>,
    span: Span,
}

impl N8nClient {
    pub fn builder(config: ClientConfig) -> N8nClientBuilder {
        N8nClientBuilder::new(config)
    }

    /// Client with default retry policy, real clock and real sleeps.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    /// Build a client and open its connection pool immediately.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.open()?;
        Ok(client)
    }

    /// Open the pool now, returning a guard that closes it when dropped.
    pub fn session(&self) -> Result<ConnectionScope<'_>> {
        self.open()?;
        Ok(ConnectionScope { client: self })
    }

    pub fn open(&self) -> Result<()> {
        self.connection.open()
    }

    /// Release pooled connections. The next request reopens the pool.
    pub fn close(&self) {
        self.connection.close();
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_open()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Configured default workflow identifier, if any.
    pub fn default_workflow_id(&self) -> Option<&str> {
        self.config.workflow_id()
    }

    /// Execute a raw request through the retrying executor.
    #[instrument(parent = &self.span, skip(self, params))]
    pub async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse> {
        self.executor.execute(&self.connection, method, path, params).await
    }

    /// List workflows, discarding the continuation cursor.
    pub async fn list_workflows(&self, query: &ListQuery) -> Result<Vec<WorkflowSummary>> {
        Ok(self.list_workflows_page(query).await?.workflows)
    }

    /// List one page of workflows.
    #[instrument(
        parent = &self.span,
        skip(self, query),
        fields(limit = query.limit, active_only = query.active_only)
    )]
    pub async fn list_workflows_page(&self, query: &ListQuery) -> Result<WorkflowPage> {
        let body = self.get_json("workflows", &query.params()).await?;
        let listing = normalize_listing(body);

        info!(
            count = listing.page.workflows.len(),
            skipped = listing.skipped.len(),
            "listed workflows"
        );
        Ok(listing.page)
    }

    /// Fetch a full workflow definition.
    ///
    /// # Errors
    ///
    /// [`HubError::Validation`] for a blank id or one that is not a single
    /// path segment, [`HubError::NotFound`] on 404, otherwise whatever the
    /// executor reports.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn get_workflow(&self, workflow_id: &str) -> Result<Value> {
        let workflow_id = validate_workflow_id(workflow_id)?;

        let workflow = self
            .get_json(&format!("workflows/{workflow_id}"), &[])
            .await
            .map_err(|err| match err {
                HubError::ClientRequest { status: 404, .. } => {
                    HubError::NotFound(format!("workflow '{workflow_id}'"))
                }
                other => other,
            })?;

        let name = workflow.get("name").and_then(Value::as_str);
        debug!(name, "fetched workflow");
        Ok(workflow)
    }

    /// Export a workflow as a bundle, redacting credentials unless asked not to.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn export_workflow(
        &self,
        workflow_id: &str,
        include_credentials: bool,
    ) -> Result<ExportBundle> {
        let workflow = self.get_workflow(workflow_id).await?;

        let workflow = if include_credentials {
            warn!(
                workflow_id,
                security_sensitive = true,
                "exporting workflow with credential references included"
            );
            workflow
        } else {
            let sanitized = sanitize_credentials(&workflow);
            debug!(redacted = sanitized.redacted, "redacted credential references");
            sanitized.workflow
        };

        let exported_at = DateTime::<Utc>::from(self.clock.system_time());
        let bundle = ExportBundle::new(workflow, exported_at, include_credentials);
        info!(name = bundle.workflow_name(), include_credentials, "exported workflow");
        Ok(bundle)
    }

    /// Export the configured default workflow.
    ///
    /// # Errors
    ///
    /// [`HubError::Validation`] when no default workflow id is configured.
    pub async fn export_default_workflow(&self, include_credentials: bool) -> Result<ExportBundle> {
        let workflow_id = self.default_workflow_id().ok_or_else(|| {
            HubError::Validation("no default workflow ID configured".into())
        })?;
        self.export_workflow(workflow_id, include_credentials).await
    }

    /// Probe service health. Never fails.
    #[instrument(parent = &self.span, skip(self))]
    pub async fn health_check(&self) -> HealthStatus {
        self.prober.probe(self, self.base_url()).await
    }

    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.execute(Method::GET, path, params).await?.json()
    }
}

/// Trim an identifier and check it can only address `workflows/{id}`.
fn validate_workflow_id(raw: &str) -> Result<&str> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(HubError::Validation("Workflow ID cannot be empty".into()));
    }

    let reserved = |c: char| {
        matches!(c, '/' | '\\' | '?' | '#' | '%') || c.is_whitespace() || c.is_control()
    };
    if id.contains("..") || id.chars().any(reserved) {
        return Err(HubError::Validation(format!(
            "Workflow ID must be a single path segment, got '{id}'"
        )));
    }

    Ok(id)
}

#[async_trait]
impl WorkflowLister for N8nClient {
    async fn list_page(&self, query: &ListQuery) -> Result<WorkflowPage> {
        self.list_workflows_page(query).await
    }
}

impl std::fmt::Debug for N8nClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("N8nClient")
            .field("config", &self.config)
            .field("connection", &self.connection)
            .finish_non_exhaustive()
    }
}

/// Scoped use of an open client. Dropping it releases the connection pool.
#[derive(Debug)]
pub struct ConnectionScope<'a> {
    client: &'a N8nClient,
}

impl Deref for ConnectionScope<'_> {
    type Target = N8nClient;

    fn deref(&self) -> &N8nClient {
        self.client
    }
}

impl Drop for ConnectionScope<'_> {
    fn drop(&mut self) {
        self.client.close();
    }
}

/// Builder for [`N8nClient`].
pub struct N8nClientBuilder {
    config: ClientConfig,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl N8nClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            clock: Arc::new(SystemClock),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<N8nClient> {
        let connection = ConnectionManager::builder(&self.config).timeout(self.timeout).build()?;
        let span = info_span!("n8n_client", base_url = %self.config.base_url());

        Ok(N8nClient {
            connection,
            executor: RequestExecutor::new(self.policy, self.sleeper),
            prober: HealthProber::new(Arc::clone(&self.clock)),
            clock: self.clock,
            config: self.config,
            span,
        })
    }
}
