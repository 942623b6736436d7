//! Request execution with bounded retries.
//!
//! One call to [`RequestExecutor::execute`] makes at most
//! `RetryPolicy::max_attempts` attempts. An attempt only succeeds once the
//! whole body has been read, so a connection dropped mid-body is a transport
//! failure like any other. Transport failures and 429 responses are retried
//! after the policy's backoff; a 429 additionally waits out its `Retry-After`
//! before being counted, so both waits add up. Every other non-success status
//! fails immediately.

use std::sync::Arc;
use std::time::Duration;

use adminhub_common::{RetryDecision, RetryPolicy, Sleeper, TokioSleeper};
use adminhub_domain::constants::DEFAULT_RETRY_AFTER_SECS;
use adminhub_domain::{HubError, Result};
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::errors::{body_read_error, InfraError};
use crate::http::ConnectionManager;

const MAX_ERROR_BODY_CHARS: usize = 512;

/// A fully read 2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Parse the body as JSON.
    ///
    /// # Errors
    ///
    /// [`HubError::InvalidResponse`] when the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|err| InfraError::from(err).into())
    }
}

/// Result of one attempt, before the retry policy is consulted.
#[derive(Debug)]
enum AttemptOutcome {
    Success(ApiResponse),
    Failed(HubError),
}

/// Executes requests against a [`ConnectionManager`] under a [`RetryPolicy`].
#[derive(Clone)]
pub struct RequestExecutor {
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(RetryPolicy::default(), Arc::new(TokioSleeper))
    }
}

impl RequestExecutor {
    pub fn new(policy: RetryPolicy, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { policy, sleeper }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Send `method path?params` and return the first fully read 2xx response.
    ///
    /// # Errors
    ///
    /// - [`HubError::Auth`] on 401
    /// - [`HubError::ClientRequest`] on any other 4xx except 429
    /// - [`HubError::Server`] on 5xx
    /// - [`HubError::Transport`] once retryable failures exhaust the budget
    pub async fn execute(
        &self,
        connection: &ConnectionManager,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<ApiResponse> {
        let url = connection.endpoint(path);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.attempt(connection, &method, &url, params, attempt).await {
                AttemptOutcome::Success(response) => return Ok(response),
                AttemptOutcome::Failed(error) => error,
            };

            match self.policy.decide(attempt, error.is_retryable()) {
                RetryDecision::Retry(delay) => {
                    warn!(
                        %method,
                        %url,
                        attempt,
                        max_attempts = self.policy.max_attempts(),
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "request failed, retrying"
                    );
                    self.sleeper.sleep(delay).await;
                }
                RetryDecision::Stop => {
                    error!(%method, %url, attempt, kind = error.label(), error = %error, "request failed");
                    return Err(error);
                }
                RetryDecision::Exhausted => {
                    let error = error.into_exhausted(attempt);
                    error!(%method, %url, attempt, error = %error, "request failed after all retries");
                    return Err(error);
                }
            }
        }
    }

    async fn attempt(
        &self,
        connection: &ConnectionManager,
        method: &Method,
        url: &str,
        params: &[(&str, String)],
        attempt: u32,
    ) -> AttemptOutcome {
        let transport = match connection.transport() {
            Ok(transport) => transport,
            Err(err) => return AttemptOutcome::Failed(err),
        };
        let _permit = match transport.acquire().await {
            Ok(permit) => permit,
            Err(err) => return AttemptOutcome::Failed(err),
        };

        debug!(%method, %url, attempt, "sending request");
        let sent = transport.client().request(method.clone(), url).query(params).send().await;

        let response = match sent {
            Ok(response) => response,
            Err(err) => return AttemptOutcome::Failed(InfraError::from(err).into()),
        };

        let status = response.status();
        if status.is_success() {
            let body = match response.bytes().await {
                Ok(body) => body.to_vec(),
                Err(err) => return AttemptOutcome::Failed(body_read_error(err)),
            };
            debug!(%method, %url, attempt, status = status.as_u16(), bytes = body.len(), "request succeeded");
            return AttemptOutcome::Success(ApiResponse { status, body });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = parse_retry_after(response.headers());
            warn!(
                %method,
                %url,
                attempt,
                retry_after_secs = retry_after.as_secs(),
                "rate limited, waiting for Retry-After"
            );
            self.sleeper.sleep(retry_after).await;
            return AttemptOutcome::Failed(HubError::RateLimited { retry_after });
        }

        let body = response.text().await.unwrap_or_default();
        AttemptOutcome::Failed(map_status_error(status, &body))
    }
}

/// Map a non-success, non-429 status to its error kind.
pub fn map_status_error(status: StatusCode, body: &str) -> HubError {
    let code = status.as_u16();
    let message = error_message(status, body);

    if status == StatusCode::UNAUTHORIZED {
        HubError::Auth(format!("invalid API key or insufficient permissions ({message})"))
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        HubError::RateLimited { retry_after: Duration::from_secs(DEFAULT_RETRY_AFTER_SECS) }
    } else if status.is_client_error() {
        HubError::ClientRequest { status: code, message }
    } else if status.is_server_error() {
        HubError::Server { status: code, message }
    } else {
        HubError::InvalidResponse(format!("unexpected status {message}"))
    }
}

/// `Retry-After` as whole seconds; absent or unparsable values fall back to
/// [`DEFAULT_RETRY_AFTER_SECS`].
pub fn parse_retry_after(headers: &HeaderMap) -> Duration {
    let secs = headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
    Duration::from_secs(secs)
}

fn error_message(status: StatusCode, body: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("unknown status");
    let body = body.trim();
    if body.is_empty() {
        return format!("{} {reason}", status.as_u16());
    }

    let preview: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    format!("{} {reason}: {preview}", status.as_u16())
}

#[cfg(test)]
mod tests {
    use adminhub_common::testing::RecordingSleeper;
    use adminhub_domain::ClientConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use reqwest::header::HeaderValue;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn connection(base_url: &str) -> ConnectionManager {
        let config = ClientConfig::new("test-key", base_url, None).unwrap();
        ConnectionManager::new(&config).unwrap()
    }

    fn recording_executor(max_attempts: u32) -> (RequestExecutor, Arc<RecordingSleeper>) {
        let sleeper = Arc::new(RecordingSleeper::new());
        let policy = RetryPolicy::new(max_attempts, Default::default());
        (RequestExecutor::new(policy, sleeper.clone()), sleeper)
    }

    #[test]
    fn retry_after_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(60));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(2));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));
        assert_eq!(parse_retry_after(&headers), Duration::from_secs(60));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(map_status_error(StatusCode::UNAUTHORIZED, ""), HubError::Auth(_)));
        assert!(matches!(
            map_status_error(StatusCode::FORBIDDEN, "nope"),
            HubError::ClientRequest { status: 403, .. }
        ));
        assert!(matches!(
            map_status_error(StatusCode::NOT_FOUND, ""),
            HubError::ClientRequest { status: 404, .. }
        ));
        assert!(matches!(
            map_status_error(StatusCode::BAD_GATEWAY, ""),
            HubError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn error_message_truncates_large_bodies() {
        let body = "x".repeat(2_000);
        let message = error_message(StatusCode::BAD_REQUEST, &body);
        assert!(message.len() < 600);
        assert!(message.starts_with("400 Bad Request: "));
    }

    #[tokio::test]
    async fn returns_successful_response_without_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workflows"))
            .and(query_param("limit", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, sleeper) = recording_executor(3);
        let response = executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[("limit", "1".into())])
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json::<serde_json::Value>().unwrap(), serde_json::json!([]));
        assert!(sleeper.delays().is_empty());
    }

    /// Serves `200` headers promising 1000 body bytes, sends five, then hangs up.
    async fn truncating_server() -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&connections);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 1000\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(br#"{"id""#).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}"), connections)
    }

    #[tokio::test]
    async fn truncated_body_is_retried_as_transport_failure() {
        let (base_url, connections) = truncating_server().await;

        let (executor, sleeper) = recording_executor(3);
        let err = executor
            .execute(&connection(&base_url), Method::GET, "workflows/wf-1", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HubError::Transport(ref msg) if msg.contains("gave up after 3 attempts")));
        assert_eq!(connections.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(4), Duration::from_secs(4)]);
    }

    #[test]
    fn invalid_json_body_is_invalid_response() {
        let response = ApiResponse { status: StatusCode::OK, body: b"<html>".to_vec() };
        let err = response.json::<serde_json::Value>().unwrap_err();
        assert!(matches!(err, HubError::InvalidResponse(_)));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn rate_limit_waits_retry_after_then_backs_off() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "2"))
            .expect(3)
            .mount(&server)
            .await;

        let (executor, sleeper) = recording_executor(3);
        let err = executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HubError::Transport(ref msg) if msg.contains("rate limited")));
        assert_eq!(
            sleeper.delays(),
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(2),
            ]
        );
    }

    #[tokio::test]
    async fn rate_limit_then_success_recovers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/workflows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let (executor, sleeper) = recording_executor(3);
        let response = executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[])
            .await
            .unwrap();

        assert!(response.status().is_success());
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(60), Duration::from_secs(4)]);
    }

    #[tokio::test]
    async fn unauthorized_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, sleeper) = recording_executor(3);
        let err = executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HubError::Auth(_)));
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let (executor, _) = recording_executor(3);
        let err = executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[])
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(matches!(err, HubError::Server { .. }));
    }

    #[tokio::test]
    async fn retries_on_network_failure() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (executor, sleeper) = recording_executor(3);
        let err = executor
            .execute(&connection(&format!("http://{addr}")), Method::GET, "workflows", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, HubError::Transport(ref msg) if msg.contains("gave up after 3 attempts")));
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(4), Duration::from_secs(4)]);
    }

    #[tokio::test]
    async fn real_sleeper_honours_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let executor = RequestExecutor::new(RetryPolicy::without_delay(2), Arc::new(TokioSleeper));
        let started = std::time::Instant::now();
        executor
            .execute(&connection(&server.uri()), Method::GET, "workflows", &[])
            .await
            .unwrap();

        assert!(started.elapsed() >= Duration::from_secs(1));
    }
}
