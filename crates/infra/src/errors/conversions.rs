//! Conversions from external infrastructure errors into domain errors.

use adminhub_domain::HubError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HubError);

impl From<InfraError> for HubError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HubError> for InfraError {
    fn from(value: HubError) -> Self {
        InfraError(value)
    }
}

trait IntoHubError {
    fn into_hub(self) -> HubError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HubError */
/* -------------------------------------------------------------------------- */

impl IntoHubError for HttpError {
    fn into_hub(self) -> HubError {
        if self.is_builder() {
            return HubError::Config(format!("failed to build HTTP request: {self}"));
        }

        if self.is_timeout() {
            return HubError::Transport("HTTP request timed out".into());
        }

        if self.is_connect() {
            return HubError::Transport(format!("HTTP connection failure: {}", root_cause(&self)));
        }

        if self.is_decode() {
            return HubError::InvalidResponse(format!("response body is not valid JSON: {self}"));
        }

        HubError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_hub())
    }
}

/// Map a failure while reading a response body.
///
/// reqwest reports an interrupted body as a decode error, so this is always a
/// transport failure and never [`HubError::InvalidResponse`].
pub fn body_read_error(err: HttpError) -> HubError {
    if err.is_timeout() {
        return HubError::Transport("HTTP request timed out while reading body".into());
    }
    HubError::Transport(format!("failed to read response body: {}", root_cause(&err)))
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → HubError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(HubError::InvalidResponse(format!("response body is not valid JSON: {value}")))
    }
}

fn root_cause(err: &(dyn std::error::Error + 'static)) -> String {
    let mut current = err;
    while let Some(source) = current.source() {
        current = source;
    }
    current.to_string()
}
