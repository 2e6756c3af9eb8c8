//! Shared reqwest transport.
//!
//! Sends requests relative to the configured base URL, attaches the bearer token and
//! turns every outcome into either a decoded payload or a [`TransportFailure`] that the
//! callers classify into their boundary's error taxonomy.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crm_core::error::{AuthError, CrmError, FetchError, MutationError};
use crm_core::session::AuthToken;

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Why a call did not yield a usable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TransportFailure {
    /// Connection failure, timeout, or unreadable body.
    Unreachable(String),
    /// The server answered with a non-success status.
    Status { status: StatusCode, message: String },
    /// The body did not match the expected schema.
    Decode(String),
}

impl TransportFailure {
    fn server_fault(status: StatusCode, message: &str) -> String {
        format!("server responded {status}: {message}")
    }

    pub(crate) fn into_fetch_error(self, resource: &str) -> FetchError {
        match self {
            Self::Unreachable(message) => FetchError::Unreachable(message),
            Self::Decode(message) => FetchError::MalformedResponse(message),
            Self::Status { status, message } => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Unauthorized,
                StatusCode::NOT_FOUND => FetchError::NotFound(resource.to_string()),
                _ => FetchError::Unreachable(Self::server_fault(status, &message)),
            },
        }
    }

    pub(crate) fn into_mutation_error(self, resource: &str) -> MutationError {
        match self {
            Self::Unreachable(message) => MutationError::Unreachable(message),
            Self::Decode(message) => MutationError::MalformedResponse(message),
            Self::Status { status, message } => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MutationError::Unauthorized,
                StatusCode::NOT_FOUND => MutationError::NotFound(resource.to_string()),
                StatusCode::BAD_REQUEST
                | StatusCode::CONFLICT
                | StatusCode::UNPROCESSABLE_ENTITY => MutationError::Conflict(message),
                _ => MutationError::Unreachable(Self::server_fault(status, &message)),
            },
        }
    }

    /// Classification for the login call: any client-side rejection means the
    /// email/password pair was refused.
    pub(crate) fn into_login_error(self) -> AuthError {
        match self {
            Self::Unreachable(message) => AuthError::Unreachable(message),
            Self::Decode(message) => AuthError::MalformedResponse(message),
            Self::Status { status, message } => match status {
                StatusCode::BAD_REQUEST
                | StatusCode::UNAUTHORIZED
                | StatusCode::FORBIDDEN
                | StatusCode::NOT_FOUND => AuthError::InvalidCredentials,
                _ => AuthError::Unreachable(Self::server_fault(status, &message)),
            },
        }
    }

    /// Classification for calls made with an existing token.
    pub(crate) fn into_token_error(self) -> AuthError {
        match self {
            Self::Unreachable(message) => AuthError::Unreachable(message),
            Self::Decode(message) => AuthError::MalformedResponse(message),
            Self::Status { status, message } => match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AuthError::Expired,
                _ => AuthError::Unreachable(Self::server_fault(status, &message)),
            },
        }
    }
}

/// HTTP client bound to the backend's base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CrmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CrmError::config(format!("Failed to build HTTP client: {e}")))?;
        let base_url: String = base_url.into();
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&AuthToken>,
    ) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Sends the request and decodes the (possibly enveloped) JSON payload.
    pub(crate) async fn fetch<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<R, TransportFailure> {
        let body = self.execute(request).await?;
        decode_payload(&body)
    }

    /// Sends the request, ignoring the body of a successful response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<(), TransportFailure> {
        self.execute(request).await.map(|_| ())
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Vec<u8>, TransportFailure> {
        let response = request
            .send()
            .await
            .map_err(|e| TransportFailure::Unreachable(describe_send_error(&e)))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                TransportFailure::Unreachable(format!("Failed to read response body: {e}"))
            })?
            .to_vec();

        if !status.is_success() {
            debug!(status = status.as_u16(), "Request rejected");
            return Err(TransportFailure::Status {
                status,
                message: error_message(status, &body),
            });
        }

        Ok(body)
    }
}

fn describe_send_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    }
}

/// Decodes a payload that may be bare or wrapped as `{"data": ...}`.
pub(crate) fn decode_payload<R: DeserializeOwned>(body: &[u8]) -> Result<R, TransportFailure> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| TransportFailure::Decode(format!("response is not JSON: {e}")))?;

    let payload = match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };

    serde_json::from_value(payload).map_err(|e| TransportFailure::Decode(e.to_string()))
}

/// Extracts a human-readable message from an error body.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    let from_json = serde_json::from_slice::<Value>(body).ok().and_then(|json| {
        ["message", "error"].iter().find_map(|key| match json.get(key) {
            Some(Value::String(text)) => Some(text.clone()),
            Some(Value::Object(inner)) => inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
    });
    if let Some(message) = from_json {
        return message;
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        text.chars().take(MAX_ERROR_BODY_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn test_decode_bare_and_enveloped() {
        let bare: Vec<Item> = decode_payload(br#"[{"id": 1}, {"id": 2}]"#).unwrap();
        let wrapped: Vec<Item> = decode_payload(br#"{"data": [{"id": 1}, {"id": 2}]}"#).unwrap();
        assert_eq!(bare, wrapped);
    }

    #[test]
    fn test_decode_failure_is_decode() {
        let err = decode_payload::<Vec<Item>>(br#"{"items": []}"#).unwrap_err();
        assert!(matches!(err, TransportFailure::Decode(_)));

        let err = decode_payload::<Vec<Item>>(b"<html>").unwrap_err();
        assert!(matches!(err, TransportFailure::Decode(_)));
    }

    #[test]
    fn test_error_message_sources() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, br#"{"message": "email taken"}"#),
            "email taken"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, br#"{"error": {"message": "bad"}}"#),
            "bad"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b""), "Bad Gateway");
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, b" upstream down "), "upstream down");
    }

    #[test]
    fn test_status_classification() {
        let status = |status| TransportFailure::Status {
            status,
            message: "nope".into(),
        };

        assert_eq!(
            status(StatusCode::UNAUTHORIZED).into_fetch_error("/contacts"),
            FetchError::Unauthorized
        );
        assert_eq!(
            status(StatusCode::NOT_FOUND).into_fetch_error("/contacts/9"),
            FetchError::NotFound("/contacts/9".into())
        );
        assert!(matches!(
            status(StatusCode::INTERNAL_SERVER_ERROR).into_fetch_error("/contacts"),
            FetchError::Unreachable(_)
        ));
        assert_eq!(
            status(StatusCode::CONFLICT).into_mutation_error("/contacts"),
            MutationError::Conflict("nope".into())
        );
        assert_eq!(
            status(StatusCode::FORBIDDEN).into_mutation_error("/contacts"),
            MutationError::Unauthorized
        );
        assert_eq!(
            status(StatusCode::UNAUTHORIZED).into_login_error(),
            AuthError::InvalidCredentials
        );
        assert!(status(StatusCode::SERVICE_UNAVAILABLE)
            .into_login_error()
            .is_unreachable());
        assert_eq!(
            status(StatusCode::UNAUTHORIZED).into_token_error(),
            AuthError::Expired
        );
    }

    #[test]
    fn test_url_joining() {
        let transport = HttpTransport::new("http://localhost:5000/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(transport.base_url(), "http://localhost:5000/api");
        assert_eq!(transport.url("/contacts"), "http://localhost:5000/api/contacts");
        assert_eq!(transport.url("/admin-users/"), "http://localhost:5000/api/admin-users/");
    }
}
