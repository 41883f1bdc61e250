use std::sync::RwLock;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::storage::TokenStore;

/// Error message used when a failed response carries no `message` field.
pub const FALLBACK_ERROR_MESSAGE: &str = "API request failed";

/// Possible failures while talking to the backend.
///
/// The backend's own failures surface as `Api` with the server-supplied
/// message text and nothing else. Callers own any retry or recovery.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Non-2xx response; carries the decoded `message` or a fixed fallback.
    #[error("{0}")]
    Api(String),
    /// Transport-level failure (unreachable host, broken connection).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// The response body (or a request body) was not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid base URL: {0}")]
    InvalidUrl(String),
    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// A JSON request body.
///
/// `Json` values are serialized right before transmission; `Raw` strings
/// are assumed to already be serialized and pass through unchanged.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Raw(String),
}

impl RequestBody {
    /// The exact string that goes over the wire.
    pub fn payload(&self) -> Result<String, serde_json::Error> {
        match self {
            RequestBody::Json(value) => serde_json::to_string(value),
            RequestBody::Raw(contents) => Ok(contents.clone()),
        }
    }
}

/// Per-request settings for [`ApiClient::request`].
///
/// Everything is optional; the defaults are a GET with no query, no body,
/// and no extra headers.
#[derive(Debug, Default)]
pub struct RequestOptions {
    pub method: Option<Method>,
    /// Caller-supplied headers, merged last so they can override defaults.
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

/// The single choke point for outbound HTTP calls to the backend.
///
/// Holds the session token and attaches it as a bearer header to every
/// request while one is available. There is no retry, backoff, or timeout
/// policy here; a failed call fails once, immediately, to the caller.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    store: Box<dyn TokenStore>,
    /// In-memory token, lazily backfilled from the store.
    token: RwLock<Option<String>>,
}

impl ApiClient {
    /// Creates a client around the given config and token storage.
    pub fn new(config: ApiConfig, store: Box<dyn TokenStore>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            store,
            token: RwLock::new(None),
        }
    }

    /// Updates the session token.
    ///
    /// `Some` stores the token in memory and persists it; `None` clears
    /// both. A failed persistence write is logged and swallowed so the
    /// in-memory session keeps working either way.
    pub fn set_token(&self, token: Option<&str>) {
        let mut current = self.token.write().expect("token lock poisoned");
        match token {
            Some(value) if !value.is_empty() => {
                *current = Some(value.to_string());
                if let Err(err) = self.store.set(value) {
                    tracing::warn!(error = %err, "failed to persist session token");
                }
            }
            _ => {
                *current = None;
                if let Err(err) = self.store.remove() {
                    tracing::warn!(error = %err, "failed to clear persisted session token");
                }
            }
        }
    }

    /// The current session token, if any.
    ///
    /// Falls back to a fresh read of the persisted store when the
    /// in-memory value is unset, caching whatever it finds.
    pub fn token(&self) -> Option<String> {
        if let Some(token) = self.token.read().expect("token lock poisoned").clone() {
            return Some(token);
        }

        let stored = self.store.get()?;
        *self.token.write().expect("token lock poisoned") = Some(stored.clone());
        Some(stored)
    }

    /// Issues a request against `endpoint` (a path relative to the base
    /// URL) and returns the decoded JSON response body.
    ///
    /// On a non-2xx status the decoded `message` field (or a fixed
    /// fallback) is surfaced as [`ApiError::Api`]; the caller never sees
    /// an undecoded error body. Failures are logged with the endpoint
    /// for context and propagated unchanged.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let method = options.method.unwrap_or(Method::GET);
        let url = format!("{}{}", self.config.base_url(), endpoint);
        let headers = compose_headers(self.token().as_deref(), &options.headers)?;

        let mut builder = self.http.request(method, &url).headers(headers);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.payload()?);
        }

        let response = builder.send().await.map_err(|err| {
            tracing::error!(endpoint, error = %err, "request failed");
            ApiError::Network(err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| {
            tracing::error!(endpoint, error = %err, "failed to read response body");
            ApiError::Network(err)
        })?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(endpoint, status = %status, message = %message, "API error response");
            return Err(ApiError::Api(message));
        }

        serde_json::from_str(&body).map_err(|err| {
            tracing::error!(endpoint, error = %err, "failed to decode response body");
            ApiError::Parse(err)
        })
    }

    /// GET `endpoint`, serializing `params` into the query string.
    ///
    /// An empty parameter set issues the bare path with no `?` at all.
    pub async fn get(&self, endpoint: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.request(
            endpoint,
            RequestOptions {
                query: params.to_vec(),
                ..Default::default()
            },
        )
        .await
    }

    /// POST `data` as a JSON body to `endpoint`.
    pub async fn post(&self, endpoint: &str, data: Value) -> Result<Value, ApiError> {
        self.request(
            endpoint,
            RequestOptions {
                method: Some(Method::POST),
                body: Some(RequestBody::Json(data)),
                ..Default::default()
            },
        )
        .await
    }

    /// PUT `data` as a JSON body to `endpoint`.
    pub async fn put(&self, endpoint: &str, data: Value) -> Result<Value, ApiError> {
        self.request(
            endpoint,
            RequestOptions {
                method: Some(Method::PUT),
                body: Some(RequestBody::Json(data)),
                ..Default::default()
            },
        )
        .await
    }

    /// DELETE `endpoint`.
    pub async fn delete(&self, endpoint: &str) -> Result<Value, ApiError> {
        self.request(
            endpoint,
            RequestOptions {
                method: Some(Method::DELETE),
                ..Default::default()
            },
        )
        .await
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        self.config.base_url()
    }
}

/// Builds the outgoing header set.
///
/// Defaults first (`Content-Type`, then the bearer header when a token is
/// available), caller-supplied headers last so they can override both.
/// Without a token the `Authorization` header is omitted entirely.
fn compose_headers(
    token: Option<&str>,
    extra: &[(String, String)],
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    if let Some(token) = token {
        let value = format!("Bearer {token}");
        let value = HeaderValue::from_str(&value)
            .map_err(|err| ApiError::InvalidHeader(err.to_string()))?;
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|err| ApiError::InvalidHeader(err.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|err| ApiError::InvalidHeader(err.to_string()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

/// Extracts the human-readable message from a failed response body.
///
/// Failure bodies are shaped `{"message": "..."}`; anything else (missing
/// field, non-JSON body) falls back to a fixed string so callers never see
/// an empty or undecoded error.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string())
}

/// Unwraps the `{data: ...}` envelope every successful response follows.
///
/// A success body without a `data` field unwraps to JSON `null`; the
/// client never assumes any other fields exist.
pub(crate) fn unwrap_data(envelope: Value) -> Value {
    match envelope {
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}
