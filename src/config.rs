use std::env;

use url::Url;

use crate::api::ApiError;

/// Environment variable overriding the backend base URL.
pub const BASE_URL_VAR: &str = "CRM_API_BASE_URL";

/// Where we point when nothing is configured: a local development backend.
const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Connection settings for the CRM backend.
///
/// All entity and auth paths are relative to `base_url`, which already
/// carries the versioned prefix (e.g. `/api/v1`).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Creates a config around the given base URL.
    ///
    /// The URL must be absolute. A trailing slash is trimmed so that
    /// concatenating endpoint paths never produces a double slash.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        // Validate up front rather than letting the first request fail
        // with a confusing transport error.
        Url::parse(base_url).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Reads the base URL from the environment, falling back to the
    /// local development default.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(&base_url)
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
