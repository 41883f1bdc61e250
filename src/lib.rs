//! Client library for the CRM backend API.
//!
//! [`ApiClient`] is the single choke point for HTTP: it composes requests
//! against the configured base URL, attaches the persisted bearer token,
//! and normalizes the `{data: ...}` / `{message: ...}` response envelope.
//! [`EntityApi`] maps generic CRUD onto REST conventions through it, and
//! [`AuthApi`] binds the fixed authentication endpoints.

pub mod api;
pub mod config;
pub mod storage;

pub use api::{
    ApiClient, ApiError, AuthApi, AuthSession, AuthUser, DocumentsApi, EntityApi, ListParams,
    LoginRequest, RegisterRequest, RequestBody, RequestOptions, UpdatePasswordRequest,
    FALLBACK_ERROR_MESSAGE,
};
pub use config::ApiConfig;
pub use storage::{KeyringStore, MemoryStore, StorageError, TokenStore};
