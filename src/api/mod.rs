mod auth;
mod client;
mod documents;
mod entity;

pub use auth::{
    AuthApi, AuthSession, AuthUser, LoginRequest, RegisterRequest, UpdatePasswordRequest,
};
pub use client::{ApiClient, ApiError, RequestBody, RequestOptions, FALLBACK_ERROR_MESSAGE};
pub use documents::DocumentsApi;
pub use entity::{EntityApi, ListParams};
