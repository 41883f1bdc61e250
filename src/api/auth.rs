use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::client::{unwrap_data, ApiClient, ApiError};

/// Payload for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `PUT /auth/update-password`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// The authenticated user as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A session token paired with the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: AuthUser,
}

/// Fixed endpoint bindings for the authentication flow.
///
/// Each call is a single request against a literal path; the server tracks
/// session validity. The only state touched here is the client's token,
/// which session-bearing responses store and logout clears.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Registers a new account and stores the returned session token.
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession, ApiError> {
        self.session_request("/auth/register", request).await
    }

    /// Logs in and stores the returned session token.
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession, ApiError> {
        self.session_request("/auth/login", request).await
    }

    /// Logs out server-side, then clears the stored token.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.client.post("/auth/logout", Value::Null).await?;
        self.client.set_token(None);
        Ok(())
    }

    /// Fetches the currently authenticated user.
    pub async fn me(&self) -> Result<AuthUser, ApiError> {
        let envelope = self.client.get("/auth/me", &[]).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Updates profile fields and returns the refreshed user.
    pub async fn update_profile(&self, data: Value) -> Result<AuthUser, ApiError> {
        let envelope = self.client.put("/auth/update-profile", data).await?;
        Ok(serde_json::from_value(unwrap_data(envelope))?)
    }

    /// Changes the password. Returns the server's acknowledgment payload.
    pub async fn update_password(
        &self,
        request: &UpdatePasswordRequest,
    ) -> Result<Value, ApiError> {
        let data = serde_json::to_value(request)?;
        let envelope = self.client.put("/auth/update-password", data).await?;
        Ok(unwrap_data(envelope))
    }

    /// Starts the password-reset flow for the given address.
    pub async fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        let envelope = self
            .client
            .post("/auth/forgot-password", serde_json::json!({ "email": email }))
            .await?;
        Ok(unwrap_data(envelope))
    }

    /// Completes the password-reset flow with the emailed token and
    /// stores the fresh session it returns.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        new_password: &str,
    ) -> Result<AuthSession, ApiError> {
        let endpoint = format!("/auth/reset-password/{reset_token}");
        let data = serde_json::json!({ "password": new_password });
        let envelope = self.client.post(&endpoint, data).await?;
        self.store_session(envelope)
    }

    /// Exchanges the current token for a fresh one and stores it.
    pub async fn refresh_token(&self) -> Result<AuthSession, ApiError> {
        let envelope = self.client.post("/auth/refresh-token", Value::Null).await?;
        self.store_session(envelope)
    }

    /// POSTs a serializable payload and stores the session that comes back.
    async fn session_request<T: Serialize>(
        &self,
        endpoint: &str,
        request: &T,
    ) -> Result<AuthSession, ApiError> {
        let data = serde_json::to_value(request)?;
        let envelope = self.client.post(endpoint, data).await?;
        self.store_session(envelope)
    }

    fn store_session(&self, envelope: Value) -> Result<AuthSession, ApiError> {
        let session: AuthSession = serde_json::from_value(unwrap_data(envelope))?;
        self.client.set_token(Some(&session.token));
        Ok(session)
    }
}
