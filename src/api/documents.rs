use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use super::client::{error_message, unwrap_data, ApiClient, ApiError};

/// Upload endpoint for document storage.
const UPLOAD_ENDPOINT: &str = "/documents/upload";

/// File upload binding.
///
/// Uploads bypass the JSON-body request path entirely (the body is a
/// multipart form) but keep the bearer-token rule and the `data` envelope
/// on the response.
pub struct DocumentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> DocumentsApi<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Uploads a file into the given folder and returns the stored
    /// document record from the response envelope.
    pub async fn upload(
        &self,
        file_name: &str,
        contents: Vec<u8>,
        folder: &str,
    ) -> Result<Value, ApiError> {
        let url = format!("{}{}", self.client.base_url(), UPLOAD_ENDPOINT);

        let file_part = Part::bytes(contents).file_name(file_name.to_string());
        let form = Form::new()
            .part("file", file_part)
            .text("folder", folder.to_string());

        let mut builder = self.client.http().post(&url).multipart(form);
        if let Some(token) = self.client.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = builder.send().await.map_err(|err| {
            tracing::error!(endpoint = UPLOAD_ENDPOINT, error = %err, "upload failed");
            ApiError::Network(err)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            let message = error_message(&body);
            tracing::warn!(endpoint = UPLOAD_ENDPOINT, status = %status, message = %message, "upload rejected");
            return Err(ApiError::Api(message));
        }

        let envelope: Value = serde_json::from_str(&body)?;
        Ok(unwrap_data(envelope))
    }
}
