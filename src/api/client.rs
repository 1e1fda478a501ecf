//! HTTP client for the Chirp API
//!
//! Handles all communication with the Chirp backend server. Every successful
//! JSON response arrives wrapped in a `{ data }` envelope; error payloads
//! share the shape, carrying a `message` and optionally field `errors`.

use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Envelope;

/// API client for the Chirp backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client from the resolved configuration.
    pub fn new(config: &Config) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.api_base(),
        }
    }

    /// Build URL for endpoint
    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Attach the bearer token when one is present
    fn bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }

    /// Make authenticated GET request
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = Self::bearer(self.client.get(self.url(endpoint)), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make authenticated POST request with a JSON body
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = Self::bearer(self.client.post(self.url(endpoint)).json(body), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Make authenticated PUT request with a JSON body
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = Self::bearer(self.client.put(self.url(endpoint)).json(body), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// PUT with a JSON body, discarding the response payload
    pub(crate) async fn put_unit<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<()> {
        let request = Self::bearer(self.client.put(self.url(endpoint)).json(body), token);
        let response = request.send().await?;
        Self::handle_unit_response(response).await
    }

    /// PUT without a body, discarding the response payload
    pub(crate) async fn put_empty(&self, endpoint: &str, token: Option<&str>) -> AppResult<()> {
        let request = Self::bearer(self.client.put(self.url(endpoint)), token);
        let response = request.send().await?;
        Self::handle_unit_response(response).await
    }

    /// Make authenticated DELETE request
    pub(crate) async fn delete(&self, endpoint: &str, token: Option<&str>) -> AppResult<()> {
        let request = Self::bearer(self.client.delete(self.url(endpoint)), token);
        let response = request.send().await?;
        Self::handle_unit_response(response).await
    }

    /// POST a multipart form (media upload)
    pub(crate) async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: multipart::Form,
        token: Option<&str>,
    ) -> AppResult<T> {
        let request = Self::bearer(self.client.post(self.url(endpoint)).multipart(form), token);
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// Handle response and unwrap the `{ data }` envelope
    async fn handle_response<T: DeserializeOwned>(response: Response) -> AppResult<T> {
        let status = response.status();
        let body = response.text().await?;
        decode_data(status, &body)
    }

    /// Handle a response whose payload the caller does not need
    async fn handle_unit_response(response: Response) -> AppResult<()> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(());
        }
        Err(error_from_body(status, &body))
    }
}

/// Unwrap `data` from a success envelope, or map the error payload onto the
/// client error taxonomy.
fn decode_data<T: DeserializeOwned>(status: StatusCode, body: &str) -> AppResult<T> {
    if !status.is_success() {
        return Err(error_from_body(status, body));
    }
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    envelope.data.ok_or_else(|| AppError::Api {
        status: status.as_u16(),
        message: "response envelope is missing `data`".to_string(),
    })
}

fn error_from_body(status: StatusCode, body: &str) -> AppError {
    // Error payloads share the envelope shape; tolerate non-JSON bodies.
    let envelope: Envelope<serde_json::Value> =
        serde_json::from_str(body).unwrap_or_else(|_| Envelope::empty());
    let message = envelope.message.unwrap_or_default();

    if !envelope.errors.is_empty() {
        return AppError::Validation(envelope.errors);
    }
    match status {
        StatusCode::UNAUTHORIZED => AppError::Unauthorized,
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        _ => AppError::Api {
            status: status.as_u16(),
            message,
        },
    }
}
