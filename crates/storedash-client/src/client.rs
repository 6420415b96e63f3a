//! HTTP client for the storedash admin API.
//!
//! Wraps `reqwest` with bearer authentication read from the shared
//! [`SessionContext`], structured error-body parsing, and the conflict
//! detection used by deletes. Every request is sent exactly once; nothing is
//! retried here.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde_json::Value;
use storedash_core::{AppConfig, ShapeError};

use crate::error::{ApiError, ConflictReason, DeleteConflict};
use crate::session::SessionContext;

/// Client for the admin REST API.
///
/// Use [`AdminClient::new`] with the loaded configuration or
/// [`AdminClient::with_base_url`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl AdminClient {
    /// Creates a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(config: &AppConfig, session: SessionContext) -> Result<Self, ApiError> {
        Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            session,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        session: SessionContext,
    ) -> Result<Self, ApiError> {
        Self::build(base_url, timeout_secs, "storedash/0.1 (admin-dashboard)", session)
    }

    fn build(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        session: SessionContext,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Authenticated GET returning the parsed JSON body.
    pub(crate) async fn get_json(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.authorized(Method::GET, path)?;
        let response = self.send(request, Method::GET, path).await?;
        self.read_json(response, path).await
    }

    /// Authenticated request with a JSON body.
    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.authorized(method.clone(), path)?.json(body);
        let response = self.send(request, method, path).await?;
        self.read_json(response, path).await
    }

    /// Authenticated `multipart/form-data` request.
    pub(crate) async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Value, ApiError> {
        let request = self.authorized(method.clone(), path)?.multipart(form);
        let response = self.send(request, method, path).await?;
        self.read_json(response, path).await
    }

    /// Authenticated DELETE.
    ///
    /// A refusal carrying one of the "remove products first" messages becomes
    /// [`ApiError::Conflict`]; `known_product_count` fills in when the server
    /// does not send its own `productCount`.
    pub(crate) async fn delete(
        &self,
        path: &str,
        known_product_count: u32,
    ) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, path)?;
        let response = self.client_send(request, &Method::DELETE, path).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await?;
        let body = parse_error_body(status, &text);
        if let Some(reason) = ConflictReason::from_server_message(&body.message) {
            let conflict = DeleteConflict {
                reason,
                product_count: body.product_count.unwrap_or(known_product_count),
            };
            tracing::info!(path, product_count = conflict.product_count, "delete blocked by products");
            return Err(ApiError::Conflict(conflict));
        }
        Err(self.failure(status, body.message))
    }

    /// Unauthenticated POST used by login.
    pub(crate) async fn post_public<B>(&self, path: &str, body: &B) -> Result<Value, ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.client.post(self.url(path)).json(body);
        let response = self.send(request, Method::POST, path).await?;
        self.read_json(response, path).await
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.session.require_authenticated()?;
        Ok(self
            .client
            .request(method, self.url(path))
            .bearer_auth(token))
    }

    async fn client_send(
        &self,
        request: RequestBuilder,
        method: &Method,
        path: &str,
    ) -> Result<Response, ApiError> {
        tracing::debug!(%method, path, "sending admin API request");
        request.send().await.map_err(|err| {
            tracing::warn!(%method, path, error = %err, "admin API request failed");
            ApiError::Http(err)
        })
    }

    /// Sends `request` and converts any non-success status into an error.
    async fn send(
        &self,
        request: RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<Response, ApiError> {
        let response = self.client_send(request, &method, path).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await?;
        let body = parse_error_body(status, &text);
        tracing::warn!(%method, path, status = status.as_u16(), message = %body.message, "admin API rejected request");
        Err(self.failure(status, body.message))
    }

    /// Parses a success body. An empty body reads as `null`.
    async fn read_json(&self, response: Response, context: &str) -> Result<Value, ApiError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    fn failure(&self, status: StatusCode, message: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                if let Err(err) = self.session.clear() {
                    tracing::warn!(error = %err, "failed to clear session after 401");
                }
                ApiError::Unauthorized { message }
            }
            StatusCode::FORBIDDEN => ApiError::Unauthorized { message },
            other => ApiError::Rejected {
                status: other.as_u16(),
                message,
            },
        }
    }
}

/// The useful parts of an error response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorBody {
    pub message: String,
    pub product_count: Option<u32>,
}

/// Reads `error` (then `message`) from a JSON error body, falling back to the
/// raw text, then to a generic status line when the body is empty.
pub(crate) fn parse_error_body(status: StatusCode, text: &str) -> ErrorBody {
    let json = serde_json::from_str::<Value>(text).ok();
    let field = |key: &str| {
        json.as_ref()
            .and_then(|v| v.get(key))
            .and_then(Value::as_str)
            .map(str::to_string)
    };
    let product_count = json
        .as_ref()
        .and_then(|v| v.get("productCount"))
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok());

    let message = field("error")
        .or_else(|| field("message"))
        .or_else(|| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    ErrorBody {
        message,
        product_count,
    }
}

/// Maps a decode failure on `context` to [`ApiError::UnexpectedShape`].
pub(crate) fn shape_error(context: &str) -> impl FnOnce(ShapeError) -> ApiError + '_ {
    move |err| ApiError::UnexpectedShape {
        context: context.to_string(),
        reason: err.to_string(),
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
