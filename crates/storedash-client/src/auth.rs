//! Login and logout.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use crate::client::AdminClient;
use crate::error::ApiError;
use crate::routes;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl AdminClient {
    /// Exchanges credentials for a token and stores it in the session.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] or [`ApiError::Rejected`] when the server
    ///   refuses the credentials.
    /// - [`ApiError::UnexpectedShape`] when the response has no `token`.
    /// - [`ApiError::Session`] when the session cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = self
            .post_public(routes::LOGIN, &Credentials { email, password })
            .await?;
        let token = body
            .get("token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::UnexpectedShape {
                context: routes::LOGIN.to_string(),
                reason: "response has no token".to_string(),
            })?;
        self.session().establish(token)?;
        tracing::info!(email, "logged in");
        Ok(())
    }

    /// Ends the server session, then forgets the local one.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthenticated`] when not logged in, or the
    /// server's refusal. The local session survives a refusal other than 401.
    pub async fn logout(&self) -> Result<(), ApiError> {
        self.send_json(Method::POST, routes::LOGOUT, &serde_json::json!({}))
            .await?;
        self.session().clear()?;
        tracing::info!("logged out");
        Ok(())
    }
}
