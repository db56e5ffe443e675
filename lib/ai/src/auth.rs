//! Upstream authentication for the inference endpoint.
//!
//! Some deployments put the Ollama endpoint behind a reverse proxy that
//! trades a bearer token for a session cookie. The gateway stays unaware of
//! that scheme: it asks an [`Authenticator`] to decorate each request and,
//! when the endpoint answers with a challenge, whether one retry is worth it.

use crate::error::GatewayError;
use async_trait::async_trait;
use llm_inference_core::Result;
use reqwest::header::COOKIE;
use reqwest::{Client, RequestBuilder, StatusCode};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Pluggable authentication for outbound inference requests.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Adds credentials to an outbound request.
    ///
    /// # Errors
    ///
    /// Returns an error if credentials had to be obtained first and that failed.
    async fn attach(&self, request: RequestBuilder) -> Result<RequestBuilder, GatewayError>;

    /// Reacts to a non-success status on an inference request.
    ///
    /// Returns `true` if credentials were refreshed and the request should be
    /// sent once more.
    ///
    /// # Errors
    ///
    /// Returns an error if refreshing credentials failed.
    async fn on_challenge(&self, status: StatusCode) -> Result<bool, GatewayError>;
}

/// Authenticator for endpoints that need no credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl Authenticator for NoAuth {
    async fn attach(&self, request: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        Ok(request)
    }

    async fn on_challenge(&self, _status: StatusCode) -> Result<bool, GatewayError> {
        Ok(false)
    }
}

/// Bearer-token login that caches a proxy session cookie.
///
/// A priming `GET` on the login URL carries the bearer token; the proxy
/// answers `302 Found` with the session cookie. Every inference request then
/// carries both the cookie and the bearer token. A `302` or `401` on an
/// inference request re-runs the priming step.
///
/// Priming runs under the session write lock, so concurrent first requests
/// share one login.
pub struct SessionCookieAuth {
    client: Client,
    login_url: String,
    token: String,
    cookie_name: String,
    session: RwLock<Option<String>>,
}

impl SessionCookieAuth {
    /// Creates an authenticator with an empty session.
    ///
    /// `client` must not follow redirects, or the cookie-bearing `302` is
    /// never observed.
    #[must_use]
    pub fn new(
        client: Client,
        login_url: impl Into<String>,
        token: impl Into<String>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            login_url: login_url.into(),
            token: token.into(),
            cookie_name: cookie_name.into(),
            session: RwLock::new(None),
        }
    }

    /// Returns the cached session cookie value, if any.
    pub async fn session_cookie(&self) -> Option<String> {
        self.session.read().await.clone()
    }

    /// Runs the priming request and returns the issued session cookie, if any.
    async fn login(&self) -> Result<Option<String>, GatewayError> {
        let response = self
            .client
            .get(&self.login_url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed {
                endpoint: self.login_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let issued = response
            .cookies()
            .find(|c| c.name() == self.cookie_name)
            .map(|c| c.value().to_string());

        if status == StatusCode::FOUND
            && let Some(value) = issued
        {
            debug!(cookie = %self.cookie_name, "Captured upstream session cookie");
            return Ok(Some(value));
        }

        if status == StatusCode::OK {
            debug!("Upstream accepted bearer token without issuing a session");
            return Ok(None);
        }

        warn!(status = %status, login_url = %self.login_url, "Upstream authentication failed");
        Err(GatewayError::AuthenticationFailed {
            status: status.as_u16(),
        }
        .into())
    }
}

#[async_trait]
impl Authenticator for SessionCookieAuth {
    async fn attach(&self, request: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        if self.session.read().await.is_none() {
            let mut session = self.session.write().await;
            if session.is_none() {
                *session = self.login().await?;
            }
        }

        let mut request = request.bearer_auth(&self.token);
        if let Some(value) = self.session_cookie().await {
            request = request.header(COOKIE, format!("{}={value}", self.cookie_name));
        }
        Ok(request)
    }

    async fn on_challenge(&self, status: StatusCode) -> Result<bool, GatewayError> {
        if status != StatusCode::FOUND && status != StatusCode::UNAUTHORIZED {
            return Ok(false);
        }

        warn!(status = %status, "Re-authenticating after upstream rejected the session");
        let mut session = self.session.write().await;
        if let Some(value) = self.login().await? {
            *session = Some(value);
        }
        Ok(true)
    }
}
