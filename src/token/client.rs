use crate::{Result, SupportError};
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Opaque bearer token authorizing a single real-time session
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCredential(String);

impl SessionCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Never print the token itself
impl fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionCredential(<{} bytes>)", self.0.len())
    }
}

/// Trim a display name, rejecting blank input
pub fn validate_display_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SupportError::InvalidName(
            "display name must not be blank".to_string(),
        ));
    }
    Ok(trimmed)
}

/// Source of session credentials
#[async_trait]
pub trait TokenClient: Send + Sync {
    /// Request a credential for `display_name`. Fails once; never retries.
    async fn request_credential(&self, display_name: &str) -> Result<SessionCredential>;
}

/// Token client backed by the `GET /api/getToken?name=...` endpoint
#[derive(Debug, Clone)]
pub struct HttpTokenClient {
    client: reqwest::Client,
    token_url: String,
}

impl HttpTokenClient {
    pub fn new(token_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SupportError::ConfigError(format!("HTTP client build failed: {}", e)))?;

        Ok(Self {
            client,
            token_url: token_url.into(),
        })
    }
}

#[async_trait]
impl TokenClient for HttpTokenClient {
    async fn request_credential(&self, display_name: &str) -> Result<SessionCredential> {
        let name = validate_display_name(display_name)?;
        debug!("Requesting session credential from {}", self.token_url);

        let response = self
            .client
            .get(&self.token_url)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| {
                warn!("Token request failed: {}", e);
                SupportError::CredentialError(format!("request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Token endpoint returned {}", status);
            return Err(SupportError::CredentialError(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SupportError::CredentialError(format!("failed to read token: {}", e)))?;

        let token = body.trim();
        if token.is_empty() {
            return Err(SupportError::CredentialError(
                "token endpoint returned an empty body".to_string(),
            ));
        }

        Ok(SessionCredential::new(token))
    }
}
