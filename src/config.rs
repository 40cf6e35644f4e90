//! Configuration for the support widget
//!
//! Values come from the environment once at startup; everything else has
//! sensible defaults and can be overridden with the builder methods.

use crate::{Result, SupportError};
use std::path::PathBuf;
use std::time::Duration;

/// Default token endpoint used when `SUPPORT_TOKEN_URL` is unset
pub const DEFAULT_TOKEN_URL: &str = "http://127.0.0.1:5001/api/getToken";

/// Configuration for the complete widget
#[derive(Clone, Debug)]
pub struct SupportConfig {
    /// Real-time session server URL, handed to the provider at connect time
    pub server_url: String,

    /// Full URL of the token endpoint (`GET ?name=...`)
    pub token_url: String,

    /// Timeout for a single credential request
    pub token_timeout: Duration,

    /// How long the conversation view waits for layout to settle before scrolling
    pub scroll_settle_delay: Duration,

    /// Number of bars in the assistant visualizer
    pub visualizer_bars: usize,

    /// Optional JSON script for the scripted session provider
    pub script_path: Option<PathBuf>,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            server_url: "ws://127.0.0.1:7880".to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token_timeout: Duration::from_secs(10),
            scroll_settle_delay: Duration::from_millis(100),
            visualizer_bars: 12,
            script_path: None,
        }
    }
}

impl SupportConfig {
    /// Build a configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup("LIVEKIT_URL") {
            config.server_url = url;
        }

        if let Some(url) = lookup("SUPPORT_TOKEN_URL") {
            config.token_url = url;
        }

        if let Some(secs) = lookup("SUPPORT_TOKEN_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                SupportError::ConfigError(format!(
                    "SUPPORT_TOKEN_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    secs
                ))
            })?;
            config.token_timeout = Duration::from_secs(secs);
        }

        if let Some(path) = lookup("SUPPORT_SCRIPT") {
            config.script_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Set the session server URL
    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = url.into();
        self
    }

    /// Set the token endpoint URL
    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }


    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server_url.trim().is_empty() {
            return Err(SupportError::ConfigError(
                "session server URL is required".to_string(),
            ));
        }

        if !(self.token_url.starts_with("http://") || self.token_url.starts_with("https://")) {
            return Err(SupportError::ConfigError(format!(
                "token URL must be http(s): {}",
                self.token_url
            )));
        }

        if self.token_timeout.is_zero() {
            return Err(SupportError::ConfigError(
                "token timeout must be non-zero".to_string(),
            ));
        }

        if self.visualizer_bars == 0 {
            return Err(SupportError::ConfigError(
                "visualizer needs at least one bar".to_string(),
            ));
        }

        if let Some(path) = &self.script_path {
            if !path.exists() {
                return Err(SupportError::ConfigError(format!(
                    "session script not found: {:?}",
                    path
                )));
            }
        }

        Ok(())
    }
}
