pub mod config;
pub mod session;
pub mod token;
pub mod transcript;
pub mod ui;
pub mod utils;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SupportError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Operation not valid in phase {phase}: {operation}")]
    InvalidPhase {
        phase: session::SessionPhase,
        operation: &'static str,
    },

    #[error("Credential error: {0}")]
    CredentialError(String),

    #[error("Session disconnected: {0}")]
    SessionDisconnectError(String),

    #[error("Session provider error: {0}")]
    ProviderError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IOError(String),
}

impl From<std::io::Error> for SupportError {
    fn from(e: std::io::Error) -> Self {
        SupportError::IOError(e.to_string())
    }
}

impl SupportError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            // The user can correct the name and submit again
            SupportError::InvalidName(_) => true,
            SupportError::InvalidPhase { .. } => true,
            // Token fetches are retried by the user, never automatically
            SupportError::CredentialError(_) => true,
            SupportError::SessionDisconnectError(_) => true,
            SupportError::ProviderError(_) => true,
            SupportError::ChannelError(_) => false,
            SupportError::ConfigError(_) => false,
            SupportError::IOError(_) => false,
        }
    }

    /// Get a user-friendly description
    pub fn user_message(&self) -> String {
        match self {
            SupportError::InvalidName(_) => "Please enter your name.".to_string(),
            SupportError::InvalidPhase { .. } => {
                "That action is not available right now.".to_string()
            }
            SupportError::CredentialError(_) => {
                "Could not connect to the assistant. Please try again.".to_string()
            }
            SupportError::SessionDisconnectError(_) => {
                "The call was disconnected.".to_string()
            }
            SupportError::ProviderError(_) => {
                "Voice session failed to start. Please try again.".to_string()
            }
            SupportError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
            SupportError::ConfigError(_) => {
                "Configuration error. Please check settings.".to_string()
            }
            SupportError::IOError(_) => "File system error occurred.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SupportError>;
