use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the support widget's session lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Waiting for the customer to enter a name
    #[default]
    CollectingName,
    /// Credential request in flight
    AwaitingCredential,
    /// Live session mounted
    Connected,
}

impl SessionPhase {
    pub fn is_collecting_name(&self) -> bool {
        matches!(self, SessionPhase::CollectingName)
    }

    pub fn is_awaiting_credential(&self) -> bool {
        matches!(self, SessionPhase::AwaitingCredential)
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, SessionPhase::Connected)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::CollectingName => write!(f, "collecting-name"),
            SessionPhase::AwaitingCredential => write!(f, "awaiting-credential"),
            SessionPhase::Connected => write!(f, "connected"),
        }
    }
}

/// Turn-taking state reported by the session provider
///
/// Deserializes through [`AssistantState::from_provider`], so state names a
/// newer provider introduces read as `Idle` instead of failing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AssistantState {
    Disconnected,
    Connecting,
    Initializing,
    #[default]
    Idle,
    Listening,
    Thinking,
    Speaking,
}

impl AssistantState {
    /// Parse a provider state name. Unknown names map to `Idle`.
    pub fn from_provider(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "disconnected" => AssistantState::Disconnected,
            "connecting" => AssistantState::Connecting,
            "initializing" => AssistantState::Initializing,
            "listening" => AssistantState::Listening,
            "thinking" => AssistantState::Thinking,
            "speaking" => AssistantState::Speaking,
            _ => AssistantState::Idle,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AssistantState::Disconnected => "disconnected",
            AssistantState::Connecting => "connecting",
            AssistantState::Initializing => "initializing",
            AssistantState::Idle => "idle",
            AssistantState::Listening => "listening",
            AssistantState::Thinking => "thinking",
            AssistantState::Speaking => "speaking",
        }
    }

    /// Whether the assistant is in a conversational turn
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AssistantState::Listening | AssistantState::Thinking | AssistantState::Speaking
        )
    }
}

impl From<String> for AssistantState {
    fn from(name: String) -> Self {
        Self::from_provider(&name)
    }
}

impl fmt::Display for AssistantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
