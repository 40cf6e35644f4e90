//! Turn-state presentation
//!
//! Maps the assistant's turn-taking state to the icon and sentence shown at
//! the top of a live session.

use crate::session::AssistantState;

/// Icon shown next to the status text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusIcon {
    /// Pulsing microphone
    Microphone,
    /// Rotating spinner
    Spinner,
    /// Bouncing assistant avatar
    Assistant,
    /// Greyed-out microphone
    MicrophoneOff,
}

impl StatusIcon {
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusIcon::Microphone => "🎤",
            StatusIcon::Spinner => "⟳",
            StatusIcon::Assistant => "🤖",
            StatusIcon::MicrophoneOff => "🔇",
        }
    }

    /// Whether the icon animates
    pub fn is_animated(&self) -> bool {
        !matches!(self, StatusIcon::MicrophoneOff)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnStatus {
    pub icon: StatusIcon,
    pub text: &'static str,
}

pub const READY_TEXT: &str = "Ready to help you";

pub fn present(state: AssistantState) -> TurnStatus {
    match state {
        AssistantState::Listening => TurnStatus {
            icon: StatusIcon::Microphone,
            text: "Listening to your request...",
        },
        AssistantState::Thinking => TurnStatus {
            icon: StatusIcon::Spinner,
            text: "Processing your request...",
        },
        AssistantState::Speaking => TurnStatus {
            icon: StatusIcon::Assistant,
            text: "Assistant is responding...",
        },
        _ => TurnStatus {
            icon: StatusIcon::MicrophoneOff,
            text: READY_TEXT,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_states() {
        assert_eq!(present(AssistantState::Listening).text, "Listening to your request...");
        assert_eq!(present(AssistantState::Listening).icon, StatusIcon::Microphone);
        assert_eq!(present(AssistantState::Thinking).text, "Processing your request...");
        assert_eq!(present(AssistantState::Thinking).icon, StatusIcon::Spinner);
        assert_eq!(present(AssistantState::Speaking).text, "Assistant is responding...");
        assert_eq!(present(AssistantState::Speaking).icon, StatusIcon::Assistant);
    }

    #[test]
    fn test_every_state_has_text() {
        for state in [
            AssistantState::Disconnected,
            AssistantState::Connecting,
            AssistantState::Initializing,
            AssistantState::Idle,
            AssistantState::Listening,
            AssistantState::Thinking,
            AssistantState::Speaking,
        ] {
            assert!(!present(state).text.is_empty(), "{} has no text", state);
        }
    }

    #[test]
    fn test_unknown_falls_back_to_ready() {
        let status = present(AssistantState::from_provider("buffering"));
        assert_eq!(status.text, READY_TEXT);
        assert_eq!(status.icon, StatusIcon::MicrophoneOff);
        assert_eq!(present(AssistantState::Connecting).text, READY_TEXT);
    }
}
