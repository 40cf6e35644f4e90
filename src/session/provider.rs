//! Boundary to the real-time media session
//!
//! A provider owns audio capture, playback and speech recognition. The core
//! only sees what comes out of a [`SessionHandle`]: assistant state changes
//! and transcript segments for each side, plus a disconnect notification.

use super::state::AssistantState;
use crate::token::SessionCredential;
use crate::transcript::TranscriptSegment;
use crate::{Result, SupportError};
use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};

/// Parameters for mounting a live session
#[derive(Debug, Clone)]
pub struct ConnectRequest {
    /// Session server URL from configuration
    pub server_url: String,
    pub credential: SessionCredential,
    /// Publish the microphone
    pub audio: bool,
    /// Publish a camera (always off for voice support)
    pub video: bool,
}

/// Events emitted by a live session
#[derive(Debug, Clone)]
pub enum ProviderEvent {
    /// Assistant turn-taking state changed
    StateChanged(AssistantState),

    /// New or revised assistant transcript segment
    AgentTranscription(TranscriptSegment),

    /// New or revised transcript segment for the local microphone
    UserTranscription(TranscriptSegment),

    /// Session ended; `reason` is set when it ended with an error
    Disconnected { reason: Option<String> },
}

/// Commands accepted by a live session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    SetMicrophoneEnabled(bool),
    Disconnect,
}

/// UI-side handle to a live session
pub struct SessionHandle {
    event_rx: Receiver<ProviderEvent>,
    command_tx: Sender<ProviderCommand>,
}

/// Provider-side end of a [`SessionHandle`]
pub struct ProviderEndpoint {
    pub event_tx: Sender<ProviderEvent>,
    pub command_rx: Receiver<ProviderCommand>,
}

impl SessionHandle {
    pub fn new(event_rx: Receiver<ProviderEvent>, command_tx: Sender<ProviderCommand>) -> Self {
        Self {
            event_rx,
            command_tx,
        }
    }

    /// Create a connected handle/endpoint pair
    pub fn channel() -> (SessionHandle, ProviderEndpoint) {
        let (event_tx, event_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();
        (
            SessionHandle::new(event_rx, command_tx),
            ProviderEndpoint {
                event_tx,
                command_rx,
            },
        )
    }

    /// Try to receive the next event without blocking.
    ///
    /// Fails once the provider side has gone away and every queued event
    /// has been drained.
    pub fn try_recv_event(&self) -> Result<Option<ProviderEvent>> {
        match self.event_rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SupportError::SessionDisconnectError(
                "session provider went away".to_string(),
            )),
        }
    }

    /// Send a command to the provider
    pub fn send_command(&self, command: ProviderCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .map_err(|e| SupportError::ChannelError(format!("Failed to send command: {}", e)))
    }
}

/// A real-time media session backend
pub trait SessionProvider: Send + Sync {
    /// Mount a live session. Events start flowing on the returned handle.
    fn connect(&self, request: ConnectRequest) -> Result<SessionHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_channel() {
        let (handle, endpoint) = SessionHandle::channel();
        assert!(handle.try_recv_event().unwrap().is_none());

        endpoint
            .event_tx
            .send(ProviderEvent::StateChanged(AssistantState::Listening))
            .unwrap();
        assert!(matches!(
            handle.try_recv_event().unwrap(),
            Some(ProviderEvent::StateChanged(AssistantState::Listening))
        ));

        handle.send_command(ProviderCommand::Disconnect).unwrap();
        assert_eq!(endpoint.command_rx.try_recv().unwrap(), ProviderCommand::Disconnect);
    }

    #[test]
    fn test_dropped_provider_reports_disconnect_after_drain() {
        let (handle, endpoint) = SessionHandle::channel();
        endpoint
            .event_tx
            .send(ProviderEvent::StateChanged(AssistantState::Speaking))
            .unwrap();
        drop(endpoint);

        assert!(handle.try_recv_event().unwrap().is_some());
        assert!(matches!(
            handle.try_recv_event(),
            Err(SupportError::SessionDisconnectError(_))
        ));
        assert!(handle.send_command(ProviderCommand::Disconnect).is_err());
    }
}
