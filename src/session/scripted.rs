//! In-process session provider that replays a scripted conversation
//!
//! Used when no live media backend is linked in, and by tests. Each step
//! waits its delay and then emits one provider event. Transcript steps may
//! carry an explicit receipt offset, so a script can deliver segments out of
//! timestamp order the way a real network does.

use super::provider::{
    ConnectRequest, ProviderCommand, ProviderEndpoint, ProviderEvent, SessionHandle,
    SessionProvider,
};
use super::state::AssistantState;
use crate::transcript::TranscriptSegment;
use crate::{Result, SupportError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use crossbeam_channel::RecvTimeoutError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// What a script step emits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    State {
        state: AssistantState,
    },
    Agent {
        id: String,
        text: String,
        #[serde(default, rename = "final")]
        is_final: bool,
        /// Receipt time relative to connect; defaults to emission time
        #[serde(default)]
        received_offset_ms: Option<i64>,
    },
    User {
        id: String,
        text: String,
        #[serde(default, rename = "final")]
        is_final: bool,
        #[serde(default)]
        received_offset_ms: Option<i64>,
    },
    Disconnect {
        #[serde(default)]
        reason: Option<String>,
    },
}

/// One scripted event and the pause before it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub delay_ms: u64,
    pub event: ScriptEvent,
}

/// A scripted conversation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SupportError::ConfigError(format!("invalid session script: {}", e)))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// A short reservation call, for running the widget without a media backend
    pub fn demo() -> Self {
        fn state(delay_ms: u64, state: AssistantState) -> ScriptStep {
            ScriptStep {
                delay_ms,
                event: ScriptEvent::State { state },
            }
        }
        fn agent(delay_ms: u64, id: &str, text: &str, is_final: bool) -> ScriptStep {
            ScriptStep {
                delay_ms,
                event: ScriptEvent::Agent {
                    id: id.to_string(),
                    text: text.to_string(),
                    is_final,
                    received_offset_ms: None,
                },
            }
        }
        fn user(delay_ms: u64, id: &str, text: &str, is_final: bool) -> ScriptStep {
            ScriptStep {
                delay_ms,
                event: ScriptEvent::User {
                    id: id.to_string(),
                    text: text.to_string(),
                    is_final,
                    received_offset_ms: None,
                },
            }
        }

        Self::new(vec![
            state(300, AssistantState::Initializing),
            state(600, AssistantState::Speaking),
            agent(200, "agent-1", "Welcome to Bella Vista!", false),
            agent(
                700,
                "agent-1",
                "Welcome to Bella Vista! Would you like to make a reservation or order takeaway?",
                true,
            ),
            state(400, AssistantState::Listening),
            user(900, "user-1", "I'd like a table", false),
            user(600, "user-1", "I'd like a table for four tomorrow evening.", true),
            state(200, AssistantState::Thinking),
            state(900, AssistantState::Speaking),
            agent(
                300,
                "agent-2",
                "Of course. What time would you like, and may I have a phone number?",
                true,
            ),
            state(800, AssistantState::Listening),
        ])
    }
}

/// Record of a connect call, for diagnostics and tests
#[derive(Debug, Clone)]
pub struct ConnectRecord {
    pub session_id: Uuid,
    pub server_url: String,
    pub audio: bool,
    pub video: bool,
}

/// Session provider that plays a [`Script`] on a background thread
#[derive(Clone)]
pub struct ScriptedProvider {
    script: Script,
    refuse_connect: bool,
    connections: Arc<Mutex<Vec<ConnectRecord>>>,
}

impl ScriptedProvider {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            refuse_connect: false,
            connections: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A provider whose every connect attempt fails
    pub fn refusing() -> Self {
        Self {
            refuse_connect: true,
            ..Self::new(Script::default())
        }
    }

    pub fn connections(&self) -> Vec<ConnectRecord> {
        self.connections.lock().clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connections.lock().len()
    }
}

impl SessionProvider for ScriptedProvider {
    fn connect(&self, request: ConnectRequest) -> Result<SessionHandle> {
        if self.refuse_connect {
            return Err(SupportError::ProviderError(format!(
                "connection to {} refused",
                request.server_url
            )));
        }

        let session_id = Uuid::new_v4();
        self.connections.lock().push(ConnectRecord {
            session_id,
            server_url: request.server_url.clone(),
            audio: request.audio,
            video: request.video,
        });

        let (handle, endpoint) = SessionHandle::channel();
        let script = self.script.clone();
        let audio = request.audio;

        thread::Builder::new()
            .name(format!("scripted-session-{}", session_id))
            .spawn(move || run_script(session_id, script, endpoint, audio))?;

        info!("Scripted session {} connected to {}", session_id, request.server_url);
        Ok(handle)
    }
}

fn run_script(session_id: Uuid, script: Script, endpoint: ProviderEndpoint, audio: bool) {
    let connected_at = Utc::now();
    let mut microphone_enabled = audio;

    for step in script.steps {
        let deadline = Instant::now() + Duration::from_millis(step.delay_ms);

        // Wait out the delay while still answering commands
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            match endpoint.command_rx.recv_timeout(timeout) {
                Ok(ProviderCommand::SetMicrophoneEnabled(enabled)) => {
                    debug!("Scripted session {} microphone enabled: {}", session_id, enabled);
                    microphone_enabled = enabled;
                }
                Ok(ProviderCommand::Disconnect) => {
                    let _ = endpoint.event_tx.send(ProviderEvent::Disconnected { reason: None });
                    return;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => return,
            }
        }

        let event = match step.event {
            ScriptEvent::State { state } => ProviderEvent::StateChanged(state),
            ScriptEvent::Agent {
                id,
                text,
                is_final,
                received_offset_ms,
            } => ProviderEvent::AgentTranscription(segment(
                connected_at,
                id,
                text,
                is_final,
                received_offset_ms,
            )),
            ScriptEvent::User {
                id,
                text,
                is_final,
                received_offset_ms,
            } => {
                // A muted microphone produces no user speech
                if !microphone_enabled {
                    continue;
                }
                ProviderEvent::UserTranscription(segment(
                    connected_at,
                    id,
                    text,
                    is_final,
                    received_offset_ms,
                ))
            }
            ScriptEvent::Disconnect { reason } => {
                let _ = endpoint.event_tx.send(ProviderEvent::Disconnected { reason });
                return;
            }
        };

        if endpoint.event_tx.send(event).is_err() {
            return;
        }
    }

    // Script finished; stay connected until told otherwise
    loop {
        match endpoint.command_rx.recv() {
            Ok(ProviderCommand::SetMicrophoneEnabled(_)) => {}
            Ok(ProviderCommand::Disconnect) => {
                let _ = endpoint.event_tx.send(ProviderEvent::Disconnected { reason: None });
                return;
            }
            Err(_) => return,
        }
    }
}

fn segment(
    connected_at: DateTime<Utc>,
    id: String,
    text: String,
    is_final: bool,
    received_offset_ms: Option<i64>,
) -> TranscriptSegment {
    let received = match received_offset_ms {
        Some(offset) => connected_at + ChronoDuration::milliseconds(offset),
        None => Utc::now(),
    };
    TranscriptSegment {
        id,
        text,
        first_received_time: received,
        is_final,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::SessionCredential;

    fn request() -> ConnectRequest {
        ConnectRequest {
            server_url: "ws://test".to_string(),
            credential: SessionCredential::new("token"),
            audio: true,
            video: false,
        }
    }

    fn next_event(handle: &SessionHandle) -> ProviderEvent {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if let Some(event) = handle.try_recv_event().unwrap() {
                return event;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("no provider event within timeout");
    }

    #[test]
    fn test_script_from_json() {
        let script = Script::from_json(
            r#"{"steps": [
                {"delay_ms": 10, "event": {"type": "state", "state": "listening"}},
                {"event": {"type": "user", "id": "u1", "text": "Hi", "final": true, "received_offset_ms": 3}},
                {"event": {"type": "disconnect", "reason": "room closed"}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(script.steps.len(), 3);
        assert_eq!(
            script.steps[0].event,
            ScriptEvent::State {
                state: AssistantState::Listening
            }
        );
        assert_eq!(script.steps[1].delay_ms, 0);
        assert!(Script::from_json("{ not json").is_err());
    }

    #[test]
    fn test_script_with_unknown_state_loads_as_idle() {
        let script = Script::from_json(
            r#"{"steps":[{"event":{"type":"state","state":"pre_connect_buffering"}}]}"#,
        )
        .unwrap();

        assert_eq!(
            script.steps[0].event,
            ScriptEvent::State {
                state: AssistantState::Idle
            }
        );
    }

    #[test]
    fn test_plays_script_in_order() {
        let provider = ScriptedProvider::new(Script::new(vec![
            ScriptStep {
                delay_ms: 0,
                event: ScriptEvent::State {
                    state: AssistantState::Speaking,
                },
            },
            ScriptStep {
                delay_ms: 5,
                event: ScriptEvent::Agent {
                    id: "a1".to_string(),
                    text: "Hello".to_string(),
                    is_final: true,
                    received_offset_ms: Some(5),
                },
            },
        ]));

        let handle = provider.connect(request()).unwrap();
        assert!(matches!(
            next_event(&handle),
            ProviderEvent::StateChanged(AssistantState::Speaking)
        ));
        match next_event(&handle) {
            ProviderEvent::AgentTranscription(segment) => {
                assert_eq!(segment.id, "a1");
                assert!(segment.is_final);
            }
            other => panic!("unexpected event: {:?}", other),
        }

        handle.send_command(ProviderCommand::Disconnect).unwrap();
        assert!(matches!(
            next_event(&handle),
            ProviderEvent::Disconnected { reason: None }
        ));

        let connections = provider.connections();
        assert_eq!(connections.len(), 1);
        assert_eq!(connections[0].server_url, "ws://test");
        assert!(!connections[0].video);
    }

    #[test]
    fn test_refusing_provider() {
        let provider = ScriptedProvider::refusing();
        assert!(matches!(
            provider.connect(request()),
            Err(SupportError::ProviderError(_))
        ));
        assert_eq!(provider.connect_count(), 0);
    }

    #[test]
    fn test_demo_script_is_well_formed() {
        let script = Script::demo();
        assert!(!script.steps.is_empty());
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(Script::from_json(&json).unwrap(), script);
    }
}
