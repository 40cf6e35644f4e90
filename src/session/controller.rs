//! Session lifecycle controller
//!
//! Owns the three-phase flow of the support widget:
//! collecting a name, awaiting a credential, and the connected session.
//! All inputs arrive on the UI thread, either as direct calls from widgets
//! or as events drained from channels in [`SessionController::poll_events`].

use super::provider::{ConnectRequest, ProviderCommand, ProviderEvent, SessionHandle, SessionProvider};
use super::state::{AssistantState, SessionPhase};
use crate::config::SupportConfig;
use crate::token::{
    validate_display_name, CredentialCommand, CredentialEvent, CredentialWorker, SessionCredential,
    TokenClient,
};
use crate::transcript::{Conversation, Message};
use crate::{Result, SupportError};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct SessionController {
    config: SupportConfig,
    provider: Arc<dyn SessionProvider>,

    credential_tx: Sender<CredentialCommand>,
    credential_rx: Receiver<CredentialEvent>,
    /// Set when this controller started its own credential worker
    owns_worker: bool,

    phase: SessionPhase,

    /// Text currently in the name field
    pub name_input: String,

    busy: bool,
    error: Option<String>,
    credential: Option<SessionCredential>,
    session: Option<SessionHandle>,

    /// Bumped for every credential request and every abandon; completions
    /// carrying an older generation are stale
    generation: u64,

    assistant_state: AssistantState,
    microphone_enabled: bool,
    conversation: Conversation,
    close_requested: bool,
}

impl SessionController {
    /// Create a controller around existing credential worker channels
    pub fn new(
        config: SupportConfig,
        credential_tx: Sender<CredentialCommand>,
        credential_rx: Receiver<CredentialEvent>,
        provider: Arc<dyn SessionProvider>,
    ) -> Self {
        Self {
            config,
            provider,
            credential_tx,
            credential_rx,
            owns_worker: false,
            phase: SessionPhase::CollectingName,
            name_input: String::new(),
            busy: false,
            error: None,
            credential: None,
            session: None,
            generation: 0,
            assistant_state: AssistantState::default(),
            microphone_enabled: true,
            conversation: Conversation::new(),
            close_requested: false,
        }
    }

    /// Create a controller and start a credential worker for `client`
    pub fn spawn(
        config: SupportConfig,
        client: Arc<dyn TokenClient>,
        provider: Arc<dyn SessionProvider>,
    ) -> Result<Self> {
        let worker = CredentialWorker::new(client);
        let credential_tx = worker.command_sender();
        let credential_rx = worker.event_receiver();
        worker.start_worker()?;

        let mut controller = Self::new(config, credential_tx, credential_rx, provider);
        controller.owns_worker = true;
        Ok(controller)
    }

    // === Accessors ===

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether a credential request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Inline error for the name form, if the last attempt failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn assistant_state(&self) -> AssistantState {
        self.assistant_state
    }

    pub fn microphone_enabled(&self) -> bool {
        self.microphone_enabled
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` once after the widget should be hidden
    pub fn take_close_request(&mut self) -> bool {
        std::mem::take(&mut self.close_requested)
    }

    // === Transitions ===

    /// Reset for a fresh widget mount
    pub fn open(&mut self) {
        if self.phase.is_connected() {
            self.on_disconnected(None);
        }
        if self.phase.is_awaiting_credential() {
            self.abandon_request();
        }

        self.name_input.clear();
        self.error = None;
        self.conversation.clear();
        self.close_requested = false;
        debug!("Support widget opened");
    }

    /// Submit the text currently in the name field
    pub fn submit_current_name(&mut self) -> Result<()> {
        let name = self.name_input.clone();
        self.submit_name(&name)
    }

    /// Request a credential for `name` and wait for it.
    ///
    /// Blank names are rejected without any state change or request.
    pub fn submit_name(&mut self, name: &str) -> Result<()> {
        if !self.phase.is_collecting_name() {
            return Err(self.invalid_phase("submit_name"));
        }

        let display_name = validate_display_name(name)?.to_string();

        let generation = self.generation + 1;
        self.credential_tx
            .send(CredentialCommand::Request {
                display_name,
                generation,
            })
            .map_err(|e| {
                SupportError::ChannelError(format!("Failed to request credential: {}", e))
            })?;

        self.generation = generation;
        self.phase = SessionPhase::AwaitingCredential;
        self.busy = true;
        self.error = None;
        info!("Requesting session credential (#{})", generation);
        Ok(())
    }

    /// Store the credential and mount the live session
    pub fn on_credential_received(&mut self, credential: SessionCredential) -> Result<()> {
        if !self.phase.is_awaiting_credential() {
            return Err(self.invalid_phase("on_credential_received"));
        }

        self.busy = false;

        let request = ConnectRequest {
            server_url: self.config.server_url.clone(),
            credential: credential.clone(),
            audio: true,
            video: false,
        };

        match self.provider.connect(request) {
            Ok(handle) => {
                self.credential = Some(credential);
                self.session = Some(handle);
                self.phase = SessionPhase::Connected;
                self.assistant_state = AssistantState::Connecting;
                self.microphone_enabled = true;
                self.conversation.clear();
                info!("Voice session connected to {}", self.config.server_url);
                Ok(())
            }
            Err(e) => {
                warn!("Voice session failed to connect: {}", e);
                self.phase = SessionPhase::CollectingName;
                self.error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Return to name entry with an inline error; the typed name is kept
    pub fn on_credential_failed(&mut self, error: SupportError) -> Result<()> {
        if !self.phase.is_awaiting_credential() {
            return Err(self.invalid_phase("on_credential_failed"));
        }

        warn!("Credential request failed: {}", error);
        self.busy = false;
        self.phase = SessionPhase::CollectingName;
        self.error = Some(error.user_message());
        Ok(())
    }

    /// Tear down the live session and go back to name entry.
    ///
    /// A no-op unless connected, so repeated disconnect signals are harmless.
    pub fn on_disconnected(&mut self, reason: Option<String>) {
        if !self.phase.is_connected() {
            debug!("Ignoring disconnect in phase {}", self.phase);
            return;
        }

        match &reason {
            Some(reason) => warn!("Voice session disconnected: {}", reason),
            None => info!("Voice session ended"),
        }

        self.session = None;
        self.credential = None;
        self.conversation.clear();
        self.assistant_state = AssistantState::default();
        self.microphone_enabled = true;
        self.phase = SessionPhase::CollectingName;
        self.close_requested = true;
    }

    /// End the call from the UI
    pub fn disconnect(&mut self) {
        if let Some(session) = &self.session {
            if let Err(e) = session.send_command(ProviderCommand::Disconnect) {
                debug!("Provider already gone: {}", e);
            }
        }
        self.on_disconnected(None);
    }

    /// Leave the widget before a session is connected
    pub fn cancel(&mut self) -> Result<()> {
        match self.phase {
            SessionPhase::CollectingName => {}
            SessionPhase::AwaitingCredential => self.abandon_request(),
            SessionPhase::Connected => return Err(self.invalid_phase("cancel")),
        }
        self.close_requested = true;
        Ok(())
    }

    /// Close button: cancel before connecting, end the call afterwards
    pub fn close(&mut self) {
        if self.phase.is_connected() {
            self.disconnect();
        } else if let Err(e) = self.cancel() {
            debug!("Close ignored: {}", e);
        }
    }

    pub fn set_microphone_enabled(&mut self, enabled: bool) -> Result<()> {
        let session = match &self.session {
            Some(session) if self.phase.is_connected() => session,
            _ => return Err(self.invalid_phase("set_microphone_enabled")),
        };

        session.send_command(ProviderCommand::SetMicrophoneEnabled(enabled))?;
        self.microphone_enabled = enabled;
        debug!("Microphone enabled: {}", enabled);
        Ok(())
    }

    /// Drain credential and provider events, then rebuild the conversation
    pub fn poll_events(&mut self) {
        self.poll_credential_events();
        self.poll_session_events();
        self.conversation.refresh();
    }

    fn poll_credential_events(&mut self) {
        while let Ok(event) = self.credential_rx.try_recv() {
            if let Some(generation) = event.generation() {
                if generation != self.generation || !self.phase.is_awaiting_credential() {
                    debug!("Discarding stale credential response #{}", generation);
                    continue;
                }
            }

            let result = match event {
                CredentialEvent::Issued { credential, .. } => {
                    self.on_credential_received(credential)
                }
                CredentialEvent::Failed { error, .. } => self.on_credential_failed(error),
                CredentialEvent::Shutdown => {
                    if self.phase.is_awaiting_credential() {
                        self.on_credential_failed(SupportError::ChannelError(
                            "credential worker stopped".to_string(),
                        ))
                    } else {
                        Ok(())
                    }
                }
            };

            if let Err(e) = result {
                debug!("Credential event not applied: {}", e);
            }
        }
    }

    fn poll_session_events(&mut self) {
        loop {
            let next = match &self.session {
                Some(session) => session.try_recv_event(),
                None => return,
            };

            match next {
                Ok(Some(event)) => self.apply_provider_event(event),
                Ok(None) => return,
                Err(e) => {
                    self.on_disconnected(Some(e.to_string()));
                    return;
                }
            }
        }
    }

    fn apply_provider_event(&mut self, event: ProviderEvent) {
        match event {
            ProviderEvent::StateChanged(state) => {
                debug!("Assistant state: {}", state);
                self.assistant_state = state;
            }
            ProviderEvent::AgentTranscription(segment) => {
                self.conversation.apply_agent(segment);
            }
            ProviderEvent::UserTranscription(segment) => {
                self.conversation.apply_user(segment);
            }
            ProviderEvent::Disconnected { reason } => self.on_disconnected(reason),
        }
    }

    /// Forget the in-flight request; its completion will be discarded
    fn abandon_request(&mut self) {
        self.generation += 1;
        self.busy = false;
        self.phase = SessionPhase::CollectingName;
        debug!("Abandoned credential request, now at #{}", self.generation);
    }

    fn invalid_phase(&self, operation: &'static str) -> SupportError {
        SupportError::InvalidPhase {
            phase: self.phase,
            operation,
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.send_command(ProviderCommand::Disconnect);
        }
        if self.owns_worker {
            let _ = self.credential_tx.send(CredentialCommand::Shutdown);
        }
    }
}
