//! Background credential worker
//!
//! Runs token requests on a dedicated thread with its own tokio runtime so
//! the UI loop only ever touches channels.

use super::client::{SessionCredential, TokenClient};
use crate::{Result, SupportError};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tokio::runtime::Runtime;
use tracing::{debug, error, info};

/// Commands accepted by the credential worker
#[derive(Debug, Clone)]
pub enum CredentialCommand {
    /// Mint a credential for a display name
    Request { display_name: String, generation: u64 },

    /// Stop the worker
    Shutdown,
}

/// Events emitted by the credential worker
#[derive(Debug, Clone)]
pub enum CredentialEvent {
    /// The endpoint issued a credential
    Issued {
        credential: SessionCredential,
        generation: u64,
    },

    /// The request failed
    Failed { error: SupportError, generation: u64 },

    /// Worker has stopped
    Shutdown,
}

impl CredentialEvent {
    /// Generation of the request this event answers
    pub fn generation(&self) -> Option<u64> {
        match self {
            CredentialEvent::Issued { generation, .. } => Some(*generation),
            CredentialEvent::Failed { generation, .. } => Some(*generation),
            CredentialEvent::Shutdown => None,
        }
    }
}

/// Credential worker
pub struct CredentialWorker {
    client: Arc<dyn TokenClient>,
    command_tx: Sender<CredentialCommand>,
    command_rx: Receiver<CredentialCommand>,
    event_tx: Sender<CredentialEvent>,
    event_rx: Receiver<CredentialEvent>,
}

impl CredentialWorker {
    pub fn new(client: Arc<dyn TokenClient>) -> Self {
        let (command_tx, command_rx) = bounded(16);
        let (event_tx, event_rx) = bounded(16);

        Self {
            client,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for commands
    pub fn command_sender(&self) -> Sender<CredentialCommand> {
        self.command_tx.clone()
    }

    /// Get a receiver for events
    pub fn event_receiver(&self) -> Receiver<CredentialEvent> {
        self.event_rx.clone()
    }

    /// Start the worker thread
    ///
    /// Each request runs as its own task, so an abandoned slow request never
    /// delays a newer one.
    pub fn start_worker(self) -> Result<JoinHandle<()>> {
        let client = self.client;
        let command_rx = self.command_rx;
        let event_tx = self.event_tx;

        let handle = thread::Builder::new()
            .name("credential-worker".to_string())
            .spawn(move || {
                info!("Credential worker starting");

                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        let _ = event_tx.send(CredentialEvent::Shutdown);
                        return;
                    }
                };

                loop {
                    match command_rx.recv() {
                        Ok(CredentialCommand::Request {
                            display_name,
                            generation,
                        }) => {
                            debug!("Credential request #{}", generation);
                            let client = Arc::clone(&client);
                            let event_tx = event_tx.clone();

                            runtime.spawn(async move {
                                let event = match client.request_credential(&display_name).await {
                                    Ok(credential) => CredentialEvent::Issued {
                                        credential,
                                        generation,
                                    },
                                    Err(error) => CredentialEvent::Failed { error, generation },
                                };
                                if event_tx.send(event).is_err() {
                                    debug!("Credential #{} finished after receiver closed", generation);
                                }
                            });
                        }
                        Ok(CredentialCommand::Shutdown) | Err(_) => {
                            info!("Credential worker shutting down");
                            break;
                        }
                    }
                }

                runtime.shutdown_background();
                let _ = event_tx.send(CredentialEvent::Shutdown);
            })?;

        Ok(handle)
    }
}
