//! Session credential acquisition
//!
//! The token client mints a short-lived credential for a display name. The
//! credential worker runs it off the UI thread.

pub mod client;
pub mod worker;

pub use client::{validate_display_name, HttpTokenClient, SessionCredential, TokenClient};
pub use worker::{CredentialCommand, CredentialEvent, CredentialWorker};
