//! Voice session lifecycle
//!
//! The controller owns the name → credential → connected flow. The live
//! media session itself sits behind the [`SessionProvider`] trait.

pub mod controller;
pub mod provider;
pub mod scripted;
pub mod state;

pub use controller::SessionController;
pub use provider::{ConnectRequest, ProviderCommand, ProviderEvent, SessionHandle, SessionProvider};
pub use scripted::{Script, ScriptStep, ScriptedProvider};
pub use state::{AssistantState, SessionPhase};
