//! UI components module
//!
//! Widgets used inside the support modal.

pub mod control_bar;
pub mod conversation;
pub mod name_form;
pub mod status_header;
pub mod visualizer;

pub use control_bar::ControlBar;
pub use conversation::{ConversationScroll, ConversationView};
pub use name_form::NameForm;
pub use status_header::StatusHeader;
pub use visualizer::Visualizer;
