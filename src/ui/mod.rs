//! User interface for the support widget
//!
//! This module provides the egui/eframe host window and the support modal.

mod app;
pub mod components;
pub mod status;
mod theme;

pub use app::SupportApp;
pub use components::{ControlBar, ConversationScroll, ConversationView, NameForm, StatusHeader, Visualizer};
pub use status::{present, StatusIcon, TurnStatus};
pub use theme::Theme;

use crate::config::SupportConfig;
use crate::session::SessionController;

/// Run the support application
pub fn run(config: SupportConfig, controller: SessionController) -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([520.0, 680.0])
            .with_title("Bella Vista Restaurant"),
        ..Default::default()
    };

    eframe::run_native(
        "Restaurant Support",
        options,
        Box::new(move |cc| Ok(Box::new(SupportApp::new(cc, config, controller)))),
    )
}
