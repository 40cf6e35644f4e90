//! Control bar component
//!
//! Microphone toggle and end-call button for the live session.

use crate::session::SessionController;
use crate::ui::theme::Theme;
use egui::{self, RichText, Vec2};
use tracing::warn;

pub struct ControlBar<'a> {
    controller: &'a mut SessionController,
    theme: &'a Theme,
}

impl<'a> ControlBar<'a> {
    pub fn new(controller: &'a mut SessionController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let microphone_enabled = self.controller.microphone_enabled();

        ui.horizontal(|ui| {
            let (label, color) = if microphone_enabled {
                ("🎤 Mute", self.theme.text_primary)
            } else {
                ("🔇 Unmute", self.theme.warning)
            };

            let mic_button = egui::Button::new(RichText::new(label).color(color))
                .min_size(Vec2::new(110.0, 36.0))
                .rounding(self.theme.button_rounding);

            if ui.add(mic_button).clicked() {
                if let Err(e) = self.controller.set_microphone_enabled(!microphone_enabled) {
                    warn!("Microphone toggle failed: {}", e);
                }
            }

            let end_button = egui::Button::new(RichText::new("End Call").color(egui::Color32::WHITE))
                .min_size(Vec2::new(110.0, 36.0))
                .rounding(self.theme.button_rounding)
                .fill(self.theme.error);

            if ui.add(end_button).clicked() {
                self.controller.disconnect();
            }
        });
    }
}
