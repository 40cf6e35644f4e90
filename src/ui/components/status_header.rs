//! Status header component
//!
//! Shows the turn-state icon and status text for the live session.

use crate::session::AssistantState;
use crate::ui::status::{present, StatusIcon};
use crate::ui::theme::Theme;
use egui::{self, Color32, RichText};

/// Status header for the live session
pub struct StatusHeader<'a> {
    state: AssistantState,
    theme: &'a Theme,
}

impl<'a> StatusHeader<'a> {
    pub fn new(state: AssistantState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }

    /// Show the status header
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let status = present(self.state);
        let time = ui.ctx().input(|i| i.time);

        let response = egui::Frame::none()
            .fill(self.theme.bg_secondary)
            .rounding(self.theme.card_rounding)
            .inner_margin(self.theme.spacing_sm)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(status.icon.glyph())
                            .size(self.icon_size(status.icon, time))
                            .color(self.icon_color(status.icon, time)),
                    );
                    ui.label(
                        RichText::new(status.text)
                            .size(15.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                });
            })
            .response;

        if status.icon.is_animated() {
            ui.ctx().request_repaint();
        }

        response
    }

    fn icon_color(&self, icon: StatusIcon, time: f64) -> Color32 {
        match icon {
            StatusIcon::Microphone => {
                // Pulse between full and dimmed green
                let pulse = ((time * 3.0).sin() * 0.5 + 0.5) as f32;
                self.theme.success.gamma_multiply(0.6 + 0.4 * pulse)
            }
            StatusIcon::Spinner => self.theme.warning,
            StatusIcon::Assistant => self.theme.speaking,
            StatusIcon::MicrophoneOff => self.theme.text_muted,
        }
    }

    fn icon_size(&self, icon: StatusIcon, time: f64) -> f32 {
        match icon {
            // Bounce
            StatusIcon::Assistant => 20.0 + ((time * 4.0).sin().abs() * 3.0) as f32,
            _ => 20.0,
        }
    }
}
