//! Name form component
//!
//! Collects the customer's display name before a session is started.

use crate::session::SessionController;
use crate::ui::theme::Theme;
use egui::{self, Key, RichText, Vec2};
use tracing::debug;

/// Name entry form shown before the session connects
pub struct NameForm<'a> {
    controller: &'a mut SessionController,
    theme: &'a Theme,
}

impl<'a> NameForm<'a> {
    pub fn new(controller: &'a mut SessionController, theme: &'a Theme) -> Self {
        Self { controller, theme }
    }

    pub fn show(mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing);
            ui.label(RichText::new("🍴").size(36.0));
            ui.label(
                RichText::new("Welcome to Our Restaurant")
                    .size(20.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.label(
                RichText::new(
                    "Connect with our AI assistant for reservations, menu questions, and support",
                )
                .size(13.0)
                .color(self.theme.text_muted),
            );
            ui.add_space(self.theme.spacing_lg);

            self.show_name_input(ui);

            if let Some(error) = self.controller.error() {
                ui.add_space(self.theme.spacing_sm);
                ui.label(RichText::new(error).size(13.0).color(self.theme.error));
            }

            ui.add_space(self.theme.spacing);
            self.show_buttons(ui);
        });
    }

    fn show_name_input(&mut self, ui: &mut egui::Ui) {
        let busy = self.controller.is_busy();

        let text_edit = egui::TextEdit::singleline(&mut self.controller.name_input)
            .hint_text("Enter your name")
            .desired_width(280.0)
            .margin(egui::Margin::symmetric(12.0, 8.0))
            .id(egui::Id::new("support_name_input"));

        let response = ui.add_enabled(!busy, text_edit);
        response.widget_info(|| {
            egui::WidgetInfo::labeled(egui::WidgetType::TextEdit, !busy, "Your name")
        });

        if response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter)) {
            self.submit();
        }
    }

    fn show_buttons(&mut self, ui: &mut egui::Ui) {
        let busy = self.controller.is_busy();
        let can_submit = !busy && !self.controller.name_input.trim().is_empty();

        ui.horizontal(|ui| {
            // Center the two buttons
            let total_width = 2.0 * 170.0 + self.theme.spacing_sm;
            ui.add_space(((ui.available_width() - total_width) / 2.0).max(0.0));

            let label = if busy { "Connecting..." } else { "Start Conversation" };
            let submit = egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                .min_size(Vec2::new(170.0, 40.0))
                .rounding(self.theme.button_rounding)
                .fill(if can_submit {
                    self.theme.primary
                } else {
                    self.theme.bg_tertiary
                });

            if busy {
                ui.ctx().request_repaint();
            }

            if ui.add_enabled(can_submit, submit).clicked() {
                self.submit();
            }

            let cancel = egui::Button::new("Cancel")
                .min_size(Vec2::new(170.0, 40.0))
                .rounding(self.theme.button_rounding);

            if ui.add(cancel).clicked() {
                self.controller.close();
            }
        });
    }

    fn submit(&mut self) {
        if let Err(e) = self.controller.submit_current_name() {
            debug!("Name not submitted: {}", e);
        }
    }
}
