//! Main application struct and eframe integration
//!
//! This module contains the SupportApp that implements eframe::App: the
//! restaurant host window and the support modal on top of it.

use crate::config::SupportConfig;
use crate::session::{SessionController, SessionPhase};
use crate::ui::components::{ControlBar, ConversationScroll, ConversationView, NameForm, StatusHeader, Visualizer};
use crate::ui::theme::Theme;
use egui::{self, Align, CentralPanel, RichText, TopBottomPanel, Vec2};
use std::time::Duration;
use tracing::info;

/// How often channels are polled while the widget is open
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Main support application
pub struct SupportApp {
    controller: SessionController,
    config: SupportConfig,
    theme: Theme,
    /// Whether the support modal is visible
    show_support: bool,
    scroll: ConversationScroll,
}

impl SupportApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SupportConfig,
        controller: SessionController,
    ) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        Self {
            scroll: ConversationScroll::new(config.scroll_settle_delay),
            controller,
            config,
            theme,
            show_support: false,
        }
    }

    fn open_support(&mut self) {
        if self.show_support {
            return;
        }
        info!("Support widget opened");
        self.controller.open();
        self.scroll.reset();
        self.show_support = true;
    }

    /// Show the top header bar
    fn show_header(&mut self, ctx: &egui::Context) {
        TopBottomPanel::top("header")
            .frame(egui::Frame::none().fill(self.theme.bg_secondary).inner_margin(12.0))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("👨‍🍳").size(24.0));
                    ui.vertical(|ui| {
                        ui.label(
                            RichText::new("Bella Vista Restaurant")
                                .size(20.0)
                                .strong()
                                .color(self.theme.text_primary),
                        );
                        ui.label(
                            RichText::new("Authentic Italian Cuisine")
                                .size(12.0)
                                .color(self.theme.text_muted),
                        );
                    });

                    ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                        let button = egui::Button::new(
                            RichText::new("💬 Get Support").color(egui::Color32::WHITE),
                        )
                        .rounding(self.theme.button_rounding)
                        .fill(self.theme.primary);

                        if ui.add(button).clicked() {
                            self.open_support();
                        }
                    });
                });
            });
    }

    /// Show the landing content behind the modal
    fn show_content(&mut self, ctx: &egui::Context) {
        CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.bg_primary).inner_margin(self.theme.spacing_lg))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(60.0);
                    ui.label(
                        RichText::new("Welcome to Bella Vista")
                            .size(32.0)
                            .strong()
                            .color(self.theme.text_primary),
                    );
                    ui.add_space(self.theme.spacing);
                    ui.label(
                        RichText::new(
                            "Our AI-powered customer support is here to help with reservations, \
                             menu questions, and special requests.",
                        )
                        .size(15.0)
                        .color(self.theme.text_secondary),
                    );
                    ui.add_space(self.theme.spacing_lg);

                    let button = egui::Button::new(
                        RichText::new("Talk to Our AI Assistant").color(egui::Color32::WHITE),
                    )
                    .min_size(Vec2::new(220.0, 44.0))
                    .rounding(self.theme.button_rounding)
                    .fill(self.theme.primary);

                    if ui.add(button).clicked() {
                        self.open_support();
                    }
                });
            });
    }

    /// Show the support modal
    fn show_support_modal(&mut self, ctx: &egui::Context) {
        if !self.show_support {
            return;
        }

        egui::Window::new("Restaurant Support")
            .title_bar(false)
            .collapsible(false)
            .resizable(false)
            .fixed_size(Vec2::new(460.0, 620.0))
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                self.show_modal_header(ui);
                ui.separator();

                match self.controller.phase() {
                    SessionPhase::CollectingName | SessionPhase::AwaitingCredential => {
                        self.scroll.reset();
                        NameForm::new(&mut self.controller, &self.theme).show(ui);
                    }
                    SessionPhase::Connected => self.show_session(ui),
                }
            });
    }

    fn show_modal_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("👨‍🍳").size(22.0));
            ui.vertical(|ui| {
                ui.label(
                    RichText::new("Restaurant Support")
                        .size(18.0)
                        .strong()
                        .color(self.theme.text_primary),
                );
                ui.label(
                    RichText::new("How can we help you today?")
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            });

            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                let close = ui.button("✕");
                close.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Close support")
                });
                if close.clicked() {
                    self.controller.close();
                }
            });
        });
    }

    fn show_session(&mut self, ui: &mut egui::Ui) {
        let state = self.controller.assistant_state();

        StatusHeader::new(state, &self.theme).show(ui);
        ui.add_space(self.theme.spacing_sm);

        Visualizer::new(state, &self.theme)
            .bar_count(self.config.visualizer_bars)
            .show(ui);
        ui.add_space(self.theme.spacing_sm);

        ControlBar::new(&mut self.controller, &self.theme).show(ui);
        ui.add_space(self.theme.spacing_sm);

        let conversation = self.controller.conversation();
        ConversationView::new(
            conversation.messages(),
            conversation.version(),
            &mut self.scroll,
            &self.theme,
        )
        .show(ui);
    }
}

impl eframe::App for SupportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll_events();

        if self.controller.take_close_request() {
            info!("Support widget closed");
            self.show_support = false;
            self.scroll.reset();
        }

        self.show_header(ctx);
        self.show_content(ctx);
        self.show_support_modal(ctx);

        // Keep draining channels while a request or session is live
        if self.show_support {
            ctx.request_repaint_after(POLL_INTERVAL);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.close();
        info!("Support app shutting down");
    }
}
