//! Conversation view component
//!
//! Displays the merged transcript of both speakers, newest at the bottom.

use crate::transcript::{Message, Speaker};
use crate::ui::theme::Theme;
use crate::utils::Debounce;
use egui::{self, Align, RichText, Sense, Vec2};
use std::time::{Duration, Instant};

pub const EMPTY_PLACEHOLDER: &str =
    "Start speaking to begin your conversation with our restaurant assistant";

/// "1 message", "3 messages"
pub fn count_label(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}

/// Auto-scroll bookkeeping that outlives a single frame
///
/// Scrolls once when the view is first shown, then once per settled burst
/// of conversation changes.
#[derive(Debug, Clone)]
pub struct ConversationScroll {
    debounce: Debounce,
    seen_version: Option<u64>,
}

impl ConversationScroll {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            debounce: Debounce::new(settle_delay),
            seen_version: None,
        }
    }

    /// Feed the current conversation version; returns `true` when the view
    /// should scroll to the newest message this frame
    pub fn update(&mut self, version: u64, now: Instant) -> bool {
        match self.seen_version {
            None => {
                self.seen_version = Some(version);
                self.debounce.cancel();
                return true;
            }
            Some(seen) if seen != version => {
                self.seen_version = Some(version);
                self.debounce.schedule(now);
            }
            Some(_) => {}
        }
        self.debounce.poll(now)
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }

    /// Forget the mount, so the next show scrolls immediately
    pub fn reset(&mut self) {
        self.seen_version = None;
        self.debounce.cancel();
    }
}

impl Default for ConversationScroll {
    fn default() -> Self {
        Self::new(Duration::from_millis(100))
    }
}

/// Conversation view component
pub struct ConversationView<'a> {
    messages: &'a [Message],
    version: u64,
    scroll: &'a mut ConversationScroll,
    theme: &'a Theme,
}

impl<'a> ConversationView<'a> {
    pub fn new(
        messages: &'a [Message],
        version: u64,
        scroll: &'a mut ConversationScroll,
        theme: &'a Theme,
    ) -> Self {
        Self {
            messages,
            version,
            scroll,
            theme,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) {
        let now = Instant::now();
        let scroll_now = self.scroll.update(self.version, now);
        if let Some(remaining) = self.scroll.remaining(now) {
            ui.ctx().request_repaint_after(remaining);
        }

        ui.horizontal(|ui| {
            ui.label(
                RichText::new("Conversation")
                    .size(16.0)
                    .strong()
                    .color(self.theme.text_primary),
            );
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(count_label(self.messages.len()))
                        .size(12.0)
                        .color(self.theme.text_muted),
                );
            });
        });

        ui.add_space(self.theme.spacing_sm);

        egui::ScrollArea::vertical()
            .id_salt("conversation_messages")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if self.messages.is_empty() {
                    self.show_empty_state(ui);
                } else {
                    for message in self.messages {
                        self.show_message(ui, message);
                        ui.add_space(self.theme.spacing_sm);
                    }
                }

                // End marker the view scrolls to
                let end = ui.allocate_response(Vec2::new(1.0, 1.0), Sense::hover());
                if scroll_now {
                    end.scroll_to_me(Some(Align::BOTTOM));
                }
            });
    }

    fn show_empty_state(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(self.theme.spacing_lg);
            ui.label(RichText::new("🤖").size(40.0).color(self.theme.warning));
            ui.add_space(self.theme.spacing_sm);
            ui.label(
                RichText::new(EMPTY_PLACEHOLDER)
                    .size(13.0)
                    .color(self.theme.text_muted),
            );
        });
    }

    fn show_message(&self, ui: &mut egui::Ui, message: &Message) {
        let is_user = message.speaker == Speaker::User;
        let (bubble_color, avatar) = if is_user {
            (self.theme.user_bubble, "👤")
        } else {
            (self.theme.agent_bubble, "🤖")
        };

        // Assistant on the left, customer on the right
        let align = if is_user { Align::RIGHT } else { Align::LEFT };

        ui.with_layout(egui::Layout::top_down(align), |ui| {
            ui.label(
                RichText::new(format!("{} {}", avatar, message.speaker.display_name()))
                    .size(12.0)
                    .color(self.theme.text_muted),
            );

            let max_width = ui.available_width() * 0.8;

            egui::Frame::none()
                .fill(bubble_color)
                .rounding(self.theme.bubble_rounding)
                .inner_margin(egui::Margin::symmetric(12.0, 8.0))
                .show(ui, |ui| {
                    ui.set_max_width(max_width);
                    let text = RichText::new(&message.text).color(self.theme.text_primary);
                    // Interim transcription
                    let text = if message.is_final { text } else { text.italics() };
                    ui.label(text);
                });
        });
    }
}
