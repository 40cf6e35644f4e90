//! Assistant audio visualizer
//!
//! A row of bars animated according to the assistant's turn state. Audio
//! levels stay inside the session provider, so the bars follow the state
//! rather than the signal.

use crate::session::AssistantState;
use crate::ui::theme::Theme;
use egui::{Pos2, Rect, Vec2};

const BAR_AREA_HEIGHT: f32 = 64.0;

pub struct Visualizer<'a> {
    state: AssistantState,
    theme: &'a Theme,
    bar_count: usize,
}

impl<'a> Visualizer<'a> {
    pub fn new(state: AssistantState, theme: &'a Theme) -> Self {
        Self {
            state,
            theme,
            bar_count: 12,
        }
    }

    pub fn bar_count(mut self, bar_count: usize) -> Self {
        self.bar_count = bar_count.max(1);
        self
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let desired_size = Vec2::new(ui.available_width(), BAR_AREA_HEIGHT);
        let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::hover());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, self.theme.card_rounding, self.theme.bg_secondary);

            let time = ui.ctx().input(|i| i.time);
            let draw_rect = rect.shrink(8.0);
            let bar_width = draw_rect.width() / self.bar_count as f32;
            let max_height = draw_rect.height();
            let color = if self.state.is_active() {
                self.theme.bar_active
            } else {
                self.theme.bar_inactive
            };

            for i in 0..self.bar_count {
                let level = bar_level(self.state, i, self.bar_count, time);
                let bar_height = (level * max_height).clamp(4.0, max_height);
                let x = draw_rect.left() + i as f32 * bar_width + bar_width / 2.0;

                let bar_rect = Rect::from_center_size(
                    Pos2::new(x, draw_rect.center().y),
                    Vec2::new((bar_width * 0.6).max(2.0), bar_height),
                );
                painter.rect_filled(bar_rect, 2.0, color);
            }
        }

        if self.state.is_active() {
            ui.ctx().request_repaint();
        }

        response
    }
}

/// Normalized height (0.0 to 1.0) of bar `index` at `time`
fn bar_level(state: AssistantState, index: usize, bar_count: usize, time: f64) -> f32 {
    let phase = index as f64 / bar_count as f64 * std::f64::consts::TAU;
    match state {
        AssistantState::Speaking => (0.55 + 0.45 * (time * 9.0 + phase * 2.0).sin()) as f32,
        AssistantState::Listening => (0.25 + 0.15 * (time * 3.0 + phase).sin()) as f32,
        AssistantState::Thinking => {
            // A highlight sweeping across the bars
            let position = (time * 1.5).fract() * bar_count as f64;
            let distance = (index as f64 - position).abs();
            (0.15 + 0.5 * (1.0 - (distance / 2.0).min(1.0))) as f32
        }
        _ => 0.1,
    }
}
