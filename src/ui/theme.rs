//! Theme and styling for the support widget
//!
//! Warm restaurant palette: amber accents on a dark slate background.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    /// Success color (green)
    pub success: Color32,
    /// Warning color (amber)
    pub warning: Color32,
    /// Error color (red)
    pub error: Color32,
    /// Speaking indicator color (blue)
    pub speaking: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Message bubble colors
    pub user_bubble: Color32,
    pub agent_bubble: Color32,

    /// Visualizer colors
    pub bar_active: Color32,
    pub bar_inactive: Color32,

    /// Border radius for buttons
    pub button_rounding: Rounding,
    /// Border radius for cards/panels
    pub card_rounding: Rounding,
    /// Border radius for message bubbles
    pub bubble_rounding: Rounding,

    /// Standard spacing
    pub spacing: f32,
    /// Large spacing
    pub spacing_lg: f32,
    /// Small spacing
    pub spacing_sm: f32,
}

impl Theme {
    /// Create a dark theme
    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(217, 119, 6),   // Amber
            success: Color32::from_rgb(34, 197, 94),   // Green
            warning: Color32::from_rgb(245, 158, 11),  // Amber
            error: Color32::from_rgb(239, 68, 68),     // Red
            speaking: Color32::from_rgb(59, 130, 246), // Blue

            bg_primary: Color32::from_rgb(28, 25, 23),   // Stone
            bg_secondary: Color32::from_rgb(41, 37, 36), // Lighter stone
            bg_tertiary: Color32::from_rgb(68, 64, 60),

            text_primary: Color32::from_rgb(250, 250, 249),
            text_secondary: Color32::from_rgb(214, 211, 209),
            text_muted: Color32::from_rgb(168, 162, 158),

            user_bubble: Color32::from_rgb(180, 83, 9),
            agent_bubble: Color32::from_rgb(68, 64, 60),

            bar_active: Color32::from_rgb(251, 191, 36),
            bar_inactive: Color32::from_rgb(87, 83, 78),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),
            bubble_rounding: Rounding::same(14.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Install the palette and spacing into `ctx`
    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::new(self.spacing_sm, self.spacing_sm * 0.75);
        style.spacing.window_margin = egui::Margin::same(self.spacing_lg);
        style.spacing.button_padding = Vec2::new(self.spacing * 0.75, self.spacing_sm * 0.75);

        for (text_style, size) in [
            (egui::TextStyle::Heading, 22.0),
            (egui::TextStyle::Body, 14.0),
            (egui::TextStyle::Button, 14.0),
            (egui::TextStyle::Small, 12.0),
        ] {
            style
                .text_styles
                .insert(text_style, FontId::new(size, FontFamily::Proportional));
        }

        ctx.set_style(style);
    }

    fn visuals(&self) -> Visuals {
        let mut visuals = Visuals::dark();
        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_tertiary;
        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.primary.gamma_multiply(0.4));

        let widgets = &mut visuals.widgets;
        widgets.noninteractive.bg_fill = self.bg_secondary;
        widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_muted);
        widgets.inactive.bg_fill = self.bg_tertiary;
        widgets.inactive.weak_bg_fill = self.bg_tertiary;
        widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        widgets.hovered.weak_bg_fill = self.primary.gamma_multiply(0.6);
        widgets.hovered.fg_stroke = Stroke::new(1.0, self.text_primary);
        widgets.active.weak_bg_fill = self.primary;
        widgets.active.fg_stroke = Stroke::new(1.0, self.text_primary);

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, self.bar_active);
        visuals
    }
}
