//! Screen theme and styling
//!
//! Light theme with the two accent colors of the capture triggers.

use egui::{Color32, FontFamily, FontId, Rounding, Stroke, TextStyle, Visuals};

/// Color palette
pub struct ThemeColors;

impl ThemeColors {
    // Background colors
    pub const BG: Color32 = Color32::from_rgb(245, 252, 255);
    pub const BG_CARD: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BG_MUTED: Color32 = Color32::from_rgb(128, 128, 128);

    // Trigger colors
    pub const CAMERA: Color32 = Color32::from_rgb(241, 148, 255);
    pub const GALLERY: Color32 = Color32::from_rgb(33, 150, 243);

    // Accent colors
    pub const ACCENT_PRIMARY: Color32 = Color32::from_rgb(33, 150, 243);
    pub const ACCENT_ERROR: Color32 = Color32::from_rgb(231, 76, 60);

    // Text colors
    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(33, 33, 33);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(51, 51, 51);
    pub const TEXT_ON_ACCENT: Color32 = Color32::WHITE;

    pub const BORDER: Color32 = Color32::from_rgb(210, 220, 230);
    pub const TRACK: Color32 = Color32::from_rgb(225, 232, 240);
}

/// Apply the theme to egui
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let mut visuals = Visuals::light();
    visuals.window_fill = ThemeColors::BG_CARD;
    visuals.panel_fill = ThemeColors::BG;
    visuals.window_rounding = Rounding::same(12.0);
    visuals.window_stroke = Stroke::new(1.0, ThemeColors::BORDER);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, ThemeColors::TEXT_SECONDARY);
    visuals.widgets.inactive.rounding = Rounding::same(8.0);
    visuals.widgets.hovered.rounding = Rounding::same(8.0);
    visuals.widgets.active.rounding = Rounding::same(8.0);
    visuals.selection.bg_fill = color_with_alpha(ThemeColors::ACCENT_PRIMARY, 77);
    visuals.selection.stroke = Stroke::new(1.0, ThemeColors::ACCENT_PRIMARY);
    style.visuals = visuals;

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);

    style.text_styles = [
        (TextStyle::Small, FontId::new(13.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(17.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(15.0, FontFamily::Monospace)),
        (TextStyle::Button, FontId::new(18.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(24.0, FontFamily::Proportional)),
    ]
    .into();

    ctx.set_style(style);
}

/// Helper to create a color with modified alpha
pub fn color_with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Parse `#RRGGBB` (or `RRGGBB`) into a color
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
