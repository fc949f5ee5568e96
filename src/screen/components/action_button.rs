//! Large rounded trigger button

use egui::{Button, Color32, Response, RichText, Rounding, Ui, Vec2};

use crate::screen::theme::ThemeColors;

/// Add a filled, rounded button that is greyed out when `enabled` is false
pub fn action_button(
    ui: &mut Ui,
    label: &str,
    fill: Color32,
    size: Vec2,
    text_size: f32,
    enabled: bool,
) -> Response {
    let button = Button::new(
        RichText::new(label)
            .size(text_size)
            .color(ThemeColors::TEXT_ON_ACCENT),
    )
    .fill(fill)
    .rounding(Rounding::same(size.y.min(60.0) / 2.0))
    .min_size(size);

    ui.add_enabled(enabled, button)
}
