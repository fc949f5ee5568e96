//! Fallback views for devices without a usable biometric method

use egui::RichText;

use crate::biometric::BiometryType;
use crate::i18n::Strings;
use crate::screen::components::action_button;
use crate::screen::theme::ThemeColors;
use crate::screen::ScreenCommand;

/// No biometric hardware: offer the manual bypass
pub fn render_fallback_view(ui: &mut egui::Ui, strings: &Strings) -> Option<ScreenCommand> {
    let mut command = None;

    ui.vertical_centered(|ui| {
        ui.add_space(50.0);
        if action_button(
            ui,
            strings.bypass_button,
            ThemeColors::BG_MUTED,
            egui::vec2(220.0, 44.0),
            18.0,
            true,
        )
        .clicked()
        {
            command = Some(ScreenCommand::EnterAnyway);
        }

        ui.add_space(100.0);
        ui.label(
            RichText::new(strings.no_sensor_message)
                .size(30.0)
                .color(ThemeColors::TEXT_PRIMARY),
        );
    });

    command
}

/// A method is available but not accepted; there is nothing to do here
pub fn render_unsupported_view(ui: &mut egui::Ui, strings: &Strings, method: BiometryType) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.label(
            RichText::new(strings.face_unsupported_message)
                .size(22.0)
                .color(ThemeColors::TEXT_PRIMARY),
        );
        ui.add_space(8.0);
        ui.label(RichText::new(method.as_str()).color(ThemeColors::TEXT_SECONDARY));
    });
}
