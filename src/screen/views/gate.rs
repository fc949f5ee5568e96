//! Authentication gate - shown until the biometric prompt resolves

use egui::{RichText, Rounding, Stroke};

use crate::biometric::AuthConfig;
use crate::i18n::Strings;
use crate::screen::theme::{color_with_alpha, parse_hex_color, ThemeColors};
use crate::screen::ScreenCommand;

/// Render the gate view.
///
/// Blank apart from a spinner while the capability check runs, the prompt
/// card while the sensor waits, and a retry control after a denial.
pub fn render_gate_view(
    ui: &mut egui::Ui,
    strings: &Strings,
    config: &AuthConfig,
    prompting: bool,
    can_retry: bool,
) -> Option<ScreenCommand> {
    let mut command = None;

    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.25);

        if prompting {
            let accent = parse_hex_color(&config.image_color).unwrap_or(ThemeColors::ACCENT_PRIMARY);

            egui::Frame::none()
                .fill(ThemeColors::BG_CARD)
                .stroke(Stroke::new(1.0, ThemeColors::BORDER))
                .rounding(Rounding::same(12.0))
                .inner_margin(24.0)
                .show(ui, |ui| {
                    ui.set_max_width(360.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(&config.title).size(22.0).strong());
                        ui.add_space(8.0);
                        ui.label(RichText::new(strings.prompt_message).color(ThemeColors::TEXT_SECONDARY));
                        ui.add_space(16.0);

                        let (rect, _) = ui.allocate_exact_size(egui::vec2(72.0, 72.0), egui::Sense::hover());
                        ui.painter().circle_filled(rect.center(), 36.0, color_with_alpha(accent, 51));
                        ui.painter().circle_stroke(rect.center(), 24.0, Stroke::new(3.0, accent));

                        ui.add_space(8.0);
                        ui.label(RichText::new(&config.sensor_description).color(accent));
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new(strings.waiting_for_sensor).color(ThemeColors::TEXT_SECONDARY));
                        });
                        ui.add_space(16.0);

                        if ui.button(&config.cancel_text).clicked() {
                            command = Some(ScreenCommand::CancelAuthentication);
                        }
                    });
                });
        } else if can_retry {
            ui.label(
                RichText::new(&config.sensor_error_description)
                    .size(20.0)
                    .color(ThemeColors::ACCENT_ERROR),
            );
            ui.add_space(16.0);
            if ui.button(strings.retry_button).clicked() {
                command = Some(ScreenCommand::RetryAuthentication);
            }
        } else {
            ui.spinner();
        }
    });

    command
}
