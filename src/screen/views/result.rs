//! Result view - selected image with progress or recognized text

use egui::RichText;

use crate::i18n::Strings;
use crate::screen::components::{action_button, ProgressRing};
use crate::screen::theme::ThemeColors;
use crate::screen::ScreenCommand;

/// Displayed image size (crop size / 2.5)
const IMAGE_SIZE: egui::Vec2 = egui::vec2(240.0, 200.0);

/// Render the result view
pub fn render_result_view(
    ui: &mut egui::Ui,
    strings: &Strings,
    uri: &str,
    loading: bool,
    progress: f32,
    text: &str,
) -> Option<ScreenCommand> {
    let mut command = None;

    ui.vertical_centered(|ui| {
        ui.add_space(10.0);
        if action_button(
            ui,
            strings.back_button,
            ThemeColors::GALLERY,
            egui::vec2(160.0, 40.0),
            20.0,
            !loading,
        )
        .clicked()
        {
            command = Some(ScreenCommand::Back);
        }

        ui.add_space(15.0);
        ui.add(
            egui::Image::new(format!("file://{}", uri))
                .max_size(IMAGE_SIZE)
                .maintain_aspect_ratio(true),
        );
        ui.add_space(15.0);

        if loading {
            ProgressRing::new(progress).radius(48.0).show(ui);
            return;
        }

        if text.is_empty() {
            ui.label(RichText::new(strings.no_text_found).color(ThemeColors::TEXT_SECONDARY));
            return;
        }

        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - 48.0)
            .show(ui, |ui| {
                ui.add(egui::Label::new(RichText::new(text).color(ThemeColors::TEXT_PRIMARY)).selectable(true));
            });
        ui.add_space(8.0);
        if ui.button(strings.copy_button).clicked() {
            ui.output_mut(|o| o.copied_text = text.to_string());
        }
    });

    command
}
