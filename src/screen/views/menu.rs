//! Main menu - camera and gallery triggers

use egui::RichText;

use crate::i18n::Strings;
use crate::screen::components::action_button;
use crate::screen::theme::ThemeColors;
use crate::screen::ScreenCommand;

/// Render the main menu. Both triggers are disabled unless `enabled`.
pub fn render_menu_view(ui: &mut egui::Ui, strings: &Strings, enabled: bool) -> Option<ScreenCommand> {
    let mut command = None;

    ui.vertical_centered(|ui| {
        ui.add_space(10.0);
        ui.label(RichText::new(strings.menu_title).size(22.0).color(ThemeColors::TEXT_PRIMARY));
        ui.add_space(16.0);

        let width = ui.available_width() * 0.9;
        let height = (ui.available_height() - 40.0).max(120.0) / 2.0;
        let size = egui::vec2(width, height);

        if action_button(ui, strings.camera_button, ThemeColors::CAMERA, size, 42.0, enabled).clicked() {
            command = Some(ScreenCommand::Camera);
        }
        ui.add_space(10.0);
        if action_button(ui, strings.gallery_button, ThemeColors::GALLERY, size, 42.0, enabled).clicked() {
            command = Some(ScreenCommand::Gallery);
        }
    });

    command
}
