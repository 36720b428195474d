use egui::Ui;
use roster_business::users::FetchError;

use crate::widgets::colors::COLOR_ERROR;

pub fn loading_view(ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.spinner();
        ui.label("Loading users…");
    });
}

/// Generic alert. The detailed reason is already in the log.
pub fn error_view(ui: &mut Ui, err: &FetchError) {
    ui.colored_label(COLOR_ERROR, err.user_message());
}

pub fn empty_view(ui: &mut Ui) {
    ui.weak("No users found.");
}
