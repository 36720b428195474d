//! Cell rendering functions for the users table.

use egui::{Button, RichText, Ui};

/// Email link with the creation time below it. Returns `true` when the link was clicked.
#[inline]
pub fn render_email_cell(ui: &mut Ui, email: &str, href: &str, created: &str) -> bool {
    ui.vertical(|ui| {
        let clicked = ui.link(email).on_hover_text(href).clicked();
        ui.label(RichText::new(created).small().weak());
        clicked
    })
    .inner
}

#[inline]
pub fn render_text_cell(ui: &mut Ui, text: &str) {
    ui.label(text);
}

/// Which action button was clicked, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionClick {
    Refresh,
    Delete,
}

/// Refresh (gated by `can_edit`) and Delete (always enabled).
#[inline]
pub fn render_action_buttons(ui: &mut Ui, can_edit: bool) -> Option<ActionClick> {
    let mut clicked = None;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(can_edit, Button::new("Refresh"))
            .on_hover_text("Ask the server to refresh this user")
            .clicked()
        {
            clicked = Some(ActionClick::Refresh);
        }
        if ui.button("Delete").clicked() {
            clicked = Some(ActionClick::Delete);
        }
    });

    clicked
}
