//! Row rendering for the users table.

use egui_extras::TableRow;
use roster_business::users::UserRow;
use ustr::Ustr;

use super::cells::{ActionClick, render_action_buttons, render_email_cell, render_text_cell};

/// What the operator did with a row during this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIntent {
    /// Clicked the email cell outside the link.
    Select(Ustr),
    /// Clicked the email link: select and navigate.
    Open(Ustr),
    Refresh(Ustr),
    Delete(Ustr),
}

/// Renders a single user row. Returns the intent if any part of it was clicked.
#[inline]
pub fn render_user_row(row: &mut TableRow<'_, '_>, data: &UserRow) -> Option<RowIntent> {
    row.set_selected(data.selected);

    let mut link_clicked = false;
    let (_, email_cell) = row.col(|ui| {
        link_clicked =
            render_email_cell(ui, &data.email, &data.detail_href, &data.created_display);
    });

    row.col(|ui| render_text_cell(ui, &data.role_display));
    row.col(|ui| render_text_cell(ui, &data.plan_display));

    let mut action = None;
    row.col(|ui| action = render_action_buttons(ui, data.can_edit));

    match action {
        Some(ActionClick::Refresh) => return Some(RowIntent::Refresh(data.id)),
        Some(ActionClick::Delete) => return Some(RowIntent::Delete(data.id)),
        None => {}
    }
    if link_clicked {
        Some(RowIntent::Open(data.id))
    } else if email_cell.clicked() {
        Some(RowIntent::Select(data.id))
    } else {
        None
    }
}
