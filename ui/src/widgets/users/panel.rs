//! Main panel for the users list.

use egui::{Frame, Margin, Response, Sense, Stroke, Ui};
use egui_extras::TableBuilder;
use log::debug;
use roster_business::users::{
    TableDiagnostics, UserTableModel, UsersQueryCompute, UsersViewState, controls,
};
use roster_business::{Environment, PolicyState};
use roster_states::StateCtx;

use super::controls::controls_bar;
use super::status::{empty_view, error_view, loading_view};
use super::table::columns::{HEADER_HEIGHT, ROW_HEIGHT, table_columns};
use super::table::header::render_table_header;
use super::table::row::{RowIntent, render_user_row};
use crate::widgets::colors::TABLE_BORDER_COLOR;

enum Body {
    Loading,
    Failed(roster_business::users::FetchError),
    Table(UserTableModel),
}

fn body(state_ctx: &StateCtx) -> Body {
    let Some(query) = state_ctx.cached::<UsersQueryCompute>() else {
        return Body::Loading;
    };
    if let Some(err) = query.error() {
        return Body::Failed(err.clone());
    }
    let Some(users) = query.users() else {
        return Body::Loading;
    };

    let selected = state_ctx.state::<UsersViewState>().selected_row_id;
    let policy = state_ctx.state::<PolicyState>();
    Body::Table(UserTableModel::from_users(users, selected, policy.engine()))
}

/// Writes the row diagnostics in development, once per distinct model.
fn log_table_diagnostics(state_ctx: &mut StateCtx, model: &UserTableModel) {
    if !state_ctx.state::<Environment>().diagnostics_enabled()
        || state_ctx.state::<TableDiagnostics>().is_current(model)
    {
        return;
    }
    state_ctx.update::<TableDiagnostics>(|diagnostics| {
        diagnostics.log_if_changed(model);
    });
}

/// Displays the users panel: toolbar, then loading/error/table.
pub fn users_panel(state_ctx: &mut StateCtx, ui: &mut Ui) -> Response {
    ui.vertical(|ui| {
        controls_bar(state_ctx, ui);

        let verb = state_ctx.state::<Environment>().interaction_verb();
        ui.weak(format!(
            "{verb} a row to select it, {verb} an email to open the user."
        ));
        ui.add_space(8.0);

        let view = body(state_ctx);
        if let Body::Table(model) = &view {
            log_table_diagnostics(state_ctx, model);
        }

        match view {
            Body::Loading => loading_view(ui),
            Body::Failed(err) => error_view(ui, &err),
            Body::Table(model) if model.is_empty() => empty_view(ui),
            Body::Table(model) => {
                if let Some(intent) = users_table(ui, &model) {
                    apply_intent(state_ctx, intent);
                }
            }
        }
    })
    .response
}

fn users_table(ui: &mut Ui, model: &UserTableModel) -> Option<RowIntent> {
    let mut intent = None;

    Frame::NONE
        .stroke(Stroke::new(1.0, TABLE_BORDER_COLOR))
        .inner_margin(Margin::same(4))
        .show(ui, |ui| {
            let mut builder = TableBuilder::new(ui)
                .id_salt("users_table")
                .striped(true)
                .sense(Sense::click())
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
            for column in table_columns() {
                builder = builder.column(column);
            }

            builder
                .header(HEADER_HEIGHT, |mut header| render_table_header(&mut header))
                .body(|mut body| {
                    for data in &model.rows {
                        body.row(ROW_HEIGHT, |mut row| {
                            if let Some(clicked) = render_user_row(&mut row, data) {
                                intent = Some(clicked);
                            }
                        });
                    }
                });
        });

    intent
}

fn apply_intent(state_ctx: &mut StateCtx, intent: RowIntent) {
    debug!("Row intent {intent:?}");
    match intent {
        RowIntent::Select(id) => controls::select_row(state_ctx, id),
        RowIntent::Open(id) => controls::open_user(state_ctx, id),
        RowIntent::Refresh(id) => controls::request_refresh(state_ctx, id),
        RowIntent::Delete(id) => controls::request_delete(state_ctx, id),
    }
}
