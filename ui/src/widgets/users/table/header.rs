use egui::Ui;
use egui_extras::TableRow;
use roster_business::users::Column;

/// Renders the table header, one bold label per column.
#[inline]
pub fn render_table_header(header: &mut TableRow<'_, '_>) {
    for column in Column::ALL {
        header.col(|ui| {
            render_header_cell(ui, column.title());
        });
    }
}

#[inline]
fn render_header_cell(ui: &mut Ui, label: &str) {
    ui.strong(label);
}
