//! Toolbar above the users table.

use egui::{ComboBox, TextEdit, Ui};
use roster_business::users::{PageSize, SortBy, UsersQueryCompute, UsersViewState, controls};
use roster_states::StateCtx;

pub fn controls_bar(state_ctx: &mut StateCtx, ui: &mut Ui) {
    let view = state_ctx.state::<UsersViewState>().clone();
    let fetching = state_ctx
        .cached::<UsersQueryCompute>()
        .is_some_and(UsersQueryCompute::is_fetching);

    ui.horizontal_wrapped(|ui| {
        ui.label("Search");
        let mut search = view.search.clone();
        if ui
            .add(TextEdit::singleline(&mut search).hint_text("email, name…"))
            .changed()
        {
            controls::set_search(state_ctx, search);
        }

        let mut sort_by = view.sort_by;
        ComboBox::from_label("Sort by")
            .selected_text(sort_by.label())
            .show_ui(ui, |ui| {
                for option in SortBy::ALL {
                    ui.selectable_value(&mut sort_by, option, option.label());
                }
            });
        if sort_by != view.sort_by {
            controls::set_sort_by(state_ctx, sort_by);
        }

        let mut desc = view.desc;
        if ui.checkbox(&mut desc, "Descending").changed() {
            controls::set_desc(state_ctx, desc);
        }
    });

    ui.horizontal(|ui| {
        ui.label("Page size");
        for size in PageSize::ALL {
            if ui
                .selectable_label(view.page_size == size, size.to_string())
                .clicked()
                && view.page_size != size
            {
                controls::set_page_size(state_ctx, size);
            }
        }

        ui.separator();
        if ui.button("Reload all").clicked() {
            controls::reload_all(state_ctx);
        }
        if ui.button("Debug dump").clicked() {
            controls::open_debug_dump(state_ctx);
        }
        if fetching {
            ui.spinner();
        }
    });
}
