use egui::{RichText, ScrollArea};
use roster_business::users::{DebugDumpState, controls};
use roster_states::StateCtx;

/// Window with the raw users payload, shown after "Debug dump" was clicked.
pub fn debug_dump_window(state_ctx: &mut StateCtx, ctx: &egui::Context) {
    let dump = state_ctx.state::<DebugDumpState>();
    if !dump.open {
        return;
    }
    let text = dump.text.clone();

    let mut open = true;
    egui::Window::new("Debug dump")
        .open(&mut open)
        .default_size([480.0, 360.0])
        .show(ctx, |ui| {
            ScrollArea::both().show(ui, |ui| {
                ui.label(RichText::new(&text).monospace());
            });
        });

    if !open {
        controls::close_debug_dump(state_ctx);
    }
}
