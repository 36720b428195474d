use egui::Ui;
use roster_business::NavigationRequest;
use roster_states::StateCtx;

/// Shows the most recently requested page, if any.
pub fn last_navigation(state_ctx: &StateCtx, ui: &mut Ui) {
    if let Some(path) = state_ctx.state::<NavigationRequest>().history.last() {
        ui.weak(format!("Last opened: {path}"));
    }
}
