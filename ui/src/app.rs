use std::time::Duration;

use chrono::Utc;
use log::info;
use roster_business::users::controls;
use roster_business::{BusinessConfig, NavigationRequest};
use roster_states::Time;

use crate::{state::State, widgets};

/// Repaint cadence while commands are in flight, so results show up without input.
const BUSY_REPAINT: Duration = Duration::from_millis(50);

pub struct RosterApp {
    state: State,
}

impl RosterApp {
    /// Called once before the first frame.
    pub fn new(state: State) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    fn open_pending_navigation(&mut self, ctx: &egui::Context) {
        if self.state.ctx.state::<NavigationRequest>().pending().is_none() {
            return;
        }
        let mut pending = None;
        self.state
            .ctx
            .update::<NavigationRequest>(|nav| pending = nav.take());

        let Some(path) = pending else {
            return;
        };
        match self.state.ctx.state::<BusinessConfig>().detail_url(&path) {
            Some(url) => {
                info!("Opening {url}");
                ctx.open_url(egui::OpenUrl::new_tab(url));
            }
            None => info!("No ROSTER_APP_BASE_URL set, recorded {path} only"),
        }
    }
}

impl eframe::App for RosterApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Sync Compute for render
        self.state.ctx.sync_computes();
        self.state
            .ctx
            .update::<Time>(|time| *time.as_mut() = Utc::now());

        let focused = ctx.input(|i| i.focused);
        controls::observe_focus(&mut self.state.ctx, focused);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Users");
                widgets::last_navigation(&self.state.ctx, ui);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::users_panel(&mut self.state.ctx, ui);
        });

        widgets::debug_dump_window(&mut self.state.ctx, ctx);
        self.open_pending_navigation(ctx);

        // Run background jobs
        self.state.ctx.run_computed();

        if self.state.ctx.task_count() > 0 {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}
