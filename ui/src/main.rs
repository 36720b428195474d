#![warn(clippy::all, rust_2018_idioms)]
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context as _;
use log::info;
use roster_business::{PolicyState, load_from_env};
use roster_ui::RosterApp;
use roster_ui::state::State;

mod alloc {
    #[global_allocator]
    static MALLOC: mimalloc::MiMalloc = mimalloc::MiMalloc;
}

fn main() -> anyhow::Result<()> {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_module("egui_winit::clipboard", log::LevelFilter::Off)
        .init();

    let (config, environment) = load_from_env()?;
    info!(
        "Starting roster against {} (production: {})",
        config.api_base_url, environment.is_production
    );

    // Commands are spawned on the ambient runtime from the UI thread.
    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let _guard = runtime.enter();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Roster",
        native_options,
        Box::new(move |_cc| {
            let state = State::new(config, environment, PolicyState::default());
            Ok(Box::new(RosterApp::new(state)))
        }),
    )
    .map_err(|err| anyhow::anyhow!("eframe failed: {err}"))
}
