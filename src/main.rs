mod app;
mod cli;
mod color;
mod data;
mod state;
mod ui;
mod view;

use anyhow::{Context, Result};
use eframe::egui;

use app::SweepViewerApp;
use cli::ViewerOptions;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let options = ViewerOptions::from_args(std::env::args_os()).unwrap_or_else(|e| e.exit());
    log::debug!("{options:?}");

    let mut state = AppState::default();
    state.fallback_roots = options.fallback_roots.clone();
    state.request.tertiary_value = options.width;
    state.request.peak_count = options.peak_count;
    state
        .open(&options.savefile)
        .with_context(|| format!("loading {}", options.title()))?;

    if let (Some(loaded), Some(rendered)) = (&state.loaded, &state.rendered) {
        println!("Displaying w = {} nm", rendered.tertiary_value);
        println!("Calculated values of w:");
        println!("{:?}", loaded.axes.tertiary.values());
    }

    let native = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 875.0])
            .with_min_inner_size([400.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        &format!("{} Delta", options.title()),
        native,
        Box::new(|cc| {
            // Colour-coded text assumes a light background.
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(SweepViewerApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("display failed: {e}"))
}
