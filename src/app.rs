use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SweepViewerApp {
    pub state: AppState,
    textures: plot::PlotTextures,
}

impl SweepViewerApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            textures: plot::PlotTextures::default(),
        }
    }
}

impl eframe::App for SweepViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: slice and peak selection ----
        egui::SidePanel::left("slice_panel")
            .default_width(140.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: heatmap above spectrum ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::slice_plots(ui, &self.state, &mut self.textures);
        });
    }
}
