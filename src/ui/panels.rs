use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::cli::MAX_PEAKS;
use crate::color::peak_color;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – slice and peak selection
// ---------------------------------------------------------------------------

/// Render the left panel: computed w values and the peak count.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Peaks");
    let mut peak_count = state.request.peak_count;
    let changed = ui
        .add(egui::DragValue::new(&mut peak_count).range(1..=MAX_PEAKS))
        .changed();
    if changed && peak_count != state.request.peak_count {
        if let Err(e) = state.set_peak_count(peak_count) {
            state.report("peak search", &e);
        }
    }
    peak_table(ui, state);
    ui.separator();

    ui.heading("w (nm)");
    let Some(loaded) = &state.loaded else {
        ui.label("No sweep loaded.");
        return;
    };

    let values = loaded.axes.tertiary.values().to_vec();
    let selected = state.rendered.as_ref().map(|r| r.selected_index);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, &w) in values.iter().enumerate() {
                if ui
                    .selectable_label(selected == Some(i), format!("{w}"))
                    .clicked()
                {
                    if let Err(e) = state.select_width(Some(w)) {
                        state.report("render", &e);
                    }
                }
            }
        });
}

/// Center, width and value of each peak at the displayed slice.
fn peak_table(ui: &mut Ui, state: &AppState) {
    let Some(rendered) = &state.rendered else {
        return;
    };
    let k = rendered.selected_index;
    egui::Grid::new("peak_table").striped(true).show(ui, |ui: &mut Ui| {
        ui.strong("λ₀");
        ui.strong("Δλ");
        ui.strong("Δ");
        ui.end_row();
        for j in 0..state.request.peak_count {
            let Some(p) = state.peaks.row(j, k) else {
                continue;
            };
            ui.label(RichText::new(format!("{}", p.center)).color(peak_color(j)));
            ui.label(format!("{}", p.width));
            ui.label(format!("{:.3e}", p.value));
            ui.end_row();
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open result directory…").clicked() {
                open_directory_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(loaded), Some(rendered)) = (&state.loaded, &state.rendered) {
            let (rows, cols, n) = loaded.grid.shape();
            ui.label(format!(
                "{}: {rows}×{cols} grid, {n} slices, showing w = {} nm (max Δ = {:.3e})",
                loaded.source.display(),
                rendered.tertiary_value,
                rendered.heatmap.slice.scale
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_directory_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open saved calculation")
        .pick_folder();

    if let Some(path) = folder {
        if let Err(e) = state.open(&path) {
            state.report("Failed to load directory", &e);
        }
    }
}
