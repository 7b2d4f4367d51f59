use eframe::egui::{self, Align2, Color32, ColorImage, RichText, TextureHandle, TextureOptions, Ui};
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, PlotImage, PlotPoint, PlotPoints, Points, Text};

use crate::color::viridis_rgba;
use crate::state::AppState;
use crate::view::panels::{Extent, HeatmapPanel, SpectrumPanel};

/// Pixel width of the colorbar gradient texture.
const COLORBAR_STEPS: usize = 256;

// ---------------------------------------------------------------------------
// Texture cache
// ---------------------------------------------------------------------------

/// GPU textures for the current slice and the colorbar gradient.
#[derive(Default)]
pub struct PlotTextures {
    /// `(render generation, texture)` of the displayed slice.
    heatmap: Option<(u64, TextureHandle)>,
    colorbar: Option<TextureHandle>,
}

impl PlotTextures {
    fn heatmap(&mut self, ctx: &egui::Context, panel: &HeatmapPanel, generation: u64) -> TextureHandle {
        match &self.heatmap {
            Some((g, tex)) if *g == generation => tex.clone(),
            _ => {
                let slice = &panel.slice;
                let (rows, cols) = slice.dim();
                let image = ColorImage::from_rgba_unmultiplied(
                    [cols, rows],
                    &viridis_rgba(slice.values.iter().copied()),
                );
                let tex = ctx.load_texture("heatmap", image, TextureOptions::NEAREST);
                self.heatmap = Some((generation, tex.clone()));
                tex
            }
        }
    }

    fn colorbar(&mut self, ctx: &egui::Context) -> TextureHandle {
        self.colorbar
            .get_or_insert_with(|| {
                let ramp = (0..COLORBAR_STEPS).map(|i| i as f64 / (COLORBAR_STEPS - 1) as f64);
                let image =
                    ColorImage::from_rgba_unmultiplied([COLORBAR_STEPS, 1], &viridis_rgba(ramp));
                ctx.load_texture("colorbar", image, TextureOptions::LINEAR)
            })
            .clone()
    }
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Heatmap above spectrum, splitting the available height.
pub fn slice_plots(ui: &mut Ui, state: &AppState, textures: &mut PlotTextures) {
    let Some(rendered) = &state.rendered else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a result directory  (File → Open result directory…)");
        });
        return;
    };

    let height = (ui.available_height() - 3.0 * ui.spacing().interact_size.y) / 2.0;
    heatmap_plot(ui, &rendered.heatmap, state.render_generation, height, textures);
    ui.separator();
    spectrum_plot(ui, &rendered.spectrum, height);
}

fn bounds(extent: &Extent) -> PlotBounds {
    PlotBounds::from_min_max([extent.x_min, extent.y_min], [extent.x_max, extent.y_max])
}

fn to_vec2(size: [f64; 2]) -> [f32; 2] {
    [size[0] as f32, size[1] as f32]
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

fn heatmap_plot(
    ui: &mut Ui,
    panel: &HeatmapPanel,
    generation: u64,
    height: f32,
    textures: &mut PlotTextures,
) {
    let heatmap_tex = textures.heatmap(ui.ctx(), panel, generation);
    let colorbar_tex = textures.colorbar(ui.ctx());

    ui.label(RichText::new(&panel.title).strong());
    Plot::new("heatmap")
        .height(height)
        .x_axis_label("λ₀ (nm)")
        .y_axis_label("Δλ (nm)")
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(bounds(&panel.extent));

            let c = panel.extent.center();
            plot_ui.image(PlotImage::new(
                &heatmap_tex,
                PlotPoint::new(c[0], c[1]),
                to_vec2(panel.extent.size()),
            ));

            for marker in &panel.markers {
                plot_ui.points(
                    Points::new(vec![marker.position])
                        .name(format!("peak {}", marker.peak))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(5.0)
                        .color(marker.color),
                );
            }

            // Inset colorbar.
            let cb = &panel.colorbar;
            let cc = cb.rect.center();
            plot_ui.image(PlotImage::new(
                &colorbar_tex,
                PlotPoint::new(cc[0], cc[1]),
                to_vec2(cb.rect.size()),
            ));
            for &(value, x) in &cb.ticks {
                plot_ui.text(
                    Text::new(PlotPoint::new(x, cb.rect.y_min), RichText::new(format!("{value}")).size(10.0))
                        .color(Color32::WHITE)
                        .anchor(Align2::CENTER_TOP),
                );
            }
            plot_ui.text(
                Text::new(PlotPoint::new(cc[0], cb.rect.y_max), RichText::new(cb.label).size(10.0))
                    .color(Color32::WHITE)
                    .anchor(Align2::CENTER_BOTTOM),
            );
        });
}

// ---------------------------------------------------------------------------
// Spectrum
// ---------------------------------------------------------------------------

fn spectrum_plot(ui: &mut Ui, panel: &SpectrumPanel, height: f32) {
    let extent = Extent {
        x_min: panel.x_range.0,
        x_max: panel.x_range.1,
        y_min: panel.y_range.0,
        y_max: panel.y_range.1,
    };

    Plot::new("spectrum")
        .height(height)
        .x_axis_label("wavelength (nm)")
        .y_axis_label("spectral irradiance (arb.)")
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.set_plot_bounds(bounds(&extent));

            let reference: PlotPoints = panel.reference.iter().copied().collect();
            plot_ui.line(
                Line::new(reference)
                    .name("input spectrum")
                    .color(Color32::BLACK)
                    .width(1.5),
            );

            for curve in &panel.boundaries {
                let points: PlotPoints = curve.points.iter().copied().collect();
                plot_ui.line(
                    Line::new(points)
                        .name(format!("peak {}", curve.peak))
                        .color(curve.color)
                        .width(1.5),
                );
            }

            for label in &panel.labels {
                plot_ui.text(
                    Text::new(PlotPoint::new(label.position[0], label.position[1]), label.text.as_str())
                        .color(label.color)
                        .anchor(Align2::LEFT_CENTER),
                );
            }

            let cap = &panel.caption;
            plot_ui.text(
                Text::new(PlotPoint::new(cap.position[0], cap.position[1]), cap.text.as_str())
                    .color(cap.color)
                    .anchor(Align2::CENTER_CENTER),
            );
        });
}
