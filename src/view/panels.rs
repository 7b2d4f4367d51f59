use std::f64::consts::PI;

use eframe::egui::Color32;

use super::select::{select_slice, DisplaySlice};
use crate::color::peak_color;
use crate::data::error::{GridError, GridResult};
use crate::data::model::LoadedGrid;
use crate::data::peaks::PeakSet;

/// Samples per boundary curve across the primary-axis domain.
pub const BOUNDARY_SAMPLES: usize = 400;
/// Upper limit of the spectrum panel; the band above 1.0 holds the labels.
pub const SPECTRUM_Y_MAX: f64 = 1.25;
const CENTER_LABEL_Y: f64 = 1.12;
const WIDTH_LABEL_Y: f64 = 1.07;
/// Caption height as a fraction of the panel.
const CAPTION_FRACTION: f64 = 0.95;

pub const COLORBAR_TICKS: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];
/// Inset colorbar placement as panel fractions: `[left, bottom, width, height]`.
const COLORBAR_INSET: [f64; 4] = [0.45, 0.91, 0.45, 0.05];
pub const COLORBAR_LABEL: &str = "Δ = A-B (arb.)";

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// What to show: replaces any ambient "current figure" state.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    /// Shown in the heatmap title, usually the result directory name.
    pub title: String,
    /// Requested tertiary value; `None` shows the largest computed one.
    pub tertiary_value: Option<f64>,
    pub peak_count: usize,
}

/// Axis-aligned rectangle in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Extent {
    pub fn center(&self) -> [f64; 2] {
        [
            0.5 * (self.x_min + self.x_max),
            0.5 * (self.y_min + self.y_max),
        ]
    }

    pub fn size(&self) -> [f64; 2] {
        [self.x_max - self.x_min, self.y_max - self.y_min]
    }

    /// Sub-rectangle at fractional `[left, bottom, width, height]`.
    fn inset(&self, frac: [f64; 4]) -> Extent {
        let [w, h] = self.size();
        let x_min = self.x_min + frac[0] * w;
        let y_min = self.y_min + frac[1] * h;
        Extent {
            x_min,
            x_max: x_min + frac[2] * w,
            y_min,
            y_max: y_min + frac[3] * h,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PeakMarker {
    pub peak: usize,
    /// `(center, width)` in data coordinates.
    pub position: [f64; 2],
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub rect: Extent,
    /// `(tick value, x position)` pairs.
    pub ticks: Vec<(f64, f64)>,
    pub label: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapPanel {
    pub title: String,
    pub slice: DisplaySlice,
    pub extent: Extent,
    pub markers: Vec<PeakMarker>,
    pub colorbar: Colorbar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub peak: usize,
    pub points: Vec<[f64; 2]>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: [f64; 2],
    pub text: String,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumPanel {
    /// Reference spectrum scaled to unit maximum.
    pub reference: Vec<[f64; 2]>,
    /// Two curves per drawn peak: lower boundary then upper boundary.
    pub boundaries: Vec<Curve>,
    /// Left-anchored peak annotations.
    pub labels: Vec<Label>,
    /// Centered `w = …` caption.
    pub caption: Label,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

/// Both panels for one selected slice.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSlice {
    pub selected_index: usize,
    pub tertiary_value: f64,
    pub heatmap: HeatmapPanel,
    pub spectrum: SpectrumPanel,
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Build the heatmap and spectrum panels for the slice nearest the request.
///
/// `lineshape(x, width, center)` draws the boundary curves. Peaks missing at
/// the selected slice are skipped.
pub fn render<F>(
    loaded: &LoadedGrid,
    peaks: &PeakSet,
    request: &RenderRequest,
    lineshape: F,
) -> GridResult<RenderedSlice>
where
    F: Fn(f64, f64, f64) -> f64,
{
    if request.peak_count > peaks.peak_count() {
        return Err(GridError::PeakCountMismatch {
            requested: request.peak_count,
            available: peaks.peak_count(),
        });
    }

    let axes = &loaded.axes;
    let k = select_slice(&axes.tertiary, request.tertiary_value);
    let w = axes.tertiary.values()[k];
    log::debug!("Rendering slice {k} (w = {w}) of {}", loaded.source.display());

    let heatmap = heatmap_panel(loaded, peaks, request, k, w);
    let spectrum = spectrum_panel(loaded, peaks, request.peak_count, k, w, lineshape);

    Ok(RenderedSlice {
        selected_index: k,
        tertiary_value: w,
        heatmap,
        spectrum,
    })
}

fn heatmap_panel(
    loaded: &LoadedGrid,
    peaks: &PeakSet,
    request: &RenderRequest,
    k: usize,
    w: f64,
) -> HeatmapPanel {
    let axes = &loaded.axes;
    let extent = Extent {
        x_min: axes.primary.min(),
        x_max: axes.primary.max(),
        y_min: axes.secondary.min(),
        y_max: axes.secondary.max(),
    };

    let markers = (0..request.peak_count)
        .filter_map(|j| {
            peaks.row(j, k).map(|p| PeakMarker {
                peak: j,
                position: [p.center, p.width],
                color: peak_color(j),
            })
        })
        .collect();

    let rect = extent.inset(COLORBAR_INSET);
    let ticks = COLORBAR_TICKS
        .iter()
        .map(|&t| (t, rect.x_min + t * (rect.x_max - rect.x_min)))
        .collect();

    HeatmapPanel {
        title: format!("Δ at w = {w} nm for {}", request.title),
        slice: DisplaySlice::from_grid(&loaded.grid, k),
        extent,
        markers,
        colorbar: Colorbar {
            rect,
            ticks,
            label: COLORBAR_LABEL,
        },
    }
}

fn spectrum_panel<F>(
    loaded: &LoadedGrid,
    peaks: &PeakSet,
    peak_count: usize,
    k: usize,
    w: f64,
    lineshape: F,
) -> SpectrumPanel
where
    F: Fn(f64, f64, f64) -> f64,
{
    let x_min = loaded.axes.primary.min();
    let x_max = loaded.axes.primary.max();

    let reference = loaded
        .spectrum
        .wavelength
        .iter()
        .zip(loaded.spectrum.normalized())
        .map(|(&x, y)| [x, y])
        .collect();

    let xs = linspace(x_min, x_max, BOUNDARY_SAMPLES);
    // Scales the area-normalised lineshape to unit height.
    let norm = w * (2.0 * PI).sqrt();

    let mut boundaries = Vec::new();
    let mut labels = Vec::new();
    for j in 0..peak_count {
        let Some(p) = peaks.row(j, k) else {
            continue;
        };
        let color = peak_color(j);
        let lower = p.center - p.width / 2.0;
        let upper = p.center + p.width / 2.0;

        for edge in [lower, upper] {
            boundaries.push(Curve {
                peak: j,
                points: xs.iter().map(|&x| [x, norm * lineshape(x, w, edge)]).collect(),
                color,
            });
        }

        labels.push(Label {
            position: [lower, CENTER_LABEL_Y],
            text: format!("λ₀ = {} nm", p.center),
            color,
        });
        labels.push(Label {
            position: [lower, WIDTH_LABEL_Y],
            text: format!("Δλ = {} nm", p.width),
            color,
        });
    }

    SpectrumPanel {
        reference,
        boundaries,
        labels,
        caption: Label {
            position: [0.5 * (x_min + x_max), CAPTION_FRACTION * SPECTRUM_Y_MAX],
            text: format!("w = {w} nm"),
            color: Color32::BLACK,
        },
        x_range: (x_min, x_max),
        y_range: (0.0, SPECTRUM_Y_MAX),
    }
}

/// `n` evenly spaced samples from `start` to `end` inclusive.
fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Axes, AxisVector, ResultGrid, SpectrumTable};
    use ndarray::array;
    use crate::data::peaks::{gauss, PeakRow};
    use std::path::{Path, PathBuf};

    fn sample_grid() -> LoadedGrid {
        let mut grid = ResultGrid::zeros(2, 3, 2);
        let delta_0 = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let delta_1 = array![[0.6, 0.5, 0.4], [0.3, 0.2, 0.1]];
        grid.set_slice(0, &delta_0, Path::new("Delta_0.txt")).unwrap();
        grid.set_slice(1, &delta_1, Path::new("Delta_1.txt")).unwrap();

        LoadedGrid {
            source: PathBuf::from("sample"),
            axes: Axes {
                primary: AxisVector::new(vec![1.0, 2.0, 3.0]).unwrap(),
                secondary: AxisVector::new(vec![10.0, 20.0]).unwrap(),
                tertiary: AxisVector::new(vec![0.5, 1.0]).unwrap(),
            },
            grid,
            spectrum: SpectrumTable {
                wavelength: vec![1.0, 2.0, 3.0],
                intensity: vec![2.0, 4.0, 1.0],
            },
        }
    }

    fn sample_peaks() -> PeakSet {
        let row = |center, width| {
            Some(PeakRow {
                value: 1.0,
                center,
                width,
            })
        };
        PeakSet::new(vec![
            vec![row(1.0, 10.0), row(1.5, 12.0)],
            vec![row(3.0, 20.0), None],
        ])
    }

    fn request(value: Option<f64>, peak_count: usize) -> RenderRequest {
        RenderRequest {
            title: "sample".to_string(),
            tertiary_value: value,
            peak_count,
        }
    }

    #[test]
    fn requested_value_selects_slice() {
        let loaded = sample_grid();
        let peaks = sample_peaks();
        for (value, expected) in [(Some(0.7), 1), (Some(-5.0), 0), (Some(5.0), 1), (None, 1)] {
            let out = render(&loaded, &peaks, &request(value, 2), gauss).unwrap();
            assert_eq!(out.selected_index, expected);
            assert_eq!(out.tertiary_value, loaded.axes.tertiary.values()[expected]);
        }
    }

    #[test]
    fn heatmap_is_normalized_per_slice() {
        let loaded = sample_grid();
        let peaks = sample_peaks();
        for value in [0.5, 1.0] {
            let out = render(&loaded, &peaks, &request(Some(value), 1), gauss).unwrap();
            let max = out.heatmap.slice.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!((max - 1.0).abs() < 1e-12);
            assert!(out.heatmap.slice.values.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn heatmap_extent_markers_and_colorbar() {
        let loaded = sample_grid();
        let out = render(&loaded, &sample_peaks(), &request(Some(0.5), 2), gauss).unwrap();
        let hm = &out.heatmap;

        assert_eq!(
            hm.extent,
            Extent {
                x_min: 1.0,
                x_max: 3.0,
                y_min: 10.0,
                y_max: 20.0
            }
        );
        assert_eq!(hm.title, "Δ at w = 0.5 nm for sample");
        assert_eq!(hm.markers.len(), 2);
        assert_eq!(hm.markers[0].position, [1.0, 10.0]);
        assert_eq!(hm.markers[1].position, [3.0, 20.0]);
        assert_eq!(hm.markers[1].color, peak_color(1));

        let ticks: Vec<f64> = hm.colorbar.ticks.iter().map(|t| t.0).collect();
        assert_eq!(ticks, COLORBAR_TICKS.to_vec());
        assert!((hm.colorbar.rect.x_min - 1.9).abs() < 1e-12);
        assert!((hm.colorbar.rect.y_min - 19.1).abs() < 1e-12);
        assert!((hm.colorbar.ticks[4].1 - hm.colorbar.rect.x_max).abs() < 1e-12);
    }

    #[test]
    fn missing_peak_at_slice_is_skipped() {
        let loaded = sample_grid();
        let out = render(&loaded, &sample_peaks(), &request(Some(1.0), 2), gauss).unwrap();
        assert_eq!(out.heatmap.markers.len(), 1);
        assert_eq!(out.spectrum.boundaries.len(), 2);
        assert_eq!(out.spectrum.labels.len(), 2);
    }

    #[test]
    fn spectrum_boundaries_and_labels() {
        let loaded = sample_grid();
        let out = render(&loaded, &sample_peaks(), &request(Some(0.5), 2), gauss).unwrap();
        let sp = &out.spectrum;

        assert_eq!(sp.reference, vec![[1.0, 0.5], [2.0, 1.0], [3.0, 0.25]]);
        assert_eq!(sp.x_range, (1.0, 3.0));
        assert_eq!(sp.y_range, (0.0, SPECTRUM_Y_MAX));
        assert_eq!(sp.boundaries.len(), 4);

        for curve in &sp.boundaries {
            assert_eq!(curve.points.len(), BOUNDARY_SAMPLES);
            assert_eq!(curve.points[0][0], 1.0);
            assert!((curve.points[BOUNDARY_SAMPLES - 1][0] - 3.0).abs() < 1e-12);
            // Unit-height lineshape.
            assert!(curve.points.iter().all(|p| p[1] <= 1.0 + 1e-12));
        }

        // Peak 0 at center 1, width 10: boundaries at -4 and 6.
        let lower = &sp.boundaries[0];
        let expected = 0.5 * (2.0 * PI).sqrt() * gauss(1.0, 0.5, -4.0);
        assert!((lower.points[0][1] - expected).abs() < 1e-15);

        assert_eq!(sp.labels[0].position, [-4.0, 1.12]);
        assert_eq!(sp.labels[0].text, "λ₀ = 1 nm");
        assert_eq!(sp.labels[1].position, [-4.0, 1.07]);
        assert_eq!(sp.labels[1].text, "Δλ = 10 nm");
        assert_eq!(sp.caption.text, "w = 0.5 nm");
    }

    #[test]
    fn too_many_peaks_is_contract_violation() {
        let loaded = sample_grid();
        let err = render(&loaded, &sample_peaks(), &request(None, 3), gauss).unwrap_err();
        assert!(matches!(
            err,
            GridError::PeakCountMismatch {
                requested: 3,
                available: 2
            }
        ));
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
