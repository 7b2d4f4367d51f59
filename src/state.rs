use std::path::{Path, PathBuf};

use crate::data::error::GridResult;
use crate::data::loader;
use crate::data::model::LoadedGrid;
use crate::data::peaks::{gauss, LocalMaximaFinder, PeakFinder, PeakSet};
use crate::view::panels::{render, RenderRequest, RenderedSlice};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded sweep (None until a directory loads).
    pub loaded: Option<LoadedGrid>,

    /// Peaks over the whole grid for the current peak count.
    pub peaks: PeakSet,

    /// What the panels should show.
    pub request: RenderRequest,

    /// Panels for the current request (cached).
    pub rendered: Option<RenderedSlice>,

    /// Bumped whenever `rendered` changes, so textures know to refresh.
    pub render_generation: u64,

    /// Roots tried when a directory name does not resolve as given.
    pub fallback_roots: Vec<PathBuf>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    finder: Box<dyn PeakFinder>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            loaded: None,
            peaks: PeakSet::default(),
            request: RenderRequest {
                title: String::new(),
                tertiary_value: None,
                peak_count: crate::cli::DEFAULT_PEAK_COUNT,
            },
            rendered: None,
            render_generation: 0,
            fallback_roots: loader::DEFAULT_FALLBACK_ROOTS.iter().map(PathBuf::from).collect(),
            status_message: None,
            finder: Box::new(LocalMaximaFinder),
        }
    }
}

impl AppState {
    #[cfg(test)]
    pub fn with_finder(finder: Box<dyn PeakFinder>) -> Self {
        Self {
            finder,
            ..Self::default()
        }
    }

    /// Ingest a newly loaded sweep: search peaks over the full grid, then render.
    pub fn set_loaded(&mut self, loaded: LoadedGrid, title: String) -> GridResult<()> {
        self.request.title = title;
        self.peaks = self
            .finder
            .find_optimum_peaks(&loaded.axes, &loaded.grid, self.request.peak_count);
        self.loaded = Some(loaded);
        self.status_message = None;
        self.rerender()
    }

    /// Resolve and load `name`, replacing the current sweep on success.
    pub fn open(&mut self, name: &Path) -> GridResult<()> {
        let loaded = loader::load(name, &self.fallback_roots)?;
        log::info!(
            "Loaded {} ({} slices)",
            loaded.source.display(),
            loaded.axes.tertiary.len()
        );
        self.set_loaded(loaded, name.display().to_string())
    }

    /// Show the slice nearest `value`. Peaks are unchanged.
    pub fn select_width(&mut self, value: Option<f64>) -> GridResult<()> {
        self.request.tertiary_value = value;
        self.rerender()
    }

    /// Change the peak count; the peak search reruns over the full grid.
    pub fn set_peak_count(&mut self, peak_count: usize) -> GridResult<()> {
        self.request.peak_count = peak_count;
        if let Some(loaded) = &self.loaded {
            self.peaks = self
                .finder
                .find_optimum_peaks(&loaded.axes, &loaded.grid, peak_count);
        }
        self.rerender()
    }

    /// Rebuild both panels for the current request.
    pub fn rerender(&mut self) -> GridResult<()> {
        let Some(loaded) = &self.loaded else {
            return Ok(());
        };
        let rendered = render(loaded, &self.peaks, &self.request, gauss)?;
        self.rendered = Some(rendered);
        self.render_generation += 1;
        Ok(())
    }

    /// Record a failure for display in the top bar.
    pub fn report(&mut self, context: &str, err: &dyn std::fmt::Display) {
        log::error!("{context}: {err}");
        self.status_message = Some(format!("Error: {context}: {err}"));
    }
}
