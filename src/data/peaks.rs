use std::cmp::Ordering;
use std::f64::consts::PI;

use ndarray::{Array2, ArrayView2};

use super::model::{Axes, ResultGrid};

// ---------------------------------------------------------------------------
// Lineshape
// ---------------------------------------------------------------------------

/// Area-normalised Gaussian of standard deviation `width` centred on `center`.
pub fn gauss(x: f64, width: f64, center: f64) -> f64 {
    let z = (x - center) / width;
    (-0.5 * z * z).exp() / (width * (2.0 * PI).sqrt())
}

// ---------------------------------------------------------------------------
// PeakSet – best-fit peaks per tertiary sample
// ---------------------------------------------------------------------------

/// One peak at one tertiary sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakRow {
    /// Grid value at the peak.
    pub value: f64,
    /// Primary-axis (`l0`) coordinate.
    pub center: f64,
    /// Secondary-axis (`dl`) coordinate.
    pub width: f64,
}

/// `peaks[j][k]` is peak `j` at tertiary sample `k`, if one was found there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakSet {
    peaks: Vec<Vec<Option<PeakRow>>>,
}

impl PeakSet {
    pub fn new(peaks: Vec<Vec<Option<PeakRow>>>) -> Self {
        PeakSet { peaks }
    }

    /// Number of peak tables.
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }

    pub fn row(&self, peak: usize, k: usize) -> Option<PeakRow> {
        self.peaks.get(peak).and_then(|t| t.get(k)).copied().flatten()
    }
}

/// Searches the full grid for the best peaks at every tertiary sample.
pub trait PeakFinder {
    fn find_optimum_peaks(&self, axes: &Axes, grid: &ResultGrid, peak_count: usize) -> PeakSet;
}

// ---------------------------------------------------------------------------
// Local-maxima search
// ---------------------------------------------------------------------------

/// Takes the `peak_count` highest local maxima of each slice over the
/// (primary, secondary) plane, ordered by center.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMaximaFinder;

impl PeakFinder for LocalMaximaFinder {
    fn find_optimum_peaks(&self, axes: &Axes, grid: &ResultGrid, peak_count: usize) -> PeakSet {
        let (_, _, n) = grid.shape();
        let mut peaks = vec![vec![None; n]; peak_count];

        for k in 0..n {
            let slice = grid.slice_view(k);
            let mut maxima: Vec<(usize, usize)> = local_maxima(slice);
            maxima.sort_by(|&a, &b| slice[b].partial_cmp(&slice[a]).unwrap_or(Ordering::Equal));
            maxima.truncate(peak_count);
            // Number peaks by center so a peak keeps its colour across slices.
            maxima.sort_by_key(|&(r, c)| (c, r));

            for (j, &(r, c)) in maxima.iter().enumerate() {
                peaks[j][k] = Some(PeakRow {
                    value: grid.get(r, c, k),
                    center: axes.primary.values()[c],
                    width: axes.secondary.values()[r],
                });
            }
        }

        let found = peaks.iter().filter(|t| t.iter().any(Option::is_some)).count();
        log::info!("Peak search: {found} of {peak_count} peaks found in at least one slice");
        PeakSet::new(peaks)
    }
}

/// `(row, col)` of every local maximum of a slice.
///
/// Equal-valued cells that touch (8-neighbourhood) form one plateau. A plateau
/// is a maximum when no cell bordering it is higher, and it is reported once,
/// at its first cell in scan order.
fn local_maxima(slice: ArrayView2<'_, f64>) -> Vec<(usize, usize)> {
    let (rows, cols) = slice.dim();
    let mut visited = Array2::from_elem((rows, cols), false);
    let mut found = Vec::new();
    let mut stack = Vec::new();

    for ((r, c), &v) in slice.indexed_iter() {
        if visited[[r, c]] || v.is_nan() {
            continue;
        }
        visited[[r, c]] = true;
        stack.push((r, c));
        let mut is_max = true;

        while let Some((pr, pc)) = stack.pop() {
            for (nr, nc) in neighbours(pr, pc, rows, cols) {
                let nv = slice[[nr, nc]];
                if nv > v {
                    is_max = false;
                } else if nv == v && !visited[[nr, nc]] {
                    visited[[nr, nc]] = true;
                    stack.push((nr, nc));
                }
            }
        }

        if is_max {
            found.push((r, c));
        }
    }
    found
}

/// In-bounds 8-neighbours of `(r, c)`.
fn neighbours(r: usize, c: usize, rows: usize, cols: usize) -> impl Iterator<Item = (usize, usize)> {
    let rs = r.saturating_sub(1)..=(r + 1).min(rows - 1);
    rs.flat_map(move |nr| {
        let cs = c.saturating_sub(1)..=(c + 1).min(cols - 1);
        cs.map(move |nc| (nr, nc))
    })
    .filter(move |&n| n != (r, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::AxisVector;
    use ndarray::array;
    use std::path::Path;

    fn axes(l0: Vec<f64>, dl: Vec<f64>, w: Vec<f64>) -> Axes {
        Axes {
            primary: AxisVector::new(l0).unwrap(),
            secondary: AxisVector::new(dl).unwrap(),
            tertiary: AxisVector::new(w).unwrap(),
        }
    }

    #[test]
    fn gauss_is_normalized_and_peaks_at_center() {
        let width = 2.0;
        let peak = gauss(5.0, width, 5.0);
        assert!((peak * width * (2.0 * PI).sqrt() - 1.0).abs() < 1e-12);
        assert!(gauss(6.0, width, 5.0) < peak);
        assert!((gauss(4.0, width, 5.0) - gauss(6.0, width, 5.0)).abs() < 1e-15);

        // Riemann sum over ±10σ.
        let dx = 0.01;
        let area: f64 = (-2000..=2000).map(|i| gauss(i as f64 * dx, width, 0.0) * dx).sum();
        assert!((area - 1.0).abs() < 1e-6);
    }

    #[test]
    fn finds_two_peaks_ordered_by_center() {
        let axes = axes(
            vec![400.0, 450.0, 500.0, 550.0, 600.0],
            vec![10.0, 20.0, 30.0],
            vec![1.0],
        );
        let mut grid = ResultGrid::zeros(3, 5, 1);
        let values = array![
            [0.0, 0.1, 0.0, 0.2, 0.0],
            [0.1, 0.3, 0.1, 0.9, 0.1],
            [0.0, 0.1, 0.0, 0.2, 0.0],
        ];
        grid.set_slice(0, &values, Path::new("s")).unwrap();

        let set = LocalMaximaFinder.find_optimum_peaks(&axes, &grid, 2);
        assert_eq!(set.peak_count(), 2);
        let p0 = set.row(0, 0).unwrap();
        let p1 = set.row(1, 0).unwrap();
        assert_eq!((p0.center, p0.width, p0.value), (450.0, 20.0, 0.3));
        assert_eq!((p1.center, p1.width, p1.value), (550.0, 20.0, 0.9));
    }

    #[test]
    fn missing_peaks_are_left_empty() {
        let axes = axes(vec![1.0, 2.0, 3.0], vec![1.0, 2.0], vec![1.0]);
        let mut grid = ResultGrid::zeros(2, 3, 1);
        let values = array![[0.0, 1.0, 0.0], [0.0, 0.5, 0.0]];
        grid.set_slice(0, &values, Path::new("s")).unwrap();

        let set = LocalMaximaFinder.find_optimum_peaks(&axes, &grid, 3);
        assert_eq!(set.peak_count(), 3);
        assert!(set.row(0, 0).is_some());
        assert!(set.row(1, 0).is_none());
        assert!(set.row(2, 0).is_none());
        assert!(set.row(7, 0).is_none());
    }

    #[test]
    fn plateau_counts_once() {
        let slice = array![[1.0, 1.0], [1.0, 1.0]];
        assert_eq!(local_maxima(slice.view()), vec![(0, 0)]);
    }

    #[test]
    fn flat_region_rising_elsewhere_is_not_a_peak() {
        let axes = axes(vec![1.0, 2.0, 3.0, 4.0], vec![10.0, 20.0], vec![1.0]);
        let mut grid = ResultGrid::zeros(2, 4, 1);
        let values = array![[0.0, 0.0, 0.0, 5.0], [0.0, 0.0, 0.0, 1.0]];
        grid.set_slice(0, &values, Path::new("s")).unwrap();

        assert_eq!(local_maxima(grid.slice_view(0)), vec![(0, 3)]);

        let set = LocalMaximaFinder.find_optimum_peaks(&axes, &grid, 2);
        let p0 = set.row(0, 0).unwrap();
        assert_eq!((p0.center, p0.width, p0.value), (4.0, 10.0, 5.0));
        assert!(set.row(1, 0).is_none());
    }

    #[test]
    fn raised_plateau_is_one_peak() {
        let slice = array![
            [0.0, 0.0, 0.0, 0.0, 0.0],
            [0.0, 2.0, 2.0, 0.0, 0.0],
            [0.0, 2.0, 0.0, 0.0, 1.0],
        ];
        assert_eq!(local_maxima(slice.view()), vec![(1, 1), (2, 4)]);
    }
}
