use ndarray::{s, Array2};

use crate::data::model::{AxisVector, ResultGrid};

/// Index of the displayed tertiary sample for a requested value.
///
/// Picks the first sample at or above `requested` and clamps past either end
/// of the axis, so the result is always a computed sample. `None` picks the
/// largest sample.
pub fn select_slice(axis: &AxisVector, requested: Option<f64>) -> usize {
    let last = axis.len() - 1;
    match requested {
        None => last,
        Some(value) => axis.values().partition_point(|&w| w < value).min(last),
    }
}

// ---------------------------------------------------------------------------
// DisplaySlice – one normalised, display-oriented slice
// ---------------------------------------------------------------------------

/// A grid slice scaled by its own maximum, rows ordered top-down for display.
///
/// Storage puts the smallest secondary value in row 0; display row 0 is the
/// largest, so the secondary axis reads upward.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySlice {
    /// Top row first.
    pub values: Array2<f64>,
    /// The maximum the slice was divided by.
    pub scale: f64,
}

impl DisplaySlice {
    pub fn from_grid(grid: &ResultGrid, k: usize) -> Self {
        let raw = grid.slice_view(k);
        let max = raw
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);

        let scale = if max.is_finite() && max > 0.0 {
            max
        } else {
            log::warn!("Slice {k} has no positive maximum ({max}); showing raw values");
            1.0
        };

        DisplaySlice {
            values: raw.slice(s![..;-1, ..]).mapv(|v| v / scale),
            scale,
        }
    }

    /// `(rows, cols)` of the slice.
    pub fn dim(&self) -> (usize, usize) {
        self.values.dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::path::Path;

    fn w_axis() -> AxisVector {
        AxisVector::new(vec![0.5, 1.0]).unwrap()
    }

    #[test]
    fn selects_nearest_at_or_after() {
        let w = w_axis();
        assert_eq!(select_slice(&w, Some(0.7)), 1);
        assert_eq!(select_slice(&w, Some(0.5)), 0);
        assert_eq!(select_slice(&w, Some(1.0)), 1);
        assert_eq!(select_slice(&w, None), 1);
    }

    #[test]
    fn out_of_range_requests_clamp() {
        let w = w_axis();
        assert_eq!(select_slice(&w, Some(-5.0)), 0);
        assert_eq!(select_slice(&w, Some(5.0)), 1);
    }

    #[test]
    fn selection_is_monotonic() {
        let w = AxisVector::new(vec![0.1, 0.4, 0.9, 1.6, 2.5]).unwrap();
        let mut last = 0;
        for i in -10..40 {
            let k = select_slice(&w, Some(i as f64 * 0.1));
            assert!(k >= last);
            last = k;
        }
        assert_eq!(last, 4);
    }

    fn two_slice_grid() -> ResultGrid {
        let mut grid = ResultGrid::zeros(2, 3, 2);
        let s0 = array![[1.0, 2.0, 3.0], [4.0, 5.0, 8.0]];
        let s1 = Array2::zeros((2, 3));
        grid.set_slice(0, &s0, Path::new("Delta_0.txt")).unwrap();
        grid.set_slice(1, &s1, Path::new("Delta_1.txt")).unwrap();
        grid
    }

    #[test]
    fn display_slice_is_normalized_and_flipped() {
        let slice = DisplaySlice::from_grid(&two_slice_grid(), 0);
        assert_eq!(slice.scale, 8.0);
        // Top display row is the last storage row.
        assert_eq!(slice.dim(), (2, 3));
        assert_eq!(slice.values, array![[0.5, 0.625, 1.0], [0.125, 0.25, 0.375]]);

        let max = slice.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = slice.values.iter().copied().fold(f64::INFINITY, f64::min);
        assert!((max - 1.0).abs() < 1e-12);
        assert!(min >= 0.0);
    }

    #[test]
    fn all_zero_slice_is_left_unscaled() {
        let slice = DisplaySlice::from_grid(&two_slice_grid(), 1);
        assert_eq!(slice.scale, 1.0);
        assert!(slice.values.iter().all(|&v| v == 0.0));
    }
}
