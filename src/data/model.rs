use std::path::{Path, PathBuf};

use ndarray::{s, Array2, Array3, ArrayView2};

use super::error::{GridError, GridResult};

// ---------------------------------------------------------------------------
// AxisVector – samples of one swept parameter
// ---------------------------------------------------------------------------

/// Sample values of one sweep axis, strictly ascending.
///
/// The ordering is what makes nearest-sample lookup a sorted search, so the
/// only way to build one is through [`AxisVector::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct AxisVector(Vec<f64>);

impl AxisVector {
    /// Validate and wrap axis samples. Returns the reason on rejection.
    pub fn new(values: Vec<f64>) -> Result<Self, String> {
        if values.is_empty() {
            return Err("axis has no samples".to_string());
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(format!("axis sample {i} is not finite"));
        }
        if let Some(i) = values.windows(2).position(|w| w[0] >= w[1]) {
            return Err(format!(
                "axis is not strictly ascending at sample {} ({} >= {})",
                i + 1,
                values[i],
                values[i + 1]
            ));
        }
        Ok(AxisVector(values))
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn min(&self) -> f64 {
        self.0[0]
    }

    pub fn max(&self) -> f64 {
        self.0[self.0.len() - 1]
    }
}

/// The three sweep axes of one calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Axes {
    /// `l0` – grid columns.
    pub primary: AxisVector,
    /// `dl` – grid rows.
    pub secondary: AxisVector,
    /// `w` – one slice per sample.
    pub tertiary: AxisVector,
}

// ---------------------------------------------------------------------------
// Table – dense 2D numeric table
// ---------------------------------------------------------------------------

/// One parsed text table, `rows × cols`.
pub type Table = Array2<f64>;

// ---------------------------------------------------------------------------
// ResultGrid – the reconstructed 3D sweep result
// ---------------------------------------------------------------------------

/// A `rows × cols × n` grid indexed as `[secondary, primary, tertiary]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultGrid {
    data: Array3<f64>,
}

impl ResultGrid {
    pub fn zeros(rows: usize, cols: usize, slices: usize) -> Self {
        ResultGrid {
            data: Array3::zeros((rows, cols, slices)),
        }
    }

    /// `(rows, cols, slices)` = `(|dl|, |l0|, |w|)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn get(&self, row: usize, col: usize, k: usize) -> f64 {
        self.data[[row, col, k]]
    }

    /// Overwrite the `k`-th tertiary slice with `table`.
    ///
    /// `path` only labels the error when the table has the wrong shape.
    pub fn set_slice(&mut self, k: usize, table: &Table, path: &Path) -> GridResult<()> {
        let (rows, cols, _) = self.data.dim();
        if table.dim() != (rows, cols) {
            return Err(GridError::ShapeMismatch {
                path: path.to_path_buf(),
                expected: (rows, cols),
                found: table.dim(),
            });
        }
        self.data.slice_mut(s![.., .., k]).assign(table);
        Ok(())
    }

    /// View of the `k`-th tertiary slice in storage orientation.
    pub fn slice_view(&self, k: usize) -> ArrayView2<'_, f64> {
        self.data.slice(s![.., .., k])
    }

    /// Owned copy of the `k`-th tertiary slice.
    pub fn slice(&self, k: usize) -> Table {
        self.slice_view(k).to_owned()
    }
}

// ---------------------------------------------------------------------------
// SpectrumTable – reference input spectrum
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumTable {
    pub wavelength: Vec<f64>,
    pub intensity: Vec<f64>,
}

impl SpectrumTable {
    pub fn from_table(table: &Table) -> Self {
        SpectrumTable {
            wavelength: table.column(0).to_vec(),
            intensity: table.column(1).to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.wavelength.len()
    }

    /// Intensity divided by its maximum. A non-positive maximum leaves the
    /// values as they are.
    pub fn normalized(&self) -> Vec<f64> {
        let max = self
            .intensity
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max);
        if max.is_finite() && max > 0.0 {
            self.intensity.iter().map(|&v| v / max).collect()
        } else {
            self.intensity.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// LoadedGrid – what the loader hands to the visualizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LoadedGrid {
    /// Directory the files were actually read from.
    pub source: PathBuf,
    pub axes: Axes,
    pub grid: ResultGrid,
    pub spectrum: SpectrumTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn axis_rejects_unsorted_and_empty() {
        assert!(AxisVector::new(vec![]).is_err());
        assert!(AxisVector::new(vec![1.0, 1.0]).is_err());
        assert!(AxisVector::new(vec![2.0, 1.0]).is_err());
        assert!(AxisVector::new(vec![1.0, f64::NAN]).is_err());
        let axis = AxisVector::new(vec![0.5, 1.0, 4.0]).unwrap();
        assert_eq!(axis.min(), 0.5);
        assert_eq!(axis.max(), 4.0);
    }

    #[test]
    fn set_slice_writes_only_its_region() {
        let mut grid = ResultGrid::zeros(2, 3, 2);
        let t = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        grid.set_slice(1, &t, Path::new("Delta_1.txt")).unwrap();

        assert!(grid.slice_view(0).iter().all(|&v| v == 0.0));
        assert_eq!(grid.slice(1), t);
        assert_eq!(grid.get(1, 0, 1), 4.0);
        assert_eq!(grid.get(0, 2, 1), 3.0);
    }

    #[test]
    fn set_slice_rejects_wrong_shape() {
        let mut grid = ResultGrid::zeros(2, 3, 1);
        let t = Table::zeros((3, 2));
        let err = grid.set_slice(0, &t, Path::new("Delta_0.txt")).unwrap_err();
        assert!(matches!(
            err,
            GridError::ShapeMismatch {
                expected: (2, 3),
                found: (3, 2),
                ..
            }
        ));
    }

    #[test]
    fn short_buffer_cannot_become_a_slice() {
        // A table's shape always matches its element count.
        assert!(Table::from_shape_vec((2, 3), vec![0.0; 5]).is_err());

        let mut grid = ResultGrid::zeros(2, 3, 2);
        let t = Table::from_elem((2, 2), 1.0);
        assert!(grid.set_slice(1, &t, Path::new("Delta_1.txt")).is_err());
        assert!(grid.slice_view(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn spectrum_normalizes_to_unit_max() {
        let s = SpectrumTable {
            wavelength: vec![400.0, 500.0, 600.0],
            intensity: vec![1.0, 4.0, 2.0],
        };
        assert_eq!(s.normalized(), vec![0.25, 1.0, 0.5]);
    }

    #[test]
    fn spectrum_reads_first_two_columns() {
        let t = array![[400.0, 1.0], [500.0, 2.0]];
        let s = SpectrumTable::from_table(&t);
        assert_eq!(s.wavelength, vec![400.0, 500.0]);
        assert_eq!(s.intensity, vec![1.0, 2.0]);
    }
}
