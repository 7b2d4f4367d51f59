use std::path::{Path, PathBuf};

use ndarray::Array2;

use super::error::{GridError, GridResult};
use super::model::{Axes, AxisVector, LoadedGrid, ResultGrid, SpectrumTable, Table};

/// Roots searched, in order, when a result directory is not found as given.
pub const DEFAULT_FALLBACK_ROOTS: &[&str] = &["calculations"];

pub const PRIMARY_AXIS_FILE: &str = "l0.txt";
pub const SECONDARY_AXIS_FILE: &str = "dl.txt";
pub const TERTIARY_AXIS_FILE: &str = "w.txt";
pub const SPECTRUM_FILE: &str = "spectrum.txt";

/// File holding the `i`-th tertiary slice.
pub fn slice_file_name(i: usize) -> String {
    format!("Delta_{i}.txt")
}

// ---------------------------------------------------------------------------
// Directory resolution
// ---------------------------------------------------------------------------

/// Ordered candidate locations for `name`: the path itself, then `root/name`
/// for each fallback root.
pub fn candidate_paths<P: AsRef<Path>>(name: &Path, fallback_roots: &[P]) -> Vec<PathBuf> {
    std::iter::once(name.to_path_buf())
        .chain(fallback_roots.iter().map(|root| root.as_ref().join(name)))
        .collect()
}

/// Return the first candidate location of `name` that is an existing directory.
pub fn resolve_directory<P: AsRef<Path>>(name: &Path, fallback_roots: &[P]) -> GridResult<PathBuf> {
    let candidates = candidate_paths(name, fallback_roots);
    match candidates.iter().find(|p| p.is_dir()) {
        Some(found) => Ok(found.clone()),
        None => Err(GridError::DirectoryNotFound {
            name: name.display().to_string(),
            searched: candidates,
        }),
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Resolve `name` against the fallback roots and load the saved sweep there.
pub fn load<P: AsRef<Path>>(name: &Path, fallback_roots: &[P]) -> GridResult<LoadedGrid> {
    let dir = resolve_directory(name, fallback_roots)?;
    if dir.as_path() != name {
        log::info!("{} not found, using {}", name.display(), dir.display());
    }
    load_resolved(&dir)
}

/// Load a saved sweep from an already-resolved directory.
///
/// All or nothing: any unreadable, malformed or mis-shaped file aborts the
/// load and no grid is returned.
pub fn load_resolved(dir: &Path) -> GridResult<LoadedGrid> {
    let primary = read_axis(&dir.join(PRIMARY_AXIS_FILE))?;
    let secondary = read_axis(&dir.join(SECONDARY_AXIS_FILE))?;
    let tertiary = read_axis(&dir.join(TERTIARY_AXIS_FILE))?;

    // Independent of the sweep axes, so no shape check beyond two columns.
    let spectrum_path = dir.join(SPECTRUM_FILE);
    let spectrum_table = read_table(&spectrum_path)?;
    if spectrum_table.ncols() != 2 {
        return Err(GridError::malformed(
            &spectrum_path,
            format!("expected 2 columns, found {}", spectrum_table.ncols()),
        ));
    }
    let spectrum = SpectrumTable::from_table(&spectrum_table);

    let rows = secondary.len();
    let cols = primary.len();
    let n = tertiary.len();
    log::info!(
        "Loading {}: {rows} x {cols} grid, {n} slices, {} spectrum points",
        dir.display(),
        spectrum.len()
    );

    let mut grid = ResultGrid::zeros(rows, cols, n);
    for i in 0..n {
        let path = dir.join(slice_file_name(i));
        let table = read_table(&path)?;
        grid.set_slice(i, &table, &path)?;
        log::debug!("Loaded slice {i} from {}", path.display());
    }

    Ok(LoadedGrid {
        source: dir.to_path_buf(),
        axes: Axes {
            primary,
            secondary,
            tertiary,
        },
        grid,
        spectrum,
    })
}

// ---------------------------------------------------------------------------
// Whitespace-delimited text tables
// ---------------------------------------------------------------------------

fn read_text(path: &Path) -> GridResult<String> {
    std::fs::read_to_string(path).map_err(|e| GridError::malformed(path, format!("cannot read: {e}")))
}

/// Read a 1D axis file. Values may be laid out as one row or one column.
pub fn read_axis(path: &Path) -> GridResult<AxisVector> {
    let table = parse_table(&read_text(path)?).map_err(|reason| GridError::malformed(path, reason))?;
    let (rows, cols) = table.dim();
    if rows > 1 && cols > 1 {
        return Err(GridError::malformed(
            path,
            format!("expected a 1D axis, found a {rows}x{cols} table"),
        ));
    }
    AxisVector::new(table.iter().copied().collect()).map_err(|reason| GridError::malformed(path, reason))
}

/// Read a rectangular 2D table.
pub fn read_table(path: &Path) -> GridResult<Table> {
    parse_table(&read_text(path)?).map_err(|reason| GridError::malformed(path, reason))
}

/// Parse whitespace-separated numbers, one table row per line.
///
/// Blank lines and lines starting with `#` are skipped; anything after a `#`
/// on a data line is a comment.
pub fn parse_table(text: &str) -> Result<Table, String> {
    let mut cols: Option<usize> = None;
    let mut values = Vec::new();
    let mut rows = 0;

    for (line_no, line) in text.lines().enumerate() {
        let data = line.split('#').next().unwrap_or("").trim();
        if data.is_empty() {
            continue;
        }

        let before = values.len();
        for tok in data.split_whitespace() {
            let v = tok
                .parse::<f64>()
                .map_err(|_| format!("line {}: '{tok}' is not a number", line_no + 1))?;
            values.push(v);
        }
        let n = values.len() - before;

        match cols {
            None => cols = Some(n),
            Some(c) if c != n => {
                return Err(format!(
                    "line {}: expected {c} columns, found {n}",
                    line_no + 1
                ));
            }
            Some(_) => {}
        }
        rows += 1;
    }

    let cols = cols.ok_or_else(|| "no numeric data".to_string())?;
    Array2::from_shape_vec((rows, cols), values).map_err(|e| e.to_string())
}
