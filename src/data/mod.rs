/// Data layer: core types, loading, and peak search.
///
/// Architecture:
/// ```text
///  l0.txt  dl.txt  w.txt  spectrum.txt  Delta_{i}.txt
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  resolve directory → parse tables → LoadedGrid
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ LoadedGrid  │  Axes, ResultGrid, SpectrumTable
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  peaks    │  best (center, width) per peak per w sample → PeakSet
///   └──────────┘
/// ```

pub mod error;
pub mod loader;
pub mod model;
pub mod peaks;
