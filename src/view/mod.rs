/// Display geometry: everything the plots need, computed without a UI.
///
/// `select` maps a requested w onto a computed slice and normalises it;
/// `panels` turns that slice plus the peak set into heatmap and spectrum
/// panel descriptions that `ui::plot` draws.

pub mod panels;
pub mod select;
