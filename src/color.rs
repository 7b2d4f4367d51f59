use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Peak palette
// ---------------------------------------------------------------------------

/// Fixed per-peak colours (the familiar tab10 cycle).
const PEAK_COLORS: [(u8, u8, u8); 6] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
];

/// Colour of peak `j`; wraps around past the end of the palette.
pub fn peak_color(j: usize) -> Color32 {
    let (r, g, b) = PEAK_COLORS[j % PEAK_COLORS.len()];
    Color32::from_rgb(r, g, b)
}

// ---------------------------------------------------------------------------
// Viridis colour map
// ---------------------------------------------------------------------------

const VIRIDIS_STOPS: [(u8, u8, u8); 9] = [
    (68, 1, 84),
    (71, 44, 122),
    (59, 81, 139),
    (44, 113, 142),
    (33, 144, 141),
    (39, 173, 129),
    (92, 200, 99),
    (170, 220, 50),
    (253, 231, 37),
];

fn stop_linear(i: usize) -> LinSrgb {
    let (r, g, b) = VIRIDIS_STOPS[i];
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

/// Map `t` in `[0, 1]` onto viridis; values outside are clamped and NaN maps
/// to the low end.
pub fn viridis(t: f64) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 };
    let segs = (VIRIDIS_STOPS.len() - 1) as f32;
    let x = t * segs;
    let i = (x.floor() as usize).min(VIRIDIS_STOPS.len() - 2);
    let f = x - i as f32;

    let lin = stop_linear(i).mix(stop_linear(i + 1), f);
    let rgb: Srgb = lin.into_color();
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// RGBA bytes of `values` under viridis, in the same order.
pub fn viridis_rgba<I: IntoIterator<Item = f64>>(values: I) -> Vec<u8> {
    values
        .into_iter()
        .flat_map(|v| viridis(v).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peak_colors_cycle() {
        assert_eq!(peak_color(0), peak_color(6));
        assert_ne!(peak_color(0), peak_color(1));
    }

    #[test]
    fn viridis_hits_end_stops() {
        assert_eq!(viridis(0.0), Color32::from_rgb(68, 1, 84));
        assert_eq!(viridis(1.0), Color32::from_rgb(253, 231, 37));
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(viridis(f64::NAN), viridis(0.0));
    }

    #[test]
    fn viridis_rgba_is_opaque() {
        let px = viridis_rgba([0.0, 0.5, 1.0]);
        assert_eq!(px.len(), 12);
        assert!(px.chunks(4).all(|p| p[3] == 255));
    }
}
