//! Color-scale support for the map layers.
//!
//! The census bundle supplies the value range; this module turns a segment
//! value into a gradient color for the renderer. Colors follow the viewer's
//! palette (gradient from the d3 YlGn scheme).

use crate::census::DataCensus;

pub const COLOR_YELLOW: &str = "#DAD887";
pub const COLOR_TEAL: &str = "#3BC1A8";
pub const COLOR_RED: &str = "#F63049";
/// Fallback for segments with no data.
pub const COLOR_GRAY: &str = "#e6e6e6";

pub const COLOR_GRADIENT: [&str; 11] = [
    "#ffffe5", "#f7fcc4", "#e4f4ac", "#c7e89b", "#a2d88a", "#78c578", "#4eaf63", "#2f944e",
    "#15793f", "#036034", "#004529",
];

/// Maps a segment value onto the gradient, scaled linearly between the
/// census min and max. Out-of-range values clamp to the gradient ends, and
/// non-positive values (absent data) map to [`COLOR_GRAY`].
pub fn gradient_color(value: f64, census: &DataCensus) -> &'static str {
    if value <= 0.0 {
        return COLOR_GRAY;
    }

    let span = census.max - census.min;
    if span <= 0.0 {
        // Degenerate range: every valid segment gets the top color.
        return COLOR_GRADIENT[COLOR_GRADIENT.len() - 1];
    }

    let t = ((value - census.min) / span).clamp(0.0, 1.0);
    let idx = (t * (COLOR_GRADIENT.len() - 1) as f64).floor() as usize;
    COLOR_GRADIENT[idx]
}
