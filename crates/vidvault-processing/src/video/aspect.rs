//! Orientation classification from stream geometry.

use vidvault_core::models::{AspectLabel, StreamGeometry};

/// Absolute tolerance around each canonical ratio.
pub const TOLERANCE: f64 = 0.03;

const LANDSCAPE_16_9: f64 = 16.0 / 9.0;
const PORTRAIT_9_16: f64 = 9.0 / 16.0;

/// Classify a width/height ratio. Comparisons are strict, and 16:9 is checked first.
pub fn classify_ratio(ratio: f64) -> AspectLabel {
    if (ratio - LANDSCAPE_16_9).abs() < TOLERANCE {
        AspectLabel::Landscape16x9
    } else if (ratio - PORTRAIT_9_16).abs() < TOLERANCE {
        AspectLabel::Portrait9x16
    } else {
        AspectLabel::Other
    }
}

pub fn classify(geometry: StreamGeometry) -> AspectLabel {
    classify_ratio(geometry.ratio())
}
