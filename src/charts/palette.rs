//! Classification palette shared by the interactive and static charts.

use crate::data::Classification;
use egui::Color32;

/// (r, g, b) per classification.
pub const fn classification_rgb(classification: Classification) -> (u8, u8, u8) {
    match classification {
        Classification::Real => (46, 204, 113),    // #2ecc71
        Classification::Sweeps => (52, 152, 219),  // #3498db
        Classification::Both => (241, 196, 15),    // #f1c40f
        Classification::Other => (189, 195, 199),  // #bdc3c7
    }
}

pub fn classification_color(classification: Classification) -> Color32 {
    let (r, g, b) = classification_rgb(classification);
    Color32::from_rgb(r, g, b)
}

pub const REAL_COLOR: Color32 = Color32::from_rgb(46, 204, 113);
pub const SWEEPS_COLOR: Color32 = Color32::from_rgb(52, 152, 219);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_matches_fixed_colors() {
        assert_eq!(classification_rgb(Classification::Real), (0x2e, 0xcc, 0x71));
        assert_eq!(classification_rgb(Classification::Sweeps), (0x34, 0x98, 0xdb));
        assert_eq!(classification_rgb(Classification::Both), (0xf1, 0xc4, 0x0f));
        assert_eq!(classification_rgb(Classification::Other), (0xbd, 0xc3, 0xc7));
    }

    #[test]
    fn brand_colors_follow_classification() {
        assert_eq!(REAL_COLOR, classification_color(Classification::Real));
        assert_eq!(SWEEPS_COLOR, classification_color(Classification::Sweeps));
    }
}
