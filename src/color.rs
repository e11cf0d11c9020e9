use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{IntoColor, LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Named colours used by the fixed panels
// ---------------------------------------------------------------------------

pub const CORAL: Color32 = Color32::from_rgb(255, 127, 80);
pub const TOMATO: Color32 = Color32::from_rgb(255, 99, 71);
pub const LIGHT_SALMON: Color32 = Color32::from_rgb(255, 160, 122);
pub const MEDIUM_BLUE: Color32 = Color32::from_rgb(0, 0, 205);
/// First colour of the ColorBrewer Set1 palette.
pub const SET1_RED: Color32 = Color32::from_rgb(228, 26, 28);

const SUNSET: [(u8, u8, u8); 7] = [
    (243, 231, 155),
    (250, 196, 132),
    (248, 160, 126),
    (235, 127, 134),
    (206, 102, 147),
    (160, 89, 160),
    (92, 83, 165),
];

const PLASMA: [(u8, u8, u8); 10] = [
    (13, 8, 135),
    (70, 3, 159),
    (114, 1, 168),
    (156, 23, 158),
    (189, 55, 134),
    (216, 87, 107),
    (237, 121, 83),
    (251, 159, 58),
    (253, 202, 38),
    (240, 249, 33),
];

/// Apply an opacity in [0, 1] to an opaque colour.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let [r, g, b, _] = color.to_array();
    Color32::from_rgba_unmultiplied(r, g, b, (opacity.clamp(0.0, 1.0) * 255.0) as u8)
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Piecewise-linear colour scale, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<LinSrgb>,
}

impl ColorScale {
    fn from_rgb(stops: &[(u8, u8, u8)]) -> Self {
        let stops = stops
            .iter()
            .map(|&(r, g, b)| {
                let srgb = Srgb::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                srgb.into_color()
            })
            .collect();
        ColorScale { stops }
    }

    pub fn sunset() -> Self {
        Self::from_rgb(&SUNSET)
    }

    pub fn plasma() -> Self {
        Self::from_rgb(&PLASMA)
    }

    /// Colour at position `t` in [0, 1]. NaN maps to grey.
    pub fn at(&self, t: f64) -> Color32 {
        if t.is_nan() || self.stops.is_empty() {
            return Color32::GRAY;
        }
        let t = t.clamp(0.0, 1.0) as f32;
        let last = self.stops.len() - 1;
        let pos = t * last as f32;
        let idx = (pos.floor() as usize).min(last);
        let next = (idx + 1).min(last);
        let mixed = self.stops[idx].mix(self.stops[next], pos - idx as f32);
        to_color32(mixed)
    }

    /// Colour for `value` on a scale spanning `min..=max`.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Color32 {
        let span = max - min;
        if span.abs() < f64::EPSILON {
            return self.at(0.5);
        }
        self.at((value - min) / span)
    }
}

fn to_color32(color: LinSrgb) -> Color32 {
    let rgb: Srgb = color.into_color();
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Category mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (genres) to colours, cycling through the sunset stops
/// in first-appearance order.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryColors {
    pub fn new(labels: &[String]) -> Self {
        let mapping = labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let (r, g, b) = SUNSET[i % SUNSET.len()];
                (label.clone(), Color32::from_rgb(r, g, b))
            })
            .collect();

        CategoryColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_endpoints() {
        let sunset = ColorScale::sunset();
        assert_eq!(sunset.at(0.0), Color32::from_rgb(243, 231, 155));
        assert_eq!(sunset.at(1.0), Color32::from_rgb(92, 83, 165));
        // Out-of-range positions clamp.
        assert_eq!(sunset.at(-3.0), sunset.at(0.0));
        assert_eq!(sunset.at(7.0), sunset.at(1.0));
        assert_eq!(sunset.at(f64::NAN), Color32::GRAY);
    }

    #[test]
    fn test_scale_map_hits_stops() {
        let plasma = ColorScale::plasma();
        assert_eq!(plasma.map(-1.0, -1.0, 1.0), Color32::from_rgb(13, 8, 135));
        assert_eq!(plasma.map(1.0, -1.0, 1.0), Color32::from_rgb(240, 249, 33));
        assert_eq!(plasma.map(3.0, 3.0, 3.0), plasma.at(0.5));
    }

    #[test]
    fn test_category_colors_cycle() {
        let labels: Vec<String> = (0..9).map(|i| format!("genre {i}")).collect();
        let colors = CategoryColors::new(&labels);
        assert_eq!(colors.color_for("genre 0"), colors.color_for("genre 7"));
        assert_ne!(colors.color_for("genre 0"), colors.color_for("genre 1"));
        assert_eq!(colors.color_for("unknown"), Color32::GRAY);
        assert_eq!(colors.color_for("genre 8"), colors.color_for("genre 1"));
    }

    #[test]
    fn test_with_opacity() {
        assert_eq!(with_opacity(CORAL, 0.6).a(), 153);
    }
}
