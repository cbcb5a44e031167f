//! Colors of PDF vector paths and their palette classification

use serde::Serialize;
use std::fmt;

/// An RGB color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Rgb { r, g, b }
    }

    /// DeviceGray value
    pub fn from_gray(gray: f64) -> Self {
        let v = gray.clamp(0.0, 1.0);
        Rgb::new(v, v, v)
    }

    /// Naive DeviceCMYK to RGB conversion
    pub fn from_cmyk(c: f64, m: f64, y: f64, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        Rgb::new(
            (1.0 - c.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - m.clamp(0.0, 1.0)) * (1.0 - k),
            (1.0 - y.clamp(0.0, 1.0)) * (1.0 - k),
        )
    }

    /// Build from color-operator operands: 1 = gray, 3 = RGB, 4 = CMYK
    pub fn from_components(components: &[f64]) -> Option<Self> {
        match components {
            [g] => Some(Rgb::from_gray(*g)),
            [r, g, b] => Some(Rgb::new(*r, *g, *b)),
            [c, m, y, k] => Some(Rgb::from_cmyk(*c, *m, *y, *k)),
            _ => None,
        }
    }
}

/// Fixed palette used to interpret electrical drawing color conventions.
///
/// Red marks power devices and cables, cyan/blue marks cable trays, gray is
/// structural (walls, furniture) and never counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorCategory {
    Red,
    Black,
    Yellow,
    Cyan,
    Blue,
    Orange,
    Gray,
    Other,
    None,
}

/// Minimum red channel for a color to count as red
pub const RED_THRESHOLD: f64 = 0.75;

impl ColorCategory {
    /// Classify an optional color by RGB-channel thresholds.
    ///
    /// Checks run in palette order; the first match wins.
    pub fn classify(color: Option<Rgb>) -> ColorCategory {
        let Some(Rgb { r, g, b }) = color else {
            return ColorCategory::None;
        };
        if r > RED_THRESHOLD && g < 0.35 && b < 0.35 {
            ColorCategory::Red
        } else if r < 0.15 && g < 0.15 && b < 0.15 {
            ColorCategory::Black
        } else if r > 0.85 && g > 0.85 && b < 0.25 {
            ColorCategory::Yellow
        } else if r < 0.35 && g > 0.55 && b > 0.55 {
            ColorCategory::Cyan
        } else if r < 0.35 && g < 0.35 && b > 0.65 {
            ColorCategory::Blue
        } else if r > 0.75 && g > 0.5 && b < 0.25 {
            ColorCategory::Orange
        } else if is_mid_tone(r)
            && is_mid_tone(g)
            && is_mid_tone(b)
            && (r - g).abs() < 0.15
            && (g - b).abs() < 0.15
        {
            ColorCategory::Gray
        } else {
            ColorCategory::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorCategory::Red => "red",
            ColorCategory::Black => "black",
            ColorCategory::Yellow => "yellow",
            ColorCategory::Cyan => "cyan",
            ColorCategory::Blue => "blue",
            ColorCategory::Orange => "orange",
            ColorCategory::Gray => "gray",
            ColorCategory::Other => "other",
            ColorCategory::None => "none",
        }
    }

    /// Walls and furniture; excluded from device and cable totals
    pub fn is_structural(&self) -> bool {
        matches!(self, ColorCategory::Gray)
    }
}

fn is_mid_tone(channel: f64) -> bool {
    channel > 0.45 && channel < 0.95
}

impl fmt::Display for ColorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(ColorCategory::classify(Some(Rgb::new(1.0, 0.0, 0.0))), ColorCategory::Red);
        assert_eq!(ColorCategory::classify(Some(Rgb::BLACK)), ColorCategory::Black);
        assert_eq!(ColorCategory::classify(Some(Rgb::new(1.0, 1.0, 0.0))), ColorCategory::Yellow);
        assert_eq!(ColorCategory::classify(Some(Rgb::new(0.0, 1.0, 1.0))), ColorCategory::Cyan);
        assert_eq!(ColorCategory::classify(Some(Rgb::new(0.0, 0.0, 1.0))), ColorCategory::Blue);
        assert_eq!(ColorCategory::classify(Some(Rgb::new(1.0, 0.6, 0.0))), ColorCategory::Orange);
        assert_eq!(ColorCategory::classify(Some(Rgb::from_gray(0.6))), ColorCategory::Gray);
        assert_eq!(ColorCategory::classify(Some(Rgb::new(0.5, 0.2, 0.9))), ColorCategory::Other);
        assert_eq!(ColorCategory::classify(None), ColorCategory::None);
    }

    #[test]
    fn test_white_is_not_gray() {
        assert_eq!(ColorCategory::classify(Some(Rgb::from_gray(1.0))), ColorCategory::Other);
    }

    #[test]
    fn test_from_components() {
        assert_eq!(Rgb::from_components(&[0.0]), Some(Rgb::BLACK));
        assert_eq!(Rgb::from_components(&[0.0, 1.0, 1.0, 0.0]), Some(Rgb::new(1.0, 0.0, 0.0)));
        assert_eq!(Rgb::from_components(&[0.1, 0.2]), None);
    }
}
