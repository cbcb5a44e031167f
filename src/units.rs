//! Unit resolution: drawing units to meters.
//!
//! A drawing either declares its linear unit (`$INSUNITS`) or the factor is
//! guessed, first from the drawing extents and, for PDF pages, from the paper
//! format. Resolution never fails; the last resort is millimeters.

use crate::types::BoundingBox2D;
use serde::Serialize;
use std::fmt;

/// One PDF point in millimeters
pub const MM_PER_POINT: f64 = 0.3528;

/// How the unit factor was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Read from a known `$INSUNITS` code
    Declared,
    /// Guessed from the magnitude of the drawing extents
    ExtentsHeuristic,
    /// Guessed from the page size of a PDF
    PaperFormatHeuristic,
    /// Nothing to go on; millimeters assumed
    Fallback,
}

impl DetectionMethod {
    /// Whether the factor was guessed rather than declared
    pub fn is_guess(&self) -> bool {
        !matches!(self, DetectionMethod::Declared)
    }
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DetectionMethod::Declared => "declared",
            DetectionMethod::ExtentsHeuristic => "extents-heuristic",
            DetectionMethod::PaperFormatHeuristic => "paper-format-heuristic",
            DetectionMethod::Fallback => "fallback",
        };
        f.write_str(s)
    }
}

/// `$INSUNITS` codes with their names and meters-per-unit.
///
/// Code 0 is "unitless": it has a name but no factor, so a drawing declaring
/// it goes through the heuristics.
const INSUNITS: [(i16, &str, Option<f64>); 21] = [
    (0, "unknown", None),
    (1, "inches", Some(0.0254)),
    (2, "feet", Some(0.3048)),
    (3, "miles", Some(1609.34)),
    (4, "mm", Some(0.001)),
    (5, "cm", Some(0.01)),
    (6, "m", Some(1.0)),
    (7, "km", Some(1000.0)),
    (8, "microinches", Some(2.54e-8)),
    (9, "mils", Some(2.54e-5)),
    (10, "yards", Some(0.9144)),
    (11, "angstroms", Some(1e-10)),
    (12, "nanometers", Some(1e-9)),
    (13, "microns", Some(1e-6)),
    (14, "decimeters", Some(0.1)),
    (15, "decameters", Some(10.0)),
    (16, "hectometers", Some(100.0)),
    (17, "gigameters", Some(1e9)),
    (18, "AU", Some(1.496e11)),
    (19, "light-years", Some(9.461e15)),
    (20, "parsecs", Some(3.086e16)),
];

/// Look up a declared unit code.
pub fn declared_unit(code: i16) -> Option<(&'static str, f64)> {
    INSUNITS
        .iter()
        .find(|(c, _, _)| *c == code)
        .and_then(|(_, name, factor)| factor.map(|f| (*name, f)))
}

/// ISO A-series sheet, landscape dimensions in millimeters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaperFormat {
    A4,
    A3,
    A2,
    A1,
    A0,
}

impl PaperFormat {
    pub const ALL: [PaperFormat; 5] = [
        PaperFormat::A4,
        PaperFormat::A3,
        PaperFormat::A2,
        PaperFormat::A1,
        PaperFormat::A0,
    ];

    /// (long side, short side) in mm
    pub fn size_mm(&self) -> (f64, f64) {
        match self {
            PaperFormat::A4 => (297.0, 210.0),
            PaperFormat::A3 => (420.0, 297.0),
            PaperFormat::A2 => (594.0, 420.0),
            PaperFormat::A1 => (841.0, 594.0),
            PaperFormat::A0 => (1189.0, 841.0),
        }
    }

    /// Scale denominator conventionally used for floor plans on this sheet
    pub fn default_scale(&self) -> u32 {
        match self {
            PaperFormat::A4 => 25,
            PaperFormat::A3 | PaperFormat::A2 | PaperFormat::A1 => 50,
            PaperFormat::A0 => 100,
        }
    }

    /// Closest format to a page of the given size in millimeters.
    ///
    /// Both orientations are tried; the first format with the strictly lowest
    /// total absolute deviation wins.
    pub fn closest(width_mm: f64, height_mm: f64) -> Option<PaperFormat> {
        if !(width_mm.is_finite() && height_mm.is_finite()) || width_mm <= 0.0 || height_mm <= 0.0 {
            return None;
        }
        let mut best: Option<(PaperFormat, f64)> = None;
        for format in PaperFormat::ALL {
            let (fw, fh) = format.size_mm();
            for (pw, ph) in [(width_mm, height_mm), (height_mm, width_mm)] {
                let deviation = (pw - fw).abs() + (ph - fh).abs();
                if best.map_or(true, |(_, d)| deviation < d) {
                    best = Some((format, deviation));
                }
            }
        }
        best.map(|(format, _)| format)
    }
}

impl fmt::Display for PaperFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Detected measurement scale of a drawing or page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleInfo {
    /// Declared `$INSUNITS` code; 0 for PDF
    pub insunits: i16,
    /// Human readable unit name
    pub name: String,
    /// Meters per drawing unit (or per PDF point)
    pub factor: f64,
    /// True unless the unit came from a declared code
    pub auto_detected: bool,
    pub detection_method: DetectionMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_format: Option<PaperFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_denominator: Option<u32>,
}

impl ScaleInfo {
    fn new(insunits: i16, name: impl Into<String>, factor: f64, method: DetectionMethod) -> Self {
        Self {
            insunits,
            name: name.into(),
            factor,
            auto_detected: method.is_guess(),
            detection_method: method,
            paper_format: None,
            scale_denominator: None,
        }
    }

    /// Millimeters, assumed when nothing else is known
    pub fn fallback(insunits: i16) -> Self {
        Self::new(insunits, "mm (default)", 0.001, DetectionMethod::Fallback)
    }

    /// Scale of a PDF page printed on `format`
    pub fn for_paper(format: PaperFormat) -> Self {
        let scale = format.default_scale();
        let mut info = Self::new(
            0,
            format!("PDF (vector 1:{})", scale),
            MM_PER_POINT * f64::from(scale) / 1000.0,
            DetectionMethod::PaperFormatHeuristic,
        );
        info.paper_format = Some(format);
        info.scale_denominator = Some(scale);
        info
    }

    /// Lengths read from text are already meters
    pub fn from_text() -> Self {
        Self::new(0, "m (from text)", 1.0, DetectionMethod::Fallback)
    }

    pub fn is_guess(&self) -> bool {
        self.detection_method.is_guess()
    }
}

/// Resolve the unit of a DXF drawing.
///
/// `insunits` is the declared code if the header carried one; `extents` are
/// the header extents when valid, otherwise the computed geometry bounds.
pub fn resolve_drawing_units(insunits: Option<i16>, extents: Option<BoundingBox2D>) -> ScaleInfo {
    let code = insunits.unwrap_or(0);
    if let Some((name, factor)) = insunits.and_then(declared_unit) {
        return ScaleInfo::new(code, name, factor, DetectionMethod::Declared);
    }

    match extents.filter(|e| e.is_valid_extent()) {
        Some(extents) => {
            let (name, factor) = guess_from_extent(extents.max_dimension());
            log::debug!(
                "No usable $INSUNITS ({:?}); max extent {} suggests {}",
                insunits,
                extents.max_dimension(),
                name
            );
            ScaleInfo::new(code, name, factor, DetectionMethod::ExtentsHeuristic)
        }
        None => {
            log::debug!("No units and no extents; assuming millimeters");
            ScaleInfo::fallback(code)
        }
    }
}

/// Unit guess from the largest drawing dimension.
///
/// Boundaries are exclusive on the larger-unit side: exactly 10000 is still
/// centimeters, exactly 100 is still meters.
pub fn guess_from_extent(max_dim: f64) -> (&'static str, f64) {
    if max_dim > 10_000.0 {
        ("mm (guessed)", 0.001)
    } else if max_dim > 100.0 {
        ("cm (guessed)", 0.01)
    } else {
        ("m (guessed)", 1.0)
    }
}

/// Resolve the scale of a PDF page from its size in points.
pub fn resolve_page_units(width_pt: f64, height_pt: f64) -> ScaleInfo {
    match PaperFormat::closest(width_pt * MM_PER_POINT, height_pt * MM_PER_POINT) {
        Some(format) => ScaleInfo::for_paper(format),
        None => ScaleInfo::fallback(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vector2;

    fn extents(w: f64, h: f64) -> BoundingBox2D {
        BoundingBox2D::new(Vector2::ZERO, Vector2::new(w, h))
    }

    #[test]
    fn test_declared_table() {
        for (code, _, factor) in INSUNITS.iter() {
            let info = resolve_drawing_units(Some(*code), None);
            match factor {
                Some(f) => {
                    assert_eq!(info.factor, *f);
                    assert_eq!(info.detection_method, DetectionMethod::Declared);
                    assert!(!info.auto_detected);
                }
                None => assert_eq!(info.detection_method, DetectionMethod::Fallback),
            }
        }
    }

    #[test]
    fn test_common_codes() {
        assert_eq!(declared_unit(4), Some(("mm", 0.001)));
        assert_eq!(declared_unit(6), Some(("m", 1.0)));
        assert_eq!(declared_unit(14), Some(("decimeters", 0.1)));
        assert_eq!(declared_unit(0), None);
        assert_eq!(declared_unit(99), None);
    }

    #[test]
    fn test_extent_boundaries() {
        assert_eq!(guess_from_extent(10_000.0).1, 0.01);
        assert_eq!(guess_from_extent(10_000.01).1, 0.001);
        assert_eq!(guess_from_extent(100.0).1, 1.0);
        assert_eq!(guess_from_extent(100.5).1, 0.01);
    }

    #[test]
    fn test_unitless_uses_extents() {
        let info = resolve_drawing_units(Some(0), Some(extents(42_000.0, 29_700.0)));
        assert_eq!(info.factor, 0.001);
        assert_eq!(info.detection_method, DetectionMethod::ExtentsHeuristic);
        assert!(info.auto_detected);
    }

    #[test]
    fn test_placeholder_extents_fall_back() {
        let bogus = BoundingBox2D::new(Vector2::new(1e20, 1e20), Vector2::new(-1e20, -1e20));
        let info = resolve_drawing_units(None, Some(bogus));
        assert_eq!(info.detection_method, DetectionMethod::Fallback);
        assert_eq!(info.factor, 0.001);
    }

    #[test]
    fn test_paper_formats() {
        // A3 landscape in points
        let info = resolve_page_units(1190.55, 841.89);
        assert_eq!(info.paper_format, Some(PaperFormat::A3));
        assert_eq!(info.scale_denominator, Some(50));
        assert!((info.factor - 0.01764).abs() < 1e-9);

        // A4 portrait
        let info = resolve_page_units(595.0, 842.0);
        assert_eq!(info.paper_format, Some(PaperFormat::A4));
        assert_eq!(info.scale_denominator, Some(25));

        let info = resolve_page_units(3370.0, 2384.0);
        assert_eq!(info.paper_format, Some(PaperFormat::A0));
        assert_eq!(info.scale_denominator, Some(100));
    }

    #[test]
    fn test_degenerate_page() {
        let info = resolve_page_units(0.0, 0.0);
        assert_eq!(info.detection_method, DetectionMethod::Fallback);
    }
}
