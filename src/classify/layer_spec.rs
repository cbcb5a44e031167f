//! Cable and tray specifications embedded in layer names
//! (`KABEL-NYY-J 5x2.5`, `TALCA 300x60`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TRAY_DIMENSIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2,4})[xX×](\d{2,4})").expect("valid tray regex"));
static CABLE_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)[xX×](\d+\.?\d*)").expect("valid cable regex"));

const CABLE_TYPES: [&str; 6] = ["NYY", "CYKY", "YKY", "NAYY", "NYM", "H07V"];
const TRAY_WORDS: [&str; 4] = ["TRAY", "TALCA", "TÁLCA", "CABLE_TRAY"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSpecKind {
    Cable,
    Tray,
}

/// What a layer name says about the material drawn on it
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayerSpec {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<LayerSpecKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tray_height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cores: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cross_section: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_type: Option<&'static str>,
}

impl LayerSpec {
    /// Parse a layer name; `None` when nothing recognizable is present.
    ///
    /// `AxB` with two to four digits on both sides reads as tray dimensions,
    /// any other `AxB` as cable cores and cross-section.
    pub fn parse(layer: &str) -> Option<LayerSpec> {
        let up = layer.to_uppercase();
        let mut spec = LayerSpec::default();

        if let Some(caps) = TRAY_DIMENSIONS.captures(&up) {
            spec.tray_width = caps[1].parse().ok();
            spec.tray_height = caps[2].parse().ok();
            spec.kind = Some(LayerSpecKind::Tray);
        } else if let Some(caps) = CABLE_SECTION.captures(&up) {
            spec.cores = caps[1].parse().ok();
            spec.cross_section = caps[2].parse().ok();
            spec.kind = Some(LayerSpecKind::Cable);
        }

        if let Some(t) = CABLE_TYPES.iter().find(|t| up.contains(*t)) {
            spec.cable_type = Some(t);
            spec.kind.get_or_insert(LayerSpecKind::Cable);
        }
        if TRAY_WORDS.iter().any(|w| up.contains(w)) {
            spec.kind.get_or_insert(LayerSpecKind::Tray);
        }

        (spec != LayerSpec::default()).then_some(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tray_dimensions() {
        let spec = LayerSpec::parse("TALCA 300x60").unwrap();
        assert_eq!(spec.kind, Some(LayerSpecKind::Tray));
        assert_eq!(spec.tray_width, Some(300));
        assert_eq!(spec.tray_height, Some(60));
    }

    #[test]
    fn test_cable_section() {
        let spec = LayerSpec::parse("kabel-nyy-j 5x2.5").unwrap();
        assert_eq!(spec.kind, Some(LayerSpecKind::Cable));
        assert_eq!(spec.cores, Some(5));
        assert_eq!(spec.cross_section, Some(2.5));
        assert_eq!(spec.cable_type, Some("NYY"));
    }

    #[test]
    fn test_two_digit_section_reads_as_tray() {
        let spec = LayerSpec::parse("NYY 10x16").unwrap();
        assert_eq!(spec.kind, Some(LayerSpecKind::Tray));
        assert_eq!(spec.cable_type, Some("NYY"));
    }

    #[test]
    fn test_type_only() {
        let spec = LayerSpec::parse("E-CYKY").unwrap();
        assert_eq!(spec.kind, Some(LayerSpecKind::Cable));
        assert!(spec.cores.is_none());
    }

    #[test]
    fn test_nothing_found() {
        assert!(LayerSpec::parse("FAL").is_none());
        assert!(LayerSpec::parse("").is_none());
    }
}
