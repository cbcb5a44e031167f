//! Engine configuration
//!
//! Every empirical constant used by the analyzers lives here as a named,
//! overridable field. A partial JSON document only needs to name the fields
//! it changes.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Tunables for one [`crate::Engine`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to the chord of a bezier segment
    pub curve_correction: f64,
    /// Chebyshev distance (pt) below which red symbol candidates merge
    pub cluster_threshold: f64,
    /// Smallest symbol bounding-box side (pt), inclusive
    pub symbol_min_size: f64,
    /// Largest symbol bounding-box side (pt), inclusive
    pub symbol_max_size: f64,
    /// Clusters with an average size below this are "small" devices
    pub small_band_limit: f64,
    /// Clusters with an average size at or above this are "large" devices
    pub large_band_limit: f64,
    /// Raw lengths (drawing units) below this are dropped from the report
    pub min_length: f64,
    /// Insertion positions kept per block tally
    pub max_positions: usize,
    /// Block tallies kept in the report, most frequent first
    pub max_blocks: usize,
    /// Share of black stroke length attributed to cable when nothing else is found
    pub black_fallback_share: f64,
    /// Black stroke length (m) required before the fallback applies
    pub black_fallback_min_m: f64,
    /// PDF length aggregates at or below this (m) are not reported
    pub pdf_min_length_m: f64,
    /// Red cable length (m) needed for the top PDF confidence tier
    pub red_cable_confidence_m: f64,
    /// Text entries collected from a DXF drawing
    pub max_texts: usize,
    /// Longest text (in characters, exclusive) collected from a DXF drawing
    pub max_text_len: usize,
    /// Analyze PDF pages on the rayon pool
    pub parallel_pages: bool,
    /// Recover from section-level DXF errors instead of failing the read
    pub failsafe: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            curve_correction: 1.2,
            cluster_threshold: 14.0,
            symbol_min_size: 5.0,
            symbol_max_size: 65.0,
            small_band_limit: 15.0,
            large_band_limit: 35.0,
            min_length: 0.01,
            max_positions: 50,
            max_blocks: 300,
            black_fallback_share: 0.25,
            black_fallback_min_m: 5.0,
            pdf_min_length_m: 1.0,
            red_cable_confidence_m: 5.0,
            max_texts: 100,
            max_text_len: 200,
            parallel_pages: true,
            failsafe: true,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Whether a bounding box of `width` x `height` points may be a device symbol.
    pub fn is_symbol_size(&self, width: f64, height: f64) -> bool {
        let range = self.symbol_min_size..=self.symbol_max_size;
        range.contains(&width) && range.contains(&height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.curve_correction, 1.2);
        assert_eq!(config.cluster_threshold, 14.0);
        assert_eq!(config.max_positions, 50);
        assert!(config.failsafe);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{ "cluster_threshold": 20.0 }"#).unwrap();
        assert_eq!(config.cluster_threshold, 20.0);
        assert_eq!(config.curve_correction, 1.2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(EngineConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_symbol_size_bounds_are_inclusive() {
        let config = EngineConfig::default();
        assert!(config.is_symbol_size(5.0, 65.0));
        assert!(!config.is_symbol_size(4.99, 10.0));
        assert!(!config.is_symbol_size(10.0, 65.01));
    }
}
