//! Shared test utilities for takeoff-engine integration tests.
//!
//! Builders for in-memory DXF and PDF drawings live in `builders`; the
//! helpers here run the engine and unwrap the quantity result.

#![allow(dead_code)]

pub mod builders;

use takeoff_engine::{Engine, EngineConfig, Extraction, ExtractionHints, ExtractionResult, LegendEntry};

/// Extract with the default configuration and expect a quantity result
pub fn extract(bytes: &[u8]) -> ExtractionResult {
    extract_with(&EngineConfig::default(), bytes, &ExtractionHints::default())
}

pub fn extract_with(config: &EngineConfig, bytes: &[u8], hints: &ExtractionHints) -> ExtractionResult {
    match Engine::new(config.clone()).extract(bytes, hints) {
        Ok(Extraction::Quantities(result)) => result,
        Ok(Extraction::Legend(record)) => panic!("expected quantities, got legend {:?}", record),
        Err(e) => panic!("extraction failed: {}", e),
    }
}

/// Extract with a legend biasing the classifier
pub fn extract_with_legend(bytes: &[u8], legend: Vec<LegendEntry>) -> ExtractionResult {
    let hints = ExtractionHints::default().with_legend(legend);
    extract_with(&EngineConfig::default(), bytes, &hints)
}

/// Sequential page analysis, for tests comparing against the parallel path
pub fn sequential_config() -> EngineConfig {
    EngineConfig {
        parallel_pages: false,
        ..Default::default()
    }
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {}, got {}",
        expected,
        tolerance,
        actual
    );
}
