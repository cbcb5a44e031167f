//! Legend (symbol key) records.
//!
//! A legend sheet pairs drawing symbols with their meaning. Extracting one
//! produces a [`LegendRecord`]; feeding its entries back through
//! [`super::Classifier::with_legend`] biases classification of later drawings.

use super::Category;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const LEGEND_MARKERS: [&str; 4] = ["legend", "jelmagyar", "jelkulcs", "symbol_key"];

/// Whether a file name marks the file as a legend sheet
pub fn is_legend_filename(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    LEGEND_MARKERS.iter().any(|m| lower.contains(m))
}

/// symbol → meaning → category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub symbol: String,
    pub meaning: String,
    pub category: Category,
}

impl LegendEntry {
    pub fn new(symbol: impl Into<String>, meaning: impl Into<String>, category: Category) -> Self {
        Self {
            symbol: symbol.into(),
            meaning: meaning.into(),
            category,
        }
    }
}

/// Result of extracting a legend sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LegendRecord {
    pub entries: Vec<LegendEntry>,
    pub source: String,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl LegendRecord {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Add an entry unless the symbol is already present
    pub fn push(&mut self, entry: LegendEntry) {
        if !self.entries.iter().any(|e| e.symbol == entry.symbol) {
            self.entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legend_filenames() {
        assert!(is_legend_filename("E-01_Jelmagyarazat.dxf"));
        assert!(is_legend_filename("LEGEND.pdf"));
        assert!(is_legend_filename("project_symbol_key_v2.dwg"));
        assert!(!is_legend_filename("alaprajz_fsz.dxf"));
    }

    #[test]
    fn test_record_json() {
        let mut record = LegendRecord {
            source: "dxf_legend".to_string(),
            ..Default::default()
        };
        record.push(LegendEntry::new("ALJ-2P", "Dugalj 2P+F", Category::Socket));
        record.push(LegendEntry::new("ALJ-2P", "duplicate", Category::Other));
        assert_eq!(record.entries.len(), 1);

        let json = record.to_json().unwrap();
        assert!(json.contains("\"socket\""));
        assert_eq!(LegendRecord::from_json(&json).unwrap(), record);
    }
}
