//! The extraction result record and its JSON shape

use crate::classify::{Category, LayerSpec, LegendRecord};
use crate::error::Result;
use crate::units::ScaleInfo;
use indexmap::IndexMap;
use serde::Serialize;

/// Which analyzer produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// DXF entity walk
    Dxf,
    /// PDF vector-path analysis
    PdfVector,
    /// Text runs of a DWG file
    DwgText,
    /// Text runs of an input whose structure could not be read
    TextFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockEntry {
    pub name: String,
    pub layer: String,
    pub count: usize,
    pub category: Category,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub positions: Vec<[f64; 2]>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub positions_truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthEntry {
    pub layer: String,
    pub length_m: f64,
    pub length_raw: f64,
    pub category: Category,
    pub segment_count: usize,
    /// Cable or tray details parsed from the layer name
    pub info: Option<LayerSpec>,
    /// What the length stands for, for keys that are not layer names
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Derived from other measurements rather than measured directly
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerInfo {
    pub name: String,
    pub category: Category,
    pub is_cable: bool,
    pub is_cable_tray: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_index: Option<i16>,
    pub is_off: bool,
    pub is_frozen: bool,
    pub is_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextEntry {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_block_types: usize,
    pub total_blocks: usize,
    pub total_layers: usize,
    pub layers_with_lines: usize,
    pub cable_m: f64,
    pub tray_m: f64,
}

/// Quantities extracted from one drawing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub blocks: Vec<BlockEntry>,
    pub lengths: Vec<LengthEntry>,
    /// Layer names seen
    pub layers: Vec<String>,
    pub layer_info: Vec<LayerInfo>,
    pub units: ScaleInfo,
    /// In [0.1, 1.0], two decimals
    pub confidence: f64,
    pub warnings: Vec<String>,
    /// Informational remarks that do not lower trust in the result
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub summary: Summary,
    pub texts: Vec<TextEntry>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub title_block: IndexMap<String, Vec<String>>,
    pub source: Source,
}

impl ExtractionResult {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn block(&self, name: &str) -> Option<&BlockEntry> {
        self.blocks.iter().find(|b| b.name == name)
    }

    pub fn length(&self, layer: &str) -> Option<&LengthEntry> {
        self.lengths.iter().find(|l| l.layer == layer)
    }
}

/// What one extraction call returns
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extraction {
    /// Quantity takeoff of a drawing
    Quantities(ExtractionResult),
    /// Symbol key of a legend sheet
    Legend(LegendRecord),
}

impl Extraction {
    pub fn quantities(&self) -> Option<&ExtractionResult> {
        match self {
            Extraction::Quantities(result) => Some(result),
            Extraction::Legend(_) => None,
        }
    }

    pub fn legend(&self) -> Option<&LegendRecord> {
        match self {
            Extraction::Legend(record) => Some(record),
            Extraction::Quantities(_) => None,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
