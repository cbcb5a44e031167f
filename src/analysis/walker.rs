//! Single-pass walk over a geometry source: block tallies and lengths

use super::length::{path_length, polyline_length, LengthTable};
use crate::classify::Classifier;
use crate::config::EngineConfig;
use crate::source::{BlockSymbol, Geometry, GeometrySource, SourceItem};
use crate::types::Vector2;
use ahash::RandomState;
use indexmap::IndexMap;

/// Instances of one block name on one layer
#[derive(Debug, Clone, PartialEq)]
pub struct BlockTally {
    pub name: String,
    pub layer: String,
    pub count: usize,
    /// Sampled positions, rounded to two decimals
    pub positions: Vec<Vector2>,
    /// Set once more instances were seen than positions kept
    pub positions_truncated: bool,
}

/// Block tallies keyed by (name, layer), in first-seen order
#[derive(Debug, Clone, Default)]
pub struct BlockTable {
    tallies: IndexMap<(String, String), BlockTally, RandomState>,
}

impl BlockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, symbol: &BlockSymbol, max_positions: usize) {
        let tally = self
            .tallies
            .entry((symbol.name.clone(), symbol.layer.clone()))
            .or_insert_with(|| BlockTally {
                name: symbol.name.clone(),
                layer: symbol.layer.clone(),
                count: 0,
                positions: Vec::new(),
                positions_truncated: false,
            });
        tally.count += symbol.count;
        for position in &symbol.positions {
            if tally.positions.len() >= max_positions {
                break;
            }
            tally.positions.push(position.rounded(2));
        }
        tally.positions_truncated = tally.count > tally.positions.len();
    }

    /// Fold another table into this one, keeping the position cap
    pub fn merge(&mut self, other: BlockTable, max_positions: usize) {
        for (key, tally) in other.tallies {
            match self.tallies.get_mut(&key) {
                Some(entry) => {
                    entry.count += tally.count;
                    let room = max_positions.saturating_sub(entry.positions.len());
                    entry.positions.extend(tally.positions.into_iter().take(room));
                    entry.positions_truncated = entry.count > entry.positions.len();
                }
                None => {
                    self.tallies.insert(key, tally);
                }
            }
        }
    }

    /// The `limit` most frequent tallies; ties keep first-seen order
    pub fn most_common(&self, limit: usize) -> Vec<&BlockTally> {
        let mut tallies: Vec<&BlockTally> = self.tallies.values().collect();
        tallies.sort_by(|a, b| b.count.cmp(&a.count));
        tallies.truncate(limit);
        tallies
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockTally> {
        self.tallies.values()
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.tallies.values().map(|t| t.count).sum()
    }
}

/// Everything one walk produces
#[derive(Debug, Clone, Default)]
pub struct WalkOutput {
    pub blocks: BlockTable,
    pub lengths: LengthTable,
}

/// Tally blocks and aggregate lengths of one source in a single pass,
/// converting each length with `factor` as it is added
pub fn walk(
    source: &dyn GeometrySource,
    classifier: &Classifier,
    factor: f64,
    config: &EngineConfig,
) -> WalkOutput {
    let mut output = WalkOutput::default();
    for item in source.items(config) {
        match item {
            SourceItem::Symbol(symbol) => output.blocks.add(&symbol, config.max_positions),
            SourceItem::Length(primitive) => {
                let raw = match &primitive.geometry {
                    Geometry::Polyline(points, closed) => polyline_length(points, *closed),
                    Geometry::Path(segments) => path_length(segments, config.curve_correction),
                };
                let category = primitive
                    .category
                    .unwrap_or_else(|| classifier.classify_layer(&primitive.key));
                output
                    .lengths
                    .add(&primitive.key, category, raw, factor, config.min_length);
            }
        }
    }
    log::debug!(
        "walk: {} block tallies ({} instances), {} length keys",
        output.blocks.len(),
        output.blocks.total_count(),
        output.lengths.len()
    );
    output
}
