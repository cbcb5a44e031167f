//! Geometry sources.
//!
//! Both drawing formats are analyzed through one stream of items: length-bearing
//! primitives, which the length aggregator measures, and block-like symbols,
//! which the block walker tallies. The walker folds both in a single pass.

use crate::classify::Category;
use crate::config::EngineConfig;
use crate::document::DxfDocument;
use crate::entities::{EntityType, PathSegment};
use crate::types::{Vector2, Vector3};

/// Geometry whose length is measured
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry<'a> {
    /// Vertex chain; `true` adds the closing segment
    Polyline(Vec<Vector3>, bool),
    /// PDF path segments
    Path(&'a [PathSegment]),
}

/// A length-bearing primitive and the key its length accumulates under
#[derive(Debug, Clone, PartialEq)]
pub struct LengthPrimitive<'a> {
    /// Layer name (DXF) or color key (PDF)
    pub key: String,
    /// Category fixed by the source; `None` lets the classifier decide from `key`
    pub category: Option<Category>,
    pub geometry: Geometry<'a>,
}

/// A counted symbol: one block reference or one clustered PDF symbol
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSymbol {
    pub name: String,
    pub layer: String,
    /// Instances this symbol stands for
    pub count: usize,
    /// Instance positions, at most `max_positions` of them
    pub positions: Vec<Vector2>,
}

/// One item of a geometry source
#[derive(Debug, Clone, PartialEq)]
pub enum SourceItem<'a> {
    Length(LengthPrimitive<'a>),
    Symbol(BlockSymbol),
}

/// Capability interface over DXF drawings and PDF pages
pub trait GeometrySource {
    /// Length primitives and symbols, in source order
    fn items(&self, config: &EngineConfig) -> Box<dyn Iterator<Item = SourceItem<'_>> + '_>;
}

impl GeometrySource for DxfDocument {
    fn items(&self, config: &EngineConfig) -> Box<dyn Iterator<Item = SourceItem<'_>> + '_> {
        let max_positions = config.max_positions;
        Box::new(self.model_space_entities().filter_map(move |entity| match entity {
            // a MINSERT grid can stand for a billion instances; only the kept positions are built
            EntityType::Insert(insert) => Some(SourceItem::Symbol(BlockSymbol {
                name: insert.name().to_string(),
                layer: insert.common.layer_name().to_string(),
                count: insert.instance_count(),
                positions: insert
                    .instance_points()
                    .take(max_positions)
                    .map(|p| p.xy())
                    .collect(),
            })),
            _ => {
                let (points, closed) = entity.path()?;
                Some(SourceItem::Length(LengthPrimitive {
                    key: entity.layer().to_string(),
                    category: None,
                    geometry: Geometry::Polyline(points, closed),
                }))
            }
        }))
    }
}
