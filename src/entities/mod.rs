//! Drawing entities the engine reads.
//!
//! Only the primitives that carry quantities are modelled: block references,
//! line work and text. Entities are immutable once read.

use serde::Serialize;
use std::fmt;

pub mod insert;
pub mod line;
pub mod lwpolyline;
pub mod polyline;
pub mod text;
pub mod vector_path;

pub use insert::Insert;
pub use line::Line;
pub use lwpolyline::{LwPolyline, LwVertex};
pub use polyline::Polyline;
pub use text::{MText, Text};
pub use vector_path::{ColorKey, PathSegment, VectorPath};

use crate::types::Vector3;

/// Layer bucket for entities without a layer
pub const DEFAULT_LAYER: &str = "DEFAULT";

/// Kind of a drawing primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    Insert,
    LwPolyline,
    Polyline,
    Line,
    Text,
    MText,
    VectorPath,
}

impl EntityKind {
    /// DXF entity type name
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Insert => "INSERT",
            EntityKind::LwPolyline => "LWPOLYLINE",
            EntityKind::Polyline => "POLYLINE",
            EntityKind::Line => "LINE",
            EntityKind::Text => "TEXT",
            EntityKind::MText => "MTEXT",
            EntityKind::VectorPath => "VECTOR_PATH",
        }
    }

    /// Whether entities of this kind contribute length
    pub fn is_length_bearing(&self) -> bool {
        matches!(
            self,
            EntityKind::LwPolyline | EntityKind::Polyline | EntityKind::Line | EntityKind::VectorPath
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Data shared by every DXF entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityCommon {
    /// Layer name as read; may be empty
    pub layer: String,
    /// ACI color index (62), if the entity overrides its layer color
    pub color_index: Option<i16>,
    /// Entity lives in paper space (67 = 1)
    pub paper_space: bool,
}

impl EntityCommon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }

    /// Layer name with the empty name mapped to [`DEFAULT_LAYER`]
    pub fn layer_name(&self) -> &str {
        let trimmed = self.layer.trim();
        if trimmed.is_empty() {
            DEFAULT_LAYER
        } else {
            trimmed
        }
    }
}

/// Common read access to DXF entities
pub trait Entity {
    fn common(&self) -> &EntityCommon;

    fn kind(&self) -> EntityKind;

    /// Layer name, never empty
    fn layer(&self) -> &str {
        self.common().layer_name()
    }

    fn is_paper_space(&self) -> bool {
        self.common().paper_space
    }
}

/// A DXF entity of one of the supported kinds
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Insert(Insert),
    Line(Line),
    LwPolyline(LwPolyline),
    Polyline(Polyline),
    Text(Text),
    MText(MText),
}

impl EntityType {
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Insert(e) => e,
            EntityType::Line(e) => e,
            EntityType::LwPolyline(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Text(e) => e,
            EntityType::MText(e) => e,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.as_entity().kind()
    }

    pub fn layer(&self) -> &str {
        self.as_entity().layer()
    }

    pub fn is_paper_space(&self) -> bool {
        self.as_entity().is_paper_space()
    }

    /// Vertices for length measurement, with the closed flag
    pub fn path(&self) -> Option<(Vec<Vector3>, bool)> {
        match self {
            EntityType::Line(l) => Some((vec![l.start, l.end], false)),
            EntityType::LwPolyline(p) => Some((p.points(), p.is_closed)),
            EntityType::Polyline(p) => Some((p.vertices.clone(), p.is_closed)),
            _ => None,
        }
    }

    /// Text content of TEXT/MTEXT entities
    pub fn text(&self) -> Option<(&str, Vector3)> {
        match self {
            EntityType::Text(t) => Some((t.value.as_str(), t.insertion_point)),
            EntityType::MText(t) => Some((t.value.as_str(), t.insertion_point)),
            _ => None,
        }
    }
}
