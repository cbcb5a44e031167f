//! In-memory DXF drawing

use crate::entities::{Entity, EntityType};
use crate::notification::NotificationCollection;
use crate::tables::{Layer, Table};
use crate::types::{BoundingBox2D, BoundsAccumulator, DxfVersion, Vector2};

/// Header variables the engine uses
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingHeader {
    /// $INSUNITS, if present
    pub insunits: Option<i16>,
    /// $EXTMIN
    pub extents_min: Option<Vector2>,
    /// $EXTMAX
    pub extents_max: Option<Vector2>,
    /// $DWGCODEPAGE
    pub code_page: Option<String>,
}

impl DrawingHeader {
    /// Header extents, if both corners were present and plausible
    pub fn extents(&self) -> Option<BoundingBox2D> {
        match (self.extents_min, self.extents_max) {
            (Some(min), Some(max)) => {
                Some(BoundingBox2D::new(min, max)).filter(|e| e.is_valid_extent())
            }
            _ => None,
        }
    }
}

/// A DXF drawing reduced to the data quantity extraction needs
#[derive(Debug, Clone, Default)]
pub struct DxfDocument {
    pub version: DxfVersion,
    pub header: DrawingHeader,
    pub layers: Table<Layer>,
    /// Model- and paper-space entities in file order
    pub entities: Vec<EntityType>,
    /// Issues met while reading
    pub notifications: NotificationCollection,
}

impl DxfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: EntityType) {
        self.entities.push(entity);
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter()
    }

    /// Entities that count towards quantities
    pub fn model_space_entities(&self) -> impl Iterator<Item = &EntityType> {
        self.entities.iter().filter(|e| !e.is_paper_space())
    }

    /// Bounds of the model-space geometry
    pub fn computed_extents(&self) -> Option<BoundingBox2D> {
        let mut acc = BoundsAccumulator::new();
        for entity in self.model_space_entities() {
            match entity {
                EntityType::Insert(i) => acc.add(i.insert_point.xy()),
                EntityType::Line(l) => {
                    acc.add(l.start.xy());
                    acc.add(l.end.xy());
                }
                EntityType::LwPolyline(p) => p.vertices.iter().for_each(|v| acc.add(v.location)),
                EntityType::Polyline(p) => p.vertices.iter().for_each(|v| acc.add(v.xy())),
                EntityType::Text(t) => acc.add(t.insertion_point.xy()),
                EntityType::MText(t) => acc.add(t.insertion_point.xy()),
            }
        }
        acc.finish()
    }

    /// Header extents when usable, otherwise the computed geometry bounds
    pub fn extents(&self) -> Option<BoundingBox2D> {
        self.header.extents().or_else(|| self.computed_extents())
    }

    /// Names of every layer: table entries first, then layers only seen on entities
    pub fn layer_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.layers.names().map(str::to_string).collect();
        for entity in &self.entities {
            let layer = entity.as_entity().layer();
            if !names.iter().any(|n| n.eq_ignore_ascii_case(layer)) {
                names.push(layer.to_string());
            }
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Insert, Line, Text};
    use crate::types::Vector3;

    #[test]
    fn test_extents_prefer_header() {
        let mut doc = DxfDocument::new();
        doc.add_entity(EntityType::Line(Line::from_points(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(50.0, 20.0, 0.0),
        )));
        assert_eq!(doc.extents().map(|e| e.max_dimension()), Some(50.0));

        doc.header.extents_min = Some(Vector2::new(0.0, 0.0));
        doc.header.extents_max = Some(Vector2::new(20_000.0, 10.0));
        assert_eq!(doc.extents().map(|e| e.max_dimension()), Some(20_000.0));

        doc.header.extents_min = Some(Vector2::new(1e20, 1e20));
        doc.header.extents_max = Some(Vector2::new(-1e20, -1e20));
        assert_eq!(doc.extents().map(|e| e.max_dimension()), Some(50.0));
    }

    #[test]
    fn test_paper_space_excluded_from_extents() {
        let mut doc = DxfDocument::new();
        let mut title = Text::new("TERVEZŐ", Vector3::new(900.0, 0.0, 0.0));
        title.common.paper_space = true;
        doc.add_entity(EntityType::Text(title));
        doc.add_entity(EntityType::Insert(Insert::new("A", Vector3::new(1.0, 2.0, 0.0))));
        let e = doc.computed_extents().unwrap();
        assert_eq!(e.max.x, 1.0);
    }

    #[test]
    fn test_layer_names() {
        let mut doc = DxfDocument::new();
        doc.layers.add(Layer::new("0"));
        doc.layers.add(Layer::new("KABEL"));
        doc.add_entity(EntityType::Insert(Insert::new("A", Vector3::ZERO).on_layer("kabel")));
        doc.add_entity(EntityType::Insert(Insert::new("A", Vector3::ZERO).on_layer("VILL")));
        doc.add_entity(EntityType::Insert(Insert::new("A", Vector3::ZERO)));
        assert_eq!(doc.layer_names(), vec!["0", "KABEL", "VILL", "DEFAULT"]);
    }
}
