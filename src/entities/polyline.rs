//! Polyline entity (POLYLINE followed by VERTEX records and SEQEND)

use super::{Entity, EntityCommon, EntityKind};
use crate::types::Vector3;

/// A 2D or 3D polyline with explicit vertex records.
///
/// Polyface and polygon-mesh polylines are read but contribute no vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polyline {
    pub common: EntityCommon,
    pub vertices: Vec<Vector3>,
    pub is_closed: bool,
}

impl Polyline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(vertices: Vec<Vector3>, is_closed: bool) -> Self {
        Polyline {
            vertices,
            is_closed,
            ..Self::new()
        }
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Polyline
    }
}
