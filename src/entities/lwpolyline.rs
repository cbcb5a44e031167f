//! Lightweight polyline entity

use super::{Entity, EntityCommon, EntityKind};
use crate::types::{Vector2, Vector3};

/// A vertex in a lightweight polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LwVertex {
    pub location: Vector2,
    /// Bulge of the segment starting here; read but measured as a chord
    pub bulge: f64,
}

impl LwVertex {
    pub fn new(location: Vector2) -> Self {
        LwVertex { location, bulge: 0.0 }
    }
}

/// A 2D polyline at a constant elevation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LwPolyline {
    pub common: EntityCommon,
    pub vertices: Vec<LwVertex>,
    pub is_closed: bool,
    pub elevation: f64,
}

impl LwPolyline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from 2D points
    pub fn from_points(points: &[Vector2], is_closed: bool) -> Self {
        LwPolyline {
            vertices: points.iter().copied().map(LwVertex::new).collect(),
            is_closed,
            ..Self::new()
        }
    }

    /// Vertices lifted to 3D at the polyline elevation
    pub fn points(&self) -> Vec<Vector3> {
        self.vertices
            .iter()
            .map(|v| v.location.with_z(self.elevation))
            .collect()
    }
}

impl Entity for LwPolyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::LwPolyline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_use_elevation() {
        let mut pl = LwPolyline::from_points(&[Vector2::new(0.0, 0.0), Vector2::new(1.0, 2.0)], false);
        pl.elevation = 3.5;
        let points = pl.points();
        assert_eq!(points[1], Vector3::new(1.0, 2.0, 3.5));
    }
}
