//! Bounding rectangles for drawing extents and PDF paths

use super::Vector2;
use serde::Serialize;
use std::fmt;

/// 2D bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox2D {
    /// Minimum point (lower-left corner)
    pub min: Vector2,
    /// Maximum point (upper-right corner)
    pub max: Vector2,
}

impl BoundingBox2D {
    /// Create a new bounding box from min and max points
    pub fn new(min: Vector2, max: Vector2) -> Self {
        BoundingBox2D { min, max }
    }

    /// Create a bounding box from a single point
    pub fn from_point(point: Vector2) -> Self {
        BoundingBox2D {
            min: point,
            max: point,
        }
    }

    /// Create a bounding box that contains all given points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = BoundingBox2D::from_point(*first);
        for point in rest {
            bounds.expand_to_include(*point);
        }
        Some(bounds)
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Larger of width and height
    pub fn max_dimension(&self) -> f64 {
        self.width().abs().max(self.height().abs())
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Vector2 {
        Vector2::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Expand the bounding box to include another point
    pub fn expand_to_include(&mut self, point: Vector2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// A box is usable as drawing extents when finite and not inverted.
    ///
    /// Fresh drawings carry `$EXTMIN = 1e20` / `$EXTMAX = -1e20` placeholders,
    /// which this rejects.
    pub fn is_valid_extent(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.max.x >= self.min.x
            && self.max.y >= self.min.y
            && self.max_dimension() < 1.0e19
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox2D[{} -> {}]", self.min, self.max)
    }
}

/// Accumulates a bounding box over a stream of points
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsAccumulator {
    bounds: Option<BoundingBox2D>,
}

impl BoundsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a point; non-finite points are ignored
    pub fn add(&mut self, point: Vector2) {
        if !point.is_finite() {
            return;
        }
        match &mut self.bounds {
            Some(b) => b.expand_to_include(point),
            None => self.bounds = Some(BoundingBox2D::from_point(point)),
        }
    }

    pub fn finish(self) -> Option<BoundingBox2D> {
        self.bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bb = BoundingBox2D::from_points(&[
            Vector2::new(1.0, 5.0),
            Vector2::new(-2.0, 3.0),
            Vector2::new(4.0, -1.0),
        ])
        .unwrap();
        assert_eq!(bb.min, Vector2::new(-2.0, -1.0));
        assert_eq!(bb.max, Vector2::new(4.0, 5.0));
        assert_eq!(bb.max_dimension(), 6.0);
        assert!(BoundingBox2D::from_points(&[]).is_none());
    }

    #[test]
    fn test_placeholder_extents_are_invalid() {
        let bb = BoundingBox2D::new(Vector2::new(1e20, 1e20), Vector2::new(-1e20, -1e20));
        assert!(!bb.is_valid_extent());
        let ok = BoundingBox2D::new(Vector2::new(0.0, 0.0), Vector2::new(100.0, 50.0));
        assert!(ok.is_valid_extent());
    }

    #[test]
    fn test_accumulator_skips_nan() {
        let mut acc = BoundsAccumulator::new();
        acc.add(Vector2::new(f64::NAN, 1.0));
        assert!(acc.clone().finish().is_none());
        acc.add(Vector2::new(2.0, 3.0));
        acc.add(Vector2::new(-1.0, 7.0));
        let bb = acc.finish().unwrap();
        assert_eq!(bb.width(), 3.0);
        assert_eq!(bb.height(), 4.0);
    }
}
