//! Vector paths painted on a PDF page

use super::EntityKind;
use crate::types::{BoundingBox2D, BoundsAccumulator, ColorCategory, Rgb, Vector2};
use std::fmt;

/// One segment of a path, in page space (points)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Vector2),
    LineTo(Vector2),
    /// Cubic bezier; control points only matter for the bounds
    CurveTo {
        c1: Vector2,
        c2: Vector2,
        end: Vector2,
    },
    /// Rectangle from `re`, already transformed to its four corners
    Rect([Vector2; 4]),
    Close,
}

impl PathSegment {
    fn points(&self) -> &[Vector2] {
        match self {
            PathSegment::MoveTo(p) | PathSegment::LineTo(p) => std::slice::from_ref(p),
            PathSegment::CurveTo { .. } => &[],
            PathSegment::Rect(corners) => corners,
            PathSegment::Close => &[],
        }
    }
}

/// Key under which a path's length is accumulated: its stroke color, or its
/// fill color when the path is only filled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColorKey {
    pub category: ColorCategory,
    pub fill_only: bool,
}

impl ColorKey {
    pub fn stroke(category: ColorCategory) -> Self {
        ColorKey { category, fill_only: false }
    }

    pub fn fill(category: ColorCategory) -> Self {
        ColorKey { category, fill_only: true }
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.fill_only {
            write!(f, "fill_{}", self.category)
        } else {
            write!(f, "{}", self.category)
        }
    }
}

/// A painted path with its colors
#[derive(Debug, Clone, PartialEq)]
pub struct VectorPath {
    pub segments: Vec<PathSegment>,
    /// Fill color, if the path was filled
    pub fill: Option<Rgb>,
    /// Stroke color, if the path was stroked
    pub stroke: Option<Rgb>,
    pub page: usize,
}

impl VectorPath {
    pub fn new(segments: Vec<PathSegment>, fill: Option<Rgb>, stroke: Option<Rgb>, page: usize) -> Self {
        Self { segments, fill, stroke, page }
    }

    pub fn kind(&self) -> EntityKind {
        EntityKind::VectorPath
    }

    pub fn fill_category(&self) -> ColorCategory {
        ColorCategory::classify(self.fill)
    }

    pub fn stroke_category(&self) -> ColorCategory {
        ColorCategory::classify(self.stroke)
    }

    pub fn color_key(&self) -> ColorKey {
        match self.stroke_category() {
            ColorCategory::None => ColorKey::fill(self.fill_category()),
            stroke => ColorKey::stroke(stroke),
        }
    }

    /// Whether fill or stroke is red
    pub fn is_red(&self) -> bool {
        self.fill_category() == ColorCategory::Red || self.stroke_category() == ColorCategory::Red
    }

    /// Bounding rectangle over all segment points including curve control points
    pub fn bounds(&self) -> Option<BoundingBox2D> {
        let mut acc = BoundsAccumulator::new();
        for segment in &self.segments {
            if let PathSegment::CurveTo { c1, c2, end } = segment {
                acc.add(*c1);
                acc.add(*c2);
                acc.add(*end);
            }
            for p in segment.points() {
                acc.add(*p);
            }
        }
        acc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_key() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let stroked = VectorPath::new(vec![], Some(red), Some(Rgb::BLACK), 0);
        assert_eq!(stroked.color_key().to_string(), "black");
        assert!(stroked.is_red());

        let filled = VectorPath::new(vec![], Some(red), None, 0);
        assert_eq!(filled.color_key().to_string(), "fill_red");
    }

    #[test]
    fn test_bounds_include_control_points() {
        let path = VectorPath::new(
            vec![
                PathSegment::MoveTo(Vector2::new(0.0, 0.0)),
                PathSegment::CurveTo {
                    c1: Vector2::new(0.0, 10.0),
                    c2: Vector2::new(10.0, 10.0),
                    end: Vector2::new(10.0, 0.0),
                },
            ],
            None,
            Some(Rgb::BLACK),
            0,
        );
        let bb = path.bounds().unwrap();
        assert_eq!(bb.width(), 10.0);
        assert_eq!(bb.height(), 10.0);
        assert!(VectorPath::new(vec![PathSegment::Close], None, None, 0).bounds().is_none());
    }
}
