//! Length measurement and per-key aggregation

use crate::classify::Category;
use crate::entities::PathSegment;
use crate::types::{Vector2, Vector3};
use ahash::RandomState;
use indexmap::IndexMap;

/// Length of a vertex chain; a closed chain includes the closing segment.
///
/// Fewer than two vertices measure zero.
pub fn polyline_length(points: &[Vector3], closed: bool) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let open: f64 = points.windows(2).map(|w| w[0].distance(&w[1])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) => open + last.distance(first),
        _ => open,
    }
}

/// Length of a PDF path.
///
/// Line segments count their distance; a curve counts the chord between its
/// end points times `curve_correction`. Rectangles and close operators add
/// nothing.
pub fn path_length(segments: &[PathSegment], curve_correction: f64) -> f64 {
    let mut current: Option<Vector2> = None;
    let mut total = 0.0;
    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => current = Some(*p),
            PathSegment::LineTo(p) => {
                if let Some(prev) = current {
                    total += prev.distance(p);
                }
                current = Some(*p);
            }
            PathSegment::CurveTo { end, .. } => {
                if let Some(prev) = current {
                    total += prev.distance(end) * curve_correction;
                    current = Some(*end);
                }
            }
            PathSegment::Rect(_) | PathSegment::Close => {}
        }
    }
    total
}

/// Accumulated length of one layer or color key
#[derive(Debug, Clone, PartialEq)]
pub struct LengthAggregate {
    pub key: String,
    pub category: Category,
    /// Drawing units (or points)
    pub length_raw: f64,
    /// Meters; every contribution is converted as it is added
    pub length_m: f64,
    pub segment_count: usize,
}

/// Length aggregates in first-seen order
#[derive(Debug, Clone, Default)]
pub struct LengthTable {
    entries: IndexMap<String, LengthAggregate, RandomState>,
}

impl LengthTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one primitive's length.
    ///
    /// Contributions below `min_length` only count as a segment.
    pub fn add(&mut self, key: &str, category: Category, raw: f64, factor: f64, min_length: f64) {
        let entry = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| LengthAggregate {
                key: key.to_string(),
                category,
                length_raw: 0.0,
                length_m: 0.0,
                segment_count: 0,
            });
        entry.segment_count += 1;
        if raw >= min_length {
            entry.length_raw += raw;
            entry.length_m += raw * factor;
        }
    }

    /// Fold another table into this one; lengths and segment counts add up
    pub fn merge(&mut self, other: LengthTable) {
        for (key, aggregate) in other.entries {
            match self.entries.get_mut(&key) {
                Some(entry) => {
                    entry.length_raw += aggregate.length_raw;
                    entry.length_m += aggregate.length_m;
                    entry.segment_count += aggregate.segment_count;
                }
                None => {
                    self.entries.insert(key, aggregate);
                }
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&LengthAggregate> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LengthAggregate> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Meters summed over the given keys
    pub fn meters_of(&self, keys: &[&str]) -> f64 {
        keys.iter()
            .filter_map(|k| self.entries.get(*k))
            .map(|a| a.length_m)
            .sum()
    }

    /// Meters summed over every aggregate of `category`
    pub fn meters_in(&self, category: Category) -> f64 {
        self.iter()
            .filter(|a| a.category == category)
            .map(|a| a.length_m)
            .sum()
    }
}
