//! Insert entity (block reference)

use super::{Entity, EntityCommon, EntityKind};
use crate::types::Vector3;

/// Block name bucket for inserts without a name
pub const UNKNOWN_BLOCK: &str = "UNKNOWN";

/// A placed instance of a named block.
///
/// Array inserts (MINSERT) place `column_count * row_count` instances.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Block name as read; may be empty
    pub block_name: String,
    pub insert_point: Vector3,
    pub column_count: u16,
    pub row_count: u16,
    pub column_spacing: f64,
    pub row_spacing: f64,
}

impl Insert {
    pub fn new(block_name: impl Into<String>, insert_point: Vector3) -> Self {
        Self {
            common: EntityCommon::default(),
            block_name: block_name.into(),
            insert_point,
            column_count: 1,
            row_count: 1,
            column_spacing: 0.0,
            row_spacing: 0.0,
        }
    }

    /// Builder: set the layer
    pub fn on_layer(mut self, layer: impl Into<String>) -> Self {
        self.common.layer = layer.into();
        self
    }

    /// Block name with the empty name mapped to [`UNKNOWN_BLOCK`]
    pub fn name(&self) -> &str {
        let trimmed = self.block_name.trim();
        if trimmed.is_empty() {
            UNKNOWN_BLOCK
        } else {
            trimmed
        }
    }

    /// Number of instances this insert places
    pub fn instance_count(&self) -> usize {
        usize::from(self.column_count.max(1)) * usize::from(self.row_count.max(1))
    }

    /// Insertion points of every placed instance, row by row
    pub fn instance_points(&self) -> impl Iterator<Item = Vector3> + '_ {
        let columns = self.column_count.max(1);
        let rows = self.row_count.max(1);
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |col| {
                Vector3::new(
                    self.insert_point.x + f64::from(col) * self.column_spacing,
                    self.insert_point.y + f64::from(row) * self.row_spacing,
                    self.insert_point.z,
                )
            })
        })
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Insert
    }
}
