//! Layer table entry

use super::TableEntry;
use bitflags::bitflags;

bitflags! {
    /// Layer state flags (group code 70, plus "off" from a negative color)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        const FROZEN = 0x1;
        /// Not stored in code 70; set when the layer color is negative
        const OFF = 0x2;
        const LOCKED = 0x4;
    }
}

impl LayerFlags {
    /// Flags from a code-70 value and the signed code-62 color
    pub fn from_dxf(flags: i16, color: i16) -> Self {
        let mut result = LayerFlags::empty();
        result.set(LayerFlags::FROZEN, flags & 0x1 != 0);
        result.set(LayerFlags::LOCKED, flags & 0x4 != 0);
        result.set(LayerFlags::OFF, color < 0);
        result
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub name: String,
    pub flags: LayerFlags,
    /// ACI color index, always positive
    pub color_index: i16,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            flags: LayerFlags::empty(),
            color_index: 7,
        }
    }

    pub fn is_off(&self) -> bool {
        self.flags.contains(LayerFlags::OFF)
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }
}

impl TableEntry for Layer {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_from_dxf() {
        let flags = LayerFlags::from_dxf(5, -3);
        assert!(flags.contains(LayerFlags::FROZEN));
        assert!(flags.contains(LayerFlags::LOCKED));
        assert!(flags.contains(LayerFlags::OFF));

        // bit 2 is "frozen in new viewports", not "off"
        let flags = LayerFlags::from_dxf(2, 7);
        assert!(flags.is_empty());
    }
}
