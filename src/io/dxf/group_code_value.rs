//! Value types of DXF group codes
//!
//! The group code alone decides how a value is stored: as a line of text in
//! ASCII DXF, or with a fixed binary width in binary DXF.

/// Storage type of a group-code value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupCodeValueType {
    String,
    Double,
    Int16,
    Int32,
    Int64,
    /// One byte in binary DXF
    Bool,
    /// Hex handle, stored as a string
    Handle,
    /// Length-prefixed chunk in binary DXF, hex text in ASCII DXF
    Binary,
    Comment,
}

impl GroupCodeValueType {
    /// Value type for a group code
    pub fn from_code(code: i32) -> Self {
        match code {
            0..=9 => GroupCodeValueType::String,
            10..=59 => GroupCodeValueType::Double,
            60..=79 => GroupCodeValueType::Int16,
            90..=99 => GroupCodeValueType::Int32,
            105 => GroupCodeValueType::Handle,
            110..=149 => GroupCodeValueType::Double,
            160..=169 => GroupCodeValueType::Int64,
            170..=179 => GroupCodeValueType::Int16,
            210..=239 => GroupCodeValueType::Double,
            270..=289 => GroupCodeValueType::Int16,
            290..=299 => GroupCodeValueType::Bool,
            300..=309 => GroupCodeValueType::String,
            310..=319 => GroupCodeValueType::Binary,
            320..=369 => GroupCodeValueType::Handle,
            370..=389 => GroupCodeValueType::Int16,
            390..=399 => GroupCodeValueType::Handle,
            400..=409 => GroupCodeValueType::Int16,
            410..=419 => GroupCodeValueType::String,
            420..=429 => GroupCodeValueType::Int32,
            430..=439 => GroupCodeValueType::String,
            440..=459 => GroupCodeValueType::Int32,
            460..=469 => GroupCodeValueType::Double,
            470..=479 => GroupCodeValueType::String,
            480..=481 => GroupCodeValueType::Handle,
            999 => GroupCodeValueType::Comment,
            1004 => GroupCodeValueType::Binary,
            1000..=1009 => GroupCodeValueType::String,
            1010..=1059 => GroupCodeValueType::Double,
            1060..=1070 => GroupCodeValueType::Int16,
            1071 => GroupCodeValueType::Int32,
            _ => GroupCodeValueType::String,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            GroupCodeValueType::Int16 | GroupCodeValueType::Int32 | GroupCodeValueType::Int64
        )
    }

    /// Axis (0 = x, 1 = y, 2 = z) of a coordinate group code
    pub fn coordinate_axis(code: i32) -> Option<usize> {
        match code {
            10..=18 | 110..=112 | 210 | 1010..=1013 => Some(0),
            20..=28 | 120..=122 | 220 | 1020..=1023 => Some(1),
            30..=38 | 130..=132 | 230 | 1030..=1033 => Some(2),
            _ => None,
        }
    }

    /// Point group of a coordinate code: 10, 20 and 30 all belong to group 0
    pub fn coordinate_group(code: i32) -> Option<i32> {
        Self::coordinate_axis(code).map(|axis| code - 10 * axis as i32)
    }
}
