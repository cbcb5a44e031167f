//! DXF stream reader trait and common types

use crate::error::Result;
use crate::io::dxf::GroupCodeValueType;
use crate::types::Vector3;
use encoding_rs::Encoding;

/// A DXF code/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct DxfCodePair {
    /// The DXF group code
    pub code: i32,
    pub value_type: GroupCodeValueType,
    /// String representation of the value
    pub value_string: String,
    /// Integer value (integer and bool codes)
    pub value_int: Option<i64>,
    /// Floating-point value (double codes)
    pub value_double: Option<f64>,
}

impl DxfCodePair {
    /// Pair from a textual value, parsed according to the code's type
    pub fn new(code: i32, value_string: String) -> Self {
        let value_type = GroupCodeValueType::from_code(code);
        let trimmed = value_string.trim();

        let value_int = match value_type {
            t if t.is_integer() => parse_int(trimmed),
            GroupCodeValueType::Bool => parse_int(trimmed),
            _ => None,
        };
        let value_double = match value_type {
            GroupCodeValueType::Double => trimmed.parse::<f64>().ok(),
            _ => None,
        };

        Self {
            code,
            value_type,
            value_string,
            value_int,
            value_double,
        }
    }

    /// Pair carrying a binary-decoded double
    pub fn from_double(code: i32, value: f64) -> Self {
        Self {
            code,
            value_type: GroupCodeValueType::Double,
            value_string: value.to_string(),
            value_int: None,
            value_double: Some(value),
        }
    }

    /// Pair carrying a binary-decoded integer or bool
    pub fn from_int(code: i32, value: i64) -> Self {
        Self {
            code,
            value_type: GroupCodeValueType::from_code(code),
            value_string: value.to_string(),
            value_int: Some(value),
            value_double: None,
        }
    }

    /// `0/<name>` structure marker
    pub fn is_marker(&self, name: &str) -> bool {
        self.code == 0 && self.value_string == name
    }

    pub fn as_str(&self) -> &str {
        &self.value_string
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.value_int.and_then(|v| i16::try_from(v).ok())
    }

    pub fn as_double(&self) -> Option<f64> {
        self.value_double
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.value_int.map(|v| v != 0)
    }
}

// Some writers emit integers as "1.0" or with a leading '+'.
fn parse_int(s: &str) -> Option<i64> {
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().filter(|v| v.fract() == 0.0).map(|v| v as i64))
}

/// Trait for reading DXF code/value pairs from a stream
pub trait DxfStreamReader {
    /// Read the next code/value pair
    fn read_pair(&mut self) -> Result<Option<DxfCodePair>>;

    /// Peek at the next code without consuming it
    fn peek_code(&mut self) -> Result<Option<i32>>;

    /// Push a pair back to be read again on next read_pair call
    fn push_back(&mut self, pair: DxfCodePair);

    /// Reset the reader to the beginning
    fn reset(&mut self) -> Result<()>;

    /// Decode non-UTF-8 strings with this encoding from now on
    fn set_encoding(&mut self, encoding: &'static Encoding);
}

/// Helper for reading 3D points from consecutive code pairs
#[derive(Debug, Clone, Default)]
pub struct PointReader {
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    group: Option<i32>,
}

impl PointReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate value; `false` if the pair belongs to another point
    pub fn add_coordinate(&mut self, pair: &DxfCodePair) -> bool {
        let (Some(axis), Some(group)) = (
            GroupCodeValueType::coordinate_axis(pair.code),
            GroupCodeValueType::coordinate_group(pair.code),
        ) else {
            return false;
        };
        if self.group.is_some_and(|g| g != group) {
            return false;
        }
        let Some(value) = pair.as_double() else {
            return false;
        };
        self.group = Some(group);
        match axis {
            0 => self.x = Some(value),
            1 => self.y = Some(value),
            _ => self.z = Some(value),
        }
        true
    }

    /// The point, with z = 0 when absent; `None` unless x and y were read
    pub fn get_point(&self) -> Option<Vector3> {
        match (self.x, self.y) {
            (Some(x), Some(y)) => Some(Vector3::new(x, y, self.z.unwrap_or(0.0))),
            _ => None,
        }
    }
}
