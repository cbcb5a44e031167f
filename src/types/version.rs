//! Drawing format versions ($ACADVER)

use std::fmt;

/// AutoCAD drawing version, ordered oldest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DxfVersion {
    #[default]
    Unknown,
    /// R12
    AC1009,
    /// R13
    AC1012,
    /// R14
    AC1014,
    /// 2000
    AC1015,
    /// 2004
    AC1018,
    /// 2007; strings are UTF-8 from here on
    AC1021,
    /// 2010
    AC1024,
    /// 2013
    AC1027,
    /// 2018
    AC1032,
}

impl DxfVersion {
    /// Parse an `$ACADVER` value or a DWG magic ("AC1015")
    pub fn from_version_string(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "AC1009" => DxfVersion::AC1009,
            "AC1012" => DxfVersion::AC1012,
            "AC1014" => DxfVersion::AC1014,
            "AC1015" => DxfVersion::AC1015,
            "AC1018" => DxfVersion::AC1018,
            "AC1021" => DxfVersion::AC1021,
            "AC1024" => DxfVersion::AC1024,
            "AC1027" => DxfVersion::AC1027,
            "AC1032" => DxfVersion::AC1032,
            _ => DxfVersion::Unknown,
        }
    }

    /// Whether strings use the drawing code page rather than UTF-8
    pub fn uses_code_page(&self) -> bool {
        *self < DxfVersion::AC1021
    }

    pub fn release_name(&self) -> &'static str {
        match self {
            DxfVersion::Unknown => "unknown",
            DxfVersion::AC1009 => "R12",
            DxfVersion::AC1012 => "R13",
            DxfVersion::AC1014 => "R14",
            DxfVersion::AC1015 => "2000",
            DxfVersion::AC1018 => "2004",
            DxfVersion::AC1021 => "2007",
            DxfVersion::AC1024 => "2010",
            DxfVersion::AC1027 => "2013",
            DxfVersion::AC1032 => "2018",
        }
    }
}

impl fmt::Display for DxfVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
