//! `$DWGCODEPAGE` to text encoding.
//!
//! Drawings older than AutoCAD 2007 store strings in the code page named by
//! the header. Hungarian drawings are almost always `ANSI_1250`.

use encoding_rs::Encoding;

/// Encoding for a DXF code page name, case-insensitive.
///
/// `None` for UTF-8 and for names not listed; the text reader then falls
/// back to Latin-1.
pub fn encoding_from_code_page(code_page: &str) -> Option<&'static Encoding> {
    let name = code_page.trim().to_ascii_lowercase().replace('_', "-");
    let encoding = match name.as_str() {
        "ansi-1250" | "dos852" | "iso8859-2" => encoding_rs::WINDOWS_1250,
        "ansi-1251" => encoding_rs::WINDOWS_1251,
        "ansi-1252" | "dos850" | "iso8859-1" => encoding_rs::WINDOWS_1252,
        "ansi-1253" | "iso8859-7" => encoding_rs::WINDOWS_1253,
        "ansi-1254" => encoding_rs::WINDOWS_1254,
        "ansi-1255" => encoding_rs::WINDOWS_1255,
        "ansi-1256" => encoding_rs::WINDOWS_1256,
        "ansi-1257" => encoding_rs::WINDOWS_1257,
        "ansi-1258" => encoding_rs::WINDOWS_1258,
        "ansi-874" => encoding_rs::WINDOWS_874,
        "ansi-932" => encoding_rs::SHIFT_JIS,
        "ansi-936" => encoding_rs::GBK,
        "ansi-949" => encoding_rs::EUC_KR,
        "ansi-950" => encoding_rs::BIG5,
        "dos866" => encoding_rs::IBM866,
        "iso8859-5" => encoding_rs::ISO_8859_5,
        _ => return None,
    };
    Some(encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_central_european() {
        assert_eq!(encoding_from_code_page("ANSI_1250"), Some(encoding_rs::WINDOWS_1250));
        assert_eq!(encoding_from_code_page("dos852"), Some(encoding_rs::WINDOWS_1250));
        assert_eq!(encoding_from_code_page("ISO8859_2"), Some(encoding_rs::WINDOWS_1250));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(encoding_from_code_page("UTF-8"), None);
        assert_eq!(encoding_from_code_page(""), None);
    }
}
