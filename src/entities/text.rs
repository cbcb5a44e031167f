//! Single-line and multi-line text entities

use super::{Entity, EntityCommon, EntityKind};
use crate::types::Vector3;
use once_cell::sync::Lazy;
use regex::Regex;

/// TEXT entity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub common: EntityCommon,
    pub value: String,
    pub insertion_point: Vector3,
}

impl Text {
    pub fn new(value: impl Into<String>, insertion_point: Vector3) -> Self {
        Text {
            common: EntityCommon::new(),
            value: value.into(),
            insertion_point,
        }
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Text
    }
}

/// MTEXT entity; `value` holds the plain text with formatting removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MText {
    pub common: EntityCommon,
    pub value: String,
    pub insertion_point: Vector3,
}

impl MText {
    /// Build from raw MTEXT content (codes 3 and 1 concatenated)
    pub fn from_raw(raw: &str, insertion_point: Vector3) -> Self {
        MText {
            common: EntityCommon::new(),
            value: plain_text(raw),
            insertion_point,
        }
    }
}

impl Entity for MText {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::MText
    }
}

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\P").expect("valid regex"));
static FORMAT_ARG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[ACcFfHhQqTtWwp][^;\\]*;").expect("valid regex"));
static STACK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\S([^;^#/]*)[\^#/]([^;]*);").expect("valid regex"));
static TOGGLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\[LlOoKk]").expect("valid regex"));

/// Strip MTEXT inline formatting codes.
pub fn plain_text(raw: &str) -> String {
    let text = PARAGRAPH.replace_all(raw, "\n");
    let text = FORMAT_ARG.replace_all(&text, "");
    let text = STACK.replace_all(&text, "$1/$2");
    let text = TOGGLE.replace_all(&text, "");
    text.replace("\\~", " ")
        .replace("\\{", "\u{0}")
        .replace("\\}", "\u{1}")
        .replace(['{', '}'], "")
        .replace('\u{0}', "{")
        .replace('\u{1}', "}")
        .replace("\\\\", "\\")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(plain_text(r"{\fArial|b1;Elosztó}\PE-1"), "Elosztó\nE-1");
        assert_eq!(plain_text(r"\H2.5;NYY-J 5x\S2^5;"), "NYY-J 5x2/5");
        assert_eq!(plain_text(r"\LAljzat\l 2P"), "Aljzat 2P");
        assert_eq!(plain_text(r"a\~b \{x\}"), "a b {x}");
    }

    #[test]
    fn test_mtext_from_raw() {
        let mt = MText::from_raw(r"\A1;TERV\PCÍM", Vector3::ZERO);
        assert_eq!(mt.value, "TERV\nCÍM");
        assert_eq!(mt.kind(), EntityKind::MText);
    }
}
