//! Ordered keyword rules.
//!
//! Keywords are lower case and matched as substrings of the lower-cased name.
//! Hungarian and English conventions are mixed in one table since drawings
//! routinely mix both.

use super::Category;

/// One (category, keyword-set) rule
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl Rule {
    /// Whether any keyword occurs in `lower`, which must already be lower case
    pub fn matches(&self, lower: &str) -> bool {
        self.keywords.iter().any(|kw| lower.contains(kw))
    }
}

const SOCKET: &[&str] = &["aljzat", "dugalj", "socket", "outlet", "konnektor", "csatlakoz"];
const SWITCH: &[&str] = &["kapcsolo", "kapcsoló", "switch", "villanykapcs", "ksz"];
const LUMINAIRE: &[&str] = &[
    "lampa", "lámpa", "luminaire", "downlight", "light", "vilagit", "világít", "led",
];
const BREAKER: &[&str] = &[
    "kismegszakit", "kismegszakít", "megszakit", "megszakít", "biztositek", "biztosíték",
    "breaker", "fuse", "mcb", "rcbo", "rcd", "fi rele", "fi relé",
];
const PANEL: &[&str] = &[
    "eloszto", "elosztó", "szekreny", "szekrény", "tablou", "board", "panel", "mdb", "fdb", "szf",
];
const CABLE: &[&str] = &[
    "kabel", "kábel", "cable", "vezetek", "vezeték", "vezeyek", "vez", "villamos", "e-kab",
    "e-vez", "nyy", "nayy", "cyky", "nym",
];
const CABLE_TRAY: &[&str] = &[
    "kabeltalca", "kábeltalca", "talca", "tálca", "tray", "csatorna", "channel", "ct-", "kt-",
];
const MOTOR: &[&str] = &["motor", "pump", "szivattyu", "szivattyú", "ventilator", "ventilatór", "fan"];
const DETECTOR: &[&str] = &["detektor", "detector", "mozgas", "mozgás", "smoke", "fust", "füst", "pir"];
const CAMERA: &[&str] = &["kamera", "camera", "cctv"];

/// Rules in evaluation order; the first match wins.
pub const RULES: &[Rule] = &[
    Rule { category: Category::Socket, keywords: SOCKET },
    Rule { category: Category::Switch, keywords: SWITCH },
    Rule { category: Category::Luminaire, keywords: LUMINAIRE },
    Rule { category: Category::Breaker, keywords: BREAKER },
    Rule { category: Category::Panel, keywords: PANEL },
    Rule { category: Category::Cable, keywords: CABLE },
    Rule { category: Category::CableTray, keywords: CABLE_TRAY },
    Rule { category: Category::Motor, keywords: MOTOR },
    Rule { category: Category::Detector, keywords: DETECTOR },
    Rule { category: Category::Camera, keywords: CAMERA },
];

/// Keyword set of a category, if it has a rule
pub fn keywords_for(category: Category) -> &'static [&'static str] {
    RULES
        .iter()
        .find(|r| r.category == category)
        .map_or(&[], |r| r.keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_has_distinct_category() {
        for (i, a) in RULES.iter().enumerate() {
            for b in &RULES[i + 1..] {
                assert_ne!(a.category, b.category);
            }
        }
    }

    #[test]
    fn test_keywords_are_lower_case() {
        for rule in RULES {
            for kw in rule.keywords {
                assert_eq!(*kw, kw.to_lowercase());
            }
        }
    }

    #[test]
    fn test_keywords_for() {
        assert!(keywords_for(Category::Camera).contains(&"cctv"));
        assert!(keywords_for(Category::Other).is_empty());
    }
}
