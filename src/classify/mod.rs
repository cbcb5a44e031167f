//! Semantic classification of block and layer names.
//!
//! A name maps to exactly one [`Category`] through an ordered rule table; the
//! first rule with a keyword occurring in the lower-cased name wins. Layers
//! additionally answer "carries cable" and "carries cable tray" independently
//! of their category, which decides which lengths count towards the cable and
//! tray totals.

mod layer_spec;
mod legend;
mod rules;

pub use layer_spec::{LayerSpec, LayerSpecKind};
pub use legend::{is_legend_filename, LegendEntry, LegendRecord};
pub use rules::{keywords_for, Rule, RULES};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of device, cable and tray categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Socket,
    Switch,
    Luminaire,
    Breaker,
    Panel,
    Cable,
    CableTray,
    Motor,
    Detector,
    Camera,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Socket => "socket",
            Category::Switch => "switch",
            Category::Luminaire => "luminaire",
            Category::Breaker => "breaker",
            Category::Panel => "panel",
            Category::Cable => "cable",
            Category::CableTray => "cable_tray",
            Category::Motor => "motor",
            Category::Detector => "detector",
            Category::Camera => "camera",
            Category::Other => "other",
        }
    }

    /// Parse the serialized name back; unknown names are `None`
    pub fn from_name(name: &str) -> Option<Category> {
        let category = match name.trim().to_lowercase().as_str() {
            "socket" => Category::Socket,
            "switch" => Category::Switch,
            "luminaire" => Category::Luminaire,
            "breaker" => Category::Breaker,
            "panel" => Category::Panel,
            "cable" => Category::Cable,
            "cable_tray" => Category::CableTray,
            "motor" => Category::Motor,
            "detector" => Category::Detector,
            "camera" => Category::Camera,
            "other" => Category::Other,
            _ => return None,
        };
        Some(category)
    }

    /// Countable device categories
    pub fn is_device(&self) -> bool {
        !matches!(self, Category::Cable | Category::CableTray | Category::Other)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name classifier, optionally biased by a legend.
///
/// Legend entries are evaluated before the built-in rules, in the order given.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    overrides: Vec<(String, Category)>,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifier whose legend symbols take precedence over the keyword rules
    pub fn with_legend(entries: &[LegendEntry]) -> Self {
        let overrides = entries
            .iter()
            .filter_map(|e| {
                let symbol = e.symbol.trim().to_lowercase();
                (!symbol.is_empty()).then_some((symbol, e.category))
            })
            .collect();
        Self { overrides }
    }

    pub fn has_legend(&self) -> bool {
        !self.overrides.is_empty()
    }

    /// Category of a block (or any free-text) name
    pub fn classify(&self, name: &str) -> Category {
        let lower = name.to_lowercase();
        self.legend_category(&lower)
            .unwrap_or_else(|| classify_lower(&lower))
    }

    /// Category of a layer name: tray keywords beat cable keywords, which beat
    /// the general rule table
    pub fn classify_layer(&self, name: &str) -> Category {
        let lower = name.to_lowercase();
        if let Some(category) = self.legend_category(&lower) {
            return category;
        }
        if matches_keywords(&lower, Category::CableTray) {
            Category::CableTray
        } else if matches_keywords(&lower, Category::Cable) {
            Category::Cable
        } else {
            classify_lower(&lower)
        }
    }

    fn legend_category(&self, lower: &str) -> Option<Category> {
        self.overrides
            .iter()
            .find(|(symbol, _)| lower.contains(symbol.as_str()))
            .map(|(_, category)| *category)
    }
}

fn classify_lower(lower: &str) -> Category {
    RULES
        .iter()
        .find(|rule| rule.matches(lower))
        .map_or(Category::Other, |rule| rule.category)
}

fn matches_keywords(lower: &str, category: Category) -> bool {
    keywords_for(category).iter().any(|kw| lower.contains(kw))
}

/// Classify with the built-in rules only
pub fn classify(name: &str) -> Category {
    classify_lower(&name.to_lowercase())
}

/// Whether a layer name marks cable runs
pub fn is_cable_layer(name: &str) -> bool {
    matches_keywords(&name.to_lowercase(), Category::Cable)
}

/// Whether a layer name marks cable trays
pub fn is_cable_tray_layer(name: &str) -> bool {
    matches_keywords(&name.to_lowercase(), Category::CableTray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_names() {
        assert_eq!(classify("Aljzat-2P"), Category::Socket);
        assert_eq!(classify("KAPCSOLO_1"), Category::Switch);
        assert_eq!(classify("LÁMPA_60x60"), Category::Luminaire);
        assert_eq!(classify("MCB-C16"), Category::Breaker);
        assert_eq!(classify("Elosztó szekrény"), Category::Panel);
        assert_eq!(classify("CCTV_dome"), Category::Camera);
        assert_eq!(classify("xyz"), Category::Other);
        assert_eq!(classify(""), Category::Other);
    }

    #[test]
    fn test_first_rule_wins() {
        assert_eq!(classify("panel cable"), Category::Panel);
        assert_eq!(classify("cable panel"), Category::Panel);
        assert_eq!(classify("socket switch"), Category::Socket);
    }

    #[test]
    fn test_layer_category_prefers_tray() {
        let c = Classifier::new();
        assert_eq!(c.classify_layer("E-CABLE_TRAY"), Category::CableTray);
        assert_eq!(c.classify_layer("KABEL-NYY"), Category::Cable);
        assert_eq!(c.classify_layer("VILL-DUGALJ"), Category::Socket);
        assert_eq!(c.classify_layer("0"), Category::Other);
    }

    #[test]
    fn test_layer_booleans_are_independent() {
        assert!(is_cable_layer("KABELTALCA"));
        assert!(is_cable_tray_layer("KABELTALCA"));
        assert!(!is_cable_layer("FAL"));
        assert!(!is_cable_tray_layer("KABEL-NYY"));
    }

    #[test]
    fn test_legend_overrides_rules() {
        let legend = vec![LegendEntry::new("DUGALJ", "Dupla dugalj", Category::Switch)];
        let c = Classifier::with_legend(&legend);
        assert!(c.has_legend());
        assert_eq!(c.classify("dugalj-2x"), Category::Switch);
        assert_eq!(c.classify("lampa"), Category::Luminaire);
    }

    #[test]
    fn test_category_names_round_trip() {
        for rule in RULES {
            assert_eq!(Category::from_name(rule.category.as_str()), Some(rule.category));
        }
        assert_eq!(Category::from_name("other"), Some(Category::Other));
        assert_eq!(Category::from_name("widget"), None);
    }
}
