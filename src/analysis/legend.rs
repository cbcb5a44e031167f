//! Legend sheet extraction: pair symbols with the text that explains them

use super::vector_paths::{cluster_candidates, symbol_candidates};
use crate::classify::{Category, Classifier, LegendEntry, LegendRecord};
use crate::config::EngineConfig;
use crate::document::DxfDocument;
use crate::entities::EntityType;
use crate::io::pdf::PdfDrawing;
use crate::types::Vector2;

/// Category of a legend meaning, falling back to the symbol name
fn entry_category(classifier: &Classifier, meaning: &str, symbol: &str) -> Category {
    match classifier.classify(meaning) {
        Category::Other => classifier.classify(symbol),
        category => category,
    }
}

/// Index of the text closest to `anchor`, optionally only among texts to its right
fn nearest_text(anchor: Vector2, texts: &[(String, Vector2)], rightward: bool) -> Option<usize> {
    texts
        .iter()
        .enumerate()
        .filter(|(_, (_, p))| !rightward || p.x >= anchor.x)
        .min_by(|(_, (_, a)), (_, (_, b))| anchor.distance(a).total_cmp(&anchor.distance(b)))
        .map(|(i, _)| i)
}

/// Legend of a DXF sheet.
///
/// Each distinct model-space block is paired with the nearest text to its
/// right. Texts left over become entries of their own when they classify.
pub fn dxf_legend(document: &DxfDocument, classifier: &Classifier) -> LegendRecord {
    let texts: Vec<(String, Vector2)> = document
        .model_space_entities()
        .filter_map(|e| e.text())
        .map(|(t, p)| (t.trim().to_string(), p.xy()))
        .filter(|(t, _)| !t.is_empty())
        .collect();

    let mut record = LegendRecord {
        source: "dxf_legend".to_string(),
        ..Default::default()
    };
    let mut used = vec![false; texts.len()];

    for entity in document.model_space_entities() {
        let EntityType::Insert(insert) = entity else {
            continue;
        };
        let symbol = insert.name();
        if record.entries.iter().any(|e| e.symbol == symbol) {
            continue;
        }
        let meaning = match nearest_text(insert.insert_point.xy(), &texts, true) {
            Some(i) => {
                used[i] = true;
                texts[i].0.clone()
            }
            None => symbol.to_string(),
        };
        let category = entry_category(classifier, &meaning, symbol);
        record.push(LegendEntry::new(symbol, meaning, category));
    }

    for (i, (text, _)) in texts.iter().enumerate() {
        if used[i] {
            continue;
        }
        let category = classifier.classify(text);
        if category != Category::Other {
            record.push(LegendEntry::new(text.as_str(), text.as_str(), category));
        }
    }

    if record.entries.is_empty() {
        record
            .warnings
            .push("No symbols or classifiable texts found on the legend sheet".to_string());
    }
    record
}

/// Legend of a PDF sheet: each red symbol cluster is paired with the nearest
/// text run on its page
pub fn pdf_legend(drawing: &PdfDrawing, classifier: &Classifier, config: &EngineConfig) -> LegendRecord {
    let mut record = LegendRecord {
        source: "pdf_legend".to_string(),
        ..Default::default()
    };

    for page in &drawing.pages {
        let texts: Vec<(String, Vector2)> = page
            .texts
            .iter()
            .map(|t| (t.text.trim().to_string(), t.position))
            .filter(|(t, _)| !t.is_empty())
            .collect();
        let clusters = cluster_candidates(&symbol_candidates(page, config), config.cluster_threshold);
        for cluster in clusters {
            let Some(i) = nearest_text(cluster.center, &texts, false) else {
                continue;
            };
            let meaning = &texts[i].0;
            let category = classifier.classify(meaning);
            record.push(LegendEntry::new(meaning.as_str(), meaning.as_str(), category));
        }
    }

    if record.entries.is_empty() {
        record
            .warnings
            .push("No red symbols with nearby text found on the legend sheet".to_string());
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Insert, Text};
    use crate::types::Vector3;

    #[test]
    fn test_dxf_pairs_block_with_text_to_the_right() {
        let mut doc = DxfDocument::new();
        doc.add_entity(EntityType::Insert(Insert::new("SYM_01", Vector3::new(0.0, 0.0, 0.0))));
        doc.add_entity(EntityType::Text(Text::new("Mennyezeti lámpa", Vector3::new(10.0, 0.0, 0.0))));
        doc.add_entity(EntityType::Text(Text::new("Dugalj 2P+F", Vector3::new(-3.0, 0.0, 0.0))));
        doc.add_entity(EntityType::Text(Text::new("Megjegyzés", Vector3::new(0.0, 50.0, 0.0))));

        let record = dxf_legend(&doc, &Classifier::new());
        assert_eq!(record.entries.len(), 2);
        assert_eq!(record.entries[0].symbol, "SYM_01");
        assert_eq!(record.entries[0].meaning, "Mennyezeti lámpa");
        assert_eq!(record.entries[0].category, Category::Luminaire);
        assert_eq!(record.entries[1].category, Category::Socket);
        assert!(record.warnings.is_empty());
    }

    #[test]
    fn test_empty_legend_warns() {
        let record = dxf_legend(&DxfDocument::new(), &Classifier::new());
        assert!(record.entries.is_empty());
        assert_eq!(record.warnings.len(), 1);
    }
}
