//! Result assembly: tallies and aggregates into one [`ExtractionResult`].
//!
//! Confidence starts from the analyzer's baseline and is lowered by fixed
//! penalties; every penalty comes with a warning telling the caller what was
//! missing.

use super::length::LengthTable;
use super::text_runs::TextRunAnalysis;
use super::vector_paths::{PdfAnalysis, SizeBand};
use super::walker::{BlockTable, BlockTally, WalkOutput};
use crate::classify::{self, Category, Classifier, LayerSpec};
use crate::config::EngineConfig;
use crate::document::DxfDocument;
use crate::io::pdf::PdfDrawing;
use crate::result::{
    BlockEntry, ExtractionResult, LayerInfo, LengthEntry, Source, Summary, TextEntry,
};
use crate::units::ScaleInfo;
use indexmap::IndexMap;

pub const DXF_BASELINE: f64 = 0.95;
pub const NO_BLOCKS_PENALTY: f64 = 0.2;
pub const NO_LENGTHS_PENALTY: f64 = 0.1;
pub const UNITS_GUESSED_PENALTY: f64 = 0.15;
pub const MIN_CONFIDENCE: f64 = 0.1;

const PDF_LOW_CONFIDENCE: f64 = 0.3;
const PDF_SYMBOLS_CONFIDENCE: f64 = 0.65;
const PDF_SYMBOLS_AND_CABLE_CONFIDENCE: f64 = 0.8;
const PDF_WARN_BELOW: f64 = 0.6;
const PDF_EXPECTED_SCALE: u32 = 50;

const TEXT_FOUND_CONFIDENCE: f64 = 0.5;
const TEXT_EMPTY_CONFIDENCE: f64 = 0.2;

/// Layers whose texts make up the title block
const TITLE_LAYER_MARKERS: [&str; 5] = ["TITLE", "CIM", "FEJLEC", "BORDER", "KERET"];

const RED_KEYS: [&str; 2] = ["red", "fill_red"];
const TRAY_KEYS: [&str; 4] = ["cyan", "blue", "fill_cyan", "fill_blue"];
const BLACK_KEYS: [&str; 2] = ["black", "fill_black"];
const GRAY_KEYS: [&str; 2] = ["gray", "fill_gray"];

fn round_to(value: f64, decimals: i32) -> f64 {
    let f = 10f64.powi(decimals);
    (value * f).round() / f
}

/// Round to two decimals and clamp into [0.1, 1.0]
pub fn finalize_confidence(value: f64) -> f64 {
    if value.is_nan() {
        return MIN_CONFIDENCE;
    }
    round_to(value, 2).clamp(MIN_CONFIDENCE, 1.0)
}

/// DXF confidence from the signals that were found
pub fn dxf_confidence(has_blocks: bool, has_lengths: bool, units_guessed: bool) -> f64 {
    let mut confidence = DXF_BASELINE;
    if !has_blocks {
        confidence -= NO_BLOCKS_PENALTY;
    }
    if !has_lengths {
        confidence -= NO_LENGTHS_PENALTY;
    }
    if units_guessed {
        confidence -= UNITS_GUESSED_PENALTY;
    }
    finalize_confidence(confidence)
}

/// Three-tier PDF confidence
pub fn pdf_confidence(cluster_count: usize, red_cable_m: f64, config: &EngineConfig) -> f64 {
    let confidence = if cluster_count > 0 && red_cable_m > config.red_cable_confidence_m {
        PDF_SYMBOLS_AND_CABLE_CONFIDENCE
    } else if cluster_count > 0 {
        PDF_SYMBOLS_CONFIDENCE
    } else {
        PDF_LOW_CONFIDENCE
    };
    finalize_confidence(confidence)
}

fn is_title_layer(layer: &str) -> bool {
    let upper = layer.to_uppercase();
    TITLE_LAYER_MARKERS.iter().any(|m| upper.contains(m))
}

fn block_entry(tally: &BlockTally, category: Category) -> BlockEntry {
    BlockEntry {
        name: tally.name.clone(),
        layer: tally.layer.clone(),
        count: tally.count,
        category,
        positions: tally.positions.iter().map(|p| [p.x, p.y]).collect(),
        positions_truncated: tally.positions_truncated,
    }
}

fn summarize(blocks: &[BlockEntry], lengths: &[LengthEntry], layers: &[String]) -> Summary {
    let meters = |category: Category| -> f64 {
        round_to(
            lengths
                .iter()
                .filter(|l| l.category == category)
                .map(|l| l.length_m)
                .sum(),
            3,
        )
    };
    Summary {
        total_block_types: blocks.len(),
        total_blocks: blocks.iter().map(|b| b.count).sum(),
        total_layers: layers.len(),
        layers_with_lines: lengths.iter().filter(|l| l.length_m > 0.0).count(),
        cable_m: meters(Category::Cable),
        tray_m: meters(Category::CableTray),
    }
}

/// Texts worth reporting: non-empty and shorter than the configured limit
fn keep_text(text: &str, config: &EngineConfig) -> bool {
    !text.is_empty() && text.chars().count() < config.max_text_len
}

/// Build the result of a DXF walk
pub fn assemble_dxf(
    document: &DxfDocument,
    walk: &WalkOutput,
    units: ScaleInfo,
    classifier: &Classifier,
    config: &EngineConfig,
) -> ExtractionResult {
    let blocks: Vec<BlockEntry> = walk
        .blocks
        .most_common(config.max_blocks)
        .into_iter()
        .map(|tally| block_entry(tally, classifier.classify(&tally.name)))
        .collect();

    let mut lengths: Vec<LengthEntry> = walk
        .lengths
        .iter()
        .filter(|a| a.length_raw > config.min_length)
        .map(|a| LengthEntry {
            layer: a.key.clone(),
            length_m: round_to(a.length_m, 3),
            length_raw: round_to(a.length_raw, 4),
            category: a.category,
            segment_count: a.segment_count,
            info: LayerSpec::parse(&a.key),
            label: None,
            estimated: false,
        })
        .collect();
    lengths.sort_by(|a, b| b.length_m.total_cmp(&a.length_m));

    let layers = document.layer_names();
    let layer_info = layers
        .iter()
        .map(|name| {
            let table_entry = document.layers.get(name);
            LayerInfo {
                name: name.clone(),
                category: classifier.classify_layer(name),
                is_cable: classify::is_cable_layer(name),
                is_cable_tray: classify::is_cable_tray_layer(name),
                color_index: table_entry.map(|l| l.color_index),
                is_off: table_entry.is_some_and(|l| l.is_off()),
                is_frozen: table_entry.is_some_and(|l| l.is_frozen()),
                is_locked: table_entry.is_some_and(|l| l.is_locked()),
            }
        })
        .collect();

    let mut texts = Vec::new();
    let mut title_block: IndexMap<String, Vec<String>> = IndexMap::new();
    for entity in document.entities() {
        let Some((text, _)) = entity.text() else {
            continue;
        };
        let text = text.trim();
        if !keep_text(text, config) {
            continue;
        }
        let layer = entity.layer();
        if is_title_layer(layer) {
            title_block
                .entry(layer.to_string())
                .or_default()
                .push(text.to_string());
        }
        if texts.len() < config.max_texts {
            texts.push(TextEntry {
                text: text.to_string(),
                layer: Some(layer.to_string()),
                page: None,
            });
        }
    }

    let has_blocks = !walk.blocks.is_empty();
    let has_lengths = lengths
        .iter()
        .any(|l| matches!(l.category, Category::Cable | Category::CableTray));
    let mut warnings = Vec::new();
    if !has_blocks {
        warnings.push(
            "No block references found; device counts are missing. \
             Re-export the drawing with device symbols as blocks."
                .to_string(),
        );
    }
    if !has_lengths {
        warnings.push(
            "No cable or cable tray lengths found. \
             Re-export with layer names that identify cable runs (e.g. KABEL, TALCA)."
                .to_string(),
        );
    }
    if units.is_guess() {
        warnings.push(format!(
            "Drawing units are not declared ($INSUNITS); assumed {} ({}). \
             Check a known dimension before using the lengths.",
            units.name, units.detection_method
        ));
    }
    warnings.extend(document.notifications.user_messages());

    let confidence = dxf_confidence(has_blocks, has_lengths, units.is_guess());
    log::info!(
        "DXF takeoff: {} block types, {} length layers, confidence {}",
        blocks.len(),
        lengths.len(),
        confidence
    );

    ExtractionResult {
        summary: summarize(&blocks, &lengths, &layers),
        blocks,
        lengths,
        layers,
        layer_info,
        units,
        confidence,
        warnings,
        notes: Vec::new(),
        texts,
        title_block,
        source: Source::Dxf,
    }
}

fn raw_of(lengths: &LengthTable, keys: &[&str]) -> f64 {
    keys.iter()
        .filter_map(|k| lengths.get(k))
        .map(|a| a.length_raw)
        .sum()
}

fn segments_of(lengths: &LengthTable, keys: &[&str]) -> usize {
    keys.iter()
        .filter_map(|k| lengths.get(k))
        .map(|a| a.segment_count)
        .sum()
}

fn pdf_length(
    lengths: &LengthTable,
    layer: &str,
    keys: &[&str],
    category: Category,
    label: &str,
) -> LengthEntry {
    LengthEntry {
        layer: layer.to_string(),
        length_m: round_to(lengths.meters_of(keys), 1),
        length_raw: round_to(raw_of(lengths, keys), 1),
        category,
        segment_count: segments_of(lengths, keys),
        info: None,
        label: Some(label.to_string()),
        estimated: false,
    }
}

/// Build the result of a PDF vector analysis
pub fn assemble_pdf(
    drawing: &PdfDrawing,
    analysis: &PdfAnalysis,
    config: &EngineConfig,
) -> ExtractionResult {
    let units = analysis.scale();
    let table: BlockTable = analysis.blocks(config.max_positions);
    let blocks: Vec<BlockEntry> = SizeBand::ALL
        .iter()
        .flat_map(|band| {
            table
                .iter()
                .filter(move |t| t.layer == band.layer())
                .map(move |t| block_entry(t, band.category()))
        })
        .collect();

    let lengths_table = analysis.lengths();
    let red_m = lengths_table.meters_of(&RED_KEYS);
    let tray_m = lengths_table.meters_of(&TRAY_KEYS);
    let black_m = lengths_table.meters_of(&BLACK_KEYS);
    let gray_m = lengths_table.meters_of(&GRAY_KEYS);

    let mut lengths = Vec::new();
    let mut notes = Vec::new();
    if red_m > config.pdf_min_length_m {
        lengths.push(pdf_length(
            &lengths_table,
            "PDF_RED_CABLE",
            &RED_KEYS,
            Category::Cable,
            "Erőátviteli kábel (piros)",
        ));
    }
    if tray_m > config.pdf_min_length_m {
        lengths.push(pdf_length(
            &lengths_table,
            "PDF_CYAN_TRAY",
            &TRAY_KEYS,
            Category::CableTray,
            "Kábeltálca (kék/türkiz)",
        ));
    }
    if lengths.is_empty() && black_m > config.black_fallback_min_m {
        let share = config.black_fallback_share;
        let mut entry = pdf_length(
            &lengths_table,
            "PDF_BLACK_CABLE",
            &BLACK_KEYS,
            Category::Cable,
            "Kábel (fekete, becsült)",
        );
        entry.length_m = round_to(black_m * share, 1);
        entry.length_raw = round_to(raw_of(&lengths_table, &BLACK_KEYS) * share, 1);
        entry.estimated = true;
        lengths.push(entry);
        notes.push(format!(
            "Cable length estimated as {:.0}% of {:.0} m black line work; not a measured value.",
            share * 100.0,
            black_m
        ));
    }
    if lengths.is_empty() {
        lengths.push(LengthEntry {
            layer: "PDF_VECTOR".to_string(),
            length_m: 0.0,
            length_raw: 0.0,
            category: Category::Other,
            segment_count: 0,
            info: None,
            label: None,
            estimated: false,
        });
    }

    let cluster_count = analysis.cluster_count();
    let confidence = pdf_confidence(cluster_count, red_m, config);

    let format = units
        .paper_format
        .map_or_else(|| "unknown".to_string(), |f| f.to_string());
    let scale = units.scale_denominator;
    notes.insert(
        0,
        format!(
            "PDF vector analysis ({} sheet, 1:{} scale).",
            format,
            scale.map_or_else(|| "?".to_string(), |s| s.to_string())
        ),
    );
    notes.insert(1, format!("Red symbol clusters: {}.", cluster_count));
    notes.insert(2, format!("Red lines: {:.0} m, cyan/blue lines: {:.0} m.", red_m, tray_m));
    notes.insert(3, format!("Gray lines (walls, furniture; excluded): {:.0} m.", gray_m));

    let mut warnings = Vec::new();
    if confidence < PDF_WARN_BELOW {
        warnings.push(
            "Few red or cyan symbols could be identified; the drawing may use another color \
             convention. Check the quantities manually."
                .to_string(),
        );
    }
    if scale != Some(PDF_EXPECTED_SCALE) {
        warnings.push(format!(
            "Scale estimated as 1:{} from the {} sheet size. If the drawing uses another scale \
             the lengths are off proportionally.",
            scale.map_or_else(|| "?".to_string(), |s| s.to_string()),
            format
        ));
    }
    let mismatched = analysis.mismatched_pages();
    if !mismatched.is_empty() {
        let pages: Vec<String> = mismatched.iter().map(|i| (i + 1).to_string()).collect();
        warnings.push(format!(
            "Pages {} have a different sheet size than page 1; their lengths use their own scale.",
            pages.join(", ")
        ));
    }
    warnings.extend(drawing.notifications.user_messages());

    let mut layers: Vec<String> = Vec::new();
    for layer in blocks.iter().map(|b| &b.layer).chain(lengths.iter().map(|l| &l.layer)) {
        if !layers.contains(layer) {
            layers.push(layer.clone());
        }
    }
    let layer_info = layers
        .iter()
        .map(|name| {
            let category = SizeBand::from_layer(name)
                .map(|band| band.category())
                .or_else(|| lengths.iter().find(|l| &l.layer == name).map(|l| l.category))
                .unwrap_or(Category::Other);
            LayerInfo {
                name: name.clone(),
                category,
                is_cable: category == Category::Cable,
                is_cable_tray: category == Category::CableTray,
                color_index: None,
                is_off: false,
                is_frozen: false,
                is_locked: false,
            }
        })
        .collect();

    let texts = drawing
        .texts()
        .map(|(page, run)| (page, run.text.trim()))
        .filter(|(_, text)| keep_text(text, config))
        .take(config.max_texts)
        .map(|(page, text)| TextEntry {
            text: text.to_string(),
            layer: None,
            page: Some(page + 1),
        })
        .collect();

    log::info!(
        "PDF takeoff: {} pages, {} clusters, red {:.1} m, tray {:.1} m, confidence {}",
        drawing.page_count(),
        cluster_count,
        red_m,
        tray_m,
        confidence
    );

    ExtractionResult {
        summary: summarize(&blocks, &lengths, &layers),
        blocks,
        lengths,
        layers,
        layer_info,
        units,
        confidence,
        warnings,
        notes,
        texts,
        title_block: IndexMap::new(),
        source: Source::PdfVector,
    }
}

/// Build the result of a text-run analysis
pub fn assemble_text_runs(
    analysis: &TextRunAnalysis,
    source: Source,
    mut warnings: Vec<String>,
) -> ExtractionResult {
    let layer = match source {
        Source::DwgText => "DWG",
        _ => "TEXT",
    };
    let blocks: Vec<BlockEntry> = analysis
        .counts
        .iter()
        .map(|c| BlockEntry {
            name: c.name.to_string(),
            layer: layer.to_string(),
            count: c.count,
            category: c.category,
            positions: Vec::new(),
            positions_truncated: false,
        })
        .collect();

    let lengths = if analysis.lengths_m.is_empty() {
        vec![LengthEntry {
            layer: layer.to_string(),
            length_m: 0.0,
            length_raw: 0.0,
            category: Category::Other,
            segment_count: 0,
            info: None,
            label: None,
            estimated: false,
        }]
    } else {
        let total = round_to(analysis.total_length_m(), 3);
        vec![LengthEntry {
            layer: format!("{}_TEXT", layer),
            length_m: total,
            length_raw: total,
            category: Category::Cable,
            segment_count: analysis.lengths_m.len(),
            info: None,
            label: Some("Length mentions in text".to_string()),
            estimated: true,
        }]
    };

    if source == Source::DwgText {
        warnings.insert(
            0,
            "DWG is a binary format; only text fragments were read. \
             Convert the drawing to DXF for a full takeoff."
                .to_string(),
        );
    }
    let found = analysis.found_anything();
    if !found {
        warnings.push("No recognizable devices or lengths in the readable text.".to_string());
    }
    let confidence = finalize_confidence(if found {
        TEXT_FOUND_CONFIDENCE
    } else {
        TEXT_EMPTY_CONFIDENCE
    });

    let layers: Vec<String> = vec![layer.to_string()];
    ExtractionResult {
        summary: summarize(&blocks, &lengths, &layers),
        blocks,
        lengths,
        layer_info: Vec::new(),
        layers,
        units: ScaleInfo::from_text(),
        confidence,
        warnings,
        notes: Vec::new(),
        texts: Vec::new(),
        title_block: IndexMap::new(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::text_runs;
    use crate::analysis::walker::walk;
    use crate::entities::{EntityType, Insert, Line, MText, Text};
    use crate::types::Vector3;
    use crate::units::resolve_drawing_units;

    #[test]
    fn test_confidence_penalties() {
        assert_eq!(dxf_confidence(true, true, false), 0.95);
        assert_eq!(dxf_confidence(false, true, false), 0.75);
        assert_eq!(dxf_confidence(false, false, true), 0.5);
        assert_eq!(finalize_confidence(-3.0), 0.1);
        assert_eq!(finalize_confidence(1.7), 1.0);
        assert_eq!(finalize_confidence(f64::NAN), 0.1);
    }

    #[test]
    fn test_pdf_tiers() {
        let config = EngineConfig::default();
        assert_eq!(pdf_confidence(0, 100.0, &config), 0.3);
        assert_eq!(pdf_confidence(3, 5.0, &config), 0.65);
        assert_eq!(pdf_confidence(3, 5.1, &config), 0.8);
    }

    fn sample_document() -> DxfDocument {
        let mut doc = DxfDocument::new();
        doc.header.insunits = Some(4);
        for i in 0..3 {
            doc.add_entity(EntityType::Insert(
                Insert::new("Aljzat-2P", Vector3::new(i as f64 * 100.0, 0.0, 0.0))
                    .on_layer("VILL-DUGALJ"),
            ));
        }
        let mut line = Line::from_points(Vector3::ZERO, Vector3::new(12.0, 0.0, 0.0));
        line.common.layer = "KABEL-NYY".to_string();
        doc.add_entity(EntityType::Line(line));
        let mut title = Text::new("Tervező: Kiss Anna", Vector3::new(900.0, 10.0, 0.0));
        title.common.layer = "KERET".to_string();
        title.common.paper_space = true;
        doc.add_entity(EntityType::Text(title));
        doc.add_entity(EntityType::MText(MText::from_raw(&"x".repeat(250), Vector3::ZERO)));
        doc
    }

    #[test]
    fn test_assemble_dxf() {
        let doc = sample_document();
        let config = EngineConfig::default();
        let classifier = Classifier::new();
        let units = resolve_drawing_units(doc.header.insunits, doc.extents());
        let walk = walk(&doc, &classifier, units.factor, &config);
        let result = assemble_dxf(&doc, &walk, units, &classifier, &config);

        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.blocks[0].count, 3);
        assert_eq!(result.blocks[0].category, Category::Socket);
        assert_eq!(result.lengths.len(), 1);
        assert_eq!(result.lengths[0].length_m, 0.012);
        assert_eq!(result.lengths[0].category, Category::Cable);
        assert_eq!(result.confidence, 0.95);
        assert!(result.warnings.is_empty());
        assert_eq!(result.summary.cable_m, 0.012);
        assert_eq!(result.texts.len(), 1);
        assert_eq!(result.title_block["KERET"], vec!["Tervező: Kiss Anna".to_string()]);
        assert_eq!(result.source, Source::Dxf);
    }

    #[test]
    fn test_empty_dxf_degrades() {
        let doc = DxfDocument::new();
        let config = EngineConfig::default();
        let classifier = Classifier::new();
        let units = resolve_drawing_units(None, None);
        let walk = walk(&doc, &classifier, units.factor, &config);
        let result = assemble_dxf(&doc, &walk, units, &classifier, &config);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.warnings.len(), 3);
        assert!(result.lengths.is_empty());
    }

    #[test]
    fn test_text_run_result() {
        let analysis = text_runs::analyze(b"\x00\x00 dugalj 12 db dugalj \x00 NYY 120 m \x00");
        let result = assemble_text_runs(&analysis, Source::DwgText, Vec::new());
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.blocks[0].count, 12);
        assert_eq!(result.lengths[0].layer, "DWG_TEXT");
        assert!(result.lengths[0].estimated);
        assert_eq!(result.warnings.len(), 1);

        let empty = assemble_text_runs(&Default::default(), Source::TextFallback, Vec::new());
        assert_eq!(empty.confidence, 0.2);
        assert_eq!(empty.lengths[0].layer, "TEXT");
        assert_eq!(empty.lengths[0].length_m, 0.0);
    }
}
