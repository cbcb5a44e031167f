//! Extraction entry point: format detection and dispatch.
//!
//! The engine holds only its configuration; every call is independent and
//! can run on any thread.

use crate::analysis::{self, assemble, legend, text_runs, vector_paths};
use crate::classify::{is_legend_filename, Classifier, LegendEntry, LegendRecord};
use crate::config::EngineConfig;
use crate::document::DxfDocument;
use crate::error::{Result, TakeoffError};
use crate::io::dxf::{DxfReader, DxfReaderConfiguration, BINARY_DXF_SENTINEL};
use crate::io::pdf::PdfDrawing;
use crate::result::{Extraction, ExtractionResult, Source};
use crate::units::resolve_drawing_units;
use std::fmt;
use std::path::Path;

/// Bytes searched for the `%PDF-` header
const PDF_HEADER_WINDOW: usize = 1024;
/// Bytes searched for a leading `0`/`SECTION` pair
const DXF_SNIFF_WINDOW: usize = 4096;

/// Format of an input buffer, from its leading bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Pdf,
    BinaryDxf,
    TextDxf,
    /// Native DWG; only its text runs are read
    Dwg,
    Unknown,
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputFormat::Pdf => "PDF",
            InputFormat::BinaryDxf => "binary DXF",
            InputFormat::TextDxf => "DXF",
            InputFormat::Dwg => "DWG",
            InputFormat::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Detect the format of `bytes`
pub fn sniff(bytes: &[u8]) -> InputFormat {
    let head = &bytes[..bytes.len().min(PDF_HEADER_WINDOW)];
    if head.windows(5).any(|w| w == b"%PDF-") {
        return InputFormat::Pdf;
    }
    if bytes.starts_with(BINARY_DXF_SENTINEL) {
        return InputFormat::BinaryDxf;
    }
    if bytes.starts_with(b"AC10") || bytes.starts_with(b"AC1.") {
        return InputFormat::Dwg;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(DXF_SNIFF_WINDOW)]);
    let lines: Vec<&str> = head
        .lines()
        .map(|l| l.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}'))
        .collect();
    if lines.windows(2).any(|w| w[0] == "0" && w[1] == "SECTION") {
        return InputFormat::TextDxf;
    }
    InputFormat::Unknown
}

/// Optional context for one extraction
#[derive(Debug, Clone, Default)]
pub struct ExtractionHints {
    /// Original file name; only used to recognize legend sheets
    pub filename: Option<String>,
    /// Legend entries that take precedence over the built-in rules
    pub legend: Vec<LegendEntry>,
}

impl ExtractionHints {
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Self {
            filename: Some(filename.into()),
            ..Default::default()
        }
    }

    pub fn with_legend(mut self, legend: Vec<LegendEntry>) -> Self {
        self.legend = legend;
        self
    }

    /// The file is itself a legend sheet
    pub fn is_legend_sheet(&self) -> bool {
        self.filename.as_deref().is_some_and(is_legend_filename)
    }
}

/// Quantity extraction engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Extract quantities (or a legend) from a file on disk
    pub fn extract_file<P: AsRef<Path>>(&self, path: P, hints: &ExtractionHints) -> Result<Extraction> {
        let bytes = std::fs::read(path)?;
        self.extract(&bytes, hints)
    }

    /// Extract quantities, or a legend record when the hints name a legend sheet.
    ///
    /// Fails only for empty input or input without any readable text;
    /// everything else degrades into a lower confidence and warnings.
    pub fn extract(&self, bytes: &[u8], hints: &ExtractionHints) -> Result<Extraction> {
        if bytes.is_empty() {
            return Err(TakeoffError::UnrecognizedInput("empty input".to_string()));
        }
        let format = sniff(bytes);
        let classifier = Classifier::with_legend(&hints.legend);
        let legend_sheet = hints.is_legend_sheet();
        log::info!(
            "extracting {} bytes as {}{}",
            bytes.len(),
            format,
            if legend_sheet { " (legend sheet)" } else { "" }
        );

        match format {
            InputFormat::Pdf => match PdfDrawing::from_bytes(bytes, self.config.parallel_pages) {
                Ok(drawing) if legend_sheet => Ok(Extraction::Legend(legend::pdf_legend(
                    &drawing,
                    &classifier,
                    &self.config,
                ))),
                Ok(drawing) => Ok(Extraction::Quantities(self.pdf_quantities(&drawing, &classifier))),
                Err(e) => {
                    log::warn!("PDF could not be parsed: {}", e);
                    let warning = format!("PDF could not be parsed ({}); only text fragments were read.", e);
                    self.text_fallback(bytes, Source::TextFallback, vec![warning], legend_sheet)
                }
            },
            InputFormat::BinaryDxf | InputFormat::TextDxf => match self.read_dxf(bytes) {
                Ok(document) if legend_sheet => {
                    Ok(Extraction::Legend(legend::dxf_legend(&document, &classifier)))
                }
                Ok(document) => Ok(Extraction::Quantities(self.dxf_quantities(&document, &classifier))),
                Err(e) => {
                    log::warn!("DXF could not be read: {}", e);
                    let warning = format!("DXF could not be read ({}); only text fragments were read.", e);
                    self.text_fallback(bytes, Source::TextFallback, vec![warning], legend_sheet)
                }
            },
            InputFormat::Dwg => self.text_fallback(bytes, Source::DwgText, Vec::new(), legend_sheet),
            InputFormat::Unknown => {
                let warning = "Input is neither DXF, DWG nor PDF; only text fragments were read.".to_string();
                self.text_fallback(bytes, Source::TextFallback, vec![warning], legend_sheet)
            }
        }
    }

    fn read_dxf(&self, bytes: &[u8]) -> Result<DxfDocument> {
        DxfReader::from_bytes(bytes)?
            .with_configuration(DxfReaderConfiguration {
                failsafe: self.config.failsafe,
            })
            .read()
    }

    /// Quantities of a parsed DXF drawing
    pub fn dxf_quantities(&self, document: &DxfDocument, classifier: &Classifier) -> ExtractionResult {
        let units = resolve_drawing_units(document.header.insunits, document.extents());
        log::debug!("units: {} ({}), factor {}", units.name, units.detection_method, units.factor);
        let walk = analysis::walk(document, classifier, units.factor, &self.config);
        assemble::assemble_dxf(document, &walk, units, classifier, &self.config)
    }

    /// Quantities of an interpreted PDF
    pub fn pdf_quantities(&self, drawing: &PdfDrawing, classifier: &Classifier) -> ExtractionResult {
        let analysis = vector_paths::analyze(drawing, classifier, &self.config);
        assemble::assemble_pdf(drawing, &analysis, &self.config)
    }

    fn text_fallback(
        &self,
        bytes: &[u8],
        source: Source,
        warnings: Vec<String>,
        legend_sheet: bool,
    ) -> Result<Extraction> {
        let analysis = text_runs::analyze(bytes);
        if analysis.run_count == 0 {
            return Err(TakeoffError::UnrecognizedInput(
                "no readable drawing structure or text".to_string(),
            ));
        }
        if legend_sheet {
            let mut record = LegendRecord {
                source: "text_legend".to_string(),
                warnings,
                ..Default::default()
            };
            record
                .warnings
                .push("Legend sheets need readable geometry; no entries extracted.".to_string());
            return Ok(Extraction::Legend(record));
        }
        Ok(Extraction::Quantities(assemble::assemble_text_runs(
            &analysis, source, warnings,
        )))
    }
}
