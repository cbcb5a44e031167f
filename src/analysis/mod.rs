//! Quantity analysis shared by every input format.
//!
//! One walker, one length aggregator and one assembler serve both DXF
//! drawings and PDF pages through [`crate::source::GeometrySource`]; the PDF
//! side adds symbol clustering, and buffers without readable geometry go
//! through the text-run analysis.

pub mod assemble;
pub mod legend;
pub mod length;
pub mod text_runs;
pub mod vector_paths;
pub mod walker;

pub use assemble::{assemble_dxf, assemble_pdf, assemble_text_runs, finalize_confidence};
pub use length::{path_length, polyline_length, LengthAggregate, LengthTable};
pub use text_runs::TextRunAnalysis;
pub use vector_paths::{PdfAnalysis, SizeBand, SymbolCandidate, SymbolCluster};
pub use walker::{walk, BlockTable, BlockTally, WalkOutput};
