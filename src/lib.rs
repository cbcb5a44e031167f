//! # takeoff-engine
//!
//! Quantity takeoff for electrical drawings: counts device symbols and
//! measures cable and cable-tray runs in DXF, DWG and PDF files.
//!
//! ## Features
//!
//! - DXF reading (ASCII and binary), with `$DWGCODEPAGE` decoding for pre-2007 files
//! - Block tallies per (name, layer), layer-based cable and tray lengths
//! - Unit detection from `$INSUNITS`, drawing extents or the PDF paper format
//! - PDF vector analysis: red symbol clustering and color-keyed line lengths
//! - Text-run fallback for DWG and unreadable files
//! - Legend sheets that bias the classifier on later drawings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use takeoff_engine::{Engine, ExtractionHints};
//!
//! let bytes = std::fs::read("alaprajz.dxf")?;
//! let extraction = Engine::default().extract(&bytes, &ExtractionHints::default())?;
//!
//! if let Some(result) = extraction.quantities() {
//!     for block in &result.blocks {
//!         println!("{} x{} ({})", block.name, block.count, block.category);
//!     }
//!     println!("confidence {}", result.confidence);
//! }
//! # Ok::<(), takeoff_engine::TakeoffError>(())
//! ```
//!
//! ## Architecture
//!
//! - `io` - DXF tokenizing and section reading, PDF content-stream interpretation
//! - `source::GeometrySource` - one stream of length primitives and block symbols per drawing or page
//! - `analysis` - walker, length aggregator, PDF clustering, result assembly
//! - `classify` - ordered keyword rules, layer-name specs, legends
//! - `units` - drawing units to meters
//!
//! Extraction never fails for a readable drawing: missing information lowers
//! the confidence and adds warnings instead.

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod classify;
pub mod config;
pub mod document;
pub mod engine;
pub mod entities;
pub mod error;
pub mod io;
pub mod notification;
pub mod result;
pub mod source;
pub mod tables;
pub mod types;
pub mod units;

// Re-export commonly used types
pub use error::{Result, TakeoffError};
pub use types::{BoundingBox2D, ColorCategory, DxfVersion, Rgb, Vector2, Vector3};

pub use classify::{Category, Classifier, LegendEntry, LegendRecord};
pub use config::EngineConfig;
pub use document::DxfDocument;
pub use engine::{sniff, Engine, ExtractionHints, InputFormat};
pub use entities::{Entity, EntityType};
pub use io::dxf::{DxfReader, DxfReaderConfiguration};
pub use io::pdf::PdfDrawing;
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use result::{
    BlockEntry, Extraction, ExtractionResult, LayerInfo, LengthEntry, Source, Summary,
};
pub use source::{BlockSymbol, GeometrySource, SourceItem};
pub use units::{DetectionMethod, ScaleInfo};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
