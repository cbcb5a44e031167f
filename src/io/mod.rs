//! Drawing access: DXF tokenizing and PDF content-stream interpretation

pub mod dxf;
pub mod pdf;

pub use dxf::{DxfReader, DxfReaderConfiguration};
pub use pdf::{PdfDrawing, PdfPage};
