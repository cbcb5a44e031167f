//! PDF vector-graphics access
//!
//! Pages are loaded with `lopdf`; each page's content stream is decoded and
//! interpreted into painted paths and text runs. Interpretation of the pages
//! runs on the rayon pool when enabled; pages always come back in page order.

mod content;
mod xobject;

pub use content::{ContentInterpreter, PageContent, TextRun};
pub use xobject::{FormXObject, XObject, XObjects};

use content::number;
use xobject::{dereference_dict, resolve_xobjects};

use crate::entities::VectorPath;
use crate::error::Result;
use crate::notification::{NotificationCollection, NotificationType};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use rayon::prelude::*;

/// US Letter, used when a page has no usable MediaBox anywhere in its tree
const DEFAULT_PAGE_SIZE: (f64, f64) = (612.0, 792.0);
/// Guard against cyclic `Parent` chains
const MAX_PAGE_TREE_DEPTH: usize = 32;

/// One analyzed page
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Zero-based page index
    pub index: usize,
    /// MediaBox width in points
    pub width: f64,
    /// MediaBox height in points
    pub height: f64,
    pub paths: Vec<VectorPath>,
    pub texts: Vec<TextRun>,
    /// Form invocations that could not be followed
    pub skipped_xobjects: usize,
    pub images: usize,
}

/// All pages of a PDF reduced to their vector content
#[derive(Debug, Clone, Default)]
pub struct PdfDrawing {
    pub pages: Vec<PdfPage>,
    pub notifications: NotificationCollection,
}

impl PdfDrawing {
    /// Load a PDF from memory and interpret every page
    pub fn from_bytes(bytes: &[u8], parallel: bool) -> Result<Self> {
        let document = Document::load_mem(bytes)?;
        let mut notifications = NotificationCollection::new();

        // decoding needs the document; interpretation only needs the operations
        // and the pre-resolved XObjects
        let mut decoded: Vec<DecodedPage> = Vec::new();
        for (index, (_, page_id)) in document.get_pages().into_iter().enumerate() {
            let size = page_size(&document, page_id).unwrap_or(DEFAULT_PAGE_SIZE);
            let operations = match document
                .get_page_content(page_id)
                .and_then(|data| Content::decode(&data))
            {
                Ok(content) => content.operations,
                Err(e) => {
                    notifications.notify(
                        NotificationType::Warning,
                        format!("Page {} content could not be decoded: {}", index + 1, e),
                    );
                    Vec::new()
                }
            };
            let xobjects = page_resources(&document, page_id)
                .map(|resources| resolve_xobjects(&document, resources))
                .unwrap_or_default();
            decoded.push(DecodedPage {
                index,
                size,
                operations,
                xobjects,
            });
        }

        let interpret = |page: &DecodedPage| {
            let DecodedPage {
                index,
                size: (width, height),
                operations,
                xobjects,
            } = page;
            let content = ContentInterpreter::new(*index)
                .with_xobjects(xobjects)
                .run(operations);
            log::debug!(
                "PDF page {}: {} paths, {} text runs",
                index + 1,
                content.paths.len(),
                content.texts.len()
            );
            PdfPage {
                index: *index,
                width: *width,
                height: *height,
                paths: content.paths,
                texts: content.texts,
                skipped_xobjects: content.skipped_xobjects,
                images: content.images,
            }
        };

        let mut pages: Vec<PdfPage> = if parallel {
            decoded.par_iter().map(interpret).collect()
        } else {
            decoded.iter().map(interpret).collect()
        };
        pages.sort_by_key(|p| p.index);

        let skipped: usize = pages.iter().map(|p| p.skipped_xobjects).sum();
        if skipped > 0 {
            notifications.notify(
                NotificationType::Warning,
                format!(
                    "{} XObject invocations could not be followed; their paths are not counted",
                    skipped
                ),
            );
        }
        let images: usize = pages.iter().map(|p| p.images).sum();
        if images > 0 {
            notifications.notify(
                NotificationType::NotImplemented,
                format!("{} image XObjects carry no vector content", images),
            );
        }

        Ok(Self { pages, notifications })
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn paths(&self) -> impl Iterator<Item = &VectorPath> {
        self.pages.iter().flat_map(|p| p.paths.iter())
    }

    pub fn texts(&self) -> impl Iterator<Item = (usize, &TextRun)> {
        self.pages
            .iter()
            .flat_map(|p| p.texts.iter().map(move |t| (p.index, t)))
    }
}

/// A page's content ready for interpretation
struct DecodedPage {
    index: usize,
    size: (f64, f64),
    operations: Vec<Operation>,
    xobjects: XObjects,
}

/// MediaBox size, inherited through the page tree when the page lacks one
fn page_size(document: &Document, page_id: ObjectId) -> Option<(f64, f64)> {
    let mut dict = document.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(media_box) = dict.get(b"MediaBox") {
            let (_, media_box) = document.dereference(media_box).ok()?;
            let values: Vec<f64> = media_box.as_array().ok()?.iter().filter_map(number).collect();
            return match values[..] {
                [x0, y0, x1, y1] => Some(((x1 - x0).abs(), (y1 - y0).abs())),
                _ => None,
            };
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = document.get_dictionary(parent).ok()?;
    }
    None
}

/// Resources dictionary, inherited through the page tree when the page lacks one
fn page_resources(document: &Document, page_id: ObjectId) -> Option<&Dictionary> {
    let mut dict = document.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_PAGE_TREE_DEPTH {
        if let Ok(resources) = dict.get(b"Resources") {
            return dereference_dict(document, resources);
        }
        let parent = dict.get(b"Parent").and_then(Object::as_reference).ok()?;
        dict = document.get_dictionary(parent).ok()?;
    }
    None
}
