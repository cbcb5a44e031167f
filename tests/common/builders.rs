//! In-memory drawing builders.
//!
//! `DxfBuilder` writes ASCII DXF text (or binary DXF through
//! `to_binary_dxf`); `PdfBuilder` assembles a small PDF with `lopdf` from
//! raw content-stream operations.

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use takeoff_engine::io::dxf::{GroupCodeValueType, BINARY_DXF_SENTINEL};

/// A3 landscape in points
pub const A3_LANDSCAPE: (f64, f64) = (1190.55, 841.89);
/// A4 portrait in points
pub const A4_PORTRAIT: (f64, f64) = (595.28, 841.89);

/// Group code / value pairs of a DXF file under construction
#[derive(Debug, Clone, Default)]
pub struct DxfBuilder {
    header: Vec<(i32, String)>,
    layers: Vec<(i32, String)>,
    entities: Vec<(i32, String)>,
}

fn push(pairs: &mut Vec<(i32, String)>, code: i32, value: impl ToString) {
    pairs.push((code, value.to_string()));
}

impl DxfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, acadver: &str) -> Self {
        push(&mut self.header, 9, "$ACADVER");
        push(&mut self.header, 1, acadver);
        self
    }

    pub fn insunits(mut self, code: i16) -> Self {
        push(&mut self.header, 9, "$INSUNITS");
        push(&mut self.header, 70, code);
        self
    }

    pub fn extents(mut self, min: (f64, f64), max: (f64, f64)) -> Self {
        for (name, (x, y)) in [("$EXTMIN", min), ("$EXTMAX", max)] {
            push(&mut self.header, 9, name);
            push(&mut self.header, 10, x);
            push(&mut self.header, 20, y);
            push(&mut self.header, 30, 0.0);
        }
        self
    }

    /// Layer table entry; a negative color marks the layer off
    pub fn layer(mut self, name: &str, color: i16, flags: i16) -> Self {
        push(&mut self.layers, 0, "LAYER");
        push(&mut self.layers, 2, name);
        push(&mut self.layers, 70, flags);
        push(&mut self.layers, 62, color);
        push(&mut self.layers, 6, "CONTINUOUS");
        self
    }

    pub fn insert(mut self, block: &str, layer: &str, x: f64, y: f64) -> Self {
        push(&mut self.entities, 0, "INSERT");
        push(&mut self.entities, 8, layer);
        if !block.is_empty() {
            push(&mut self.entities, 2, block);
        }
        push(&mut self.entities, 10, x);
        push(&mut self.entities, 20, y);
        push(&mut self.entities, 30, 0.0);
        self
    }

    /// MINSERT: a `cols` x `rows` array of one block
    pub fn minsert(mut self, block: &str, layer: &str, cols: i16, rows: i16, spacing: f64) -> Self {
        push(&mut self.entities, 0, "INSERT");
        push(&mut self.entities, 8, layer);
        push(&mut self.entities, 2, block);
        push(&mut self.entities, 10, 0.0);
        push(&mut self.entities, 20, 0.0);
        push(&mut self.entities, 30, 0.0);
        push(&mut self.entities, 70, cols);
        push(&mut self.entities, 71, rows);
        push(&mut self.entities, 44, spacing);
        push(&mut self.entities, 45, spacing);
        self
    }

    pub fn line(mut self, layer: &str, from: (f64, f64), to: (f64, f64)) -> Self {
        push(&mut self.entities, 0, "LINE");
        push(&mut self.entities, 8, layer);
        push(&mut self.entities, 10, from.0);
        push(&mut self.entities, 20, from.1);
        push(&mut self.entities, 30, 0.0);
        push(&mut self.entities, 11, to.0);
        push(&mut self.entities, 21, to.1);
        push(&mut self.entities, 31, 0.0);
        self
    }

    pub fn lwpolyline(mut self, layer: &str, points: &[(f64, f64)], closed: bool) -> Self {
        push(&mut self.entities, 0, "LWPOLYLINE");
        push(&mut self.entities, 8, layer);
        push(&mut self.entities, 90, points.len());
        push(&mut self.entities, 70, if closed { 1 } else { 0 });
        for (x, y) in points {
            push(&mut self.entities, 10, x);
            push(&mut self.entities, 20, y);
        }
        self
    }

    pub fn text(mut self, layer: &str, value: &str, x: f64, y: f64) -> Self {
        self.push_text(layer, value, x, y, false);
        self
    }

    pub fn paper_space_text(mut self, layer: &str, value: &str, x: f64, y: f64) -> Self {
        self.push_text(layer, value, x, y, true);
        self
    }

    fn push_text(&mut self, layer: &str, value: &str, x: f64, y: f64, paper_space: bool) {
        push(&mut self.entities, 0, "TEXT");
        push(&mut self.entities, 8, layer);
        if paper_space {
            push(&mut self.entities, 67, 1);
        }
        push(&mut self.entities, 10, x);
        push(&mut self.entities, 20, y);
        push(&mut self.entities, 30, 0.0);
        push(&mut self.entities, 40, 2.5);
        push(&mut self.entities, 1, value);
    }

    /// Any entity type given as raw pairs
    pub fn raw_entity(mut self, pairs: &[(i32, &str)]) -> Self {
        for (code, value) in pairs {
            push(&mut self.entities, *code, value);
        }
        self
    }

    /// All pairs of the finished file, EOF included
    pub fn pairs(&self) -> Vec<(i32, String)> {
        let mut out = Vec::new();
        let section = |out: &mut Vec<(i32, String)>, name: &str, body: &[(i32, String)]| {
            push(out, 0, "SECTION");
            push(out, 2, name);
            out.extend_from_slice(body);
            push(out, 0, "ENDSEC");
        };
        if !self.header.is_empty() {
            section(&mut out, "HEADER", &self.header);
        }
        if !self.layers.is_empty() {
            let mut tables = vec![(0, "TABLE".to_string()), (2, "LAYER".to_string())];
            tables.extend_from_slice(&self.layers);
            tables.push((0, "ENDTAB".to_string()));
            section(&mut out, "TABLES", &tables);
        }
        section(&mut out, "ENTITIES", &self.entities);
        push(&mut out, 0, "EOF");
        out
    }

    /// ASCII DXF with right-aligned group codes, as AutoCAD writes them
    pub fn build(&self) -> Vec<u8> {
        let mut s = String::new();
        for (code, value) in self.pairs() {
            s.push_str(&format!("{:>3}\n{}\n", code, value));
        }
        s.into_bytes()
    }
}

/// Encode pairs as binary DXF
pub fn to_binary_dxf(pairs: &[(i32, String)]) -> Vec<u8> {
    let mut out = BINARY_DXF_SENTINEL.to_vec();
    for (code, value) in pairs {
        out.write_i16::<LittleEndian>(*code as i16).unwrap();
        match GroupCodeValueType::from_code(*code) {
            GroupCodeValueType::Double => out.write_f64::<LittleEndian>(value.parse().unwrap()).unwrap(),
            GroupCodeValueType::Int16 => out.write_i16::<LittleEndian>(value.parse().unwrap()).unwrap(),
            GroupCodeValueType::Int32 => out.write_i32::<LittleEndian>(value.parse().unwrap()).unwrap(),
            GroupCodeValueType::Int64 => out.write_i64::<LittleEndian>(value.parse().unwrap()).unwrap(),
            GroupCodeValueType::Bool => out.push(value.parse::<u8>().unwrap()),
            _ => {
                out.extend_from_slice(value.as_bytes());
                out.push(0);
            }
        }
    }
    out
}

fn real(v: f64) -> Object {
    Object::Real(v as f32)
}

/// Content-stream operation with numeric operands
pub fn op(operator: &str, operands: &[f64]) -> Operation {
    Operation::new(operator, operands.iter().map(|v| real(*v)).collect())
}

/// Filled red square with its lower-left corner at (x, y)
pub fn red_square(x: f64, y: f64, size: f64) -> Vec<Operation> {
    vec![
        op("rg", &[1.0, 0.0, 0.0]),
        op("re", &[x, y, size, size]),
        op("f", &[]),
    ]
}

/// Stroked straight line in the given RGB color
pub fn stroked_line(rgb: (f64, f64, f64), from: (f64, f64), to: (f64, f64)) -> Vec<Operation> {
    vec![
        op("RG", &[rgb.0, rgb.1, rgb.2]),
        op("m", &[from.0, from.1]),
        op("l", &[to.0, to.1]),
        op("S", &[]),
    ]
}

/// Text run at (x, y)
pub fn text_at(x: f64, y: f64, text: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), real(10.0)]),
        op("Td", &[x, y]),
        Operation::new("Tj", vec![Object::string_literal(text)]),
        Operation::new("ET", vec![]),
    ]
}

/// Form XObject attached to a page's resources
#[derive(Debug)]
struct FormSpec {
    name: String,
    matrix: [f64; 6],
    operations: Vec<Operation>,
}

#[derive(Debug)]
struct PageSpec {
    size: (f64, f64),
    operations: Vec<Operation>,
    forms: Vec<FormSpec>,
}

/// Pages of a PDF under construction
#[derive(Debug, Default)]
pub struct PdfBuilder {
    pages: Vec<PageSpec>,
}

impl PdfBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, size: (f64, f64), operations: Vec<Operation>) -> Self {
        self.pages.push(PageSpec {
            size,
            operations,
            forms: Vec::new(),
        });
        self
    }

    /// Add a form XObject to the resources of the last page
    pub fn form(mut self, name: &str, matrix: [f64; 6], operations: Vec<Operation>) -> Self {
        if let Some(page) = self.pages.last_mut() {
            page.forms.push(FormSpec {
                name: name.to_string(),
                matrix,
                operations,
            });
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for PageSpec {
            size: (width, height),
            operations,
            forms,
        } in self.pages
        {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let mut xobjects = lopdf::Dictionary::new();
            for form in forms {
                let data = Content {
                    operations: form.operations,
                }
                .encode()
                .unwrap();
                let form_id = doc.add_object(Stream::new(
                    dictionary! {
                        "Type" => "XObject",
                        "Subtype" => "Form",
                        "BBox" => vec![real(0.0), real(0.0), real(width), real(height)],
                        "Matrix" => form.matrix.iter().map(|v| real(*v)).collect::<Vec<_>>(),
                    },
                    data,
                ));
                xobjects.set(form.name, form_id);
            }
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![real(0.0), real(0.0), real(width), real(height)],
                "Resources" => dictionary! { "XObject" => xobjects },
            });
            kids.push(Object::Reference(page_id));
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }
}
