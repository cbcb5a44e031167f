//! Content-stream interpretation.
//!
//! Walks the operators of a decoded page content stream and collects every
//! painted path (with the colors it was painted in) and every shown string
//! (with its page position). Coordinates are transformed to default user
//! space, so sizes and distances are in points.
//!
//! Path construction:
//! - `m`, `l`, `c`, `v`, `y`, `h`, `re`
//!
//! Painting, which ends the current path:
//! - `S`, `s` stroke; `f`, `F`, `f*` fill; `B`, `B*`, `b`, `b*` both
//! - `n` discards the path (clipping)
//!
//! `Do` on a form XObject interprets the form's operations in place, under
//! the current transform combined with the form's `Matrix`.

use super::xobject::{FormXObject, XObject, XObjects, MAX_FORM_DEPTH};
use crate::entities::{PathSegment, VectorPath};
use crate::types::{Rgb, Vector2};
use lopdf::content::Operation;
use lopdf::Object;
use nalgebra::{Matrix3, Vector3 as NVector3};

/// A string shown on the page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Origin of the text in page space
    pub position: Vector2,
}

#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix3<f64>,
    stroke: Rgb,
    fill: Rgb,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix3::identity(),
            stroke: Rgb::BLACK,
            fill: Rgb::BLACK,
        }
    }
}

#[derive(Debug, Clone)]
struct TextState {
    matrix: Matrix3<f64>,
    line_matrix: Matrix3<f64>,
    leading: f64,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            matrix: Matrix3::identity(),
            line_matrix: Matrix3::identity(),
            leading: 0.0,
        }
    }
}

/// Output of interpreting one content stream
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub paths: Vec<VectorPath>,
    pub texts: Vec<TextRun>,
    /// `Do` operators naming a form that could not be followed
    pub skipped_xobjects: usize,
    /// `Do` operators naming an image
    pub images: usize,
}

/// Interpreter state for one page
pub struct ContentInterpreter<'a> {
    page: usize,
    /// XObjects of the resource dictionary in effect
    xobjects: Option<&'a XObjects>,
    form_depth: usize,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    text: TextState,
    segments: Vec<PathSegment>,
    current_point: Option<Vector2>,
    subpath_start: Option<Vector2>,
    output: PageContent,
}

/// PDF matrix `[a b c d e f]` as a column-vector transform
pub(crate) fn pdf_matrix(m: &[f64]) -> Option<Matrix3<f64>> {
    match m {
        [a, b, c, d, e, f] => Some(Matrix3::new(*a, *c, *e, *b, *d, *f, 0.0, 0.0, 1.0)),
        _ => None,
    }
}

fn translation(tx: f64, ty: f64) -> Matrix3<f64> {
    Matrix3::new(1.0, 0.0, tx, 0.0, 1.0, ty, 0.0, 0.0, 1.0)
}

pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}

fn numbers(operands: &[Object]) -> Vec<f64> {
    operands.iter().filter_map(number).collect()
}

/// Decode a PDF string: UTF-16BE with BOM, otherwise byte-per-char
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}

impl<'a> ContentInterpreter<'a> {
    pub fn new(page: usize) -> Self {
        Self {
            page,
            xobjects: None,
            form_depth: 0,
            state: GraphicsState::default(),
            stack: Vec::new(),
            text: TextState::default(),
            segments: Vec::new(),
            current_point: None,
            subpath_start: None,
            output: PageContent::default(),
        }
    }

    /// Resolve `Do` operators against these XObjects
    pub fn with_xobjects(mut self, xobjects: &'a XObjects) -> Self {
        self.xobjects = Some(xobjects);
        self
    }

    /// Interpret every operation and return what was painted
    pub fn run(mut self, operations: &[Operation]) -> PageContent {
        for op in operations {
            self.apply(op);
        }
        self.output
    }

    fn transform(&self, x: f64, y: f64) -> Vector2 {
        let p = self.state.ctm * NVector3::new(x, y, 1.0);
        Vector2::new(p.x, p.y)
    }

    fn apply(&mut self, op: &Operation) {
        let n = numbers(&op.operands);
        match op.operator.as_str() {
            // graphics state
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            "cm" => {
                if let Some(m) = pdf_matrix(&n) {
                    self.state.ctm *= m;
                }
            }

            // colors
            "RG" | "G" | "K" | "SC" | "SCN" => {
                if let Some(color) = Rgb::from_components(&n) {
                    self.state.stroke = color;
                }
            }
            "rg" | "g" | "k" | "sc" | "scn" => {
                if let Some(color) = Rgb::from_components(&n) {
                    self.state.fill = color;
                }
            }

            // path construction
            "m" => {
                if let [x, y] = n[..] {
                    let p = self.transform(x, y);
                    self.segments.push(PathSegment::MoveTo(p));
                    self.current_point = Some(p);
                    self.subpath_start = Some(p);
                }
            }
            "l" => {
                if let [x, y] = n[..] {
                    let p = self.transform(x, y);
                    self.segments.push(PathSegment::LineTo(p));
                    self.current_point = Some(p);
                }
            }
            "c" => {
                if let [x1, y1, x2, y2, x3, y3] = n[..] {
                    self.curve(self.transform(x1, y1), self.transform(x2, y2), self.transform(x3, y3));
                }
            }
            "v" => {
                if let [x2, y2, x3, y3] = n[..] {
                    let c1 = self.current_point.unwrap_or(Vector2::ZERO);
                    self.curve(c1, self.transform(x2, y2), self.transform(x3, y3));
                }
            }
            "y" => {
                if let [x1, y1, x3, y3] = n[..] {
                    let end = self.transform(x3, y3);
                    self.curve(self.transform(x1, y1), end, end);
                }
            }
            "h" => self.close_subpath(),
            "re" => {
                if let [x, y, w, h] = n[..] {
                    let corners = [
                        self.transform(x, y),
                        self.transform(x + w, y),
                        self.transform(x + w, y + h),
                        self.transform(x, y + h),
                    ];
                    self.segments.push(PathSegment::Rect(corners));
                    self.current_point = Some(corners[0]);
                    self.subpath_start = Some(corners[0]);
                }
            }

            // painting
            "S" => self.paint(true, false),
            "s" => {
                self.close_subpath();
                self.paint(true, false);
            }
            "f" | "F" | "f*" => self.paint(false, true),
            "B" | "B*" => self.paint(true, true),
            "b" | "b*" => {
                self.close_subpath();
                self.paint(true, true);
            }
            "n" => self.discard_path(),

            // text
            "BT" => self.text = TextState {
                leading: self.text.leading,
                ..TextState::default()
            },
            "TL" => {
                if let [leading] = n[..] {
                    self.text.leading = leading;
                }
            }
            "Td" => {
                if let [tx, ty] = n[..] {
                    self.next_line(tx, ty);
                }
            }
            "TD" => {
                if let [tx, ty] = n[..] {
                    self.text.leading = -ty;
                    self.next_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = pdf_matrix(&n) {
                    self.text.matrix = m;
                    self.text.line_matrix = m;
                }
            }
            "T*" => self.next_line(0.0, -self.text.leading),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show_text(decode_pdf_string(bytes));
                }
            }
            "'" => {
                self.next_line(0.0, -self.text.leading);
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show_text(decode_pdf_string(bytes));
                }
            }
            "\"" => {
                self.next_line(0.0, -self.text.leading);
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    self.show_text(decode_pdf_string(bytes));
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode_pdf_string(bytes)),
                            // a large negative kern is a word gap
                            other => {
                                if number(other).is_some_and(|kern| kern < -200.0) {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    self.show_text(text);
                }
            }

            "Do" => self.invoke(op.operands.first()),
            _ => {}
        }
    }

    fn invoke(&mut self, name: Option<&Object>) {
        let xobject = match (name, self.xobjects) {
            (Some(Object::Name(name)), Some(xobjects)) => xobjects.get(name),
            _ => None,
        };
        match xobject {
            // forms without own resources can reach themselves through the invoker's
            Some(XObject::Form(form)) if self.form_depth < MAX_FORM_DEPTH => self.run_form(form),
            Some(XObject::Form(_)) => self.output.skipped_xobjects += 1,
            Some(XObject::Image) => self.output.images += 1,
            Some(XObject::Unresolved) | None => self.output.skipped_xobjects += 1,
        }
    }

    /// Interpret a form like a `q cm ... Q` block
    fn run_form(&mut self, form: &'a FormXObject) {
        let saved_state = self.state.clone();
        let saved_stack = std::mem::take(&mut self.stack);
        let saved_xobjects = self.xobjects;

        self.state.ctm *= form.matrix;
        self.form_depth += 1;
        if let Some(resources) = &form.resources {
            self.xobjects = Some(resources);
        }
        for op in &form.operations {
            self.apply(op);
        }
        self.discard_path();

        self.form_depth -= 1;
        self.state = saved_state;
        self.stack = saved_stack;
        self.xobjects = saved_xobjects;
    }

    fn curve(&mut self, c1: Vector2, c2: Vector2, end: Vector2) {
        self.segments.push(PathSegment::CurveTo { c1, c2, end });
        self.current_point = Some(end);
    }

    fn close_subpath(&mut self) {
        if self.segments.is_empty() {
            return;
        }
        self.segments.push(PathSegment::Close);
        if let Some(start) = self.subpath_start {
            self.current_point = Some(start);
        }
    }

    fn paint(&mut self, stroke: bool, fill: bool) {
        if self.segments.is_empty() {
            return;
        }
        let segments = std::mem::take(&mut self.segments);
        self.output.paths.push(VectorPath::new(
            segments,
            fill.then_some(self.state.fill),
            stroke.then_some(self.state.stroke),
            self.page,
        ));
        self.current_point = None;
        self.subpath_start = None;
    }

    fn discard_path(&mut self) {
        self.segments.clear();
        self.current_point = None;
        self.subpath_start = None;
    }

    fn next_line(&mut self, tx: f64, ty: f64) {
        self.text.line_matrix *= translation(tx, ty);
        self.text.matrix = self.text.line_matrix;
    }

    fn show_text(&mut self, text: String) {
        let text = text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let origin = self.state.ctm * self.text.matrix * NVector3::new(0.0, 0.0, 1.0);
        self.output.texts.push(TextRun {
            text,
            position: Vector2::new(origin.x, origin.y),
        });
    }
}
