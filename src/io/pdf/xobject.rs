//! XObject resolution.
//!
//! Form XObjects named in a page's resources are decoded ahead of
//! interpretation, together with the forms they invoke in turn, so the
//! interpreter can follow `Do` without access to the document.

use super::content::{number, pdf_matrix};
use ahash::AHashMap;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use nalgebra::Matrix3;

/// Nesting limit for forms invoking forms
pub const MAX_FORM_DEPTH: usize = 8;

/// XObjects of one resource dictionary, by resource name
pub type XObjects = AHashMap<Vec<u8>, XObject>;

/// A resource-dictionary XObject, as far as vector analysis is concerned
#[derive(Debug, Clone)]
pub enum XObject {
    Form(FormXObject),
    /// Image and PostScript XObjects carry no vector paths
    Image,
    /// Missing, cyclic, nested too deep, or undecodable
    Unresolved,
}

/// A decoded form XObject
#[derive(Debug, Clone)]
pub struct FormXObject {
    /// Form space to user space at the point of invocation
    pub matrix: Matrix3<f64>,
    pub operations: Vec<Operation>,
    /// `None` when the form has no own resources and uses the invoker's
    pub resources: Option<XObjects>,
}

/// XObjects named in `resources`, forms decoded recursively
pub fn resolve_xobjects(document: &Document, resources: &Dictionary) -> XObjects {
    resolve_with_path(document, resources, &mut Vec::new())
}

fn resolve_with_path(document: &Document, resources: &Dictionary, path: &mut Vec<ObjectId>) -> XObjects {
    let mut xobjects = XObjects::default();
    let Some(entries) = resources
        .get(b"XObject")
        .ok()
        .and_then(|entry| dereference_dict(document, entry))
    else {
        return xobjects;
    };
    for (name, entry) in entries.iter() {
        xobjects.insert(name.clone(), resolve_entry(document, entry, path));
    }
    xobjects
}

fn resolve_entry(document: &Document, entry: &Object, path: &mut Vec<ObjectId>) -> XObject {
    let Ok((id, object)) = document.dereference(entry) else {
        return XObject::Unresolved;
    };
    let Ok(stream) = object.as_stream() else {
        return XObject::Unresolved;
    };
    match stream.dict.get(b"Subtype").and_then(Object::as_name) {
        Ok(subtype) if subtype == b"Form" => {}
        Ok(_) => return XObject::Image,
        Err(_) => return XObject::Unresolved,
    }

    let id = id.unwrap_or_default();
    if path.len() >= MAX_FORM_DEPTH || path.contains(&id) {
        log::debug!("form XObject {:?} not followed at depth {}", id, path.len());
        return XObject::Unresolved;
    }
    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    let operations = match Content::decode(&data) {
        Ok(content) => content.operations,
        Err(e) => {
            log::debug!("form XObject {:?} content could not be decoded: {}", id, e);
            return XObject::Unresolved;
        }
    };
    let matrix = stream
        .dict
        .get(b"Matrix")
        .and_then(Object::as_array)
        .ok()
        .and_then(|values| pdf_matrix(&values.iter().filter_map(number).collect::<Vec<_>>()))
        .unwrap_or_else(Matrix3::identity);

    path.push(id);
    let resources = stream
        .dict
        .get(b"Resources")
        .ok()
        .and_then(|entry| dereference_dict(document, entry))
        .map(|resources| resolve_with_path(document, resources, path));
    path.pop();

    XObject::Form(FormXObject {
        matrix,
        operations,
        resources,
    })
}

/// Dictionary behind a direct or referenced object
pub fn dereference_dict<'a>(document: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    document.dereference(object).ok()?.1.as_dict().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn integers(values: &[i64]) -> Object {
        Object::Array(values.iter().map(|v| Object::Integer(*v)).collect())
    }

    fn form(document: &mut Document, content: &[u8], resources: Option<Dictionary>) -> ObjectId {
        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Form",
            "BBox" => integers(&[0, 0, 100, 100]),
            "Matrix" => integers(&[2, 0, 0, 2, 10, 20]),
        };
        if let Some(resources) = resources {
            dict.set("Resources", resources);
        }
        document.add_object(Stream::new(dict, content.to_vec()))
    }

    #[test]
    fn test_nested_forms_resolved() {
        let mut document = Document::with_version("1.5");
        let inner = form(&mut document, b"0 0 m 10 0 l S", None);
        let outer = form(
            &mut document,
            b"/Fm2 Do",
            Some(dictionary! { "XObject" => dictionary! { "Fm2" => inner } }),
        );
        let image = document.add_object(Stream::new(
            dictionary! { "Type" => "XObject", "Subtype" => "Image" },
            Vec::new(),
        ));
        let resources = dictionary! {
            "XObject" => dictionary! { "Fm1" => outer, "Im1" => image, "Gone" => (999, 0) },
        };

        let xobjects = resolve_xobjects(&document, &resources);
        let Some(XObject::Form(fm1)) = xobjects.get(b"Fm1".as_slice()) else {
            panic!("expected a form");
        };
        assert_eq!(fm1.matrix, Matrix3::new(2.0, 0.0, 10.0, 0.0, 2.0, 20.0, 0.0, 0.0, 1.0));
        assert_eq!(fm1.operations.len(), 1);
        let nested = fm1.resources.as_ref().unwrap();
        assert!(matches!(nested.get(b"Fm2".as_slice()), Some(XObject::Form(_))));
        assert!(matches!(xobjects.get(b"Im1".as_slice()), Some(XObject::Image)));
        assert!(matches!(xobjects.get(b"Gone".as_slice()), Some(XObject::Unresolved)));
    }

    #[test]
    fn test_self_invoking_form_is_cut() {
        let mut document = Document::with_version("1.5");
        let id = form(&mut document, b"/Fm1 Do", None);
        // the form's resources point back at the form itself
        if let Ok(Object::Stream(stream)) = document.get_object_mut(id) {
            stream
                .dict
                .set("Resources", dictionary! { "XObject" => dictionary! { "Fm1" => id } });
        }
        let resources = dictionary! { "XObject" => dictionary! { "Fm1" => id } };

        let xobjects = resolve_xobjects(&document, &resources);
        let Some(XObject::Form(fm1)) = xobjects.get(b"Fm1".as_slice()) else {
            panic!("expected a form");
        };
        let nested = fm1.resources.as_ref().unwrap();
        assert!(matches!(nested.get(b"Fm1".as_slice()), Some(XObject::Unresolved)));
    }
}
