//! Embedded image descriptors.
//!
//! A descriptor is one `/XObject` entry of a page's resource dictionary with
//! `/Subtype /Image`: the name and metadata under which the image data is
//! stored in the PDF object table, listed before any pixel is decoded.

use lopdf::{Dictionary, Document, Object, ObjectId};
use pdfsift_core::PageImage;

/// Metadata for one embedded image, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    /// Resource name the page content refers to the image by (e.g. `Im0`).
    pub name: String,
    /// Object id of the image stream.
    pub id: ObjectId,
    pub width: i64,
    pub height: i64,
}

/// List every embedded image descriptor, walking pages in order.
pub fn list_descriptors(doc: &Document) -> Vec<ImageDescriptor> {
    let mut descriptors = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let Ok(page) = doc.get_dictionary(page_id) else {
            continue;
        };
        let Some(resources) = resolve_dict(doc, page.get(b"Resources").ok()) else {
            continue;
        };
        let Some(xobjects) = resolve_dict(doc, resources.get(b"XObject").ok()) else {
            continue;
        };
        for (name, entry) in xobjects.iter() {
            let Ok(id) = entry.as_reference() else {
                continue;
            };
            let Ok(Object::Stream(stream)) = doc.get_object(id) else {
                continue;
            };
            if !is_image(&stream.dict) {
                continue;
            }
            descriptors.push(ImageDescriptor {
                name: String::from_utf8_lossy(name).into_owned(),
                id,
                width: dict_i64(&stream.dict, b"Width"),
                height: dict_i64(&stream.dict, b"Height"),
            });
        }
    }
    descriptors
}

/// Resolve one descriptor to its decoded bitmap.
pub fn decode(doc: &Document, descriptor: &ImageDescriptor) -> Option<PageImage> {
    let Ok(Object::Stream(stream)) = doc.get_object(descriptor.id) else {
        return None;
    };
    PageImage::from_image_object(doc, stream)
}

fn is_image(dict: &Dictionary) -> bool {
    matches!(dict.get(b"Subtype"), Ok(Object::Name(name)) if name.as_slice() == b"Image")
}

fn dict_i64(dict: &Dictionary, key: &[u8]) -> i64 {
    dict.get(key).ok().and_then(|o| o.as_i64().ok()).unwrap_or(0)
}

fn resolve_dict<'a>(doc: &'a Document, object: Option<&'a Object>) -> Option<&'a Dictionary> {
    match object? {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        },
        _ => None,
    }
}
