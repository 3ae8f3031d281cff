use lopdf::Object;
use mupdf::{Document, TextPageFlags};

use pdfsift_core::{BackendError, ExtractionResult, PageImage, PdfExtractor};

/// Fast implementation of [`PdfExtractor`].
///
/// The quickest of the three backends: plain text-layer extraction through
/// MuPDF's block/line iteration, plus every embedded raster image decoded by
/// following its object reference. No table detection — the table list is
/// always empty — and no layout analysis beyond MuPDF's own line ordering,
/// which is what keeps it fast on complex pages at some cost in reading
/// order fidelity.
#[derive(Debug, Default)]
pub struct FastBackend;

impl FastBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfExtractor for FastBackend {
    fn extract(&self, pdf: &[u8]) -> Result<ExtractionResult, BackendError> {
        let document =
            Document::from_bytes(pdf, "pdf").map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::Extraction(e.to_string()))?;

            let mut page_text = String::new();
            for block in text_page.blocks() {
                for line in block.lines() {
                    let line_text: String = line
                        .chars()
                        .map(|c| c.char().unwrap_or('\u{FFFD}'))
                        .collect();
                    page_text.push_str(&line_text);
                    page_text.push('\n');
                }
            }
            pages_text.push(page_text);
        }

        let images = collect_images(pdf);
        tracing::debug!(
            pages = pages_text.len(),
            images = images.len(),
            "fast extraction finished"
        );

        Ok(ExtractionResult {
            text: pages_text.join("\n\n"),
            tables: Vec::new(),
            images,
        })
    }
}

/// Decode every image XObject reachable from a page's resources, in page
/// order. Undecodable images are skipped, never fatal.
fn collect_images(pdf: &[u8]) -> Vec<PageImage> {
    let doc = match lopdf::Document::load_mem(pdf) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "object table unreadable, returning no images");
            return Vec::new();
        }
    };

    let mut images = Vec::new();
    for (_, page_id) in doc.get_pages() {
        for id in page_image_refs(&doc, page_id) {
            let Ok(Object::Stream(stream)) = doc.get_object(id) else {
                continue;
            };
            match PageImage::from_image_object(&doc, stream) {
                Some(img) => images.push(img),
                None => tracing::debug!(object = ?id, "skipping undecodable embedded image"),
            }
        }
    }
    images
}

/// Object references of the image XObjects in one page's resources.
fn page_image_refs(doc: &lopdf::Document, page_id: lopdf::ObjectId) -> Vec<lopdf::ObjectId> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(resources) = resolve_dict(doc, page.get(b"Resources").ok()) else {
        return Vec::new();
    };
    let Some(xobjects) = resolve_dict(doc, resources.get(b"XObject").ok()) else {
        return Vec::new();
    };

    xobjects
        .iter()
        .filter_map(|(_, entry)| entry.as_reference().ok())
        .filter(|&id| {
            matches!(
                doc.get_object(id),
                Ok(Object::Stream(stream))
                    if matches!(
                        stream.dict.get(b"Subtype"),
                        Ok(Object::Name(name)) if name.as_slice() == b"Image"
                    )
            )
        })
        .collect()
}

fn resolve_dict<'a>(
    doc: &'a lopdf::Document,
    object: Option<&'a Object>,
) -> Option<&'a lopdf::Dictionary> {
    match object? {
        Object::Dictionary(dict) => Some(dict),
        Object::Reference(id) => match doc.get_object(*id).ok()? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        },
        _ => None,
    }
}
