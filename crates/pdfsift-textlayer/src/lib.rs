use mupdf::{Document, TextPage, TextPageFlags};

use pdfsift_core::{BackendError, ExtractionResult, PageImage, PdfExtractor};

pub mod images;
pub mod tables;
pub mod words;

pub use images::ImageDescriptor;

use words::Word;

/// Text-layer implementation of [`PdfExtractor`].
///
/// Reads the structured text layer through MuPDF: characters are grouped
/// into positioned words, words into rows, and rows both produce the page
/// text and feed stream-style table detection. Embedded images are listed
/// as raw descriptors from each page's resource dictionary and decoded from
/// the object table.
///
/// Relies on the PDF carrying a machine-readable text layer; scanned PDFs
/// come back with empty or garbled text, which is expected rather than an
/// error — the OCR backend covers those.
#[derive(Debug, Default)]
pub struct TextLayerBackend;

impl TextLayerBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfExtractor for TextLayerBackend {
    fn extract(&self, pdf: &[u8]) -> Result<ExtractionResult, BackendError> {
        let document =
            Document::from_bytes(pdf, "pdf").map_err(|e| BackendError::Open(e.to_string()))?;

        let mut pages_text = Vec::new();
        let mut tables = Vec::new();

        for page_result in document
            .pages()
            .map_err(|e| BackendError::Extraction(e.to_string()))?
        {
            let page = page_result.map_err(|e| BackendError::Extraction(e.to_string()))?;
            let text_page = page
                .to_text_page(TextPageFlags::empty())
                .map_err(|e| BackendError::Extraction(e.to_string()))?;

            let rows = words::group_into_rows(collect_words(&text_page));
            pages_text.push(words::rows_to_text(&rows));
            tables.extend(tables::detect_tables(&rows));
        }

        let images = collect_images(pdf);
        tracing::debug!(
            pages = pages_text.len(),
            tables = tables.len(),
            images = images.len(),
            "text-layer extraction finished"
        );

        Ok(ExtractionResult {
            text: pages_text.join("\n\n"),
            tables,
            images,
        })
    }
}

/// Assemble positioned words from the structured text page. Characters are
/// accumulated until whitespace or a horizontal gap wider than
/// [`words::X_TOLERANCE`] ends the word.
fn collect_words(text_page: &TextPage) -> Vec<Word> {
    let mut collected = Vec::new();

    for block in text_page.blocks() {
        for line in block.lines() {
            let mut current: Option<Word> = None;
            let mut prev_right = 0.0f32;

            for ch in line.chars() {
                let Some(c) = ch.char() else { continue };
                let quad = ch.quad();
                let left = quad.ul.x.min(quad.ll.x);
                let right = quad.ur.x.max(quad.lr.x);
                let top = quad.ul.y.min(quad.ur.y);
                let bottom = quad.ll.y.max(quad.lr.y);

                if c.is_whitespace() {
                    if let Some(word) = current.take() {
                        collected.push(word);
                    }
                    continue;
                }
                if current.is_some() && left - prev_right > words::X_TOLERANCE {
                    if let Some(word) = current.take() {
                        collected.push(word);
                    }
                }

                match current.as_mut() {
                    Some(word) => {
                        word.text.push(c);
                        word.x1 = word.x1.max(right);
                        word.top = word.top.min(top);
                        word.bottom = word.bottom.max(bottom);
                    }
                    None => {
                        current = Some(Word {
                            text: c.to_string(),
                            x0: left,
                            x1: right,
                            top,
                            bottom,
                        });
                    }
                }
                prev_right = right;
            }

            if let Some(word) = current.take() {
                collected.push(word);
            }
        }
    }
    collected
}

/// Descriptor-based image collection. A failure to re-open the buffer with
/// the object-table parser only costs the images, never the text.
fn collect_images(pdf: &[u8]) -> Vec<PageImage> {
    let doc = match lopdf::Document::load_mem(pdf) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "object table unreadable, returning no images");
            return Vec::new();
        }
    };

    let mut collected = Vec::new();
    for descriptor in images::list_descriptors(&doc) {
        match images::decode(&doc, &descriptor) {
            Some(img) => collected.push(img),
            None => tracing::debug!(
                name = %descriptor.name,
                width = descriptor.width,
                height = descriptor.height,
                "skipping undecodable embedded image"
            ),
        }
    }
    collected
}
