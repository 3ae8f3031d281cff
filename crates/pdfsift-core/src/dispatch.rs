use thiserror::Error;

use crate::backend::{BackendError, PdfExtractor};
use crate::{ExtractionResult, Method};

#[derive(Debug, Error)]
pub enum ExtractError {
    /// The method value was not one of the three recognized names; surfaced
    /// before any backend runs.
    #[error("unrecognized extraction method: {0:?}")]
    InvalidMethod(String),
    /// A backend failed. Wrapped exactly once, carrying the method name and
    /// the original failure.
    #[error("extraction failed ({method}): {source}")]
    Extraction {
        method: Method,
        #[source]
        source: BackendError,
    },
}

/// Maps a [`Method`] to its backend and uniformly wraps backend failures.
///
/// This is the single dispatch point; no other component branches on the
/// method. No retry, no partial results — a failed extraction is terminal
/// for the interaction and the caller starts over.
pub struct Dispatcher {
    textlayer: Box<dyn PdfExtractor>,
    ocr: Box<dyn PdfExtractor>,
    fast: Box<dyn PdfExtractor>,
}

impl Dispatcher {
    pub fn new(
        textlayer: Box<dyn PdfExtractor>,
        ocr: Box<dyn PdfExtractor>,
        fast: Box<dyn PdfExtractor>,
    ) -> Self {
        Self {
            textlayer,
            ocr,
            fast,
        }
    }

    fn backend(&self, method: Method) -> &dyn PdfExtractor {
        match method {
            Method::TextLayer => self.textlayer.as_ref(),
            Method::Ocr => self.ocr.as_ref(),
            Method::Fast => self.fast.as_ref(),
        }
    }

    /// Run the backend selected by `method` over the PDF buffer.
    pub fn process(
        &self,
        method: Method,
        pdf: &[u8],
    ) -> Result<ExtractionResult, ExtractError> {
        tracing::info!(method = %method, bytes = pdf.len(), "dispatching extraction");
        let result = self
            .backend(method)
            .extract(pdf)
            .map_err(|source| ExtractError::Extraction { method, source })?;
        tracing::info!(
            method = %method,
            text_len = result.text.len(),
            tables = result.tables.len(),
            images = result.images.len(),
            "extraction complete"
        );
        Ok(result)
    }

    /// Parse a method name, then dispatch. Unrecognized names fail with
    /// [`ExtractError::InvalidMethod`] without invoking any backend.
    pub fn process_named(
        &self,
        method: &str,
        pdf: &[u8],
    ) -> Result<ExtractionResult, ExtractError> {
        let method: Method = method.parse()?;
        self.process(method, pdf)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct MockBackend {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl PdfExtractor for MockBackend {
        fn extract(&self, _pdf: &[u8]) -> Result<ExtractionResult, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(BackendError::Open("mock failure".into()))
            } else {
                Ok(ExtractionResult {
                    text: "mock text".into(),
                    ..Default::default()
                })
            }
        }
    }

    fn mock_dispatcher(fail: bool) -> (Dispatcher, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = |calls: &Arc<AtomicUsize>| {
            Box::new(MockBackend {
                calls: Arc::clone(calls),
                fail,
            }) as Box<dyn PdfExtractor>
        };
        let dispatcher = Dispatcher::new(backend(&calls), backend(&calls), backend(&calls));
        (dispatcher, calls)
    }

    #[test]
    fn dispatches_to_selected_backend() {
        let (dispatcher, calls) = mock_dispatcher(false);
        let result = dispatcher.process(Method::Fast, b"%PDF-").unwrap();
        assert_eq!(result.text, "mock text");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_method_invokes_no_backend() {
        let (dispatcher, calls) = mock_dispatcher(false);
        let err = dispatcher.process_named("UnknownMethod", b"%PDF-").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidMethod(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn backend_failure_is_wrapped_with_method_name() {
        let (dispatcher, calls) = mock_dispatcher(true);
        let err = dispatcher.process(Method::Ocr, b"%PDF-").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("ocr"), "missing method name: {message}");
        assert!(message.contains("mock failure"), "missing source: {message}");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn process_named_accepts_all_canonical_names() {
        let (dispatcher, calls) = mock_dispatcher(false);
        for name in ["textlayer", "ocr", "fast"] {
            dispatcher.process_named(name, b"%PDF-").unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
