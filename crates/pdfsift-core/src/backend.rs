use thiserror::Error;

use crate::ExtractionResult;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open PDF: {0}")]
    Open(String),
    #[error("failed to extract content: {0}")]
    Extraction(String),
    #[error("external tool not found: {0}")]
    ToolNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Trait for PDF content extraction backends.
///
/// Implementors wrap one extraction engine and normalize its output into the
/// common [`ExtractionResult`] triple, so the presenter and shells never
/// branch on the method. The input is an immutable byte buffer — never a
/// forward-only stream — so running several methods against the same upload
/// is side-effect-free.
pub trait PdfExtractor: Send + Sync {
    /// Extract text, tables, and images from an in-memory PDF.
    fn extract(&self, pdf: &[u8]) -> Result<ExtractionResult, BackendError>;
}
