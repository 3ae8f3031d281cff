use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

pub mod backend;
pub mod bitmap;
pub mod dispatch;
pub mod render;

pub use backend::{BackendError, PdfExtractor};
pub use bitmap::PageImage;
pub use dispatch::{Dispatcher, ExtractError};
pub use render::{RenderError, render};

/// A table extracted from a PDF page.
///
/// Rows are ordered top to bottom, cells left to right; the first row is the
/// header. Serializes as a plain array of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// The header row, if the table has any rows at all.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// All rows below the header.
    pub fn body(&self) -> &[Vec<String>] {
        if self.rows.is_empty() {
            &[]
        } else {
            &self.rows[1..]
        }
    }
}

/// The common output triple every backend produces.
///
/// Constructed fresh per invocation and discarded after rendering; nothing is
/// persisted across requests. `tables` is always empty for the OCR and fast
/// backends, which do not attempt table detection.
#[derive(Debug, Default)]
pub struct ExtractionResult {
    pub text: String,
    pub tables: Vec<Table>,
    pub images: Vec<PageImage>,
}

/// Selects which backend produces the [`ExtractionResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Structured text layer with table detection and embedded image
    /// descriptors. Returns empty or garbled text for scanned PDFs.
    TextLayer,
    /// Rasterize every page and recognize text with the OCR engine. Slow,
    /// but the only option for image-only PDFs.
    Ocr,
    /// Plain text layer plus embedded raster images decoded by reference.
    Fast,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::TextLayer, Method::Ocr, Method::Fast];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::TextLayer => "textlayer",
            Method::Ocr => "ocr",
            Method::Fast => "fast",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "textlayer" => Ok(Method::TextLayer),
            "ocr" => Ok(Method::Ocr),
            "fast" => Ok(Method::Fast),
            _ => Err(ExtractError::InvalidMethod(s.to_string())),
        }
    }
}

/// Pure presentation selector; has no effect on extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Debug, Error)]
#[error("unrecognized output format: {0:?} (expected \"markdown\" or \"json\")")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "json" => Ok(OutputFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_parses_canonical_names() {
        assert_eq!("textlayer".parse::<Method>().unwrap(), Method::TextLayer);
        assert_eq!("ocr".parse::<Method>().unwrap(), Method::Ocr);
        assert_eq!("fast".parse::<Method>().unwrap(), Method::Fast);
    }

    #[test]
    fn method_parse_tolerates_case_and_separators() {
        assert_eq!("Text-Layer".parse::<Method>().unwrap(), Method::TextLayer);
        assert_eq!("text_layer".parse::<Method>().unwrap(), Method::TextLayer);
        assert_eq!(" OCR ".parse::<Method>().unwrap(), Method::Ocr);
    }

    #[test]
    fn unknown_method_is_rejected() {
        let err = "UnknownMethod".parse::<Method>().unwrap_err();
        assert!(matches!(err, ExtractError::InvalidMethod(ref v) if v == "UnknownMethod"));
    }

    #[test]
    fn format_parses_both_values() {
        assert_eq!(
            "markdown".parse::<OutputFormat>().unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn table_header_and_body() {
        let table = Table::new(vec![
            vec!["a".into(), "b".into()],
            vec!["1".into(), "2".into()],
        ]);
        assert_eq!(table.header().unwrap(), ["a", "b"]);
        assert_eq!(table.body().len(), 1);

        let empty = Table::new(vec![]);
        assert!(empty.header().is_none());
        assert!(empty.body().is_empty());
    }
}
