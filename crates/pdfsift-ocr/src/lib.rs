use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

use pdfsift_core::{BackendError, ExtractionResult, PageImage, PdfExtractor};

mod config;

pub use config::OcrConfig;

/// OCR implementation of [`PdfExtractor`].
///
/// Stages the PDF to a temp file, rasterizes every page to PNG with
/// `pdftoppm`, and recognizes each page with the configured Tesseract
/// executable. The result's images are the rasterized page bitmaps, not the
/// source PDF's embedded images, and the table list is always empty.
///
/// This is the backend for scanned, image-only PDFs; it is slow and its
/// output quality tracks the rasterization DPI.
#[derive(Debug, Default)]
pub struct OcrBackend {
    config: OcrConfig,
}

impl OcrBackend {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    pub fn from_env() -> Self {
        Self::new(OcrConfig::from_env())
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Rasterize every page of the staged PDF into `dir`, returning the
    /// generated page images sorted by page number.
    fn rasterize(&self, pdf_path: &Path, dir: &Path) -> Result<Vec<PathBuf>, BackendError> {
        let status = Command::new("pdftoppm")
            .args(["-png", "-r", &self.config.dpi.to_string()])
            .arg(pdf_path)
            .arg(dir.join("page"))
            .status();

        match status {
            Ok(s) if s.success() => {}
            Ok(_) => {
                return Err(BackendError::Extraction(
                    "pdftoppm failed to rasterize the PDF".to_string(),
                ));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BackendError::ToolNotFound(
                    "pdftoppm (install poppler-utils)".to_string(),
                ));
            }
            Err(e) => return Err(BackendError::Io(e)),
        }

        // pdftoppm names pages page-01.png, page-002.png, ... depending on
        // page count; lexicographic order matches page order.
        let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();
        Ok(pages)
    }

    /// Run Tesseract on one page image.
    fn recognize(&self, image_path: &Path) -> Result<String, BackendError> {
        let output = Command::new(&self.config.tesseract_cmd)
            .arg(image_path)
            .arg("stdout")
            .args(["-l", &self.config.language])
            .output();

        match output {
            Ok(output) if output.status.success() => {
                Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(BackendError::Extraction(format!(
                    "tesseract failed: {}",
                    stderr.trim()
                )))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BackendError::ToolNotFound(format!(
                    "{} (install tesseract-ocr or set PDFSIFT_TESSERACT_CMD)",
                    self.config.tesseract_cmd
                )))
            }
            Err(e) => Err(BackendError::Io(e)),
        }
    }
}

impl PdfExtractor for OcrBackend {
    fn extract(&self, pdf: &[u8]) -> Result<ExtractionResult, BackendError> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("upload.pdf");
        std::fs::write(&pdf_path, pdf)?;

        let pages = self.rasterize(&pdf_path, temp_dir.path())?;
        if pages.is_empty() {
            return Err(BackendError::Extraction(
                "no page images were generated from the PDF".to_string(),
            ));
        }
        tracing::debug!(pages = pages.len(), dpi = self.config.dpi, "pages rasterized");

        let mut texts = Vec::with_capacity(pages.len());
        let mut images = Vec::with_capacity(pages.len());
        for page_png in &pages {
            texts.push(self.recognize(page_png)?);
            match image::open(page_png) {
                Ok(bitmap) => images.push(PageImage::new(bitmap)),
                Err(e) => {
                    tracing::warn!(page = %page_png.display(), error = %e, "skipping unreadable page bitmap")
                }
            }
        }

        Ok(ExtractionResult {
            text: texts.join("\n\n"),
            tables: Vec::new(),
            images,
        })
    }
}

/// Whether an executable responds on PATH (or at its configured location).
pub fn check_binary(cmd: &str) -> bool {
    Command::new(cmd)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

/// Availability of the external tools this backend shells out to.
pub fn check_tools(config: &OcrConfig) -> Vec<(String, bool)> {
    vec![
        ("pdftoppm".to_string(), check_binary("pdftoppm")),
        (
            config.tesseract_cmd.clone(),
            check_binary(&config.tesseract_cmd),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_tesseract_maps_to_tool_not_found() {
        let backend = OcrBackend::new(
            OcrConfig::default().with_tesseract_cmd("/nonexistent/definitely-missing-tesseract"),
        );
        let err = backend.recognize(Path::new("page-01.png")).unwrap_err();
        assert!(matches!(err, BackendError::ToolNotFound(_)));
        assert!(err.to_string().contains("definitely-missing-tesseract"));
    }

    #[test]
    fn check_tools_reports_both_executables() {
        let tools = check_tools(&OcrConfig::default());
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].0, "pdftoppm");
        assert_eq!(tools[1].0, "tesseract");
    }
}
