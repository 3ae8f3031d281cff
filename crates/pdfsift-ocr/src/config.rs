use std::env;

/// OCR engine configuration with environment-derived defaults.
///
/// `PDFSIFT_TESSERACT_CMD` points at the Tesseract executable when it is not
/// on PATH, `PDFSIFT_OCR_LANG` selects the recognition language pack, and
/// `PDFSIFT_OCR_DPI` sets the rasterization resolution.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub tesseract_cmd: String,
    pub language: String,
    pub dpi: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            language: "tur".to_string(),
            dpi: 300,
        }
    }
}

impl OcrConfig {
    /// Resolve configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tesseract_cmd: env_string("PDFSIFT_TESSERACT_CMD")
                .unwrap_or(defaults.tesseract_cmd),
            language: env_string("PDFSIFT_OCR_LANG").unwrap_or(defaults.language),
            dpi: env::var("PDFSIFT_OCR_DPI")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.dpi),
        }
    }

    pub fn with_tesseract_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.tesseract_cmd = cmd.into();
        self
    }

    pub fn with_language(mut self, lang: impl Into<String>) -> Self {
        self.language = lang.into();
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_settings_they_replace() {
        let config = OcrConfig::default();
        assert_eq!(config.tesseract_cmd, "tesseract");
        assert_eq!(config.language, "tur");
        assert_eq!(config.dpi, 300);
    }

    #[test]
    fn builders_override_fields() {
        let config = OcrConfig::default()
            .with_tesseract_cmd("/opt/tesseract/bin/tesseract")
            .with_language("eng")
            .with_dpi(150);
        assert_eq!(config.tesseract_cmd, "/opt/tesseract/bin/tesseract");
        assert_eq!(config.language, "eng");
        assert_eq!(config.dpi, 150);
    }
}
