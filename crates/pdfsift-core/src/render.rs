use std::fmt::Write as _;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use thiserror::Error;

use crate::{ExtractionResult, OutputFormat, Table};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to serialize result: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON view of an extraction result. Raw image data is never serialized —
/// only the count survives, while markdown mode inlines the full bitmaps.
#[derive(Serialize)]
struct JsonView<'a> {
    text: &'a str,
    tables: &'a [Table],
    images_count: usize,
}

/// Render the common triple in the selected output format.
///
/// Assumes `result` is well-formed; the only failures are from the
/// underlying PNG encoder and JSON serializer.
pub fn render(result: &ExtractionResult, format: OutputFormat) -> Result<String, RenderError> {
    match format {
        OutputFormat::Markdown => render_markdown(result),
        OutputFormat::Json => render_json(result),
    }
}

fn render_json(result: &ExtractionResult) -> Result<String, RenderError> {
    let view = JsonView {
        text: &result.text,
        tables: &result.tables,
        images_count: result.images.len(),
    };
    Ok(serde_json::to_string_pretty(&view)?)
}

fn render_markdown(result: &ExtractionResult) -> Result<String, RenderError> {
    let mut out = String::new();

    out.push_str("# Çıkarılan Metin\n\n");
    out.push_str(&result.text);
    if !result.text.ends_with('\n') {
        out.push('\n');
    }

    if !result.tables.is_empty() {
        out.push_str("\n## Çıkarılan Tablolar\n");
        for (i, table) in result.tables.iter().enumerate() {
            let _ = write!(out, "\n### Tablo {}\n\n", i + 1);
            out.push_str(&table_grid(table));
        }
    }

    if !result.images.is_empty() {
        out.push_str("\n## Çıkarılan Görüntüler\n");
        for (i, img) in result.images.iter().enumerate() {
            let png = img.to_png()?;
            let _ = write!(
                out,
                "\n### Görüntü {n}\n\n![Görüntü {n}](data:image/png;base64,{data})\n",
                n = i + 1,
                data = BASE64.encode(&png)
            );
        }
    }

    Ok(out)
}

/// Render one table as a markdown grid: header row, separator, body rows.
///
/// Body rows are normalized to the header width — ragged rows are padded
/// with empty cells or truncated — and `|` is escaped inside cells.
pub fn table_grid(table: &Table) -> String {
    let Some(header) = table.header() else {
        return String::new();
    };
    let width = header.len().max(1);
    let mut out = String::new();

    push_row(&mut out, header, width);
    out.push('|');
    for _ in 0..width {
        out.push_str(" --- |");
    }
    out.push('\n');
    for row in table.body() {
        push_row(&mut out, row, width);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], width: usize) {
    out.push('|');
    for i in 0..width {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        out.push(' ');
        out.push_str(&cell.replace('|', "\\|").replace('\n', " "));
        out.push_str(" |");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PageImage;

    fn tiny_image() -> PageImage {
        PageImage::from_raw_samples(1, 1, 3, &[10, 20, 30]).unwrap()
    }

    fn sample_table() -> Table {
        Table::new(vec![
            vec!["Ad".into(), "Tutar".into()],
            vec!["kalem".into(), "12".into()],
        ])
    }

    #[test]
    fn markdown_renders_one_heading_per_table_and_image() {
        let result = ExtractionResult {
            text: "sayfa metni".into(),
            tables: vec![sample_table(), sample_table()],
            images: vec![tiny_image(), tiny_image(), tiny_image()],
        };
        let md = render(&result, OutputFormat::Markdown).unwrap();

        assert_eq!(md.matches("### Tablo ").count(), 2);
        assert_eq!(md.matches("### Görüntü ").count(), 3);
        assert!(md.contains("### Tablo 1\n"));
        assert!(md.contains("### Tablo 2\n"));
        assert!(md.contains("### Görüntü 3\n"));
        assert!(md.contains("![Görüntü 1](data:image/png;base64,"));
    }

    #[test]
    fn markdown_omits_empty_sections() {
        let result = ExtractionResult {
            text: "yalnızca metin".into(),
            ..Default::default()
        };
        let md = render(&result, OutputFormat::Markdown).unwrap();

        assert!(md.starts_with("# Çıkarılan Metin\n\nyalnızca metin\n"));
        assert!(!md.contains("## Çıkarılan Tablolar"));
        assert!(!md.contains("## Çıkarılan Görüntüler"));
    }

    #[test]
    fn markdown_text_pdf_with_one_table_scenario() {
        // Three pages of text, one table found on page 2, no images.
        let result = ExtractionResult {
            text: "birinci sayfa\n\nikinci sayfa\n\nüçüncü sayfa".into(),
            tables: vec![sample_table()],
            images: vec![],
        };
        let md = render(&result, OutputFormat::Markdown).unwrap();

        assert!(md.contains("birinci sayfa\n\nikinci sayfa\n\nüçüncü sayfa"));
        assert_eq!(md.matches("### Tablo ").count(), 1);
        assert!(md.contains("### Tablo 1\n"));
        assert!(md.contains("| Ad | Tutar |"));
        assert!(md.contains("| kalem | 12 |"));
        assert!(!md.contains("## Çıkarılan Görüntüler"));
    }

    #[test]
    fn json_reports_image_count_without_image_data() {
        let result = ExtractionResult {
            text: "ocr çıktısı".into(),
            tables: vec![],
            images: vec![tiny_image(), tiny_image()],
        };
        let out = render(&result, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["text"], "ocr çıktısı");
        assert_eq!(value["tables"], serde_json::json!([]));
        assert_eq!(value["images_count"], 2);
        assert!(value.get("images").is_none());
        assert!(!out.contains("base64"));
    }

    #[test]
    fn json_tables_serialize_as_nested_rows() {
        let result = ExtractionResult {
            text: String::new(),
            tables: vec![sample_table()],
            images: vec![],
        };
        let value: serde_json::Value =
            serde_json::from_str(&render(&result, OutputFormat::Json).unwrap()).unwrap();
        assert_eq!(
            value["tables"],
            serde_json::json!([[["Ad", "Tutar"], ["kalem", "12"]]])
        );
        assert_eq!(value["images_count"], 0);
    }

    #[test]
    fn grid_normalizes_ragged_rows_and_escapes_pipes() {
        let table = Table::new(vec![
            vec!["a|b".into(), "c".into()],
            vec!["only".into()],
            vec!["x".into(), "y".into(), "extra".into()],
        ]);
        let grid = table_grid(&table);
        let lines: Vec<&str> = grid.lines().collect();

        assert_eq!(lines[0], "| a\\|b | c |");
        assert_eq!(lines[1], "| --- | --- |");
        assert_eq!(lines[2], "| only |  |");
        assert_eq!(lines[3], "| x | y |");
    }

    #[test]
    fn empty_table_renders_nothing() {
        assert!(table_grid(&Table::new(vec![])).is_empty());
    }
}
