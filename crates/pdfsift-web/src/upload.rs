use axum::extract::Multipart;

/// An uploaded PDF with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload.
pub struct FormFields {
    pub file: UploadedFile,
    pub method: String,
    pub format: String,
}

/// Parse a multipart form upload into structured form fields.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, String> {
    let mut file: Option<UploadedFile> = None;
    let mut method = String::new();
    let mut format = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Failed to read form field: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "pdf" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read file data: {}", e))?
                    .to_vec();

                validate_pdf(&filename, &data)?;
                file = Some(UploadedFile { filename, data });
            }
            "method" => {
                method = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read method: {}", e))?;
            }
            "format" => {
                format = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read format: {}", e))?;
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or("No file uploaded")?;

    Ok(FormFields {
        file,
        method,
        format,
    })
}

/// The upload input is constrained to PDF content: check the magic bytes.
fn validate_pdf(filename: &str, data: &[u8]) -> Result<(), String> {
    if data.starts_with(b"%PDF-") {
        return Ok(());
    }
    Err(format!(
        "{} does not appear to be a valid PDF file",
        filename
    ))
}
