use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use pdfsift_core::{ExtractError, OutputFormat, render};

use crate::state::AppState;
use crate::template;
use crate::upload;

/// Handle one upload: parse the form, dispatch the selected backend, render.
///
/// Extraction is synchronous CPU/subprocess work with no cancellation; it
/// runs on the blocking pool and the request waits for it to finish. Any
/// failure sends the caller back to the form page with an error banner, ready
/// for a new upload.
pub async fn extract(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let fields = match upload::parse_multipart(multipart).await {
        Ok(fields) => fields,
        Err(message) => return error_page(StatusCode::BAD_REQUEST, &message),
    };

    let format: OutputFormat = match fields.format.parse() {
        Ok(format) => format,
        Err(e) => return error_page(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    tracing::info!(
        file = %fields.file.filename,
        method = %fields.method,
        bytes = fields.file.data.len(),
        "processing upload"
    );

    let dispatcher_state = Arc::clone(&state);
    let method = fields.method;
    let pdf = fields.file.data;
    let outcome =
        tokio::task::spawn_blocking(move || dispatcher_state.dispatcher.process_named(&method, &pdf))
            .await;

    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            let status = match e {
                ExtractError::InvalidMethod(_) => StatusCode::BAD_REQUEST,
                ExtractError::Extraction { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            return error_page(status, &e.to_string());
        }
        Err(e) => {
            tracing::error!(error = %e, "extraction task panicked");
            return error_page(StatusCode::INTERNAL_SERVER_ERROR, "extraction task failed");
        }
    };

    match render(&result, format) {
        Ok(body) => {
            let content_type = match format {
                OutputFormat::Markdown => "text/markdown; charset=utf-8",
                OutputFormat::Json => "application/json",
            };
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => error_page(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}

fn error_page(status: StatusCode, message: &str) -> Response {
    (status, template::render_index(&template::error_banner(message))).into_response()
}
