use std::net::SocketAddr;
use std::sync::Arc;

mod handlers;
mod state;
mod template;
mod upload;

use pdfsift_core::Dispatcher;
use pdfsift_fast::FastBackend;
use pdfsift_ocr::OcrBackend;
use pdfsift_textlayer::TextLayerBackend;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let ocr = OcrBackend::from_env();
    tracing::info!(
        tesseract = %ocr.config().tesseract_cmd,
        language = %ocr.config().language,
        dpi = ocr.config().dpi,
        "OCR configuration resolved"
    );

    let state = Arc::new(AppState {
        dispatcher: Dispatcher::new(
            Box::new(TextLayerBackend::new()),
            Box::new(ocr),
            Box::new(FastBackend::new()),
        ),
    });

    // Uploads are held in memory for the duration of one interaction.
    let body_limit = axum::extract::DefaultBodyLimit::max(50 * 1024 * 1024);

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route("/extract", axum::routing::post(handlers::extract::extract))
        .layer(body_limit)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 5001));
    println!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
