//! Route modules for ESG Lens Server

pub mod files;
pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::error::AppError;
use crate::state::AppState;

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = state.config().server.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/upload", post(upload::upload_pdf))
        .route("/uploads/:filename", get(files::serve_upload))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, Response};
    use tempfile::TempDir;

    use esg_lens::config::Config;
    use esg_lens::extract::RegionExtractor;
    use esg_lens::ocr::{OcrFallbackAdapter, TesseractProvider};
    use esg_lens::pipeline::Pipeline;
    use esg_lens::relevance::{Embedder, EmbeddingError, RelevanceScorer};

    use crate::state::AppState;

    pub const SAMPLE_PDF: &[u8] = include_bytes!("../../tests/fixtures/esg_sample.pdf");
    const BOUNDARY: &str = "esglensboundary7MA4YWxk";

    /// One axis per keyword, set when the text mentions it
    struct KeywordEmbedder(Vec<&'static str>);

    impl Embedder for KeywordEmbedder {
        fn model_name(&self) -> &str {
            "keyword"
        }

        fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts
                .iter()
                .map(|text| {
                    let lower = text.to_lowercase();
                    self.0
                        .iter()
                        .map(|k| if lower.contains(k) { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect())
        }
    }

    /// App state with a temp upload folder; keep the `TempDir` alive
    pub fn test_state(max_upload_bytes: usize) -> (AppState, TempDir) {
        let upload_dir = TempDir::new().unwrap();

        let mut config = Config::default();
        config.server.upload_dir = upload_dir.path().to_path_buf();
        config.server.max_upload_bytes = max_upload_bytes;

        let keywords = vec!["emissions", "governance"];
        let scorer =
            RelevanceScorer::new(Arc::new(KeywordEmbedder(keywords.clone())), &keywords, 0.4).unwrap();
        let ocr = OcrFallbackAdapter::new(
            Arc::new(TesseractProvider::new("eng").with_command("esg-lens-missing-tesseract")),
            "eng",
        );
        let pipeline = Pipeline::new(RegionExtractor::default(), ocr, Arc::new(scorer));

        (AppState::new(config, pipeline), upload_dir)
    }

    /// POST /upload request with one multipart field
    pub fn upload_request(field: &str, filename: Option<&str>, data: &[u8]) -> Request<Body> {
        let disposition = match filename {
            Some(name) => format!("form-data; name=\"{}\"; filename=\"{}\"", field, name),
            None => format!("form-data; name=\"{}\"", field),
        };

        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
        if filename.is_some() {
            body.extend_from_slice(b"Content-Type: application/pdf\r\n");
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .uri("/upload")
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    pub async fn json_body(response: Response<Body>) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
