//! Serving stored uploads back to the viewer

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
};

use super::upload::secure_filename;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// GET /uploads/:filename
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse> {
    if secure_filename(&filename) != filename {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let path = state.config().server.upload_dir.join(&filename);
    tracing::debug!("Serving uploaded PDF: {}", path.display());

    match tokio::fs::read(&path).await {
        Ok(data) => Ok(([(header::CONTENT_TYPE, "application/pdf")], data)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound("File not found".to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::routes::test_support::{json_body, test_state, SAMPLE_PDF};

    #[tokio::test]
    async fn test_serves_stored_pdf() {
        let (state, dir) = test_state(1024 * 1024);
        std::fs::write(dir.path().join("report.pdf"), SAMPLE_PDF).unwrap();

        let response = router(state)
            .oneshot(Request::builder().uri("/uploads/report.pdf").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "application/pdf");
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_missing_upload_is_404() {
        let (state, _dir) = test_state(1024 * 1024);
        let response = router(state)
            .oneshot(Request::builder().uri("/uploads/missing.pdf").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "File not found");
    }
}
