//! Health check route

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    upload_folder: String,
    max_file_size: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let server = &state.config().server;
    Json(HealthResponse {
        status: "healthy",
        upload_folder: server.upload_dir.display().to_string(),
        max_file_size: server.max_upload_bytes,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::routes::test_support::{json_body, test_state};

    #[tokio::test]
    async fn test_health_check() {
        let (state, dir) = test_state(52_428_800);
        let response = router(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["max_file_size"], 52_428_800);
        assert_eq!(json["upload_folder"], dir.path().display().to_string());
    }
}
