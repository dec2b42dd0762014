//! Upload Routes
//!
//! POST /upload - analyze a PDF and return its relevant regions

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};

use esg_lens::document::ScoredRegion;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Multipart field names accepted for the document
const FILE_FIELDS: &[&str] = &["pdf_file", "file", "pdf"];

/// POST /upload
///
/// Stores the PDF under the upload folder, runs the pipeline on the uploaded
/// bytes in a blocking thread, and returns the relevant regions in document
/// order.
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<ScoredRegion>>> {
    let max_bytes = state.config().server.max_upload_bytes;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        let name = field.name().unwrap_or("").to_string();
        if !FILE_FIELDS.contains(&name.as_str()) {
            tracing::debug!("Skipping multipart field '{}'", name);
            continue;
        }

        // Plain form values under a file field name are not uploads
        let Some(filename) = field.file_name().map(str::to_string) else {
            tracing::debug!("Skipping non-file part '{}'", name);
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, max_bytes))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| {
        tracing::warn!("No file uploaded");
        AppError::BadRequest("No file uploaded".to_string())
    })?;

    if filename.trim().is_empty() {
        tracing::warn!("Empty filename");
        return Err(AppError::BadRequest("No file selected".to_string()));
    }
    if !allowed_file(&filename) {
        tracing::warn!("Invalid file type: {}", filename);
        return Err(AppError::BadRequest("Only PDF files are allowed".to_string()));
    }

    let upload_dir = &state.config().server.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    let path = upload_dir.join(secure_filename(&filename));
    // Readers of a stored upload see either the old or the new file, never a partial one
    let partial = upload_dir.join(format!(".{}.part", uuid::Uuid::new_v4()));
    tokio::fs::write(&partial, &data).await?;
    tokio::fs::rename(&partial, &path).await?;
    tracing::info!("Saved uploaded PDF to {} ({} bytes)", path.display(), data.len());

    let pipeline = state.pipeline();
    let document = data.to_vec();
    let analysis = tokio::task::spawn_blocking(move || pipeline.analyze_bytes(document))
        .await
        .map_err(|e| AppError::Internal(format!("Analysis task failed: {}", e)))??;

    tracing::info!(
        "Found {} relevant regions out of {} extracted",
        analysis.regions.len(),
        analysis.extracted
    );
    Ok(Json(analysis.regions))
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(max_bytes / (1024 * 1024))
    } else {
        AppError::BadRequest(format!("Failed to read upload: {}", err))
    }
}

/// True when the name carries a `.pdf` extension (any case)
fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Reduce a client-supplied name to a safe single path component.
///
/// Path separators become word breaks, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped, and leading/trailing `.`/`_` are
/// stripped. Falls back to a random name when nothing survives.
pub fn secure_filename(filename: &str) -> String {
    let spaced = filename.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        format!("{}.pdf", uuid::Uuid::new_v4())
    } else {
        trimmed.to_string()
    }
}
