use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::events::repository;
use crate::extractors::AdminToken;
use crate::images::MAX_IMAGE_BYTES;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/upload/image", post(upload_image))
        .route("/uploads/{filename}", get(serve_image))
        // Room for the 20 MiB image plus multipart framing
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024 * 1024))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
    pub message: String,
}

/// POST /api/upload/image — admin multipart upload, single `image` field.
///
/// Type and size are checked before anything is written to disk. An
/// optional `eventId` field marks this upload as a replacement: the
/// referenced event's current image file is pruned (best-effort) before
/// the new URL is returned.
async fn upload_image(
    State(state): State<AppState>,
    AdminToken(_claims): AdminToken,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut image: Option<(String, Vec<u8>)> = None;
    let mut event_id: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("image") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                if !content_type.starts_with("image/") {
                    return Err(AppError::BadRequest(
                        "Only image uploads are accepted".into(),
                    ));
                }
                let original = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {e}")))?;
                if data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest(
                        "Image exceeds the 20 MiB size limit".into(),
                    ));
                }
                image = Some((original, data.to_vec()));
            }
            Some("eventId") => {
                event_id = field
                    .text()
                    .await
                    .ok()
                    .and_then(|s| s.trim().parse().ok());
            }
            _ => {}
        }
    }

    let (original, data) = image.ok_or_else(|| AppError::BadRequest("No file uploaded".into()))?;

    // Replacement upload: drop the event's current image before handing
    // back the new URL.
    if let Some(id) = event_id {
        if let Some(event) = repository::find(&state.db, id)? {
            if let Some(url) = event.image_url.as_deref() {
                state.images.remove_by_url(url).await;
            }
        }
    }

    let image_url = state.images.save(&original, &data).await?;

    Ok(Json(UploadResponse {
        image_url,
        message: "Image uploaded".to_string(),
    }))
}

/// GET /uploads/{filename} — read-only serving of stored images.
async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let path = state.images.resolve(&filename).ok_or(AppError::NotFound)?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(_) => return Err(AppError::NotFound),
    };

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime.as_ref().to_string()),
            (header::CACHE_CONTROL, "public, max-age=86400".to_string()),
        ],
        data,
    )
        .into_response())
}
