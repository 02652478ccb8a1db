use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use super::dto::{Photo, PhotoUpload, UploadPhotoResponse};
use super::{repo, services};
use crate::dates;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/photos/:date", get(list_photos))
        .route("/photos/file/:filename", get(get_photo_file))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/photos/upload", post(upload_photo))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

/// POST /photos/upload (multipart)
/// Fields: `photo` (file), `date` (YYYY-MM-DD).
#[instrument(skip(state, mp))]
pub async fn upload_photo(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> ApiResult<(StatusCode, Json<UploadPhotoResponse>)> {
    let mut upload: Option<PhotoUpload> = None;
    let mut date: Option<String> = None;

    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("photo") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let body = field.bytes().await.map_err(multipart_error)?;
                upload = Some(PhotoUpload { file_name, body });
            }
            Some("date") => {
                date = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let photo = services::save_photo(&state, date.as_deref(), upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadPhotoResponse {
            id: photo.id,
            filename: photo.stored_name,
            message: "Photo uploaded successfully",
        }),
    ))
}

/// Oversized bodies keep their 413; anything else is a malformed request.
fn multipart_error(e: MultipartError) -> ApiError {
    warn!(error = %e, "multipart body rejected");
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::validation(e.body_text())
    }
}

/// GET /photos/:date
#[instrument(skip(state))]
pub async fn list_photos(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> ApiResult<Json<Vec<Photo>>> {
    let date = dates::parse_date(&date)
        .ok_or_else(|| ApiError::validation(format!("Invalid date {date:?}, expected YYYY-MM-DD")))?;
    let photos = repo::list_by_date(&state.db, date).await?;
    Ok(Json(photos))
}

/// GET /photos/file/:filename — raw bytes.
#[instrument(skip(state))]
pub async fn get_photo_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if !services::is_stored_name(&filename) {
        return Err(ApiError::not_found("File not found"));
    }
    let body = state
        .storage
        .get_object(&filename)
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    Ok((
        [(header::CONTENT_TYPE, services::content_type_for(&filename))],
        body,
    ))
}
