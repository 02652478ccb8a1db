use lazy_static::lazy_static;
use regex::Regex;
use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};
use tracing::{error, info};
use uuid::Uuid;

use super::dto::{Photo, PhotoUpload};
use super::repo;
use crate::dates;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

const STAMP: &[FormatItem<'static>] =
    format_description!("[year][month][day]_[hour][minute][second]");

lazy_static! {
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9._-]+").unwrap();
    static ref STORED_NAME: Regex = Regex::new(r"^[A-Za-z0-9_-]+\.[A-Za-z0-9]+$").unwrap();
}

/// Lowercased extension of `file_name` if it is one we accept.
pub fn allowed_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().copied().find(|allowed| *allowed == ext)
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced.
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();
    let cleaned = UNSAFE_CHARS.replace_all(base, "_");
    cleaned.trim_start_matches(['.', '_']).to_string()
}

/// Only names we could have generated are looked up in the store.
pub fn is_stored_name(name: &str) -> bool {
    STORED_NAME.is_match(name)
}

pub fn stored_name_for(ext: &str, now: OffsetDateTime) -> String {
    let stamp = now.format(STAMP).unwrap_or_default();
    format!("{}_{}.{}", stamp, Uuid::new_v4().simple(), ext)
}

pub fn content_type_for(name: &str) -> &'static str {
    match allowed_extension(name) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

/// Validate an upload, write its bytes to the photo store and record it.
///
/// The bytes are written first; if recording fails the object is removed
/// again so the store does not collect orphans.
pub async fn save_photo(
    st: &AppState,
    date: Option<&str>,
    upload: Option<PhotoUpload>,
) -> ApiResult<Photo> {
    let upload = upload.ok_or_else(|| ApiError::validation("No photo provided"))?;
    let raw_date = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::validation("Date is required"))?;
    if upload.file_name.trim().is_empty() {
        return Err(ApiError::validation("No file selected"));
    }
    let entry_date = dates::parse_date(raw_date)
        .ok_or_else(|| ApiError::validation(format!("Invalid date {raw_date:?}, expected YYYY-MM-DD")))?;
    let ext = allowed_extension(&upload.file_name)
        .ok_or_else(|| ApiError::validation("Invalid file type"))?;

    let uploaded_at = OffsetDateTime::now_utc();
    let photo = Photo {
        id: Uuid::new_v4(),
        entry_date,
        stored_name: stored_name_for(ext, uploaded_at),
        original_name: sanitize_file_name(&upload.file_name),
        uploaded_at,
    };

    st.storage
        .put_object(&photo.stored_name, upload.body)
        .await
        .map_err(ApiError::Store)?;

    if let Err(e) = repo::insert_photo(&st.db, &photo).await {
        if let Err(cleanup) = st.storage.delete_object(&photo.stored_name).await {
            error!(error = ?cleanup, key = %photo.stored_name, "failed to remove orphaned photo");
        }
        return Err(ApiError::Store(e));
    }

    info!(id = %photo.id, date = %photo.entry_date, key = %photo.stored_name, "photo stored");
    Ok(photo)
}

#[cfg(test)]
mod photo_tests {
    use super::*;
    use bytes::Bytes;
    use time::macros::{date, datetime};

    fn upload(name: &str, body: &'static [u8]) -> Option<PhotoUpload> {
        Some(PhotoUpload {
            file_name: name.into(),
            body: Bytes::from_static(body),
        })
    }

    #[test]
    fn extension_allow_list() {
        assert_eq!(allowed_extension("photo.png"), Some("png"));
        assert_eq!(allowed_extension("PHOTO.JPG"), Some("jpg"));
        assert_eq!(allowed_extension("a.b.jpeg"), Some("jpeg"));
        assert_eq!(allowed_extension("anim.gif"), Some("gif"));
        assert_eq!(allowed_extension("photo.exe"), None);
        assert_eq!(allowed_extension("png"), None);
        assert_eq!(allowed_extension("photo."), None);
    }

    #[test]
    fn sanitizes_client_file_names() {
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_file_name(r"C:\Users\me\front view.jpg"), "front_view.jpg");
        assert_eq!(sanitize_file_name(".hidden.gif"), "hidden.gif");
    }

    #[test]
    fn stored_names_are_generated_and_safe() {
        let now = datetime!(2024-01-10 08:30:05 UTC);
        let a = stored_name_for("png", now);
        let b = stored_name_for("png", now);
        assert_ne!(a, b);
        assert!(a.starts_with("20240110_083005_"));
        assert!(a.ends_with(".png"));
        assert!(is_stored_name(&a));
        assert!(!is_stored_name("../secret.png"));
        assert!(!is_stored_name("a/b.png"));
        assert!(!is_stored_name("noext"));
    }

    #[test]
    fn content_types() {
        assert_eq!(content_type_for("x.PNG"), "image/png");
        assert_eq!(content_type_for("x.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("x.gif"), "image/gif");
        assert_eq!(content_type_for("x.bin"), "application/octet-stream");
    }

    #[tokio::test]
    async fn rejects_disallowed_extension() {
        let st = AppState::for_tests().await;
        let err = save_photo(&st, Some("2024-01-10"), upload("photo.exe", b"MZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Invalid file type"));
    }

    #[tokio::test]
    async fn rejects_missing_parts() {
        let st = AppState::for_tests().await;
        let no_photo = save_photo(&st, Some("2024-01-10"), None).await.unwrap_err();
        assert!(matches!(no_photo, ApiError::Validation(ref m) if m == "No photo provided"));

        let no_date = save_photo(&st, None, upload("a.png", b"x")).await.unwrap_err();
        assert!(matches!(no_date, ApiError::Validation(ref m) if m == "Date is required"));

        let no_name = save_photo(&st, Some("2024-01-10"), upload("", b"x")).await.unwrap_err();
        assert!(matches!(no_name, ApiError::Validation(ref m) if m == "No file selected"));

        let bad_date = save_photo(&st, Some("yesterday"), upload("a.png", b"x")).await.unwrap_err();
        assert!(matches!(bad_date, ApiError::Validation(_)));

        assert!(repo::list_by_date(&st.db, date!(2024 - 01 - 10)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_body_with_name_is_accepted_under_generated_name() {
        let st = AppState::for_tests().await;
        let photo = save_photo(&st, Some("2024-01-10"), upload("photo.png", b""))
            .await
            .unwrap();

        assert_ne!(photo.stored_name, "photo.png");
        assert_eq!(photo.original_name, "photo.png");
        assert!(photo.stored_name.ends_with(".png"));

        let stored = st.storage.get_object(&photo.stored_name).await.unwrap().unwrap();
        assert!(stored.is_empty());

        let listed = repo::list_by_date(&st.db, date!(2024 - 01 - 10)).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, photo.id);
        assert_eq!(listed[0].stored_name, photo.stored_name);
    }

    #[tokio::test]
    async fn photo_date_need_not_match_an_entry() {
        let st = AppState::for_tests().await;
        let photo = save_photo(&st, Some("2030-05-05"), upload("side.JPG", b"\xff\xd8"))
            .await
            .unwrap();
        assert_eq!(photo.entry_date, date!(2030 - 05 - 05));
        assert!(photo.stored_name.ends_with(".jpg"));
    }
}
