use bytes::Bytes;
use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::dates::iso_date;

/// A progress photo grouped by date. Nothing ties it to an existing entry.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub entry_date: Date,
    /// Name under which the bytes live in the photo store.
    #[serde(rename = "filename")]
    pub stored_name: String,
    pub original_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub uploaded_at: OffsetDateTime,
}

/// File part of an upload as received from the client.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: String,
    pub body: Bytes,
}

#[derive(Debug, Serialize)]
pub struct UploadPhotoResponse {
    pub id: Uuid,
    pub filename: String,
    pub message: &'static str,
}
