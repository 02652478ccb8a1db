use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use super::dto::{DerivedEntry, NewEntry, UpsertEntryRequest, UpsertEntryResponse};
use super::repo;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /entries — newest date first, with derived fat / lean mass.
#[instrument(skip(state))]
pub async fn list_entries(State(state): State<AppState>) -> ApiResult<Json<Vec<DerivedEntry>>> {
    let entries = repo::list_all(&state.db).await?;
    let items = entries.into_iter().rev().map(DerivedEntry::from).collect();
    Ok(Json(items))
}

/// POST /entries — upsert by date.
#[instrument(skip(state, payload))]
pub async fn upsert_entry(
    State(state): State<AppState>,
    payload: Result<Json<UpsertEntryRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UpsertEntryResponse>)> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected entry body");
        ApiError::validation(e.body_text())
    })?;
    let new_entry = NewEntry::try_from(body)?;

    let stored = repo::upsert(&state.db, &new_entry).await?;
    info!(id = %stored.id, date = %stored.date, "entry stored");

    Ok((
        StatusCode::CREATED,
        Json(UpsertEntryResponse {
            id: stored.id,
            message: "Entry added successfully",
        }),
    ))
}
