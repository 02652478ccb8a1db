use axum::{extract::State, Json};
use tracing::instrument;

use super::services::{summarize, StatsSummary};
use crate::entries::repo as entries_repo;
use crate::error::ApiResult;
use crate::goals::repo as goals_repo;
use crate::state::AppState;

/// GET /stats — `goals` only appears once a goal has actually been stored.
#[instrument(skip(state))]
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<StatsSummary>> {
    let entries = entries_repo::list_all(&state.db).await?;
    let goal = goals_repo::current(&state.db).await?;
    Ok(Json(summarize(&entries, goal)))
}
