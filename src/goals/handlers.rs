use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::dto::{Goal, NewGoal, SetGoalRequest, SetGoalResponse};
use super::services;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn get_goals(State(state): State<AppState>) -> ApiResult<Json<Goal>> {
    let goal = services::current_or_default(&state.db).await?;
    Ok(Json(goal))
}

#[instrument(skip(state, payload))]
pub async fn set_goals(
    State(state): State<AppState>,
    payload: Result<Json<SetGoalRequest>, JsonRejection>,
) -> ApiResult<Json<SetGoalResponse>> {
    let Json(body) = payload.map_err(|e| {
        warn!(error = %e, "rejected goal body");
        ApiError::validation(e.body_text())
    })?;
    let goal = NewGoal::try_from(body)?;

    let stored = services::set_goal(&state.db, &goal).await?;
    info!(updated_at = ?stored.updated_at, "goal replaced");

    Ok(Json(SetGoalResponse {
        message: "Goals updated successfully",
    }))
}
