use std::time::Duration;

use axum::{extract::State, Json};
use tracing::{debug, instrument, warn};

use super::services::{forecast_with_timeout, history_from_entries, ForecastPoint, HORIZON_DAYS};
use crate::entries::repo as entries_repo;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /forecast — daily weight predictions following the last entry.
#[instrument(skip(state))]
pub async fn get_forecast(State(state): State<AppState>) -> ApiResult<Json<Vec<ForecastPoint>>> {
    let entries = entries_repo::list_all(&state.db).await?;
    let history = history_from_entries(&entries);
    debug!(observations = history.len(), "fitting forecast model");

    let timeout = Duration::from_millis(state.config.forecast.timeout_ms);
    match forecast_with_timeout(state.forecaster.clone(), history, HORIZON_DAYS, timeout).await {
        Ok(points) => Ok(Json(points)),
        Err(e) if state.config.forecast.empty_on_unavailable => {
            warn!(error = %e, "forecast unavailable, answering with no points");
            Ok(Json(Vec::new()))
        }
        Err(e) => {
            warn!(error = %e, "forecast unavailable");
            Err(ApiError::ForecastUnavailable(e.to_string()))
        }
    }
}
