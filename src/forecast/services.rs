use std::sync::Arc;
use std::time::Duration as StdDuration;

use serde::Serialize;
use thiserror::Error;
use time::{Date, Duration};

use super::model::{ForecastModel, ModelError, Observation};
use crate::dates::iso_date;
use crate::entries::dto::Entry;
use crate::entries::metrics::round_to;

/// Days predicted past the last recorded entry.
pub const HORIZON_DAYS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub predicted_weight: f64,
}

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model returned {got} points, expected {expected}")]
    WrongLength { expected: usize, got: usize },
    #[error("model output is not a daily continuation at {0}")]
    Discontinuous(Date),
    #[error("model returned a non-finite prediction for {0}")]
    NonFinite(Date),
    #[error("model did not answer within {0:?}")]
    TimedOut(StdDuration),
    #[error("model task failed: {0}")]
    Aborted(String),
}

/// `(date, weight)` pairs, oldest first.
pub fn history_from_entries(entries: &[Entry]) -> Vec<Observation> {
    let mut history: Vec<Observation> = entries
        .iter()
        .map(|e| Observation {
            date: e.date,
            value: e.weight,
        })
        .collect();
    history.sort_by_key(|o| o.date);
    history
}

/// Fit `model` on `history` and return `horizon` daily points following the
/// last observed date. An empty history yields an empty forecast.
pub fn forecast(
    model: &dyn ForecastModel,
    history: &[Observation],
    horizon: u32,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    let Some(last) = history.iter().map(|o| o.date).max() else {
        return Ok(Vec::new());
    };

    let fitted = model.fit(history)?;
    let predictions = fitted.predict(horizon)?;

    let expected = horizon as usize;
    if predictions.len() != expected {
        return Err(ForecastError::WrongLength {
            expected,
            got: predictions.len(),
        });
    }

    let mut prev = last;
    predictions
        .into_iter()
        .map(|p| {
            if prev.checked_add(Duration::days(1)) != Some(p.date) {
                return Err(ForecastError::Discontinuous(p.date));
            }
            if !p.value.is_finite() {
                return Err(ForecastError::NonFinite(p.date));
            }
            prev = p.date;
            Ok(ForecastPoint {
                date: p.date,
                predicted_weight: round_to(p.value, 1),
            })
        })
        .collect()
}

/// Runs [`forecast`] on the blocking pool, giving up after `timeout`.
///
/// A timed-out fit keeps running in the background; its result is dropped.
pub async fn forecast_with_timeout(
    model: Arc<dyn ForecastModel>,
    history: Vec<Observation>,
    horizon: u32,
    timeout: StdDuration,
) -> Result<Vec<ForecastPoint>, ForecastError> {
    if history.is_empty() {
        return Ok(Vec::new());
    }
    let task = tokio::task::spawn_blocking(move || forecast(model.as_ref(), &history, horizon));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(ForecastError::Aborted(join_err.to_string())),
        Err(_) => Err(ForecastError::TimedOut(timeout)),
    }
}
