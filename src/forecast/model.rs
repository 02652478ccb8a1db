//! Contract between the forecast adapter and a trend-fitting model, plus the
//! default least-squares implementation.
//!
//! A model is fitted once per request on the full `(date, weight)` history and
//! asked for `horizon_days` daily predictions. Implementations must return
//! exactly that many points, one per calendar day, starting the day after the
//! last observation. The adapter checks this and treats any violation as the
//! forecast being unavailable.

use thiserror::Error;
use time::{Date, Duration};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: Date,
    pub value: f64,
}

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("need at least {needed} observations on distinct dates, got {got}")]
    InsufficientData { needed: usize, got: usize },
    #[error("model produced a non-finite value")]
    NonFinite,
    #[error("forecast date out of range")]
    DateOutOfRange,
}

pub trait ForecastModel: Send + Sync {
    fn fit(&self, history: &[Observation]) -> Result<Box<dyn FittedModel>, ModelError>;
}

pub trait FittedModel: Send {
    fn predict(&self, horizon_days: u32) -> Result<Vec<Observation>, ModelError>;
}

/// Ordinary least squares of value against calendar-day offset.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrend;

#[derive(Debug, Clone, Copy)]
struct FittedLine {
    origin: Date,
    last: Date,
    intercept: f64,
    slope: f64,
}

impl ForecastModel for LinearTrend {
    fn fit(&self, history: &[Observation]) -> Result<Box<dyn FittedModel>, ModelError> {
        let mut dates: Vec<Date> = history.iter().map(|o| o.date).collect();
        dates.sort_unstable();
        dates.dedup();
        let (Some(&origin), Some(&last)) = (dates.first(), dates.last()) else {
            return Err(ModelError::InsufficientData { needed: 2, got: 0 });
        };
        if dates.len() < 2 {
            return Err(ModelError::InsufficientData {
                needed: 2,
                got: dates.len(),
            });
        }

        let n = history.len() as f64;
        let xs: Vec<f64> = history
            .iter()
            .map(|o| (o.date - origin).whole_days() as f64)
            .collect();
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = history.iter().map(|o| o.value).sum::<f64>() / n;

        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for (x, o) in xs.iter().zip(history) {
            sxx += (x - mean_x) * (x - mean_x);
            sxy += (x - mean_x) * (o.value - mean_y);
        }

        // sxx > 0 because there are at least two distinct dates.
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        if !slope.is_finite() || !intercept.is_finite() {
            return Err(ModelError::NonFinite);
        }

        Ok(Box::new(FittedLine {
            origin,
            last,
            intercept,
            slope,
        }))
    }
}

impl FittedModel for FittedLine {
    fn predict(&self, horizon_days: u32) -> Result<Vec<Observation>, ModelError> {
        (1..=i64::from(horizon_days))
            .map(|ahead| {
                let date = self
                    .last
                    .checked_add(Duration::days(ahead))
                    .ok_or(ModelError::DateOutOfRange)?;
                let x = (date - self.origin).whole_days() as f64;
                let value = self.intercept + self.slope * x;
                if value.is_finite() {
                    Ok(Observation { date, value })
                } else {
                    Err(ModelError::NonFinite)
                }
            })
            .collect()
    }
}
