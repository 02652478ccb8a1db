use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};

use crate::dates::{self, iso_date};
use crate::error::ApiError;

/// Current weight / body-fat targets. Every field may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Goal {
    pub start_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_body_fat: Option<f64>,
    pub target_body_fat: Option<f64>,
    #[serde(with = "iso_date::option")]
    pub target_date: Option<Date>,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

/// Served when no goal has been stored yet.
pub const DEFAULT_GOAL: Goal = Goal {
    start_weight: Some(80.0),
    target_weight: Some(75.0),
    start_body_fat: Some(25.0),
    target_body_fat: Some(15.0),
    target_date: None,
    updated_at: None,
};

#[derive(Debug, Default, Deserialize)]
pub struct SetGoalRequest {
    pub start_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_body_fat: Option<f64>,
    pub target_body_fat: Option<f64>,
    pub target_date: Option<String>,
}

/// Validated replacement goal. Fields left out of the request stay absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGoal {
    pub start_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub start_body_fat: Option<f64>,
    pub target_body_fat: Option<f64>,
    pub target_date: Option<Date>,
}

fn check_weight(name: &str, v: Option<f64>) -> Result<Option<f64>, ApiError> {
    match v {
        Some(w) if !w.is_finite() || w <= 0.0 => Err(ApiError::validation(format!(
            "{name} must be a positive number"
        ))),
        other => Ok(other),
    }
}

fn check_body_fat(name: &str, v: Option<f64>) -> Result<Option<f64>, ApiError> {
    match v {
        Some(bf) if !bf.is_finite() || !(0.0..=100.0).contains(&bf) => Err(ApiError::validation(
            format!("{name} must be between 0 and 100"),
        )),
        other => Ok(other),
    }
}

impl TryFrom<SetGoalRequest> for NewGoal {
    type Error = ApiError;

    fn try_from(req: SetGoalRequest) -> Result<Self, Self::Error> {
        let target_date = match req.target_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(dates::parse_date(raw).ok_or_else(|| {
                ApiError::validation(format!("Invalid target_date {raw:?}, expected YYYY-MM-DD"))
            })?),
        };
        Ok(Self {
            start_weight: check_weight("start_weight", req.start_weight)?,
            target_weight: check_weight("target_weight", req.target_weight)?,
            start_body_fat: check_body_fat("start_body_fat", req.start_body_fat)?,
            target_body_fat: check_body_fat("target_body_fat", req.target_body_fat)?,
            target_date,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SetGoalResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn default_goal_serializes_without_timestamp() {
        let v = serde_json::to_value(&DEFAULT_GOAL).unwrap();
        assert_eq!(v["start_weight"], 80.0);
        assert_eq!(v["target_weight"], 75.0);
        assert_eq!(v["start_body_fat"], 25.0);
        assert_eq!(v["target_body_fat"], 15.0);
        assert!(v["target_date"].is_null());
        assert!(v.get("updated_at").is_none());
    }

    #[test]
    fn partial_request_leaves_other_fields_absent() {
        let g = NewGoal::try_from(SetGoalRequest {
            target_weight: Some(72.5),
            target_date: Some("2024-06-30".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(g.target_weight, Some(72.5));
        assert_eq!(g.target_date, Some(date!(2024 - 06 - 30)));
        assert_eq!(g.start_weight, None);
        assert_eq!(g.start_body_fat, None);
        assert_eq!(g.target_body_fat, None);
    }

    #[test]
    fn blank_target_date_is_absent() {
        let g = NewGoal::try_from(SetGoalRequest {
            target_date: Some("".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(g.target_date, None);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let bad_bf = SetGoalRequest {
            target_body_fat: Some(150.0),
            ..Default::default()
        };
        assert!(matches!(NewGoal::try_from(bad_bf), Err(ApiError::Validation(_))));

        let bad_weight = SetGoalRequest {
            start_weight: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(NewGoal::try_from(bad_weight), Err(ApiError::Validation(_))));

        let bad_date = SetGoalRequest {
            target_date: Some("next summer".into()),
            ..Default::default()
        };
        assert!(matches!(NewGoal::try_from(bad_date), Err(ApiError::Validation(_))));
    }
}
