use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::metrics::{self, BodyComposition};
use crate::dates::{self, iso_date};
use crate::error::ApiError;

/// One measurement per calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub weight: f64,
    pub body_fat: f64,
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Entry {
    pub fn composition(&self) -> BodyComposition {
        metrics::derive(self.weight, self.body_fat)
    }
}

/// Entry plus computed fat / lean mass, never persisted.
#[derive(Debug, Serialize)]
pub struct DerivedEntry {
    #[serde(flatten)]
    pub entry: Entry,
    #[serde(flatten)]
    pub composition: BodyComposition,
}

impl From<Entry> for DerivedEntry {
    fn from(entry: Entry) -> Self {
        let composition = entry.composition();
        Self { entry, composition }
    }
}

/// Raw request body; every field is optional so that missing values are
/// reported as validation errors instead of deserialization failures.
#[derive(Debug, Default, Deserialize)]
pub struct UpsertEntryRequest {
    pub date: Option<String>,
    pub weight: Option<f64>,
    pub body_fat: Option<f64>,
    pub notes: Option<String>,
}

/// Validated entry ready for the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    pub date: Date,
    pub weight: f64,
    pub body_fat: f64,
    pub notes: Option<String>,
}

impl TryFrom<UpsertEntryRequest> for NewEntry {
    type Error = ApiError;

    fn try_from(req: UpsertEntryRequest) -> Result<Self, Self::Error> {
        let (Some(raw_date), Some(weight), Some(body_fat)) = (req.date, req.weight, req.body_fat)
        else {
            return Err(ApiError::validation("Missing required fields"));
        };
        let date = dates::parse_date(&raw_date)
            .ok_or_else(|| ApiError::validation(format!("Invalid date {raw_date:?}, expected YYYY-MM-DD")))?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(ApiError::validation("weight must be a positive number"));
        }
        if !body_fat.is_finite() || !(0.0..=100.0).contains(&body_fat) {
            return Err(ApiError::validation("body_fat must be between 0 and 100"));
        }
        let derived = metrics::derive(weight, body_fat);
        if !derived.fat_mass.is_finite() || !derived.lean_mass.is_finite() {
            return Err(ApiError::validation("weight is too large"));
        }
        let notes = req
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(Self {
            date,
            weight,
            body_fat,
            notes,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertEntryResponse {
    pub id: Uuid,
    pub message: &'static str,
}
