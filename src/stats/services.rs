//! Progress summary built from the earliest entry, the latest entry and the
//! current goal.

use serde::Serialize;
use time::Date;

use crate::dates::iso_date;
use crate::entries::dto::Entry;
use crate::entries::metrics::round_to;
use crate::goals::dto::Goal;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentStats {
    pub weight: f64,
    pub body_fat: f64,
    pub fat_mass: f64,
    pub lean_mass: f64,
    #[serde(with = "iso_date")]
    pub date: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeStats {
    pub weight: f64,
    pub body_fat: f64,
}

/// Each section is omitted when there is nothing to report, so an empty
/// history with no goal serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<CurrentStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<ChangeStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<Goal>,
}

/// Earliest and latest are the min / max by date; input order is irrelevant.
pub fn summarize(entries: &[Entry], goal: Option<Goal>) -> StatsSummary {
    let earliest = entries.iter().min_by_key(|e| e.date);
    let latest = entries.iter().max_by_key(|e| e.date);

    let current = latest.map(|e| {
        let c = e.composition();
        CurrentStats {
            weight: e.weight,
            body_fat: e.body_fat,
            fat_mass: c.fat_mass,
            lean_mass: c.lean_mass,
            date: e.date,
        }
    });

    let change = match (earliest, latest) {
        (Some(first), Some(last)) if first.date != last.date => Some(ChangeStats {
            weight: round_to(last.weight - first.weight, 2),
            body_fat: round_to(last.body_fat - first.body_fat, 2),
        }),
        _ => None,
    };

    StatsSummary {
        current,
        change,
        goals: goal,
    }
}
