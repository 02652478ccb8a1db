//! Body-composition values derived from a weight / body-fat pair.

use serde::Serialize;

/// Fat and lean mass, both rounded to 2 decimals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BodyComposition {
    pub fat_mass: f64,
    pub lean_mass: f64,
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Ranges are not checked here; callers validate weight and body fat first.
pub fn derive(weight: f64, body_fat: f64) -> BodyComposition {
    let fat_mass = round_to(weight * body_fat / 100.0, 2);
    let lean_mass = round_to(weight - fat_mass, 2);
    BodyComposition {
        fat_mass,
        lean_mass,
    }
}
