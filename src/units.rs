//! Unit conversions used when presenting forecast values

const FEET_PER_METER: f64 = 3.28084;
const MPH_PER_MPS: f64 = 2.23694;

/// Round to a fixed number of decimal places
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let multiplier = 10_f64.powi(places);
    (value * multiplier).round() / multiplier
}

/// Meters to feet, rounded to 2 decimal places
#[must_use]
pub fn meters_to_feet(meters: f64) -> f64 {
    round_to(meters * FEET_PER_METER, 2)
}

/// Meters per second to miles per hour, rounded to 2 decimal places
#[must_use]
pub fn mps_to_mph(mps: f64) -> f64 {
    round_to(mps * MPH_PER_MPS, 2)
}
