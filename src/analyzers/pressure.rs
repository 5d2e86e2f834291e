use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// hPa → mmHg conversion factor.
pub const HPA_TO_MMHG: f64 = 0.75006;

/// Approximate pressure drop per meter of elevation, in hPa.
pub const HPA_PER_METER: f64 = 0.12;

/// Pressure (mmHg) anglers treat as the sweet spot.
pub const REFERENCE_PRESSURE_MM: i32 = 738;

/// Converts a station pressure in hPa to whole mmHg, correcting for the
/// location's altitude first. An altitude of zero (or below) means sea level.
pub fn normalize(pressure_hpa: f64, altitude_m: f64) -> i32 {
    let corrected = pressure_hpa - altitude_m * HPA_PER_METER;
    (corrected * HPA_TO_MMHG).round() as i32
}

/// Where a normalized pressure sits relative to the reference value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PressureStatus {
    /// Below the reference: predators tend to be active.
    Low,
    Ideal,
    /// Above the reference: fish go passive.
    High,
}

impl PressureStatus {
    /// | Pressure vs reference | Status |
    /// |-----------------------|--------|
    /// | equal                 | Ideal  |
    /// | below                 | Low    |
    /// | above                 | High   |
    pub fn classify(pressure_mm: i32, reference_mm: i32) -> Self {
        match pressure_mm.cmp(&reference_mm) {
            Ordering::Equal => PressureStatus::Ideal,
            Ordering::Less => PressureStatus::Low,
            Ordering::Greater => PressureStatus::High,
        }
    }
}
