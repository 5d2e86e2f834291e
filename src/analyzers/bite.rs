use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::trace;

use crate::error::{EngineError, Result};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// Thresholds for the bite heuristic. Each factor adds or subtracts a fixed
/// number of points; only the bands are configurable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiteRules {
    /// +3 inside this band (mmHg).
    pub ideal_pressure: RangeInclusive<i32>,
    /// +2 inside this band but outside `ideal_pressure`, −1 outside both.
    pub fair_pressure: RangeInclusive<i32>,
    /// +2 for a light breeze (m/s).
    pub calm_wind: RangeInclusive<f64>,
    /// −2 above this speed (m/s).
    pub strong_wind_above: f64,
    /// +1 at or above this relative humidity (%).
    pub humid_from: i32,
    /// +2 inside this band, −1 outside (°C). Missing readings score 0.
    pub comfortable_water: RangeInclusive<f64>,
    /// +2 when the local hour falls in any of these windows.
    pub feeding_hours: Vec<RangeInclusive<u32>>,
}

impl Default for BiteRules {
    fn default() -> Self {
        BiteRules {
            ideal_pressure: 735..=741,
            fair_pressure: 732..=745,
            calm_wind: 1.0..=4.0,
            strong_wind_above: 7.0,
            humid_from: 60,
            comfortable_water: 12.0..=22.0,
            feeding_hours: vec![5..=9, 18..=21],
        }
    }
}

impl BiteRules {
    /// Scores conditions on a 1–5 scale.
    ///
    /// Callers are expected to pass humidity in `0..=100` and an hour in
    /// `0..=23` (see [`BiteConditions::new`]); the result is clamped either way.
    pub fn score(
        &self,
        pressure_mm: i32,
        wind_speed: f64,
        humidity: i32,
        water_temp: Option<f64>,
        local_hour: u32,
    ) -> u8 {
        let pressure = if self.ideal_pressure.contains(&pressure_mm) {
            3
        } else if self.fair_pressure.contains(&pressure_mm) {
            2
        } else {
            -1
        };

        let wind = if self.calm_wind.contains(&wind_speed) {
            2
        } else if wind_speed > self.strong_wind_above {
            -2
        } else {
            0
        };

        let humid = if humidity >= self.humid_from { 1 } else { 0 };

        let water = match water_temp {
            Some(t) if self.comfortable_water.contains(&t) => 2,
            Some(_) => -1,
            None => 0,
        };

        let hour = if self.feeding_hours.iter().any(|w| w.contains(&local_hour)) {
            2
        } else {
            0
        };

        let total = pressure + wind + humid + water + hour;
        trace!(pressure, wind, humid, water, hour, total, "Bite score components");

        total.clamp(MIN_SCORE, MAX_SCORE) as u8
    }
}

/// Bite score with the default thresholds.
pub fn bite_score(
    pressure_mm: i32,
    wind_speed: f64,
    humidity: i32,
    water_temp: Option<f64>,
    local_hour: u32,
) -> u8 {
    BiteRules::default().score(pressure_mm, wind_speed, humidity, water_temp, local_hour)
}

/// Inputs to the bite heuristic, checked against their preconditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiteConditions {
    pub pressure_mm: i32,
    pub wind_speed: f64,
    pub humidity: i32,
    pub water_temp: Option<f64>,
    pub local_hour: u32,
}

impl BiteConditions {
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if humidity is outside `0..=100`,
    /// the hour is outside `0..=23`, or wind/water values are not finite.
    pub fn new(
        pressure_mm: i32,
        wind_speed: f64,
        humidity: i32,
        water_temp: Option<f64>,
        local_hour: u32,
    ) -> Result<Self> {
        if !(0..=100).contains(&humidity) {
            return Err(EngineError::invalid("humidity", humidity));
        }
        if local_hour > 23 {
            return Err(EngineError::invalid("local_hour", local_hour));
        }
        if !wind_speed.is_finite() || wind_speed < 0.0 {
            return Err(EngineError::invalid("wind_speed", wind_speed));
        }
        if let Some(t) = water_temp.filter(|t| !t.is_finite()) {
            return Err(EngineError::invalid("water_temp", t));
        }
        Ok(BiteConditions {
            pressure_mm,
            wind_speed,
            humidity,
            water_temp,
            local_hour,
        })
    }

    pub fn score(&self, rules: &BiteRules) -> u8 {
        rules.score(
            self.pressure_mm,
            self.wind_speed,
            self.humidity,
            self.water_temp,
            self.local_hour,
        )
    }
}
