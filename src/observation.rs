use chrono::{DateTime, FixedOffset, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// A single weather sample for a location, already normalized to
/// Celsius / hPa / m/s / epoch seconds by whatever source produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: i64,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub utc_offset_seconds: i32,
    #[serde(default)]
    pub water_temperature: Option<f64>,
}

impl ObservationRecord {
    pub fn new(
        timestamp: i64,
        temperature: f64,
        pressure: f64,
        humidity: f64,
        wind_speed: f64,
        utc_offset_seconds: i32,
    ) -> Self {
        ObservationRecord {
            timestamp,
            temperature,
            pressure,
            humidity,
            wind_speed,
            utc_offset_seconds,
            water_temperature: None,
        }
    }

    /// Attach a water temperature reading (°C).
    pub fn with_water_temperature(mut self, water_temperature: f64) -> Self {
        self.water_temperature = Some(water_temperature);
        self
    }

    pub fn utc_time(&self) -> Result<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
            .ok_or_else(|| EngineError::invalid("timestamp", self.timestamp))
    }

    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_seconds)
            .ok_or_else(|| EngineError::invalid("utc_offset_seconds", self.utc_offset_seconds))
    }

    /// Wall-clock time at the observed location.
    pub fn local_time(&self) -> Result<NaiveDateTime> {
        let offset = self.offset()?;
        Ok(self.utc_time()?.with_timezone(&offset).naive_local())
    }

    pub fn local_hour(&self) -> Result<u32> {
        Ok(self.local_time()?.hour())
    }

    /// Checks the numeric preconditions the calculators rely on.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.humidity) {
            return Err(EngineError::invalid("humidity", self.humidity));
        }
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            return Err(EngineError::invalid("wind_speed", self.wind_speed));
        }
        if !self.pressure.is_finite() {
            return Err(EngineError::invalid("pressure", self.pressure));
        }
        if !self.temperature.is_finite() {
            return Err(EngineError::invalid("temperature", self.temperature));
        }
        if let Some(water) = self.water_temperature {
            if !water.is_finite() {
                return Err(EngineError::invalid("water_temperature", water));
            }
        }
        self.local_time()?;
        Ok(())
    }
}
