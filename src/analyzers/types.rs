//! Result types produced by the analyzers.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::analyzers::moon::MoonPhase;
use crate::analyzers::pressure::PressureStatus;

/// One local calendar day of a forecast series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Mean temperature of samples between 06:00 and 18:00 local, if any.
    pub day_avg_temp: Option<i32>,
    /// Mean temperature of the remaining samples, if any.
    pub night_avg_temp: Option<i32>,
    pub min_temp: i32,
    pub max_temp: i32,
    pub avg_humidity: i32,
    pub avg_wind: f64,
    pub avg_pressure: i32,
    pub pressure_status: PressureStatus,
    pub bite_score: u8,
    pub moon_phase: MoonPhase,
}

/// Scored snapshot of current conditions at a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationReading {
    pub local_time: NaiveDateTime,
    pub temperature: i32,
    pub humidity: i32,
    pub wind_speed: f64,
    pub pressure_mm: i32,
    pub pressure_status: PressureStatus,
    pub bite_score: u8,
    pub moon_phase: MoonPhase,
}
