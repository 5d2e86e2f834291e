//! Pressure normalization, bite scoring, lunar phase, and forecast aggregation.
//!
//! Everything here is pure: observations go in, typed results come out.
//! [`analyzer::Analyzer`] ties the calculators to an
//! [`EngineConfig`](crate::config::EngineConfig).

pub mod aggregate;
pub mod analyzer;
pub mod bite;
pub mod moon;
pub mod pressure;
pub mod types;
pub mod utility;

pub use aggregate::{ForecastAggregator, aggregate};
pub use analyzer::Analyzer;
pub use bite::{BiteConditions, BiteRules, bite_score};
pub use moon::{MoonPhase, moon_phase};
pub use pressure::{PressureStatus, normalize};
pub use types::{DaySummary, StationReading};
