//! Trait and types for retrieving weather observations for a city.

use anyhow::Result;
use bite_rater::observation::ObservationRecord;

/// Current conditions for a city, with the day's sun times when the
/// provider reports them (UTC epoch seconds).
#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub city: String,
    pub observation: ObservationRecord,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// A multi-day, fixed-step forecast series for a city.
#[derive(Debug, Clone)]
pub struct Forecast {
    pub city: String,
    pub observations: Vec<ObservationRecord>,
}

/// Abstraction over a weather provider (e.g., OpenWeatherMap).
#[async_trait::async_trait]
pub trait WeatherSource {
    async fn current(&self, city: &str) -> Result<CurrentConditions>;

    async fn forecast(&self, city: &str) -> Result<Forecast>;
}
