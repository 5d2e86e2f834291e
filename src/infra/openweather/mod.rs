//! OpenWeatherMap 2.5 API adapter.
//!
//! [`OpenWeatherClient`] implements [`WeatherSource`](crate::services::weather_api::WeatherSource)
//! over `/weather` (current conditions) and `/forecast` (5 days, 3-hour steps).

mod client;
mod payload;

pub use client::OpenWeatherClient;
