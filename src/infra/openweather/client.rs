use anyhow::Result;
use async_trait::async_trait;
use bite_rater::fetch::auth::UrlParam;
use bite_rater::fetch::{BasicClient, HttpClient, fetch_json};
use serde_json::Value;
use tracing::debug;

use super::payload::{parse_current, parse_forecast};
use crate::services::weather_api::{CurrentConditions, Forecast, WeatherSource};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

pub struct OpenWeatherClient<C> {
    http: UrlParam<C>,
    base_url: String,
}

impl OpenWeatherClient<BasicClient> {
    pub fn new(api_key: String) -> Self {
        Self::with_client(BasicClient::new(), api_key, DEFAULT_BASE_URL)
    }
}

impl<C: HttpClient> OpenWeatherClient<C> {
    /// Builds a client over any [`HttpClient`]; the API key travels as the
    /// `appid` query parameter.
    pub fn with_client(inner: C, api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            http: UrlParam::new(inner, "appid", api_key),
            base_url: base_url.into(),
        }
    }

    /// Metric-units URL for `path`. The key is added later by [`UrlParam`],
    /// so the returned string is safe to log.
    fn endpoint(&self, path: &str, city: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/{}", self.base_url, path),
            &[("q", city), ("units", "metric")],
        )?;
        Ok(url.into())
    }
}

#[async_trait]
impl<C: HttpClient> WeatherSource for OpenWeatherClient<C> {
    #[tracing::instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let url = self.endpoint("weather", city)?;
        debug!(url = %url, "Requesting current conditions");
        let body: Value = fetch_json(&self.http, &url).await?;
        parse_current(body)
    }

    #[tracing::instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<Forecast> {
        let url = self.endpoint("forecast", city)?;
        debug!(url = %url, "Requesting forecast");
        let body: Value = fetch_json(&self.http, &url).await?;
        let forecast = parse_forecast(body)?;
        debug!(samples = forecast.observations.len(), "Forecast received");
        Ok(forecast)
    }
}
