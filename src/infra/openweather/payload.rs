use anyhow::{Context, Result, anyhow};
use bite_rater::observation::ObservationRecord;
use serde::Deserialize;
use serde_json::Value;

use crate::services::weather_api::{CurrentConditions, Forecast};

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
    pressure: f64,
    humidity: f64,
}

#[derive(Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Deserialize, Default)]
struct SysBlock {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Deserialize)]
struct CurrentPayload {
    name: String,
    dt: i64,
    timezone: i32,
    main: MainBlock,
    wind: WindBlock,
    #[serde(default)]
    sys: SysBlock,
}

#[derive(Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainBlock,
    wind: WindBlock,
}

#[derive(Deserialize)]
struct CityBlock {
    name: String,
    timezone: i32,
}

#[derive(Deserialize)]
struct ForecastPayload {
    list: Vec<ForecastItem>,
    city: CityBlock,
}

fn observation(dt: i64, main: &MainBlock, wind: &WindBlock, offset: i32) -> ObservationRecord {
    ObservationRecord::new(dt, main.temp, main.pressure, main.humidity, wind.speed, offset)
}

/// `cod` is a number on `/weather` and a string on `/forecast`.
fn check_status(body: &Value) -> Result<()> {
    let ok = match body.get("cod") {
        Some(Value::Number(n)) => n.as_i64() == Some(200),
        Some(Value::String(s)) => s == "200",
        _ => false,
    };
    if ok {
        return Ok(());
    }

    let cod = body.get("cod").map(Value::to_string).unwrap_or_default();
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("no message");
    Err(anyhow!("OpenWeatherMap returned cod {cod}: {message}"))
}

pub(super) fn parse_current(body: Value) -> Result<CurrentConditions> {
    check_status(&body).context("City not found")?;
    let payload: CurrentPayload =
        serde_json::from_value(body).context("Unexpected /weather payload")?;

    Ok(CurrentConditions {
        observation: observation(payload.dt, &payload.main, &payload.wind, payload.timezone),
        city: payload.name,
        sunrise: payload.sys.sunrise,
        sunset: payload.sys.sunset,
    })
}

pub(super) fn parse_forecast(body: Value) -> Result<Forecast> {
    check_status(&body).context("Forecast unavailable")?;
    let payload: ForecastPayload =
        serde_json::from_value(body).context("Unexpected /forecast payload")?;

    let offset = payload.city.timezone;
    let observations = payload
        .list
        .iter()
        .map(|item| observation(item.dt, &item.main, &item.wind, offset))
        .collect();

    Ok(Forecast {
        city: payload.city.name,
        observations,
    })
}
