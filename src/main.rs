//! CLI entry point for the bite rater.
//!
//! Provides subcommands for scoring current conditions, summarizing a
//! multi-day forecast, analyzing a stored observation series, and looking up
//! the moon phase.

mod infra;
mod services;

use crate::infra::openweather::OpenWeatherClient;
use crate::services::weather_api::WeatherSource;
use anyhow::{Context, Result};
use bite_rater::analyzers::aggregate::DEFAULT_MAX_DAYS;
use bite_rater::analyzers::moon::{moon_age, moon_phase};
use bite_rater::analyzers::{Analyzer, DaySummary};
use bite_rater::config::EngineConfig;
use bite_rater::fetch::{BasicClient, fetch_bytes};
use bite_rater::output::{print_json, print_pretty, write_summaries_csv};
use bite_rater::parser::parse_records;
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bite_rater")]
#[command(about = "Fishing weather: normalized pressure, bite score, and moon phase", long_about = None)]
struct Cli {
    /// JSON engine config (altitudes, bite rules, reference pressure)
    #[arg(long, global = true, env = "BITE_RATER_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score current conditions for a city
    Station {
        /// City name (defaults to DEFAULT_CITY, then Kursk)
        city: Option<String>,
    },
    /// Summarize the multi-day forecast for a city
    Week {
        /// City name (defaults to DEFAULT_CITY, then Kursk)
        city: Option<String>,

        /// Maximum number of days to report
        #[arg(short, long, default_value_t = DEFAULT_MAX_DAYS)]
        days: usize,
    },
    /// Aggregate an observation series from a JSON/CSV file or URL
    Analyze {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// City whose configured altitude should be applied
        #[arg(long, conflicts_with = "altitude")]
        city: Option<String>,

        /// Altitude in meters, overriding any city lookup
        #[arg(long)]
        altitude: Option<f64>,

        /// Maximum number of days to report
        #[arg(short, long, default_value_t = DEFAULT_MAX_DAYS)]
        days: usize,

        /// Optional CSV file to export the day summaries to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the moon phase for a timestamp
    Moon {
        /// UTC epoch seconds (defaults to now)
        #[arg(short, long)]
        timestamp: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bite_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bite_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    info!(altitudes = config.altitudes.len(), "Engine config loaded");
    let analyzer = Analyzer::new(config);

    match cli.command {
        Commands::Station { city } => {
            let city = city.unwrap_or_else(default_city);
            station(&analyzer, &weather_client()?, &city).await?;
        }
        Commands::Week { city, days } => {
            let city = city.unwrap_or_else(default_city);
            week(&analyzer, &weather_client()?, &city, days).await?;
        }
        Commands::Analyze {
            source,
            city,
            altitude,
            days,
            output,
        } => {
            let bytes = fetcher(&source).await?;
            let records = parse_records(&bytes)
                .with_context(|| format!("Failed to load observations from {source}"))?;

            let altitude = altitude.unwrap_or_else(|| {
                city.as_deref()
                    .map(|c| analyzer.config().altitudes.altitude_for(c))
                    .unwrap_or(0.0)
            });

            let summaries = analyzer.forecast_at_altitude(altitude, &records, days)?;
            report(&summaries)?;

            if let Some(path) = output {
                write_summaries_csv(&path, &summaries)?;
                info!(path, rows = summaries.len(), "Summaries exported");
            }
        }
        Commands::Moon { timestamp } => {
            let at = match timestamp {
                Some(ts) => DateTime::from_timestamp(ts, 0)
                    .with_context(|| format!("Timestamp {ts} is out of range"))?,
                None => Utc::now(),
            };
            let phase = moon_phase(at);
            info!(timestamp = %at, phase = phase.as_str(), "Moon phase");
            print_json(&json!({
                "timestamp": at,
                "age_days": moon_age(at),
                "phase": phase,
            }))?;
        }
    }

    Ok(())
}

fn default_city() -> String {
    std::env::var("DEFAULT_CITY").unwrap_or_else(|_| "Kursk".to_string())
}

fn weather_client() -> Result<OpenWeatherClient<BasicClient>> {
    let api_key = std::env::var("WEATHER_API_KEY").context("WEATHER_API_KEY must be set")?;
    Ok(OpenWeatherClient::new(api_key))
}

/// Loads observation data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}

/// Fetches current conditions and prints the scored reading with local sun times.
#[tracing::instrument(skip(analyzer, source))]
async fn station<S: WeatherSource>(analyzer: &Analyzer, source: &S, city: &str) -> Result<()> {
    let current = source.current(city).await?;
    let reading = analyzer.station(&current.city, &current.observation)?;

    let offset = current.observation.offset()?;
    let local = |ts: Option<i64>| local_time(ts, offset);

    info!(
        city = %current.city,
        pressure_mm = reading.pressure_mm,
        bite_score = reading.bite_score,
        "Station reading"
    );
    print_pretty(&reading);
    print_json(&json!({
        "city": current.city,
        "reading": reading,
        "sunrise": local(current.sunrise),
        "sunset": local(current.sunset),
    }))
}

/// Fetches the forecast and prints day summaries.
#[tracing::instrument(skip(analyzer, source))]
async fn week<S: WeatherSource>(
    analyzer: &Analyzer,
    source: &S,
    city: &str,
    days: usize,
) -> Result<()> {
    let forecast = source.forecast(city).await?;
    if forecast.observations.is_empty() {
        warn!(city = %forecast.city, "Forecast contained no samples");
    }

    let summaries = analyzer.forecast(&forecast.city, &forecast.observations, days)?;
    info!(city = %forecast.city, days = summaries.len(), "Forecast summarized");
    report(&summaries)
}

fn report(summaries: &[DaySummary]) -> Result<()> {
    for summary in summaries {
        info!(
            date = %summary.date,
            day_avg_temp = ?summary.day_avg_temp,
            night_avg_temp = ?summary.night_avg_temp,
            avg_pressure = summary.avg_pressure,
            bite_score = summary.bite_score,
            moon_phase = summary.moon_phase.as_str(),
            "Day summary"
        );
    }
    print_json(&summaries)
}

fn local_time(ts: Option<i64>, offset: FixedOffset) -> Option<String> {
    let utc = DateTime::from_timestamp(ts?, 0)?;
    Some(utc.with_timezone(&offset).format("%H:%M").to_string())
}
