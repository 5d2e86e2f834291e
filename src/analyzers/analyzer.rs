use crate::analyzers::aggregate::ForecastAggregator;
use crate::analyzers::bite::BiteConditions;
use crate::analyzers::moon::moon_phase;
use crate::analyzers::pressure::{PressureStatus, normalize};
use crate::analyzers::types::{DaySummary, StationReading};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::observation::ObservationRecord;
use tracing::{debug, info};

/// Applies an [`EngineConfig`] to observations for a named location.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: EngineConfig,
}

impl Analyzer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Scores a single observation at its own local hour.
    pub fn station(&self, city: &str, record: &ObservationRecord) -> Result<StationReading> {
        self.station_at_altitude(self.config.altitudes.altitude_for(city), record)
    }

    pub fn station_at_altitude(
        &self,
        altitude_m: f64,
        record: &ObservationRecord,
    ) -> Result<StationReading> {
        record.validate()?;

        let local_time = record.local_time()?;
        let local_hour = record.local_hour()?;
        let pressure_mm = normalize(record.pressure, altitude_m);

        let conditions = BiteConditions::new(
            pressure_mm,
            record.wind_speed,
            record.humidity.round() as i32,
            record.water_temperature,
            local_hour,
        )?;
        let bite_score = conditions.score(&self.config.rules);

        debug!(altitude_m, pressure_mm, local_hour, bite_score, "Station reading scored");

        Ok(StationReading {
            local_time,
            temperature: record.temperature.round() as i32,
            humidity: conditions.humidity,
            wind_speed: record.wind_speed,
            pressure_mm,
            pressure_status: PressureStatus::classify(pressure_mm, self.config.reference_pressure_mm),
            bite_score,
            moon_phase: moon_phase(record.utc_time()?),
        })
    }

    /// Summarizes a forecast series for `city` into at most `max_days` days.
    pub fn forecast(
        &self,
        city: &str,
        records: &[ObservationRecord],
        max_days: usize,
    ) -> Result<Vec<DaySummary>> {
        self.forecast_at_altitude(self.config.altitudes.altitude_for(city), records, max_days)
    }

    pub fn forecast_at_altitude(
        &self,
        altitude_m: f64,
        records: &[ObservationRecord],
        max_days: usize,
    ) -> Result<Vec<DaySummary>> {
        let summaries = ForecastAggregator::new(altitude_m, max_days)
            .with_rules(self.config.rules.clone(), self.config.reference_pressure_mm)
            .aggregate(records)?;

        info!(
            records = records.len(),
            days = summaries.len(),
            altitude_m,
            "Forecast aggregated"
        );

        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::moon::MoonPhase;
    use crate::config::AltitudeTable;

    fn analyzer() -> Analyzer {
        Analyzer::new(EngineConfig {
            altitudes: AltitudeTable::from_entries([("Highland", 200.0)]),
            ..EngineConfig::default()
        })
    }

    // 2024-01-25T16:00:00Z, local 19:00 at UTC+3, full moon.
    fn evening() -> ObservationRecord {
        ObservationRecord::new(1_706_198_400, -4.6, 988.0, 82.0, 3.0, 3 * 3600)
            .with_water_temperature(14.0)
    }

    #[test]
    fn test_station_uses_local_hour() {
        let reading = analyzer().station("Lowland", &evening()).unwrap();
        // 988 hPa -> 741 mmHg (+3), wind +2, humidity +1, water +2, 19:00 +2
        assert_eq!(reading.pressure_mm, 741);
        assert_eq!(reading.bite_score, 5);
        assert_eq!(reading.temperature, -5);
        assert_eq!(reading.humidity, 82);
        assert_eq!(reading.pressure_status, PressureStatus::High);
        assert_eq!(reading.moon_phase, MoonPhase::Full);
        assert_eq!(reading.local_time.format("%H:%M").to_string(), "19:00");
    }

    #[test]
    fn test_station_applies_city_altitude() {
        let reading = analyzer().station("highland", &evening()).unwrap();
        // (988 - 24) * 0.75006 = 723.06
        assert_eq!(reading.pressure_mm, 723);
        assert_eq!(reading.pressure_status, PressureStatus::Low);
    }

    #[test]
    fn test_station_rejects_bad_humidity() {
        let mut record = evening();
        record.humidity = 140.0;
        assert!(analyzer().station("Lowland", &record).is_err());
    }

    #[test]
    fn test_forecast_uses_city_altitude() {
        let records = vec![ObservationRecord::new(1_717_200_000, 10.0, 1000.0, 50.0, 5.0, 0)];
        let low = analyzer().forecast("Lowland", &records, 5).unwrap();
        let high = analyzer().forecast("Highland", &records, 5).unwrap();
        assert_eq!(low[0].avg_pressure, 750);
        assert_eq!(high[0].avg_pressure, 732);
    }

    #[test]
    fn test_forecast_empty() {
        assert!(analyzer().forecast("Lowland", &[], 5).unwrap().is_empty());
    }
}
