use crate::analyzers::bite::{BiteConditions, BiteRules};
use crate::analyzers::moon::moon_phase;
use crate::analyzers::pressure::{PressureStatus, REFERENCE_PRESSURE_MM, normalize};
use crate::analyzers::types::DaySummary;
use crate::analyzers::utility::{mean, round_to};
use crate::error::{EngineError, Result};
use crate::observation::ObservationRecord;
use chrono::{NaiveDate, TimeDelta, Timelike};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use tracing::debug;

/// Forecast feeds cover five days.
pub const DEFAULT_MAX_DAYS: usize = 5;

/// Local hours counted as daytime; everything else is night.
pub const DAY_HOURS: RangeInclusive<u32> = 6..=18;

/// Hour used when scoring a whole forecast day, since the feed has no
/// "current hour" for future dates.
pub const REPRESENTATIVE_HOUR: u32 = 9;

#[derive(Default)]
struct DayBucket<'a> {
    day: Vec<&'a ObservationRecord>,
    night: Vec<&'a ObservationRecord>,
}

impl<'a> DayBucket<'a> {
    fn all(&self) -> impl Iterator<Item = &'a ObservationRecord> + '_ {
        self.day.iter().chain(&self.night).copied()
    }
}

/// Groups a forecast series into local calendar days.
#[derive(Debug, Clone)]
pub struct ForecastAggregator {
    pub altitude_m: f64,
    pub max_days: usize,
    pub rules: BiteRules,
    pub reference_pressure_mm: i32,
}

impl Default for ForecastAggregator {
    fn default() -> Self {
        ForecastAggregator {
            altitude_m: 0.0,
            max_days: DEFAULT_MAX_DAYS,
            rules: BiteRules::default(),
            reference_pressure_mm: REFERENCE_PRESSURE_MM,
        }
    }
}

impl ForecastAggregator {
    pub fn new(altitude_m: f64, max_days: usize) -> Self {
        ForecastAggregator {
            altitude_m,
            max_days,
            ..Default::default()
        }
    }

    pub fn with_rules(mut self, rules: BiteRules, reference_pressure_mm: i32) -> Self {
        self.rules = rules;
        self.reference_pressure_mm = reference_pressure_mm;
        self
    }

    /// Buckets `records` by local date and summarizes each day.
    ///
    /// Days come out in the order their first record appears, capped at
    /// `max_days`. An empty series yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if a record's timestamp or UTC
    /// offset cannot be turned into a local time.
    pub fn aggregate(&self, records: &[ObservationRecord]) -> Result<Vec<DaySummary>> {
        let mut order: Vec<NaiveDate> = Vec::new();
        let mut buckets: HashMap<NaiveDate, DayBucket> = HashMap::new();

        for record in records {
            let local = record.local_time()?;
            let date = local.date();

            let bucket = buckets.entry(date).or_insert_with(|| {
                order.push(date);
                DayBucket::default()
            });

            if DAY_HOURS.contains(&local.hour()) {
                bucket.day.push(record);
            } else {
                bucket.night.push(record);
            }
        }

        debug!(
            records = records.len(),
            days = order.len(),
            max_days = self.max_days,
            "Forecast bucketed by local date"
        );

        order
            .into_iter()
            .take(self.max_days)
            .map(|date| self.summarize_day(date, &buckets[&date]))
            .collect()
    }

    fn summarize_day(&self, date: NaiveDate, bucket: &DayBucket) -> Result<DaySummary> {
        let records: Vec<&ObservationRecord> = bucket.all().collect();

        let temps: Vec<f64> = records.iter().map(|r| r.temperature).collect();
        let humidities: Vec<f64> = records.iter().map(|r| r.humidity).collect();
        let winds: Vec<f64> = records.iter().map(|r| r.wind_speed).collect();
        let pressures: Vec<f64> = records.iter().map(|r| r.pressure).collect();
        let water: Vec<f64> = records.iter().filter_map(|r| r.water_temperature).collect();

        let avg_humidity = mean(&humidities).round() as i32;
        let avg_wind = round_to(mean(&winds), 1);
        let avg_pressure = normalize(mean(&pressures), self.altitude_m);
        let water_temp = (!water.is_empty()).then(|| mean(&water));

        let conditions = BiteConditions::new(
            avg_pressure,
            avg_wind,
            avg_humidity,
            water_temp,
            REPRESENTATIVE_HOUR,
        )?;

        let min_temp = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let max_temp = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        // Phase at local noon keeps every record of the date on the same answer.
        let offset = records
            .first()
            .map(|r| r.utc_offset_seconds)
            .unwrap_or_default();
        let noon = date
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| EngineError::invalid("date", date))?;
        let noon_utc = (noon - TimeDelta::seconds(i64::from(offset))).and_utc();

        Ok(DaySummary {
            date,
            day_avg_temp: average_temp(&bucket.day),
            night_avg_temp: average_temp(&bucket.night),
            min_temp: min_temp.round() as i32,
            max_temp: max_temp.round() as i32,
            avg_humidity,
            avg_wind,
            avg_pressure,
            pressure_status: PressureStatus::classify(avg_pressure, self.reference_pressure_mm),
            bite_score: conditions.score(&self.rules),
            moon_phase: moon_phase(noon_utc),
        })
    }
}

fn average_temp(records: &[&ObservationRecord]) -> Option<i32> {
    if records.is_empty() {
        return None;
    }
    let temps: Vec<f64> = records.iter().map(|r| r.temperature).collect();
    Some(mean(&temps).round() as i32)
}

/// Aggregates with the default rules and reference pressure.
pub fn aggregate(
    records: &[ObservationRecord],
    altitude_m: f64,
    max_days: usize,
) -> Result<Vec<DaySummary>> {
    ForecastAggregator::new(altitude_m, max_days).aggregate(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::moon::MoonPhase;

    // 2024-06-01T00:00:00Z
    const JUNE_FIRST: i64 = 1_717_200_000;
    const HOUR: i64 = 3600;

    fn record(ts: i64, temp: f64) -> ObservationRecord {
        ObservationRecord::new(ts, temp, 1000.0, 70.0, 2.0, 0)
    }

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, n).unwrap()
    }

    /// Eight 3-hourly samples per day for `days` days, UTC offset zero.
    fn three_hourly(days: i64) -> Vec<ObservationRecord> {
        (0..days * 8)
            .map(|i| record(JUNE_FIRST + i * 3 * HOUR, 10.0 + i as f64))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        assert!(aggregate(&[], 0.0, 5).unwrap().is_empty());
    }

    #[test]
    fn test_caps_at_max_days() {
        let records = three_hourly(7);
        let summaries = aggregate(&records, 0.0, 5).unwrap();
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].date, day(1));
        assert_eq!(summaries[4].date, day(5));

        assert_eq!(aggregate(&records, 0.0, 2).unwrap().len(), 2);
        assert_eq!(aggregate(&records, 0.0, 10).unwrap().len(), 7);
    }

    #[test]
    fn test_first_seen_order_not_sorted() {
        let records = vec![
            record(JUNE_FIRST + 2 * 24 * HOUR + 10 * HOUR, 20.0),
            record(JUNE_FIRST + 10 * HOUR, 15.0),
            record(JUNE_FIRST + 24 * HOUR + 10 * HOUR, 18.0),
            record(JUNE_FIRST + 12 * HOUR, 17.0),
        ];
        let dates: Vec<NaiveDate> = aggregate(&records, 0.0, 5)
            .unwrap()
            .iter()
            .map(|s| s.date)
            .collect();
        assert_eq!(dates, vec![day(3), day(1), day(2)]);
    }

    #[test]
    fn test_day_and_night_buckets_are_separate() {
        let records = vec![
            record(JUNE_FIRST + 10 * HOUR, 20.0),
            record(JUNE_FIRST + 10 * HOUR, 22.0),
            record(JUNE_FIRST + 22 * HOUR, 8.0),
            record(JUNE_FIRST + 22 * HOUR, 10.0),
        ];
        let summary = &aggregate(&records, 0.0, 5).unwrap()[0];
        assert_eq!(summary.day_avg_temp, Some(21));
        assert_eq!(summary.night_avg_temp, Some(9));
        assert_eq!(summary.min_temp, 8);
        assert_eq!(summary.max_temp, 22);
    }

    #[test]
    fn test_day_window_edges() {
        let records = vec![
            record(JUNE_FIRST + 6 * HOUR, 10.0),
            record(JUNE_FIRST + 18 * HOUR, 20.0),
            record(JUNE_FIRST + 5 * HOUR, 0.0),
            record(JUNE_FIRST + 21 * HOUR, 4.0),
        ];
        let summary = &aggregate(&records, 0.0, 5).unwrap()[0];
        assert_eq!(summary.day_avg_temp, Some(15));
        assert_eq!(summary.night_avg_temp, Some(2));
    }

    #[test]
    fn test_empty_bucket_is_none() {
        let records = vec![record(JUNE_FIRST + 12 * HOUR, 20.0)];
        let summary = &aggregate(&records, 0.0, 5).unwrap()[0];
        assert_eq!(summary.day_avg_temp, Some(20));
        assert_eq!(summary.night_avg_temp, None);
    }

    #[test]
    fn test_offset_shifts_records_into_next_local_day() {
        // 22:00Z on June 1st is 01:00 on June 2nd at UTC+3.
        let mut late = record(JUNE_FIRST + 22 * HOUR, 5.0);
        late.utc_offset_seconds = 3 * 3600;
        let mut early = record(JUNE_FIRST + 9 * HOUR, 15.0);
        early.utc_offset_seconds = 3 * 3600;

        let summaries = aggregate(&[early, late], 0.0, 5).unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].date, day(1));
        assert_eq!(summaries[1].date, day(2));
        assert_eq!(summaries[1].night_avg_temp, Some(5));
        assert_eq!(summaries[1].day_avg_temp, None);
    }

    #[test]
    fn test_averaged_metrics() {
        let records = vec![
            ObservationRecord::new(JUNE_FIRST + 3 * HOUR, 10.0, 980.0, 61.0, 1.24, 0),
            ObservationRecord::new(JUNE_FIRST + 9 * HOUR, 14.0, 984.0, 64.0, 2.0, 0),
            ObservationRecord::new(JUNE_FIRST + 15 * HOUR, 18.0, 988.0, 66.0, 3.0, 0),
        ];
        let summary = &aggregate(&records, 0.0, 5).unwrap()[0];
        // mean humidity 63.67 -> 64, wind 2.08 -> 2.1, pressure 984 hPa -> 738 mmHg
        assert_eq!(summary.avg_humidity, 64);
        assert_eq!(summary.avg_wind, 2.1);
        assert_eq!(summary.avg_pressure, 738);
        assert_eq!(summary.pressure_status, PressureStatus::Ideal);
        // 3 (pressure) + 2 (wind) + 1 (humidity) + 2 (hour 9) = 8 -> 5
        assert_eq!(summary.bite_score, 5);
    }

    #[test]
    fn test_altitude_lowers_pressure() {
        let records = vec![ObservationRecord::new(JUNE_FIRST, 10.0, 1000.0, 50.0, 5.0, 0)];
        let sea = &aggregate(&records, 0.0, 5).unwrap()[0];
        let hill = &aggregate(&records, 200.0, 5).unwrap()[0];
        assert_eq!(sea.avg_pressure, 750);
        assert_eq!(hill.avg_pressure, 732);
    }

    #[test]
    fn test_water_temperature_feeds_bite_score() {
        // 750 mmHg (-1), wind 5 (0), humidity 50 (0), hour 9 (+2) = 1 without water.
        let dry = vec![ObservationRecord::new(JUNE_FIRST, 10.0, 1000.0, 50.0, 5.0, 0)];
        let wet = vec![dry[0].clone().with_water_temperature(16.0)];
        assert_eq!(aggregate(&dry, 0.0, 5).unwrap()[0].bite_score, 1);
        assert_eq!(aggregate(&wet, 0.0, 5).unwrap()[0].bite_score, 3);
    }

    #[test]
    fn test_moon_phase_per_day() {
        // 2024-01-25 was a full moon.
        let records = vec![record(1_706_140_800 + 3 * HOUR, 0.0)];
        let summary = &aggregate(&records, 0.0, 5).unwrap()[0];
        assert_eq!(summary.moon_phase, MoonPhase::Full);
    }

    #[test]
    fn test_idempotent() {
        let records = three_hourly(3);
        let first = aggregate(&records, 120.0, 5).unwrap();
        let second = aggregate(&records, 120.0, 5).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_offset_is_rejected() {
        let mut bad = record(JUNE_FIRST, 10.0);
        bad.utc_offset_seconds = 100_000;
        assert!(aggregate(&[bad], 0.0, 5).is_err());
    }

    #[test]
    fn test_custom_reference_pressure() {
        let records = vec![ObservationRecord::new(JUNE_FIRST, 10.0, 1000.0, 50.0, 5.0, 0)];
        let aggregator = ForecastAggregator::new(0.0, 5).with_rules(BiteRules::default(), 760);
        let summary = &aggregator.aggregate(&records).unwrap()[0];
        assert_eq!(summary.pressure_status, PressureStatus::Low);
    }
}
