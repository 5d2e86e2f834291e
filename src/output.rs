//! Output helpers for analyzer results.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

use crate::analyzers::types::DaySummary;
use csv::WriterBuilder;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes day summaries to a CSV file at `path`, replacing any existing file.
pub fn write_summaries_csv(path: &str, summaries: &[DaySummary]) -> Result<()> {
    debug!(path, rows = summaries.len(), "Writing CSV summaries");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;

    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::moon::MoonPhase;
    use crate::analyzers::pressure::PressureStatus;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn summary(day: u32, night_avg_temp: Option<i32>) -> DaySummary {
        DaySummary {
            date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            day_avg_temp: Some(21),
            night_avg_temp,
            min_temp: 9,
            max_temp: 24,
            avg_humidity: 64,
            avg_wind: 2.1,
            avg_pressure: 738,
            pressure_status: PressureStatus::Ideal,
            bite_score: 5,
            moon_phase: MoonPhase::WaxingCrescent,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&summary(1, None));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&vec![summary(1, Some(10))]).unwrap();
    }

    #[test]
    fn test_write_csv_header_and_rows() {
        let path = temp_path("bite_rater_test_rows.csv");
        let _ = fs::remove_file(&path);

        write_summaries_csv(&path, &[summary(1, Some(10)), summary(2, None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,day_avg_temp,night_avg_temp"));
        assert!(lines[1].starts_with("2024-06-01,21,10,"));
        // Missing night average is an empty cell.
        assert!(lines[2].starts_with("2024-06-02,21,,"));
        assert!(lines[1].ends_with(",ideal,5,waxing_crescent"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_csv_replaces_existing_file() {
        let path = temp_path("bite_rater_test_replace.csv");
        let _ = fs::remove_file(&path);

        write_summaries_csv(&path, &[summary(1, None), summary(2, None)]).unwrap();
        write_summaries_csv(&path, &[summary(3, None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);

        fs::remove_file(&path).unwrap();
    }
}
