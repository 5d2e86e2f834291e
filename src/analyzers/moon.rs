//! Lunar phase from a timestamp, using a fixed reference new moon and the
//! mean synodic month.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Mean length of the new-moon-to-new-moon cycle, in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.53058867;

/// 1970-01-07T00:15:00Z, a new moon.
const REFERENCE_NEW_MOON_MS: i64 = 519_300_000;

const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoonPhase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl MoonPhase {
    /// All phases in cycle order, starting from the new moon.
    pub const ALL: [MoonPhase; 8] = [
        MoonPhase::New,
        MoonPhase::WaxingCrescent,
        MoonPhase::FirstQuarter,
        MoonPhase::WaxingGibbous,
        MoonPhase::Full,
        MoonPhase::WaningGibbous,
        MoonPhase::LastQuarter,
        MoonPhase::WaningCrescent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MoonPhase::New => "new",
            MoonPhase::WaxingCrescent => "waxing_crescent",
            MoonPhase::FirstQuarter => "first_quarter",
            MoonPhase::WaxingGibbous => "waxing_gibbous",
            MoonPhase::Full => "full",
            MoonPhase::WaningGibbous => "waning_gibbous",
            MoonPhase::LastQuarter => "last_quarter",
            MoonPhase::WaningCrescent => "waning_crescent",
        }
    }

    /// Maps a moon age (days since new moon) to its bucket. Each of the eight
    /// buckets spans an equal share of the synodic month; the last one also
    /// absorbs anything that rounds up to the full cycle length.
    pub fn from_age(age_days: f64) -> Self {
        let width = SYNODIC_MONTH_DAYS / Self::ALL.len() as f64;
        let index = (age_days / width) as usize;
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// Days elapsed since the most recent new moon, in `[0, SYNODIC_MONTH_DAYS)`.
pub fn moon_age(timestamp: DateTime<Utc>) -> f64 {
    let elapsed_days = (timestamp.timestamp_millis() - REFERENCE_NEW_MOON_MS) as f64 / MS_PER_DAY;
    elapsed_days.rem_euclid(SYNODIC_MONTH_DAYS)
}

pub fn moon_phase(timestamp: DateTime<Utc>) -> MoonPhase {
    MoonPhase::from_age(moon_age(timestamp))
}

/// Day-of-month approximation some older callers relied on.
#[deprecated(note = "ignores the real lunar cycle and drifts by days each month; use `moon_phase`")]
pub fn legacy_moon_phase(date: NaiveDate) -> MoonPhase {
    let day = date.day() % 30;
    MoonPhase::ALL[(day * 8 / 30) as usize]
}
