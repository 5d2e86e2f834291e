use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;

use crate::analyzers::bite::BiteRules;
use crate::analyzers::pressure::REFERENCE_PRESSURE_MM;

/// Maps city names to their elevation in meters.
///
/// Lookups are case-insensitive; unknown cities are treated as sea level.
/// Stored as a plain JSON object:
/// ```json
/// { "Kursk": 250, "Moscow": 156 }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, f64>")]
pub struct AltitudeTable {
    entries: HashMap<String, f64>,
}

impl From<HashMap<String, f64>> for AltitudeTable {
    fn from(raw: HashMap<String, f64>) -> Self {
        Self::from_entries(raw)
    }
}

impl AltitudeTable {
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(city, meters)| (city.as_ref().trim().to_lowercase(), meters))
            .collect();
        Self { entries }
    }

    /// Elevation for `city`, or 0 when the city is not listed.
    pub fn altitude_for(&self, city: &str) -> f64 {
        self.entries
            .get(&city.trim().to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Scoring configuration handed to the analyzers.
///
/// Every section is optional:
/// ```json
/// {
///   "altitudes": { "Kursk": 250 },
///   "rules": { "humid_from": 65 },
///   "reference_pressure_mm": 738
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub altitudes: AltitudeTable,
    pub rules: BiteRules,
    pub reference_pressure_mm: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            altitudes: AltitudeTable::default(),
            rules: BiteRules::default(),
            reference_pressure_mm: REFERENCE_PRESSURE_MM,
        }
    }
}

impl EngineConfig {
    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read engine config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid engine config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
