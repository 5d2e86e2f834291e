//! Loaders for observation series stored as JSON or CSV.

use anyhow::{Context, Result};
use tracing::debug;

use crate::observation::ObservationRecord;

/// Decodes observation records from raw bytes, picking the format from the
/// first non-whitespace byte: `[` means a JSON array, anything else is CSV
/// with a header row naming the record fields.
///
/// # Errors
///
/// Returns an error if the bytes do not decode, or if any record fails
/// [`ObservationRecord::validate`].
pub fn parse_records(bytes: &[u8]) -> Result<Vec<ObservationRecord>> {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'[') {
        parse_json_records(bytes)
    } else {
        parse_csv_records(bytes)
    }
}

pub fn parse_json_records(bytes: &[u8]) -> Result<Vec<ObservationRecord>> {
    let records: Vec<ObservationRecord> =
        serde_json::from_slice(bytes).context("Failed to decode JSON observations")?;
    debug!(count = records.len(), "JSON observations decoded");
    validate_all(records)
}

pub fn parse_csv_records(bytes: &[u8]) -> Result<Vec<ObservationRecord>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut records = Vec::new();

    for (row, result) in rdr.deserialize().enumerate() {
        let record: ObservationRecord =
            result.with_context(|| format!("Failed to decode CSV row {}", row + 1))?;
        records.push(record);
    }

    debug!(count = records.len(), "CSV observations decoded");
    validate_all(records)
}

fn validate_all(records: Vec<ObservationRecord>) -> Result<Vec<ObservationRecord>> {
    for (index, record) in records.iter().enumerate() {
        record
            .validate()
            .with_context(|| format!("Observation {index} is out of range"))?;
    }
    Ok(records)
}
