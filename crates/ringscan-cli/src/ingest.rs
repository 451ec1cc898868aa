//! CSV ingestion and validation.
//!
//! This is the external parsing collaborator of the engine: every
//! validation error originates here, and the detection crates only ever
//! see pre-validated records.
//!
//! Expected columns: `transaction_id,sender_id,receiver_id,amount,timestamp`.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use ringscan_core::error::{EngineError, Result};
use ringscan_core::types::TransactionRecord;
use serde::Deserialize;
use std::path::Path;

/// Default input size cap: 10 MiB.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const REQUIRED_COLUMNS: [&str; 5] = [
    "transaction_id",
    "sender_id",
    "receiver_id",
    "amount",
    "timestamp",
];

/// One CSV row before timestamp parsing.
#[derive(Debug, Deserialize)]
struct RawRecord {
    transaction_id: String,
    sender_id: String,
    receiver_id: String,
    amount: f64,
    timestamp: String,
}

/// Load and validate a record batch from a CSV file.
pub fn load_records(path: &Path, max_bytes: u64) -> Result<Vec<TransactionRecord>> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(EngineError::validation(format!(
            "file is {size} bytes, exceeding the {max_bytes} byte limit"
        )));
    }

    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| EngineError::validation(format!("cannot read CSV: {e}")))?;
    check_columns(&mut reader)?;

    let mut records = Vec::new();
    for (row, raw) in reader.deserialize::<RawRecord>().enumerate() {
        // Header is line 1; data starts at line 2.
        let line = row + 2;
        let raw = raw.map_err(|e| {
            EngineError::validation(format!("row at line {line} is malformed: {e}"))
        })?;
        records.push(validate_row(raw, line)?);
    }

    tracing::info!(records = records.len(), "ingested record batch");
    Ok(records)
}

fn check_columns<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<()> {
    let headers = reader
        .headers()
        .map_err(|e| EngineError::validation(format!("unreadable header row: {e}")))?;
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(EngineError::validation(format!(
            "missing columns: {}",
            missing.join(", ")
        )));
    }
    Ok(())
}

fn validate_row(raw: RawRecord, line: usize) -> Result<TransactionRecord> {
    if raw.transaction_id.is_empty() || raw.sender_id.is_empty() || raw.receiver_id.is_empty() {
        return Err(EngineError::validation(format!(
            "row at line {line} has an empty identifier field"
        )));
    }
    if raw.amount < 0.0 || !raw.amount.is_finite() {
        return Err(EngineError::validation(format!(
            "row at line {line} has invalid amount {}",
            raw.amount
        )));
    }
    let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| {
        EngineError::validation(format!(
            "row at line {line} has unparseable timestamp '{}'",
            raw.timestamp
        ))
    })?;

    Ok(TransactionRecord {
        transaction_id: raw.transaction_id,
        sender_id: raw.sender_id,
        receiver_id: raw.receiver_id,
        amount: raw.amount,
        timestamp,
    })
}

/// Accept RFC 3339 plus the common date-time layouts seen in exports.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
