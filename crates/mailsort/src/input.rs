//! Reading records from JSON.
//!
//! The engine needs an id and a timestamp for every record; input files may
//! leave them out, in which case a UUID and the current time are filled in.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use mailsort_core::RawRecord;
use serde::Deserialize;

/// A record as it appears in an input file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordInput {
    /// Optional caller id.
    #[serde(default)]
    pub id: Option<String>,
    /// Sender text.
    #[serde(default)]
    pub sender: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Body preview.
    #[serde(default)]
    pub preview: String,
    /// Optional receive time.
    #[serde(default)]
    pub received_at: Option<DateTime<Utc>>,
}

impl RecordInput {
    /// Converts into an engine record, filling in missing id and time.
    pub fn into_record(self, now: DateTime<Utc>) -> RawRecord {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(new_id);
        RawRecord::new(
            id,
            self.sender.trim(),
            self.subject.trim(),
            self.preview.trim(),
            self.received_at.unwrap_or(now),
        )
    }
}

/// Fresh record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Parses a JSON array of records.
pub fn parse_records(json: &str, now: DateTime<Utc>) -> Result<Vec<RawRecord>> {
    let inputs: Vec<RecordInput> =
        serde_json::from_str(json).context("Expected a JSON array of records")?;
    Ok(inputs.into_iter().map(|i| i.into_record(now)).collect())
}

/// Reads records from a file, or stdin for `None` / `-`.
pub fn read_records(path: Option<&Path>) -> Result<Vec<RawRecord>> {
    let json = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    parse_records(&json, Utc::now())
}
