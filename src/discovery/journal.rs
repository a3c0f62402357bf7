//! Recent journal entries for a single unit via `journalctl --output=json`

use chrono::{DateTime, SecondsFormat};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::process::{CommandRunner, Tool};
use super::Discovery;
use crate::errors::DiscoveryError;

pub const MIN_JOURNAL_ENTRIES: i64 = 1;
pub const MAX_JOURNAL_ENTRIES: i64 = 1_000;

pub const PRIORITY_LABELS: [&str; 8] = [
    "emerg", "alert", "crit", "err", "warning", "notice", "info", "debug",
];

const TIMESTAMP_FIELDS: [&str; 2] = ["__REALTIME_TIMESTAMP", "_SOURCE_REALTIME_TIMESTAMP"];
const IDENTIFIER_FIELDS: [&str; 3] = ["SYSLOG_IDENTIFIER", "_SYSTEMD_UNIT", "_COMM"];

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JournalEntry {
    pub timestamp: String,
    pub message: String,
    pub priority: String,
    pub identifier: String,
}

impl<R: CommandRunner> Discovery<R> {
    pub fn journal_entries(
        &self,
        unit: &str,
        limit: i64,
        since: Option<&str>,
    ) -> Result<Vec<JournalEntry>, DiscoveryError> {
        if unit.is_empty() {
            return Err(DiscoveryError::MissingUnit);
        }

        let count = clamp_limit(limit).to_string();
        let mut args = vec!["-u", unit, "--no-pager", "--output=json", "-n", count.as_str()];
        if let Some(since) = since.filter(|since| !since.is_empty()) {
            args.extend(["--since", since]);
        }

        let output = self.runner.run(Tool::Journalctl, &args, false)?;
        Ok(parse_journal_lines(&output.stdout, unit))
    }
}

pub fn clamp_limit(limit: i64) -> i64 {
    limit.clamp(MIN_JOURNAL_ENTRIES, MAX_JOURNAL_ENTRIES)
}

pub fn parse_journal_lines(payload: &str, unit: &str) -> Vec<JournalEntry> {
    payload
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<Map<String, Value>>(line) {
            Ok(record) => Some(journal_entry(&record, unit)),
            Err(err) => {
                debug!(error = %err, "skipping non-json journal line");
                None
            }
        })
        .collect()
}

fn journal_entry(record: &Map<String, Value>, unit: &str) -> JournalEntry {
    let timestamp = TIMESTAMP_FIELDS
        .iter()
        .find_map(|field| record.get(*field).filter(|value| is_present(value)))
        .map(format_timestamp)
        .unwrap_or_default();

    let identifier = IDENTIFIER_FIELDS
        .iter()
        .find_map(|field| {
            record
                .get(*field)
                .and_then(Value::as_str)
                .filter(|value| !value.is_empty())
        })
        .unwrap_or(unit)
        .to_string();

    JournalEntry {
        timestamp,
        message: record.get("MESSAGE").map(message_text).unwrap_or_default(),
        priority: priority_label(record.get("PRIORITY")),
        identifier,
    }
}

/// Microseconds since the epoch to RFC 3339 UTC; empty when not representable.
/// Whole seconds carry no fractional part, otherwise six digits are printed.
pub fn format_timestamp(value: &Value) -> String {
    let micros = match value {
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Number(number) => number.as_i64(),
        _ => None,
    };

    micros
        .and_then(DateTime::from_timestamp_micros)
        .map(|timestamp| {
            let precision = if timestamp.timestamp_subsec_micros() == 0 {
                SecondsFormat::Secs
            } else {
                SecondsFormat::Micros
            };
            timestamp.to_rfc3339_opts(precision, false)
        })
        .unwrap_or_default()
}

pub fn priority_label(value: Option<&Value>) -> String {
    let code = match value {
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        Some(Value::Number(number)) => number.as_i64(),
        _ => None,
    };

    match code {
        Some(code) => usize::try_from(code)
            .ok()
            .and_then(|index| PRIORITY_LABELS.get(index))
            .map(|label| label.to_string())
            .unwrap_or_else(|| code.to_string()),
        None => "unknown".to_string(),
    }
}

// journald encodes messages that are not valid UTF-8 as byte arrays.
fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) => {
            let bytes: Vec<u8> = items
                .iter()
                .filter_map(Value::as_u64)
                .filter_map(|byte| u8::try_from(byte).ok())
                .collect();
            String::from_utf8_lossy(&bytes).trim().to_string()
        }
        _ => String::new(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        _ => true,
    }
}
